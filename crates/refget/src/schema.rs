//! Reference grammar
//!
//! A reference is `<schema>:<value>` where `<schema>` is one of a closed set
//! of dotted tokens (see [`TOKENS`]) or a bare `user@host` SSH alias.
//! Anything else is a literal value.

use crate::lines;

/// Where a reference's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Environment variable named by the value
    Env,
    /// Environment variable holding a file path
    EnvFile,
    /// Local file path
    File,
    /// File relative to the user's home directory
    Home,
    /// File relative to the user's config directory
    Conf,
    /// File relative to the user's cache directory
    Cache,
    /// Remote file over SSH
    Ssh,
    /// Remote file over SCP
    Scp,
    /// HTTP GET
    Http,
    /// HTTPS GET
    Https,
}

impl Source {
    /// Backend name for logging/errors
    pub fn name(&self) -> &'static str {
        match self {
            Source::Env => "env",
            Source::EnvFile => "env.file",
            Source::File => "file",
            Source::Home => "home",
            Source::Conf => "conf",
            Source::Cache => "cache",
            Source::Ssh => "ssh",
            Source::Scp => "scp",
            Source::Http => "http",
            Source::Https => "https",
        }
    }
}

/// Narrows full content to a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reducer {
    Head,
    Tail,
}

impl Reducer {
    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Head => "head",
            Reducer::Tail => "tail",
        }
    }

    /// Reduce in-memory content to its first or last line
    pub fn apply<'a>(&self, content: &'a str) -> &'a str {
        match self {
            Reducer::Head => lines::first_line(content),
            Reducer::Tail => lines::last_line(content),
        }
    }
}

/// One entry of the closed schema grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    /// Exact text before the colon
    pub name: &'static str,
    pub source: Source,
    pub reducer: Option<Reducer>,
}

const fn token(name: &'static str, source: Source, reducer: Option<Reducer>) -> Token {
    Token {
        name,
        source,
        reducer,
    }
}

const HEAD: Option<Reducer> = Some(Reducer::Head);
const TAIL: Option<Reducer> = Some(Reducer::Tail);

/// Every schema token accepted before a colon, apart from `user@host` aliases.
///
/// Matching is exact and case-sensitive. Bare `head`/`tail` are aliases for
/// `file.head`/`file.tail`.
pub static TOKENS: &[Token] = &[
    token("env", Source::Env, None),
    token("env.head", Source::Env, HEAD),
    token("env.tail", Source::Env, TAIL),
    token("env.file", Source::EnvFile, None),
    token("env.file.head", Source::EnvFile, HEAD),
    token("env.file.tail", Source::EnvFile, TAIL),
    token("file", Source::File, None),
    token("file.head", Source::File, HEAD),
    token("file.tail", Source::File, TAIL),
    token("head", Source::File, HEAD),
    token("tail", Source::File, TAIL),
    token("home", Source::Home, None),
    token("home.head", Source::Home, HEAD),
    token("home.tail", Source::Home, TAIL),
    token("conf", Source::Conf, None),
    token("conf.head", Source::Conf, HEAD),
    token("conf.tail", Source::Conf, TAIL),
    token("cache", Source::Cache, None),
    token("cache.head", Source::Cache, HEAD),
    token("cache.tail", Source::Cache, TAIL),
    token("ssh", Source::Ssh, None),
    token("ssh.head", Source::Ssh, HEAD),
    token("ssh.tail", Source::Ssh, TAIL),
    token("scp", Source::Scp, None),
    token("http", Source::Http, None),
    token("http.head", Source::Http, HEAD),
    token("http.tail", Source::Http, TAIL),
    token("https", Source::Https, None),
    token("https.head", Source::Https, HEAD),
    token("https.tail", Source::Https, TAIL),
];

/// Look up a token in the closed table
pub fn lookup(name: &str) -> Option<Token> {
    TOKENS.iter().find(|t| t.name == name).copied()
}

/// Check for the `user@host` alias form (`[A-Za-z0-9]+@[A-Za-z0-9.]+`)
pub fn is_ssh_alias(name: &str) -> bool {
    let Some((user, host)) = name.split_once('@') else {
        return false;
    };

    !user.is_empty()
        && user.chars().all(|c| c.is_ascii_alphanumeric())
        && !host.is_empty()
        && host.chars().all(|c| c.is_ascii_alphanumeric() || c == '.')
}

/// A recognized schema
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Schema {
    /// Entry from [`TOKENS`]
    Token(Token),
    /// SSH short form used directly as schema (`user@host`)
    Alias(String),
}

impl Schema {
    /// Parse the text before a colon, returning `None` for anything outside the grammar
    pub fn parse(name: &str) -> Option<Self> {
        if let Some(token) = lookup(name) {
            Some(Schema::Token(token))
        } else if is_ssh_alias(name) {
            Some(Schema::Alias(name.to_string()))
        } else {
            None
        }
    }

    /// The schema text exactly as written before the colon
    pub fn as_str(&self) -> &str {
        match self {
            Schema::Token(token) => token.name,
            Schema::Alias(alias) => alias,
        }
    }

    /// Backend name for logging/errors
    pub fn backend_name(&self) -> &'static str {
        match self {
            Schema::Token(token) => token.source.name(),
            Schema::Alias(_) => "ssh",
        }
    }

    pub fn reducer(&self) -> Option<Reducer> {
        match self {
            Schema::Token(token) => token.reducer,
            Schema::Alias(_) => None,
        }
    }
}

fn is_schema(name: &str) -> bool {
    lookup(name).is_some() || is_ssh_alias(name)
}

/// Split `input` at its first colon into `(schema, remainder)`.
///
/// Returns `("", input)` when there is no colon or the prefix is not in the
/// grammar. The remainder is never split again, so `//host:22/path` passes
/// through intact.
pub fn split(input: &str) -> (&str, &str) {
    match input.split_once(':') {
        Some((prefix, rest)) if is_schema(prefix) => (prefix, rest),
        _ => ("", input),
    }
}
