//! Reference resolution dispatcher

use std::path::{Component, Path};

use crate::backends::{Backend, BaseDir, System};
use crate::error::GetError;
use crate::lines;
use crate::reference::Reference;
use crate::schema::{Reducer, Schema, Source, Token};
use crate::target::Target;

/// Resolves references against a [`Backend`].
///
/// Every call runs one fixed chain of blocking steps and keeps no state, so
/// a resolver can be shared freely across threads.
#[derive(Debug, Default)]
pub struct Resolver<B = System> {
    backend: B,
}

impl Resolver {
    /// Create a resolver backed by the real system
    pub fn new() -> Self {
        Self { backend: System }
    }
}

impl<B: Backend> Resolver<B> {
    /// Create a resolver over a custom backend
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Resolve a raw input string. Inputs outside the grammar come back unchanged.
    pub fn resolve(&self, input: &str) -> Result<String, GetError> {
        self.resolve_reference(&Reference::parse(input))
    }

    /// Resolve, trimming whitespace from the result
    pub fn resolve_trimmed(&self, input: &str) -> Result<String, GetError> {
        self.resolve(input).map(|s| s.trim().to_string())
    }

    /// Resolve an already split reference
    pub fn resolve_reference(&self, reference: &Reference) -> Result<String, GetError> {
        let Some(schema) = reference.schema() else {
            return Ok(reference.remainder().to_string());
        };
        let value = reference.remainder();

        tracing::debug!(
            schema = schema.as_str(),
            backend = schema.backend_name(),
            reducer = schema.reducer().map(|r| r.name()),
            "Resolving reference"
        );

        match schema {
            Schema::Token(token) => self.resolve_token(token, value),
            Schema::Alias(alias) => {
                let raw = format!("{}:{}", alias, value);
                let target = Target::parse_short(&raw, "scp")
                    .ok_or_else(|| GetError::invalid_target(&raw, "expected user@host:path"))?;
                self.copy_and_read(&target)
            }
        }
    }

    fn resolve_token(&self, token: &Token, value: &str) -> Result<String, GetError> {
        match token.source {
            Source::Env => {
                let content = self.backend.env_var(value)?;
                Ok(reduce(token.reducer, content))
            }
            Source::EnvFile => {
                let path = self.backend.env_var(value)?;
                if path.is_empty() {
                    return Err(GetError::Env {
                        var: value.to_string(),
                        reason: "is empty or not set; expected a file path".to_string(),
                    });
                }
                self.read_local(Path::new(&path), token.reducer)
            }
            Source::File => self.read_local(Path::new(value), token.reducer),
            Source::Home => self.read_under(BaseDir::Home, value, token.reducer),
            Source::Conf => self.read_under(BaseDir::Config, value, token.reducer),
            Source::Cache => self.read_under(BaseDir::Cache, value, token.reducer),
            Source::Http | Source::Https => {
                // The split consumed the colon of `https://`, so put it back
                let url = format!("{}:{}", token.source.name(), value);
                let body = self.backend.http_get(&url)?;
                let body = into_string(body, &url)?;
                Ok(reduce(token.reducer, body))
            }
            Source::Ssh | Source::Scp => {
                let target = remote_target(token, value)?;
                match token.reducer {
                    None => self.copy_and_read(&target),
                    Some(reducer) => self.remote_line(&target, reducer),
                }
            }
        }
    }

    fn read_local(&self, path: &Path, reducer: Option<Reducer>) -> Result<String, GetError> {
        match reducer {
            None => {
                let content = self.backend.read_file(path)?;
                into_string(content, &path.display().to_string())
            }
            Some(Reducer::Head) => self.backend.first_line(path),
            Some(Reducer::Tail) => self.backend.last_line(path),
        }
    }

    fn read_under(
        &self,
        dir: BaseDir,
        value: &str,
        reducer: Option<Reducer>,
    ) -> Result<String, GetError> {
        check_relative(dir, value)?;
        let base = self.backend.base_dir(dir)?;
        self.read_local(&base.join(value), reducer)
    }

    fn copy_and_read(&self, target: &Target) -> Result<String, GetError> {
        let path = require_path(target)?;
        let file_name = Path::new(path).file_name().ok_or_else(|| {
            GetError::invalid_target(target.to_string(), "remote path has no file name")
        })?;

        // Removed on drop, along with the copied file
        let scratch = tempfile::Builder::new()
            .prefix("refget-")
            .tempdir()
            .map_err(|e| GetError::file(std::env::temp_dir(), e))?;

        let dest = self.backend.copy_remote(target, Some(scratch.path()))?;
        let content = self.backend.read_file(&dest.join(file_name))?;
        into_string(content, &target.to_string())
    }

    fn remote_line(&self, target: &Target, reducer: Reducer) -> Result<String, GetError> {
        let path = require_path(target)?;
        let command = line_command(reducer, path).ok_or_else(|| {
            GetError::invalid_target(target.to_string(), "remote path cannot be quoted")
        })?;

        let output = self.backend.run_remote_command(target, &command)?;
        Ok(lines::first_line(&output).to_string())
    }
}

/// Parse the target of an `ssh`/`scp` token.
///
/// `//...` is the long form with the schema as its scheme; anything else is
/// the `[user@]host:path` short form.
fn remote_target(token: &Token, value: &str) -> Result<Target, GetError> {
    if value.starts_with("//") {
        let raw = format!("{}:{}", token.name, value);
        Target::parse(&raw).ok_or_else(|| {
            GetError::invalid_target(&raw, "expected <scheme>://[user@]host[:port][/path]")
        })
    } else {
        Target::parse_short(value, token.name)
            .ok_or_else(|| GetError::invalid_target(value, "expected [user@]host[:path]"))
    }
}

/// Values under a base directory must stay inside it
fn check_relative(dir: BaseDir, value: &str) -> Result<(), GetError> {
    for component in Path::new(value).components() {
        let reason = match component {
            Component::Normal(_) | Component::CurDir => continue,
            Component::ParentDir => "'..' is not allowed",
            Component::RootDir | Component::Prefix(_) => "absolute paths are not allowed",
        };
        return Err(GetError::InvalidPath {
            path: value.to_string(),
            dir: dir.name(),
            reason,
        });
    }
    Ok(())
}

fn require_path(target: &Target) -> Result<&str, GetError> {
    target
        .path()
        .ok_or_else(|| GetError::invalid_target(target.to_string(), "no remote path"))
}

/// `head -n 1 -- <path>` or `tail -n 1 -- <path>`, with the path shell-quoted
/// and kept out of option position
fn line_command(reducer: Reducer, path: &str) -> Option<String> {
    let quoted = shlex::try_quote(path).ok()?;
    Some(format!("{} -n 1 -- {}", reducer.name(), quoted))
}

fn reduce(reducer: Option<Reducer>, content: String) -> String {
    match reducer {
        None => content,
        Some(reducer) => reducer.apply(&content).to_string(),
    }
}

fn into_string(content: Vec<u8>, what: &str) -> Result<String, GetError> {
    String::from_utf8(content).map_err(|_| GetError::invalid_utf8(what))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_resolve_literal() {
        let resolver = Resolver::new();
        for input in ["my-secret", "", "not:a:schema", ":leading", "ENV:FOO"] {
            assert_eq!(resolver.resolve(input).unwrap(), input);
        }
    }

    #[test]
    fn test_resolve_env() {
        std::env::set_var("REFGET_TEST_RESOLVER_SECRET", "something");
        let resolver = Resolver::new();
        let result = resolver.resolve("env:REFGET_TEST_RESOLVER_SECRET").unwrap();
        assert_eq!(result, "something");
        std::env::remove_var("REFGET_TEST_RESOLVER_SECRET");
    }

    #[test]
    fn test_resolve_missing_env_is_empty() {
        let resolver = Resolver::new();
        assert_eq!(resolver.resolve("env:REFGET_TEST_UNSET_98765").unwrap(), "");
        assert_eq!(resolver.resolve("env:").unwrap(), "");
    }

    #[test]
    fn test_resolve_env_reducers() {
        std::env::set_var("REFGET_TEST_RESOLVER_LINES", "one\ntwo\nthree\n");
        let resolver = Resolver::new();
        assert_eq!(
            resolver.resolve("env.head:REFGET_TEST_RESOLVER_LINES").unwrap(),
            "one"
        );
        assert_eq!(
            resolver.resolve("env.tail:REFGET_TEST_RESOLVER_LINES").unwrap(),
            "three"
        );
        std::env::remove_var("REFGET_TEST_RESOLVER_LINES");
    }

    #[test]
    fn test_resolve_file_variants() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first line\nsecond line\nlast line\n").unwrap();
        let path = file.path().display().to_string();
        let resolver = Resolver::new();

        assert_eq!(
            resolver.resolve(&format!("file:{}", path)).unwrap(),
            "first line\nsecond line\nlast line\n"
        );
        for schema in ["file.head", "head"] {
            assert_eq!(
                resolver.resolve(&format!("{}:{}", schema, path)).unwrap(),
                "first line"
            );
        }
        for schema in ["file.tail", "tail"] {
            assert_eq!(
                resolver.resolve(&format!("{}:{}", schema, path)).unwrap(),
                "last line"
            );
        }
    }

    #[test]
    fn test_resolve_env_file_chain() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "token-1\ntoken-2\n").unwrap();
        std::env::set_var("REFGET_TEST_RESOLVER_FILE", file.path());

        let resolver = Resolver::new();
        assert_eq!(
            resolver.resolve("env.file:REFGET_TEST_RESOLVER_FILE").unwrap(),
            "token-1\ntoken-2\n"
        );
        assert_eq!(
            resolver
                .resolve("env.file.head:REFGET_TEST_RESOLVER_FILE")
                .unwrap(),
            "token-1"
        );
        assert_eq!(
            resolver
                .resolve("env.file.tail:REFGET_TEST_RESOLVER_FILE")
                .unwrap(),
            "token-2"
        );
        std::env::remove_var("REFGET_TEST_RESOLVER_FILE");
    }

    #[test]
    fn test_env_file_requires_path() {
        let resolver = Resolver::new();
        let result = resolver.resolve("env.file:REFGET_TEST_UNSET_FILE_VAR");
        assert!(matches!(result, Err(GetError::Env { .. })));
    }

    #[test]
    fn test_fetched_content_is_not_reparsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "env:HOME").unwrap();

        let resolver = Resolver::new();
        let result = resolver
            .resolve(&format!("file:{}", file.path().display()))
            .unwrap();
        assert_eq!(result, "env:HOME");
    }

    #[test]
    fn test_resolve_missing_file() {
        let resolver = Resolver::new();
        let result = resolver.resolve("file:/definitely/not/a/real/path/12345");
        assert!(result.unwrap_err().is_not_found());
    }

    #[test]
    fn test_resolve_invalid_utf8() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xFF, 0xFE, b'\n']).unwrap();

        let resolver = Resolver::new();
        let path = file.path().display().to_string();
        assert!(matches!(
            resolver.resolve(&format!("file:{}", path)),
            Err(GetError::InvalidUtf8 { .. })
        ));
        assert!(matches!(
            resolver.resolve(&format!("head:{}", path)),
            Err(GetError::InvalidUtf8 { .. })
        ));
    }

    #[test]
    fn test_resolve_trimmed() {
        std::env::set_var("REFGET_TEST_RESOLVER_TRIM", "  padded\n");
        let resolver = Resolver::new();
        assert_eq!(
            resolver
                .resolve_trimmed("env:REFGET_TEST_RESOLVER_TRIM")
                .unwrap(),
            "padded"
        );
        std::env::remove_var("REFGET_TEST_RESOLVER_TRIM");
    }

    #[test]
    fn test_remote_target_forms() {
        let ssh = crate::schema::lookup("ssh.head").unwrap();

        let long = remote_target(&ssh, "//user@host:2222/keys/a").unwrap();
        assert_eq!(long.scheme, "ssh.head");
        assert_eq!(long.port(), Some("2222"));
        assert_eq!(long.path(), Some("keys/a"));

        let short = remote_target(&ssh, "user@host:keys/a").unwrap();
        assert_eq!(short.scheme, "ssh.head");
        assert_eq!(short.login(), "user@host");
        assert_eq!(short.path(), Some("keys/a"));

        assert!(matches!(
            remote_target(&ssh, "//user@:22"),
            Err(GetError::InvalidTarget { .. })
        ));
        assert!(matches!(
            remote_target(&ssh, "@host:x"),
            Err(GetError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_check_relative() {
        assert!(check_relative(BaseDir::Home, ".token").is_ok());
        assert!(check_relative(BaseDir::Config, "./app/token").is_ok());
        assert!(check_relative(BaseDir::Cache, "app/a..b").is_ok());

        for value in ["/etc/hostname", "../other/token", "app/../../x"] {
            assert!(
                matches!(
                    check_relative(BaseDir::Home, value),
                    Err(GetError::InvalidPath { dir: "home", .. })
                ),
                "{}",
                value
            );
        }
    }

    #[test]
    fn test_line_command_quotes_path() {
        assert_eq!(
            line_command(Reducer::Head, "keys/a").unwrap(),
            "head -n 1 -- keys/a"
        );
        assert_eq!(
            line_command(Reducer::Tail, "my keys/a b").unwrap(),
            "tail -n 1 -- 'my keys/a b'"
        );

        let command = line_command(Reducer::Head, "-n").unwrap();
        assert_eq!(
            shlex::split(&command).unwrap(),
            vec!["head", "-n", "1", "--", "-n"]
        );
        assert!(line_command(Reducer::Head, "bad\0path").is_none());
    }
}
