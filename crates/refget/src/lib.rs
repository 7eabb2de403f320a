//! Resolve a configuration value from a literal or a `schema:value` reference
//!
//! Lets users choose where a value such as an API token lives, without the
//! program needing to know in advance:
//!
//! ```text
//! foo --token mytoken
//! foo --token conf:thisapp/mytokenfile
//! foo --token env.file.head:TOKEN_FILE_PATH
//! ```
//!
//! Supported schemas (reducers `head`/`tail` take the first/last line):
//!
//! - **Environment** (`env:VAR`, `env.head:`, `env.tail:`): an unset variable is `""`
//! - **Environment path** (`env.file:VAR`, `env.file.head:`, `env.file.tail:`): variable names a file
//! - **Files** (`file:path`, `file.head:`, `file.tail:`, bare `head:`/`tail:`)
//! - **User directories** (`home:`, `conf:`, `cache:` with `.head`/`.tail`): path relative to the base dir
//! - **HTTP** (`http://…`, `https://…`, with `.head`/`.tail`)
//! - **SSH** (`ssh://[user@]host[:port]/path`, `ssh.head://…`, `ssh.tail://…`, `scp://…`,
//!   or the `user@host:path` short form)
//! - **Plain values**: anything else is returned unchanged, colons included
//!
//! Schema matching is exact, so a literal that happens to start with e.g.
//! `env:` is always treated as a reference.
//!
//! # Example
//!
//! ```rust,ignore
//! use refget::Resolver;
//!
//! let resolver = Resolver::new();
//! let token = resolver.resolve_trimmed("env.file.head:TOKEN_FILE")?;
//! ```
//!
//! # Features
//!
//! - `http` (default): Enable `http`/`https` references via `ureq`
//! - `ssh` (default): Enable `ssh`/`scp` references via the system `ssh`/`scp` tools

pub mod backends;
mod error;
pub mod lines;
mod reference;
mod resolver;
pub mod schema;
mod target;

pub use backends::{Backend, BaseDir, System};
pub use error::GetError;
pub use reference::Reference;
pub use resolver::Resolver;
pub use schema::{split, Reducer, Schema, Source, Token};
pub use target::Target;
