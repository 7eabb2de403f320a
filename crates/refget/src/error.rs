use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving a reference
#[derive(Debug, Error)]
pub enum GetError {
    /// Remote target could not be parsed (missing host, malformed alias, no path)
    #[error("Invalid remote target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// Per-user base directory could not be determined
    #[error("User {dir} directory is not available on this platform")]
    DirUnavailable { dir: &'static str },

    /// File could not be opened or read
    #[error("Failed to read file '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path would leave the directory it is relative to
    #[error("Invalid path '{path}' under user {dir} directory: {reason}")]
    InvalidPath {
        path: String,
        dir: &'static str,
        reason: &'static str,
    },

    /// HTTP request failed or returned a non-success status
    #[error("GET {url} failed: {message}")]
    Http { url: String, message: String },

    /// External tool is not installed or not on PATH
    #[error("'{tool}' not found on PATH")]
    ToolNotFound { tool: String },

    /// External tool ran but exited unsuccessfully
    #[error("'{tool}' exited with {status}: {stderr}")]
    RemoteCommand {
        tool: String,
        status: String,
        stderr: String,
    },

    /// Fetched content is not valid UTF-8
    #[error("Content of {what} is not valid UTF-8")]
    InvalidUtf8 { what: String },

    /// Environment variable is set but unusable
    #[error("Environment variable '{var}' {reason}")]
    Env { var: String, reason: String },

    /// Backend feature not compiled in
    #[error("Backend '{backend}' not available (feature not enabled)")]
    BackendDisabled { backend: String },
}

impl GetError {
    /// Create an invalid target error
    pub fn invalid_target(target: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTarget {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Create a file error for `path`
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::File {
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP error
    pub fn http(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Http {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a backend disabled error
    pub fn disabled(backend: impl Into<String>) -> Self {
        Self::BackendDisabled {
            backend: backend.into(),
        }
    }

    /// Create an invalid UTF-8 error
    pub fn invalid_utf8(what: impl Into<String>) -> Self {
        Self::InvalidUtf8 { what: what.into() }
    }

    /// Whether the error is a file that does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::File { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}
