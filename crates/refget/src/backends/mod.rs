//! Source backends
//!
//! Each module is a thin wrapper over one platform primitive. [`Backend`]
//! bundles them behind a trait so the resolver can be driven by a mock in
//! tests; [`System`] is the real implementation.

use std::path::{Path, PathBuf};

use crate::error::GetError;
use crate::target::Target;

pub mod env;
pub mod file;
pub mod userdir;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "ssh")]
pub mod ssh;

pub use userdir::BaseDir;

/// Everything the resolver needs from the outside world.
///
/// Local sources have default implementations backed by the process
/// environment and filesystem. Network sources must be provided.
pub trait Backend: Send + Sync {
    /// Look up an environment variable, `""` when unset
    fn env_var(&self, name: &str) -> Result<String, GetError> {
        env::resolve(name)
    }

    /// Read a file's full content
    fn read_file(&self, path: &Path) -> Result<Vec<u8>, GetError> {
        file::read(path)
    }

    /// Read a file's first line without reading past it
    fn first_line(&self, path: &Path) -> Result<String, GetError> {
        crate::lines::first_line_of(path)
    }

    /// Read a file's last line, retaining no earlier lines
    fn last_line(&self, path: &Path) -> Result<String, GetError> {
        crate::lines::last_line_of(path)
    }

    /// Locate a per-user base directory
    fn base_dir(&self, dir: BaseDir) -> Result<PathBuf, GetError> {
        userdir::resolve(dir)
    }

    /// GET a URL and return the body
    fn http_get(&self, url: &str) -> Result<Vec<u8>, GetError>;

    /// Run a shell command on a remote host and return its stdout
    fn run_remote_command(&self, target: &Target, command: &str) -> Result<String, GetError>;

    /// Copy the target's remote path into `dest` (a new temporary directory
    /// when `None`), returning the directory it landed in
    fn copy_remote(&self, target: &Target, dest: Option<&Path>) -> Result<PathBuf, GetError>;
}

/// Backend using the real environment, filesystem, network and ssh tools
#[derive(Debug, Default, Clone, Copy)]
pub struct System;

impl Backend for System {
    #[cfg(feature = "http")]
    fn http_get(&self, url: &str) -> Result<Vec<u8>, GetError> {
        http::get(url)
    }

    #[cfg(not(feature = "http"))]
    fn http_get(&self, _url: &str) -> Result<Vec<u8>, GetError> {
        Err(GetError::disabled("http"))
    }

    #[cfg(feature = "ssh")]
    fn run_remote_command(&self, target: &Target, command: &str) -> Result<String, GetError> {
        ssh::run_remote_command(target, command)
    }

    #[cfg(not(feature = "ssh"))]
    fn run_remote_command(&self, _target: &Target, _command: &str) -> Result<String, GetError> {
        Err(GetError::disabled("ssh"))
    }

    #[cfg(feature = "ssh")]
    fn copy_remote(&self, target: &Target, dest: Option<&Path>) -> Result<PathBuf, GetError> {
        ssh::copy_remote(target, dest)
    }

    #[cfg(not(feature = "ssh"))]
    fn copy_remote(&self, _target: &Target, _dest: Option<&Path>) -> Result<PathBuf, GetError> {
        Err(GetError::disabled("ssh"))
    }
}
