//! Per-user base directories

use std::path::PathBuf;

use crate::error::GetError;

/// Which per-user directory a path is relative to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseDir {
    Home,
    Config,
    Cache,
}

impl BaseDir {
    pub fn name(&self) -> &'static str {
        match self {
            BaseDir::Home => "home",
            BaseDir::Config => "config",
            BaseDir::Cache => "cache",
        }
    }
}

/// Locate a per-user base directory for the current platform
pub fn resolve(dir: BaseDir) -> Result<PathBuf, GetError> {
    let path = match dir {
        BaseDir::Home => dirs::home_dir(),
        BaseDir::Config => dirs::config_dir(),
        BaseDir::Cache => dirs::cache_dir(),
    };

    path.ok_or(GetError::DirUnavailable { dir: dir.name() })
}
