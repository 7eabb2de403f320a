//! refget configuration
//!
//! Optional TOML file at `~/.config/refget/config.toml` giving names to
//! references, so scripts can ask for `--name github` instead of repeating
//! where the token lives.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use refget::Reference;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct RefgetConfig {
    /// Named references, e.g. `github = "env.file.head:GITHUB_TOKEN_FILE"`
    #[serde(default)]
    pub refs: BTreeMap<String, Reference>,
}

impl RefgetConfig {
    /// Get the default config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("refget")
    }

    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from a specific path
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from `path` if given, otherwise from the default location.
    ///
    /// A missing default file yields an empty configuration.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        let path = Self::default_path();
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Look up a named reference
    pub fn get(&self, name: &str) -> Option<&Reference> {
        self.refs.get(name)
    }
}
