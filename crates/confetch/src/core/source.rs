//! Configuration source kinds

use super::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Kind of configuration source named by `ConfigType`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigKind {
    /// Local JSON file
    Json,

    /// Process environment variables
    EnvVar,
}

impl ConfigKind {
    /// All known kinds
    pub const ALL: [ConfigKind; 2] = [ConfigKind::Json, ConfigKind::EnvVar];

    /// Canonical tag as written in `ConfigType`
    pub fn tag(&self) -> &'static str {
        match self {
            ConfigKind::Json => "json",
            ConfigKind::EnvVar => "envvar",
        }
    }

    /// Get the source name for display
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKind::Json => "local JSON",
            ConfigKind::EnvVar => "environment variable",
        }
    }

    /// Check if this source reads from the filesystem
    pub fn is_file_based(&self) -> bool {
        matches!(self, ConfigKind::Json)
    }

    /// Check if this source reads the process environment
    pub fn is_env_based(&self) -> bool {
        matches!(self, ConfigKind::EnvVar)
    }
}

impl FromStr for ConfigKind {
    type Err = ConfigError;

    /// Parse a `ConfigType` tag, ignoring case
    fn from_str(s: &str) -> ConfigResult<Self> {
        let tag = s.to_lowercase();
        match tag.as_str() {
            "json" => Ok(ConfigKind::Json),
            "envvar" => Ok(ConfigKind::EnvVar),
            _ => Err(ConfigError::unknown_config_type(tag)),
        }
    }
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
