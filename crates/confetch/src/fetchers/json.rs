//! Local JSON file configuration fetcher

// Standard library
use std::path::{Path, PathBuf};
use std::sync::Arc;

// External dependencies
use serde_json::Value;

// Internal crates
use crate::core::config::json_type_name;
use crate::core::io::read_file;
use crate::core::{Config, ConfigError, ConfigKind, ConfigResult, Fetcher, InitParams};

const FETCHER: &str = "json";

/// `InitValues` keys holding the file path, in lookup order
const PATH_KEYS: [&str; 2] = ["Path", "path"];

/// Reads a config from a JSON file named by `InitValues.Path`
///
/// Every top-level field of the document becomes a key, then `Aliases` are
/// applied on top of it.
#[derive(Debug, Clone)]
pub struct LocalJsonFetcher {
    path: PathBuf,
    params: Arc<InitParams>,
}

impl LocalJsonFetcher {
    /// Create a fetcher, resolving the file path from `InitValues`
    pub fn new(params: Arc<InitParams>) -> ConfigResult<Self> {
        let init_values = params
            .init_values
            .as_ref()
            .ok_or(ConfigError::MissingInitValues { fetcher: FETCHER })?;

        let (key, value) = PATH_KEYS
            .iter()
            .find_map(|key| init_values.get(*key).map(|value| (*key, value)))
            .ok_or(ConfigError::MissingInitValue {
                key: PATH_KEYS[0],
                fetcher: FETCHER,
            })?;

        let path: PathBuf = value
            .as_str()
            .ok_or_else(|| ConfigError::InvalidInitValue {
                key: key.to_string(),
                expected: "string",
                actual: json_type_name(value),
            })?
            .into();

        Ok(Self { path, params })
    }

    /// File this fetcher reads
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parameters this fetcher was built with
    pub fn params(&self) -> &InitParams {
        &self.params
    }
}

impl Fetcher for LocalJsonFetcher {
    fn fetch(&self) -> ConfigResult<Config> {
        let bytes = read_file(&self.path)?;

        // Decode problems are not fatal: the document contributes no keys.
        let mut config = match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Config::from(map),
            Ok(other) => {
                tracing::warn!(
                    path = %self.path.display(),
                    found = json_type_name(&other),
                    "Config file is not a JSON object, ignoring its contents"
                );
                Config::new()
            }
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Config file is not valid JSON, ignoring its contents"
                );
                Config::new()
            }
        };

        if let Some(aliases) = &self.params.aliases {
            config.apply_aliases(aliases);
        }

        tracing::debug!(
            path = %self.path.display(),
            keys = config.len(),
            "Loaded configuration from JSON file"
        );
        Ok(config)
    }

    fn kind(&self) -> ConfigKind {
        ConfigKind::Json
    }
}
