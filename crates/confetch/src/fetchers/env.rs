//! Environment variable configuration fetcher

use crate::core::{Config, ConfigKind, ConfigResult, Fetcher, InitParams};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;
use std::sync::Arc;

/// Source of environment variables
pub trait EnvLookup: Send + Sync {
    /// Value of the variable `name`, or `None` when it is unset
    fn var(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl<S: BuildHasher + Send + Sync> EnvLookup for HashMap<String, String, S> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for BTreeMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Builds a config from the environment variables named in `Aliases`
///
/// Each alias becomes a key holding the variable's value as a string. Unset
/// variables yield an empty string.
#[derive(Clone)]
pub struct EnvVarFetcher {
    params: Arc<InitParams>,
    env: Arc<dyn EnvLookup>,
}

impl std::fmt::Debug for EnvVarFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvVarFetcher")
            .field("aliases", &self.params.aliases.as_ref().map_or(0, BTreeMap::len))
            .finish()
    }
}

impl EnvVarFetcher {
    /// Create a fetcher reading the process environment
    pub fn new(params: Arc<InitParams>) -> Self {
        Self::with_lookup(params, ProcessEnv)
    }

    /// Create a fetcher reading variables from `env`
    pub fn with_lookup(params: Arc<InitParams>, env: impl EnvLookup + 'static) -> Self {
        Self::with_shared_lookup(params, Arc::new(env))
    }

    /// Create a fetcher reading variables from a shared lookup
    pub fn with_shared_lookup(params: Arc<InitParams>, env: Arc<dyn EnvLookup>) -> Self {
        Self { params, env }
    }

    /// Parameters this fetcher was built with
    pub fn params(&self) -> &InitParams {
        &self.params
    }
}

impl Fetcher for EnvVarFetcher {
    fn fetch(&self) -> ConfigResult<Config> {
        let mut config = Config::new();

        let Some(aliases) = self.params.aliases.as_ref() else {
            tracing::warn!("No Aliases configured for the envvar fetcher, returning empty config");
            return Ok(config);
        };

        for (alias, name) in aliases {
            let value = self.env.var(name).unwrap_or_default();

            if is_sensitive_key(name) {
                tracing::trace!("Loading env config: {} <- {} = [REDACTED]", alias, name);
            } else {
                tracing::trace!("Loading env config: {} <- {} = {}", alias, name, value);
            }

            config.insert(alias.clone(), Value::String(value));
        }

        tracing::debug!("Loaded {} environment variables", config.len());
        Ok(config)
    }

    fn kind(&self) -> ConfigKind {
        ConfigKind::EnvVar
    }
}

/// Check if a variable name looks like it holds a secret
fn is_sensitive_key(key: &str) -> bool {
    let key_lower = key.to_lowercase();
    ["password", "secret", "token", "key", "private", "credential"]
        .iter()
        .any(|marker| key_lower.contains(marker))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn env(vars: &[(&str, &str)]) -> HashMap<String, String> {
        vars.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_fetch_reads_aliased_variables() {
        let params = InitParams::new("envvar")
            .with_alias("test1", "TEST_ENV_VAR")
            .with_alias("test2", "TEST_ENV_VAR2");
        let fetcher = EnvVarFetcher::with_lookup(
            Arc::new(params),
            env(&[("TEST_ENV_VAR", "test value 1"), ("TEST_ENV_VAR2", "2")]),
        );

        let config = fetcher.fetch().unwrap();

        assert_eq!(config.get("test1"), Some(&json!("test value 1")));
        assert_eq!(config.get_int64("test2").unwrap(), Some(2));
        assert_eq!(config.len(), 2);
    }

    #[test]
    fn test_unset_variable_is_empty_string() {
        let params = InitParams::new("envvar").with_alias("missing", "NOT_SET_ANYWHERE");
        let fetcher = EnvVarFetcher::with_lookup(Arc::new(params), env(&[]));

        let config = fetcher.fetch().unwrap();
        assert_eq!(config.get_string("missing").unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_absent_aliases_yield_empty_config() {
        let fetcher = EnvVarFetcher::with_lookup(
            Arc::new(InitParams::new("envvar")),
            env(&[("ANY", "value")]),
        );

        assert!(fetcher.fetch().unwrap().is_empty());
    }

    #[test]
    fn test_values_stay_strings() {
        let params = InitParams::new("envvar").with_alias("ratio", "RATIO");
        let fetcher = EnvVarFetcher::with_lookup(
            Arc::new(params),
            BTreeMap::from([("RATIO".to_string(), "0.5".to_string())]),
        );

        let config = fetcher.fetch().unwrap();
        assert_eq!(config.get("ratio"), Some(&json!("0.5")));
        assert!(config.get_float64("ratio").is_err());
    }

    #[test]
    fn test_kind_and_debug() {
        let fetcher = EnvVarFetcher::new(Arc::new(InitParams::new("envvar").with_alias("a", "B")));

        assert_eq!(fetcher.kind(), ConfigKind::EnvVar);
        assert!(format!("{fetcher:?}").contains("EnvVarFetcher"));
    }

    #[test]
    fn test_is_sensitive_key() {
        assert!(is_sensitive_key("DB_PASSWORD"));
        assert!(is_sensitive_key("api_key"));
        assert!(is_sensitive_key("SECRET_TOKEN"));
        assert!(!is_sensitive_key("USERNAME"));
        assert!(!is_sensitive_key("PORT"));
    }
}
