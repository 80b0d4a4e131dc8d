//! Initialization parameters for configuration fetchers

use super::io::read_file;
use super::{ConfigError, ConfigKind, ConfigResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Describes which fetcher to build and how to initialize it
///
/// Usually loaded once at startup from an init file such as:
///
/// ```json
/// {
///   "ConfigType": "json",
///   "Aliases": { "db_host": "DatabaseHost" },
///   "InitValues": { "Path": "config.json" }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InitParams {
    /// Fetcher tag, matched case-insensitively (`json`, `envvar`)
    #[serde(default)]
    pub config_type: String,

    /// Namespacing prefix; reserved, not consumed by any fetcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,

    /// How long a fetched config may live before it should be re-read.
    /// Declared for callers; nothing here enforces it.
    #[serde(
        rename = "ConfigTTL",
        default,
        skip_serializing_if = "Option::is_none",
        with = "ttl"
    )]
    pub config_ttl: Option<Duration>,

    /// Alias name to source key (or environment variable name)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<BTreeMap<String, String>>,

    /// Fetcher-specific parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init_values: Option<Map<String, Value>>,
}

impl InitParams {
    /// Create parameters for the given fetcher tag
    pub fn new(config_type: impl Into<String>) -> Self {
        Self {
            config_type: config_type.into(),
            ..Self::default()
        }
    }

    /// Load parameters from an init file.
    ///
    /// With no path, defaults are returned. An unreadable file is an error,
    /// but decode problems are not: a malformed document leaves every field at
    /// its default and a malformed field leaves only that field at its default.
    /// Each swallowed problem is logged. Use [`InitParams::load_strict`] to
    /// surface them instead.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let bytes = read_file(path)?;
        let params = match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Init file is not valid JSON, using defaults"
                );
                Self::default()
            }
        };

        tracing::debug!(
            path = %path.display(),
            config_type = %params.config_type,
            "Loaded init parameters"
        );
        Ok(params)
    }

    /// Load parameters from an init file, failing on any decode problem.
    ///
    /// Field names must match exactly.
    pub fn load_strict(path: &Path) -> ConfigResult<Self> {
        let bytes = read_file(path)?;
        serde_json::from_slice(&bytes).map_err(|e| ConfigError::parse_error(path, e.to_string()))
    }

    /// Parse parameters from a JSON string with the lenient rules of [`InitParams::load`]
    pub fn from_json_str(json: &str) -> Self {
        match serde_json::from_str::<Value>(json) {
            Ok(value) => Self::from_value(&value),
            Err(e) => {
                tracing::warn!(error = %e, "Init parameters are not valid JSON, using defaults");
                Self::default()
            }
        }
    }

    /// Build parameters from a JSON value with the lenient rules of [`InitParams::load`].
    ///
    /// Field names match exactly first, then ignoring ASCII case.
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(obj) = value else {
            tracing::warn!(
                found = super::config::json_type_name(value),
                "Init parameters are not a JSON object, using defaults"
            );
            return Self::default();
        };

        Self {
            config_type: decode_field(obj, "ConfigType").unwrap_or_default(),
            environment: decode_field(obj, "Environment"),
            config_ttl: decode_field(obj, "ConfigTTL").map(ttl::Repr::into_duration),
            aliases: decode_field(obj, "Aliases"),
            init_values: decode_field(obj, "InitValues"),
        }
    }

    /// Parse `config_type` into a [`ConfigKind`]
    pub fn kind(&self) -> ConfigResult<ConfigKind> {
        self.config_type.parse()
    }

    /// Fetcher-specific value stored under `key`
    pub fn init_value(&self, key: &str) -> Option<&Value> {
        self.init_values.as_ref()?.get(key)
    }

    /// Set the environment prefix
    #[must_use = "builder methods must be chained or built"]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Set the TTL
    #[must_use = "builder methods must be chained or built"]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.config_ttl = Some(ttl);
        self
    }

    /// Add an alias mapping `alias` to `source`
    #[must_use = "builder methods must be chained or built"]
    pub fn with_alias(mut self, alias: impl Into<String>, source: impl Into<String>) -> Self {
        self.aliases
            .get_or_insert_with(BTreeMap::new)
            .insert(alias.into(), source.into());
        self
    }

    /// Add a fetcher-specific value
    #[must_use = "builder methods must be chained or built"]
    pub fn with_init_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.init_values
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }
}

/// Look up `name` and decode it, logging and dropping the field on failure
fn decode_field<T>(obj: &Map<String, Value>, name: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let value = obj.get(name).or_else(|| {
        obj.iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    })?;

    if value.is_null() {
        return None;
    }

    match T::deserialize(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(field = name, error = %e, "Ignoring malformed init parameter");
            None
        }
    }
}

/// `ConfigTTL` accepts integer nanoseconds or a humantime string ("30s", "5m").
mod ttl {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    #[derive(Deserialize)]
    #[serde(untagged)]
    pub(super) enum Repr {
        Nanos(u64),
        Human(humantime_serde::Serde<Duration>),
    }

    impl Repr {
        pub(super) fn into_duration(self) -> Duration {
            match self {
                Repr::Nanos(nanos) => Duration::from_nanos(nanos),
                Repr::Human(human) => human.into_inner(),
            }
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Repr>::deserialize(deserializer)?.map(Repr::into_duration))
    }

    pub(super) fn serialize<S>(ttl: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        humantime_serde::serialize(ttl, serializer)
    }
}
