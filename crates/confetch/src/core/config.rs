//! Fetched configuration values and typed accessors

use super::{ConfigError, ConfigResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Display;
use std::str::FromStr;

/// Flat key/value configuration produced by a fetcher
///
/// Values keep whatever shape the source produced; nested JSON objects are
/// stored verbatim under their top-level key. A JSON `null` is reported as
/// absent by every typed accessor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    values: Map<String, Value>,
}

impl Config {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw value stored at `key`
    ///
    /// A missing key is not an error.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Value at `key` as a string, rendering non-string values
    pub fn get_string(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.present(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => render_value(other),
        }))
    }

    /// Value at `key` as a platform-width integer
    pub fn get_int(&self, key: &str) -> ConfigResult<Option<isize>> {
        self.get_integer(key, "int")
    }

    /// Value at `key` as a 32-bit integer
    pub fn get_int32(&self, key: &str) -> ConfigResult<Option<i32>> {
        self.get_integer(key, "int32")
    }

    /// Value at `key` as a 64-bit integer
    pub fn get_int64(&self, key: &str) -> ConfigResult<Option<i64>> {
        self.get_integer(key, "int64")
    }

    /// Value at `key` as a 64-bit float
    ///
    /// Only numbers are accepted. Strings are not parsed; they fail with
    /// [`ConfigError::IncompatibleType`] like every other non-numeric value.
    pub fn get_float64(&self, key: &str) -> ConfigResult<Option<f64>> {
        self.get_float(key, "float64")
    }

    /// Value at `key` as a 32-bit float, with the same rules as [`Config::get_float64`]
    pub fn get_float32(&self, key: &str) -> ConfigResult<Option<f32>> {
        Ok(self.get_float(key, "float32")?.map(|f| f as f32))
    }

    /// Deserialize the value at `key` into `T`
    pub fn get_as<T>(&self, key: &str) -> ConfigResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let Some(value) = self.present(key) else {
            return Ok(None);
        };
        T::deserialize(value).map(Some).map_err(|e| {
            ConfigError::conversion(key, render_value(value), std::any::type_name::<T>(), e)
        })
    }

    /// Deserialize the whole configuration into `T`
    pub fn deserialize<T>(&self) -> ConfigResult<T>
    where
        T: DeserializeOwned,
    {
        serde_json::from_value(Value::Object(self.values.clone())).map_err(|e| {
            ConfigError::Deserialize {
                target: std::any::type_name::<T>(),
                message: e.to_string(),
            }
        })
    }

    /// Underlying key/value map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.values
    }

    /// Consume the configuration, returning the underlying map
    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }

    /// Top-level keys
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Whether `key` is stored, even with a `null` value
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no keys are stored
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Re-key values: `self[alias] = self[source]` for every pair.
    ///
    /// A missing source stores `null` under the alias rather than skipping it.
    pub(crate) fn apply_aliases(&mut self, aliases: &BTreeMap<String, String>) {
        for (alias, source) in aliases {
            let value = self.values.get(source).cloned().unwrap_or(Value::Null);
            tracing::trace!(alias = %alias, source = %source, "Applying config alias");
            self.values.insert(alias.clone(), value);
        }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        self.values.get(key).filter(|value| !value.is_null())
    }

    fn get_integer<T>(&self, key: &str, target: &'static str) -> ConfigResult<Option<T>>
    where
        T: TryFrom<i64> + FromStr,
        <T as TryFrom<i64>>::Error: Display,
        <T as FromStr>::Err: Display,
    {
        let Some(value) = self.present(key) else {
            return Ok(None);
        };

        if let Some(n) = value.as_i64() {
            return T::try_from(n)
                .map(Some)
                .map_err(|e| ConfigError::conversion(key, n.to_string(), target, e));
        }

        let text = render_value(value);
        match text.parse::<T>() {
            Ok(n) => Ok(Some(n)),
            Err(e) => Err(ConfigError::conversion(key, text, target, e)),
        }
    }

    fn get_float(&self, key: &str, target: &'static str) -> ConfigResult<Option<f64>> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::Number(n)) => Ok(n.as_f64()),
            Some(other) => Err(ConfigError::incompatible_type(
                key,
                target,
                json_type_name(other),
            )),
        }
    }
}

impl From<Map<String, Value>> for Config {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl FromIterator<(String, Value)> for Config {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Config {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}

/// Human-readable type name for a JSON value
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value as plain text for string conversion and numeric parsing.
///
/// Integral floats drop the fractional part (`5.0` renders as `5`), so they
/// still parse as integers.
pub(crate) fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) => f.to_string(),
            None => n.to_string(),
        },
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn config(data: Value) -> Config {
        match data {
            Value::Object(map) => Config::from(map),
            other => panic!("test config must be an object, got {other}"),
        }
    }

    #[test]
    fn test_config_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Config>();
    }

    #[test]
    fn test_get_raw_and_missing() {
        let cfg = config(json!({"name": "app", "nested": {"a": 1}, "empty": null}));

        assert_eq!(cfg.get("name"), Some(&json!("app")));
        assert_eq!(cfg.get("nested"), Some(&json!({"a": 1})));
        assert_eq!(cfg.get("empty"), Some(&Value::Null));
        assert_eq!(cfg.get("missing"), None);
    }

    #[test]
    fn test_missing_and_null_are_absent_for_every_accessor() {
        let cfg = config(json!({"empty": null}));

        for key in ["missing", "empty"] {
            assert_eq!(cfg.get_string(key).unwrap(), None);
            assert_eq!(cfg.get_int(key).unwrap(), None);
            assert_eq!(cfg.get_int32(key).unwrap(), None);
            assert_eq!(cfg.get_int64(key).unwrap(), None);
            assert_eq!(cfg.get_float64(key).unwrap(), None);
            assert_eq!(cfg.get_float32(key).unwrap(), None);
            assert_eq!(cfg.get_as::<String>(key).unwrap(), None);
        }
    }

    #[rstest]
    #[case(json!("test value 1"), "test value 1")]
    #[case(json!(5), "5")]
    #[case(json!(5.0), "5")]
    #[case(json!(4.2), "4.2")]
    #[case(json!(-3), "-3")]
    #[case(json!(true), "true")]
    #[case(json!([1, "a"]), r#"[1,"a"]"#)]
    #[case(json!({"k": "v"}), r#"{"k":"v"}"#)]
    fn test_get_string_renders(#[case] value: Value, #[case] expected: &str) {
        let cfg = config(json!({ "key": value }));
        assert_eq!(cfg.get_string("key").unwrap().as_deref(), Some(expected));
    }

    #[rstest]
    #[case(json!(5), 5)]
    #[case(json!(5.0), 5)]
    #[case(json!("2"), 2)]
    #[case(json!("-17"), -17)]
    #[case(json!(9_007_199_254_740_993_i64), 9_007_199_254_740_993)]
    fn test_get_int64_coerces(#[case] value: Value, #[case] expected: i64) {
        let cfg = config(json!({ "key": value }));
        assert_eq!(cfg.get_int64("key").unwrap(), Some(expected));
    }

    #[rstest]
    #[case(json!(4.2))]
    #[case(json!("four"))]
    #[case(json!(true))]
    #[case(json!({"a": 1}))]
    #[case(json!(u64::MAX))]
    fn test_get_int64_rejects(#[case] value: Value) {
        let cfg = config(json!({ "key": value }));
        let err = cfg.get_int64("key").unwrap_err();
        assert!(
            matches!(err, ConfigError::Conversion { target: "int64", ref key, .. } if key == "key"),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn test_get_int32_is_range_checked() {
        let cfg = config(json!({"small": 5, "big": 3_000_000_000_i64, "text": "12"}));

        assert_eq!(cfg.get_int32("small").unwrap(), Some(5));
        assert_eq!(cfg.get_int32("text").unwrap(), Some(12));
        assert!(matches!(
            cfg.get_int32("big"),
            Err(ConfigError::Conversion { target: "int32", .. })
        ));
    }

    #[test]
    fn test_get_int() {
        let cfg = config(json!({"n": 42, "s": "7", "bad": "x"}));

        assert_eq!(cfg.get_int("n").unwrap(), Some(42));
        assert_eq!(cfg.get_int("s").unwrap(), Some(7));
        assert!(cfg.get_int("bad").is_err());
    }

    #[test]
    fn test_get_float_accepts_numbers() {
        let cfg = config(json!({"f": 4.2, "i": 5, "neg": -1}));

        assert_eq!(cfg.get_float64("f").unwrap().map(f64::round), Some(4.0));
        assert_eq!(cfg.get_float64("i").unwrap(), Some(5.0));
        assert_eq!(cfg.get_float64("neg").unwrap(), Some(-1.0));
        assert_eq!(cfg.get_float32("f").unwrap(), Some(4.2_f32));
        assert_eq!(cfg.get_float32("i").unwrap(), Some(5.0_f32));
    }

    #[rstest]
    #[case(json!("4.2"), "string")]
    #[case(json!(true), "boolean")]
    #[case(json!([1.0]), "array")]
    #[case(json!({"f": 1.0}), "object")]
    fn test_get_float_rejects_non_numbers(#[case] value: Value, #[case] actual: &'static str) {
        let cfg = config(json!({ "key": value }));

        assert_eq!(
            cfg.get_float64("key").unwrap_err(),
            ConfigError::incompatible_type("key", "float64", actual)
        );
        assert_eq!(
            cfg.get_float32("key").unwrap_err(),
            ConfigError::incompatible_type("key", "float32", actual)
        );
    }

    #[test]
    fn test_accessors_do_not_mutate() {
        let cfg = config(json!({"a": "1", "b": 2.5, "c": null}));
        let before = cfg.clone();

        let _ = cfg.get_string("a");
        let _ = cfg.get_int("a");
        let _ = cfg.get_int64("b");
        let _ = cfg.get_float64("a");
        let _ = cfg.get_float32("c");

        assert_eq!(cfg, before);
    }

    #[test]
    fn test_get_as_and_deserialize() {
        #[derive(Debug, PartialEq, Deserialize)]
        struct Server {
            host: String,
            port: u16,
        }

        #[derive(Debug, PartialEq, Deserialize)]
        struct AppConfig {
            name: String,
            server: Server,
        }

        let cfg = config(json!({
            "name": "app",
            "server": {"host": "localhost", "port": 8080}
        }));

        let server: Server = cfg.get_as("server").unwrap().unwrap();
        assert_eq!(
            server,
            Server {
                host: "localhost".to_string(),
                port: 8080
            }
        );
        assert!(cfg.get_as::<u16>("name").is_err());

        let all: AppConfig = cfg.deserialize().unwrap();
        assert_eq!(all.name, "app");
        assert_eq!(all.server.port, 8080);

        assert!(matches!(
            cfg.deserialize::<Vec<String>>(),
            Err(ConfigError::Deserialize { .. })
        ));
    }

    #[test]
    fn test_views() {
        let cfg = config(json!({"b": 2, "a": 1}));

        assert_eq!(cfg.len(), 2);
        assert!(!cfg.is_empty());
        assert!(cfg.contains_key("a"));
        assert_eq!(cfg.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(cfg.as_map().get("b"), Some(&json!(2)));
        assert!(Config::new().is_empty());
    }

    #[test]
    fn test_apply_aliases() {
        let mut cfg = config(json!({"db_host": "localhost", "nested": {"x": 1}}));
        let aliases = BTreeMap::from([
            ("host".to_string(), "db_host".to_string()),
            ("inner".to_string(), "nested".to_string()),
            ("ghost".to_string(), "missing".to_string()),
        ]);

        cfg.apply_aliases(&aliases);

        assert_eq!(cfg.get("host"), Some(&json!("localhost")));
        assert_eq!(cfg.get("db_host"), Some(&json!("localhost")));
        assert_eq!(cfg.get("inner"), Some(&json!({"x": 1})));
        // missing source still creates the alias
        assert!(cfg.contains_key("ghost"));
        assert_eq!(cfg.get_string("ghost").unwrap(), None);
    }

    #[test]
    fn test_json_type_name() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "boolean");
        assert_eq!(json_type_name(&json!(42)), "number");
        assert_eq!(json_type_name(&json!("hi")), "string");
        assert_eq!(json_type_name(&json!([1, 2])), "array");
        assert_eq!(json_type_name(&json!({"a": 1})), "object");
    }

    proptest! {
        #[test]
        fn prop_alias_application_is_idempotent(
            base in prop::collection::btree_map("k[0-9]", any::<i64>(), 0..8),
            aliases in prop::collection::btree_map("a[0-9]", "k[0-9]", 0..8),
        ) {
            let mut once: Config = base
                .into_iter()
                .map(|(k, v)| (k, Value::from(v)))
                .collect();
            once.apply_aliases(&aliases);

            let mut twice = once.clone();
            twice.apply_aliases(&aliases);

            prop_assert_eq!(once, twice);
        }
    }
}
