//! Result helpers for configuration operations

use super::error::{ConfigError, ConfigResult};

/// Extension trait for configuration results
pub trait ConfigResultExt<T> {
    /// Prefix the error with context produced by `f`
    fn with_context<F>(self, f: F) -> ConfigResult<T>
    where
        F: FnOnce() -> String;

    /// Convert to option, logging the error if present
    fn log_error(self) -> Option<T>;
}

impl<T> ConfigResultExt<T> for ConfigResult<T> {
    fn with_context<F>(self, f: F) -> ConfigResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }

    fn log_error(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Configuration error: {}", e);
                None
            }
        }
    }
}
