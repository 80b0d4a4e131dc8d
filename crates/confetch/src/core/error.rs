//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Configuration file could not be opened
    #[error("unable to open config file {path}: {message}")]
    FileOpen {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        message: String,
    },

    /// Configuration file was opened but could not be read
    #[error("unable to read config file {path}: {message}")]
    FileRead {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        message: String,
    },

    /// Configuration document could not be decoded (strict loading only)
    #[error("failed to parse config file {path}: {message}")]
    Parse {
        /// Offending path
        path: PathBuf,
        /// Decoder message
        message: String,
    },

    /// `ConfigType` did not name a known fetcher
    #[error("ConfigType {config_type} not found")]
    UnknownConfigType {
        /// The lowercased tag that was requested
        config_type: String,
    },

    /// The fetcher needs `InitValues` and none were given
    #[error("a valid InitValues object must be provided for the {fetcher} fetcher")]
    MissingInitValues {
        /// Fetcher that rejected the parameters
        fetcher: &'static str,
    },

    /// A required entry is missing from `InitValues`
    #[error("\"{key}\" value must be provided in InitValues for the {fetcher} fetcher")]
    MissingInitValue {
        /// Missing key
        key: &'static str,
        /// Fetcher that rejected the parameters
        fetcher: &'static str,
    },

    /// An `InitValues` entry has the wrong type
    #[error("unable to read {expected} from InitValues.{key}: found {actual}")]
    InvalidInitValue {
        /// Key that was read
        key: String,
        /// Expected JSON type
        expected: &'static str,
        /// Actual JSON type
        actual: &'static str,
    },

    /// A stored value could not be coerced into the requested number type
    #[error("value {value} at key '{key}' could not be converted to {target}: {message}")]
    Conversion {
        /// Key that was read
        key: String,
        /// Rendered stored value
        value: String,
        /// Requested type
        target: &'static str,
        /// Parser message
        message: String,
    },

    /// A float accessor was used on a non-numeric value
    #[error("tried to convert {target} from incompatible type {actual} at key '{key}'")]
    IncompatibleType {
        /// Key that was read
        key: String,
        /// Requested type
        target: &'static str,
        /// JSON type of the stored value
        actual: &'static str,
    },

    /// Stored values do not deserialize into the requested type
    #[error("configuration could not be deserialized into {target}: {message}")]
    Deserialize {
        /// Requested type
        target: &'static str,
        /// Deserializer message
        message: String,
    },

    /// Another error with a descriptive prefix
    #[error("{context}: {source}")]
    Context {
        /// Prefix describing the failed step
        context: String,
        /// Wrapped error
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Create a file open error
    pub fn file_open(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            message: err.to_string(),
        }
    }

    /// Create a parse error
    pub fn parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an unknown config type error
    pub fn unknown_config_type(config_type: impl Into<String>) -> Self {
        Self::UnknownConfigType {
            config_type: config_type.into(),
        }
    }

    /// Create a conversion error
    pub fn conversion(
        key: impl Into<String>,
        value: impl Into<String>,
        target: &'static str,
        message: impl ToString,
    ) -> Self {
        Self::Conversion {
            key: key.into(),
            value: value.into(),
            target,
            message: message.to_string(),
        }
    }

    /// Create an incompatible type error
    pub fn incompatible_type(
        key: impl Into<String>,
        target: &'static str,
        actual: &'static str,
    ) -> Self {
        Self::IncompatibleType {
            key: key.into(),
            target,
            actual,
        }
    }

    /// Wrap this error with a descriptive prefix
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Innermost error, skipping any context wrappers
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// Whether this error came from the filesystem
    pub fn is_io(&self) -> bool {
        matches!(self.root(), Self::FileOpen { .. } | Self::FileRead { .. })
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
