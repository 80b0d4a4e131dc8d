//! Confetch - pluggable configuration fetching
//!
//! An init file names the kind of source to read (a local JSON file or the
//! process environment) and how to read it. The matching fetcher produces a
//! flat [`Config`] with typed accessors over its values.
//!
//! # Example
//!
//! ```rust,no_run
//! use confetch::prelude::*;
//!
//! fn main() -> ConfigResult<()> {
//!     // Reads ./init.json, e.g. {"ConfigType": "json", "InitValues": {"Path": "app.json"}}
//!     let config = confetch::get_config(None)?;
//!
//!     let host = config.get_string("host")?.unwrap_or_else(|| "localhost".to_string());
//!     let port = config.get_int64("port")?.unwrap_or(8080);
//!     println!("{host}:{port}");
//!
//!     Ok(())
//! }
//! ```

#![deny(unused_must_use)]
#![warn(missing_docs)]

// Core module with main functionality
pub mod core;

// Implementation modules
pub mod fetchers;

use std::path::Path;

// Re-export main types from core
pub use crate::core::{
    Config, ConfigError, ConfigKind, ConfigResult, ConfigResultExt, Fetcher, InitParams,
};

// Re-export concrete implementations
pub use fetchers::{ConfigFetcher, EnvLookup, EnvVarFetcher, LocalJsonFetcher, ProcessEnv};

/// Init file read by [`get_config`] when no path is given
pub const DEFAULT_INIT_PATH: &str = "init.json";

/// Load init parameters, build the matching fetcher and fetch the config.
///
/// Reads [`DEFAULT_INIT_PATH`] when `init_file` is `None`. Failures are logged
/// and returned; there is no retry and no fallback.
pub fn get_config(init_file: Option<&Path>) -> ConfigResult<Config> {
    let init_path = init_file.unwrap_or_else(|| Path::new(DEFAULT_INIT_PATH));

    let result = InitParams::load(Some(init_path))
        .and_then(|params| ConfigFetcher::new(params))
        .and_then(|fetcher| fetcher.fetch());

    match result {
        Ok(config) => {
            tracing::info!(
                init_file = %init_path.display(),
                keys = config.len(),
                "Configuration loaded"
            );
            Ok(config)
        }
        Err(e) => {
            tracing::error!(init_file = %init_path.display(), "{}", e);
            Err(e)
        }
    }
}

/// Prelude module for convenient imports
pub mod prelude {
    //! Prelude for common imports
    //!
    //! # Example
    //! ```rust
    //! use confetch::prelude::*;
    //! ```

    pub use crate::core::{
        Config, ConfigError, ConfigKind, ConfigResult, ConfigResultExt, Fetcher, InitParams,
    };
    pub use crate::fetchers::{ConfigFetcher, EnvLookup, ProcessEnv};
    pub use crate::{DEFAULT_INIT_PATH, get_config};
}
