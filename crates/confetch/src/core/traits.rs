//! Core traits for configuration fetching

use super::{Config, ConfigKind, ConfigResult};

/// Produces a [`Config`] from the parameters it was built with
pub trait Fetcher: Send + Sync {
    /// Fetch the configuration.
    ///
    /// Every call reads the source again; nothing is cached.
    fn fetch(&self) -> ConfigResult<Config>;

    /// Kind of source this fetcher reads
    fn kind(&self) -> ConfigKind;
}
