//! Configuration fetcher implementations

mod env;
mod json;

pub use env::{EnvLookup, EnvVarFetcher, ProcessEnv};
pub use json::LocalJsonFetcher;

use crate::core::{
    Config, ConfigKind, ConfigResult, ConfigResultExt, Fetcher, InitParams,
};
use std::sync::Arc;

/// Fetcher selected by the `ConfigType` of a set of [`InitParams`]
#[derive(Debug, Clone)]
pub enum ConfigFetcher {
    /// Reads a local JSON file
    LocalJson(LocalJsonFetcher),

    /// Reads process environment variables
    EnvVar(EnvVarFetcher),
}

impl ConfigFetcher {
    /// Build the fetcher named by `params.config_type`
    pub fn new(params: impl Into<Arc<InitParams>>) -> ConfigResult<Self> {
        Self::with_env(params, Arc::new(ProcessEnv))
    }

    /// Build the fetcher named by `params.config_type`, reading environment
    /// variables from `env` when that fetcher is selected
    pub fn with_env(
        params: impl Into<Arc<InitParams>>,
        env: Arc<dyn EnvLookup>,
    ) -> ConfigResult<Self> {
        let params = params.into();
        let kind = params.kind()?;
        tracing::debug!(kind = %kind, "Building config fetcher");

        match kind {
            ConfigKind::Json => LocalJsonFetcher::new(params)
                .map(Self::LocalJson)
                .with_context(|| "could not load local JSON config fetcher".to_string()),
            ConfigKind::EnvVar => Ok(Self::EnvVar(EnvVarFetcher::with_shared_lookup(
                params, env,
            ))),
        }
    }
}

impl Fetcher for ConfigFetcher {
    fn fetch(&self) -> ConfigResult<Config> {
        match self {
            Self::LocalJson(fetcher) => fetcher.fetch(),
            Self::EnvVar(fetcher) => fetcher.fetch(),
        }
    }

    fn kind(&self) -> ConfigKind {
        match self {
            Self::LocalJson(fetcher) => fetcher.kind(),
            Self::EnvVar(fetcher) => fetcher.kind(),
        }
    }
}

impl From<LocalJsonFetcher> for ConfigFetcher {
    fn from(fetcher: LocalJsonFetcher) -> Self {
        Self::LocalJson(fetcher)
    }
}

impl From<EnvVarFetcher> for ConfigFetcher {
    fn from(fetcher: EnvVarFetcher) -> Self {
        Self::EnvVar(fetcher)
    }
}
