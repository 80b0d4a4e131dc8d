//! Core configuration functionality

pub mod config;
pub mod error;
pub(crate) mod io;
pub mod params;
pub mod result;
pub mod source;
pub mod traits;

// Re-export core types
pub use config::Config;
pub use error::{ConfigError, ConfigResult};
pub use params::InitParams;
pub use result::ConfigResultExt;
pub use source::ConfigKind;

// Re-export core traits
pub use traits::Fetcher;
