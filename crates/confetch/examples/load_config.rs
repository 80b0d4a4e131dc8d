//! Load a configuration through an init file and print what was fetched.
//!
//! ```text
//! RUST_LOG=confetch=debug cargo run -p confetch --example load_config -- path/to/init.json
//! ```

use std::path::PathBuf;

use confetch::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let init_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = get_config(init_path.as_deref())?;

    for key in config.keys() {
        let value = config.get_string(key)?.unwrap_or_else(|| "<null>".to_string());
        println!("{key} = {value}");
    }

    Ok(())
}
