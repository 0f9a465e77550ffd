//! Subcommands of the `payex` binary.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::Path;

use payex_core::PayexConfig;
use tracing::debug;

/// Load the configuration named by `--config`, else the user config file if
/// one exists, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<PayexConfig> {
    let config = match config_path {
        Some(path) => PayexConfig::from_file(Path::new(path))?,
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                debug!("Using config file {}", default_path.display());
                PayexConfig::from_file(&default_path)?
            } else {
                PayexConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}
