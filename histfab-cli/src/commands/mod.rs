pub mod config;
pub mod log;
pub mod preview;
pub mod run;

use anyhow::{Context, Result};
use histfab_core::Config;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "histfab.toml";

/// Loads the named config file, or `./histfab.toml` if it exists, or defaults.
pub fn load_config(custom_path: Option<PathBuf>) -> Result<Config> {
    match custom_path {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let path = PathBuf::from(DEFAULT_CONFIG_FILE);
            if path.exists() {
                Config::load(&path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))
            } else {
                Ok(Config::default())
            }
        }
    }
}
