//! Command implementations.

pub mod build;
pub mod check;

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use sitelens_core::Config;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
pub const DEFAULT_CONFIG_FILE: &str = "sitelens.toml";

/// Load configuration and apply the `--site-url` override.
///
/// An explicitly given file must exist; the default file is optional.
/// The result is not validated.
pub fn load_config(config_path: Option<&Path>, site_url: Option<&str>) -> Result<Config> {
    let default_path = Path::new(DEFAULT_CONFIG_FILE);
    let path = config_path.or_else(|| default_path.is_file().then_some(default_path));

    let mut config = Config::load(path).wrap_err("Failed to load configuration")?;

    if let Some(url) = site_url {
        tracing::info!(site_url = url, "Overriding site URL from CLI");
        config.set_base_url(url);
    }

    tracing::debug!(?config, "Loaded configuration");
    Ok(config)
}
