//! Config file location.

use std::env;
use std::path::PathBuf;

use shelf_core::AppConfig;
use shelf_infra::load_config_or_default;

/// Environment variable that points at an explicit config file.
pub const CONFIG_ENV: &str = "ROMSHELF_CONFIG";

/// Where the config file is expected.
///
/// `ROMSHELF_CONFIG` wins; debug builds otherwise use the local
/// `.config/config.toml`, release builds the platform config directory.
pub fn resolve_config_path() -> PathBuf {
    if let Some(path) = env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    let local = PathBuf::from(".config").join("config.toml");
    if cfg!(debug_assertions) {
        return local;
    }
    dirs::config_dir()
        .map(|dir| dir.join("romshelf").join("config.toml"))
        .unwrap_or(local)
}

/// Load the config, falling back to defaults when no file exists.
///
/// A relative catalog path is resolved against the config file's directory.
pub fn load_config() -> anyhow::Result<AppConfig> {
    let path = resolve_config_path();
    let mut config = load_config_or_default(&path)?;
    if config.catalog_path.is_relative() {
        if let Some(parent) = path.parent() {
            config.catalog_path = parent.join(&config.catalog_path);
        }
    }
    tracing::info!(
        config = %path.display(),
        catalog = %config.catalog_path.display(),
        "configuration loaded"
    );
    Ok(config)
}
