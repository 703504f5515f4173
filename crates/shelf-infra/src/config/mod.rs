//! # Configuration Loader
//!
//! Reads a TOML file and maps it onto [`AppConfig`]. Interpretation of the
//! values (defaults, type checks) lives with the DTO in `shelf-core`.

use std::path::Path;

use anyhow::Context;
use shelf_core::AppConfig;

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File cannot be read (I/O error)
/// - Content is not valid TOML (parse error)
/// - A known key holds a value of the wrong type
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
        .with_context(|| format!("Invalid config file: {}", config_path.display()))
}

/// Like [`load_config`], but a missing file yields the defaults.
pub fn load_config_or_default(config_path: &Path) -> anyhow::Result<AppConfig> {
    if !config_path.exists() {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
        return Ok(AppConfig::default());
    }
    load_config(config_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::time::Duration;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        temp_file
    }

    #[test]
    fn test_load_config_reads_valid_toml() {
        let file = write_config(
            r#"
            [stores]
            console_name_filter = "nintendo"

            [gateway]
            timeout_ms = 2500

            [catalog]
            path = "/srv/romshelf/catalog.json"
            "#,
        );

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.stores.console_name_filter.as_deref(), Some("nintendo"));
        assert_eq!(config.gateway.timeout, Duration::from_millis(2500));
        assert_eq!(config.catalog_path, PathBuf::from("/srv/romshelf/catalog.json"));
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let file = write_config("[stores\nconsole_name_filter = 1");

        let err = load_config(file.path()).unwrap_err();

        assert!(err.to_string().contains("Failed to parse config as TOML"));
    }

    #[test]
    fn test_load_config_reports_invalid_values_with_path() {
        let file = write_config("[stores]\nauto_initialize = \"yes\"\n");

        let err = load_config(file.path()).unwrap_err();

        assert!(err.to_string().contains("Invalid config file"));
        assert!(format!("{err:#}").contains("stores.auto_initialize"));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = load_config_or_default(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error_for_strict_loading() {
        let dir = tempfile::tempdir().unwrap();

        let err = load_config(&dir.path().join("config.toml")).unwrap_err();

        assert!(err.to_string().contains("Failed to read config file"));
    }
}
