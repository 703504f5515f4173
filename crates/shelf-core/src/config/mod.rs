//! # Configuration DTO
//!
//! Plain data for the store layer and the gateway boundary, plus the
//! TOML → DTO mapping. Missing keys fall back to [`AppConfig::default`];
//! a key that is present with the wrong type is reported as an error.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::bail;
use toml::Value;

/// Application configuration DTO
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub stores: StoreSettings,
    pub gateway: GatewaySettings,
    /// Catalog snapshot served by the file-backed gateway.
    pub catalog_path: PathBuf,
}

/// Settings consumed by the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// Restricts the console catalog to names containing this substring.
    pub console_name_filter: Option<String>,
    /// Load the console catalog from the composition root before first render.
    pub auto_initialize: bool,
}

/// Limits applied at the gateway boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewaySettings {
    pub timeout: Duration,
    /// Total attempts per call, first try included.
    pub max_attempts: u32,
    pub initial_backoff: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            console_name_filter: None,
            auto_initialize: true,
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(5_000),
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stores: StoreSettings::default(),
            gateway: GatewaySettings::default(),
            catalog_path: PathBuf::from("catalog.json"),
        }
    }
}

impl AppConfig {
    /// Create AppConfig from a parsed TOML document
    ///
    /// ```toml
    /// [stores]
    /// console_name_filter = "nintendo"
    /// auto_initialize = true
    ///
    /// [gateway]
    /// timeout_ms = 5000
    /// max_attempts = 3
    /// initial_backoff_ms = 200
    ///
    /// [catalog]
    /// path = "/var/lib/romshelf/catalog.json"
    /// ```
    pub fn from_toml(toml_value: &Value) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let console_name_filter = match lookup(toml_value, "stores", "console_name_filter") {
            None => defaults.stores.console_name_filter,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => bail!(type_error("stores.console_name_filter", "string", other)),
        };

        let auto_initialize = match lookup(toml_value, "stores", "auto_initialize") {
            None => defaults.stores.auto_initialize,
            Some(Value::Boolean(b)) => *b,
            Some(other) => bail!(type_error("stores.auto_initialize", "boolean", other)),
        };

        let timeout = millis(toml_value, "timeout_ms")?.unwrap_or(defaults.gateway.timeout);
        let initial_backoff =
            millis(toml_value, "initial_backoff_ms")?.unwrap_or(defaults.gateway.initial_backoff);

        let max_attempts = match lookup(toml_value, "gateway", "max_attempts") {
            None => defaults.gateway.max_attempts,
            Some(Value::Integer(n)) if *n < 1 => {
                bail!("gateway.max_attempts must be at least 1, got {n}")
            }
            Some(Value::Integer(n)) => match u32::try_from(*n) {
                Ok(attempts) => attempts,
                Err(_) => bail!("gateway.max_attempts is too large, got {n}"),
            },
            Some(other) => bail!(type_error("gateway.max_attempts", "integer", other)),
        };

        let catalog_path = match lookup(toml_value, "catalog", "path") {
            None => defaults.catalog_path,
            Some(Value::String(s)) => PathBuf::from(s),
            Some(other) => bail!(type_error("catalog.path", "string", other)),
        };

        Ok(Self {
            stores: StoreSettings {
                console_name_filter,
                auto_initialize,
            },
            gateway: GatewaySettings {
                timeout,
                max_attempts,
                initial_backoff,
            },
            catalog_path,
        })
    }
}

fn lookup<'a>(root: &'a Value, table: &str, key: &str) -> Option<&'a Value> {
    root.get(table).and_then(|t| t.get(key))
}

fn millis(root: &Value, key: &str) -> anyhow::Result<Option<Duration>> {
    match lookup(root, "gateway", key) {
        None => Ok(None),
        Some(Value::Integer(n)) if *n >= 0 => Ok(Some(Duration::from_millis(*n as u64))),
        Some(Value::Integer(n)) => bail!("gateway.{key} must not be negative, got {n}"),
        Some(other) => bail!(type_error(&format!("gateway.{key}"), "integer", other)),
    }
}

fn type_error(key: &str, expected: &str, found: &Value) -> String {
    format!("{key}: expected {expected}, found {}", found.type_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_toml_reads_all_sections() {
        let toml_str = r#"
            [stores]
            console_name_filter = "nintendo"
            auto_initialize = false

            [gateway]
            timeout_ms = 1500
            max_attempts = 5
            initial_backoff_ms = 50

            [catalog]
            path = "/data/catalog.json"
        "#;
        let value: Value = toml::from_str(toml_str).unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.stores.console_name_filter.as_deref(), Some("nintendo"));
        assert!(!config.stores.auto_initialize);
        assert_eq!(config.gateway.timeout, Duration::from_millis(1500));
        assert_eq!(config.gateway.max_attempts, 5);
        assert_eq!(config.gateway.initial_backoff, Duration::from_millis(50));
        assert_eq!(config.catalog_path, PathBuf::from("/data/catalog.json"));
    }

    #[test]
    fn test_from_toml_falls_back_to_defaults_for_missing_keys() {
        let value: Value = toml::from_str("[stores]\n").unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_empty_filter_means_no_filter() {
        let value: Value = toml::from_str("[stores]\nconsole_name_filter = \"\"\n").unwrap();

        let config = AppConfig::from_toml(&value).unwrap();

        assert_eq!(config.stores.console_name_filter, None);
    }

    #[test]
    fn test_from_toml_rejects_wrong_types() {
        let value: Value = toml::from_str("[gateway]\ntimeout_ms = \"fast\"\n").unwrap();

        let err = AppConfig::from_toml(&value).unwrap_err();

        assert!(err.to_string().contains("gateway.timeout_ms"));
    }

    #[test]
    fn test_from_toml_rejects_zero_attempts() {
        let value: Value = toml::from_str("[gateway]\nmax_attempts = 0\n").unwrap();

        assert!(AppConfig::from_toml(&value).is_err());
    }

    #[test]
    fn test_from_toml_rejects_attempts_beyond_u32() {
        let value: Value = toml::from_str("[gateway]\nmax_attempts = 4294967296\n").unwrap();

        let err = AppConfig::from_toml(&value).unwrap_err();

        assert!(err.to_string().contains("gateway.max_attempts"));
    }
}
