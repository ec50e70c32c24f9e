//! ABOUTME: Configuration management with validation and environment loading
//! ABOUTME: Loads static metric tags, group enable switches and logging settings

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use dp_core::telemetry::LogFormat;
use dp_core::{tags::check_tag_key, Error, Result, TagSet};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;
use validator::{Validate, ValidationError};

/// Environment variable naming an optional TOML config file
pub const CONFIG_PATH_ENV: &str = "DRUIDPROM_CONFIG";

/// Main configuration struct
#[derive(Debug, Clone, Deserialize, Serialize, Validate, Default)]
#[serde(default)]
pub struct Config {
    #[validate(nested)]
    pub metrics: MetricsConfig,
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Metric tags and enable switches
#[derive(Debug, Clone, Deserialize, Serialize, Validate, Default, PartialEq)]
#[serde(default)]
pub struct MetricsConfig {
    /// Static labels attached to every sample
    ///
    /// Labels are exposed sorted by key, not in the order they were declared.
    #[validate(custom(function = "validate_tags"))]
    pub tags: BTreeMap<String, String>,
    /// Switches keyed by `druid`, `druid-sql` and `druid-uri`
    pub enable: BTreeMap<String, bool>,
}

impl MetricsConfig {
    /// Whether `key` is enabled; unknown keys default to enabled
    ///
    /// `druid_sql` is accepted for `druid-sql`, since environment variable
    /// names cannot carry dashes.
    pub fn is_enabled(&self, key: &str) -> bool {
        self.enable
            .get(key)
            .or_else(|| self.enable.get(&key.replace('-', "_")))
            .copied()
            .unwrap_or(true)
    }

    /// Tags as a validated [`TagSet`], ordered by key
    pub fn tag_set(&self) -> Result<TagSet> {
        TagSet::new(self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }
}

fn validate_tags(tags: &BTreeMap<String, String>) -> std::result::Result<(), ValidationError> {
    for key in tags.keys() {
        check_tag_key(key)
            .map_err(|reason| ValidationError::new("tag_key").with_message(Cow::Owned(reason)))?;
    }
    Ok(())
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// `json`, `pretty` or `compact`
    #[validate(custom(function = "validate_log_format"))]
    pub format: String,
    /// Default filter directive when `RUST_LOG` is unset
    #[validate(length(min = 1))]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn log_format(&self) -> Result<LogFormat> {
        self.format.parse()
    }
}

fn validate_log_format(format: &str) -> std::result::Result<(), ValidationError> {
    format
        .parse::<LogFormat>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("log_format"))
}

impl Config {
    /// Load from the file named by `DRUIDPROM_CONFIG` (if set) and the environment
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).ok();
        Self::load_from(path.as_deref())
    }

    /// Load from an optional TOML file, then `DRUIDPROM__`-prefixed environment variables
    pub fn load_from(path: Option<&str>) -> Result<Self> {
        let mut builder = Self::defaults()?;

        if let Some(path) = path {
            builder = builder.add_source(File::new(path, FileFormat::Toml).required(true));
        }

        // e.g. DRUIDPROM__METRICS__TAGS__ENV=prod, DRUIDPROM__METRICS__ENABLE__DRUID_SQL=false
        builder = builder.add_source(
            Environment::with_prefix("DRUIDPROM")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    /// Parse a TOML document on top of the defaults, ignoring the environment
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let builder = Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(ConfigBuilder::builder()
            .set_default("logging.format", "pretty")?
            .set_default("logging.level", "info")?)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let config = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build config: {}", e)))?;

        let parsed: Config = config
            .try_deserialize()
            .map_err(|e| Error::Config(format!("Failed to deserialize config: {}", e)))?;

        parsed
            .validate()
            .map_err(|e| Error::Config(format!("Config validation failed: {}", e)))?;

        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Use a mutex to serialize tests that modify environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const ENV_VARS: [&str; 4] = [
        CONFIG_PATH_ENV,
        "DRUIDPROM__METRICS__TAGS__ENV",
        "DRUIDPROM__METRICS__ENABLE__DRUID_SQL",
        "DRUIDPROM__LOGGING__FORMAT",
    ];

    fn clear_env() {
        for key in ENV_VARS {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_config_defaults() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = Config::load().expect("Should load with defaults");

        assert!(config.metrics.tags.is_empty());
        assert!(config.metrics.is_enabled("druid"));
        assert!(config.metrics.is_enabled("druid-sql"));
        assert!(config.metrics.is_enabled("druid-uri"));
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.logging.level, "info");
        assert!(config.metrics.tag_set().unwrap().is_empty());
    }

    #[test]
    fn test_config_from_toml() {
        let config = Config::from_toml_str(
            r#"
            [metrics]
            tags = { region = "eu", env = "prod" }

            [metrics.enable]
            druid-uri = false

            [logging]
            format = "json"
            "#,
        )
        .expect("Should parse toml");

        assert!(config.metrics.is_enabled("druid"));
        assert!(config.metrics.is_enabled("druid-sql"));
        assert!(!config.metrics.is_enabled("druid-uri"));
        assert_eq!(config.logging.log_format().unwrap(), LogFormat::Json);

        let tags = config.metrics.tag_set().unwrap();
        assert_eq!(tags.keys(), ["env", "region"]);
        assert_eq!(tags.values(), ["prod", "eu"]);
    }

    #[test]
    fn test_tags_ordered_by_key_not_declaration() {
        let config = Config::from_toml_str(
            "[metrics.tags]\nzone = \"z1\"\napp = \"orders\"\nenv = \"prod\"\n",
        )
        .expect("Should parse toml");

        let tags = config.metrics.tag_set().unwrap();
        assert_eq!(tags.keys(), ["app", "env", "zone"]);
        assert_eq!(tags.values(), ["orders", "prod", "z1"]);
    }

    #[test]
    fn test_config_from_env() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        env::set_var("DRUIDPROM__METRICS__TAGS__ENV", "staging");
        env::set_var("DRUIDPROM__METRICS__ENABLE__DRUID_SQL", "false");

        let config = Config::load().expect("Should load from env");

        assert_eq!(config.metrics.tags.get("env").map(String::as_str), Some("staging"));
        assert!(!config.metrics.is_enabled("druid-sql"));
        assert!(config.metrics.is_enabled("druid-uri"));

        clear_env();
    }

    #[test]
    fn test_config_from_file_with_env_override() {
        let _lock = ENV_MUTEX.lock().unwrap();
        clear_env();

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[metrics]\ntags = {{ env = \"prod\" }}\n[logging]\nformat = \"compact\""
        )
        .expect("write config");

        env::set_var(CONFIG_PATH_ENV, file.path());
        env::set_var("DRUIDPROM__LOGGING__FORMAT", "json");

        let config = Config::load().expect("Should load from file");
        assert_eq!(config.metrics.tags.get("env").map(String::as_str), Some("prod"));
        assert_eq!(config.logging.format, "json");

        clear_env();
    }

    #[test]
    fn test_missing_config_file_fails() {
        let result = Config::load_from(Some("/nonexistent/druidprom.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_tag_key_fails_validation() {
        let result = Config::from_toml_str(
            r#"
            [metrics.tags]
            "bad-key" = "x"
            "#,
        );
        let err = result.unwrap_err().to_string();
        assert!(err.contains("validation failed"), "{err}");
    }

    #[test]
    fn test_reserved_tag_key_fails_validation() {
        let result = Config::from_toml_str("[metrics.tags]\npool = \"x\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_format_fails_validation() {
        let result = Config::from_toml_str("[logging]\nformat = \"xml\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_enable_alias_with_underscore() {
        let mut config = MetricsConfig::default();
        config.enable.insert("druid_uri".to_string(), false);
        assert!(!config.is_enabled("druid-uri"));

        config.enable.insert("druid-uri".to_string(), true);
        assert!(config.is_enabled("druid-uri"));
    }
}
