//! Translator configuration

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{QirError, QirResult};

/// Knobs for the translator. None of them change the shape of the emitted SQL.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TranslatorConfig {
    /// Reject table qualifiers that no FROM/JOIN introduced
    pub check_aliases: bool,

    /// Allow `product_offers.price` when `product_offers` was introduced without an alias
    pub allow_table_name_qualifiers: bool,

    /// Emit the rendered SQL at debug level
    pub log_sql: bool,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            check_aliases: true,
            allow_table_name_qualifiers: true,
            log_sql: false,
        }
    }
}

impl TranslatorConfig {
    /// Create a new configuration builder
    pub fn builder() -> TranslatorConfigBuilder {
        TranslatorConfigBuilder::default()
    }

    pub fn from_toml_str(source: &str) -> QirResult<Self> {
        toml::from_str(source).map_err(|e| QirError::Config(e.to_string()))
    }

    pub fn from_file(path: impl AsRef<Path>) -> QirResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        info!(path = %path.display(), "loaded translator config");
        Ok(config)
    }

    /// `<config_dir>/qir/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("qir").join("config.toml"))
    }

    /// Load from [`default_path`](Self::default_path), falling back to defaults when absent.
    pub fn load() -> QirResult<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => {
                debug!("no translator config file found, using defaults");
                Ok(Self::default())
            }
        }
    }
}

/// Builder for TranslatorConfig
#[derive(Debug, Default)]
pub struct TranslatorConfigBuilder {
    config: TranslatorConfig,
}

impl TranslatorConfigBuilder {
    pub fn check_aliases(mut self, enabled: bool) -> Self {
        self.config.check_aliases = enabled;
        self
    }

    pub fn allow_table_name_qualifiers(mut self, enabled: bool) -> Self {
        self.config.allow_table_name_qualifiers = enabled;
        self
    }

    pub fn log_sql(mut self, enabled: bool) -> Self {
        self.config.log_sql = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> TranslatorConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslatorConfig::default();
        assert!(config.check_aliases);
        assert!(config.allow_table_name_qualifiers);
        assert!(!config.log_sql);
        assert_eq!(TranslatorConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn test_partial_toml() {
        let config = TranslatorConfig::from_toml_str("log_sql = true").unwrap();
        assert!(config.log_sql);
        assert!(config.check_aliases);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = TranslatorConfig::from_toml_str("dialect = \"mysql\"").unwrap_err();
        assert!(matches!(err, QirError::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = TranslatorConfig::builder()
            .check_aliases(false)
            .allow_table_name_qualifiers(false)
            .build();
        assert!(!config.check_aliases);
        assert!(!config.allow_table_name_qualifiers);
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("qir-config-{}.toml", std::process::id()));
        std::fs::write(&path, "check_aliases = false\n").unwrap();
        let config = TranslatorConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(!config.check_aliases);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TranslatorConfig::from_file("/nonexistent/qir/config.toml").unwrap_err();
        assert!(matches!(err, QirError::Io(_)));
    }
}
