//! Compat Shim Configuration
//!
//! Defines which annotation marks a provider association and whether the
//! synthetic scope is installed at all.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hir::FqName;

/// Default fully qualified name of the marker annotation.
pub const DEFAULT_MARKER_ANNOTATION: &str = "kotlin.annotations.jvm.internal.Compat";

/// Errors raised while loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid compat configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("`marker_annotation` must be a qualified name, got `{0}`")]
    InvalidMarker(String),
}

/// Configuration for provider discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatConfig {
    /// Install the compat synthetic scope.
    pub enabled: bool,

    /// Fully qualified name of the annotation that names a provider class.
    pub marker_annotation: String,

    /// Name of the single string argument holding the provider's name.
    pub value_argument: String,
}

impl Default for CompatConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            marker_annotation: DEFAULT_MARKER_ANNOTATION.to_string(),
            value_argument: "value".to_string(),
        }
    }
}

impl CompatConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: CompatConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// The marker annotation as a qualified name.
    pub fn marker_fq_name(&self) -> FqName {
        FqName::new(&self.marker_annotation)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let marker = self.marker_annotation.trim();
        if marker.is_empty() || marker.starts_with('.') || marker.ends_with('.') {
            return Err(ConfigError::InvalidMarker(self.marker_annotation.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = CompatConfig::default();
        assert!(config.enabled);
        assert_eq!(config.marker_annotation, DEFAULT_MARKER_ANNOTATION);
        assert_eq!(config.value_argument, "value");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = CompatConfig::from_toml_str("enabled = false\n").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.marker_annotation, DEFAULT_MARKER_ANNOTATION);
    }

    #[test]
    fn test_custom_marker() {
        let config = CompatConfig::from_toml_str(
            "marker_annotation = \"androidx.annotation.Compat\"\nvalue_argument = \"provider\"\n",
        )
        .unwrap();
        assert_eq!(config.marker_fq_name().as_str(), "androidx.annotation.Compat");
        assert_eq!(config.value_argument, "provider");
    }

    #[test]
    fn test_invalid_marker() {
        let err = CompatConfig::from_toml_str("marker_annotation = \"Compat.\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidMarker(_)));
    }

    #[test]
    fn test_parse_error() {
        let err = CompatConfig::from_toml_str("enabled = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "value_argument = \"name\"").unwrap();
        let config = CompatConfig::load(file.path()).unwrap();
        assert_eq!(config.value_argument, "name");
        assert!(config.enabled);
    }
}
