//! Configuration loading and typed config structures for Server Shepherd.
//!
//! The canonical configuration lives in `shepherd-config.yaml` at the
//! project root. This module defines strongly-typed structs mirroring the
//! YAML structure and provides a loader that reads and validates the file.
//! Every section and every field is optional; defaults suit a standalone
//! local deployment.

use std::path::Path;

use serde::Deserialize;

use crate::layout::LayoutConfig;
use crate::store::DEFAULT_CAPACITY;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration for the observer server and dashboard core.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ShepherdConfig {
    /// HTTP/WebSocket server settings.
    #[serde(default)]
    pub server: ServerSection,

    /// Event store settings.
    #[serde(default)]
    pub store: StoreSection,

    /// Dashboard canvas geometry.
    #[serde(default)]
    pub layout: LayoutConfig,
}

impl ShepherdConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for the bind address:
    /// - `SHEPHERD_HOST` overrides `server.host`
    /// - `SHEPHERD_PORT` overrides `server.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a YAML file, falling back to defaults when
    /// the file does not exist.
    ///
    /// Environment overrides apply in both cases, so `SHEPHERD_HOST` and
    /// `SHEPHERD_PORT` work without a file on disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if an existing file cannot be read, or
    /// [`ConfigError::Yaml`] if its content is not valid YAML.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        let mut config = Self::default();
        config.server.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// Pure with respect to the environment; overrides are applied only by
    /// the file loaders.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// HTTP/WebSocket server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerSection {
    /// The host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// The TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerSection {
    /// Apply environment variable overrides for the bind address.
    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SHEPHERD_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SHEPHERD_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
        {
            self.port = port;
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Event store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreSection {
    /// Maximum number of recent events retained and streamed to clients.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    8000
}

const fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config = ShepherdConfig::parse("{}").unwrap_or_default();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.store.capacity, 200);
        assert_eq!(config.layout.columns, 6);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let yaml = r"
server:
  port: 9100
layout:
  columns: 4
";
        let config = ShepherdConfig::parse(yaml).unwrap_or_default();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.layout.columns, 4);
        assert!((config.layout.width - 800.0).abs() < f64::EPSILON);
        assert_eq!(config.store.capacity, 200);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = Path::new("no-such-shepherd-config.yaml");
        let config = ShepherdConfig::load_or_default(path).unwrap_or_default();
        assert_eq!(config.store.capacity, 200);
        assert_eq!(config.layout.columns, 6);
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        assert!(ShepherdConfig::parse("server: [not, a, map]").is_err());
    }
}
