//! Configuration for the `compute_pi` binary
//!
//! Defaults are embedded from `defaults.toml`. A user file passed with
//! `--config` is parsed the same way; any key it leaves out keeps its default.
//!
//! ```toml
//! [output]
//! legacy_prompt = true
//!
//! [log]
//! level = "debug"
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::Directive;

/// Embedded default configuration
pub static DEFAULT_CONFIG: &str = include_str!("defaults.toml");

/// Errors raised while loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// The config file could not be read
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The TOML was malformed or had unknown keys
    Parse(toml::de::Error),
    /// `[log] level` did not form a valid filter directive
    LogDirective(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "Failed to read config {}: {}", path.display(), source)
            }
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::LogDirective(level) => {
                write!(f, "Invalid log level '{}'", level)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Read { source, .. } => Some(source),
            ConfigError::Parse(e) => Some(e),
            ConfigError::LogDirective(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Console output options
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Emit [`crate::LEGACY_PROMPT`] before the result line
    pub legacy_prompt: bool,
}

/// Logging options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "error".to_string(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PiConfig {
    pub output: OutputConfig,
    pub log: LogConfig,
}

impl PiConfig {
    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load the embedded defaults
    pub fn default_config() -> Result<Self, ConfigError> {
        Self::from_toml(DEFAULT_CONFIG)
    }

    /// Load from `path` if given, otherwise the embedded defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content)
            }
            None => Self::default_config(),
        }
    }

    /// Filter directive enabling this crate's logs at the configured level
    pub fn log_directive(&self) -> Result<Directive, ConfigError> {
        format!("compute_pi={}", self.log.level)
            .parse()
            .map_err(|_| ConfigError::LogDirective(self.log.level.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_defaults_match_default_impl() {
        let config = PiConfig::default_config().unwrap();
        assert_eq!(config, PiConfig::default());
        assert!(!config.output.legacy_prompt);
        assert_eq!(config.log.level, "error");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = PiConfig::from_toml("[output]\nlegacy_prompt = true\n").unwrap();
        assert!(config.output.legacy_prompt);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(PiConfig::from_toml("").unwrap(), PiConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = PiConfig::from_toml("[output]\niterations = 10\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("Failed to parse config"));
    }

    #[test]
    fn test_wrong_type_rejected() {
        let err = PiConfig::from_toml("[output]\nlegacy_prompt = \"yes\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[log]\nlevel = \"debug\"").unwrap();

        let config = PiConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.log.level, "debug");
        assert!(!config.output.legacy_prompt);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = PiConfig::load(Some(&path)).unwrap_err();
        match err {
            ConfigError::Read { path: p, .. } => assert_eq!(p, path),
            other => panic!("Expected Read error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_without_path_uses_defaults() {
        assert_eq!(PiConfig::load(None).unwrap(), PiConfig::default());
    }

    #[test]
    fn test_log_directive() {
        let config = PiConfig::default();
        assert_eq!(config.log_directive().unwrap().to_string(), "compute_pi=error");

        let mut bad = PiConfig::default();
        bad.log.level = "verbose".to_string();
        assert!(matches!(
            bad.log_directive(),
            Err(ConfigError::LogDirective(_))
        ));
    }
}
