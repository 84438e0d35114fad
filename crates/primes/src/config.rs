//! Configuration for the `compute_primes` binary
//!
//! Defaults are embedded from `defaults.toml`; `--config` loads a user file
//! whose missing keys fall back to those defaults.

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
            ConfigError::LogDirective(level) => write!(f, "Invalid log level '{}'", level),
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

/// Handling of [`crate::SieveError::Allocation`] in the binary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllocFailurePolicy {
    /// Print nothing and exit successfully
    #[default]
    Silent,
    /// Print the error to stderr and exit with status 1
    Report,
}

impl AllocFailurePolicy {
    /// Process exit status after an aborted sieve
    pub fn exit_code(&self) -> i32 {
        match self {
            AllocFailurePolicy::Silent => 0,
            AllocFailurePolicy::Report => 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SieveConfig {
    pub on_alloc_failure: AllocFailurePolicy,
}

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
pub struct PrimesConfig {
    pub sieve: SieveConfig,
    pub log: LogConfig,
}

impl PrimesConfig {
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
        let Some(path) = path else {
            return Self::default_config();
        };
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Filter directive enabling this crate's logs at the configured level
    pub fn log_directive(&self) -> Result<Directive, ConfigError> {
        format!("compute_primes={}", self.log.level)
            .parse()
            .map_err(|_| ConfigError::LogDirective(self.log.level.clone()))
    }
}
