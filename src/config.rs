//! Configuration types for the wheel copier

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default file extension to match in the source directory
pub const DEFAULT_EXTENSION: &str = "whl";

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

/// Configuration for the wheel copier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source directory to scan for matching files
    #[serde(default)]
    pub source_dir: PathBuf,

    /// Destination directory for copied files (created if absent)
    #[serde(default)]
    pub dest_dir: PathBuf,

    /// File extension to match (without the leading dot)
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Dry run mode - don't actually copy files
    #[serde(default)]
    pub dry_run: bool,

    /// Verbose output
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::new(),
            dest_dir: PathBuf::new(),
            extension: default_extension(),
            dry_run: false,
            verbose: false,
        }
    }
}

impl Config {
    /// Check whether a file extension matches the configured one
    pub fn matches_extension(&self, ext: &str) -> bool {
        ext.to_lowercase() == self.extension
    }

    /// Normalize the configured extension: lowercase, no leading dot
    pub fn normalize_extension(&mut self) {
        self.extension = self
            .extension
            .trim_start_matches('.')
            .to_lowercase();
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.normalize_extension();
        Ok(config)
    }
}

/// Errors that can occur when loading configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Failed to parse configuration file
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ReadError { path, source } => {
                write!(f, "Failed to read config file '{}': {}", path.display(), source)
            }
            ConfigError::ParseError { path, source } => {
                write!(f, "Failed to parse config file '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::ReadError { source, .. } => Some(source),
            ConfigError::ParseError { source, .. } => Some(source),
        }
    }
}
