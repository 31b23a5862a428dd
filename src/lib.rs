//! Wheel Copier - a CLI tool for collecting Python wheel files
//!
//! This library provides functionality for copying extension-matched files
//! from a source directory into a destination directory with support for:
//! - Skip-if-exists handling (existing destination files are never touched)
//! - Metadata preservation (permissions and modification time)
//! - TOML configuration with CLI overrides
//! - Dry run mode

pub mod cli;
pub mod config;
pub mod copier;
pub mod error;

pub use cli::Cli;
pub use config::{Config, ConfigError, DEFAULT_EXTENSION};
pub use copier::{Copier, CopyStats, CopyStatus, FileResult};
pub use error::{Error, Result};
