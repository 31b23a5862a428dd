//! CLI argument parsing with clap

use crate::config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Wheel Copier - collect Python wheel files into a project directory
///
/// Copies files with a matching extension from a source directory into a
/// destination directory, skipping files that already exist at the
/// destination and reporting a summary of the run.
#[derive(Parser, Debug)]
#[command(name = "wheel-copier")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file (TOML format)
    ///
    /// When specified, settings from the config file are used as defaults.
    /// CLI arguments will override config file settings.
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Source directory to scan for matching files
    #[arg(short, long, env = "WHEEL_COPIER_SOURCE")]
    pub source: Option<PathBuf>,

    /// Destination directory for copied files
    #[arg(short, long, env = "WHEEL_COPIER_DEST")]
    pub dest: Option<PathBuf>,

    /// File extension to match (without the leading dot)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Dry run mode - show what would be copied without copying
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Output log format as JSON
    #[arg(long)]
    pub json_log: bool,
}

impl Cli {
    /// Get config file name (without extension) for log naming
    pub fn config_name(&self) -> Option<String> {
        self.config.as_ref().and_then(|p| {
            p.file_stem()
                .and_then(|s| s.to_str())
                .map(|s| s.to_string())
        })
    }

    /// Merge CLI arguments with config from file
    /// CLI arguments take precedence over config file settings
    pub fn merge_with_config(&self, mut config: Config) -> Config {
        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref dest) = self.dest {
            config.dest_dir = dest.clone();
        }
        if let Some(ref extension) = self.extension {
            config.extension = extension.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if self.verbose {
            config.verbose = true;
        }

        config.normalize_extension();
        config
    }

    /// Convert CLI arguments to Config (when no config file is used)
    pub fn to_config(&self) -> Config {
        let mut config = Config::default();

        if let Some(ref source) = self.source {
            config.source_dir = source.clone();
        }
        if let Some(ref dest) = self.dest {
            config.dest_dir = dest.clone();
        }
        if let Some(ref extension) = self.extension {
            config.extension = extension.clone();
        }
        config.dry_run = self.dry_run;
        config.verbose = self.verbose;

        config.normalize_extension();
        config
    }
}
