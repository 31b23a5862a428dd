//! Wheel Copier - collect Python wheel files into a project directory
//!
//! A CLI tool that copies extension-matched files from a source directory
//! into a destination directory, skipping files that already exist at the
//! destination and reporting a summary of the run.

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{Level, error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wheel_copier::{Cli, Config, Copier, CopyStatus};

// CLI Output Module
mod cli_output {
    //! Styled console output helpers.
    //!
    //! Provides consistent colors and formatting for command-line output.

    use crossterm::{
        ExecutableCommand,
        style::{Color, Print, Stylize, style},
    };
    use std::io::stdout;

    /// CLI theme colors
    pub struct CliTheme;

    impl CliTheme {
        /// Success color (green)
        pub const SUCCESS: Color = Color::Green;
        /// Warning color (yellow)
        pub const WARNING: Color = Color::Yellow;
        /// Error color (red)
        pub const ERROR: Color = Color::Red;
        /// Hint color (dark grey)
        pub const HINT: Color = Color::DarkGrey;
        /// Accent color (cyan)
        pub const ACCENT: Color = Color::Cyan;
    }

    /// Print a separator line
    pub fn print_separator() {
        let _ = stdout().execute(Print(&format!("{}\n", "─".repeat(60))));
    }

    /// Print a warning message
    pub fn print_warning(msg: &str) {
        let _ = stdout().execute(Print(style("⚠ ").with(CliTheme::WARNING).bold()));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a hint message
    pub fn print_hint(msg: &str) {
        let _ = stdout().execute(Print(style("→ ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", msg)));
    }

    /// Print a statistic entry
    pub fn print_stat(key: &str, value: &str, color: Color) {
        let key_styled = style(key).with(CliTheme::HINT);
        let value_styled = style(value).with(color).bold();
        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(key_styled));
        let _ = stdout().execute(Print(": "));
        let _ = stdout().execute(Print(value_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print a per-file result line
    pub fn print_result(status_icon: &str, status_color: Color, source: &str, msg: &str) {
        let icon_styled = style(status_icon).with(status_color).bold();
        let source_styled = style(source).italic();
        let msg_styled = style(msg).with(CliTheme::HINT);

        let _ = stdout().execute(Print("  "));
        let _ = stdout().execute(Print(icon_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(source_styled));
        let _ = stdout().execute(Print(" "));
        let _ = stdout().execute(Print(msg_styled));
        let _ = stdout().execute(Print("\n"));
    }

    /// Print the log file path
    pub fn print_log_path(path: &str) {
        let _ = stdout().execute(Print("\n"));
        let _ = stdout().execute(Print(style("  📁 ").with(CliTheme::ACCENT)));
        let _ = stdout().execute(Print(style("Log file: ").with(CliTheme::HINT)));
        let _ = stdout().execute(Print(format!("{}\n", path)));
    }

    /// Print an empty line
    pub fn print_blank() {
        let _ = stdout().execute(Print("\n"));
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Get the executable directory for Config and Log directories
    let exe_dir = get_executable_dir()?;

    // Determine log file path based on config file or timestamp
    let log_path = get_log_path(&exe_dir, &cli);

    // Setup logging
    let _guard = setup_logging(&cli, &log_path)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Wheel Copier starting"
    );

    // Load configuration
    let config = load_config(&cli, &exe_dir)?;

    // Log configuration
    if cli.verbose {
        info!(?config, "Configuration loaded");
    }

    // Log to file location
    info!(log_file = %log_path.display(), "Log file location");

    // Validate configuration
    validate_config(&config)?;

    // Create and run copier
    let mut copier = Copier::new(config.clone());

    match copier.run() {
        Ok(results) => {
            use cli_output::*;

            let stats = copier.stats();

            if results.is_empty() {
                print_warning(&format!(
                    "No .{} files found in {}",
                    config.extension,
                    config.source_dir.display()
                ));
                info!("No matching files found");
                return Ok(());
            }

            print_hint(&format!(
                "Found {} .{} file(s) in {}",
                stats.found,
                config.extension,
                config.source_dir.display()
            ));
            print_hint(&format!("Copying to {}", config.dest_dir.display()));
            print_blank();

            for result in &results {
                let name = result
                    .source
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| result.source.display().to_string());

                match result.status {
                    CopyStatus::Copied => {
                        print_result("✓", CliTheme::SUCCESS, &name, "copied");
                    }
                    CopyStatus::Skipped => {
                        print_result("⚠", CliTheme::WARNING, &name, "(already exists)");
                    }
                    CopyStatus::Failed => {
                        let error_msg = result.error.as_deref().unwrap_or("unknown error");
                        print_result("✗", CliTheme::ERROR, &name, error_msg);
                    }
                    CopyStatus::DryRun => {
                        print_result("~", CliTheme::ACCENT, &name, "(dry run)");
                    }
                }
            }

            // Print summary block
            print_blank();
            print_separator();
            print_hint("Summary:");
            print_stat("Copied", &stats.copied.to_string(), CliTheme::SUCCESS);
            print_stat("Skipped", &stats.skipped.to_string(), CliTheme::WARNING);
            print_stat("Errors", &stats.errors.to_string(), CliTheme::ERROR);
            print_separator();

            if config.dry_run {
                print_warning("[DRY RUN] No files were actually copied.");
            }

            // Print log file path
            print_log_path(&log_path.display().to_string());

            info!(log_file = %log_path.display(), "Run complete. Log saved to");

            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Run failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Get the directory where the executable is located
fn get_executable_dir() -> Result<PathBuf> {
    let exe_path = std::env::current_exe()?;
    Ok(exe_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Determine the log file path based on config file or timestamp
fn get_log_path(exe_dir: &Path, cli: &Cli) -> PathBuf {
    let log_dir = exe_dir.join("Log");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");

    if let Some(config_name) = cli.config_name() {
        let config_log_dir = log_dir.join(&config_name);
        let log_filename = format!("{}_{}.log", config_name, timestamp);
        config_log_dir.join(log_filename)
    } else {
        let log_filename = format!("Run_{}.log", timestamp);
        log_dir.join(log_filename)
    }
}

/// Resolve config path - supports shorthand syntax
fn resolve_config_path(exe_dir: &Path, config_path: &Path) -> PathBuf {
    if config_path.exists() {
        return config_path.to_path_buf();
    }

    let with_extension = if config_path.extension().is_none() {
        config_path.with_extension("toml")
    } else {
        config_path.to_path_buf()
    };

    if with_extension.exists() {
        return with_extension;
    }

    let config_dir = exe_dir.join("Config");
    let filename = config_path.file_name().unwrap_or(config_path.as_os_str());

    let mut in_config_dir = config_dir.join(filename);
    if in_config_dir.extension().is_none() {
        in_config_dir = in_config_dir.with_extension("toml");
    }

    if in_config_dir.exists() {
        return in_config_dir;
    }

    config_path.to_path_buf()
}

/// Load configuration from file or CLI arguments
fn load_config(cli: &Cli, exe_dir: &Path) -> Result<Config> {
    let config = if let Some(ref config_path) = cli.config {
        let resolved_path = resolve_config_path(exe_dir, config_path);
        info!(config_file = %resolved_path.display(), "Loading configuration from file");
        let file_config = Config::load_from_file(&resolved_path)?;
        cli.merge_with_config(file_config)
    } else {
        cli.to_config()
    };

    Ok(config)
}

/// Setup logging for CLI mode (file + console)
fn setup_logging(cli: &Cli, log_path: &Path) -> Result<Option<WorkerGuard>> {
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if cli.json_log {
        subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(non_blocking),
            )
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    Ok(Some(guard))
}

/// Validate configuration before running
fn validate_config(config: &Config) -> Result<()> {
    if config.source_dir.as_os_str().is_empty() {
        anyhow::bail!("No source directory specified. Use -s/--source or specify in config file.");
    }
    if config.dest_dir.as_os_str().is_empty() {
        anyhow::bail!(
            "No destination directory specified. Use -d/--dest or specify in config file."
        );
    }
    if config.extension.is_empty() {
        anyhow::bail!("File extension cannot be empty.");
    }

    if !config.source_dir.exists() {
        eprintln!(
            "Warning: source directory does not exist: {}",
            config.source_dir.display()
        );
    }

    if config.dest_dir != config.source_dir && config.dest_dir.starts_with(&config.source_dir) {
        anyhow::bail!(
            "Destination directory cannot be inside source directory: {} is inside {}",
            config.dest_dir.display(),
            config.source_dir.display()
        );
    }

    Ok(())
}
