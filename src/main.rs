//! Binary entry point for j2d.
//!
//! Imports a Journey journal export into Day One:
//! `j2d <journal> <export-directory>`.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use j2d::config::J2dConfig;
use j2d::observability::{self, InitOptions};
use j2d::{DayOneImporter, ImportOptions, ImportService};
use std::path::PathBuf;
use std::process::ExitCode;

/// j2d - imports a Journey journal export into Day One.
#[derive(Parser)]
#[command(name = "j2d")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Name of the Day One journal to import into.
    journal: String,

    /// Path to the extracted Journey export directory.
    export_dir: PathBuf,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the dayone2 binary.
    #[arg(long, env = "J2D_DAYONE_BIN")]
    dayone_bin: Option<String>,

    /// Validate and report without creating any Day One entries.
    #[arg(long)]
    dry_run: bool,

    /// Where to write the missing-attachment report.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Skip writing the missing-attachment report.
    #[arg(long, conflicts_with = "report")]
    no_report: bool,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&InitOptions {
        verbose: cli.verbose,
        log_file: config.log_file.clone(),
    }) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(cli, config) {
        Ok(true) => ExitCode::SUCCESS,
        // Entries failed; the summary already named them.
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the import and reports whether every entry avoided failure.
fn run(cli: Cli, mut config: J2dConfig) -> Result<bool, Box<dyn std::error::Error>> {
    let export_dir = expand_tilde(&cli.export_dir);

    // CLI flags override the config file.
    if let Some(binary) = cli.dayone_bin {
        config = config.with_dayone_bin(binary);
    }
    if let Some(report) = cli.report {
        config = config.with_missing_report(report);
    }

    let importer = DayOneImporter::new(cli.journal).with_binary(config.dayone_bin);

    let mut options = ImportOptions::default().with_dry_run(cli.dry_run);
    if !cli.no_report {
        options = options.with_missing_report(config.missing_report);
    }

    let service = ImportService::new(importer, options);
    let report = service.run(&export_dir)?;

    Ok(!report.summary.has_failures())
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> Result<J2dConfig, Box<dyn std::error::Error>> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return J2dConfig::load_from_file(std::path::Path::new(config_path))
            .map_err(std::convert::Into::into);
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("J2D_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return J2dConfig::load_from_file(std::path::Path::new(&config_path))
                .map_err(std::convert::Into::into);
        }
    }

    // Otherwise, load from default location
    J2dConfig::load_default().map_err(std::convert::Into::into)
}

/// Expands a leading `~` to the user's home directory.
fn expand_tilde(path: &std::path::Path) -> PathBuf {
    let Ok(stripped) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    directories::BaseDirs::new().map_or_else(
        || path.to_path_buf(),
        |base| base.home_dir().join(stripped),
    )
}
