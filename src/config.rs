//! Configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Default filename of the missing-attachment report.
pub const DEFAULT_MISSING_REPORT: &str = "missing-attachments-report.json";

/// Main configuration for j2d.
#[derive(Debug, Clone)]
pub struct J2dConfig {
    /// Path or name of the Day One command-line binary.
    pub dayone_bin: String,
    /// Optional log file, written in addition to the console log.
    pub log_file: Option<PathBuf>,
    /// Where to write the missing-attachment report.
    pub missing_report: PathBuf,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Day One binary path.
    pub dayone_bin: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
    /// Missing-attachment report path.
    pub missing_report: Option<String>,
}

impl Default for J2dConfig {
    fn default() -> Self {
        Self {
            dayone_bin: crate::dayone::DEFAULT_DAYONE_BIN.to_string(),
            log_file: None,
            missing_report: PathBuf::from(DEFAULT_MISSING_REPORT),
        }
    }
}

impl J2dConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &std::path::Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        let file: ConfigFile =
            toml::from_str(&contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the following paths in order:
    /// 1. Platform-specific config dir (`~/Library/Application Support/j2d/` on macOS)
    /// 2. XDG config dir (`~/.config/j2d/` for Unix compatibility)
    ///
    /// Returns default configuration if no config file is found.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists at one of the default
    /// locations but cannot be read or parsed. A broken file must not be
    /// silently ignored, or its overrides would go missing without a trace.
    pub fn load_default() -> crate::Result<Self> {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Ok(Self::default());
        };

        let candidates = [
            base_dirs.config_dir().join("j2d").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("j2d")
                .join("config.toml"),
        ];
        Self::load_first_existing(&candidates)
    }

    /// Loads the first existing candidate path, or defaults when none exist.
    fn load_first_existing(candidates: &[PathBuf]) -> crate::Result<Self> {
        for path in candidates {
            if path.exists() {
                return Self::load_from_file(path);
            }
        }
        Ok(Self::default())
    }

    /// Converts a `ConfigFile` to `J2dConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(dayone_bin) = file.dayone_bin {
            config.dayone_bin = dayone_bin;
        }
        config.log_file = file.log_file.map(PathBuf::from);
        if let Some(missing_report) = file.missing_report {
            config.missing_report = PathBuf::from(missing_report);
        }

        config
    }

    /// Sets the Day One binary.
    #[must_use]
    pub fn with_dayone_bin(mut self, bin: impl Into<String>) -> Self {
        self.dayone_bin = bin.into();
        self
    }

    /// Sets the missing-attachment report path.
    #[must_use]
    pub fn with_missing_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.missing_report = path.into();
        self
    }
}
