//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! An explicit `--config <path>` is used as-is and must exist. Otherwise
//! the first existing file wins, searched in order:
//! 1. `$QTEST_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/qtest/config.toml`
//! 3. `~/.qtest/config.toml`
//!
//! A missing file is not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use strq::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("bufsize: {}", config.bufsize());
//! println!("error limit: {}", config.error_limit());
//! ```

pub mod schema;

pub use schema::FileConfig;

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default removal buffer capacity.
pub const DEFAULT_BUFSIZE: usize = 1024;

/// Largest accepted removal buffer capacity (1 MiB).
pub const MAX_BUFSIZE: usize = 1 << 20;

/// Default number of errors tolerated before a run stops.
pub const DEFAULT_ERROR_LIMIT: usize = 5;

/// Check a removal buffer capacity against `1..=MAX_BUFSIZE`.
///
/// # Errors
///
/// Returns `ConfigError::InvalidValue` when `bufsize` is out of range.
pub fn check_bufsize(bufsize: usize) -> Result<usize, ConfigError> {
    if (1..=MAX_BUFSIZE).contains(&bufsize) {
        Ok(bufsize)
    } else {
        Err(ConfigError::InvalidValue(format!(
            "bufsize must be between 1 and {}, got {}",
            MAX_BUFSIZE, bufsize
        )))
    }
}

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Loaded configuration.
///
/// Accessors apply defaults for anything the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Values read from the config file
    pub file: FileConfig,
    /// Path the file was loaded from, if any
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `explicit` is given but unreadable, or if any
    /// config file found cannot be parsed or fails validation.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => Self::search_paths().into_iter().find(|p| p.exists()),
        };

        match path {
            Some(path) => Self::load_file(&path),
            None => Ok(Config::default()),
        }
    }

    /// Candidate locations for the config file, in search order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var("QTEST_CONFIG") {
            paths.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_home).join("qtest/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".qtest/config.toml"));
        }

        paths
    }

    /// Read, parse, and validate a single config file.
    fn load_file(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        Ok(Config {
            file,
            path: Some(path.to_path_buf()),
        })
    }

    /// Removal buffer capacity. Defaults to [`DEFAULT_BUFSIZE`].
    pub fn bufsize(&self) -> usize {
        self.file.bufsize.unwrap_or(DEFAULT_BUFSIZE)
    }

    /// Error limit. Defaults to [`DEFAULT_ERROR_LIMIT`].
    pub fn error_limit(&self) -> usize {
        self.file.error_limit.unwrap_or(DEFAULT_ERROR_LIMIT)
    }

    /// Whether commands are echoed. Defaults to `false`.
    pub fn echo(&self) -> bool {
        self.file.echo.unwrap_or(false)
    }

    /// Get the path the configuration was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Render the effective configuration (defaults applied) as TOML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let effective = FileConfig {
            bufsize: Some(self.bufsize()),
            error_limit: Some(self.error_limit()),
            echo: Some(self.echo()),
        };
        toml::to_string_pretty(&effective).map_err(|e| ConfigError::InvalidValue(e.to_string()))
    }
}
