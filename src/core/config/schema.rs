//! core::config::schema
//!
//! Configuration file schema.
//!
//! # Validation
//!
//! Values are validated after parsing. Unknown keys are rejected so that
//! typos surface instead of silently falling back to defaults.

use serde::{Deserialize, Serialize};

use super::{check_bufsize, ConfigError};

/// Harness configuration file.
///
/// # Example
///
/// ```toml
/// bufsize = 1024
/// error_limit = 5
/// echo = false
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Capacity of the buffer removed values are copied into, terminator
    /// included. Must be between 1 and [`super::MAX_BUFSIZE`].
    pub bufsize: Option<usize>,

    /// Stop after this many reported errors
    pub error_limit: Option<usize>,

    /// Echo each command before running it
    pub echo: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(bufsize) = self.bufsize {
            check_bufsize(bufsize)?;
        }
        if self.error_limit == Some(0) {
            return Err(ConfigError::InvalidValue(
                "error_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::MAX_BUFSIZE;

    #[test]
    fn parse_full_config() {
        let config: FileConfig = toml::from_str(
            r#"
            bufsize = 16
            error_limit = 2
            echo = true
            "#,
        )
        .unwrap();

        assert_eq!(config.bufsize, Some(16));
        assert_eq!(config.error_limit, Some(2));
        assert_eq!(config.echo, Some(true));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_config_is_all_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("buffer = 3");
        assert!(result.is_err());
    }

    #[test]
    fn zero_error_limit_rejected() {
        let config = FileConfig {
            error_limit: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn zero_bufsize_rejected() {
        let config: FileConfig = toml::from_str("bufsize = 0").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn bufsize_bounds() {
        let at = |n| FileConfig {
            bufsize: Some(n),
            ..Default::default()
        };
        assert!(at(1).validate().is_ok());
        assert!(at(MAX_BUFSIZE).validate().is_ok());
        assert!(at(MAX_BUFSIZE + 1).validate().is_err());
        assert!(at(usize::MAX).validate().is_err());
    }
}
