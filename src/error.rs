//! Centralized error types for selectkit.
//!
//! The components themselves never fail; errors come from loading
//! configuration and driving the terminal. All error types use `thiserror`.

use thiserror::Error;

use crate::config::ConfigError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// The terminal could not be set up, drawn to or read from.
    #[error("{context}: {source}")]
    Terminal {
        /// What was being done with the terminal.
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl AppError {
    /// Wrap a terminal IO failure with what was being attempted.
    pub fn terminal(context: &'static str, source: std::io::Error) -> Self {
        AppError::Terminal { context, source }
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "No configuration directory was found; using the default settings.".to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create the configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read the configuration file. Check that it is readable.".to_string()
                }
                ConfigError::WriteError(_) | ConfigError::SerializeError(_) => {
                    "Could not save the configuration.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "The configuration file is not valid TOML.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Terminal { context, .. } => format!("{}. Is this an interactive terminal?", context),
        }
    }

    /// Check if this error prevents the application from starting.
    ///
    /// A missing config directory only means there is nothing to load, so
    /// the defaults are used instead.
    pub fn is_critical(&self) -> bool {
        !matches!(self, AppError::Config(ConfigError::NoConfigDir))
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix the config file, or remove it to fall back to the defaults.")
            }
            AppError::Config(ConfigError::NoConfigDir) => {
                Some("Pass --config or set SELECTKIT_CONFIG to choose a config file.")
            }
            AppError::Terminal { .. } => Some("Run selectkit in an interactive terminal."),
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_error() -> std::io::Error {
        std::io::Error::new(std::io::ErrorKind::Other, "not a tty")
    }

    #[test]
    fn test_app_error_from_config_error() {
        let app_err: AppError = ConfigError::NoConfigDir.into();
        assert!(matches!(app_err, AppError::Config(ConfigError::NoConfigDir)));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError(
            "max_visible_options must be at least 1".to_string(),
        ));
        assert!(err.user_message().contains("max_visible_options"));
    }

    #[test]
    fn test_missing_config_dir_is_not_critical() {
        assert!(!AppError::Config(ConfigError::NoConfigDir).is_critical());
    }

    #[test]
    fn test_invalid_config_is_critical() {
        assert!(AppError::Config(ConfigError::ValidationError("bad".to_string())).is_critical());
        let parse = toml::from_str::<toml::Value>("= broken").unwrap_err();
        assert!(AppError::Config(ConfigError::ParseError(parse)).is_critical());
    }

    #[test]
    fn test_suggested_action_validation() {
        let err = AppError::Config(ConfigError::ValidationError("bad".to_string()));
        assert!(err.suggested_action().unwrap().contains("config file"));
        let err = AppError::Config(ConfigError::ReadError(io_error()));
        assert!(err.suggested_action().is_none());
    }

    #[test]
    fn test_terminal_error() {
        let err = AppError::terminal("Failed to enable raw mode", io_error());
        assert!(err.is_critical());
        assert_eq!(err.to_string(), "Failed to enable raw mode: not a tty");
        assert!(err.user_message().starts_with("Failed to enable raw mode."));
        assert!(std::error::Error::source(&err).is_some());
    }
}
