//! Application settings configuration.

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::ui::theme::THEME_NAMES;

/// Application-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The UI theme to use.
    pub theme: String,
    /// Whether to use vim-style keybindings.
    pub vim_mode: bool,
    /// Rows shown in an open panel before it scrolls.
    pub max_visible_options: usize,
    /// Trigger text when nothing is selected.
    pub placeholder: String,
    /// Search input text while the query is empty.
    pub search_placeholder: String,
    /// Panel text when no option matches.
    pub empty_text: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            vim_mode: true,
            max_visible_options: 8,
            placeholder: "Select...".to_string(),
            search_placeholder: "Search...".to_string(),
            empty_text: "No results found.".to_string(),
        }
    }
}

impl Settings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError::ValidationError` naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.max_visible_options == 0 {
            return Err(ConfigError::ValidationError(
                "max_visible_options must be at least 1".to_string(),
            ));
        }

        if !THEME_NAMES.contains(&self.theme.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown theme '{}' (expected one of: {})",
                self.theme,
                THEME_NAMES.join(", ")
            )));
        }

        for (field, value) in [
            ("placeholder", &self.placeholder),
            ("search_placeholder", &self.search_placeholder),
            ("empty_text", &self.empty_text),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{} cannot be empty",
                    field
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_zero_visible_rows_rejected() {
        let settings = Settings {
            max_visible_options: 0,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("max_visible_options"));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let settings = Settings {
            theme: "solarized".to_string(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("solarized"));
    }

    #[test]
    fn test_blank_placeholder_rejected() {
        let settings = Settings {
            search_placeholder: "  ".to_string(),
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("search_placeholder"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let settings: Settings = toml::from_str("vim_mode = false").unwrap();
        assert!(!settings.vim_mode);
        assert_eq!(settings.theme, "dark");
        assert_eq!(settings.max_visible_options, 8);
    }
}
