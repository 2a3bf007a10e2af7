//! Theme and styling configuration.
//!
//! A single palette is installed once at startup with [`init_theme`] and
//! read by every component through [`theme`].

use std::sync::OnceLock;

use ratatui::style::Color;
use tracing::warn;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Color theme for the components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Primary foreground color.
    pub fg: Color,
    /// Primary background color (panels are filled with it).
    pub bg: Color,
    /// Accent for focused titles and selected rows.
    pub accent: Color,
    /// Border of an unfocused control.
    pub border: Color,
    /// Border of a focused control or open panel.
    pub border_focused: Color,
    /// Text typed by the user.
    pub input_fg: Color,
    /// Placeholder text.
    pub input_placeholder: Color,
    /// Secondary text (descriptions, hints).
    pub muted: Color,
    /// Disabled controls and options.
    pub disabled: Color,
    /// Chip text.
    pub chip_fg: Color,
    /// Chip background.
    pub chip_bg: Color,
    /// Background of the highlighted row.
    pub highlight_bg: Color,
    /// Foreground of the highlighted row.
    pub highlight_fg: Color,
}

impl Theme {
    /// The dark palette.
    pub fn dark() -> Self {
        Self {
            fg: Color::White,
            bg: Color::Black,
            accent: Color::Cyan,
            border: Color::DarkGray,
            border_focused: Color::Yellow,
            input_fg: Color::White,
            input_placeholder: Color::DarkGray,
            muted: Color::Gray,
            disabled: Color::DarkGray,
            chip_fg: Color::White,
            chip_bg: Color::Blue,
            highlight_bg: Color::Cyan,
            highlight_fg: Color::Black,
        }
    }

    /// The light palette.
    pub fn light() -> Self {
        Self {
            fg: Color::Black,
            bg: Color::White,
            accent: Color::Blue,
            border: Color::Gray,
            border_focused: Color::Blue,
            input_fg: Color::Black,
            input_placeholder: Color::Gray,
            muted: Color::DarkGray,
            disabled: Color::Gray,
            chip_fg: Color::White,
            chip_bg: Color::Magenta,
            highlight_bg: Color::Blue,
            highlight_fg: Color::White,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

/// Names accepted by [`load_theme`].
pub const THEME_NAMES: &[&str] = &["dark", "light"];

/// Build a theme by name. Unknown names fall back to dark.
pub fn load_theme(name: &str) -> Theme {
    match name {
        "dark" => Theme::dark(),
        "light" => Theme::light(),
        other => {
            warn!(theme = other, "Unknown theme, using dark");
            Theme::dark()
        }
    }
}

/// Install the global theme. Only the first call has an effect.
pub fn init_theme(theme: Theme) {
    let _ = THEME.set(theme);
}

/// Get the global theme.
pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_known_themes() {
        assert_eq!(load_theme("dark"), Theme::dark());
        assert_eq!(load_theme("light"), Theme::light());
    }

    #[test]
    fn test_unknown_theme_falls_back() {
        assert_eq!(load_theme("solarized"), Theme::dark());
    }

    #[test]
    fn test_theme_names_all_load() {
        for name in THEME_NAMES {
            let _ = load_theme(name);
        }
    }
}
