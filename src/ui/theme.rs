//! Theme management and ratatui style construction.
//!
//! Themes are TOML documents with hex colors. The built-in ones are embedded in
//! the binary; custom themes can be loaded from files.
//!
//! # Built-in Themes
//!
//! - `rose-pine`: dark (default)
//! - `rose-pine-dawn`: light
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! title_fg = "#ebbcba"
//! selection_fg = "#191724"
//! selection_bg = "#c4a7e7"
//! text_normal = "#e0def4"
//! text_dim = "#6e6a86"
//! border = "#403d52"
//! border_focused = "#c4a7e7"
//! match_highlight_fg = "#f6c177"
//! section_fg = "#9ccfd8"
//! indicator_fg = "#31748f"
//! info_fg = "#9ccfd8"
//! warning_fg = "#f6c177"
//! error_fg = "#eb6f92"
//! ```

use crate::app::Severity;
use crate::domain::error::{BrowseError, Result};
use ratatui::style::{Color, Modifier, Style};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none or an unknown one is configured.
pub const DEFAULT_THEME: &str = "rose-pine";

/// Color scheme configuration for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions for all UI elements, as hex strings (e.g. `"#e0def4"`).
///
/// Invalid or empty values fall back to the terminal's default color.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Pane titles.
    pub title_fg: String,
    /// Highlighted row foreground.
    pub selection_fg: String,
    /// Highlighted row background.
    pub selection_bg: String,
    /// Normal text.
    pub text_normal: String,
    /// Secondary text (footer, counts).
    pub text_dim: String,
    /// Pane borders.
    pub border: String,
    /// Border of the pane receiving text input.
    pub border_focused: String,
    /// Matched characters in filtered package names.
    pub match_highlight_fg: String,
    /// Platform section rows in the versions view.
    pub section_fg: String,
    /// Channel, platform and filter indicators.
    pub indicator_fg: String,
    /// Information notifications.
    pub info_fg: String,
    /// Warning notifications.
    pub warning_fg: String,
    /// Error notifications.
    pub error_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conda_browse::ui::theme::Theme;
    ///
    /// let theme = Theme::from_name("rose-pine").unwrap();
    /// assert_eq!(theme.name, "rose-pine");
    /// assert!(Theme::from_name("missing").is_none());
    /// ```
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "rose-pine" => include_str!("../../themes/rose-pine.toml"),
            "rose-pine-dawn" => include_str!("../../themes/rose-pine-dawn.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Resolves a configured theme: a built-in name, a path to a TOML file, or
    /// the default theme when neither works.
    #[must_use]
    pub fn resolve(name_or_path: &str) -> Self {
        if let Some(theme) = Self::from_name(name_or_path) {
            return theme;
        }
        match Self::from_file(name_or_path) {
            Ok(theme) => theme,
            Err(e) => {
                tracing::warn!(theme = name_or_path, error = %e, "falling back to default theme");
                Self::default()
            }
        }
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| BrowseError::Theme(format!("Failed to read theme file: {e}")))?;

        toml::from_str(&contents).map_err(|e| BrowseError::Theme(format!("Failed to parse theme TOML: {e}")))
    }

    /// Converts a hex color to a ratatui color. Invalid input yields
    /// [`Color::Reset`].
    #[must_use]
    pub fn color(hex: &str) -> Color {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Color::Reset;
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        match (channel(0..2), channel(2..4), channel(4..6)) {
            (Some(r), Some(g), Some(b)) => Color::Rgb(r, g, b),
            _ => Color::Reset,
        }
    }

    fn fg(hex: &str) -> Style {
        Style::default().fg(Self::color(hex))
    }

    #[must_use]
    pub fn text(&self) -> Style {
        Self::fg(&self.colors.text_normal)
    }

    #[must_use]
    pub fn text_dim(&self) -> Style {
        Self::fg(&self.colors.text_dim)
    }

    #[must_use]
    pub fn title(&self) -> Style {
        Self::fg(&self.colors.title_fg).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn border(&self) -> Style {
        Self::fg(&self.colors.border)
    }

    #[must_use]
    pub fn border_focused(&self) -> Style {
        Self::fg(&self.colors.border_focused)
    }

    #[must_use]
    pub fn selection(&self) -> Style {
        Style::default()
            .fg(Self::color(&self.colors.selection_fg))
            .bg(Self::color(&self.colors.selection_bg))
            .add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn match_highlight(&self) -> Style {
        Self::fg(&self.colors.match_highlight_fg).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn section(&self) -> Style {
        Self::fg(&self.colors.section_fg).add_modifier(Modifier::BOLD)
    }

    #[must_use]
    pub fn indicator(&self) -> Style {
        Self::fg(&self.colors.indicator_fg)
    }

    /// Style of a notification border and title.
    #[must_use]
    pub fn severity(&self, severity: Severity) -> Style {
        let hex = match severity {
            Severity::Information => &self.colors.info_fg,
            Severity::Warning => &self.colors.warning_fg,
            Severity::Error => &self.colors.error_fg,
        };
        Self::fg(hex).add_modifier(Modifier::BOLD)
    }
}

impl Default for Theme {
    /// Returns the built-in `rose-pine` theme, or a colorless theme if it fails
    /// to parse.
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "plain".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_themes_parse() {
        for name in ["rose-pine", "rose-pine-dawn"] {
            let theme = Theme::from_name(name).unwrap();
            assert_eq!(theme.name, name);
            assert_ne!(Theme::color(&theme.colors.text_normal), Color::Reset);
        }
    }

    #[test]
    fn default_is_rose_pine() {
        assert_eq!(Theme::default().name, DEFAULT_THEME);
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(Theme::color("#ff8000"), Color::Rgb(255, 128, 0));
        assert_eq!(Theme::color("00ff00"), Color::Rgb(0, 255, 0));
        assert_eq!(Theme::color("#fff"), Color::Reset);
        assert_eq!(Theme::color("#gg0000"), Color::Reset);
    }

    #[test]
    fn unknown_theme_resolves_to_default() {
        assert_eq!(Theme::resolve("does-not-exist").name, DEFAULT_THEME);
    }

    #[test]
    fn loads_theme_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        let mut contents = include_str!("../../themes/rose-pine.toml").replace("rose-pine", "custom");
        contents.push('\n');
        std::fs::write(&path, contents).unwrap();

        let theme = Theme::resolve(path.to_str().unwrap());
        assert_eq!(theme.name, "custom");
    }
}
