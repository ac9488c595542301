//! Theme colors for the gallery.
//! Reads `key #hex` lines from theme.conf next to config.toml.

use ratatui::style::Color;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::util::color::Rgb;

/// Theme colors for the UI
#[derive(Debug, Clone)]
pub struct Theme {
    pub accent: Color,        // Active borders, highlights
    pub danger: Color,        // Errors, cancel buttons
    pub success: Color,       // Success notifications
    pub warning: Color,       // Warnings
    pub text: Color,          // Primary text
    pub text_dim: Color,      // Secondary text, other-month days
    pub bg_selected: Color,   // Selection background
    pub inactive: Color,      // Inactive borders
    pub header: Color,        // Month label, section titles
    pub today: Color,         // Today's cell
    pub special: Color,       // Special days without their own color
    pub disabled: Color,      // Disabled days
}

impl Default for Theme {
    fn default() -> Self {
        // Catppuccin-inspired fallback
        Self {
            accent: Color::Rgb(250, 179, 135),
            danger: Color::Rgb(243, 139, 168),
            success: Color::Rgb(166, 218, 149),
            warning: Color::Rgb(249, 226, 175),
            text: Color::Rgb(205, 214, 244),
            text_dim: Color::Rgb(147, 153, 178),
            bg_selected: Color::Rgb(69, 71, 90),
            inactive: Color::Rgb(88, 91, 112),
            header: Color::Rgb(137, 180, 250),
            today: Color::Rgb(148, 226, 213),
            special: Color::Rgb(203, 166, 247),
            disabled: Color::Rgb(88, 91, 112),
        }
    }
}

impl Theme {
    /// Load theme.conf from `dir`, falling back to defaults
    pub fn load(dir: Option<&Path>) -> Self {
        let Some(dir) = dir else {
            return Self::default();
        };

        let path = dir.join("theme.conf");
        match fs::read_to_string(&path) {
            Ok(content) => {
                tracing::debug!("Loading theme from {}", path.display());
                Self::from_conf(&content)
            }
            Err(_) => Self::default(),
        }
    }

    /// Overlay the keys present in a theme.conf body onto the defaults
    pub fn from_conf(content: &str) -> Self {
        let colors = Self::parse_conf(content);
        let base = Self::default();
        let pick = |key: &str, fallback: Color| colors.get(key).copied().unwrap_or(fallback);

        Self {
            accent: pick("accent", base.accent),
            danger: pick("danger", base.danger),
            success: pick("success", base.success),
            warning: pick("warning", base.warning),
            text: pick("foreground", base.text),
            text_dim: pick("dim", base.text_dim),
            bg_selected: pick("selection_background", base.bg_selected),
            inactive: pick("inactive_border_color", base.inactive),
            header: pick("header", base.header),
            today: pick("today", base.today),
            special: pick("special", base.special),
            disabled: pick("disabled", base.disabled),
        }
    }

    /// Parse `key #hexcolor` lines; comments and non-colors are skipped
    fn parse_conf(content: &str) -> HashMap<String, Color> {
        let mut colors = HashMap::new();

        for line in content.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some((key, value)) = line.split_once(char::is_whitespace) {
                match Rgb::parse_hex(value) {
                    Some(rgb) => {
                        colors.insert(key.trim().to_string(), Color::from(rgb));
                    }
                    None => tracing::debug!("Skipping theme line {:?}", line),
                }
            }
        }

        colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_conf_overrides_known_keys() {
        let theme = Theme::from_conf(
            "# my theme\naccent #ffc107\ntoday   #0f0\nforeground not-a-color\nunknown #123456\n",
        );
        assert_eq!(theme.accent, Color::Rgb(255, 193, 7));
        assert_eq!(theme.today, Color::Rgb(0, 255, 0));
        assert_eq!(theme.text, Theme::default().text);
    }

    #[test]
    fn test_missing_dir_uses_defaults() {
        let theme = Theme::load(Some(Path::new("/nonexistent/trellis")));
        assert_eq!(theme.header, Theme::default().header);
    }
}
