//! Configuration for climenu.
//!
//! This module provides:
//! - TOML configuration file loading from `~/.climenu/config.toml`
//! - Highlight styling for the selected entry
//! - User-facing message texts
//!
//! # Configuration File
//!
//! ```toml
//! clear_screen = true
//! hide_cursor = true
//! prompt = "-> "
//! log_level = "info"
//!
//! [highlight]
//! foreground = "black"
//! background = "white"   # or "#rrggbb"
//! bold = true
//! underline = false
//! reverse = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};
use crate::ui::TextAttrs;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Clear the screen before each full redraw
    pub clear_screen: bool,
    /// Hide the cursor while waiting for keys
    pub hide_cursor: bool,
    /// Text in front of the echoed digit buffer
    pub prompt: String,
    /// Printed before an entry's action runs
    pub executing_message: String,
    /// Printed when an action asks to pause
    pub pause_message: String,
    /// Printed for an out-of-range selection; `{first}` and `{last}` are substituted
    pub range_message: String,
    /// Default log filter for the demo binary
    pub log_level: String,
    /// Selected entry styling
    pub highlight: HighlightConfig,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            clear_screen: true,
            hide_cursor: true,
            prompt: "-> ".to_string(),
            executing_message: "Executing operation ...".to_string(),
            pause_message: "Press enter to return to menu".to_string(),
            range_message: "Maximum selection item is {last}".to_string(),
            log_level: "info".to_string(),
            highlight: HighlightConfig::default(),
        }
    }
}

/// Highlight settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub foreground: String,
    pub background: String,
    pub bold: bool,
    pub underline: bool,
    pub reverse: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            foreground: "black".to_string(),
            background: "white".to_string(),
            bold: true,
            underline: false,
            reverse: false,
        }
    }
}

impl HighlightConfig {
    pub fn attrs(&self) -> TextAttrs {
        let mut attrs = TextAttrs::empty();
        attrs.set(TextAttrs::BOLD, self.bold);
        attrs.set(TextAttrs::UNDERLINE, self.underline);
        attrs.set(TextAttrs::REVERSE, self.reverse);
        attrs
    }

    pub fn foreground_color(&self) -> Option<crossterm::style::Color> {
        color_by_name(&self.foreground)
    }

    pub fn background_color(&self) -> Option<crossterm::style::Color> {
        color_by_name(&self.background)
    }
}

/// Resolve a color name or `#rrggbb` value. Unknown names mean "terminal default".
pub fn color_by_name(name: &str) -> Option<crossterm::style::Color> {
    use crossterm::style::Color;

    let name = name.trim().to_lowercase();
    if let Some(hex) = name.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        return Some(Color::Rgb {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        });
    }
    match name.as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::DarkRed),
        "green" => Some(Color::DarkGreen),
        "yellow" => Some(Color::DarkYellow),
        "blue" => Some(Color::DarkBlue),
        "magenta" => Some(Color::DarkMagenta),
        "cyan" => Some(Color::DarkCyan),
        "white" => Some(Color::White),
        "grey" | "gray" => Some(Color::Grey),
        _ => None,
    }
}

impl MenuConfig {
    /// Load configuration from `~/.climenu/config.toml`, falling back to defaults
    pub fn load() -> Self {
        if let Some(path) = Self::get_config_path() {
            if path.exists() {
                match Self::load_from(&path) {
                    Ok(config) => return config,
                    Err(e) => tracing::warn!("{}", e),
                }
            }
        }
        Self::default()
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_err = |source: Box<dyn std::error::Error + Send + Sync>| MenuError::Config {
            path: path.to_path_buf(),
            source,
        };
        let content = fs::read_to_string(path).map_err(|e| config_err(Box::new(e)))?;
        toml::from_str(&content).map_err(|e| config_err(Box::new(e)))
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| MenuError::Config {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Range message with the bounds filled in
    pub fn range_text(&self, first: usize, last: usize) -> String {
        self.range_message
            .replace("{first}", &first.to_string())
            .replace("{last}", &last.to_string())
    }

    /// Directory holding config and log files
    pub fn config_dir() -> Option<PathBuf> {
        home_dir().map(|home| home.join(".climenu"))
    }

    /// Get config file path
    fn get_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }
}

// Get home directory
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MenuConfig = toml::from_str(
            r#"
            prompt = "> "
            [highlight]
            background = "blue"
            "#,
        )
        .unwrap();
        assert_eq!(config.prompt, "> ");
        assert!(config.clear_screen);
        assert_eq!(config.highlight.background_color(), Some(Color::DarkBlue));
        assert_eq!(config.highlight.foreground_color(), Some(Color::Black));
        assert!(config.highlight.attrs().contains(TextAttrs::BOLD));
    }

    #[test]
    fn test_color_names() {
        assert_eq!(color_by_name("WHITE"), Some(Color::White));
        assert_eq!(
            color_by_name("#ff8000"),
            Some(Color::Rgb { r: 255, g: 128, b: 0 })
        );
        assert_eq!(color_by_name("#ff80"), None);
        assert_eq!(color_by_name("plaid"), None);
    }

    #[test]
    fn test_range_text() {
        let config = MenuConfig {
            range_message: "Pick {first}..{last}".to_string(),
            ..Default::default()
        };
        assert_eq!(config.range_text(1, 4), "Pick 1..4");
        assert_eq!(
            MenuConfig::default().range_text(1, 3),
            "Maximum selection item is 3"
        );
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("climenu-config-{}.toml", std::process::id()));
        let mut config = MenuConfig::default();
        config.hide_cursor = false;
        config.highlight.reverse = true;
        config.save_to(&path).unwrap();

        let loaded = MenuConfig::load_from(&path).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let path = std::env::temp_dir().join(format!("climenu-bad-{}.toml", std::process::id()));
        fs::write(&path, "clear_screen = \"yes\"").unwrap();
        let err = MenuConfig::load_from(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, MenuError::Config { .. }));
        assert!(err.to_string().contains("climenu-bad"));
    }
}
