//! Configuration: grid geometry, capacity and input batching.
//!
//! Values can come from [`Config::default`], from a named display
//! [`Profile`], or from a JSON file on disk.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

/// Default cap on document length, in characters.
pub const MAX_TEXT_LENGTH: usize = 50_000;

/// Default batching window for edit events.
pub const BUFFER_INTERVAL_MS: u64 = 200;

/// Default cap on a chat prompt, in characters.
pub const PROMPT_MAX_LENGTH: usize = 100;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column budget of one display line.
    pub line_width: usize,
    /// Number of lines visible at once.
    pub viewport_height: usize,
    /// Maximum document length; inserts beyond it are dropped.
    pub max_text_length: usize,
    /// Batching window for edit events (0 = apply every event at once).
    pub buffer_interval_ms: u64,
    /// Maximum length of a chat prompt.
    pub prompt_max_length: usize,
}

impl Default for Config {
    fn default() -> Self {
        Profile::GfxHat.config()
    }
}

impl Config {
    /// Create a config for a grid of the given size with default limits.
    pub const fn with_grid(line_width: usize, viewport_height: usize) -> Self {
        Self {
            line_width,
            viewport_height,
            max_text_length: MAX_TEXT_LENGTH,
            buffer_interval_ms: BUFFER_INTERVAL_MS,
            prompt_max_length: PROMPT_MAX_LENGTH,
        }
    }

    /// The batching window as a [`Duration`].
    pub const fn buffer_interval(&self) -> Duration {
        Duration::from_millis(self.buffer_interval_ms)
    }

    /// Check that the geometry and limits are usable.
    pub fn validate(&self) -> Result<()> {
        if self.line_width == 0 {
            return Err(Error::Config("line_width must be positive".into()));
        }
        if self.viewport_height == 0 {
            return Err(Error::Config("viewport_height must be positive".into()));
        }
        if self.max_text_length == 0 {
            return Err(Error::Config("max_text_length must be positive".into()));
        }
        if self.prompt_max_length == 0 {
            return Err(Error::Config("prompt_max_length must be positive".into()));
        }
        Ok(())
    }

    /// Load a config from a JSON file.
    ///
    /// Missing fields fall back to defaults. A missing file yields the
    /// default config.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(Error::io(path, e)),
        };
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        info!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Write this config to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), "saved config");
        Ok(())
    }
}

/// Known display targets and their character grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    /// 128x32 SSD1305 OLED with the built-in 8px font.
    Oled,
    /// 128x64 GFX HAT LCD with a 13px bitmap font.
    GfxHat,
    /// 400x240 Sharp memory display with a 42px monospace font.
    Sharp,
}

impl Profile {
    /// The grid geometry for this display.
    pub const fn grid(self) -> (usize, usize) {
        match self {
            Self::Oled => (21, 4),
            Self::GfxHat => (18, 5),
            Self::Sharp => (16, 6),
        }
    }

    /// A config using this display's grid and default limits.
    pub const fn config(self) -> Config {
        let (width, height) = self.grid();
        Config::with_grid(width, height)
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "oled" | "ssd1305" => Ok(Self::Oled),
            "gfx-hat" | "gfxhat" | "hat" => Ok(Self::GfxHat),
            "sharp" | "memory-lcd" => Ok(Self::Sharp),
            other => Err(Error::Config(format!("unknown display profile '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_is_gfx_hat() {
        let config = Config::default();
        assert_eq!(config.line_width, 18);
        assert_eq!(config.viewport_height, 5);
        assert_eq!(config.max_text_length, MAX_TEXT_LENGTH);
        assert_eq!(config.buffer_interval(), Duration::from_millis(200));
    }

    #[test]
    fn test_validate_rejects_zero_geometry() {
        let mut config = Config::default();
        config.line_width = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = Config::default();
        config.viewport_height = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_profile_parse() {
        assert_eq!("OLED".parse::<Profile>().unwrap(), Profile::Oled);
        assert_eq!("gfx-hat".parse::<Profile>().unwrap(), Profile::GfxHat);
        assert_eq!(" sharp ".parse::<Profile>().unwrap(), Profile::Sharp);
        assert!("crt".parse::<Profile>().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Profile::Oled.config();
        config.buffer_interval_ms = 0;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "line_width": 21 }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.line_width, 21);
        assert_eq!(config.viewport_height, 5);
    }

    #[test]
    fn test_load_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "viewport_height": 0 }"#).unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Config(_))));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::Json(_))));
    }
}
