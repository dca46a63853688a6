//! Player settings and preferences
//!
//! Stored as JSON next to the dataset. A missing or unreadable file is not an
//! error; the defaults are used instead.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::{BoardGeometry, Difficulty, TileFootprint};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty used for the next session
    pub difficulty: Difficulty,

    // === Display ===
    /// Show the clue text while it is narrated
    pub show_clue_text: bool,
    /// Viewport width used to pick the tile footprint
    pub viewport_width: f32,
    /// Render area the board is drawn into (before padding)
    pub board_width: f32,
    pub board_height: f32,

    // === Audio ===
    /// Read clues aloud
    pub narration_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,

            show_clue_text: true,
            viewport_width: 1280.0,
            board_width: 1000.0,
            board_height: 690.0,

            narration_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

impl Settings {
    /// Create settings for a difficulty (everything else default)
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Tile footprint for the configured viewport
    pub fn tile_footprint(&self) -> TileFootprint {
        TileFootprint::for_viewport(self.viewport_width)
    }

    /// Board geometry for the configured render area
    pub fn board_geometry(&self) -> BoardGeometry {
        BoardGeometry::from_render_area(self.board_width, self.board_height, self.tile_footprint())
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Ignoring invalid settings file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let mut settings = Settings::with_difficulty(Difficulty::Inferno);
        settings.muted = true;
        settings.viewport_width = 400.0;
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_invalid_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ broken").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"difficulty":"Hard"}"#).unwrap();
        let settings = Settings::load(&path);
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(settings.narration_enabled);
    }

    #[test]
    fn test_geometry_from_viewport() {
        let mut settings = Settings::default();
        settings.viewport_width = 320.0;
        let g = settings.board_geometry();
        assert_eq!(g.tile, TileFootprint::new(70.0, 100.0));
        assert_eq!(g.area.x, 960.0);
    }
}
