//! Persisted window geometry.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PolyviewError;

/// Default preferences file, relative to the working directory.
pub const PREFS_FILE: &str = ".polyview.ini";

/// Window geometry remembered between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Window width in points.
    pub window_width: u32,
    /// Window height in points.
    pub window_height: u32,
    /// Window x position in pixels.
    pub window_pos_x: i32,
    /// Window y position in pixels.
    pub window_pos_y: i32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            window_pos_x: 20,
            window_pos_y: 20,
        }
    }
}

impl Preferences {
    /// Read preferences from a JSON file.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Io`] or [`PolyviewError::OptionsParse`].
    pub fn load(path: &Path) -> Result<Self, PolyviewError> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| PolyviewError::OptionsParse(e.to_string()))
    }

    /// Best-effort load: a missing file gives defaults silently, any other
    /// failure gives defaults with a warning.
    #[must_use]
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!(
                "ignoring preferences file {}: {e}",
                path.display()
            );
            Self::default()
        })
    }

    /// Write preferences as pretty JSON.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Io`] or [`PolyviewError::OptionsParse`].
    pub fn save(&self, path: &Path) -> Result<(), PolyviewError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| PolyviewError::OptionsParse(e.to_string()))?;
        std::fs::write(path, content).map_err(PolyviewError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("polyview-prefs-{name}.ini"))
    }

    #[test]
    fn save_then_load() {
        let path = temp_path("roundtrip");
        let prefs = Preferences {
            window_width: 800,
            window_height: 600,
            window_pos_x: -5,
            window_pos_y: 40,
        };
        prefs.save(&path).unwrap();
        assert_eq!(Preferences::load(&path).unwrap(), prefs);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(Preferences::load_or_default(&path), Preferences::default());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let prefs: Preferences =
            serde_json::from_str(r#"{"window_width": 640}"#).unwrap();
        assert_eq!(prefs.window_width, 640);
        assert_eq!(prefs.window_height, 720);
    }
}
