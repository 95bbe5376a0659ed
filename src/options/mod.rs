//! Host configuration with TOML load/save.
//!
//! Every section uses `#[serde(default)]`, so partial TOML files (e.g. only
//! overriding `[frame]`) work.

mod camera;
mod frame;
mod picking;

use std::path::Path;

pub use camera::CameraOptions;
pub use frame::FrameOptions;
pub use picking::PickingOptions;
use serde::{Deserialize, Serialize};

use crate::error::PolyviewError;

/// Top-level options container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Options {
    /// Window title and preferences namespace.
    pub program_name: String,
    /// Prefix for user-facing log lines.
    pub print_prefix: String,
    /// 0 = quiet, 1 = warnings and errors, 2+ = lifecycle chatter.
    pub verbosity: u32,
    /// Load and save window geometry in `.polyview.ini`.
    pub use_prefs_file: bool,
    /// Show queued warnings as modal popups.
    pub show_warning_popups: bool,
    /// Type tags listed in the "Structures" window even with no instances.
    pub default_structure_types: Vec<String>,
    /// Loop pacing and redraw policy.
    pub frame: FrameOptions,
    /// Pick evaluation toggles.
    pub picking: PickingOptions,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            program_name: "polyview".to_owned(),
            print_prefix: "[polyview] ".to_owned(),
            verbosity: 2,
            use_prefs_file: true,
            show_warning_popups: true,
            default_structure_types: Vec::new(),
            frame: FrameOptions::default(),
            picking: PickingOptions::default(),
            camera: CameraOptions::default(),
        }
    }
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Io`] or [`PolyviewError::OptionsParse`].
    pub fn load(path: &Path) -> Result<Self, PolyviewError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| PolyviewError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`PolyviewError::Io`] or [`PolyviewError::OptionsParse`].
    pub fn save(&self, path: &Path) -> Result<(), PolyviewError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PolyviewError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(PolyviewError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[picking]
always_evaluate = true
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert!(opts.picking.always_evaluate);
        assert_eq!(opts.frame.max_fps, Some(60));
        assert_eq!(opts.camera.fovy, 45.0);
    }

    #[test]
    fn zero_fps_means_unbounded() {
        let opts: Options = toml::from_str("[frame]\nmax_fps = 0\n").unwrap();
        assert_eq!(opts.frame.max_fps, None);

        let mut unbounded = Options::default();
        unbounded.frame.max_fps = None;
        let text = toml::to_string_pretty(&unbounded).unwrap();
        let parsed: Options = toml::from_str(&text).unwrap();
        assert_eq!(parsed.frame.max_fps, None);
    }

    #[test]
    fn save_then_load_from_disk() {
        let dir = std::env::temp_dir().join("polyview-options-test");
        let path = dir.join("opts.toml");
        let mut opts = Options::default();
        opts.default_structure_types = vec!["Point Cloud".to_owned()];
        opts.save(&path).unwrap();
        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        let _ = std::fs::remove_dir_all(dir);
    }
}
