//! Live viewer parameters with TOML preset support.
//!
//! Everything the control panel and the keyboard can change (animation,
//! light, free-look orientation, zoom) lives here and is read directly by
//! the per-frame update. Options serialize to/from TOML so a session can be
//! started from a preset file.

mod animation;
mod camera;
mod controls;
mod keybindings;
mod lighting;
mod window;

use std::path::Path;

pub use animation::AnimationOptions;
pub use camera::{CameraOptions, MIN_DISTANCE, PITCH_LIMIT};
pub use controls::ControlOptions;
pub use keybindings::KeybindingOptions;
pub use lighting::LightingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use window::WindowOptions;

use crate::error::ViewerError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[lighting]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Window title, size and clear colour.
    #[schemars(skip)]
    pub window: WindowOptions,
    /// Torus animation.
    pub animation: AnimationOptions,
    /// Point light.
    pub lighting: LightingOptions,
    /// Free-look orientation and orthographic sizing.
    pub camera: CameraOptions,
    /// Keyboard step sizes.
    #[schemars(skip)]
    pub controls: ControlOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] if the text is not valid TOML
    /// for this shape.
    pub fn from_toml(content: &str) -> Result<Self, ViewerError> {
        let mut options: Self = toml::from_str(content)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        options.keybindings.rebuild_reverse_map();
        options.sanitize();
        Ok(options)
    }

    /// Bring every numeric option back into its usable range: camera
    /// limits, and defaults for non-finite animation values.
    pub fn sanitize(&mut self) {
        self.animation.sanitize();
        self.camera.clamp();
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Io`] if the file cannot be read and
    /// [`ViewerError::OptionsParse`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let options = Self::from_toml(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] if serialization fails and
    /// [`ViewerError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[camera]
zoom = 20.0
";
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.camera.zoom, 20.0);
        // Everything else should be default
        assert_eq!(opts.camera.side_distance, 12.0);
        assert_eq!(opts.animation.speed, 20.0);
        assert_eq!(opts.lighting.position(), glam::Vec3::new(3.0, 3.0, 0.0));
        assert_eq!(opts.keybindings.lookup("Escape"), Some(KeyAction::Exit));
    }

    #[test]
    fn out_of_range_pitch_is_clamped_on_load() {
        let opts = Options::from_toml("[camera]\npitch = 4.0\n").unwrap();
        assert_eq!(opts.camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn non_finite_camera_values_fall_back_to_defaults() {
        let opts = Options::from_toml(
            "[camera]\nyaw = nan\npitch = -inf\nzoom = inf\nside_distance = nan\n",
        )
        .unwrap();
        let defaults = CameraOptions::default();
        assert_eq!(opts.camera.yaw, defaults.yaw);
        assert_eq!(opts.camera.pitch, defaults.pitch);
        assert_eq!(opts.camera.zoom, defaults.zoom);
        assert_eq!(opts.camera.side_distance, defaults.side_distance);
    }

    #[test]
    fn sizing_distances_stay_positive() {
        let opts =
            Options::from_toml("[camera]\nzoom = -3.0\nside_distance = 0.0\n").unwrap();
        assert_eq!(opts.camera.zoom, MIN_DISTANCE);
        assert_eq!(opts.camera.side_distance, MIN_DISTANCE);
    }

    #[test]
    fn non_finite_animation_values_fall_back_to_defaults() {
        let opts =
            Options::from_toml("[animation]\nspeed = nan\nmultiplier = inf\n").unwrap();
        assert_eq!(opts.animation, AnimationOptions::default());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = Options::from_toml("[camera\nzoom = ").unwrap_err();
        assert!(matches!(err, ViewerError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("Space"),
            Some(KeyAction::ToggleAnimation)
        );
        assert_eq!(opts.keybindings.lookup("Equal"), Some(KeyAction::ZoomIn));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
        for action in KeyAction::ALL {
            assert!(opts.keybindings.key_for(action).is_some(), "{action:?}");
        }
    }

    #[test]
    fn save_then_load_preserves_edits() {
        let dir = std::env::temp_dir()
            .join(format!("quadview-options-{}", std::process::id()));
        let path = dir.join("edited.toml");
        let mut opts = Options::default();
        opts.camera.yaw = 0.5;
        opts.lighting.position_x = -2.0;
        opts.save(&path).unwrap();

        let loaded = Options::load(&path).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["edited".to_owned()]);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Options::load(Path::new("/nonexistent/quadview.toml"))
            .unwrap_err();
        assert!(matches!(err, ViewerError::Io(_)));
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        // UI-exposed sections should be present
        assert!(props.contains_key("animation"));
        assert!(props.contains_key("lighting"));
        assert!(props.contains_key("camera"));

        // Skipped sections should be absent
        assert!(!props.contains_key("window"));
        assert!(!props.contains_key("controls"));
        assert!(!props.contains_key("keybindings"));

        let lighting = &props["lighting"]["properties"];
        assert!(lighting.get("position_x").is_some());
        assert!(lighting.get("attenuation").is_none());
        let camera = &props["camera"]["properties"];
        assert_eq!(camera["yaw"]["step"], 0.01);
    }
}
