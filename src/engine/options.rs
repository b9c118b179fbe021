//! Options methods for SceneEngine

use super::{spin_for, SceneEngine};
use crate::error::ViewerError;
use crate::options::Options;

impl SceneEngine {
    /// Replace options and apply all changes to subsystems.
    pub fn set_options(&mut self, new: Options) {
        self.options = new;
        self.apply_options();
    }

    /// Push current option values to the scene and layout.
    ///
    /// Zoom and side-distance changes rebuild the orthographic projections
    /// immediately; the top-down camera keeps the height it was placed at.
    pub fn apply_options(&mut self) {
        self.options.sanitize();
        self.clock.set_enabled(self.options.animation.enabled);
        self.scene.set_spin(spin_for(&self.options));
        self.scene.light = self.options.lighting.to_light();
        self.layout
            .apply_projections(self.options.camera.view_params());
    }

    /// Set one UI-exposed option addressed as `section.field` (e.g.
    /// `camera.yaw`) from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::OptionsParse`] if the path does not name an
    /// option or the value has the wrong type. Options are unchanged on
    /// error.
    pub fn set_option(
        &mut self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), ViewerError> {
        let mut tree = serde_json::to_value(&self.options)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        let slot = tree
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(|| {
                ViewerError::OptionsParse(format!(
                    "unknown option {section}.{field}"
                ))
            })?;
        *slot = value;

        let mut updated: Options = serde_json::from_value(tree)
            .map_err(|e| ViewerError::OptionsParse(e.to_string()))?;
        updated.keybindings.rebuild_reverse_map();
        log::debug!("option {section}.{field} updated");
        self.set_options(updated);
        Ok(())
    }

    /// Load a named preset (`<dir>/<name>.toml`) and apply it.
    ///
    /// # Errors
    ///
    /// Returns the load error; the current options are kept.
    pub fn load_preset(
        &mut self,
        dir: &std::path::Path,
        name: &str,
    ) -> Result<(), ViewerError> {
        let path = dir.join(format!("{name}.toml"));
        let options = Options::load(&path)?;
        self.set_options(options);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ViewerError;
    use crate::options::Options;
    use crate::renderer::recorder::RecordingBackend;
    use crate::viewport::{FramebufferSize, ViewportRole};
    use crate::SceneEngine;

    fn engine() -> SceneEngine {
        SceneEngine::new(
            FramebufferSize::new(800, 600),
            Options::default(),
            &mut RecordingBackend::new(),
        )
        .unwrap()
    }

    #[test]
    fn set_option_updates_one_field() {
        let mut engine = engine();
        engine.set_option("camera", "pitch", json!(0.25)).unwrap();
        assert_eq!(engine.options().camera.pitch, 0.25);
        assert_eq!(engine.options().camera.yaw, 0.0);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut engine = engine();
        let err = engine.set_option("camera", "fov", json!(1.0)).unwrap_err();
        assert!(matches!(err, ViewerError::OptionsParse(_)));
    }

    #[test]
    fn wrongly_typed_value_leaves_options_unchanged() {
        let mut engine = engine();
        let before = engine.options().clone();
        assert!(engine
            .set_option("animation", "enabled", json!("yes"))
            .is_err());
        assert_eq!(engine.options(), &before);
    }

    #[test]
    fn zoom_change_rebuilds_top_down_projection() {
        let mut engine = engine();
        let before = engine.layout().viewport(ViewportRole::TopDown).projection;
        engine.set_option("camera", "zoom", json!(30.0)).unwrap();
        let after = engine.layout().viewport(ViewportRole::TopDown).projection;
        let (_, h0) = before.half_extents().unwrap();
        let (_, h1) = after.half_extents().unwrap();
        assert!((h1 - 2.0 * h0).abs() < 1e-4);
    }
}
