use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Step sizes applied by keyboard actions.
pub struct ControlOptions {
    /// Yaw/pitch change per key press, in radians.
    #[schemars(skip)]
    pub rotate_step: f32,
    /// Light movement per key press, in world units.
    #[schemars(skip)]
    pub light_step: f32,
    /// Zoom change per key press.
    #[schemars(skip)]
    pub zoom_step: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            rotate_step: 0.05,
            light_step: 0.25,
            zoom_step: 1.0,
        }
    }
}
