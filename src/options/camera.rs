use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::viewport::{ViewParams, DEFAULT_ZOOM, SIDE_VIEW_DISTANCE};

/// Pitch limit just short of straight up or down, in radians.
pub const PITCH_LIMIT: f32 = 1.55;
/// Smallest zoom or side distance an orthographic view is sized for.
pub const MIN_DISTANCE: f32 = 1.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Free-look orientation and orthographic sizing.
pub struct CameraOptions {
    /// Free-look yaw in radians.
    #[schemars(title = "Camera Yaw", range(min = -3.15, max = 3.15), extend("step" = 0.01))]
    pub yaw: f32,
    /// Free-look pitch in radians.
    #[schemars(title = "Camera Pitch", range(min = -1.55, max = 1.55), extend("step" = 0.01))]
    pub pitch: f32,
    /// Top-down orthographic sizing distance.
    #[schemars(title = "Top-Down Zoom", range(min = 1.0, max = 50.0), extend("step" = 0.5))]
    pub zoom: f32,
    /// Side orthographic sizing distance.
    #[schemars(skip)]
    pub side_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            zoom: DEFAULT_ZOOM,
            side_distance: SIDE_VIEW_DISTANCE,
        }
    }
}

impl CameraOptions {
    /// Orthographic sizing parameters for the viewport layout.
    #[must_use]
    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            zoom: self.zoom,
            side_distance: self.side_distance,
        }
    }

    /// Clamp pitch to [`PITCH_LIMIT`] and both sizing distances to at least
    /// [`MIN_DISTANCE`]. Non-finite values fall back to the defaults.
    pub fn clamp(&mut self) {
        let defaults = Self::default();
        let finite_or = |value: f32, fallback: f32| {
            if value.is_finite() {
                value
            } else {
                log::warn!("non-finite camera option {value}, using {fallback}");
                fallback
            }
        };
        self.yaw = finite_or(self.yaw, defaults.yaw);
        self.pitch = finite_or(self.pitch, defaults.pitch).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.zoom = finite_or(self.zoom, defaults.zoom).max(MIN_DISTANCE);
        self.side_distance =
            finite_or(self.side_distance, defaults.side_distance).max(MIN_DISTANCE);
    }
}
