//! Time-based animation of the spinning torus.

use glam::{Mat4, Vec3};

/// Accumulated rotation angle, advanced by wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    angle_degrees: f32,
    enabled: bool,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::new(true)
    }
}

impl AnimationClock {
    /// Clock at angle zero.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            angle_degrees: 0.0,
            enabled,
        }
    }

    /// Advance by `speed_degrees * elapsed_secs` while enabled, wrapping
    /// into `[0, 360)`. Negative or non-finite elapsed time is ignored, and
    /// a non-finite step keeps the last angle.
    pub fn advance(&mut self, speed_degrees: f32, elapsed_secs: f32) {
        if !self.enabled || !(elapsed_secs.is_finite() && elapsed_secs > 0.0) {
            return;
        }
        let step = speed_degrees * elapsed_secs;
        if !step.is_finite() {
            log::warn!("skipping non-finite animation step (speed {speed_degrees})");
            return;
        }
        let wrapped = (self.angle_degrees + step).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360 for tiny negative inputs.
        self.angle_degrees = if wrapped >= 360.0 { 0.0 } else { wrapped };
    }

    /// Current angle in degrees, always in `[0, 360)`.
    #[must_use]
    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    /// Whether the clock is running.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Start or stop the clock. The angle is kept.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}

/// Fixed parameters of the animated object's model transform.
///
/// The matrix is rebuilt from scratch every frame as
/// `translate(offset) * rotate_y(angle * multiplier) * rotate_x(tilt) *
/// scale`, so the object spins about its own pivot and no rotation error
/// accumulates over long runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpinTransform {
    /// World-space pivot.
    pub offset: Vec3,
    /// Factor applied to the clock angle for the vertical-axis spin.
    pub multiplier: f32,
    /// Fixed tilt about the X axis, in degrees.
    pub tilt_degrees: f32,
    /// Uniform scale.
    pub scale: f32,
}

impl Default for SpinTransform {
    fn default() -> Self {
        Self {
            offset: Vec3::new(0.0, -1.0, 0.0),
            multiplier: 5.0,
            tilt_degrees: 90.0,
            scale: 2.0,
        }
    }
}

impl SpinTransform {
    /// Vertical-axis rotation applied for a clock angle, in degrees.
    #[must_use]
    pub fn spin_degrees(&self, angle_degrees: f32) -> f32 {
        angle_degrees * self.multiplier
    }

    /// Model matrix for a clock angle.
    #[must_use]
    pub fn model_matrix(&self, angle_degrees: f32) -> Mat4 {
        Mat4::from_translation(self.offset)
            * Mat4::from_rotation_y(self.spin_degrees(angle_degrees).to_radians())
            * Mat4::from_rotation_x(self.tilt_degrees.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }
}
