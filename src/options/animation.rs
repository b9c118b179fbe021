use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Animation", inline)]
#[serde(default)]
/// Torus spin parameters.
pub struct AnimationOptions {
    /// Whether the clock advances.
    #[schemars(title = "Animate")]
    pub enabled: bool,
    /// Clock speed in degrees per second.
    #[schemars(title = "Speed", range(min = 0.0, max = 90.0), extend("step" = 1.0))]
    pub speed: f32,
    /// Factor applied to the clock angle for the vertical spin.
    #[schemars(skip)]
    pub multiplier: f32,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            speed: 20.0,
            multiplier: 5.0,
        }
    }
}

impl AnimationOptions {
    /// Replace a non-finite speed or multiplier with its default.
    pub fn sanitize(&mut self) {
        let defaults = Self::default();
        if !self.speed.is_finite() {
            log::warn!("non-finite animation speed {}, using {}", self.speed, defaults.speed);
            self.speed = defaults.speed;
        }
        if !self.multiplier.is_finite() {
            log::warn!(
                "non-finite animation multiplier {}, using {}",
                self.multiplier,
                defaults.multiplier
            );
            self.multiplier = defaults.multiplier;
        }
    }
}
