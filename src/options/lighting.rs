use glam::Vec3;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::PointLight;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Point light placement and intensities.
pub struct LightingOptions {
    /// Light position, X component.
    #[schemars(title = "Light Position X", range(min = -10.0, max = 10.0), extend("step" = 0.01))]
    pub position_x: f32,
    /// Light position, Y component.
    #[schemars(title = "Light Position Y", range(min = -10.0, max = 10.0), extend("step" = 0.01))]
    pub position_y: f32,
    /// Light position, Z component.
    #[schemars(title = "Light Position Z", range(min = -10.0, max = 10.0), extend("step" = 0.01))]
    pub position_z: f32,
    /// Ambient intensity (RGB).
    #[schemars(skip)]
    pub ambient: [f32; 3],
    /// Diffuse intensity (RGB).
    #[schemars(skip)]
    pub diffuse: [f32; 3],
    /// Specular intensity (RGB).
    #[schemars(skip)]
    pub specular: [f32; 3],
    /// Constant, linear and quadratic attenuation.
    #[schemars(skip)]
    pub attenuation: [f32; 3],
}

impl Default for LightingOptions {
    fn default() -> Self {
        let light = PointLight::default();
        Self {
            position_x: light.position.x,
            position_y: light.position.y,
            position_z: light.position.z,
            ambient: light.ambient.to_array(),
            diffuse: light.diffuse.to_array(),
            specular: light.specular.to_array(),
            attenuation: light.attenuation.to_array(),
        }
    }
}

impl LightingOptions {
    /// Light position as a vector.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.position_x, self.position_y, self.position_z)
    }

    /// Move the light by `delta`.
    pub fn translate(&mut self, delta: Vec3) {
        self.position_x += delta.x;
        self.position_y += delta.y;
        self.position_z += delta.z;
    }

    /// The scene light these options describe.
    #[must_use]
    pub fn to_light(&self) -> PointLight {
        PointLight {
            position: self.position(),
            ambient: Vec3::from_array(self.ambient),
            diffuse: Vec3::from_array(self.diffuse),
            specular: Vec3::from_array(self.specular),
            attenuation: Vec3::from_array(self.attenuation),
        }
    }
}
