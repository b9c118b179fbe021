//! Scene content shared by every viewport.
//!
//! The object set is fixed: a floor, a painting, a spinning torus and four
//! walls, lit by a single point light. Only the torus moves; its model
//! matrix is rebuilt from the animation angle every frame.

/// Animation clock and the torus spin transform.
pub mod animation;

use glam::{Mat4, Vec3};

pub use animation::{AnimationClock, SpinTransform};

use crate::mesh::{MeshId, Topology};

/// Identifier of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectId {
    /// Checkered ground plane.
    Floor,
    /// Textured quad on the back wall.
    Painting,
    /// Animated, environment-mapped ring.
    Torus,
    /// Wall behind the painting.
    BackWall,
    /// Wall on the -X side.
    LeftWall,
    /// Wall on the +X side.
    RightWall,
    /// Wall on the +Z side.
    FrontWall,
}

impl ObjectId {
    /// Objects in draw order.
    pub const DRAW_ORDER: [Self; 7] = [
        Self::Floor,
        Self::Painting,
        Self::Torus,
        Self::BackWall,
        Self::LeftWall,
        Self::RightWall,
        Self::FrontWall,
    ];
}

/// Handle of a texture known to the shading backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureId {
    /// Floor checkerboard.
    Checker,
    /// Painting image.
    Painting,
    /// Cube map reflected by the torus.
    EnvironmentCube,
    /// Wall colour texture.
    Fieldstone,
    /// Wall tangent-space normal map.
    FieldstoneNormal,
}

/// Phong material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Ambient reflectance.
    pub ambient: Vec3,
    /// Diffuse reflectance.
    pub diffuse: Vec3,
    /// Specular reflectance.
    pub specular: Vec3,
    /// Specular exponent.
    pub shininess: f32,
}

impl Material {
    /// Warm matte finish shared by the floor and the painting.
    pub const MATTE: Self = Self {
        ambient: Vec3::new(0.25, 0.21, 0.21),
        diffuse: Vec3::new(1.0, 0.83, 0.83),
        specular: Vec3::splat(0.3),
        shininess: 11.3,
    };

    /// Bright finish of the torus.
    pub const POLISHED: Self = Self {
        ambient: Vec3::splat(0.6),
        diffuse: Vec3::splat(1.0),
        specular: Vec3::splat(0.8),
        shininess: 40.0,
    };

    /// Blue stone finish of the walls.
    pub const STONE: Self = Self {
        ambient: Vec3::splat(0.2),
        diffuse: Vec3::new(0.2, 0.7, 1.0),
        specular: Vec3::new(0.2, 0.7, 1.0),
        shininess: 40.0,
    };
}

/// The scene's single point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    /// World-space position.
    pub position: Vec3,
    /// Ambient intensity.
    pub ambient: Vec3,
    /// Diffuse intensity.
    pub diffuse: Vec3,
    /// Specular intensity.
    pub specular: Vec3,
    /// Constant, linear and quadratic attenuation.
    pub attenuation: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(3.0, 3.0, 0.0),
            ambient: Vec3::new(1.0, 0.9, 0.3),
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.8),
            attenuation: Vec3::new(1.0, 0.0, 0.0),
        }
    }
}

/// How an object is shaded, and which textures it samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Lit with a 2D colour texture.
    Textured {
        /// Colour texture.
        texture: TextureId,
    },
    /// Lit with a reflected cube map instead of a colour texture.
    EnvironmentMapped {
        /// Reflected cube map.
        cube: TextureId,
    },
    /// Lit with a colour texture and a tangent-space normal map.
    NormalMapped {
        /// Colour texture.
        texture: TextureId,
        /// Normal map.
        normal_map: TextureId,
    },
}

impl Shading {
    /// Primary texture.
    #[must_use]
    pub fn texture(self) -> TextureId {
        match self {
            Self::Textured { texture } | Self::NormalMapped { texture, .. } => texture,
            Self::EnvironmentMapped { cube } => cube,
        }
    }

    /// Normal map, if any.
    #[must_use]
    pub fn normal_map(self) -> Option<TextureId> {
        match self {
            Self::NormalMapped { normal_map, .. } => Some(normal_map),
            _ => None,
        }
    }

    /// Texture units in binding order. The primary texture is always on
    /// unit 0.
    #[must_use]
    pub fn texture_units(self) -> Vec<(u32, TextureId)> {
        let mut units = vec![(0, self.texture())];
        if let Some(normal_map) = self.normal_map() {
            units.push((1, normal_map));
        }
        units
    }
}

/// One drawable object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneObject {
    /// Which object this is.
    pub id: ObjectId,
    /// Geometry.
    pub mesh: MeshId,
    /// Primitive assembly.
    pub topology: Topology,
    /// Object-to-world transform.
    pub model: Mat4,
    /// Surface material.
    pub material: Material,
    /// Shading path and textures.
    pub shading: Shading,
}

/// Everything the viewports render: objects, light and the spin transform.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneState {
    objects: Vec<SceneObject>,
    /// The point light.
    pub light: PointLight,
    spin: SpinTransform,
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(SpinTransform::default(), PointLight::default())
    }
}

impl SceneState {
    /// Build the fixed object set with the torus at angle zero.
    #[must_use]
    pub fn new(spin: SpinTransform, light: PointLight) -> Self {
        let wall = |id, model| SceneObject {
            id,
            mesh: MeshId::Wall,
            topology: Topology::TriangleStrip,
            model,
            material: Material::STONE,
            shading: Shading::NormalMapped {
                texture: TextureId::Fieldstone,
                normal_map: TextureId::FieldstoneNormal,
            },
        };
        let wall_scale = Mat4::from_scale(Vec3::new(8.0, 4.0, 1.0));

        let objects = vec![
            SceneObject {
                id: ObjectId::Floor,
                mesh: MeshId::Floor,
                topology: Topology::TriangleStrip,
                model: Mat4::from_translation(Vec3::new(0.0, -4.0, 0.0))
                    * Mat4::from_scale(Vec3::new(8.0, 1.0, 8.0)),
                material: Material::MATTE,
                shading: Shading::Textured {
                    texture: TextureId::Checker,
                },
            },
            SceneObject {
                id: ObjectId::Painting,
                mesh: MeshId::Painting,
                topology: Topology::TriangleStrip,
                model: Mat4::from_translation(Vec3::new(0.0, 0.0, -3.9))
                    * Mat4::from_rotation_x(90f32.to_radians())
                    * Mat4::from_scale(Vec3::new(3.0, 1.0, 2.0)),
                material: Material::MATTE,
                shading: Shading::Textured {
                    texture: TextureId::Painting,
                },
            },
            SceneObject {
                id: ObjectId::Torus,
                mesh: MeshId::Torus,
                topology: Topology::Triangles,
                model: spin.model_matrix(0.0),
                material: Material::POLISHED,
                shading: Shading::EnvironmentMapped {
                    cube: TextureId::EnvironmentCube,
                },
            },
            wall(
                ObjectId::BackWall,
                Mat4::from_translation(Vec3::new(0.0, 0.0, -4.0)) * wall_scale,
            ),
            wall(
                ObjectId::LeftWall,
                Mat4::from_translation(Vec3::new(-8.0, 0.0, 0.0))
                    * Mat4::from_rotation_y(90f32.to_radians())
                    * wall_scale,
            ),
            wall(
                ObjectId::RightWall,
                Mat4::from_translation(Vec3::new(8.0, 0.0, 0.0))
                    * Mat4::from_rotation_y((-90f32).to_radians())
                    * wall_scale,
            ),
            wall(
                ObjectId::FrontWall,
                Mat4::from_translation(Vec3::new(0.0, 0.0, 8.0))
                    * Mat4::from_rotation_y(180f32.to_radians())
                    * wall_scale,
            ),
        ];
        log::debug!("scene built with {} objects", objects.len());

        Self {
            objects,
            light,
            spin,
        }
    }

    /// Objects in draw order.
    #[must_use]
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Object by id.
    #[must_use]
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    /// Spin parameters of the torus.
    #[must_use]
    pub fn spin(&self) -> SpinTransform {
        self.spin
    }

    /// Replace the spin parameters. Takes effect on the next [`animate`].
    ///
    /// [`animate`]: Self::animate
    pub fn set_spin(&mut self, spin: SpinTransform) {
        self.spin = spin;
    }

    /// Rebuild the torus model matrix for a clock angle.
    pub fn animate(&mut self, angle_degrees: f32) {
        let model = self.spin.model_matrix(angle_degrees);
        if let Some(torus) = self.objects.iter_mut().find(|o| o.id == ObjectId::Torus) {
            torus.model = model;
        }
        log::trace!("torus angle {angle_degrees:.3}");
    }
}
