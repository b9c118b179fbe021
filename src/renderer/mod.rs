//! Frame composition and the collaborator traits it is submitted to.
//!
//! Composition ([`compose`]) is pure: it turns the viewport layout and the
//! scene state into a [`FramePlan`] holding every matrix, material and
//! texture assignment for one frame. Submission ([`submit`]) walks the plan
//! against a [`ShadingBackend`], which may be the wgpu backend or the
//! [`recorder::RecordingBackend`] used in tests.

/// Pure per-frame composition.
pub mod plan;
/// Shared wgpu pipeline state.
pub(crate) mod pipeline_util;
/// Backend that records every call, for tests and diagnostics.
pub mod recorder;

use glam::{Mat3, Mat4, Vec3};

pub use plan::{compose, DrawItem, FramePlan, OverlayPass, PassContent, ScenePass, ViewportPass};

use crate::error::ViewerError;
use crate::mesh::{MeshId, MeshInfo, Topology};
use crate::scene::{Material, PointLight, Shading, TextureId};
use crate::viewport::ViewportRect;

/// Uniform names understood by every shading backend.
pub mod uniforms {
    /// Light position.
    pub const LIGHT_POS: &str = "uLight.pos";
    /// Light ambient intensity.
    pub const LIGHT_AMBIENT: &str = "uLight.La";
    /// Light diffuse intensity.
    pub const LIGHT_DIFFUSE: &str = "uLight.Ld";
    /// Light specular intensity.
    pub const LIGHT_SPECULAR: &str = "uLight.Ls";
    /// Light attenuation coefficients.
    pub const LIGHT_ATTENUATION: &str = "uLight.att";
    /// Eye position of the current viewport.
    pub const VIEWPOINT: &str = "uViewpoint";
    /// Material ambient reflectance.
    pub const MATERIAL_AMBIENT: &str = "uMaterial.Ka";
    /// Material diffuse reflectance.
    pub const MATERIAL_DIFFUSE: &str = "uMaterial.Kd";
    /// Material specular reflectance.
    pub const MATERIAL_SPECULAR: &str = "uMaterial.Ks";
    /// Material specular exponent.
    pub const MATERIAL_SHININESS: &str = "uMaterial.shininess";
    /// Model-view-projection matrix.
    pub const MVP: &str = "uMVPMatrix";
    /// Model matrix.
    pub const MODEL: &str = "uModelMatrix";
    /// Normal matrix (inverse-transpose of the model's upper 3x3).
    pub const NORMAL: &str = "uNormalMatrix";
    /// Texture unit of the colour texture.
    pub const TEXTURE_SAMPLER: &str = "uTextureSampler";
    /// Texture unit of the environment cube map.
    pub const ENVIRONMENT_MAP: &str = "uEnvironmentMap";
    /// Whether the environment map replaces the colour texture.
    pub const HAS_ENV_MAP: &str = "hasEnvMap";
    /// Texture unit of the normal map.
    pub const NORMAL_SAMPLER: &str = "uNormalSampler";
}

/// Shader program selected for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderProgram {
    /// Unlit per-vertex colour.
    Color,
    /// Phong lighting with a colour texture or a cube map.
    Lit,
    /// Phong lighting with a tangent-space normal map.
    NormalMapped,
}

impl ShaderProgram {
    /// Program that implements `shading`.
    #[must_use]
    pub fn for_shading(shading: Shading) -> Self {
        match shading {
            Shading::Textured { .. } | Shading::EnvironmentMapped { .. } => Self::Lit,
            Shading::NormalMapped { .. } => Self::NormalMapped,
        }
    }
}

/// A value handed to [`ShadingBackend::set_uniform`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// 4x4 matrix.
    Mat4(Mat4),
    /// 3x3 matrix.
    Mat3(Mat3),
    /// 3-component vector.
    Vec3(Vec3),
    /// Scalar float.
    F32(f32),
    /// Scalar integer (sampler units and flags).
    I32(i32),
}

/// The shading collaborator: binds state and issues draws.
pub trait ShadingBackend {
    /// Clear colour and depth of the whole framebuffer.
    fn clear(&mut self, color: [f32; 4]);
    /// Restrict subsequent draws to `rect` (bottom-left origin).
    fn set_viewport(&mut self, rect: ViewportRect);
    /// Select the program for subsequent uniforms and draws.
    fn use_program(&mut self, program: ShaderProgram);
    /// Set a named uniform on the current program.
    fn set_uniform(&mut self, name: &str, value: UniformValue);
    /// Bind `texture` to sampler `unit`.
    fn bind_texture(&mut self, unit: u32, texture: TextureId);
    /// Draw `mesh` with the current program and uniforms.
    fn draw(&mut self, mesh: MeshId, topology: Topology);
}

/// The immediate-mode control panel drawn into the panel viewport.
pub trait DebugGui {
    /// Draw the panel for this frame. The panel viewport is already bound
    /// on `backend`.
    fn draw(&mut self, backend: &mut dyn ShadingBackend);
}

/// Loads a built-in mesh and reports its counts.
pub trait ModelLoader {
    /// Make `mesh` drawable.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::MeshUpload`] if the mesh cannot be prepared.
    fn load_model(&mut self, mesh: MeshId) -> Result<MeshInfo, ViewerError>;
}

/// Walk `plan` against `backend`, calling `gui` for the panel viewport.
pub fn submit(
    plan: &FramePlan,
    backend: &mut dyn ShadingBackend,
    gui: &mut dyn DebugGui,
) {
    backend.clear(plan.clear_color);

    for pass in &plan.passes {
        backend.set_viewport(pass.rect.clamped());
        match &pass.content {
            PassContent::Panel => gui.draw(backend),
            PassContent::Scene(scene) => {
                for item in &scene.draws {
                    submit_draw(backend, &plan.light, scene.viewpoint, item);
                }
            }
        }
    }

    let overlay = &plan.overlay;
    backend.set_viewport(overlay.rect.clamped());
    backend.use_program(ShaderProgram::Color);
    backend.set_uniform(uniforms::MVP, UniformValue::Mat4(overlay.mvp));
    backend.draw(overlay.mesh, overlay.topology);
}

fn submit_draw(
    backend: &mut dyn ShadingBackend,
    light: &PointLight,
    viewpoint: Vec3,
    item: &DrawItem,
) {
    backend.use_program(ShaderProgram::for_shading(item.shading));
    set_light(backend, light);
    backend.set_uniform(uniforms::VIEWPOINT, UniformValue::Vec3(viewpoint));
    set_material(backend, &item.material);
    backend.set_uniform(uniforms::MVP, UniformValue::Mat4(item.mvp));
    backend.set_uniform(uniforms::MODEL, UniformValue::Mat4(item.model));
    backend.set_uniform(uniforms::NORMAL, UniformValue::Mat3(item.normal));
    for (name, unit) in sampler_uniforms(item.shading) {
        backend.set_uniform(name, UniformValue::I32(unit));
    }
    for (unit, texture) in item.shading.texture_units() {
        backend.bind_texture(unit, texture);
    }
    backend.draw(item.mesh, item.topology);
}

fn set_light(backend: &mut dyn ShadingBackend, light: &PointLight) {
    backend.set_uniform(uniforms::LIGHT_POS, UniformValue::Vec3(light.position));
    backend.set_uniform(uniforms::LIGHT_AMBIENT, UniformValue::Vec3(light.ambient));
    backend.set_uniform(uniforms::LIGHT_DIFFUSE, UniformValue::Vec3(light.diffuse));
    backend.set_uniform(uniforms::LIGHT_SPECULAR, UniformValue::Vec3(light.specular));
    backend.set_uniform(uniforms::LIGHT_ATTENUATION, UniformValue::Vec3(light.attenuation));
}

fn set_material(backend: &mut dyn ShadingBackend, material: &Material) {
    backend.set_uniform(uniforms::MATERIAL_AMBIENT, UniformValue::Vec3(material.ambient));
    backend.set_uniform(uniforms::MATERIAL_DIFFUSE, UniformValue::Vec3(material.diffuse));
    backend.set_uniform(uniforms::MATERIAL_SPECULAR, UniformValue::Vec3(material.specular));
    backend.set_uniform(uniforms::MATERIAL_SHININESS, UniformValue::F32(material.shininess));
}

/// Sampler-unit and flag uniforms for a shading path.
///
/// The environment-mapped path swaps units so the cube map sits on unit 0
/// next to its texture binding.
#[must_use]
pub fn sampler_uniforms(shading: Shading) -> Vec<(&'static str, i32)> {
    match shading {
        Shading::Textured { .. } => vec![
            (uniforms::TEXTURE_SAMPLER, 0),
            (uniforms::ENVIRONMENT_MAP, 1),
            (uniforms::HAS_ENV_MAP, 0),
        ],
        Shading::EnvironmentMapped { .. } => vec![
            (uniforms::ENVIRONMENT_MAP, 0),
            (uniforms::TEXTURE_SAMPLER, 1),
            (uniforms::HAS_ENV_MAP, 1),
        ],
        Shading::NormalMapped { .. } => vec![
            (uniforms::TEXTURE_SAMPLER, 0),
            (uniforms::NORMAL_SAMPLER, 1),
        ],
    }
}
