//! Per-draw uniform block and the staging state that fills it from named
//! uniforms.

use glam::{Mat3, Mat4, Vec3};

use crate::renderer::{uniforms, ShaderProgram, UniformValue};
use crate::scene::TextureId;

/// Uniform block consumed by `scene.wgsl`, one per draw.
///
/// Layout follows WGSL uniform rules: `mat3x3` columns are padded to
/// `vec4`, every vector is a `vec4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniforms {
    /// Model-view-projection matrix.
    pub mvp: [[f32; 4]; 4],
    /// Model matrix.
    pub model: [[f32; 4]; 4],
    /// Normal matrix, columns padded to four floats.
    pub normal_matrix: [[f32; 4]; 3],
    /// Light position (w unused).
    pub light_pos: [f32; 4],
    /// Light ambient intensity.
    pub light_ambient: [f32; 4],
    /// Light diffuse intensity.
    pub light_diffuse: [f32; 4],
    /// Light specular intensity.
    pub light_specular: [f32; 4],
    /// Constant, linear, quadratic attenuation.
    pub light_att: [f32; 4],
    /// Eye position.
    pub viewpoint: [f32; 4],
    /// Material ambient reflectance.
    pub mat_ambient: [f32; 4],
    /// Material diffuse reflectance.
    pub mat_diffuse: [f32; 4],
    /// Material specular reflectance; w holds the shininess.
    pub mat_specular: [f32; 4],
    /// Program, colour pattern, normal pattern, environment flag.
    pub flags: [u32; 4],
}

impl Default for DrawUniforms {
    fn default() -> Self {
        let mut block: Self = bytemuck::Zeroable::zeroed();
        block.mvp = Mat4::IDENTITY.to_cols_array_2d();
        block.model = Mat4::IDENTITY.to_cols_array_2d();
        block.normal_matrix = pad_mat3(Mat3::IDENTITY);
        block.light_att = [1.0, 0.0, 0.0, 0.0];
        block
    }
}

fn pad_mat3(m: Mat3) -> [[f32; 4]; 3] {
    [
        m.x_axis.extend(0.0).to_array(),
        m.y_axis.extend(0.0).to_array(),
        m.z_axis.extend(0.0).to_array(),
    ]
}

fn pad_vec3(v: Vec3) -> [f32; 4] {
    v.extend(0.0).to_array()
}

/// Shader-side code of a program.
#[must_use]
pub fn program_code(program: ShaderProgram) -> u32 {
    match program {
        ShaderProgram::Color => 0,
        ShaderProgram::Lit => 1,
        ShaderProgram::NormalMapped => 2,
    }
}

/// Shader-side procedural pattern of a texture.
#[must_use]
pub fn pattern_code(texture: TextureId) -> u32 {
    match texture {
        TextureId::Checker => 1,
        TextureId::Painting => 2,
        TextureId::Fieldstone => 3,
        TextureId::EnvironmentCube => 4,
        TextureId::FieldstoneNormal => 5,
    }
}

/// Mirrors the state a classic shading API would hold between calls:
/// current program, uniform values, sampler units and bound textures.
#[derive(Debug, Clone, Default)]
pub struct UniformStaging {
    block: DrawUniforms,
    program: Option<ShaderProgram>,
    texture_sampler: i32,
    normal_sampler: i32,
    has_env_map: bool,
    units: [Option<TextureId>; 2],
}

impl UniformStaging {
    /// Select the program; values from the previous program are kept.
    pub fn use_program(&mut self, program: ShaderProgram) {
        self.program = Some(program);
    }

    /// Currently selected program.
    #[must_use]
    pub fn program(&self) -> Option<ShaderProgram> {
        self.program
    }

    /// Store a named uniform. Returns `false` for unknown names or
    /// mismatched value types.
    pub fn set(&mut self, name: &str, value: UniformValue) -> bool {
        let b = &mut self.block;
        match (name, value) {
            (uniforms::MVP, UniformValue::Mat4(m)) => b.mvp = m.to_cols_array_2d(),
            (uniforms::MODEL, UniformValue::Mat4(m)) => b.model = m.to_cols_array_2d(),
            (uniforms::NORMAL, UniformValue::Mat3(m)) => b.normal_matrix = pad_mat3(m),
            (uniforms::LIGHT_POS, UniformValue::Vec3(v)) => b.light_pos = pad_vec3(v),
            (uniforms::LIGHT_AMBIENT, UniformValue::Vec3(v)) => b.light_ambient = pad_vec3(v),
            (uniforms::LIGHT_DIFFUSE, UniformValue::Vec3(v)) => b.light_diffuse = pad_vec3(v),
            (uniforms::LIGHT_SPECULAR, UniformValue::Vec3(v)) => {
                b.light_specular = pad_vec3(v);
            }
            (uniforms::LIGHT_ATTENUATION, UniformValue::Vec3(v)) => b.light_att = pad_vec3(v),
            (uniforms::VIEWPOINT, UniformValue::Vec3(v)) => b.viewpoint = pad_vec3(v),
            (uniforms::MATERIAL_AMBIENT, UniformValue::Vec3(v)) => b.mat_ambient = pad_vec3(v),
            (uniforms::MATERIAL_DIFFUSE, UniformValue::Vec3(v)) => b.mat_diffuse = pad_vec3(v),
            (uniforms::MATERIAL_SPECULAR, UniformValue::Vec3(v)) => {
                let shininess = b.mat_specular[3];
                b.mat_specular = pad_vec3(v);
                b.mat_specular[3] = shininess;
            }
            (uniforms::MATERIAL_SHININESS, UniformValue::F32(s)) => b.mat_specular[3] = s,
            (uniforms::TEXTURE_SAMPLER, UniformValue::I32(unit)) => self.texture_sampler = unit,
            (uniforms::NORMAL_SAMPLER, UniformValue::I32(unit)) => self.normal_sampler = unit,
            (uniforms::HAS_ENV_MAP, UniformValue::I32(flag)) => self.has_env_map = flag != 0,
            // The environment map unit follows from the texture bound
            // alongside the flag.
            (uniforms::ENVIRONMENT_MAP, UniformValue::I32(_)) => {}
            _ => return false,
        }
        true
    }

    /// Bind `texture` to `unit`. Returns `false` for units the shader does
    /// not sample.
    pub fn bind_texture(&mut self, unit: u32, texture: TextureId) -> bool {
        match self.units.get_mut(unit as usize) {
            Some(slot) => {
                *slot = Some(texture);
                true
            }
            None => false,
        }
    }

    /// Final block for a draw with the current state.
    #[must_use]
    pub fn resolve(&self) -> DrawUniforms {
        let program = self.program.unwrap_or(ShaderProgram::Color);
        let texture_on = |unit: i32| {
            usize::try_from(unit)
                .ok()
                .and_then(|u| self.units.get(u).copied().flatten())
                .map_or(0, pattern_code)
        };

        let mut block = self.block;
        block.flags = match program {
            ShaderProgram::Color => [0; 4],
            ShaderProgram::Lit if self.has_env_map => {
                [program_code(program), 0, 0, 1]
            }
            ShaderProgram::Lit => {
                [program_code(program), texture_on(self.texture_sampler), 0, 0]
            }
            ShaderProgram::NormalMapped => [
                program_code(program),
                texture_on(self.texture_sampler),
                texture_on(self.normal_sampler),
                0,
            ],
        };
        block
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::sampler_uniforms;
    use crate::scene::Shading;

    fn stage(shading: Shading) -> DrawUniforms {
        let mut staging = UniformStaging::default();
        staging.use_program(ShaderProgram::for_shading(shading));
        for (name, unit) in sampler_uniforms(shading) {
            assert!(staging.set(name, UniformValue::I32(unit)));
        }
        for (unit, texture) in shading.texture_units() {
            assert!(staging.bind_texture(unit, texture));
        }
        staging.resolve()
    }

    #[test]
    fn block_size_is_a_multiple_of_sixteen() {
        assert_eq!(size_of::<DrawUniforms>() % 16, 0);
        assert_eq!(size_of::<DrawUniforms>(), 336);
    }

    #[test]
    fn textured_path_samples_unit_zero() {
        let block = stage(Shading::Textured {
            texture: TextureId::Checker,
        });
        assert_eq!(block.flags, [1, pattern_code(TextureId::Checker), 0, 0]);
    }

    #[test]
    fn environment_path_sets_the_flag() {
        let block = stage(Shading::EnvironmentMapped {
            cube: TextureId::EnvironmentCube,
        });
        assert_eq!(block.flags, [1, 0, 0, 1]);
    }

    #[test]
    fn normal_mapped_path_resolves_both_units() {
        let block = stage(Shading::NormalMapped {
            texture: TextureId::Fieldstone,
            normal_map: TextureId::FieldstoneNormal,
        });
        assert_eq!(
            block.flags,
            [
                2,
                pattern_code(TextureId::Fieldstone),
                pattern_code(TextureId::FieldstoneNormal),
                0
            ]
        );
    }

    #[test]
    fn shininess_survives_specular_update() {
        let mut staging = UniformStaging::default();
        assert!(staging.set(uniforms::MATERIAL_SHININESS, UniformValue::F32(40.0)));
        assert!(staging.set(uniforms::MATERIAL_SPECULAR, UniformValue::Vec3(Vec3::ONE)));
        assert_eq!(staging.resolve().mat_specular, [1.0, 1.0, 1.0, 40.0]);
    }

    #[test]
    fn unknown_or_mistyped_uniforms_are_rejected() {
        let mut staging = UniformStaging::default();
        assert!(!staging.set("uFog", UniformValue::F32(1.0)));
        assert!(!staging.set(uniforms::MVP, UniformValue::F32(1.0)));
        assert!(!staging.bind_texture(2, TextureId::Checker));
    }
}
