use rustc_hash::FxHashMap;

use super::{DebugGui, ModelLoader, ShaderProgram, ShadingBackend, UniformValue};
use crate::error::ViewerError;
use crate::mesh::{self, MeshId, MeshInfo, Topology};
use crate::scene::TextureId;
use crate::viewport::ViewportRect;

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// [`ShadingBackend::clear`].
    Clear([f32; 4]),
    /// [`ShadingBackend::set_viewport`].
    SetViewport(ViewportRect),
    /// [`ShadingBackend::use_program`].
    UseProgram(ShaderProgram),
    /// [`ShadingBackend::set_uniform`].
    SetUniform {
        /// Uniform name.
        name: String,
        /// Value set.
        value: UniformValue,
    },
    /// [`ShadingBackend::bind_texture`].
    BindTexture {
        /// Sampler unit.
        unit: u32,
        /// Texture bound.
        texture: TextureId,
    },
    /// [`ShadingBackend::draw`].
    Draw {
        /// Mesh drawn.
        mesh: MeshId,
        /// Topology used.
        topology: Topology,
    },
}

/// Shading backend and model loader that records every call instead of
/// touching a GPU.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    loaded: FxHashMap<MeshId, MeshInfo>,
}

impl RecordingBackend {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    #[must_use]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Forget recorded calls, keeping loaded meshes.
    pub fn clear_commands(&mut self) {
        self.commands.clear();
    }

    /// Rectangles passed to `set_viewport`, in order.
    #[must_use]
    pub fn viewports(&self) -> Vec<ViewportRect> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetViewport(rect) => Some(*rect),
                _ => None,
            })
            .collect()
    }

    /// Mesh/topology pairs passed to `draw`, in order.
    #[must_use]
    pub fn draws(&self) -> Vec<(MeshId, Topology)> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::Draw { mesh, topology } => Some((*mesh, *topology)),
                _ => None,
            })
            .collect()
    }

    /// Every value set for uniform `name`, in order.
    #[must_use]
    pub fn uniforms_named(&self, name: &str) -> Vec<UniformValue> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                Command::SetUniform { name: n, value } if n == name => {
                    Some(*value)
                }
                _ => None,
            })
            .collect()
    }

    /// Counts reported for a loaded mesh.
    #[must_use]
    pub fn loaded(&self, mesh: MeshId) -> Option<MeshInfo> {
        self.loaded.get(&mesh).copied()
    }
}

impl ShadingBackend for RecordingBackend {
    fn clear(&mut self, color: [f32; 4]) {
        self.commands.push(Command::Clear(color));
    }

    fn set_viewport(&mut self, rect: ViewportRect) {
        self.commands.push(Command::SetViewport(rect));
    }

    fn use_program(&mut self, program: ShaderProgram) {
        self.commands.push(Command::UseProgram(program));
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        self.commands.push(Command::SetUniform {
            name: name.to_owned(),
            value,
        });
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        self.commands.push(Command::BindTexture { unit, texture });
    }

    fn draw(&mut self, mesh: MeshId, topology: Topology) {
        self.commands.push(Command::Draw { mesh, topology });
    }
}

impl ModelLoader for RecordingBackend {
    fn load_model(&mut self, mesh: MeshId) -> Result<MeshInfo, ViewerError> {
        let info = mesh::generate(mesh).info();
        let _ = self.loaded.insert(mesh, info);
        Ok(info)
    }
}

/// Panel stand-in that counts how often it was drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CountingGui {
    /// Number of `draw` calls.
    pub draws: u32,
}

impl DebugGui for CountingGui {
    fn draw(&mut self, _backend: &mut dyn ShadingBackend) {
        self.draws += 1;
    }
}
