//! wgpu implementation of [`ShadingBackend`] and [`ModelLoader`].
//!
//! Calls made while a frame is submitted are staged on the CPU: every
//! `draw` snapshots the current uniform state into one [`DrawUniforms`]
//! block and remembers the viewport it was issued in. [`GpuBackend::present`]
//! then uploads all blocks at once and replays the draws in a single render
//! pass, selecting each block with a dynamic offset.

use rustc_hash::FxHashMap;

use super::dynamic_buffer::{align_to, pack_strided, DynamicBuffer};
use super::pipeline::ScenePipelines;
use super::render_context::RenderContext;
use super::texture::DepthTarget;
use super::uniforms::{DrawUniforms, UniformStaging};
use crate::error::ViewerError;
use crate::mesh::{self, MeshId, MeshInfo, Topology};
use crate::renderer::{ModelLoader, ShaderProgram, ShadingBackend, UniformValue};
use crate::scene::TextureId;
use crate::viewport::ViewportRect;

/// Uploaded geometry for one built-in mesh.
#[derive(Debug)]
struct GpuMesh {
    vertices: DynamicBuffer,
    indices: Option<DynamicBuffer>,
    info: MeshInfo,
}

/// A draw staged for the next [`GpuBackend::present`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StagedDraw {
    rect: ViewportRect,
    mesh: MeshId,
    topology: Topology,
    block: usize,
}

/// Shading backend that renders into the window surface.
#[derive(Debug)]
pub struct GpuBackend {
    context: RenderContext,
    pipelines: ScenePipelines,
    uniform_buffer: DynamicBuffer,
    bind_group: wgpu::BindGroup,
    depth: DepthTarget,
    meshes: FxHashMap<MeshId, GpuMesh>,
    staging: UniformStaging,
    stride: usize,
    clear_color: wgpu::Color,
    viewport: ViewportRect,
    blocks: Vec<DrawUniforms>,
    draws: Vec<StagedDraw>,
}

impl GpuBackend {
    /// Build pipelines, the uniform buffer and the depth target for
    /// `context`. Meshes are uploaded later through [`ModelLoader`].
    #[must_use]
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;
        let pipelines = ScenePipelines::new(device, context.format());
        let stride = align_to(size_of::<DrawUniforms>(), context.uniform_alignment());
        // Room for every draw of a default frame without growing.
        let uniform_buffer = DynamicBuffer::new(
            device,
            "Draw Uniforms",
            stride * 32,
            wgpu::BufferUsages::UNIFORM,
        );
        let bind_group = create_bind_group(device, &pipelines, &uniform_buffer);
        let (width, height) = context.size();
        let depth = DepthTarget::new(device, width, height);

        Self {
            context,
            pipelines,
            uniform_buffer,
            bind_group,
            depth,
            meshes: FxHashMap::default(),
            staging: UniformStaging::default(),
            stride,
            clear_color: wgpu::Color::BLACK,
            viewport: ViewportRect::new(0, 0, width, height),
            blocks: Vec::new(),
            draws: Vec::new(),
        }
    }

    /// The render context.
    #[must_use]
    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Reconfigure the surface and recreate the depth target. Zero-sized
    /// dimensions are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth = DepthTarget::new(&self.context.device, width, height);
    }

    /// Re-apply the surface configuration after it was lost or outdated.
    pub fn reconfigure(&self) {
        self.context.reconfigure();
    }

    /// Number of draws staged since the last `clear`.
    #[must_use]
    pub fn staged_draws(&self) -> usize {
        self.draws.len()
    }

    /// Upload the staged uniform blocks, replay the staged draws into the
    /// next swapchain texture and present it.
    ///
    /// # Errors
    ///
    /// Returns the surface error if no frame could be acquired. The staged
    /// work is dropped in that case.
    pub fn present(&mut self) -> Result<(), wgpu::SurfaceError> {
        let result = self.encode_and_present();
        self.blocks.clear();
        self.draws.clear();
        result
    }

    fn encode_and_present(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.blocks.is_empty() {
            let bytes = pack_strided(&self.blocks, self.stride);
            if self.uniform_buffer.write_bytes(
                &self.context.device,
                &self.context.queue,
                &bytes,
            ) {
                self.bind_group = create_bind_group(
                    &self.context.device,
                    &self.pipelines,
                    &self.uniform_buffer,
                );
            }
        }

        let (frame, view) = self.context.acquire_frame()?;
        let mut encoder = self.context.frame_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Quad View Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            let target = self.context.size();
            for draw in &self.draws {
                let (Some(pipeline), Some(mesh)) = (
                    self.pipelines.get(draw.topology),
                    self.meshes.get(&draw.mesh),
                ) else {
                    continue;
                };
                let Some((x, y, w, h)) = top_left_region(draw.rect, target) else {
                    continue;
                };
                pass.set_viewport(x as f32, y as f32, w as f32, h as f32, 0.0, 1.0);
                pass.set_scissor_rect(x, y, w, h);
                pass.set_pipeline(pipeline);
                let offset = (draw.block * self.stride) as wgpu::DynamicOffset;
                pass.set_bind_group(0, &self.bind_group, &[offset]);
                pass.set_vertex_buffer(0, mesh.vertices.buffer().slice(..));
                match &mesh.indices {
                    Some(indices) => {
                        pass.set_index_buffer(
                            indices.buffer().slice(..),
                            wgpu::IndexFormat::Uint32,
                        );
                        pass.draw_indexed(0..mesh.info.index_count, 0, 0..1);
                    }
                    None => pass.draw(0..mesh.info.vertex_count, 0..1),
                }
            }
        }
        self.context.finish_frame(encoder, frame);
        Ok(())
    }
}

fn create_bind_group(
    device: &wgpu::Device,
    pipelines: &ScenePipelines,
    uniform_buffer: &DynamicBuffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Draw Uniforms Bind Group"),
        layout: &pipelines.bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                buffer: uniform_buffer.buffer(),
                offset: 0,
                size: wgpu::BufferSize::new(size_of::<DrawUniforms>() as u64),
            }),
        }],
    })
}

/// Convert a bottom-left-origin rectangle into a top-left-origin region
/// clipped to a `target` of `(width, height)`. `None` if nothing is left.
fn top_left_region(
    rect: ViewportRect,
    target: (u32, u32),
) -> Option<(u32, u32, u32, u32)> {
    let (target_w, target_h) = target;
    let right = rect.x.saturating_add(rect.width).min(target_w);
    let top = rect.y.saturating_add(rect.height).min(target_h);
    if rect.x >= right || rect.y >= top {
        return None;
    }
    Some((rect.x, target_h - top, right - rect.x, top - rect.y))
}

impl ShadingBackend for GpuBackend {
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: f64::from(color[0]),
            g: f64::from(color[1]),
            b: f64::from(color[2]),
            a: f64::from(color[3]),
        };
        self.blocks.clear();
        self.draws.clear();
    }

    fn set_viewport(&mut self, rect: ViewportRect) {
        self.viewport = rect;
    }

    fn use_program(&mut self, program: ShaderProgram) {
        self.staging.use_program(program);
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if !self.staging.set(name, value) {
            log::warn!("ignoring uniform {name} = {value:?}");
        }
    }

    fn bind_texture(&mut self, unit: u32, texture: TextureId) {
        if !self.staging.bind_texture(unit, texture) {
            log::warn!("ignoring {texture:?} bound to unit {unit}");
        }
    }

    fn draw(&mut self, mesh: MeshId, topology: Topology) {
        if !self.meshes.contains_key(&mesh) {
            log::warn!("draw of unloaded {} mesh skipped", mesh.label());
            return;
        }
        self.draws.push(StagedDraw {
            rect: self.viewport,
            mesh,
            topology,
            block: self.blocks.len(),
        });
        self.blocks.push(self.staging.resolve());
    }
}

impl ModelLoader for GpuBackend {
    fn load_model(&mut self, mesh: MeshId) -> Result<MeshInfo, ViewerError> {
        let data = mesh::generate(mesh);
        if data.vertices.is_empty() {
            return Err(ViewerError::MeshUpload(format!(
                "{} mesh has no vertices",
                mesh.label()
            )));
        }
        let device = &self.context.device;
        let label = mesh.label();
        let vertices = DynamicBuffer::new_with_data(
            device,
            &format!("{label} vertices"),
            &data.vertices,
            wgpu::BufferUsages::VERTEX,
        );
        let indices = data.indices.as_deref().map(|indices| {
            DynamicBuffer::new_with_data(
                device,
                &format!("{label} indices"),
                indices,
                wgpu::BufferUsages::INDEX,
            )
        });
        let info = data.info();
        let _ = self.meshes.insert(
            mesh,
            GpuMesh {
                vertices,
                indices,
                info,
            },
        );
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bottom_left_rects_flip_to_top_left() {
        // Top-right quadrant of 800x600 starts at the top of the target.
        let rect = ViewportRect::new(400, 300, 400, 300);
        assert_eq!(top_left_region(rect, (800, 600)), Some((400, 0, 400, 300)));
        // Bottom-left quadrant ends at the bottom.
        let rect = ViewportRect::new(0, 0, 400, 300);
        assert_eq!(top_left_region(rect, (800, 600)), Some((0, 300, 400, 300)));
    }

    #[test]
    fn regions_are_clipped_to_the_target() {
        let rect = ViewportRect::new(400, 300, 800, 800);
        assert_eq!(top_left_region(rect, (800, 600)), Some((400, 0, 400, 300)));
        let outside = ViewportRect::new(900, 0, 10, 10);
        assert_eq!(top_left_region(outside, (800, 600)), None);
    }
}
