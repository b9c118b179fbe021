//! Scene pipelines: one per draw topology, sharing a shader module, a
//! vertex layout and a dynamic-offset uniform binding.

use rustc_hash::FxHashMap;

use super::uniforms::DrawUniforms;
use crate::mesh::{Topology, Vertex};
use crate::renderer::pipeline_util::{
    depth_stencil_state, primitive_state, surface_fragment_target,
};

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x3,
    3 => Float32x2,
    4 => Float32x3,
];

/// Vertex buffer layout matching [`Vertex`].
#[must_use]
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Vertex+fragment-visible uniform buffer binding with a dynamic offset.
#[must_use]
pub fn dynamic_uniform_buffer(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: true,
            min_binding_size: wgpu::BufferSize::new(
                size_of::<DrawUniforms>() as u64,
            ),
        },
        count: None,
    }
}

/// The render pipelines and the bind group layout they share.
#[derive(Debug)]
pub struct ScenePipelines {
    /// Layout of the per-draw uniform bind group.
    pub bind_group_layout: wgpu::BindGroupLayout,
    pipelines: FxHashMap<Topology, wgpu::RenderPipeline>,
}

impl ScenePipelines {
    /// Build every topology's pipeline for `format`.
    #[must_use]
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::include_wgsl!(
            "../../assets/shaders/scene.wgsl"
        ));

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Draw Uniforms Layout"),
                entries: &[dynamic_uniform_buffer(0)],
            });
        let layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

        let pipelines = [Topology::Triangles, Topology::TriangleStrip, Topology::Lines]
            .into_iter()
            .map(|topology| {
                let pipeline = create_scene_pipeline(device, &layout, &shader, format, topology);
                (topology, pipeline)
            })
            .collect();

        Self {
            bind_group_layout,
            pipelines,
        }
    }

    /// Pipeline for `topology`.
    #[must_use]
    pub fn get(&self, topology: Topology) -> Option<&wgpu::RenderPipeline> {
        self.pipelines.get(&topology)
    }
}

fn create_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: Topology,
) -> wgpu::RenderPipeline {
    let label = format!("Scene {topology:?} Pipeline");
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &surface_fragment_target(format),
            compilation_options: Default::default(),
        }),
        primitive: primitive_state(topology),
        depth_stencil: Some(depth_stencil_state()),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_layout_covers_the_whole_vertex() {
        let layout = vertex_layout();
        assert_eq!(layout.array_stride, size_of::<Vertex>() as u64);
        let last = layout.attributes.last().unwrap();
        assert_eq!(last.offset + 12, size_of::<Vertex>() as u64);
    }
}
