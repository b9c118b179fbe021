use crate::gpu::texture::DEPTH_FORMAT;
use crate::mesh::Topology;

/// Single opaque colour target in the surface format.
pub(crate) fn surface_fragment_target(
    format: wgpu::TextureFormat,
) -> [Option<wgpu::ColorTargetState>; 1] {
    [Some(wgpu::ColorTargetState {
        format,
        blend: None,
        write_mask: wgpu::ColorWrites::ALL,
    })]
}

/// Standard depth-stencil state used by all scene pipelines.
pub(crate) fn depth_stencil_state() -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

/// Primitive state for a draw topology. Culling stays off so both sides of
/// the flat quads render.
pub(crate) fn primitive_state(topology: Topology) -> wgpu::PrimitiveState {
    let (topology, strip_index_format) = match topology {
        Topology::Triangles => (wgpu::PrimitiveTopology::TriangleList, None),
        Topology::TriangleStrip => (wgpu::PrimitiveTopology::TriangleStrip, None),
        Topology::Lines => (wgpu::PrimitiveTopology::LineList, None),
    };
    wgpu::PrimitiveState {
        topology,
        strip_index_format,
        front_face: wgpu::FrontFace::Ccw,
        cull_mode: None,
        ..Default::default()
    }
}
