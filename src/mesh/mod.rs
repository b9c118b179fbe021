//! Built-in geometry for the scene objects.
//!
//! All meshes share one vertex layout so a single pipeline family can draw
//! them. Flat pieces are four-vertex triangle strips, the torus is an
//! indexed triangle list, and the separator is a four-vertex line list.
//! The control panel draws unit quads over `[0, 1]²` scaled into place.

use std::f32::consts::TAU;

/// Interleaved vertex shared by every built-in mesh (56 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Object-space tangent (normal-mapped meshes only).
    pub tangent: [f32; 3],
    /// Texture coordinate.
    pub uv: [f32; 2],
    /// Per-vertex colour (separator lines only).
    pub color: [f32; 3],
}

/// Identifier of a built-in mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeshId {
    /// Unit XZ quad with a 5x repeating texture.
    Floor,
    /// Unit XZ quad with a single texture tile.
    Painting,
    /// Ring around the Y axis.
    Torus,
    /// Unit XY quad with tangents and a 2x repeating texture.
    Wall,
    /// Cross separating the four quadrants in clip space.
    Border,
    /// Unit quad in the panel's row colour.
    PanelRow,
    /// Unit quad in the panel's value-fill colour.
    PanelFill,
}

impl MeshId {
    /// Every built-in mesh.
    pub const ALL: [Self; 7] = [
        Self::Floor,
        Self::Painting,
        Self::Torus,
        Self::Wall,
        Self::Border,
        Self::PanelRow,
        Self::PanelFill,
    ];

    /// Human-readable name used in logs and GPU labels.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Floor => "floor",
            Self::Painting => "painting",
            Self::Torus => "torus",
            Self::Wall => "wall",
            Self::Border => "viewport border",
            Self::PanelRow => "panel row",
            Self::PanelFill => "panel fill",
        }
    }
}

/// Primitive assembly for a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Independent triangles.
    Triangles,
    /// Triangle strip.
    TriangleStrip,
    /// Independent line segments.
    Lines,
}

/// Counts the draw layer needs to issue a draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MeshInfo {
    /// Number of vertices.
    pub vertex_count: u32,
    /// Number of indices (zero for non-indexed meshes).
    pub index_count: u32,
    /// Whether the mesh is drawn with an index buffer.
    pub has_indices: bool,
}

/// CPU-side geometry.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    /// Vertices.
    pub vertices: Vec<Vertex>,
    /// Triangle-list indices, if indexed.
    pub indices: Option<Vec<u32>>,
}

impl MeshData {
    /// Vertex/index counts.
    #[must_use]
    pub fn info(&self) -> MeshInfo {
        MeshInfo {
            vertex_count: self.vertices.len() as u32,
            index_count: self.indices.as_ref().map_or(0, |i| i.len() as u32),
            has_indices: self.indices.is_some(),
        }
    }
}

/// Major radius of the built-in torus.
pub const TORUS_MAJOR_RADIUS: f32 = 0.7;
/// Minor (tube) radius of the built-in torus.
pub const TORUS_MINOR_RADIUS: f32 = 0.25;
const TORUS_RINGS: u32 = 48;
const TORUS_SIDES: u32 = 24;
const PANEL_ROW_COLOR: [f32; 3] = [0.35, 0.35, 0.4];
const PANEL_FILL_COLOR: [f32; 3] = [0.3, 0.55, 0.9];

/// Generate the geometry for `id`.
#[must_use]
pub fn generate(id: MeshId) -> MeshData {
    match id {
        MeshId::Floor => xz_quad(5.0),
        MeshId::Painting => xz_quad(1.0),
        MeshId::Torus => torus(
            TORUS_MAJOR_RADIUS,
            TORUS_MINOR_RADIUS,
            TORUS_RINGS,
            TORUS_SIDES,
        ),
        MeshId::Wall => xy_quad(2.0),
        MeshId::Border => border_cross(),
        MeshId::PanelRow => unit_quad(PANEL_ROW_COLOR),
        MeshId::PanelFill => unit_quad(PANEL_FILL_COLOR),
    }
}

fn vertex(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Vertex {
    Vertex {
        position,
        normal,
        tangent: [0.0; 3],
        uv,
        color: [1.0; 3],
    }
}

/// Upward-facing quad spanning `[-1, 1]` in X and Z (strip order).
fn xz_quad(repeat: f32) -> MeshData {
    let up = [0.0, 1.0, 0.0];
    MeshData {
        vertices: vec![
            vertex([-1.0, 0.0, 1.0], up, [0.0, 0.0]),
            vertex([1.0, 0.0, 1.0], up, [repeat, 0.0]),
            vertex([-1.0, 0.0, -1.0], up, [0.0, repeat]),
            vertex([1.0, 0.0, -1.0], up, [repeat, repeat]),
        ],
        indices: None,
    }
}

/// Front-facing quad spanning `[-1, 1]` in X and Y with +X tangents.
fn xy_quad(repeat: f32) -> MeshData {
    let front = [0.0, 0.0, 1.0];
    let mut vertices = vec![
        vertex([-1.0, -1.0, 0.0], front, [0.0, 0.0]),
        vertex([1.0, -1.0, 0.0], front, [repeat, 0.0]),
        vertex([-1.0, 1.0, 0.0], front, [0.0, repeat]),
        vertex([1.0, 1.0, 0.0], front, [repeat, repeat]),
    ];
    for v in &mut vertices {
        v.tangent = [1.0, 0.0, 0.0];
    }
    MeshData {
        vertices,
        indices: None,
    }
}

/// Two white segments splitting clip space into quadrants.
fn border_cross() -> MeshData {
    let none = [0.0; 3];
    MeshData {
        vertices: vec![
            vertex([-1.0, 0.0, 0.0], none, [0.0, 0.0]),
            vertex([1.0, 0.0, 0.0], none, [0.0, 0.0]),
            vertex([0.0, 1.0, 0.0], none, [0.0, 0.0]),
            vertex([0.0, -1.0, 0.0], none, [0.0, 0.0]),
        ],
        indices: None,
    }
}

/// Flat quad spanning `[0, 1]` in X and Y, placed by its MVP.
fn unit_quad(color: [f32; 3]) -> MeshData {
    let front = [0.0, 0.0, 1.0];
    let mut vertices = vec![
        vertex([0.0, 0.0, 0.0], front, [0.0, 0.0]),
        vertex([1.0, 0.0, 0.0], front, [1.0, 0.0]),
        vertex([0.0, 1.0, 0.0], front, [0.0, 1.0]),
        vertex([1.0, 1.0, 0.0], front, [1.0, 1.0]),
    ];
    for v in &mut vertices {
        v.color = color;
    }
    MeshData {
        vertices,
        indices: None,
    }
}

/// Ring around the Y axis: `rings` segments around the hole, `sides`
/// around the tube.
fn torus(major: f32, minor: f32, rings: u32, sides: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(((rings + 1) * (sides + 1)) as usize);
    for i in 0..=rings {
        let u = i as f32 / rings as f32;
        let (su, cu) = (u * TAU).sin_cos();
        for j in 0..=sides {
            let v = j as f32 / sides as f32;
            let (sv, cv) = (v * TAU).sin_cos();
            let normal = [cu * cv, sv, su * cv];
            let position = [
                (major + minor * cv) * cu,
                minor * sv,
                (major + minor * cv) * su,
            ];
            vertices.push(Vertex {
                position,
                normal,
                tangent: [-su, 0.0, cu],
                uv: [u, v],
                color: [1.0; 3],
            });
        }
    }

    let stride = sides + 1;
    let mut indices = Vec::with_capacity((rings * sides * 6) as usize);
    for i in 0..rings {
        for j in 0..sides {
            let a = i * stride + j;
            let b = (i + 1) * stride + j;
            indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }

    MeshData {
        vertices,
        indices: Some(indices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_is_tightly_packed() {
        assert_eq!(size_of::<Vertex>(), 56);
    }

    #[test]
    fn flat_meshes_are_four_vertex_strips() {
        for id in [
            MeshId::Floor,
            MeshId::Painting,
            MeshId::Wall,
            MeshId::Border,
            MeshId::PanelRow,
            MeshId::PanelFill,
        ] {
            let info = generate(id).info();
            assert_eq!(info.vertex_count, 4, "{id:?}");
            assert!(!info.has_indices);
            assert_eq!(info.index_count, 0);
        }
    }

    #[test]
    fn torus_indices_are_in_range() {
        let torus = generate(MeshId::Torus);
        let info = torus.info();
        assert!(info.has_indices);
        assert_eq!(info.index_count, TORUS_RINGS * TORUS_SIDES * 6);
        let indices = torus.indices.unwrap();
        assert!(indices.iter().all(|&i| i < info.vertex_count));
    }

    #[test]
    fn torus_vertices_lie_on_the_tube() {
        for v in generate(MeshId::Torus).vertices {
            let [x, y, z] = v.position;
            let ring = (x * x + z * z).sqrt() - TORUS_MAJOR_RADIUS;
            let dist = (ring * ring + y * y).sqrt();
            assert!((dist - TORUS_MINOR_RADIUS).abs() < 1e-5);
        }
    }

    #[test]
    fn floor_texture_repeats_five_times() {
        let floor = generate(MeshId::Floor);
        assert_eq!(floor.vertices[3].uv, [5.0, 5.0]);
    }
}
