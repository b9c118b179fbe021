use glam::{Mat3, Mat4, Vec3};

use crate::mesh::{MeshId, Topology};
use crate::scene::{Material, ObjectId, PointLight, SceneObject, SceneState, Shading};
use crate::viewport::{Viewport, ViewportLayout, ViewportRect, ViewportRole};

/// Everything needed to draw one frame, in submission order.
#[derive(Debug, Clone, PartialEq)]
pub struct FramePlan {
    /// Framebuffer clear colour.
    pub clear_color: [f32; 4],
    /// Light shared by every scene pass.
    pub light: PointLight,
    /// One pass per viewport, panel first.
    pub passes: Vec<ViewportPass>,
    /// Separator drawn over the whole window after all passes.
    pub overlay: OverlayPass,
}

/// Work for one viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportPass {
    /// Which viewport.
    pub role: ViewportRole,
    /// Unclamped screen rectangle (bottom-left origin).
    pub rect: ViewportRect,
    /// What is drawn there.
    pub content: PassContent,
}

/// Content of a viewport pass.
#[derive(Debug, Clone, PartialEq)]
pub enum PassContent {
    /// The control panel; no 3D draws.
    Panel,
    /// The 3D scene seen through the viewport's camera.
    Scene(ScenePass),
}

/// The scene as seen by one camera.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenePass {
    /// Camera position, for specular terms.
    pub viewpoint: Vec3,
    /// Projection times view.
    pub proj_view: Mat4,
    /// Objects in draw order.
    pub draws: Vec<DrawItem>,
}

/// One object draw with its final matrices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Which object.
    pub object: ObjectId,
    /// Geometry.
    pub mesh: MeshId,
    /// Primitive assembly.
    pub topology: Topology,
    /// Shading path and textures.
    pub shading: Shading,
    /// Surface material.
    pub material: Material,
    /// `proj_view * model`.
    pub mvp: Mat4,
    /// Object-to-world transform.
    pub model: Mat4,
    /// Inverse-transpose of the model's upper 3x3.
    pub normal: Mat3,
}

/// The quadrant separator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayPass {
    /// Full-window rectangle.
    pub rect: ViewportRect,
    /// Separator geometry.
    pub mesh: MeshId,
    /// Line list.
    pub topology: Topology,
    /// Clip-space passthrough.
    pub mvp: Mat4,
}

/// Build the frame plan for the current layout and scene state.
///
/// Pure: the same inputs always produce the same plan.
#[must_use]
pub fn compose(
    layout: &ViewportLayout,
    scene: &SceneState,
    clear_color: [f32; 4],
) -> FramePlan {
    let passes = layout
        .viewports()
        .iter()
        .map(|viewport| ViewportPass {
            role: viewport.role,
            rect: viewport.rect,
            content: if viewport.role.renders_scene() {
                PassContent::Scene(scene_pass(viewport, scene))
            } else {
                PassContent::Panel
            },
        })
        .collect();

    FramePlan {
        clear_color,
        light: scene.light,
        passes,
        overlay: OverlayPass {
            rect: layout.size().full_rect(),
            mesh: MeshId::Border,
            topology: Topology::Lines,
            mvp: Mat4::IDENTITY,
        },
    }
}

fn scene_pass(viewport: &Viewport, scene: &SceneState) -> ScenePass {
    let proj_view = viewport.camera.proj_view();
    ScenePass {
        viewpoint: viewport.camera.position(),
        proj_view,
        draws: scene
            .objects()
            .iter()
            .map(|object| draw_item(proj_view, object))
            .collect(),
    }
}

fn draw_item(proj_view: Mat4, object: &SceneObject) -> DrawItem {
    DrawItem {
        object: object.id,
        mesh: object.mesh,
        topology: object.topology,
        shading: object.shading,
        material: object.material,
        mvp: proj_view * object.model,
        model: object.model,
        normal: normal_matrix(object.model),
    }
}

/// Upper 3x3 of `transpose(inverse(model))`. Singular models fall back to
/// the identity.
#[must_use]
pub fn normal_matrix(model: Mat4) -> Mat3 {
    let linear = Mat3::from_mat4(model);
    let det = linear.determinant();
    if det.abs() <= f32::EPSILON || !det.is_finite() {
        log::warn!("singular model matrix, using identity normal matrix");
        return Mat3::IDENTITY;
    }
    linear.inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::{FramebufferSize, ViewParams};

    fn scene_of(pass: &ViewportPass) -> &ScenePass {
        match &pass.content {
            PassContent::Scene(scene) => scene,
            PassContent::Panel => unreachable!("{:?} has no scene", pass.role),
        }
    }

    fn layout() -> ViewportLayout {
        ViewportLayout::new(FramebufferSize::new(800, 600), ViewParams::default())
    }

    #[test]
    fn compose_is_pure() {
        let (layout, scene) = (layout(), SceneState::default());
        let color = [0.2, 0.2, 0.2, 1.0];
        assert_eq!(
            compose(&layout, &scene, color),
            compose(&layout, &scene, color)
        );
    }

    #[test]
    fn scene_passes_use_each_viewport_camera() {
        let layout = layout();
        let plan = compose(&layout, &SceneState::default(), [0.0; 4]);
        assert_eq!(plan.passes.len(), 4);
        assert_eq!(plan.passes[0].content, PassContent::Panel);
        for (pass, viewport) in plan.passes.iter().zip(layout.viewports()).skip(1) {
            let scene = scene_of(pass);
            assert_eq!(scene.proj_view, viewport.camera.proj_view());
            assert_eq!(scene.viewpoint, viewport.camera.position());
            let ids: Vec<_> = scene.draws.iter().map(|d| d.object).collect();
            assert_eq!(ids, ObjectId::DRAW_ORDER);
        }
    }

    #[test]
    fn mvp_is_proj_view_times_model() {
        let plan = compose(&layout(), &SceneState::default(), [0.0; 4]);
        let scene = scene_of(&plan.passes[3]);
        for item in &scene.draws {
            assert!((scene.proj_view * item.model).abs_diff_eq(item.mvp, 1e-6));
        }
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let model = Mat4::from_scale(Vec3::new(8.0, 1.0, 8.0));
        let n = normal_matrix(model);
        // A 45 degree surface normal stays perpendicular to the scaled tangent.
        let tangent = Mat3::from_mat4(model) * Vec3::new(1.0, 1.0, 0.0);
        let normal = n * Vec3::new(1.0, -1.0, 0.0);
        assert!(tangent.dot(normal).abs() < 1e-5);
    }

    #[test]
    fn singular_model_yields_identity_normal_matrix() {
        assert_eq!(normal_matrix(Mat4::from_scale(Vec3::ZERO)), Mat3::IDENTITY);
    }

    #[test]
    fn overlay_covers_the_window() {
        let plan = compose(&layout(), &SceneState::default(), [0.0; 4]);
        assert_eq!(plan.overlay.rect, ViewportRect::new(0, 0, 800, 600));
        assert_eq!(plan.overlay.mvp, Mat4::IDENTITY);
    }
}
