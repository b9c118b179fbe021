//! Projection descriptors for the three camera modes.
//!
//! A [`Projection`] keeps the parameters a matrix was built from so callers
//! can inspect extents after a resize without decomposing the matrix.

use glam::Mat4;

/// Near plane shared by both orthographic viewports.
pub const ORTHO_NEAR: f32 = 0.01;
/// Far plane shared by all projections.
pub const FAR: f32 = 100.0;
/// Near plane of the perspective viewport.
pub const PERSPECTIVE_NEAR: f32 = 0.1;
/// Vertical field of view of the perspective viewport, in degrees.
pub const PERSPECTIVE_FOVY_DEGREES: f32 = 70.0;
/// Half of the 60 degree reference angle used to size orthographic views.
pub const ORTHO_HALF_ANGLE_DEGREES: f32 = 30.0;

/// Projection parameters for one viewport camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// No 3D projection (the control panel).
    None,
    /// Symmetric orthographic box.
    Orthographic {
        /// Half of the horizontal extent.
        half_width: f32,
        /// Half of the vertical extent.
        half_height: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
    /// Symmetric perspective frustum.
    Perspective {
        /// Vertical field of view in degrees.
        fovy_degrees: f32,
        /// Width over height.
        aspect: f32,
        /// Near clipping plane.
        near: f32,
        /// Far clipping plane.
        far: f32,
    },
}

impl Projection {
    /// Orthographic box whose half-height is `tan(30 deg) * distance`,
    /// widened by `aspect`.
    #[must_use]
    pub fn orthographic_at(distance: f32, aspect: f32) -> Self {
        let half_height = ORTHO_HALF_ANGLE_DEGREES.to_radians().tan() * distance;
        Self::Orthographic {
            half_width: half_height * aspect,
            half_height,
            near: ORTHO_NEAR,
            far: FAR,
        }
    }

    /// The fixed 70 degree perspective frustum for `aspect`.
    #[must_use]
    pub fn perspective(aspect: f32) -> Self {
        Self::Perspective {
            fovy_degrees: PERSPECTIVE_FOVY_DEGREES,
            aspect,
            near: PERSPECTIVE_NEAR,
            far: FAR,
        }
    }

    /// Build the projection matrix (wgpu depth range `[0, 1]`).
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::None => Mat4::IDENTITY,
            Self::Orthographic {
                half_width,
                half_height,
                near,
                far,
            } => Mat4::orthographic_rh(
                -half_width,
                half_width,
                -half_height,
                half_height,
                near,
                far,
            ),
            Self::Perspective {
                fovy_degrees,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fovy_degrees.to_radians(), aspect, near, far),
        }
    }

    /// Horizontal and vertical half extents of an orthographic box.
    #[must_use]
    pub fn half_extents(&self) -> Option<(f32, f32)> {
        match *self {
            Self::Orthographic {
                half_width,
                half_height,
                ..
            } => Some((half_width, half_height)),
            _ => None,
        }
    }

    /// Near and far planes, if this is a 3D projection.
    #[must_use]
    pub fn depth_range(&self) -> Option<(f32, f32)> {
        match *self {
            Self::None => None,
            Self::Orthographic { near, far, .. }
            | Self::Perspective { near, far, .. } => Some((near, far)),
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;

    #[test]
    fn orthographic_half_height_uses_thirty_degrees() {
        let proj = Projection::orthographic_at(12.0, 1.0);
        let (_, half_height) = proj.half_extents().unwrap();
        assert!((half_height - 30f32.to_radians().tan() * 12.0).abs() < 1e-6);
    }

    #[test]
    fn orthographic_matrix_maps_extents_to_clip_edges() {
        let proj = Projection::orthographic_at(15.0, 4.0 / 3.0);
        let (hw, hh) = proj.half_extents().unwrap();
        let m = proj.matrix();
        let corner = m.project_point3(Vec3::new(hw, hh, -1.0));
        assert!((corner.x - 1.0).abs() < 1e-5);
        assert!((corner.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn perspective_depth_range_is_zero_to_one() {
        let m = Projection::perspective(1.0).matrix();
        let near = m.project_point3(Vec3::new(0.0, 0.0, -PERSPECTIVE_NEAR));
        let far = m.project_point3(Vec3::new(0.0, 0.0, -FAR));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn panel_has_no_depth_range() {
        assert_eq!(Projection::None.depth_range(), None);
        assert_eq!(Projection::None.matrix(), Mat4::IDENTITY);
    }
}
