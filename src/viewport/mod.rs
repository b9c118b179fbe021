//! Quadrant layout for the four viewports.
//!
//! The window is split into four quadrants, each owning one [`Camera`]:
//!
//! ```text
//! +-----------+-----------+
//! |  0 panel  | 1 top-down|
//! +-----------+-----------+
//! |  2 side   | 3 free-look
//! +-----------+-----------+
//! ```
//!
//! Rectangles use a bottom-left origin in physical pixels. A resize
//! recomputes every rectangle and projection but never moves a camera.

use glam::Vec3;

use crate::camera::{Camera, Projection, WORLD_UP};

/// Default distance the side orthographic view is sized for.
pub const SIDE_VIEW_DISTANCE: f32 = 12.0;
/// Default top-down zoom.
pub const DEFAULT_ZOOM: f32 = 15.0;
/// Where the side camera sits.
pub const SIDE_EYE: Vec3 = Vec3::new(0.0, 0.0, 8.0);
/// Where the free-look camera starts.
pub const FREE_LOOK_EYE: Vec3 = Vec3::new(0.0, 0.0, 7.0);
/// Up vector of the top-down camera (screen-up points to -Z).
pub const TOP_DOWN_UP: Vec3 = Vec3::NEG_Z;

/// Live parameters that size the orthographic views.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// Top-down camera height and orthographic sizing distance.
    pub zoom: f32,
    /// Sizing distance of the side view.
    pub side_distance: f32,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            side_distance: SIDE_VIEW_DISTANCE,
        }
    }
}

/// Framebuffer size in physical pixels, never smaller than 1x1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FramebufferSize {
    width: u32,
    height: u32,
}

impl FramebufferSize {
    /// Clamp each dimension to at least one pixel.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        if width == 0 || height == 0 {
            log::debug!("clamping framebuffer size {width}x{height}");
        }
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(self) -> u32 {
        self.height
    }

    /// Width over height.
    #[must_use]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Rectangle covering the whole framebuffer.
    #[must_use]
    pub fn full_rect(self) -> ViewportRect {
        ViewportRect::new(0, 0, self.width, self.height)
    }
}

/// Screen-space rectangle in physical pixels, bottom-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewportRect {
    /// Left edge.
    pub x: u32,
    /// Bottom edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportRect {
    /// Rectangle from origin and size.
    #[must_use]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Number of pixels covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Whether the pixel `(px, py)` lies inside.
    #[must_use]
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x
            && py >= self.y
            && px - self.x < self.width
            && py - self.y < self.height
    }

    /// Copy with width and height raised to at least one pixel, for binding
    /// as a draw region.
    #[must_use]
    pub fn clamped(&self) -> Self {
        Self {
            width: self.width.max(1),
            height: self.height.max(1),
            ..*self
        }
    }
}

/// What a viewport shows and how it projects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewportRole {
    /// Control panel; no 3D content.
    Panel,
    /// Orthographic view looking straight down at the origin.
    TopDown,
    /// Orthographic view looking along -Z at the origin.
    Side,
    /// Perspective view driven by live yaw/pitch.
    FreeLook,
}

impl ViewportRole {
    /// Roles in draw order.
    pub const ALL: [Self; 4] =
        [Self::Panel, Self::TopDown, Self::Side, Self::FreeLook];

    /// Whether this viewport draws the 3D scene.
    #[must_use]
    pub fn renders_scene(self) -> bool {
        !matches!(self, Self::Panel)
    }
}

/// One quadrant: its rectangle, projection and owned camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    /// What this viewport shows.
    pub role: ViewportRole,
    /// Screen rectangle (bottom-left origin).
    pub rect: ViewportRect,
    /// Parameters the camera's projection matrix was built from.
    pub projection: Projection,
    /// The viewport's own camera.
    pub camera: Camera,
}

impl Viewport {
    fn new(role: ViewportRole) -> Self {
        Self {
            role,
            rect: ViewportRect::default(),
            projection: Projection::None,
            camera: Camera::new(),
        }
    }

    fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.camera.set_proj_matrix(projection.matrix());
    }
}

/// The four viewports tiling the window.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportLayout {
    size: FramebufferSize,
    viewports: [Viewport; 4],
}

impl ViewportLayout {
    /// Lay out the quadrants for `size` and place every camera.
    ///
    /// `params.zoom` sizes the top-down view and sets the top-down camera
    /// height. The height is not revisited when the zoom changes later.
    #[must_use]
    pub fn new(size: FramebufferSize, params: ViewParams) -> Self {
        let mut layout = Self {
            size,
            viewports: ViewportRole::ALL.map(Viewport::new),
        };

        layout
            .viewport_mut(ViewportRole::TopDown)
            .camera
            .set_view_matrix(
                Vec3::new(0.0, params.zoom, 0.0),
                Vec3::ZERO,
                TOP_DOWN_UP,
            );
        layout
            .viewport_mut(ViewportRole::Side)
            .camera
            .set_view_matrix(SIDE_EYE, Vec3::ZERO, WORLD_UP);
        layout
            .viewport_mut(ViewportRole::FreeLook)
            .camera
            .set_view_matrix(FREE_LOOK_EYE, Vec3::ZERO, WORLD_UP);

        layout.resize(size, params);
        layout
    }

    /// Recompute rectangles and projections for a new framebuffer size.
    ///
    /// Camera placement and orientation are untouched.
    pub fn resize(&mut self, size: FramebufferSize, params: ViewParams) {
        self.size = size;
        let rects = quadrants(size);
        for (viewport, rect) in self.viewports.iter_mut().zip(rects) {
            viewport.rect = rect;
        }
        self.apply_projections(params);
        log::info!(
            "layout {}x{}: quadrants {:?}",
            size.width(),
            size.height(),
            rects.map(|r| (r.x, r.y, r.width, r.height))
        );
    }

    /// Rebuild the projection matrices for the current size.
    pub fn apply_projections(&mut self, params: ViewParams) {
        let aspect = self.size.aspect();
        self.viewport_mut(ViewportRole::TopDown)
            .set_projection(Projection::orthographic_at(params.zoom, aspect));
        self.viewport_mut(ViewportRole::Side).set_projection(
            Projection::orthographic_at(params.side_distance, aspect),
        );
        self.viewport_mut(ViewportRole::FreeLook)
            .set_projection(Projection::perspective(aspect));
    }

    /// Current framebuffer size.
    #[must_use]
    pub fn size(&self) -> FramebufferSize {
        self.size
    }

    /// All four viewports in draw order.
    #[must_use]
    pub fn viewports(&self) -> &[Viewport; 4] {
        &self.viewports
    }

    /// Viewport by draw index (0..4).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Viewport> {
        self.viewports.get(index)
    }

    /// Viewport for `role`.
    #[must_use]
    pub fn viewport(&self, role: ViewportRole) -> &Viewport {
        &self.viewports[role_index(role)]
    }

    /// Mutable viewport for `role`.
    pub fn viewport_mut(&mut self, role: ViewportRole) -> &mut Viewport {
        &mut self.viewports[role_index(role)]
    }
}

fn role_index(role: ViewportRole) -> usize {
    match role {
        ViewportRole::Panel => 0,
        ViewportRole::TopDown => 1,
        ViewportRole::Side => 2,
        ViewportRole::FreeLook => 3,
    }
}

/// Split `size` into panel, top-down, side and free-look rectangles.
///
/// The left column and bottom row get the floored half; the right column
/// and top row take the remainder so odd sizes still tile exactly.
#[must_use]
pub fn quadrants(size: FramebufferSize) -> [ViewportRect; 4] {
    let (w, h) = (size.width(), size.height());
    let left_w = w / 2;
    let right_w = w - left_w;
    let bottom_h = h / 2;
    let top_h = h - bottom_h;

    [
        ViewportRect::new(0, bottom_h, left_w, top_h),
        ViewportRect::new(left_w, bottom_h, right_w, top_h),
        ViewportRect::new(0, 0, left_w, bottom_h),
        ViewportRect::new(left_w, 0, right_w, bottom_h),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_tiles(size: FramebufferSize) {
        let rects = quadrants(size);
        let total: u64 = rects.iter().map(ViewportRect::area).sum();
        assert_eq!(
            total,
            u64::from(size.width()) * u64::from(size.height())
        );
        // Sample every pixel of small windows, corners of large ones.
        let (w, h) = (size.width(), size.height());
        let xs: Vec<u32> = if w <= 64 {
            (0..w).collect()
        } else {
            vec![0, w / 2 - 1, w / 2, w - 1]
        };
        let ys: Vec<u32> = if h <= 64 {
            (0..h).collect()
        } else {
            vec![0, h / 2 - 1, h / 2, h - 1]
        };
        for &x in &xs {
            for &y in &ys {
                let hits = rects.iter().filter(|r| r.contains(x, y)).count();
                assert_eq!(hits, 1, "pixel ({x},{y}) in {size:?}");
            }
        }
    }

    #[test]
    fn quadrants_partition_even_and_odd_sizes() {
        for (w, h) in [(800, 600), (1600, 600), (801, 601), (1, 1), (3, 2), (37, 64)]
        {
            assert_tiles(FramebufferSize::new(w, h));
        }
    }

    #[test]
    fn quadrants_for_800x600() {
        let rects = quadrants(FramebufferSize::new(800, 600));
        assert_eq!(rects[0], ViewportRect::new(0, 300, 400, 300));
        assert_eq!(rects[1], ViewportRect::new(400, 300, 400, 300));
        assert_eq!(rects[2], ViewportRect::new(0, 0, 400, 300));
        assert_eq!(rects[3], ViewportRect::new(400, 0, 400, 300));
    }

    #[test]
    fn zero_size_is_clamped() {
        let size = FramebufferSize::new(0, 0);
        assert_eq!((size.width(), size.height()), (1, 1));
        assert!(size.aspect().is_finite());
    }

    #[test]
    fn clamped_rect_is_at_least_one_pixel() {
        let rect = ViewportRect::new(0, 0, 0, 3).clamped();
        assert_eq!((rect.width, rect.height), (1, 3));
    }

    #[test]
    fn resize_preserves_camera_placement() {
        let mut layout = ViewportLayout::new(FramebufferSize::new(800, 600), ViewParams::default());
        let views: Vec<_> = layout
            .viewports()
            .iter()
            .map(|v| v.camera.view_matrix())
            .collect();
        layout.resize(FramebufferSize::new(1024, 300), ViewParams::default());
        for (v, before) in layout.viewports().iter().zip(views) {
            assert_eq!(v.camera.view_matrix(), before);
        }
    }

    #[test]
    fn doubling_aspect_only_widens_orthographic_views() {
        let mut layout = ViewportLayout::new(FramebufferSize::new(800, 600), ViewParams::default());
        let before = [ViewportRole::TopDown, ViewportRole::Side]
            .map(|role| layout.viewport(role).projection);
        layout.resize(FramebufferSize::new(1600, 600), ViewParams::default());
        for (role, old) in [ViewportRole::TopDown, ViewportRole::Side]
            .into_iter()
            .zip(before)
        {
            let new = layout.viewport(role).projection;
            let (old_w, old_h) = old.half_extents().unwrap();
            let (new_w, new_h) = new.half_extents().unwrap();
            assert!((new_w - 2.0 * old_w).abs() < 1e-5);
            assert_eq!(new_h, old_h);
            assert_eq!(new.depth_range(), old.depth_range());
        }
    }

    #[test]
    fn top_down_is_sized_by_zoom() {
        let layout = ViewportLayout::new(FramebufferSize::new(800, 600), ViewParams::default());
        let (_, hh) = layout
            .viewport(ViewportRole::TopDown)
            .projection
            .half_extents()
            .unwrap();
        assert!((hh - 30f32.to_radians().tan() * 15.0).abs() < 1e-5);
        let eye = layout.viewport(ViewportRole::TopDown).camera.position();
        assert_eq!(eye, Vec3::new(0.0, 15.0, 0.0));
    }

    #[test]
    fn panel_has_no_projection() {
        let layout = ViewportLayout::new(FramebufferSize::new(800, 600), ViewParams::default());
        let panel = layout.viewport(ViewportRole::Panel);
        assert_eq!(panel.projection, Projection::None);
        assert!(!panel.role.renders_scene());
    }
}
