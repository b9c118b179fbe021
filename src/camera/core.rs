use glam::{Mat4, Vec3};

/// World up axis used when no explicit up vector is given.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Squared length below which a view direction counts as degenerate.
const DEGENERATE_EPSILON: f32 = 1e-12;

/// Upright camera (no roll) holding a view and a projection matrix.
///
/// The view matrix is either set directly from a look-at description
/// ([`set_view_matrix`](Self::set_view_matrix)) or rebuilt from yaw and
/// pitch by [`update`](Self::update). The projection matrix is only ever
/// replaced wholesale by [`set_proj_matrix`](Self::set_proj_matrix) and does
/// not depend on where the camera sits.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    look_at: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    view: Mat4,
    proj: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera {
    /// Camera at the origin with identity view and projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            look_at: Vec3::NEG_Z,
            up: WORLD_UP,
            yaw: 0.0,
            pitch: 0.0,
            view: Mat4::IDENTITY,
            proj: Mat4::IDENTITY,
        }
    }

    /// Place the camera at `position` looking at `look_at` (right-handed).
    ///
    /// Coincident `position` and `look_at` leave the previous view matrix in
    /// place. An `up` vector parallel to the view direction is swapped for
    /// a perpendicular axis so the basis stays well defined.
    pub fn set_view_matrix(&mut self, position: Vec3, look_at: Vec3, up: Vec3) {
        let dir = look_at - position;
        if dir.length_squared() < DEGENERATE_EPSILON
            || !dir.is_finite()
            || !up.is_finite()
        {
            log::warn!(
                "ignoring degenerate look-at: position {position}, target \
                 {look_at}"
            );
            return;
        }
        let up = stable_up(dir, up);

        self.position = position;
        self.look_at = look_at;
        self.up = up;
        self.view = Mat4::look_at_rh(position, look_at, up);
    }

    /// Store a precomputed projection matrix.
    pub fn set_proj_matrix(&mut self, proj: Mat4) {
        self.proj = proj;
    }

    /// Set yaw and pitch in radians.
    ///
    /// Non-finite input is a caller bug: it trips a debug assertion and is
    /// otherwise ignored, keeping the last good orientation.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        debug_assert!(
            yaw.is_finite() && pitch.is_finite(),
            "non-finite camera orientation: yaw {yaw}, pitch {pitch}"
        );
        if yaw.is_finite() && pitch.is_finite() {
            self.yaw = yaw;
            self.pitch = pitch;
        } else {
            log::warn!(
                "keeping yaw {} / pitch {} (got {yaw} / {pitch})",
                self.yaw,
                self.pitch
            );
        }
    }

    /// First-person update: move along the camera's local axes, then
    /// rebuild the view from the current yaw and pitch.
    ///
    /// Forward, right and up start as `-Z`, `+X` and `+Y`, are turned about
    /// world Y by yaw, and forward/up are then tilted about the turned right
    /// axis by pitch.
    pub fn update(&mut self, move_forward: f32, move_right: f32, move_up: f32) {
        let (forward, right, up) = self.basis();

        self.position += forward * move_forward;
        self.position += right * move_right;
        self.position += up * move_up;
        self.look_at = self.position + forward;
        self.up = up;

        self.view = Mat4::look_at_rh(self.position, self.look_at, self.up);
    }

    /// Local (forward, right, up) axes for the current yaw and pitch.
    fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let yaw = Mat4::from_rotation_y(self.yaw);
        let right = yaw.transform_vector3(Vec3::X);
        let pitch = Mat4::from_axis_angle(right, self.pitch);

        let forward = pitch.transform_vector3(yaw.transform_vector3(Vec3::NEG_Z));
        let up = pitch.transform_vector3(yaw.transform_vector3(Vec3::Y));
        (forward, right, up)
    }

    /// The current view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// The current projection matrix.
    #[must_use]
    pub fn proj_matrix(&self) -> Mat4 {
        self.proj
    }

    /// Projection times view.
    #[must_use]
    pub fn proj_view(&self) -> Mat4 {
        self.proj * self.view
    }

    /// Camera position in world space.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Point the camera is looking at.
    #[must_use]
    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    /// Yaw in radians.
    #[must_use]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in radians.
    #[must_use]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

/// Return `up`, or a perpendicular fallback when it is (anti)parallel to
/// `dir`.
fn stable_up(dir: Vec3, up: Vec3) -> Vec3 {
    if dir.cross(up).length_squared() > DEGENERATE_EPSILON {
        return up;
    }
    let fallback = if dir.normalize().dot(Vec3::Z).abs() < 0.9 {
        Vec3::Z
    } else {
        Vec3::X
    };
    log::warn!("up vector {up} parallel to view direction, using {fallback}");
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_vec(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn new_camera_has_identity_matrices() {
        let cam = Camera::new();
        assert_eq!(cam.view_matrix(), Mat4::IDENTITY);
        assert_eq!(cam.proj_matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn look_at_is_deterministic() {
        let mut a = Camera::new();
        let mut b = Camera::new();
        let eye = Vec3::new(0.3, 4.0, 8.0);
        a.set_view_matrix(eye, Vec3::ZERO, WORLD_UP);
        b.set_view_matrix(eye, Vec3::ZERO, WORLD_UP);
        assert_eq!(
            a.view_matrix().to_cols_array(),
            b.view_matrix().to_cols_array()
        );
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::new(0.0, 0.0, 8.0), Vec3::ZERO, WORLD_UP);
        let eye_in_view = cam.view_matrix().transform_point3(cam.position());
        assert!(approx_vec(eye_in_view, Vec3::ZERO));
        // Target sits straight ahead (-Z in view space).
        let target = cam.view_matrix().transform_point3(Vec3::ZERO);
        assert!(approx_vec(target, Vec3::new(0.0, 0.0, -8.0)));
    }

    #[test]
    fn coincident_look_at_keeps_previous_view() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, WORLD_UP);
        let before = cam.view_matrix();
        cam.set_view_matrix(Vec3::ONE, Vec3::ONE, WORLD_UP);
        assert_eq!(cam.view_matrix(), before);
        assert_eq!(cam.position(), Vec3::new(0.0, 0.0, 7.0));
    }

    #[test]
    fn parallel_up_falls_back_to_finite_view() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::new(0.0, 15.0, 0.0), Vec3::ZERO, WORLD_UP);
        assert!(cam.view_matrix().is_finite());
    }

    #[test]
    fn projection_is_independent_of_placement() {
        let mut cam = Camera::new();
        let proj = Mat4::perspective_rh(1.2, 1.5, 0.1, 100.0);
        cam.set_proj_matrix(proj);
        cam.set_view_matrix(Vec3::new(2.0, 3.0, 4.0), Vec3::ZERO, WORLD_UP);
        cam.update(1.0, 0.5, 0.0);
        assert_eq!(cam.proj_matrix(), proj);
    }

    #[test]
    fn zero_update_is_idempotent() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, WORLD_UP);
        cam.set_orientation(0.4, -0.2);
        cam.update(0.0, 0.0, 0.0);
        let first = cam.view_matrix();
        cam.update(0.0, 0.0, 0.0);
        assert_eq!(first, cam.view_matrix());
    }

    #[test]
    fn zero_orientation_update_matches_initial_look_at() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::new(0.0, 0.0, 7.0), Vec3::ZERO, WORLD_UP);
        let initial = cam.view_matrix();
        cam.update(0.0, 0.0, 0.0);
        assert!(cam.view_matrix().abs_diff_eq(initial, 1e-5));
    }

    #[test]
    fn forward_movement_follows_yaw() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::ZERO, Vec3::NEG_Z, WORLD_UP);
        cam.set_orientation(std::f32::consts::FRAC_PI_2, 0.0);
        cam.update(1.0, 0.0, 0.0);
        // Turning left by 90 degrees points forward along -X.
        assert!(approx_vec(cam.position(), Vec3::NEG_X));
    }

    #[test]
    fn pitch_tilts_forward_vector() {
        let mut cam = Camera::new();
        cam.set_view_matrix(Vec3::ZERO, Vec3::NEG_Z, WORLD_UP);
        cam.set_orientation(0.0, std::f32::consts::FRAC_PI_2);
        cam.update(0.0, 0.0, 0.0);
        assert!(approx_vec(cam.look_at() - cam.position(), Vec3::Y));
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn non_finite_orientation_keeps_last_good() {
        let mut cam = Camera::new();
        cam.set_orientation(0.25, 0.5);
        cam.set_orientation(f32::NAN, 0.0);
        assert_eq!((cam.yaw(), cam.pitch()), (0.25, 0.5));
    }

    #[test]
    #[should_panic(expected = "non-finite camera orientation")]
    #[cfg(debug_assertions)]
    fn non_finite_orientation_asserts_in_debug() {
        let mut cam = Camera::new();
        cam.set_orientation(f32::INFINITY, 0.0);
    }
}
