//! The scene engine: owns the layout, scene, animation clock and live
//! options, and drives one frame at a time.
//!
//! The engine never touches a GPU directly. [`SceneEngine::render`] composes
//! a [`FramePlan`] and submits it to whichever [`ShadingBackend`] the caller
//! provides.

mod input;
mod options;

use rustc_hash::FxHashMap;

use crate::error::ViewerError;
use crate::mesh::{MeshId, MeshInfo};
use crate::options::Options;
use crate::renderer::{self, DebugGui, FramePlan, ModelLoader, ShadingBackend};
use crate::scene::{AnimationClock, SceneState, SpinTransform};
use crate::util::frame_timing::{FrameStats, FrameTiming};
use crate::viewport::{FramebufferSize, ViewportLayout, ViewportRole};

/// Owns all viewer state and runs the update/render cycle.
///
/// # Example
///
/// ```ignore
/// let mut engine = SceneEngine::new(size, Options::default(), &mut backend)?;
/// loop {
///     let _ = engine.tick();
///     engine.render(&mut backend, &mut panel);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SceneEngine {
    options: Options,
    layout: ViewportLayout,
    scene: SceneState,
    clock: AnimationClock,
    frame_timing: FrameTiming,
    meshes: FxHashMap<MeshId, MeshInfo>,
}

impl SceneEngine {
    /// Build the engine for a framebuffer of `size` and load every
    /// built-in mesh through `loader`.
    ///
    /// # Errors
    ///
    /// Returns the loader's error if a mesh cannot be prepared.
    pub fn new(
        size: FramebufferSize,
        mut options: Options,
        loader: &mut dyn ModelLoader,
    ) -> Result<Self, ViewerError> {
        options.sanitize();
        let mut meshes = FxHashMap::default();
        for id in MeshId::ALL {
            let info = loader.load_model(id)?;
            log::debug!(
                "loaded {} mesh: {} vertices, {} indices",
                id.label(),
                info.vertex_count,
                info.index_count
            );
            let _ = meshes.insert(id, info);
        }

        let layout = ViewportLayout::new(size, options.camera.view_params());
        let scene = SceneState::new(
            spin_for(&options),
            options.lighting.to_light(),
        );
        let clock = AnimationClock::new(options.animation.enabled);
        log::info!(
            "engine ready: {}x{}, {} objects",
            size.width(),
            size.height(),
            scene.objects().len()
        );

        Ok(Self {
            options,
            layout,
            scene,
            clock,
            frame_timing: FrameTiming::new(),
            meshes,
        })
    }

    /// Recompute viewport rectangles and projections for a new framebuffer
    /// size. Zero dimensions are clamped to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        let size = FramebufferSize::new(width, height);
        if size == self.layout.size() {
            return;
        }
        self.layout.resize(size, self.options.camera.view_params());
    }

    /// Advance the frame clock and update the scene. Returns the elapsed
    /// seconds (zero on the first frame).
    pub fn tick(&mut self) -> f32 {
        let dt = self.frame_timing.tick();
        self.update(dt);
        dt
    }

    /// Advance the scene by `dt` seconds using the live options.
    ///
    /// Rebuilds the torus model from the clock angle, refreshes the light,
    /// and recomputes the free-look view from the current yaw and pitch.
    pub fn update(&mut self, dt: f32) {
        let animation = &self.options.animation;
        self.clock.set_enabled(animation.enabled);
        self.clock.advance(animation.speed, dt);
        self.scene.animate(self.clock.angle_degrees());

        self.scene.light = self.options.lighting.to_light();

        let camera = &self.options.camera;
        let free_look = &mut self.layout.viewport_mut(ViewportRole::FreeLook).camera;
        free_look.set_orientation(camera.yaw, camera.pitch);
        free_look.update(0.0, 0.0, 0.0);
    }

    /// Plan the current frame.
    #[must_use]
    pub fn compose(&self) -> FramePlan {
        renderer::compose(
            &self.layout,
            &self.scene,
            self.options.window.clear_color,
        )
    }

    /// Compose the current frame and submit it.
    pub fn render(&self, backend: &mut dyn ShadingBackend, gui: &mut dyn DebugGui) {
        renderer::submit(&self.compose(), backend, gui);
    }

    /// Live options.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Viewport layout.
    #[must_use]
    pub fn layout(&self) -> &ViewportLayout {
        &self.layout
    }

    /// Scene state.
    #[must_use]
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    /// Animation clock.
    #[must_use]
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Frame statistics.
    #[must_use]
    pub fn frame_stats(&self) -> FrameStats {
        self.frame_timing.stats()
    }

    /// Counts reported when `mesh` was loaded.
    #[must_use]
    pub fn mesh_info(&self, mesh: MeshId) -> Option<MeshInfo> {
        self.meshes.get(&mesh).copied()
    }
}

fn spin_for(options: &Options) -> SpinTransform {
    SpinTransform {
        multiplier: options.animation.multiplier,
        ..SpinTransform::default()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::renderer::recorder::RecordingBackend;
    use crate::scene::ObjectId;

    fn engine() -> SceneEngine {
        SceneEngine::new(
            FramebufferSize::new(800, 600),
            Options::default(),
            &mut RecordingBackend::new(),
        )
        .unwrap()
    }

    fn torus_model(engine: &SceneEngine) -> glam::Mat4 {
        engine.scene().object(ObjectId::Torus).unwrap().model
    }

    #[test]
    fn new_loads_every_mesh() {
        let engine = engine();
        for id in MeshId::ALL {
            assert!(engine.mesh_info(id).is_some(), "{id:?}");
        }
        assert!(engine.mesh_info(MeshId::Torus).unwrap().has_indices);
    }

    #[test]
    fn disabled_animation_freezes_the_torus() {
        let mut engine = engine();
        engine.update(0.5);
        let before = torus_model(&engine);
        let mut options = engine.options().clone();
        options.animation.enabled = false;
        engine.set_options(options);
        for _ in 0..10 {
            engine.update(0.1);
        }
        assert_eq!(torus_model(&engine), before);
    }

    #[test]
    fn free_look_follows_live_yaw() {
        let mut engine = engine();
        let mut options = engine.options().clone();
        options.camera.yaw = std::f32::consts::FRAC_PI_2;
        engine.set_options(options);
        engine.update(0.0);
        let camera = &engine.layout().viewport(ViewportRole::FreeLook).camera;
        let forward = camera.look_at() - camera.position();
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn light_follows_live_options() {
        let mut engine = engine();
        let mut options = engine.options().clone();
        options.lighting.position_y = 5.0;
        engine.set_options(options);
        engine.update(0.0);
        assert_eq!(engine.scene().light.position, Vec3::new(3.0, 5.0, 0.0));
    }

    #[test]
    fn nan_speed_does_not_poison_the_clock() {
        let mut engine = engine();
        let mut options = Options::default();
        options.animation.speed = f32::NAN;
        engine.set_options(options);
        engine.update(0.1);
        assert!((engine.clock().angle_degrees() - 2.0).abs() < 1e-5);

        let mut options = engine.options().clone();
        options.animation.speed = 20.0;
        engine.set_options(options);
        engine.update(1.0);
        let angle = engine.clock().angle_degrees();
        assert!((0.0..360.0).contains(&angle), "angle {angle}");
        assert!(torus_model(&engine).is_finite());
    }

    #[test]
    fn nan_orientation_from_a_preset_keeps_free_look_usable() {
        let options = Options::from_toml("[camera]\nyaw = nan\npitch = nan\n").unwrap();
        let mut engine = SceneEngine::new(
            FramebufferSize::new(800, 600),
            options,
            &mut RecordingBackend::new(),
        )
        .unwrap();
        engine.update(0.0);
        let camera = &engine.layout().viewport(ViewportRole::FreeLook).camera;
        assert!(camera.view_matrix().is_finite());
        assert_eq!((camera.yaw(), camera.pitch()), (0.0, 0.0));
    }

    #[test]
    fn unsanitized_options_are_cleaned_on_construction() {
        let mut options = Options::default();
        options.camera.yaw = f32::INFINITY;
        options.camera.side_distance = -4.0;
        let engine = SceneEngine::new(
            FramebufferSize::new(800, 600),
            options,
            &mut RecordingBackend::new(),
        )
        .unwrap();
        assert_eq!(engine.options().camera.yaw, 0.0);
        assert!(engine
            .layout()
            .viewport(ViewportRole::Side)
            .camera
            .proj_matrix()
            .is_finite());
    }

    #[test]
    fn resize_to_same_size_is_a_no_op() {
        let mut engine = engine();
        let before = engine.layout().clone();
        engine.resize(800, 600);
        assert_eq!(engine.layout(), &before);
    }
}
