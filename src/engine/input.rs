//! Keyboard action execution for SceneEngine

use std::ops::ControlFlow;

use glam::Vec3;

use super::SceneEngine;
use crate::input::KeyAction;
use crate::options::CameraOptions;

impl KeyAction {
    /// Execute this action on the given engine.
    ///
    /// Returns [`ControlFlow::Break`] when the viewer should close.
    pub fn execute(self, engine: &mut SceneEngine) -> ControlFlow<()> {
        let mut options = engine.options().clone();
        let step = options.controls.clone();
        match self {
            Self::Exit => return ControlFlow::Break(()),
            Self::ToggleAnimation => {
                options.animation.enabled = !options.animation.enabled;
                log::info!(
                    "animation {}",
                    if options.animation.enabled { "on" } else { "off" }
                );
            }
            Self::YawLeft => options.camera.yaw += step.rotate_step,
            Self::YawRight => options.camera.yaw -= step.rotate_step,
            Self::PitchUp => options.camera.pitch += step.rotate_step,
            Self::PitchDown => options.camera.pitch -= step.rotate_step,
            Self::LightLeft => {
                options.lighting.translate(Vec3::NEG_X * step.light_step);
            }
            Self::LightRight => {
                options.lighting.translate(Vec3::X * step.light_step);
            }
            Self::LightUp => {
                options.lighting.translate(Vec3::Y * step.light_step);
            }
            Self::LightDown => {
                options.lighting.translate(Vec3::NEG_Y * step.light_step);
            }
            Self::LightForward => {
                options.lighting.translate(Vec3::NEG_Z * step.light_step);
            }
            Self::LightBack => {
                options.lighting.translate(Vec3::Z * step.light_step);
            }
            Self::ZoomIn => options.camera.zoom -= step.zoom_step,
            Self::ZoomOut => options.camera.zoom += step.zoom_step,
            Self::ResetCamera => {
                let defaults = CameraOptions::default();
                options.camera.yaw = defaults.yaw;
                options.camera.pitch = defaults.pitch;
                options.camera.zoom = defaults.zoom;
            }
        }
        engine.set_options(options);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{Options, PITCH_LIMIT};
    use crate::renderer::recorder::RecordingBackend;
    use crate::viewport::{FramebufferSize, ViewportRole};

    fn engine() -> SceneEngine {
        SceneEngine::new(
            FramebufferSize::new(800, 600),
            Options::default(),
            &mut RecordingBackend::new(),
        )
        .unwrap()
    }

    #[test]
    fn exit_breaks() {
        let mut engine = engine();
        assert_eq!(KeyAction::Exit.execute(&mut engine), ControlFlow::Break(()));
        assert_eq!(
            KeyAction::YawLeft.execute(&mut engine),
            ControlFlow::Continue(())
        );
    }

    #[test]
    fn toggle_animation_flips_the_flag() {
        let mut engine = engine();
        let _ = KeyAction::ToggleAnimation.execute(&mut engine);
        assert!(!engine.options().animation.enabled);
        assert!(!engine.clock().enabled());
        let _ = KeyAction::ToggleAnimation.execute(&mut engine);
        assert!(engine.clock().enabled());
    }

    #[test]
    fn pitch_is_clamped() {
        let mut engine = engine();
        for _ in 0..100 {
            let _ = KeyAction::PitchUp.execute(&mut engine);
        }
        assert_eq!(engine.options().camera.pitch, PITCH_LIMIT);
    }

    #[test]
    fn zoom_in_narrows_the_top_down_view() {
        let mut engine = engine();
        let (_, before) = engine
            .layout()
            .viewport(ViewportRole::TopDown)
            .projection
            .half_extents()
            .unwrap();
        let _ = KeyAction::ZoomIn.execute(&mut engine);
        let (_, after) = engine
            .layout()
            .viewport(ViewportRole::TopDown)
            .projection
            .half_extents()
            .unwrap();
        assert!(after < before);
    }

    #[test]
    fn reset_camera_restores_defaults() {
        let mut engine = engine();
        let _ = KeyAction::YawLeft.execute(&mut engine);
        let _ = KeyAction::ZoomOut.execute(&mut engine);
        let _ = KeyAction::ResetCamera.execute(&mut engine);
        assert_eq!(engine.options().camera, CameraOptions::default());
    }

    #[test]
    fn light_keys_move_the_light() {
        let mut engine = engine();
        let _ = KeyAction::LightUp.execute(&mut engine);
        engine.update(0.0);
        assert!(engine.scene().light.position.y > 3.0);
    }
}
