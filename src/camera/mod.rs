//! Camera system for the four viewports.
//!
//! Provides an upright look-at / first-person camera and the projection
//! descriptors used by the orthographic and perspective views.

/// Core camera struct with view/projection matrices and yaw/pitch.
pub mod core;
/// Orthographic and perspective projection parameters.
pub mod projection;

pub use self::core::{Camera, WORLD_UP};
pub use projection::Projection;
