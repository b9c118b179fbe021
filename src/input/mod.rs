//! Input vocabulary: bindable keyboard actions and the pointer events
//! forwarded to the control panel.

/// Platform-agnostic pointer events.
pub mod event;
/// Bindable keyboard actions.
pub mod keyboard;

pub use event::{InputEvent, MouseButton};
pub use keyboard::KeyAction;
