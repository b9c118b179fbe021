use serde::{Deserialize, Serialize};

/// Engine-level actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// toggle_animation = "Space"
/// zoom_in = "Equal"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Start or stop the torus animation.
    ToggleAnimation,
    /// Turn the free-look camera left.
    YawLeft,
    /// Turn the free-look camera right.
    YawRight,
    /// Tilt the free-look camera up.
    PitchUp,
    /// Tilt the free-look camera down.
    PitchDown,
    /// Move the light toward -X.
    LightLeft,
    /// Move the light toward +X.
    LightRight,
    /// Move the light toward +Y.
    LightUp,
    /// Move the light toward -Y.
    LightDown,
    /// Move the light toward -Z.
    LightForward,
    /// Move the light toward +Z.
    LightBack,
    /// Shrink the top-down view extent.
    ZoomIn,
    /// Grow the top-down view extent.
    ZoomOut,
    /// Restore yaw, pitch and zoom defaults.
    ResetCamera,
    /// Close the viewer.
    Exit,
}

impl KeyAction {
    /// Every bindable action.
    pub const ALL: [Self; 15] = [
        Self::ToggleAnimation,
        Self::YawLeft,
        Self::YawRight,
        Self::PitchUp,
        Self::PitchDown,
        Self::LightLeft,
        Self::LightRight,
        Self::LightUp,
        Self::LightDown,
        Self::LightForward,
        Self::LightBack,
        Self::ZoomIn,
        Self::ZoomOut,
        Self::ResetCamera,
        Self::Exit,
    ];
}
