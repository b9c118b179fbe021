use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Window", inline)]
#[serde(default)]
/// Window title, initial size and background.
pub struct WindowOptions {
    /// Base window title; the panel summary is appended at runtime.
    #[schemars(skip)]
    pub title: String,
    /// Initial inner width in logical pixels.
    #[schemars(skip)]
    pub width: u32,
    /// Initial inner height in logical pixels.
    #[schemars(skip)]
    pub height: u32,
    /// Clear colour (RGBA).
    #[schemars(skip)]
    pub clear_color: [f32; 4],
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            title: "Quadview".to_owned(),
            width: 1280,
            height: 720,
            clear_color: [0.2, 0.2, 0.2, 1.0],
        }
    }
}
