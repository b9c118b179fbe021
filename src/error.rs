//! Crate-level error types.

use std::fmt;

use crate::gpu::render_context::GpuSetupError;

/// Errors produced by the quadview crate.
///
/// The per-frame core (cameras, layout, animation, composition) never
/// fails; these cover GPU setup, option files and the window loop.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context initialization failure.
    Gpu(GpuSetupError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// A mesh could not be uploaded to the shading backend.
    MeshUpload(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::MeshUpload(msg) => write!(f, "mesh upload error: {msg}"),
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GpuSetupError> for ViewerError {
    fn from(e: GpuSetupError) -> Self {
        Self::Gpu(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
