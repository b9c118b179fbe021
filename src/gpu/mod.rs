//! GPU resource management and the wgpu shading backend.
//!
//! Provides wgpu device/surface initialization, growable buffers, the depth
//! target, the scene pipelines, and [`backend::GpuBackend`], which turns
//! the frame plan's calls into a single render pass.

/// wgpu implementation of the shading backend and model loader.
pub mod backend;
/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Scene render pipelines and their vertex/uniform layouts.
pub mod pipeline;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment.
pub mod texture;
/// Per-draw uniform block and name-keyed staging.
pub mod uniforms;
