// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Four-viewport 3D scene viewer built on wgpu.
//!
//! Quadview renders one small lit scene (a floor, a painting, a spinning
//! torus and four normal-mapped walls) through four screen quadrants at
//! once: a control panel, a top-down orthographic view, a side orthographic
//! view and a free-look perspective view.
//!
//! # Key entry points
//!
//! - [`engine::SceneEngine`] - owns all state; `resize`, `update`, `render`
//! - [`viewport::ViewportLayout`] - quadrant rectangles and projections
//! - [`camera::core::Camera`] - look-at and first-person view matrices
//! - [`scene::SceneState`] - objects, materials and the point light
//! - [`options::Options`] - live parameters and TOML presets
//!
//! # Architecture
//!
//! Everything that produces numbers (cameras, layout, animation, the
//! per-viewport [`renderer::FramePlan`]) is plain data and runs without a GPU.
//! A thin submission step walks the plan against a
//! [`renderer::ShadingBackend`]; [`gpu::backend::GpuBackend`] is the wgpu
//! implementation and [`renderer::recorder::RecordingBackend`] a headless one.

pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod gui;
pub mod input;
pub mod mesh;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;

pub use engine::SceneEngine;
pub use error::ViewerError;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
