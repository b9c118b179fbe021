//! Shared utilities for the viewer.

pub mod frame_timing;
