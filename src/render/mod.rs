//! A backend executes a compiled [`FramePlan`](crate::FramePlan): clear, draw every op back to
//! front under the device-pixel-ratio transform, flush.

/// Backend trait, surface description and frame readback.
pub mod backend;
/// `vello_cpu` raster backend.
pub mod cpu;
/// Call-recording backend.
pub mod recording;
