//! Frame compilation: scene state in, backend-agnostic draw plan out.

/// Draws the scene layers into a [`plan::FramePlan`].
pub mod painter;
/// Draw IR shared by every backend.
pub mod plan;
