//! Scene state and motion.
//!
//! [`model::SceneState`] holds the few values that change between frames; [`motion`] holds the
//! closed-form curves that everything else is derived from.

/// Layer data and the per-instance scene state.
pub mod model;
/// Pure, timestamp-driven motion curves.
pub mod motion;
