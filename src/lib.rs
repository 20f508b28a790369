//! Rickshaw is a procedural renderer for an animated foggy-street illustration.
//!
//! A rickshaw rolls along a dusky road while fog drifts past a distant skyline. Every frame is
//! drawn from scratch from a small per-instance [`SceneState`] and the host timestamp:
//!
//! - Mount a [`SceneRenderer`] on a [`RenderBackend`] and drive it with a [`FrameScheduler`]
//! - Or use a [`RenderSession`] to render single frames or stream a range into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Frame compilation into backend-agnostic draw plans.
pub mod compile;
/// Session configuration.
pub mod config;
/// Frame sinks.
pub mod encode;
/// Drawing surfaces.
pub mod render;
/// Frame loop: scheduling and the renderer state machine.
pub mod runtime;
/// Scene state and motion curves.
pub mod scene;
/// Offline rendering host.
pub mod session;

pub use crate::foundation::core::{
    Affine, BezPath, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Rgba8, SCENE_HEIGHT,
    SCENE_WIDTH, Vec2,
};
pub use crate::foundation::error::{SceneError, SceneResult};

pub use crate::compile::painter::compile_frame;
pub use crate::compile::plan::{DrawOp, FramePlan, Layer, Paint};
pub use crate::config::SceneConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png::PngSequenceSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, SurfaceDesc, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::recording::RecordingBackend;
pub use crate::runtime::renderer::{RendererState, SceneRenderer};
pub use crate::runtime::scheduler::{CallbackId, FrameScheduler, StepScheduler};
pub use crate::scene::model::{SceneOpts, SceneState};
pub use crate::session::{RenderSession, RenderStats};
