//! Frame sinks.
//!
//! Sinks consume rendered frames in timeline order and are used by
//! [`RenderSession::render_range`](crate::RenderSession::render_range).

/// `ffmpeg`-based MP4 output via the system `ffmpeg`.
pub mod ffmpeg;
/// PNG image sequence output.
pub mod png;
/// Generic frame sink trait and the in-memory sink.
pub mod sink;
