use crate::encode::ffmpeg::ensure_parent_dir;
use crate::encode::sink::{FrameSink, SinkConfig, check_frame_size};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{SceneError, SceneResult};
use crate::render::backend::FrameRGBA;
use anyhow::Context as _;
use std::path::{Path, PathBuf};

/// Writes each frame as `frame_00000.png`, `frame_00001.png`, ... into a directory.
///
/// Pixels are stored with straight alpha.
#[derive(Debug)]
pub struct PngSequenceSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    written: Vec<PathBuf>,
}

impl PngSequenceSink {
    /// Sink writing into `dir`; the directory is created on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            written: Vec::new(),
        }
    }

    /// File name used for frame `idx`.
    pub fn file_name(idx: FrameIndex) -> String {
        format!("frame_{:05}.png", idx.0)
    }

    /// Paths written so far, in order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

/// Write one frame as a straight-alpha PNG.
pub fn write_png(path: &Path, frame: &FrameRGBA) -> SceneResult<()> {
    ensure_parent_dir(path)?;
    let straight = frame.to_straight_rgba8();
    image::save_buffer_with_format(
        path,
        &straight,
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| SceneError::encode(format!("write png '{}': {e}", path.display())))
}

impl FrameSink for PngSequenceSink {
    fn begin(&mut self, cfg: SinkConfig) -> SceneResult<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))?;
        self.cfg = Some(cfg);
        self.written.clear();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> SceneResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| SceneError::encode("png sink not started"))?;
        check_frame_size(cfg, frame)?;
        let path = self.dir.join(Self::file_name(idx));
        write_png(&path, frame)?;
        tracing::trace!(path = %path.display(), "wrote png frame");
        self.written.push(path);
        Ok(())
    }

    fn end(&mut self) -> SceneResult<()> {
        if self.cfg.take().is_none() {
            return Err(SceneError::encode("png sink not started"));
        }
        tracing::debug!(frames = self.written.len(), dir = %self.dir.display(), "png sequence complete");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
