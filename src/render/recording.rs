use crate::compile::plan::{DrawOp, Layer};
use crate::foundation::core::Affine;
use crate::foundation::error::SceneResult;
use crate::render::backend::{FrameRGBA, RenderBackend, SurfaceDesc};

/// One call observed by a [`RecordingBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceCall {
    /// Surface cleared.
    Clear,
    /// Rect fill on a layer.
    FillRect(Layer),
    /// Path fill on a layer.
    FillPath(Layer),
    /// Path stroke on a layer.
    StrokePath(Layer),
    /// Frame flushed.
    Finish,
}

impl SurfaceCall {
    /// Whether the call puts pixels on the surface.
    pub fn is_draw(self) -> bool {
        matches!(
            self,
            SurfaceCall::FillRect(_) | SurfaceCall::FillPath(_) | SurfaceCall::StrokePath(_)
        )
    }
}

/// Backend that records surface calls and never rasterizes.
///
/// Useful for asserting draw order and lifecycle guarantees without paying for rasterization.
#[derive(Clone, Debug, Default)]
pub struct RecordingBackend {
    desc: Option<SurfaceDesc>,
    calls: Vec<SurfaceCall>,
    frames: u64,
}

impl RecordingBackend {
    /// Recording surface for `desc`.
    pub fn new(desc: SurfaceDesc) -> SceneResult<Self> {
        desc.physical_u16()?;
        Ok(Self {
            desc: Some(desc),
            calls: Vec::new(),
            frames: 0,
        })
    }

    /// Every call since creation, in order.
    pub fn calls(&self) -> &[SurfaceCall] {
        &self.calls
    }

    /// Number of completed frames.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Number of draw calls since creation.
    pub fn draw_count(&self) -> usize {
        self.calls.iter().filter(|c| c.is_draw()).count()
    }
}

impl RenderBackend for RecordingBackend {
    fn clear_surface(&mut self) -> SceneResult<()> {
        self.calls.push(SurfaceCall::Clear);
        Ok(())
    }

    fn exec_op(&mut self, op: &DrawOp, _base: Affine) -> SceneResult<()> {
        self.calls.push(match op {
            DrawOp::FillRect { layer, .. } => SurfaceCall::FillRect(*layer),
            DrawOp::FillPath { layer, .. } => SurfaceCall::FillPath(*layer),
            DrawOp::StrokePath { layer, .. } => SurfaceCall::StrokePath(*layer),
        });
        Ok(())
    }

    fn finish_frame(&mut self) -> SceneResult<()> {
        self.calls.push(SurfaceCall::Finish);
        self.frames += 1;
        Ok(())
    }

    fn readback_rgba8(&mut self) -> SceneResult<FrameRGBA> {
        let (w, h) = match self.desc {
            Some(desc) => {
                let p = desc.physical();
                (p.width, p.height)
            }
            None => (0, 0),
        };
        Ok(FrameRGBA {
            width: w,
            height: h,
            data: vec![0; (w as usize) * (h as usize) * 4],
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/recording.rs"]
mod tests;
