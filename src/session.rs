use crate::config::SceneConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{SceneError, SceneResult};
use crate::render::backend::{FrameRGBA, RenderBackend, SurfaceDesc};
use crate::render::cpu::CpuBackend;
use crate::runtime::renderer::SceneRenderer;
use crate::runtime::scheduler::StepScheduler;
use crate::scene::model::SceneState;

/// Summary of a [`RenderSession::render_range`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Total frames in the requested range.
    pub frames_total: u64,
    /// Frames drawn and pushed to the sink.
    pub frames_rendered: u64,
}

/// Offline host for the scene.
///
/// The scene is mounted at timestamp 0 and frame `k` is delivered at `k * 1000 * den / num` ms.
/// Rendering a frame in isolation fast-forwards the scene state through every earlier frame
/// without rasterizing, so [`RenderSession::render_frame`] and [`RenderSession::render_range`]
/// produce identical pixels for the same frame.
#[derive(Clone, Debug)]
pub struct RenderSession {
    config: SceneConfig,
}

impl RenderSession {
    /// Create a session from a validated config.
    pub fn new(config: SceneConfig) -> SceneResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Session configuration.
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Full timeline `[0, duration_frames)`.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.config.duration_frames()),
        }
    }

    /// Physical output size.
    pub fn surface(&self) -> SurfaceDesc {
        SurfaceDesc::scene(self.config.device_pixel_ratio)
    }

    /// Render frame `frame` as the live loop would have drawn it.
    #[tracing::instrument(skip(self), fields(seed = self.config.seed))]
    pub fn render_frame(&self, frame: FrameIndex) -> SceneResult<FrameRGBA> {
        let (mut renderer, mut sched) = self.mount_at(frame)?;
        let out = draw_next(&mut renderer, &mut sched).and_then(|_| readback(&mut renderer));
        renderer.teardown(&mut sched);
        out
    }

    /// Render every frame in `range` and push them to `sink` in order.
    #[tracing::instrument(skip(self, sink), fields(seed = self.config.seed))]
    pub fn render_range(
        &self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> SceneResult<RenderStats> {
        let physical = self.surface().physical();
        sink.begin(SinkConfig {
            width: physical.width,
            height: physical.height,
            fps: self.config.fps,
        })?;

        let mut stats = RenderStats {
            frames_total: range.len_frames(),
            frames_rendered: 0,
        };
        if !range.is_empty() {
            let (mut renderer, mut sched) = self.mount_at(range.start)?;
            let res = (|| {
                for _ in 0..stats.frames_total {
                    let idx = draw_next(&mut renderer, &mut sched)?;
                    let frame = readback(&mut renderer)?;
                    sink.push_frame(idx, &frame)?;
                    stats.frames_rendered += 1;
                }
                Ok::<(), SceneError>(())
            })();
            renderer.teardown(&mut sched);
            res?;
        }

        sink.end()?;
        tracing::debug!(frames = stats.frames_rendered, "range rendered");
        Ok(stats)
    }

    /// Mount a renderer whose next delivered frame is `first`, with state fast-forwarded through
    /// frames `0..first`.
    fn mount_at(
        &self,
        first: FrameIndex,
    ) -> SceneResult<(SceneRenderer<CpuBackend>, StepScheduler)> {
        let fps = self.config.fps;
        let mut scene = SceneState::new(self.config.seed, 0.0);
        for k in 0..first.0 {
            scene.advance(fps.timestamp_ms(FrameIndex(k)));
        }

        let backend = CpuBackend::new(self.surface())?;
        let mut sched = StepScheduler::starting_at(fps, first);
        let renderer = SceneRenderer::with_state(
            scene,
            self.config.device_pixel_ratio,
            Ok(backend),
            &mut sched,
        );
        Ok((renderer, sched))
    }
}

fn draw_next(
    renderer: &mut SceneRenderer<CpuBackend>,
    sched: &mut StepScheduler,
) -> SceneResult<FrameIndex> {
    let (id, idx, ts) = sched
        .poll()
        .ok_or_else(|| SceneError::render("frame loop has no pending callback"))?;
    if !renderer.on_frame(id, ts, sched)? {
        return Err(SceneError::render(format!("frame {} was not drawn", idx.0)));
    }
    Ok(idx)
}

fn readback(renderer: &mut SceneRenderer<CpuBackend>) -> SceneResult<FrameRGBA> {
    renderer
        .backend_mut()
        .ok_or_else(|| SceneError::surface("renderer has no surface"))?
        .readback_rgba8()
}

#[cfg(test)]
#[path = "../tests/unit/session/session.rs"]
mod tests;
