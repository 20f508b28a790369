use crate::compile::painter::compile_frame;
use crate::foundation::error::SceneResult;
use crate::render::backend::{RenderBackend, SurfaceDesc};
use crate::runtime::scheduler::{CallbackId, FrameScheduler};
use crate::scene::model::{SceneOpts, SceneState};

/// Lifecycle state of a [`SceneRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RendererState {
    /// A frame callback is pending and frames are being drawn.
    Running,
    /// Torn down (or never started); no further frames are drawn.
    Stopped,
}

#[derive(Debug)]
struct Mounted<B> {
    backend: B,
    scene: SceneState,
}

/// The scene component: owns one drawing surface and one [`SceneState`].
///
/// Each frame callback advances the state, compiles a plan and draws it, then requests the next
/// callback. [`SceneRenderer::teardown`] moves the renderer to [`RendererState::Stopped`] exactly
/// once and cancels the pending callback; callbacks delivered afterwards are ignored.
///
/// If the surface cannot be acquired the renderer is created inert: already stopped, with no
/// surface and no pending callback.
#[derive(Debug)]
pub struct SceneRenderer<B> {
    mounted: Option<Mounted<B>>,
    state: RendererState,
    pending: Option<CallbackId>,
    device_pixel_ratio: f64,
    frames_drawn: u64,
}

impl<B: RenderBackend> SceneRenderer<B> {
    /// Mount a fresh scene at host time `mount_ms`.
    ///
    /// `acquire` is asked for a surface of 960x540 logical pixels at the options' device pixel
    /// ratio.
    pub fn mount<S, F>(opts: SceneOpts, mount_ms: f64, scheduler: &mut S, acquire: F) -> Self
    where
        S: FrameScheduler + ?Sized,
        F: FnOnce(SurfaceDesc) -> SceneResult<B>,
    {
        let desc = SurfaceDesc::scene(opts.device_pixel_ratio);
        let backend = acquire(desc);
        Self::with_state(
            SceneState::new(opts.seed, mount_ms),
            opts.device_pixel_ratio,
            backend,
            scheduler,
        )
    }

    /// Mount with prepared state, e.g. a scene already fast-forwarded to a later frame.
    pub fn with_state<S>(
        scene: SceneState,
        device_pixel_ratio: f64,
        backend: SceneResult<B>,
        scheduler: &mut S,
    ) -> Self
    where
        S: FrameScheduler + ?Sized,
    {
        match backend {
            Ok(backend) => {
                let id = scheduler.request_frame();
                tracing::debug!(callback = id.0, device_pixel_ratio, "scene renderer mounted");
                Self {
                    mounted: Some(Mounted { backend, scene }),
                    state: RendererState::Running,
                    pending: Some(id),
                    device_pixel_ratio,
                    frames_drawn: 0,
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "drawing surface unavailable; renderer is inert");
                Self {
                    mounted: None,
                    state: RendererState::Stopped,
                    pending: None,
                    device_pixel_ratio,
                    frames_drawn: 0,
                }
            }
        }
    }

    /// Handle a frame callback.
    ///
    /// Returns `Ok(true)` when a frame was drawn. Callbacks that arrive while stopped, or whose id
    /// is not the pending one, are ignored and return `Ok(false)`.
    pub fn on_frame<S>(
        &mut self,
        id: CallbackId,
        timestamp_ms: f64,
        scheduler: &mut S,
    ) -> SceneResult<bool>
    where
        S: FrameScheduler + ?Sized,
    {
        if self.state == RendererState::Stopped || self.pending != Some(id) {
            tracing::trace!(callback = id.0, state = ?self.state, "ignoring frame callback");
            return Ok(false);
        }
        let Some(mounted) = self.mounted.as_mut() else {
            return Ok(false);
        };
        self.pending = None;

        let tick = mounted.scene.advance(timestamp_ms);
        let plan = compile_frame(&mounted.scene, tick, self.device_pixel_ratio);
        let drawn = mounted.backend.render_plan(&plan);
        self.pending = Some(scheduler.request_frame());
        drawn?;

        self.frames_drawn += 1;
        tracing::trace!(
            timestamp_ms,
            delta_ms = tick.delta_ms,
            ops = plan.ops.len(),
            "frame drawn"
        );
        Ok(true)
    }

    /// Stop the loop and cancel the pending callback.
    ///
    /// Returns `true` on the Running to Stopped transition, `false` if already stopped.
    pub fn teardown<S>(&mut self, scheduler: &mut S) -> bool
    where
        S: FrameScheduler + ?Sized,
    {
        if self.state == RendererState::Stopped {
            return false;
        }
        self.state = RendererState::Stopped;
        if let Some(id) = self.pending.take() {
            scheduler.cancel_frame(id);
        }
        tracing::debug!(frames = self.frames_drawn, "scene renderer torn down");
        true
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RendererState {
        self.state
    }

    /// Callback the renderer is waiting for.
    pub fn pending_callback(&self) -> Option<CallbackId> {
        self.pending
    }

    /// Frames drawn since mount.
    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    /// Drawing surface, `None` when the renderer is inert.
    pub fn backend(&self) -> Option<&B> {
        self.mounted.as_ref().map(|m| &m.backend)
    }

    /// Mutable drawing surface, `None` when the renderer is inert.
    pub fn backend_mut(&mut self) -> Option<&mut B> {
        self.mounted.as_mut().map(|m| &mut m.backend)
    }

    /// Scene state, `None` when the renderer is inert.
    pub fn scene(&self) -> Option<&SceneState> {
        self.mounted.as_ref().map(|m| &m.scene)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/renderer.rs"]
mod tests;
