use crate::foundation::core::{Fps, FrameIndex};

/// Handle for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(pub u64);

/// Host-side frame scheduling.
///
/// A renderer asks to be re-invoked once per frame with [`FrameScheduler::request_frame`] and
/// withdraws the request with [`FrameScheduler::cancel_frame`] on teardown. Cancelling an id that
/// is no longer pending is a no-op.
pub trait FrameScheduler {
    /// Request one callback for the next frame.
    fn request_frame(&mut self) -> CallbackId;

    /// Withdraw a previously requested callback.
    fn cancel_frame(&mut self, id: CallbackId);
}

/// Fixed-rate host clock.
///
/// Frame `k` is delivered at `k * 1000 * den / num` ms. At most one callback is pending at a time;
/// a new request replaces the previous one.
#[derive(Clone, Debug)]
pub struct StepScheduler {
    fps: Fps,
    next_frame: u64,
    next_id: u64,
    pending: Option<CallbackId>,
}

impl StepScheduler {
    /// Clock whose first delivered frame is frame 0.
    pub fn new(fps: Fps) -> Self {
        Self::starting_at(fps, FrameIndex(0))
    }

    /// Clock whose first delivered frame is `first`.
    pub fn starting_at(fps: Fps, first: FrameIndex) -> Self {
        Self {
            fps,
            next_frame: first.0,
            next_id: 0,
            pending: None,
        }
    }

    /// Frame the next delivered callback belongs to.
    pub fn next_frame(&self) -> FrameIndex {
        FrameIndex(self.next_frame)
    }

    /// Currently pending callback, if any.
    pub fn pending(&self) -> Option<CallbackId> {
        self.pending
    }

    /// Deliver the pending callback, advancing the clock by one frame.
    ///
    /// Returns `None` when nothing is pending; the clock does not advance in that case.
    pub fn poll(&mut self) -> Option<(CallbackId, FrameIndex, f64)> {
        let id = self.pending.take()?;
        let frame = FrameIndex(self.next_frame);
        self.next_frame += 1;
        Some((id, frame, self.fps.timestamp_ms(frame)))
    }
}

impl FrameScheduler for StepScheduler {
    fn request_frame(&mut self) -> CallbackId {
        let id = CallbackId(self.next_id);
        self.next_id += 1;
        self.pending = Some(id);
        id
    }

    fn cancel_frame(&mut self, id: CallbackId) {
        if self.pending == Some(id) {
            self.pending = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/scheduler.rs"]
mod tests;
