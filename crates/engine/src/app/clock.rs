use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

pub const DEFAULT_MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Cloneable stop switch for a running widget.
#[derive(Debug, Clone, Default)]
pub struct RunHandle {
    running: Arc<AtomicBool>,
}

impl RunHandle {
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    fn start(&self) {
        self.running.store(true, Ordering::Relaxed);
    }
}

/// Per-widget frame clock. Idle until started; reports seconds since the
/// previous tick, with the first tick after every start reporting zero.
#[derive(Debug)]
pub struct FrameClock {
    handle: RunHandle,
    last_frame: Option<Instant>,
    max_frame_delta: Duration,
}

impl FrameClock {
    pub fn new(max_frame_delta: Duration) -> Self {
        Self {
            handle: RunHandle::default(),
            last_frame: None,
            max_frame_delta,
        }
    }

    pub fn start(&mut self) -> RunHandle {
        self.last_frame = None;
        self.handle.start();
        self.handle.clone()
    }

    pub fn stop(&mut self) {
        self.handle.stop();
        self.last_frame = None;
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_running()
    }

    pub fn set_max_frame_delta(&mut self, max_frame_delta: Duration) {
        self.max_frame_delta = max_frame_delta;
    }

    /// Elapsed seconds for the frame at `now`, or `None` while stopped.
    pub fn tick(&mut self, now: Instant) -> Option<f32> {
        if !self.handle.is_running() {
            self.last_frame = None;
            return None;
        }
        let elapsed = match self.last_frame {
            Some(previous) => clamp_frame_delta(
                now.saturating_duration_since(previous),
                self.max_frame_delta,
            ),
            None => Duration::ZERO,
        };
        self.last_frame = Some(now);
        Some(elapsed.as_secs_f32())
    }
}

pub(crate) fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}
