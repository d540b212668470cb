use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tracing::warn;

use super::widget::FrameTiming;

static METRICS_LOCK_POISON_WARNED: AtomicBool = AtomicBool::new(false);

fn warn_metrics_lock_poison_once(operation: &'static str) {
    if METRICS_LOCK_POISON_WARNED
        .compare_exchange(false, true, Ordering::Relaxed, Ordering::Relaxed)
        .is_ok()
    {
        warn!(operation, "metrics lock poisoned; recovered inner value");
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    /// Average simulation update time per frame that ran an update.
    pub update_ms: f32,
    pub draw_ms: f32,
}

#[derive(Clone, Debug)]
pub struct MetricsHandle {
    snapshot: Arc<RwLock<LoopMetricsSnapshot>>,
}

impl Default for MetricsHandle {
    fn default() -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(LoopMetricsSnapshot::default())),
        }
    }
}

impl MetricsHandle {
    pub fn snapshot(&self) -> LoopMetricsSnapshot {
        match self.snapshot.read() {
            Ok(guard) => *guard,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("read");
                *poisoned.into_inner()
            }
        }
    }

    pub(crate) fn publish(&self, snapshot: LoopMetricsSnapshot) {
        match self.snapshot.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => {
                warn_metrics_lock_poison_once("write");
                let mut guard = poisoned.into_inner();
                *guard = snapshot;
            }
        }
    }
}

#[derive(Debug)]
pub(crate) struct MetricsAccumulator {
    interval_start: Instant,
    interval: Duration,
    frames: u32,
    updates: u32,
    update_time_sum: Duration,
    draw_time_sum: Duration,
}

impl MetricsAccumulator {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval_start: Instant::now(),
            interval,
            frames: 0,
            updates: 0,
            update_time_sum: Duration::ZERO,
            draw_time_sum: Duration::ZERO,
        }
    }

    pub(crate) fn record_frame(&mut self, timing: FrameTiming) {
        self.frames = self.frames.saturating_add(1);
        self.draw_time_sum = self.draw_time_sum.saturating_add(timing.draw);
        if timing.updated {
            self.updates = self.updates.saturating_add(1);
            self.update_time_sum = self.update_time_sum.saturating_add(timing.update);
        }
    }

    pub(crate) fn maybe_snapshot(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.interval_start);
        if elapsed < self.interval {
            return None;
        }

        let elapsed_seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / elapsed_seconds,
            update_ms: average_ms(self.update_time_sum, self.updates),
            draw_ms: average_ms(self.draw_time_sum, self.frames),
        };

        self.interval_start = now;
        self.frames = 0;
        self.updates = 0;
        self.update_time_sum = Duration::ZERO;
        self.draw_time_sum = Duration::ZERO;

        Some(snapshot)
    }
}

fn average_ms(total: Duration, count: u32) -> f32 {
    if count == 0 {
        0.0
    } else {
        (total.as_secs_f32() / count as f32) * 1000.0
    }
}
