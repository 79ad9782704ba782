//! Frame counting and periodic metric commits.

use std::time::{Duration, Instant};
use tracing::debug;

use super::heap::{self, HeapProbe};
use super::history::FpsHistory;
use super::severity::Severity;

/// Minimum wall-clock window between two commits.
pub const UPDATE_INTERVAL: Duration = Duration::from_millis(500);

/// View state reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    /// 1.0 is 100%.
    pub zoom_factor: f64,
}

/// What the overlay needs to know about the host scene.
///
/// Only called during a commit, at most once per [`UPDATE_INTERVAL`].
pub trait SceneStats {
    /// Number of drawable elements that are not deleted.
    fn live_element_count(&self) -> usize;
    fn view_state(&self) -> ViewState;
}

/// Metrics published by the latest commit.
#[derive(Clone, Debug, PartialEq)]
pub struct MetricsSnapshot {
    pub fps: u32,
    /// Duration of the last frame before the commit, one decimal.
    pub frame_time_ms: f64,
    pub element_count: usize,
    /// `None` when the heap capability is unavailable.
    pub memory_mb: Option<u64>,
    pub zoom_percent: u32,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            fps: 0,
            frame_time_ms: 0.0,
            element_count: 0,
            memory_mb: None,
            zoom_percent: 100,
        }
    }
}

/// Counts frames and turns them into a [`MetricsSnapshot`] every [`UPDATE_INTERVAL`].
pub struct Sampler {
    snapshot: MetricsSnapshot,
    history: FpsHistory,
    heap_probe: Option<HeapProbe>,
    frame_count: u32,
    last_frame_time: Instant,
    last_update_time: Instant,
}

impl Sampler {
    pub fn new(now: Instant, heap_probe: Option<HeapProbe>) -> Self {
        Self {
            snapshot: MetricsSnapshot::default(),
            history: FpsHistory::new(),
            heap_probe,
            frame_count: 0,
            last_frame_time: now,
            last_update_time: now,
        }
    }

    pub fn snapshot(&self) -> &MetricsSnapshot {
        &self.snapshot
    }

    pub fn history(&self) -> &FpsHistory {
        &self.history
    }

    /// Record one displayed frame. Returns `true` when this frame committed.
    pub fn on_frame(&mut self, now: Instant, host: &impl SceneStats) -> bool {
        self.frame_count += 1;
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;

        let elapsed = now.saturating_duration_since(self.last_update_time);
        if elapsed < UPDATE_INTERVAL {
            return false;
        }

        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
        let fps = (self.frame_count as f64 * 1000.0 / elapsed_ms).round() as u32;
        self.history.push(fps);

        let memory_mb = self
            .heap_probe
            .and_then(|probe| probe())
            .map(heap::bytes_to_mb);
        let zoom = host.view_state().zoom_factor;

        self.snapshot = MetricsSnapshot {
            fps,
            frame_time_ms: round_one_decimal(frame_time.as_secs_f64() * 1000.0),
            element_count: host.live_element_count(),
            memory_mb,
            zoom_percent: (zoom * 100.0).round().max(0.0) as u32,
        };
        debug!(
            fps,
            severity = %Severity::from_fps(fps),
            frames = self.frame_count,
            elapsed_ms,
            elements = self.snapshot.element_count,
            "Committed performance sample"
        );

        self.frame_count = 0;
        self.last_update_time = now;
        true
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
