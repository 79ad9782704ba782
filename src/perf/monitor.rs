//! Overlay lifecycle around the [`Sampler`].
//!
//! The host frame primitive cannot revoke a callback once queued, so each
//! scheduled callback carries a [`FrameToken`]. Only the token the monitor
//! handed out last is honored; deactivating clears it, which turns any
//! callback still in flight into a no-op.

use std::time::Instant;

use super::heap::{self, HeapProbe};
use super::sampler::{Sampler, SceneStats};

/// Identifies one scheduled frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameToken(u64);

/// Result of delivering a frame callback to the monitor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Frame counted, no commit. Schedule `next`.
    Idle { next: FrameToken },
    /// A new snapshot was published. Re-render and schedule `next`.
    Committed { next: FrameToken },
    /// Stale or post-teardown callback. Nothing changed, do not reschedule.
    Cancelled,
}

enum State {
    Inactive,
    Active {
        sampler: Sampler,
        pending: FrameToken,
    },
}

pub struct PerfMonitor {
    state: State,
    heap_probe: Option<HeapProbe>,
    next_token: u64,
}

impl PerfMonitor {
    /// Monitor with the heap capability resolved for this platform.
    pub fn new() -> Self {
        Self::with_heap_probe(heap::detect())
    }

    pub fn with_heap_probe(heap_probe: Option<HeapProbe>) -> Self {
        Self {
            state: State::Inactive,
            heap_probe,
            next_token: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, State::Active { .. })
    }

    pub fn sampler(&self) -> Option<&Sampler> {
        match &self.state {
            State::Active { sampler, .. } => Some(sampler),
            State::Inactive => None,
        }
    }

    /// Start sampling. Returns the token for the first frame callback.
    ///
    /// Activating an active monitor restarts it; the old pending token is dropped.
    pub fn activate(&mut self, now: Instant) -> FrameToken {
        let pending = self.issue_token();
        self.state = State::Active {
            sampler: Sampler::new(now, self.heap_probe),
            pending,
        };
        pending
    }

    pub fn on_frame(
        &mut self,
        token: FrameToken,
        now: Instant,
        host: &impl SceneStats,
    ) -> FrameOutcome {
        if !matches!(&self.state, State::Active { pending, .. } if *pending == token) {
            return FrameOutcome::Cancelled;
        }
        let next = self.issue_token();
        let State::Active { sampler, pending } = &mut self.state else {
            return FrameOutcome::Cancelled;
        };
        *pending = next;
        if sampler.on_frame(now, host) {
            FrameOutcome::Committed { next }
        } else {
            FrameOutcome::Idle { next }
        }
    }

    /// Stop sampling and cancel the pending callback. Returns the cancelled token.
    pub fn deactivate(&mut self) -> Option<FrameToken> {
        match std::mem::replace(&mut self.state, State::Inactive) {
            State::Active { pending, .. } => Some(pending),
            State::Inactive => None,
        }
    }

    fn issue_token(&mut self) -> FrameToken {
        self.next_token += 1;
        FrameToken(self.next_token)
    }
}

impl Default for PerfMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::perf::sampler::tests::FakeHost;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Drive frames every `step` ms until `end` ms, following the tokens.
    fn run(
        monitor: &mut PerfMonitor,
        mut token: FrameToken,
        t0: Instant,
        step: u64,
        end: u64,
        host: &FakeHost,
    ) -> (FrameToken, usize) {
        let mut commits = 0;
        let mut t = step;
        while t <= end {
            token = match monitor.on_frame(token, t0 + ms(t), host) {
                FrameOutcome::Idle { next } => next,
                FrameOutcome::Committed { next } => {
                    commits += 1;
                    next
                }
                FrameOutcome::Cancelled => panic!("unexpected cancel at {t}ms"),
            };
            t += step;
        }
        (token, commits)
    }

    #[test]
    fn test_starts_inactive() {
        let monitor = PerfMonitor::with_heap_probe(None);
        assert!(!monitor.is_active());
        assert!(monitor.sampler().is_none());
    }

    #[test]
    fn test_self_reschedules_while_active() {
        let t0 = Instant::now();
        let host = FakeHost::new(1, 1.0);
        let mut monitor = PerfMonitor::with_heap_probe(None);
        let token = monitor.activate(t0);

        let (_, commits) = run(&mut monitor, token, t0, 50, 2_000, &host);
        assert_eq!(commits, 4);
        assert_eq!(monitor.sampler().map(|s| s.snapshot().fps), Some(20));
    }

    #[test]
    fn test_tick_after_deactivate_is_ignored() {
        let t0 = Instant::now();
        let host = FakeHost::new(1, 1.0);
        let mut monitor = PerfMonitor::with_heap_probe(None);
        let token = monitor.activate(t0);
        let (token, _) = run(&mut monitor, token, t0, 50, 450, &host);

        assert_eq!(monitor.deactivate(), Some(token));
        assert!(!monitor.is_active());

        let queries = host.queries.get();
        assert_eq!(monitor.on_frame(token, t0 + ms(500), &host), FrameOutcome::Cancelled);
        assert_eq!(monitor.on_frame(token, t0 + ms(5_000), &host), FrameOutcome::Cancelled);
        assert_eq!(host.queries.get(), queries);
        assert!(monitor.sampler().is_none());
    }

    #[test]
    fn test_deactivate_twice() {
        let mut monitor = PerfMonitor::with_heap_probe(None);
        monitor.activate(Instant::now());
        assert!(monitor.deactivate().is_some());
        assert_eq!(monitor.deactivate(), None);
    }

    #[test]
    fn test_stale_token_is_ignored() {
        let t0 = Instant::now();
        let host = FakeHost::new(1, 1.0);
        let mut monitor = PerfMonitor::with_heap_probe(None);
        let first = monitor.activate(t0);

        let second = match monitor.on_frame(first, t0 + ms(16), &host) {
            FrameOutcome::Idle { next } => next,
            other => panic!("expected idle, got {other:?}"),
        };
        assert_ne!(first, second);
        // Replaying the consumed token must not count another frame.
        assert_eq!(monitor.on_frame(first, t0 + ms(500), &host), FrameOutcome::Cancelled);
        assert!(matches!(
            monitor.on_frame(second, t0 + ms(500), &host),
            FrameOutcome::Committed { .. }
        ));
        // Two frames over 500ms.
        assert_eq!(monitor.sampler().map(|s| s.snapshot().fps), Some(4));
    }

    #[test]
    fn test_reactivate_drops_old_chain() {
        let t0 = Instant::now();
        let host = FakeHost::new(1, 1.0);
        let mut monitor = PerfMonitor::with_heap_probe(None);
        let old = monitor.activate(t0);
        monitor.deactivate();
        let fresh = monitor.activate(t0 + ms(1_000));

        assert_eq!(monitor.on_frame(old, t0 + ms(1_016), &host), FrameOutcome::Cancelled);
        assert!(matches!(
            monitor.on_frame(fresh, t0 + ms(1_016), &host),
            FrameOutcome::Idle { .. }
        ));
        assert!(monitor.sampler().is_some_and(|s| s.history().iter().all(|f| f == 0)));
    }
}
