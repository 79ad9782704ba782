//! Performance overlay - live FPS, frame time and scene counters.
//!
//! This module is split into:
//! - `sampler.rs` / `history.rs` - frame counting, commits and the FPS ring buffer
//! - `monitor.rs` - activation, frame tokens and cancellation
//! - `heap.rs` - platform heap usage probe
//! - `severity.rs`, `theme.rs`, `presentation.rs` - metric to presentation mapping
//! - `overlay.rs` - the gpui view

mod heap;
mod history;
mod monitor;
mod overlay;
mod presentation;
mod sampler;
mod severity;
mod theme;

pub use overlay::{CloseOverlay, PerformanceOverlay};
pub use sampler::{SceneStats, ViewState};
