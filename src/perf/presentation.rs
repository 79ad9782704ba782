//! Mapping from metrics to what the overlay draws.
//!
//! Kept free of gpui so the layout-independent parts can be tested directly.

use super::history::FpsHistory;
use super::sampler::MetricsSnapshot;
use super::severity::Severity;
use super::theme::{OverlayTheme, Palette};

/// Samples above this draw as a full-height bar.
pub const SPARKLINE_MAX_FPS: u32 = 60;
pub const OLDEST_BAR_OPACITY: f32 = 0.25;
pub const NEWEST_BAR_OPACITY: f32 = 1.0;

pub const TITLE: &str = "Performance";
pub const HINT: &str = "Alt+P to toggle";
pub const CLOSE_TOOLTIP: &str = "Close (Alt+P)";

/// One labeled readout.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    pub label: &'static str,
    pub value: String,
    /// Set only for readouts colored by severity.
    pub severity: Option<Severity>,
}

/// One sparkline bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparkBar {
    /// Fraction of the track height, `0.0..=1.0`.
    pub height: f32,
    pub severity: Severity,
    pub opacity: f32,
}

/// Everything the overlay view needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayModel {
    pub palette: Palette,
    pub rows: Vec<MetricRow>,
    pub bars: Vec<SparkBar>,
    pub theme_toggle_label: &'static str,
    pub theme_toggle_tooltip: &'static str,
}

impl OverlayModel {
    pub fn build(snapshot: &MetricsSnapshot, history: &FpsHistory, theme: OverlayTheme) -> Self {
        let (theme_toggle_label, theme_toggle_tooltip) = match theme {
            OverlayTheme::Dark => ("☀", "Switch to light mode"),
            OverlayTheme::Light => ("☾", "Switch to dark mode"),
        };

        Self {
            palette: theme.palette(),
            rows: metric_rows(snapshot),
            bars: sparkline(history),
            theme_toggle_label,
            theme_toggle_tooltip,
        }
    }
}

fn metric_rows(snapshot: &MetricsSnapshot) -> Vec<MetricRow> {
    let mut rows = vec![
        MetricRow {
            label: "FPS",
            value: snapshot.fps.to_string(),
            severity: Some(Severity::from_fps(snapshot.fps)),
        },
        MetricRow {
            label: "Frame time",
            value: format!("{} ms", snapshot.frame_time_ms),
            severity: None,
        },
        MetricRow {
            label: "Elements",
            value: snapshot.element_count.to_string(),
            severity: None,
        },
    ];
    if let Some(mb) = snapshot.memory_mb {
        rows.push(MetricRow {
            label: "Heap",
            value: format!("{} MB", mb),
            severity: None,
        });
    }
    rows.push(MetricRow {
        label: "Zoom",
        value: format!("{}%", snapshot.zoom_percent),
        severity: None,
    });
    rows
}

fn sparkline(history: &FpsHistory) -> Vec<SparkBar> {
    let last = history.len().saturating_sub(1).max(1) as f32;
    history
        .iter()
        .enumerate()
        .map(|(i, fps)| SparkBar {
            height: bar_height(fps),
            severity: Severity::from_fps(fps),
            opacity: OLDEST_BAR_OPACITY + (NEWEST_BAR_OPACITY - OLDEST_BAR_OPACITY) * (i as f32 / last),
        })
        .collect()
}

pub fn bar_height(fps: u32) -> f32 {
    fps.min(SPARKLINE_MAX_FPS) as f32 / SPARKLINE_MAX_FPS as f32
}
