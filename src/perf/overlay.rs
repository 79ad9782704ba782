use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::Sizable;
use std::time::Instant;
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::settings::PreferenceStore;
use super::monitor::{FrameOutcome, FrameToken, PerfMonitor};
use super::presentation::{self, MetricRow, OverlayModel, SparkBar};
use super::theme::ThemePreference;

/// Emitted when the user clicks the close button.
pub struct CloseOverlay;

/// Floating performance panel sampling its own window's frame cadence.
///
/// Sampling starts when the entity is created. Visibility is owned by the
/// parent, which calls [`PerformanceOverlay::deactivate`] before dropping it.
pub struct PerformanceOverlay {
    monitor: PerfMonitor,
    canvas: Entity<Canvas>,
    theme: ThemePreference,
}

impl EventEmitter<CloseOverlay> for PerformanceOverlay {}

impl PerformanceOverlay {
    pub fn new(
        canvas: Entity<Canvas>,
        preferences: Box<dyn PreferenceStore>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let mut monitor = PerfMonitor::new();
        let token = monitor.activate(Instant::now());
        Self::schedule(token, window, cx);
        info!("Performance overlay mounted");

        Self {
            monitor,
            canvas,
            theme: ThemePreference::load(preferences),
        }
    }

    /// Stop sampling. Any frame callback still queued becomes a no-op.
    pub fn deactivate(&mut self) {
        if self.monitor.deactivate().is_some() {
            info!("Performance overlay unmounted");
        }
    }

    fn schedule(token: FrameToken, window: &mut Window, cx: &mut Context<Self>) {
        cx.on_next_frame(window, move |this: &mut Self, window: &mut Window, cx| {
            this.on_frame(token, window, cx);
        });
    }

    fn on_frame(&mut self, token: FrameToken, window: &mut Window, cx: &mut Context<Self>) {
        let scene = self.canvas.read(cx).scene();
        let outcome = self.monitor.on_frame(token, Instant::now(), scene);
        match outcome {
            FrameOutcome::Idle { next } => Self::schedule(next, window, cx),
            FrameOutcome::Committed { next } => {
                cx.notify();
                Self::schedule(next, window, cx);
            }
            FrameOutcome::Cancelled => debug!("Dropped stale frame callback"),
        }
    }

    fn toggle_theme(&mut self, _: &ClickEvent, _window: &mut Window, cx: &mut Context<Self>) {
        self.theme.toggle();
        cx.notify();
    }

    fn render_row(row: &MetricRow, label_color: Hsla, value_color: Hsla) -> impl IntoElement {
        let value_color = row
            .severity
            .map(|s| Hsla::from(rgb(s.color())))
            .unwrap_or(value_color);

        div()
            .flex()
            .justify_between()
            .gap(px(12.0))
            .child(div().text_color(label_color).child(row.label))
            .child(div().text_color(value_color).child(row.value.clone()))
    }

    fn render_bar(bar: &SparkBar) -> impl IntoElement {
        div()
            .flex_1()
            .h(relative(bar.height))
            .bg(rgb(bar.severity.color()))
            .opacity(bar.opacity)
    }
}

impl Drop for PerformanceOverlay {
    fn drop(&mut self) {
        if self.monitor.is_active() {
            debug!("Overlay dropped while sampling");
            self.deactivate();
        }
    }
}

impl Render for PerformanceOverlay {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let Some(sampler) = self.monitor.sampler() else {
            return div().id("perf-overlay");
        };
        let model = OverlayModel::build(sampler.snapshot(), sampler.history(), self.theme.theme());
        let palette = model.palette;
        let foreground: Hsla = rgb(palette.foreground).into();
        let muted: Hsla = rgb(palette.muted).into();

        div()
            .id("perf-overlay")
            .w(px(200.0))
            .flex()
            .flex_col()
            .gap(px(6.0))
            .p_2()
            .rounded(px(6.0))
            .border_1()
            .border_color(rgb(palette.border))
            .bg(rgb(palette.background))
            .text_xs()
            .text_color(foreground)
            // Keep clicks on the panel away from the canvas below it.
            .on_mouse_down(MouseButton::Left, |_, _, cx| cx.stop_propagation())
            .child(
                div()
                    .flex()
                    .items_center()
                    .justify_between()
                    .child(div().font_weight(FontWeight::SEMIBOLD).child(presentation::TITLE))
                    .child(
                        div()
                            .flex()
                            .gap(px(2.0))
                            .child(
                                Button::new("perf-theme-toggle")
                                    .label(model.theme_toggle_label)
                                    .tooltip(model.theme_toggle_tooltip)
                                    .ghost()
                                    .xsmall()
                                    .on_click(cx.listener(Self::toggle_theme)),
                            )
                            .child(
                                Button::new("perf-close")
                                    .label("✕")
                                    .tooltip(presentation::CLOSE_TOOLTIP)
                                    .ghost()
                                    .xsmall()
                                    .on_click(cx.listener(|_, _, _, cx| cx.emit(CloseOverlay))),
                            ),
                    ),
            )
            .child(
                div()
                    .flex()
                    .items_end()
                    .gap(px(1.0))
                    .h(px(32.0))
                    .rounded(px(2.0))
                    .bg(rgb(palette.track))
                    .children(model.bars.iter().map(Self::render_bar)),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap(px(2.0))
                    .children(model.rows.iter().map(|row| Self::render_row(row, muted, foreground))),
            )
            .child(div().text_color(muted).child(presentation::HINT))
    }
}
