//! Workspace module - the main container for the OneSketch window.
//!
//! This module is split into:
//! - `mod.rs` - Workspace struct, overlay visibility and action routing
//! - `footer.rs` - Footer bar with the overlay toggle

mod footer;

use gpui::*;
use tracing::debug;

use crate::canvas::Canvas;
use crate::perf::{CloseOverlay, PerformanceOverlay};
use crate::settings::{AppSettings, FilePreferences};
use crate::{ClearCanvasAction, RedoAction, ResetZoomAction, TogglePerfOverlay, UndoAction, ZoomInAction, ZoomOutAction};
use footer::AppFooter;

/// A mounted overlay and the subscription to its close event.
struct MountedOverlay {
    view: Entity<PerformanceOverlay>,
    _close: Subscription,
}

/// Main workspace - owns the canvas and whether the overlay is shown.
pub struct Workspace {
    canvas: Entity<Canvas>,
    perf_overlay: Option<MountedOverlay>,
    focus_handle: FocusHandle,
}

impl Workspace {
    pub fn new(cx: &mut Context<Self>, settings: &AppSettings) -> Self {
        let stroke_width = settings.stroke_width;
        Self {
            canvas: cx.new(|_| Canvas::new(stroke_width)),
            perf_overlay: None,
            focus_handle: cx.focus_handle(),
        }
    }

    pub fn focus(&self, window: &mut Window) {
        self.focus_handle.focus(window);
    }

    pub fn show_perf_overlay(&self) -> bool {
        self.perf_overlay.is_some()
    }

    pub fn toggle_perf_overlay(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.show_perf_overlay() {
            self.hide_perf_overlay(cx);
        } else {
            self.open_perf_overlay(window, cx);
        }
    }

    pub fn open_perf_overlay(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        if self.perf_overlay.is_some() {
            return;
        }
        let canvas = self.canvas.clone();
        let view = cx.new(|cx| {
            PerformanceOverlay::new(canvas, Box::new(FilePreferences::load()), window, cx)
        });
        let close = cx.subscribe_in(&view, window, |this, _, _: &CloseOverlay, _window, cx| {
            this.hide_perf_overlay(cx);
        });
        self.perf_overlay = Some(MountedOverlay { view, _close: close });
        debug!("Overlay shown");
        cx.notify();
    }

    pub fn hide_perf_overlay(&mut self, cx: &mut Context<Self>) {
        let Some(mounted) = self.perf_overlay.take() else {
            return;
        };
        mounted.view.update(cx, |overlay, _| overlay.deactivate());
        debug!("Overlay hidden");
        cx.notify();
    }

    fn with_canvas(
        &self,
        cx: &mut Context<Self>,
        f: impl FnOnce(&mut Canvas, &mut Context<Canvas>),
    ) {
        self.canvas.update(cx, f);
    }
}

// --- Render ---

impl Render for Workspace {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let zoom_percent = (self.canvas.read(cx).scene().zoom() * 100.0).round() as u32;
        let footer = AppFooter::new(
            self.show_perf_overlay(),
            zoom_percent,
            cx.listener(|this, _: &ClickEvent, window, cx| this.toggle_perf_overlay(window, cx)),
        );

        div()
            .id("workspace")
            .track_focus(&self.focus_handle)
            .relative()
            .flex()
            .flex_col()
            .size_full()
            .on_action(cx.listener(|this, _: &TogglePerfOverlay, window, cx| this.toggle_perf_overlay(window, cx)))
            .on_action(cx.listener(|this, _: &UndoAction, _window, cx| this.with_canvas(cx, |c, cx| c.undo(cx))))
            .on_action(cx.listener(|this, _: &RedoAction, _window, cx| this.with_canvas(cx, |c, cx| c.redo(cx))))
            .on_action(cx.listener(|this, _: &ClearCanvasAction, _window, cx| this.with_canvas(cx, |c, cx| c.clear(cx))))
            .on_action(cx.listener(|this, _: &ZoomInAction, _window, cx| this.with_canvas(cx, |c, cx| c.zoom_in(cx))))
            .on_action(cx.listener(|this, _: &ZoomOutAction, _window, cx| this.with_canvas(cx, |c, cx| c.zoom_out(cx))))
            .on_action(cx.listener(|this, _: &ResetZoomAction, _window, cx| this.with_canvas(cx, |c, cx| c.reset_zoom(cx))))
            .child(div().flex_grow().child(self.canvas.clone()))
            .children(self.perf_overlay.as_ref().map(|mounted| {
                div()
                    .absolute()
                    .top(px(12.0))
                    .right(px(12.0))
                    .child(mounted.view.clone())
            }))
            .child(footer)
    }
}
