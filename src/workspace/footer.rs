//! Footer bar with the performance overlay toggle.

use gpui::*;
use gpui_component::button::{Button, ButtonVariants};
use gpui_component::{Selectable, Sizable, Theme};

type ToggleHandler = Box<dyn Fn(&ClickEvent, &mut Window, &mut App) + 'static>;

/// Stateless footer; the workspace passes the overlay flag and the toggle handler.
#[derive(IntoElement)]
pub struct AppFooter {
    show_perf_overlay: bool,
    zoom_percent: u32,
    on_toggle: ToggleHandler,
}

impl AppFooter {
    pub fn new(
        show_perf_overlay: bool,
        zoom_percent: u32,
        on_toggle: impl Fn(&ClickEvent, &mut Window, &mut App) + 'static,
    ) -> Self {
        Self {
            show_perf_overlay,
            zoom_percent,
            on_toggle: Box::new(on_toggle),
        }
    }
}

impl RenderOnce for AppFooter {
    fn render(self, _window: &mut Window, cx: &mut App) -> impl IntoElement {
        let colors = Theme::global(cx).colors;

        div()
            .h(px(32.0))
            .w_full()
            .flex()
            .items_center()
            .justify_between()
            .px_2()
            .border_t_1()
            .border_color(colors.border)
            .bg(colors.muted)
            .text_color(colors.muted_foreground)
            .text_sm()
            .child(format!("{}%", self.zoom_percent))
            .child(
                Button::new("footer:perf-toggle")
                    .label("Perf")
                    .tooltip("Performance overlay (Alt+P)")
                    .ghost()
                    .small()
                    .selected(self.show_perf_overlay)
                    .on_click(self.on_toggle),
            )
    }
}
