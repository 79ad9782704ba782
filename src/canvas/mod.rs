//! Drawing canvas - the host scene the performance overlay observes.

mod scene;

use gpui::*;
use gpui_component::Theme;

pub use scene::Scene;

/// Rectangle being dragged out, in scene coordinates.
struct Draft {
    origin: (f32, f32),
    current: (f32, f32),
}

pub struct Canvas {
    scene: Scene,
    draft: Option<Draft>,
    stroke_width: f32,
}

impl Canvas {
    pub fn new(stroke_width: f32) -> Self {
        Self {
            scene: Scene::new(),
            draft: None,
            stroke_width,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn undo(&mut self, cx: &mut Context<Self>) {
        if self.scene.undo() {
            cx.notify();
        }
    }

    pub fn redo(&mut self, cx: &mut Context<Self>) {
        if self.scene.redo() {
            cx.notify();
        }
    }

    pub fn clear(&mut self, cx: &mut Context<Self>) {
        self.scene.clear();
        cx.notify();
    }

    pub fn zoom_in(&mut self, cx: &mut Context<Self>) {
        self.scene.zoom_in();
        cx.notify();
    }

    pub fn zoom_out(&mut self, cx: &mut Context<Self>) {
        self.scene.zoom_out();
        cx.notify();
    }

    pub fn reset_zoom(&mut self, cx: &mut Context<Self>) {
        self.scene.set_zoom(1.0);
        cx.notify();
    }

    /// Window position to scene coordinates.
    fn to_scene(&self, position: Point<Pixels>) -> (f32, f32) {
        let zoom = self.scene.zoom() as f32;
        (f32::from(position.x) / zoom, f32::from(position.y) / zoom)
    }

    fn begin_draft(
        &mut self,
        event: &MouseDownEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let point = self.to_scene(event.position);
        self.draft = Some(Draft { origin: point, current: point });
        cx.notify();
    }

    fn update_draft(
        &mut self,
        event: &MouseMoveEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        if !event.dragging() {
            return;
        }
        let point = self.to_scene(event.position);
        if let Some(draft) = &mut self.draft {
            draft.current = point;
            cx.notify();
        }
    }

    fn finish_draft(&mut self, event: &MouseUpEvent, _window: &mut Window, cx: &mut Context<Self>) {
        if let Some(draft) = self.draft.take() {
            let end = self.to_scene(event.position);
            self.scene.add_rect(draft.origin, end, self.stroke_width);
            cx.notify();
        }
    }

    fn zoom_by_wheel(
        &mut self,
        event: &ScrollWheelEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let delta = event.delta.pixel_delta(px(20.0));
        let dy = f32::from(delta.y);
        if dy > 0.0 {
            self.zoom_in(cx);
        } else if dy < 0.0 {
            self.zoom_out(cx);
        }
    }

    fn render_rect(
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        stroke: f32,
        zoom: f32,
        color: Hsla,
    ) -> Div {
        let rect = div()
            .absolute()
            .left(px(x * zoom))
            .top(px(y * zoom))
            .w(px(width * zoom))
            .h(px(height * zoom))
            .border_color(color);
        // Snap to the border widths gpui ships helpers for.
        match (stroke * zoom).round() as u32 {
            0..=1 => rect.border_1(),
            2..=3 => rect.border_2(),
            4..=7 => rect.border_4(),
            _ => rect.border_8(),
        }
    }
}

impl Render for Canvas {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let colors = Theme::global(cx).colors;
        let zoom = self.scene.zoom() as f32;

        let elements = self.scene.elements().map(|el| {
            Self::render_rect(el.x, el.y, el.width, el.height, el.stroke_width, zoom, colors.foreground)
        });
        let draft = self.draft.as_ref().map(|d| {
            let (x, y) = (d.origin.0.min(d.current.0), d.origin.1.min(d.current.1));
            let (w, h) = ((d.current.0 - d.origin.0).abs(), (d.current.1 - d.origin.1).abs());
            Self::render_rect(x, y, w, h, self.stroke_width, zoom, colors.muted_foreground)
        });

        div()
            .id("canvas")
            .relative()
            .size_full()
            .overflow_hidden()
            .bg(colors.background)
            .on_mouse_down(MouseButton::Left, cx.listener(Self::begin_draft))
            .on_mouse_move(cx.listener(Self::update_draft))
            .on_mouse_up(MouseButton::Left, cx.listener(Self::finish_draft))
            .on_scroll_wheel(cx.listener(Self::zoom_by_wheel))
            .children(elements)
            .children(draft)
    }
}
