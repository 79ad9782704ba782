use tracing::debug;

use crate::perf::{SceneStats, ViewState};

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 30.0;
const ZOOM_STEP: f64 = 1.1;

/// Drags smaller than this (scene units) on either axis are discarded.
const MIN_ELEMENT_SIZE: f32 = 2.0;

/// An axis-aligned rectangle in scene coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub stroke_width: f32,
    /// Deleted elements stay in the scene so undo can bring them back.
    pub is_deleted: bool,
}

/// Undoable change to the scene.
#[derive(Clone, Debug)]
enum Change {
    Added(u64),
    Cleared(Vec<u64>),
}

/// Drawing model: elements, zoom and undo/redo stacks.
pub struct Scene {
    elements: Vec<Element>,
    zoom: f64,
    next_id: u64,
    undo_stack: Vec<Change>,
    redo_stack: Vec<Change>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            elements: Vec::new(),
            zoom: 1.0,
            next_id: 1,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().filter(|el| !el.is_deleted)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Add a rectangle spanning two corner points. Returns its id, or `None` if too small.
    pub fn add_rect(&mut self, from: (f32, f32), to: (f32, f32), stroke_width: f32) -> Option<u64> {
        let width = (to.0 - from.0).abs();
        let height = (to.1 - from.1).abs();
        if width < MIN_ELEMENT_SIZE || height < MIN_ELEMENT_SIZE {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        self.elements.push(Element {
            id,
            x: from.0.min(to.0),
            y: from.1.min(to.1),
            width,
            height,
            stroke_width,
            is_deleted: false,
        });
        self.record(Change::Added(id));
        debug!(id, width, height, "Added element");
        Some(id)
    }

    /// Mark every live element deleted, as one undo step.
    pub fn clear(&mut self) {
        let ids: Vec<u64> = self.elements().map(|el| el.id).collect();
        if ids.is_empty() {
            return;
        }
        self.set_deleted(&ids, true);
        self.record(Change::Cleared(ids));
    }

    pub fn undo(&mut self) -> bool {
        let Some(change) = self.undo_stack.pop() else {
            return false;
        };
        match &change {
            Change::Added(id) => self.set_deleted(&[*id], true),
            Change::Cleared(ids) => self.set_deleted(ids, false),
        }
        self.redo_stack.push(change);
        true
    }

    pub fn redo(&mut self) -> bool {
        let Some(change) = self.redo_stack.pop() else {
            return false;
        };
        match &change {
            Change::Added(id) => self.set_deleted(&[*id], false),
            Change::Cleared(ids) => self.set_deleted(ids, true),
        }
        self.undo_stack.push(change);
        true
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// New changes invalidate the redo stack.
    fn record(&mut self, change: Change) {
        self.undo_stack.push(change);
        self.redo_stack.clear();
    }

    fn set_deleted(&mut self, ids: &[u64], deleted: bool) {
        for el in self.elements.iter_mut().filter(|el| ids.contains(&el.id)) {
            el.is_deleted = deleted;
        }
    }
}

impl SceneStats for Scene {
    fn live_element_count(&self) -> usize {
        self.elements().count()
    }

    fn view_state(&self) -> ViewState {
        ViewState { zoom_factor: self.zoom }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_with(n: usize) -> Scene {
        let mut scene = Scene::new();
        for i in 0..n {
            let offset = i as f32 * 20.0;
            scene.add_rect((offset, offset), (offset + 10.0, offset + 10.0), 2.0);
        }
        scene
    }

    #[test]
    fn test_add_normalizes_corners() {
        let mut scene = Scene::new();
        let id = scene.add_rect((50.0, 40.0), (10.0, 5.0), 2.0).unwrap();
        let el = scene.elements().next().unwrap();
        assert_eq!(el.id, id);
        assert_eq!((el.x, el.y, el.width, el.height), (10.0, 5.0, 40.0, 35.0));
    }

    #[test]
    fn test_tiny_drag_is_discarded() {
        let mut scene = Scene::new();
        assert_eq!(scene.add_rect((10.0, 10.0), (11.0, 40.0), 2.0), None);
        assert_eq!(scene.live_element_count(), 0);
    }

    #[test]
    fn test_live_count_skips_deleted() {
        let mut scene = scene_with(3);
        assert_eq!(scene.live_element_count(), 3);
        assert!(scene.undo());
        assert_eq!(scene.live_element_count(), 2);
        // Tombstone still stored.
        assert_eq!(scene.elements.len(), 3);
    }

    #[test]
    fn test_undo_redo_clear() {
        let mut scene = scene_with(4);
        scene.clear();
        assert_eq!(scene.live_element_count(), 0);
        assert!(scene.undo());
        assert_eq!(scene.live_element_count(), 4);
        assert!(scene.redo());
        assert_eq!(scene.live_element_count(), 0);
    }

    #[test]
    fn test_new_change_drops_redo() {
        let mut scene = scene_with(2);
        scene.undo();
        scene.add_rect((0.0, 0.0), (30.0, 30.0), 2.0);
        assert!(!scene.redo());
        assert_eq!(scene.live_element_count(), 2);
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut scene = Scene::new();
        assert!(!scene.undo());
        assert!(!scene.redo());
        scene.clear();
        assert!(!scene.undo());
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut scene = Scene::new();
        assert_eq!(scene.view_state(), ViewState { zoom_factor: 1.0 });
        scene.set_zoom(100.0);
        assert_eq!(scene.zoom(), MAX_ZOOM);
        scene.set_zoom(0.0);
        assert_eq!(scene.zoom(), MIN_ZOOM);
        scene.set_zoom(1.0);
        scene.zoom_in();
        scene.zoom_out();
        assert!((scene.zoom() - 1.0).abs() < 1e-9);
    }
}
