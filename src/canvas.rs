//! Box annotation state machine.
//!
//! `BoxCanvas` owns the annotation set and routes pointer and keyboard events
//! to the right mutation: drawing a new box, dragging a corner, dragging a
//! whole box, relabeling, deleting, and undo/redo. All coordinates are image
//! pixels; the host converts from screen space before calling in.

use crate::history::History;
use crate::record::ShapeRecord;
use crate::shapes::BoundingBox;

pub const DEFAULT_POINT_SIZE: f32 = 5.0;

/// Opposite corner of a freshly anchored box.
const PROPOSAL_CORNER: usize = 2;

#[derive(Clone, Debug, PartialEq)]
enum DragState {
    None,
    Proposal,
    Corner {
        index: usize,
        corner: usize,
        before: BoundingBox,
    },
    Box {
        index: usize,
        before: BoundingBox,
        prev: Option<egui::Pos2>,
    },
}

/// What a pointer press landed on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Hit {
    Corner { index: usize, corner: usize },
    Inside { index: usize },
}

#[derive(Debug)]
pub struct BoxCanvas {
    annotations: Vec<BoundingBox>,
    proposed: Option<BoundingBox>,
    active: Option<usize>,
    adding: bool,
    current_class: String,
    point_size: f32,
    image_size: egui::Vec2,
    drag: DragState,
    history: History,
}

impl BoxCanvas {
    pub fn new(image_size: egui::Vec2, current_class: impl Into<String>) -> Self {
        Self {
            annotations: Vec::new(),
            proposed: None,
            active: None,
            adding: false,
            current_class: current_class.into(),
            point_size: DEFAULT_POINT_SIZE,
            image_size,
            drag: DragState::None,
            history: History::default(),
        }
    }

    pub fn with_point_size(mut self, point_size: f32) -> Self {
        self.point_size = point_size;
        self
    }

    pub fn with_history(mut self, history: History) -> Self {
        self.history = history;
        self
    }

    pub fn annotations(&self) -> &[BoundingBox] {
        &self.annotations
    }

    pub fn proposed(&self) -> Option<&BoundingBox> {
        self.proposed.as_ref()
    }

    pub fn active(&self) -> Option<usize> {
        self.active
    }

    pub fn is_adding(&self) -> bool {
        self.adding
    }

    pub fn set_adding(&mut self, adding: bool) {
        self.adding = adding;
    }

    pub fn current_class(&self) -> &str {
        &self.current_class
    }

    pub fn set_current_class(&mut self, label: impl Into<String>) {
        self.current_class = label.into();
    }

    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn inside_image(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x <= self.image_size.x && y <= self.image_size.y
    }

    /// Corners of every box are tried before any interior so a handle that
    /// sits inside a neighbouring box stays reachable.
    pub fn hit_test(&self, p: egui::Pos2) -> Option<Hit> {
        for (index, b) in self.annotations.iter().enumerate() {
            for (corner, c) in b.corners().iter().enumerate() {
                if c.distance(p) < self.point_size {
                    return Some(Hit::Corner { index, corner });
                }
            }
        }
        self.annotations
            .iter()
            .position(|b| b.contains(p))
            .map(|index| Hit::Inside { index })
    }

    // ── Pointer events ──────────────────────────────────────────────────────

    pub fn on_click(&mut self, x: f32, y: f32) {
        if !self.inside_image(x, y) {
            return;
        }
        let (tx, ty) = (x.trunc(), y.trunc());

        if self.adding {
            log::debug!("starting box at ({tx}, {ty}) as {:?}", self.current_class);
            self.proposed = Some(BoundingBox::new([tx, ty, tx, ty], self.current_class.clone()));
            self.drag = DragState::Proposal;
        } else {
            match self.hit_test(egui::pos2(x, y)) {
                Some(Hit::Corner { index, corner }) => {
                    self.active = Some(index);
                    self.drag = DragState::Corner {
                        index,
                        corner,
                        before: self.annotations[index].clone(),
                    };
                    return;
                }
                Some(Hit::Inside { index }) => {
                    self.active = Some(index);
                    self.drag = DragState::Box {
                        index,
                        before: self.annotations[index].clone(),
                        prev: Some(egui::pos2(tx, ty)),
                    };
                    return;
                }
                None => {}
            }
        }
        self.active = None;
        self.adding = false;
    }

    pub fn on_drag(&mut self, x: f32, y: f32) {
        if !self.inside_image(x, y) {
            return;
        }
        let (x, y) = (x.trunc(), y.trunc());

        match &mut self.drag {
            DragState::None => {}
            DragState::Proposal => {
                if let Some(proposed) = self.proposed.as_mut() {
                    proposed.move_corner(PROPOSAL_CORNER, x, y);
                }
            }
            DragState::Corner { index, corner, .. } => {
                if let Some(b) = self.annotations.get_mut(*index) {
                    b.move_corner(*corner, x, y);
                }
            }
            DragState::Box { index, prev, .. } => {
                if let Some(b) = self.annotations.get_mut(*index) {
                    b.move_box(x, y, *prev);
                }
                *prev = Some(egui::pos2(x, y));
            }
        }
    }

    /// Ends the gesture at `(x, y)`. Returns true when the annotation set changed.
    pub fn on_release(&mut self, x: f32, y: f32) -> bool {
        // the final motion may arrive in the same frame as the release
        self.on_drag(x, y);
        let mut changed = self.finish_drag();
        self.drag = DragState::None;

        if let Some(proposed) = self.proposed.take() {
            if proposed.is_degenerate() {
                log::debug!("discarding degenerate box");
            } else {
                self.history.push(self.annotations.clone());
                log::debug!("committed box {:?}", proposed.xyxy());
                self.annotations.push(proposed);
                changed = true;
            }
        }
        changed
    }

    /// Close a corner or whole-box drag, recording the pre-gesture state if
    /// the box moved. A pending proposal keeps its route.
    fn finish_drag(&mut self) -> bool {
        match std::mem::replace(&mut self.drag, DragState::None) {
            DragState::Corner { index, before, .. } | DragState::Box { index, before, .. } => {
                if self.annotations.get(index).is_some_and(|b| *b != before) {
                    let mut snapshot = self.annotations.clone();
                    snapshot[index] = before;
                    self.history.push(snapshot);
                    log::debug!("moved box {index}");
                    return true;
                }
                false
            }
            DragState::Proposal => {
                self.drag = DragState::Proposal;
                false
            }
            DragState::None => false,
        }
    }

    // ── Keyboard ────────────────────────────────────────────────────────────

    /// Handle a key press. `key` is `None` for a modifier-only press such as
    /// Shift on its own. Returns true when the annotation set changed.
    pub fn on_key_down(&mut self, key: Option<egui::Key>, modifiers: egui::Modifiers) -> bool {
        self.adding = modifiers.shift;

        let Some(key) = key else {
            return false;
        };

        if modifiers.command || modifiers.ctrl {
            return match key {
                egui::Key::Z if modifiers.shift => self.redo(),
                egui::Key::Z => self.undo(),
                egui::Key::Y => self.redo(),
                _ => false,
            };
        }

        let Some(active) = self.active else {
            return false;
        };
        match key {
            egui::Key::Delete | egui::Key::Backspace => self.delete(active),
            egui::Key::C => self.relabel(active),
            _ => false,
        }
    }

    pub fn delete(&mut self, index: usize) -> bool {
        let moved = self.finish_drag();
        if index >= self.annotations.len() {
            return moved;
        }
        self.history.push(self.annotations.clone());
        let removed = self.annotations.remove(index);
        log::debug!("deleted box {index} ({:?})", removed.label());
        self.active = None;
        true
    }

    pub fn relabel(&mut self, index: usize) -> bool {
        let moved = self.finish_drag();
        let Some(b) = self.annotations.get(index) else {
            return moved;
        };
        if b.label() == self.current_class {
            return moved;
        }
        self.history.push(self.annotations.clone());
        log::debug!("relabel box {index} {:?} -> {:?}", b.label(), self.current_class);
        self.annotations[index].set_label(self.current_class.clone());
        true
    }

    // ── Undo ────────────────────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.finish_drag();
        match self.history.undo(&self.annotations) {
            Some(prev) => {
                self.restore(prev);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.finish_drag();
        match self.history.redo(&self.annotations) {
            Some(next) => {
                self.restore(next);
                true
            }
            None => false,
        }
    }

    fn restore(&mut self, annotations: Vec<BoundingBox>) {
        self.annotations = annotations;
        self.proposed = None;
        self.drag = DragState::None;
        if self.active.is_some_and(|i| i >= self.annotations.len()) {
            self.active = None;
        }
    }

    // ── Data ────────────────────────────────────────────────────────────────

    pub fn init_empty_data(&mut self) {
        self.annotations.clear();
        self.proposed = None;
        self.active = None;
        self.drag = DragState::None;
        self.history.clear();
    }

    pub fn data(&self) -> Vec<ShapeRecord> {
        self.annotations.iter().map(BoundingBox::to_record).collect()
    }

    pub fn set_data(&mut self, records: Vec<ShapeRecord>) {
        self.init_empty_data();
        self.annotations = records.into_iter().map(BoundingBox::from_record).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> BoxCanvas {
        BoxCanvas::new(egui::vec2(200.0, 100.0), "cat")
    }

    fn shift() -> egui::Modifiers {
        egui::Modifiers {
            shift: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_click_outside_image_is_ignored() {
        let mut c = canvas();
        c.set_adding(true);
        c.on_click(-1.0, 10.0);
        assert!(c.proposed().is_none());
        assert!(c.is_adding());
    }

    #[test]
    fn test_adding_click_truncates_and_resets_adding() {
        let mut c = canvas();
        c.set_adding(true);
        c.on_click(10.7, 20.2);
        assert_eq!(c.proposed().unwrap().xyxy(), [10.0, 20.0, 10.0, 20.0]);
        assert!(!c.is_adding());
    }

    #[test]
    fn test_drag_outside_image_does_not_move_proposal() {
        let mut c = canvas();
        c.set_adding(true);
        c.on_click(10.0, 10.0);
        c.on_drag(50.0, 40.0);
        c.on_drag(500.0, 40.0);
        assert_eq!(c.proposed().unwrap().xyxy(), [10.0, 10.0, 50.0, 40.0]);
    }

    #[test]
    fn test_corner_takes_priority_over_neighbour_interior() {
        let mut c = canvas();
        c.set_data(vec![
            ShapeRecord::Box {
                label: "a".into(),
                xyxy: [0.0, 0.0, 100.0, 100.0],
            },
            ShapeRecord::Box {
                label: "b".into(),
                xyxy: [50.0, 50.0, 80.0, 80.0],
            },
        ]);
        assert_eq!(
            c.hit_test(egui::pos2(51.0, 51.0)),
            Some(Hit::Corner { index: 1, corner: 0 })
        );
        assert_eq!(c.hit_test(egui::pos2(20.0, 20.0)), Some(Hit::Inside { index: 0 }));
        assert_eq!(c.hit_test(egui::pos2(150.0, 20.0)), None);
    }

    #[test]
    fn test_modifier_only_shift_enables_adding() {
        let mut c = canvas();
        c.on_key_down(None, shift());
        assert!(c.is_adding());
        c.on_key_down(Some(egui::Key::A), egui::Modifiers::default());
        assert!(!c.is_adding());
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let mut c = canvas();
        c.set_data(vec![ShapeRecord::Box {
            label: "a".into(),
            xyxy: [0.0, 0.0, 10.0, 10.0],
        }]);
        assert!(!c.on_key_down(Some(egui::Key::Delete), egui::Modifiers::default()));
        assert_eq!(c.annotations().len(), 1);
    }

    #[test]
    fn test_set_data_clears_history_and_selection() {
        let mut c = canvas();
        c.set_adding(true);
        c.on_click(1.0, 1.0);
        c.on_drag(9.0, 9.0);
        c.on_release(9.0, 9.0);
        c.on_click(5.0, 5.0);
        assert_eq!(c.active(), Some(0));
        c.set_data(Vec::new());
        assert!(c.active().is_none());
        assert!(!c.can_undo());
    }
}
