//! Snapshot undo/redo over the annotation collection.

use std::collections::VecDeque;

use crate::shapes::BoundingBox;

pub const DEFAULT_DEPTH: usize = 100;

#[derive(Debug)]
pub struct History {
    undo_stack: VecDeque<Vec<BoundingBox>>,
    redo_stack: Vec<Vec<BoundingBox>>,
    depth: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_depth(DEFAULT_DEPTH)
    }
}

impl History {
    pub fn with_depth(depth: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            depth: depth.max(1),
        }
    }

    /// Record the state as it was before a mutation.
    pub fn push(&mut self, snapshot: Vec<BoundingBox>) {
        if self.undo_stack.len() == self.depth {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, current: &[BoundingBox]) -> Option<Vec<BoundingBox>> {
        let prev = self.undo_stack.pop_back()?;
        self.redo_stack.push(current.to_vec());
        Some(prev)
    }

    pub fn redo(&mut self, current: &[BoundingBox]) -> Option<Vec<BoundingBox>> {
        let next = self.redo_stack.pop()?;
        self.undo_stack.push_back(current.to_vec());
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
