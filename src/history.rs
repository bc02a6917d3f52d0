use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::marker::PhantomData;

/// Oldest snapshots are dropped once the stack grows past this.
pub const MAX_HISTORY: usize = 100;

/// Bounded undo/redo over serialized full-state snapshots.
///
/// The top of the undo stack always mirrors the current committed state, so
/// undo/redo replay prior states byte-for-byte instead of reconstructing
/// them. Pushing a state identical to the top is a no-op.
pub struct HistoryStack<T> {
    undo: VecDeque<String>,
    redo: Vec<String>,
    _state: PhantomData<fn() -> T>,
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> HistoryStack<T> {
    pub fn new() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            _state: PhantomData,
        }
    }

    /// True when there is a state before the current one to return to.
    pub fn can_undo(&self) -> bool {
        self.undo.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl<T: Serialize + DeserializeOwned> HistoryStack<T> {
    /// Record a committed state. No-op when it matches the current top;
    /// otherwise the redo stack is invalidated and the oldest entry drops
    /// once the cap is reached.
    pub fn push(&mut self, state: &T) {
        let snapshot = match serde_json::to_string(state) {
            Ok(snapshot) => snapshot,
            Err(err) => {
                log::error!("Failed to snapshot editor state: {err}");
                return;
            }
        };
        if self.undo.back() == Some(&snapshot) {
            return;
        }
        self.undo.push_back(snapshot);
        if self.undo.len() > MAX_HISTORY {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Step back to the previous committed state, or `None` at the bottom.
    pub fn undo(&mut self) -> Option<T> {
        if self.undo.len() < 2 {
            return None;
        }
        let current = self.undo.pop_back()?;
        self.redo.push(current);
        self.replay(self.undo.back()?)
    }

    /// Step forward again after an undo, or `None` if nothing was undone.
    pub fn redo(&mut self) -> Option<T> {
        let snapshot = self.redo.pop()?;
        let state = self.replay(&snapshot);
        self.undo.push_back(snapshot);
        state
    }

    fn replay(&self, snapshot: &str) -> Option<T> {
        match serde_json::from_str(snapshot) {
            Ok(state) => Some(state),
            Err(err) => {
                log::error!("Failed to replay history snapshot: {err}");
                None
            }
        }
    }
}
