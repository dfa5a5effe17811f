//! # Undo/Redo History
//!
//! A single linear history per editing session.
//!
//! ## Design
//!
//! - Frames are immutable once recorded and live in an append-only `Vec`
//! - `cursor` counts the frames currently applied; undo steps it back, redo
//!   steps it forward
//! - Recording a new frame truncates every frame past the cursor
//! - Each frame holds full before/after snapshots of the fields it touched, so
//!   undo and redo never recompute anything from the live store

use crate::Field;

/// Default number of frames kept before the oldest is dropped.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// The recorded effect of one operation on one field.
///
/// `before == None` means the field was created, `after == None` that it was
/// deleted. `index` is the field's position in the store: where it was
/// inserted, or where it sat before removal.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldChange {
    /// Position of the field in store order.
    pub index: usize,
    /// Snapshot before the operation.
    pub before: Option<Field>,
    /// Snapshot after the operation.
    pub after: Option<Field>,
}

/// One undoable step: every field change made by a single operation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryFrame {
    /// Changes in application order.
    pub changes: Vec<FieldChange>,
}

/// Linear undo/redo history.
#[derive(Debug, Clone)]
pub struct History {
    frames: Vec<HistoryFrame>,
    cursor: usize,
    /// Maximum frames kept (0 = unlimited).
    limit: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::with_limit(DEFAULT_HISTORY_LIMIT)
    }
}

impl History {
    /// Create a history with the default limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a history that keeps at most `limit` frames (0 = unlimited).
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            frames: Vec::new(),
            cursor: 0,
            limit,
        }
    }

    /// Record a frame, discarding any redo tail.
    pub fn record(&mut self, frame: HistoryFrame) {
        self.frames.truncate(self.cursor);
        self.frames.push(frame);
        if self.limit > 0 && self.frames.len() > self.limit {
            let excess = self.frames.len() - self.limit;
            self.frames.drain(..excess);
        }
        self.cursor = self.frames.len();
    }

    /// Step back, returning the frame to revert.
    pub fn undo(&mut self) -> Option<&HistoryFrame> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.frames.get(self.cursor)
    }

    /// Step forward, returning the frame to re-apply.
    pub fn redo(&mut self) -> Option<&HistoryFrame> {
        let frame = self.frames.get(self.cursor)?;
        self.cursor += 1;
        Some(frame)
    }

    /// Check if there is a frame to undo.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// Check if there is a frame to redo.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor < self.frames.len()
    }

    /// Number of frames that can be undone.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.cursor
    }

    /// Number of frames that can be redone.
    #[must_use]
    pub fn redo_depth(&self) -> usize {
        self.frames.len() - self.cursor
    }

    /// Drop all frames.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.cursor = 0;
    }
}
