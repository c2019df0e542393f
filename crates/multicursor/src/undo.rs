use tracing::trace;

use crate::{CursorSet, TextRange};

/// A memento that reverses one step of an engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inverse {
    /// Restore this exact cursor set.
    Cursors(CursorSet),
    /// Replace `range` with `text`, restoring the previous contents.
    Replace {
        /// Range occupied by the new text.
        range: TextRange,
        /// Text that was there before.
        text: String,
    },
}

/// Grouped undo registration consumed by the engine.
pub trait UndoHost {
    /// Open a group. Groups may nest; only the outermost one is recorded.
    fn begin_group(&mut self);

    /// Close the innermost open group.
    fn end_group(&mut self);

    /// Register an inverse step in the open group.
    fn register_inverse(&mut self, inverse: Inverse);

    /// Pop the most recent undo group for replay, in registration order.
    fn take_undo(&mut self) -> Option<Vec<Inverse>> {
        None
    }

    /// Pop the most recent redo group for replay, in registration order.
    fn take_redo(&mut self) -> Option<Vec<Inverse>> {
        None
    }
}

/// A group of inverses that form a single undo/redo step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    /// Inverses in the order they were registered.
    pub inverses: Vec<Inverse>,
}

impl Transaction {
    /// Return true when there are no text edits recorded.
    pub fn is_empty(&self) -> bool {
        !self
            .inverses
            .iter()
            .any(|i| matches!(i, Inverse::Replace { .. }))
    }
}

/// Which stack a replayed group feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Replay {
    /// Replaying an undo group; inverses go to redo.
    Undo,
    /// Replaying a redo group; inverses go back to undo.
    Redo,
}

/// In-memory undo and redo history.
#[derive(Debug, Default)]
pub struct UndoStack {
    /// Undo history.
    undo: Vec<Transaction>,
    /// Redo history.
    redo: Vec<Transaction>,
    /// Active group for nested edits.
    open: Option<Transaction>,
    /// Group nesting depth.
    depth: usize,
    /// Set while a taken group is being replayed.
    replaying: Option<Replay>,
}

impl UndoStack {
    /// Construct an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of undoable groups.
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable groups.
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Is a group currently open?
    pub fn is_grouping(&self) -> bool {
        self.depth > 0
    }

    /// Record a finished group on the appropriate stack.
    fn commit(&mut self, transaction: Transaction) {
        let replaying = self.replaying.take();
        if transaction.is_empty() {
            trace!("discarding undo group without text edits");
            return;
        }
        match replaying {
            Some(Replay::Undo) => self.redo.push(transaction),
            Some(Replay::Redo) => self.undo.push(transaction),
            None => {
                self.undo.push(transaction);
                self.redo.clear();
            }
        }
    }
}

impl UndoHost for UndoStack {
    fn begin_group(&mut self) {
        if self.depth == 0 {
            self.open = Some(Transaction::default());
        }
        self.depth += 1;
    }

    fn end_group(&mut self) {
        if self.depth == 0 {
            return;
        }
        self.depth -= 1;
        if self.depth == 0
            && let Some(transaction) = self.open.take()
        {
            self.commit(transaction);
        }
    }

    fn register_inverse(&mut self, inverse: Inverse) {
        match self.open.as_mut() {
            Some(transaction) => transaction.inverses.push(inverse),
            None => self.commit(Transaction {
                inverses: vec![inverse],
            }),
        }
    }

    fn take_undo(&mut self) -> Option<Vec<Inverse>> {
        let transaction = self.undo.pop()?;
        self.replaying = Some(Replay::Undo);
        Some(transaction.inverses)
    }

    fn take_redo(&mut self) -> Option<Vec<Inverse>> {
        let transaction = self.redo.pop()?;
        self.replaying = Some(Replay::Redo);
        Some(transaction.inverses)
    }
}
