//! Provisional IME text shown at one cursor while several are active.

use tracing::warn;

use crate::{CursorSet, Host, TextRange};

/// Marked text in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    /// Cursor set to restore when the composition ends.
    pub saved: CursorSet,
    /// Where the provisional text currently sits.
    pub marked: TextRange,
    /// What the provisional text replaced.
    pub replaced: String,
}

impl Composition {
    /// Start composing at the first range of `cursors`.
    pub fn begin(host: &Host<'_>, cursors: &CursorSet) -> Self {
        let first = cursors.first();
        Self {
            saved: cursors.clone(),
            marked: first,
            replaced: host.substring(first),
        }
    }

    /// Show `text` as the provisional text. History is not recorded for
    /// provisional edits, since [`Composition::revert`] always undoes them.
    pub fn mark(&mut self, host: &mut Host<'_>, text: &str) -> bool {
        match host.replace_untracked(self.marked, text) {
            Some(marked) => {
                self.marked = marked;
                true
            }
            None => false,
        }
    }

    /// Put the buffer back the way it was before composing started and
    /// return the saved cursors.
    pub fn revert(self, host: &mut Host<'_>) -> CursorSet {
        if host.replace_untracked(self.marked, &self.replaced).is_none() {
            warn!(marked = %self.marked, "could not remove provisional text");
        }
        self.saved
    }
}
