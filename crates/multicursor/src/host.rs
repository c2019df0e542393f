use scopeguard::guard;
use tracing::trace;

use crate::{CursorSet, Inverse, LayoutProvider, TextBuffer, TextRange, UndoHost};

/// The collaborators an engine command works against, borrowed for the
/// duration of one call.
///
/// Every buffer replacement made by the engine goes through [`Host::replace`],
/// which consults the veto hook, records the text inverse, and re-syncs the
/// layout so that later boundary queries in the same command see the edit.
pub struct Host<'a> {
    /// Text storage.
    pub buffer: &'a mut dyn TextBuffer,
    /// Geometry and segmentation.
    pub layout: &'a mut dyn LayoutProvider,
    /// Undo registration.
    pub undo: &'a mut dyn UndoHost,
    /// Set while an undo group opened by this host is live.
    grouping: bool,
}

impl<'a> Host<'a> {
    /// Bundle the collaborators and bring the layout up to date.
    pub fn new(
        buffer: &'a mut dyn TextBuffer,
        layout: &'a mut dyn LayoutProvider,
        undo: &'a mut dyn UndoHost,
    ) -> Self {
        layout.sync(&*buffer);
        Self {
            buffer,
            layout,
            undo,
            grouping: false,
        }
    }

    /// Buffer length in chars.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Return true if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Text in a range.
    pub fn substring(&self, range: TextRange) -> String {
        self.buffer.substring(range)
    }

    /// Replace `range` with `text` as one undoable step. Returns the range
    /// the new text occupies, or `None` if the buffer vetoed the edit.
    pub fn replace(&mut self, range: TextRange, text: &str) -> Option<TextRange> {
        let previous = self.buffer.substring(range);
        let new = self.replace_untracked(range, text)?;
        self.undo.register_inverse(Inverse::Replace {
            range: new,
            text: previous,
        });
        Some(new)
    }

    /// Replace without registering an inverse. Used for provisional text
    /// that is always reverted before the operation finishes.
    pub(crate) fn replace_untracked(&mut self, range: TextRange, text: &str) -> Option<TextRange> {
        let len = self.buffer.len();
        assert!(
            range.end <= len,
            "edit {range} reaches past buffer end {len}"
        );
        if !self.buffer.will_change(range, text) {
            trace!(range = %range, "edit vetoed by buffer");
            return None;
        }
        let new = self.buffer.replace(range, text);
        assert_eq!(new.start, range.start, "buffer moved the edit start");
        self.layout.edited(&*self.buffer, range, new);
        Some(new)
    }

    /// Run `f` inside a single undo group, registering `snapshot` as the
    /// cursor state to restore. Calls made while a group is already open run
    /// inside the outer group.
    pub(crate) fn grouped<T>(&mut self, snapshot: &CursorSet, f: impl FnOnce(&mut Self) -> T) -> T {
        if self.grouping {
            return f(self);
        }
        self.grouping = true;
        self.undo.begin_group();
        self.undo.register_inverse(Inverse::Cursors(snapshot.clone()));
        let mut host = guard(self, |host| {
            host.undo.end_group();
            host.grouping = false;
        });
        f(&mut host)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridLayout, RopeBuffer, UndoStack};

    #[test]
    fn replace_records_inverse_and_syncs_layout() {
        let mut buffer = RopeBuffer::new("abc");
        let mut layout = GridLayout::new();
        let mut undo = UndoStack::new();
        let mut host = Host::new(&mut buffer, &mut layout, &mut undo);
        let new = host.replace(TextRange::new(1, 2), "xyz");
        assert_eq!(new, Some(TextRange::new(1, 4)));
        assert_eq!(host.layout.offset_at((9, 0).into()), Some(5));
        drop(host);
        assert_eq!(buffer.text(), "axyzc");
        assert_eq!(
            undo.take_undo(),
            Some(vec![Inverse::Replace {
                range: TextRange::new(1, 4),
                text: "b".into()
            }])
        );
    }

    #[test]
    fn vetoed_replace_changes_nothing() {
        let mut buffer = RopeBuffer::new("abc").with_read_only(true);
        let mut layout = GridLayout::new();
        let mut undo = UndoStack::new();
        let mut host = Host::new(&mut buffer, &mut layout, &mut undo);
        assert_eq!(host.replace(TextRange::caret(0), "x"), None);
        drop(host);
        assert_eq!(buffer.text(), "abc");
        assert_eq!(undo.undo_len(), 0);
    }

    #[test]
    fn nested_groups_collapse() {
        let mut buffer = RopeBuffer::new("abc");
        let mut layout = GridLayout::new();
        let mut undo = UndoStack::new();
        let mut host = Host::new(&mut buffer, &mut layout, &mut undo);
        let set = CursorSet::default();
        host.grouped(&set, |host| {
            host.replace(TextRange::caret(0), "1");
            host.grouped(&set, |host| {
                host.replace(TextRange::caret(0), "2");
            });
        });
        drop(host);
        assert_eq!(undo.undo_len(), 1);
        assert_eq!(undo.take_undo().map(|g| g.len()), Some(3));
    }

    #[test]
    #[should_panic(expected = "past buffer end")]
    fn out_of_bounds_edit_is_fatal() {
        let mut buffer = RopeBuffer::new("abc");
        let mut layout = GridLayout::new();
        let mut undo = UndoStack::new();
        let mut host = Host::new(&mut buffer, &mut layout, &mut undo);
        host.replace(TextRange::new(2, 9), "");
    }
}
