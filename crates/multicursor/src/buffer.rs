use std::fmt;

use ropey::Rope;

use crate::TextRange;

/// Text storage consumed by the engine. Offsets count chars.
pub trait TextBuffer {
    /// Total length in chars.
    fn len(&self) -> usize;

    /// Return true if the buffer holds no text.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the text in a range.
    fn substring(&self, range: TextRange) -> String;

    /// Replace `range` with `text`, returning the range the new text actually
    /// occupies. The returned range always starts at `range.start`, but its
    /// length may differ from `text` if the buffer normalises input.
    fn replace(&mut self, range: TextRange, text: &str) -> TextRange;

    /// Veto hook consulted before every replacement.
    fn will_change(&self, _range: TextRange, _text: &str) -> bool {
        true
    }

    /// Monotonic revision, bumped on every replacement.
    fn revision(&self) -> u64;

    /// The whole contents.
    fn text(&self) -> String {
        self.substring(TextRange::new(0, self.len()))
    }

    /// The char at `offset`, if any.
    fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len() {
            return None;
        }
        self.substring(TextRange::with_len(offset, 1)).chars().next()
    }
}

/// Predicate deciding whether a replacement may proceed.
pub type ChangeFilter = Box<dyn Fn(TextRange, &str) -> bool>;

/// Rope-backed text buffer.
pub struct RopeBuffer {
    /// Rope storage for the buffer contents.
    rope: Rope,
    /// Monotonic revision for cache invalidation.
    revision: u64,
    /// Refuse every edit when set.
    read_only: bool,
    /// Optional host validator.
    filter: Option<ChangeFilter>,
}

impl RopeBuffer {
    /// Create a new buffer from an initial string.
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(&normalize_newlines(text.as_ref())),
            revision: 0,
            read_only: false,
            filter: None,
        }
    }

    /// Builder method to make the buffer read-only.
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Builder method to install a change filter.
    pub fn with_filter(mut self, filter: impl Fn(TextRange, &str) -> bool + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Return the total number of logical lines.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Return the text of a logical line without a trailing newline.
    pub fn line_text(&self, line: usize) -> String {
        let line = line.min(self.line_count().saturating_sub(1));
        let mut text = self.rope.line(line).to_string();
        if text.ends_with('\n') {
            let _ = text.pop();
        }
        text
    }

    /// Clamp a range within buffer bounds.
    fn clamp_range(&self, range: TextRange) -> TextRange {
        range.clamp(self.rope.len_chars())
    }
}

impl TextBuffer for RopeBuffer {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn substring(&self, range: TextRange) -> String {
        let range = self.clamp_range(range);
        self.rope.slice(range.start..range.end).to_string()
    }

    fn replace(&mut self, range: TextRange, text: &str) -> TextRange {
        let range = self.clamp_range(range);
        let text = normalize_newlines(text);
        self.rope.remove(range.start..range.end);
        self.rope.insert(range.start, &text);
        self.revision = self.revision.saturating_add(1);
        TextRange::with_len(range.start, text.chars().count())
    }

    fn will_change(&self, range: TextRange, text: &str) -> bool {
        if self.read_only {
            return false;
        }
        self.filter.as_ref().is_none_or(|f| f(range, text))
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn text(&self) -> String {
        self.rope.to_string()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }
}

impl fmt::Debug for RopeBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RopeBuffer")
            .field("len", &self.rope.len_chars())
            .field("revision", &self.revision)
            .field("read_only", &self.read_only)
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

/// Fold `\r\n` and lone `\r` into `\n`.
fn normalize_newlines(text: &str) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use proptest::{char, prelude::*};

    use super::*;

    #[test]
    fn replace_reports_normalized_length() {
        let mut buf = RopeBuffer::new("ab");
        let new = buf.replace(TextRange::caret(1), "x\r\ny");
        assert_eq!(buf.text(), "ax\nyb");
        assert_eq!(new, TextRange::new(1, 4));
        assert_eq!(buf.revision(), 1);
    }

    #[test]
    fn veto_hooks() {
        let buf = RopeBuffer::new("abc").with_filter(|_, text| !text.contains('!'));
        assert!(buf.will_change(TextRange::caret(0), "ok"));
        assert!(!buf.will_change(TextRange::caret(0), "no!"));
        let buf = RopeBuffer::new("abc").with_read_only(true);
        assert!(!buf.will_change(TextRange::caret(0), "ok"));
    }

    #[test]
    fn line_helpers() {
        let buf = RopeBuffer::new("one\ntwo\n");
        assert_eq!(buf.line_count(), 3);
        assert_eq!(buf.line_text(1), "two");
        assert_eq!(buf.line_text(2), "");
        assert_eq!(buf.char_at(3), Some('\n'));
        assert_eq!(buf.char_at(8), None);
    }

    #[test]
    fn substring_clamps() {
        let buf = RopeBuffer::new("hello");
        assert_eq!(buf.substring(TextRange::new(3, 99)), "lo");
    }

    proptest! {
        #[test]
        fn replace_matches_string(
            text in text_strategy(),
            insert in text_strategy(),
            start in 0usize..=100,
            end in 0usize..=100,
        ) {
            let char_len = text.chars().count();
            let range = TextRange::new(start.min(char_len), end.min(char_len));

            let mut buf = RopeBuffer::new(&text);
            let new = buf.replace(range, &insert);

            let mut expected = text.clone();
            let start_byte = byte_index_for_char(&expected, range.start);
            let end_byte = byte_index_for_char(&expected, range.end);
            expected.replace_range(start_byte..end_byte, &insert);

            prop_assert_eq!(buf.text(), expected);
            prop_assert_eq!(new, TextRange::with_len(range.start, insert.chars().count()));
        }
    }

    fn text_strategy() -> impl Strategy<Value = String> {
        let chars = prop_oneof![
            Just('\n'),
            Just('é'),
            Just('界'),
            Just(' '),
            char::range('a', 'z'),
            char::range('A', 'Z'),
        ];
        prop::collection::vec(chars, 0..40).prop_map(|items| items.into_iter().collect::<String>())
    }

    fn byte_index_for_char(text: &str, char_index: usize) -> usize {
        text.char_indices()
            .nth(char_index)
            .map(|(idx, _)| idx)
            .unwrap_or(text.len())
    }
}
