//! Unicode segmentation and display-column helpers. All offsets here are
//! char indices relative to the string passed in.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::TextRange;

/// Collect grapheme boundary indices for a string, including 0 and the end.
pub fn grapheme_boundaries(text: &str) -> Vec<usize> {
    let mut boundaries = vec![0];
    let mut count = 0usize;
    for grapheme in text.graphemes(true) {
        count = count.saturating_add(grapheme.chars().count());
        boundaries.push(count);
    }
    boundaries
}

/// Find the grapheme boundary before `column`, or 0.
pub fn prev_grapheme_boundary(text: &str, column: usize) -> usize {
    let boundaries = grapheme_boundaries(text);
    let idx = match boundaries.binary_search(&column) {
        Ok(idx) | Err(idx) => idx,
    };
    boundaries.get(idx.saturating_sub(1)).copied().unwrap_or(0)
}

/// Find the grapheme boundary after `column`, or `column` at the end.
pub fn next_grapheme_boundary(text: &str, column: usize) -> usize {
    let boundaries = grapheme_boundaries(text);
    match boundaries.binary_search(&column) {
        Ok(idx) => boundaries.get(idx + 1).copied().unwrap_or(column),
        Err(idx) => boundaries.get(idx).copied().unwrap_or(column),
    }
}

/// Is this word-bound segment a word, rather than whitespace or punctuation?
fn is_word(segment: &str) -> bool {
    segment.chars().any(char::is_alphanumeric)
}

/// Word spans in a string, by UAX #29 word boundaries.
pub fn word_spans(text: &str) -> Vec<TextRange> {
    let mut spans = Vec::new();
    let mut chars = 0usize;
    for segment in text.split_word_bounds() {
        let len = segment.chars().count();
        if is_word(segment) {
            spans.push(TextRange::with_len(chars, len));
        }
        chars += len;
    }
    spans
}

/// Display width of a single grapheme, clamped to one or two cells.
pub fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_empty() {
        return 0;
    }
    UnicodeWidthStr::width(grapheme).clamp(1, 2)
}

/// Compute tab expansion width for a column.
pub fn tab_width(column: usize, tab_stop: usize) -> usize {
    let tab_stop = tab_stop.max(1);
    tab_stop - column % tab_stop
}

/// Width of a grapheme placed at display column `col`.
pub fn cell_width(grapheme: &str, col: usize, tab_stop: usize) -> usize {
    if grapheme == "\t" {
        tab_width(col, tab_stop)
    } else {
        grapheme_width(grapheme)
    }
}

/// Convert a char index to a display column.
pub fn column_for_char(line: &str, column: usize, tab_stop: usize) -> usize {
    let mut col = 0usize;
    let mut consumed = 0usize;
    for grapheme in line.graphemes(true) {
        if consumed >= column {
            break;
        }
        col = col.saturating_add(cell_width(grapheme, col, tab_stop));
        consumed = consumed.saturating_add(grapheme.chars().count());
    }
    col
}

/// Convert a display column to the char index of the grapheme that starts at
/// or before it.
pub fn char_for_column(line: &str, column: usize, tab_stop: usize) -> usize {
    let mut col = 0usize;
    let mut chars = 0usize;
    for grapheme in line.graphemes(true) {
        let width = cell_width(grapheme, col, tab_stop);
        if col + width > column {
            break;
        }
        col = col.saturating_add(width);
        chars = chars.saturating_add(grapheme.chars().count());
    }
    chars
}

/// Uppercase the first char and leave the rest alone.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grapheme_navigation_handles_emoji() {
        let line = "a👩‍💻b";
        assert_eq!(next_grapheme_boundary(line, 1), 4);
        assert_eq!(prev_grapheme_boundary(line, 4), 1);
        assert_eq!(prev_grapheme_boundary(line, 0), 0);
        assert_eq!(next_grapheme_boundary(line, 5), 5);
    }

    #[test]
    fn combining_marks_stay_with_base() {
        let line = "e\u{301}x";
        assert_eq!(grapheme_boundaries(line), vec![0, 2, 3]);
    }

    #[test]
    fn words_skip_spaces_and_punctuation() {
        let spans = word_spans("foo, bar_baz 42!");
        assert_eq!(
            spans,
            vec![TextRange::new(0, 3), TextRange::new(5, 12), TextRange::new(13, 15)]
        );
    }

    #[test]
    fn column_mapping_respects_tabs() {
        assert_eq!(column_for_char("a\tb", 2, 4), 4);
        assert_eq!(char_for_column("a\tb", 4, 4), 2);
        assert_eq!(char_for_column("a\tb", 3, 4), 1);
        assert_eq!(column_for_char("界x", 1, 4), 2);
    }

    #[test]
    fn capitalize() {
        assert_eq!(capitalize_first("hello"), "Hello");
        assert_eq!(capitalize_first("ßa"), "SSa");
        assert_eq!(capitalize_first(""), "");
    }
}
