use geom::{Direction, Point, Rect};
use tracing::trace;
use unicode_segmentation::UnicodeSegmentation;

use crate::{
    TextBuffer, TextRange,
    segment::{
        cell_width, char_for_column, column_for_char, next_grapheme_boundary,
        prev_grapheme_boundary, word_spans,
    },
};

/// Which way a boundary search runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Towards {
    /// Towards offset 0.
    Start,
    /// Towards the end of the buffer.
    End,
}

/// Geometry and segmentation oracle consumed by the engine.
///
/// A provider answers from a snapshot of the buffer taken by [`sync`]. The
/// engine reports every replacement it makes through [`edited`], so queries
/// always see the live text. Boundary searches that find nothing return the
/// offset they were given.
///
/// [`sync`]: LayoutProvider::sync
/// [`edited`]: LayoutProvider::edited
pub trait LayoutProvider {
    /// Refresh the snapshot from the buffer if it has changed.
    fn sync(&mut self, buffer: &dyn TextBuffer);

    /// The buffer replaced `original`; the new text occupies `modified`.
    /// Providers that can patch their snapshot in place override this.
    fn edited(&mut self, buffer: &dyn TextBuffer, _original: TextRange, _modified: TextRange) {
        self.sync(buffer);
    }

    /// Bounding rectangle of a range. A caret yields a zero-width rectangle.
    fn rect_for(&self, range: TextRange) -> Option<Rect>;

    /// The range covered by a rectangle, from the offset at its top-left
    /// corner to the offset at its bottom-right corner.
    fn range_for(&self, rect: Rect) -> Option<TextRange>;

    /// The caret offset nearest to a point, or `None` outside the text rows.
    fn offset_at(&self, point: Point) -> Option<usize>;

    /// The adjacent extended grapheme cluster boundary.
    fn grapheme_boundary(&self, offset: usize, towards: Towards) -> usize;

    /// The start of the nearest word that begins before `offset`, or the end
    /// of the nearest word that ends after it.
    fn word_boundary(&self, offset: usize, towards: Towards) -> usize;

    /// The start of the nearest paragraph that begins before `offset`, or the
    /// end of the nearest paragraph that ends after it.
    fn paragraph_boundary(&self, offset: usize, towards: Towards) -> usize;

    /// The start or end of the display row holding `offset`.
    fn line_boundary(&self, offset: usize, towards: Towards) -> usize;

    /// The offset on the display row above or below, at the same column.
    fn offset_on_adjacent_line(&self, offset: usize, direction: Direction) -> Option<usize>;

    /// Rows scrolled by a page movement.
    fn page_height(&self) -> u32;

    /// Words that overlap or touch `range`.
    fn word_ranges(&self, range: TextRange) -> Vec<TextRange>;

    /// Paragraphs holding any offset of `range`. Paragraph ranges exclude
    /// their terminator.
    fn paragraph_ranges(&self, range: TextRange) -> Vec<TextRange>;

    /// One full-width rectangle per display row that `range` covers.
    fn line_fragments(&self, range: TextRange) -> Vec<Rect>;

    /// The word holding `offset`, or the word that ends exactly there.
    fn word_at(&self, offset: usize) -> Option<TextRange> {
        let words = self.word_ranges(TextRange::caret(offset));
        words
            .iter()
            .find(|w| w.contains(offset))
            .or_else(|| words.iter().find(|w| w.end == offset))
            .copied()
    }

    /// The paragraph holding `offset`.
    fn paragraph_at(&self, offset: usize) -> TextRange {
        self.paragraph_ranges(TextRange::caret(offset))
            .first()
            .copied()
            .unwrap_or(TextRange::caret(offset))
    }
}

/// Wrapping behavior for a grid layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Each logical line occupies one row.
    #[default]
    None,
    /// Lines wrap at the configured width.
    Soft,
}

/// A logical line in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Line {
    /// Char offset of the first char.
    start: usize,
    /// Char offset of the terminator, or the buffer end.
    end: usize,
    /// Byte offset of the first char in the snapshot.
    byte_start: usize,
    /// Byte offset of the terminator in the snapshot.
    byte_end: usize,
}

impl Line {
    /// The char span of the line content.
    fn range(&self) -> TextRange {
        TextRange::new(self.start, self.end)
    }
}

/// A wrapped segment of a logical line, displayed as one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Row {
    /// Index of the owning logical line.
    line: usize,
    /// Char offset of the row start.
    start: usize,
    /// Char offset of the row end.
    end: usize,
    /// Display column within the logical line where the row starts.
    start_col: usize,
    /// Display column within the logical line where the row ends.
    end_col: usize,
}

impl Row {
    /// Display width of this row.
    fn width(&self) -> u32 {
        self.end_col.saturating_sub(self.start_col) as u32
    }
}

/// A layout over a monospace cell grid, one cell per column.
#[derive(Debug, Clone)]
pub struct GridLayout {
    /// Wrapping mode.
    wrap_mode: WrapMode,
    /// Wrap width in cells.
    wrap_width: usize,
    /// Tab stop width.
    tab_stop: usize,
    /// Rows per page.
    page_height: u32,
    /// Revision and length of the snapshot.
    synced: Option<(u64, usize)>,
    /// Text snapshot.
    text: String,
    /// Logical lines of the snapshot.
    lines: Vec<Line>,
    /// Display rows of the snapshot.
    rows: Vec<Row>,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl GridLayout {
    /// Construct an unwrapped layout with a four-column tab stop and a
    /// 24-row page.
    pub fn new() -> Self {
        let mut layout = Self {
            wrap_mode: WrapMode::None,
            wrap_width: 80,
            tab_stop: 4,
            page_height: 24,
            synced: None,
            text: String::new(),
            lines: Vec::new(),
            rows: Vec::new(),
        };
        layout.rebuild(String::new());
        layout
    }

    /// Builder method to set wrapping.
    pub fn with_wrap(mut self, mode: WrapMode, width: usize) -> Self {
        self.wrap_mode = mode;
        self.wrap_width = width.max(1);
        self.synced = None;
        self
    }

    /// Builder method to set the tab stop.
    pub fn with_tab_stop(mut self, tab_stop: usize) -> Self {
        self.tab_stop = tab_stop.max(1);
        self.synced = None;
        self
    }

    /// Builder method to set the page height.
    pub fn with_page_height(mut self, rows: u32) -> Self {
        self.page_height = rows.max(1);
        self
    }

    /// Number of display rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Map an offset to display coordinates. A caret at a wrap point belongs
    /// to the following row.
    pub fn point_for(&self, offset: usize) -> Point {
        let y = self.row_of(offset);
        let row = self.rows[y];
        let line = self.lines[row.line];
        let col = column_for_char(self.line_text(row.line), offset - line.start, self.tab_stop);
        Point {
            x: col.saturating_sub(row.start_col) as u32,
            y: y as u32,
        }
    }

    /// Text length of the snapshot.
    fn len(&self) -> usize {
        self.lines.last().map_or(0, |l| l.end)
    }

    /// Content of a logical line.
    fn line_text(&self, line: usize) -> &str {
        let line = self.lines[line];
        &self.text[line.byte_start..line.byte_end]
    }

    /// Index of the logical line holding `offset`.
    fn line_of(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1)
    }

    /// Index of the display row holding `offset`.
    fn row_of(&self, offset: usize) -> usize {
        self.rows
            .partition_point(|r| r.start <= offset)
            .saturating_sub(1)
    }

    /// Absolute word spans of a logical line.
    fn line_words(&self, line: usize) -> impl Iterator<Item = TextRange> {
        let start = self.lines[line].start;
        word_spans(self.line_text(line))
            .into_iter()
            .map(move |w| w.shift(start as isize))
    }

    /// Rebuild lines and rows from a text snapshot.
    fn rebuild(&mut self, text: String) {
        self.lines = split_lines(&text, 0, 0);
        self.text = text;
        self.rows = (0..self.lines.len())
            .flat_map(|idx| self.line_rows(idx))
            .collect();
    }

    /// Display rows of one logical line.
    fn line_rows(&self, idx: usize) -> Vec<Row> {
        let line = self.lines[idx];
        let wrap_width = match self.wrap_mode {
            WrapMode::None => None,
            WrapMode::Soft => Some(self.wrap_width),
        };
        layout_line(self.line_text(idx), wrap_width, self.tab_stop)
            .into_iter()
            .map(|seg| Row {
                line: idx,
                start: line.start + seg.start_char,
                end: line.start + seg.end_char,
                start_col: seg.start_col,
                end_col: seg.end_col,
            })
            .collect()
    }

    /// Re-segment the logical lines an edit touched and shift everything
    /// after them. The snapshot must hold the text as it was before the edit.
    fn patch(&mut self, buffer: &dyn TextBuffer, original: TextRange, modified: TextRange) {
        let first = self.line_of(original.start);
        let last = self.line_of(original.end);
        let span = TextRange::new(self.lines[first].start, self.lines[last].end);
        let delta = modified.len() as isize - original.len() as isize;
        let fresh = buffer.substring(TextRange::new(
            span.start,
            span.end.saturating_add_signed(delta),
        ));

        let bytes = self.lines[first].byte_start..self.lines[last].byte_end;
        let byte_delta = fresh.len() as isize - bytes.len() as isize;
        let lines = split_lines(&fresh, span.start, bytes.start);
        self.text.replace_range(bytes, &fresh);
        let added = lines.len();
        let line_delta = added as isize - (last - first + 1) as isize;
        self.lines.splice(first..=last, lines);
        for l in &mut self.lines[first + added..] {
            l.start = l.start.saturating_add_signed(delta);
            l.end = l.end.saturating_add_signed(delta);
            l.byte_start = l.byte_start.saturating_add_signed(byte_delta);
            l.byte_end = l.byte_end.saturating_add_signed(byte_delta);
        }

        let row_first = self.rows.partition_point(|r| r.line < first);
        let row_last = self.rows.partition_point(|r| r.line <= last);
        let rows: Vec<Row> = (first..first + added)
            .flat_map(|idx| self.line_rows(idx))
            .collect();
        let added_rows = rows.len();
        self.rows.splice(row_first..row_last, rows);
        for r in &mut self.rows[row_first + added_rows..] {
            r.line = r.line.saturating_add_signed(line_delta);
            r.start = r.start.saturating_add_signed(delta);
            r.end = r.end.saturating_add_signed(delta);
        }
    }
}

/// Split text into logical lines, offsetting chars and bytes by a base.
fn split_lines(text: &str, char_base: usize, byte_base: usize) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut chars = char_base;
    let mut bytes = byte_base;
    for part in text.split('\n') {
        let len = part.chars().count();
        lines.push(Line {
            start: chars,
            end: chars + len,
            byte_start: bytes,
            byte_end: bytes + part.len(),
        });
        chars += len + 1;
        bytes += part.len() + 1;
    }
    lines
}

impl LayoutProvider for GridLayout {
    fn sync(&mut self, buffer: &dyn TextBuffer) {
        let key = (buffer.revision(), buffer.len());
        if self.synced == Some(key) {
            return;
        }
        self.rebuild(buffer.text());
        self.synced = Some(key);
        trace!(rows = self.rows.len(), revision = key.0, "grid layout rebuilt");
    }

    fn edited(&mut self, buffer: &dyn TextBuffer, original: TextRange, modified: TextRange) {
        let key = (buffer.revision(), buffer.len());
        let expected = (self.len() + modified.len()).checked_sub(original.len());
        let current = self
            .synced
            .is_some_and(|(revision, _)| revision.checked_add(1) == Some(key.0));
        if !current || original.end > self.len() || expected != Some(key.1) {
            self.sync(buffer);
            return;
        }
        self.patch(buffer, original, modified);
        self.synced = Some(key);
        trace!(rows = self.rows.len(), revision = key.0, "grid layout patched");
    }

    fn rect_for(&self, range: TextRange) -> Option<Rect> {
        if range.end > self.len() {
            return None;
        }
        let a = self.point_for(range.start);
        let b = self.point_for(range.end);
        if a.y == b.y {
            return Some(Rect::new(a.x, a.y, b.x - a.x, 1));
        }
        let right = self.rows[a.y as usize..b.y as usize]
            .iter()
            .map(Row::width)
            .fold(b.x, u32::max);
        Some(Rect::new(0, a.y, right, b.y - a.y + 1))
    }

    fn range_for(&self, rect: Rect) -> Option<TextRange> {
        let last_row = self.rows.len().checked_sub(1)? as u32;
        if rect.tl.y > last_row {
            return None;
        }
        let bottom = rect.bottom().saturating_sub(1).clamp(rect.tl.y, last_row);
        let start = self.offset_at(rect.tl)?;
        let end = self.offset_at(Point {
            x: rect.right(),
            y: bottom,
        })?;
        Some(TextRange::new(start, end))
    }

    fn offset_at(&self, point: Point) -> Option<usize> {
        let row = self.rows.get(point.y as usize)?;
        let line = self.lines[row.line];
        let col = row.start_col + point.x.min(row.width()) as usize;
        let idx = char_for_column(self.line_text(row.line), col, self.tab_stop);
        Some((line.start + idx).clamp(row.start, row.end))
    }

    fn grapheme_boundary(&self, offset: usize, towards: Towards) -> usize {
        let offset = offset.min(self.len());
        let idx = self.line_of(offset);
        let line = self.lines[idx];
        let text = self.line_text(idx);
        match towards {
            Towards::Start if offset == line.start => offset.saturating_sub(1),
            Towards::Start => line.start + prev_grapheme_boundary(text, offset - line.start),
            Towards::End if offset == line.end => (offset + 1).min(self.len()),
            Towards::End => line.start + next_grapheme_boundary(text, offset - line.start),
        }
    }

    fn word_boundary(&self, offset: usize, towards: Towards) -> usize {
        let home = self.line_of(offset);
        match towards {
            Towards::Start => (0..=home)
                .rev()
                .find_map(|line| self.line_words(line).filter(|w| w.start < offset).last())
                .map_or(offset, |w| w.start),
            Towards::End => (home..self.lines.len())
                .find_map(|line| self.line_words(line).find(|w| w.end > offset))
                .map_or(offset, |w| w.end),
        }
    }

    fn paragraph_boundary(&self, offset: usize, towards: Towards) -> usize {
        match towards {
            Towards::Start => {
                let idx = self.lines.partition_point(|l| l.start < offset);
                idx.checked_sub(1).map_or(offset, |i| self.lines[i].start)
            }
            Towards::End => {
                let idx = self.lines.partition_point(|l| l.end <= offset);
                self.lines.get(idx).map_or(offset, |l| l.end)
            }
        }
    }

    fn line_boundary(&self, offset: usize, towards: Towards) -> usize {
        let row = self.rows[self.row_of(offset)];
        match towards {
            Towards::Start => row.start,
            Towards::End => row.end,
        }
    }

    fn offset_on_adjacent_line(&self, offset: usize, direction: Direction) -> Option<usize> {
        let p = self.point_for(offset);
        let y = match direction {
            Direction::Up => p.y.checked_sub(1)?,
            Direction::Down => p.y + 1,
            Direction::Left | Direction::Right => return None,
        };
        self.offset_at(Point { x: p.x, y })
    }

    fn page_height(&self) -> u32 {
        self.page_height
    }

    fn word_ranges(&self, range: TextRange) -> Vec<TextRange> {
        (self.line_of(range.start)..=self.line_of(range.end))
            .flat_map(|line| self.line_words(line))
            .filter(|w| w.start <= range.end && w.end >= range.start)
            .collect()
    }

    fn paragraph_ranges(&self, range: TextRange) -> Vec<TextRange> {
        let last = if range.is_empty() {
            range.start
        } else {
            range.end - 1
        };
        (self.line_of(range.start)..=self.line_of(last))
            .map(|idx| self.lines[idx].range())
            .collect()
    }

    fn line_fragments(&self, range: TextRange) -> Vec<Rect> {
        let last = if range.is_empty() {
            range.start
        } else {
            range.end - 1
        };
        (self.row_of(range.start)..=self.row_of(last))
            .map(|y| Rect::new(0, y as u32, self.rows[y].width(), 1))
            .collect()
    }
}

/// A wrapped segment of a logical line, relative to the line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Segment {
    /// Starting char index of this segment.
    start_char: usize,
    /// Ending char index of this segment.
    end_char: usize,
    /// Display column where this segment starts.
    start_col: usize,
    /// Display column where this segment ends.
    end_col: usize,
}

/// Split a logical line into display segments.
fn layout_line(text: &str, wrap_width: Option<usize>, tab_stop: usize) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut col = 0usize;
    let mut char_index = 0usize;
    let mut seg_start_char = 0usize;
    let mut seg_start_col = 0usize;

    for grapheme in text.graphemes(true) {
        let width = cell_width(grapheme, col, tab_stop);
        if let Some(wrap_width) = wrap_width {
            let seg_width = col - seg_start_col;
            if seg_width > 0 && seg_width + width > wrap_width {
                segments.push(Segment {
                    start_char: seg_start_char,
                    end_char: char_index,
                    start_col: seg_start_col,
                    end_col: col,
                });
                seg_start_char = char_index;
                seg_start_col = col;
            }
        }
        col += width;
        char_index += grapheme.chars().count();
    }

    segments.push(Segment {
        start_char: seg_start_char,
        end_char: char_index,
        start_col: seg_start_col,
        end_col: col,
    });
    segments
}
