//! Text mutations applied across every range of a set.
//!
//! Each function takes the ranges in ascending order and returns the new
//! ranges in the same order. Edits run front to back while a running delta
//! moves the not-yet-visited ranges into post-edit coordinates, so every
//! replacement sees the live buffer. A vetoed sub-edit leaves its range in
//! place and the batch continues.

use crate::{
    CaseTransform, Granularity, Host, LayoutProvider, TextBuffer, TextRange, Towards,
    cursors::{coalesce, map_delete, map_insert},
};

/// Replace every range with `text`, leaving a caret after each insertion.
pub fn insert(host: &mut Host<'_>, ranges: &[TextRange], text: &str) -> Vec<TextRange> {
    let mut out = Vec::with_capacity(ranges.len());
    let mut delta = 0isize;
    for &r in ranges {
        let target = r.shift(delta);
        match host.replace(target, text) {
            Some(new) => {
                delta += new.len() as isize - target.len() as isize;
                out.push(TextRange::caret(new.end));
            }
            None => out.push(target),
        }
    }
    out
}

/// Delete every selection, and from every caret towards the boundary at
/// `granularity`.
pub fn delete(
    host: &mut Host<'_>,
    ranges: &[TextRange],
    towards: Towards,
    granularity: Granularity,
) -> Vec<TextRange> {
    delete_spans(host, ranges, |layout, len, offset| {
        let target = match granularity {
            Granularity::Character => layout.grapheme_boundary(offset, towards),
            Granularity::Word => layout.word_boundary(offset, towards),
            // No page-sized deletion; treated as line.
            Granularity::Line | Granularity::Page => {
                edge_or_grapheme(layout, offset, towards, layout.line_boundary(offset, towards))
            }
            Granularity::Paragraph => {
                let p = layout.paragraph_at(offset);
                let edge = match towards {
                    Towards::Start => p.start,
                    Towards::End => p.end,
                };
                edge_or_grapheme(layout, offset, towards, edge)
            }
            Granularity::Document => match towards {
                Towards::Start => 0,
                Towards::End => len,
            },
        };
        TextRange::new(offset, target)
    })
}

/// Delete non-empty ranges only.
pub fn delete_selection(host: &mut Host<'_>, ranges: &[TextRange]) -> Vec<TextRange> {
    delete_spans(host, ranges, |_, _, offset| TextRange::caret(offset))
}

/// Backspace that removes only the last scalar value before each caret.
pub fn delete_decomposing(host: &mut Host<'_>, ranges: &[TextRange]) -> Vec<TextRange> {
    delete_spans(host, ranges, |_, _, offset| {
        TextRange::new(offset.saturating_sub(1), offset)
    })
}

/// An edge that coincides with the caret joins across the line break instead.
fn edge_or_grapheme(layout: &dyn LayoutProvider, offset: usize, towards: Towards, edge: usize) -> usize {
    if edge == offset {
        layout.grapheme_boundary(offset, towards)
    } else {
        edge
    }
}

/// The shared deletion loop. `span` computes the region a caret deletes;
/// it is clipped so that it never reaches into a neighbouring range.
fn delete_spans(
    host: &mut Host<'_>,
    ranges: &[TextRange],
    span: impl Fn(&dyn LayoutProvider, usize, usize) -> TextRange,
) -> Vec<TextRange> {
    let mut out: Vec<TextRange> = Vec::with_capacity(ranges.len());
    let mut removed = 0usize;
    for (i, &r) in ranges.iter().enumerate() {
        let at = r.shift(-(removed as isize));
        let target = if at.is_empty() {
            let lo = out.last().map_or(0, |prev| prev.end);
            let hi = ranges.get(i + 1).map_or(host.len(), |next| next.start - removed);
            let s = span(&*host.layout, host.len(), at.start);
            TextRange::new(s.start.max(lo), s.end.min(hi))
        } else {
            at
        };
        if target.is_empty() {
            out.push(at);
            continue;
        }
        match host.replace(target, "") {
            Some(_) => {
                removed += target.len();
                out.push(TextRange::caret(target.start));
            }
            None => out.push(at),
        }
    }
    out
}

/// The region a case transform rewrites: carets grow to the word under or
/// after them, selections widen to whole words.
fn words_around(layout: &dyn LayoutProvider, range: TextRange) -> TextRange {
    if range.is_empty() {
        let o = range.start;
        return layout
            .word_at(o)
            .unwrap_or_else(|| TextRange::new(o, layout.word_boundary(o, Towards::End)));
    }
    let words = layout.word_ranges(range);
    let inside = |o: usize| words.iter().find(|w| w.start < o && o < w.end);
    let start = inside(range.start).map_or(range.start, |w| w.start);
    let end = inside(range.end).map_or(range.end, |w| w.end);
    TextRange::new(start, end)
}

/// Change the case of every word under the ranges.
pub fn transform(host: &mut Host<'_>, ranges: &[TextRange], case: CaseTransform) -> Vec<TextRange> {
    let targets = coalesce(ranges.iter().map(|&r| words_around(&*host.layout, r)));
    let mut out = Vec::with_capacity(targets.len());
    let mut delta = 0isize;
    for t in targets {
        let carets_only = ranges
            .iter()
            .filter(|r| r.start >= t.start && r.end <= t.end)
            .all(|r| r.is_empty());
        let t = t.shift(delta);
        let words: Vec<TextRange> = host
            .layout
            .word_ranges(t)
            .into_iter()
            .filter(|w| w.start >= t.start && w.end <= t.end)
            .collect();
        let mut grow = 0isize;
        for w in words.into_iter().rev() {
            let old = host.substring(w);
            let new = case.apply(&old);
            if new == old {
                continue;
            }
            if let Some(r) = host.replace(w, &new) {
                grow += r.len() as isize - w.len() as isize;
            }
        }
        let t = TextRange::new(t.start, t.end.saturating_add_signed(grow));
        delta += grow;
        out.push(if carets_only { TextRange::caret(t.end) } else { t });
    }
    out
}

/// Swap the graphemes either side of every caret.
pub fn transpose(host: &mut Host<'_>, ranges: &[TextRange]) -> Vec<TextRange> {
    let mut out = Vec::with_capacity(ranges.len());
    let mut delta = 0isize;
    for &r in ranges {
        let r = r.shift(delta);
        let Some((span, mid, caret)) = transpose_span(host, r) else {
            out.push(r);
            continue;
        };
        let swapped = host.substring(TextRange::new(mid, span.end))
            + &host.substring(TextRange::new(span.start, mid));
        match host.replace(span, &swapped) {
            Some(new) => {
                delta += new.len() as isize - span.len() as isize;
                out.push(TextRange::caret(caret.min(new.end)));
            }
            None => out.push(r),
        }
    }
    out
}

/// The region to swap around a caret, the split point, and where the caret
/// lands. At the end of a line the two graphemes before the caret swap.
fn transpose_span(host: &Host<'_>, r: TextRange) -> Option<(TextRange, usize, usize)> {
    if !r.is_empty() || r.start == 0 {
        return None;
    }
    let o = r.start;
    let layout = &*host.layout;
    let at_end = host.buffer.char_at(o).is_none_or(|c| c == '\n');
    let (a, mid, b) = if at_end {
        let mid = layout.grapheme_boundary(o, Towards::Start);
        (layout.grapheme_boundary(mid, Towards::Start), mid, o)
    } else {
        (
            layout.grapheme_boundary(o, Towards::Start),
            o,
            layout.grapheme_boundary(o, Towards::End),
        )
    };
    (a < mid && mid < b).then(|| (TextRange::new(a, b), mid, b))
}

/// Starts of every paragraph touched by the ranges, ascending.
fn paragraph_starts(layout: &dyn LayoutProvider, ranges: &[TextRange]) -> Vec<usize> {
    let mut starts: Vec<usize> = ranges
        .iter()
        .flat_map(|&r| layout.paragraph_ranges(r))
        .map(|p| p.start)
        .collect();
    starts.sort_unstable();
    starts.dedup();
    starts
}

/// Insert `unit` at the start of every touched paragraph.
pub fn indent(host: &mut Host<'_>, ranges: &[TextRange], unit: &str) -> Vec<TextRange> {
    let mut cursors = ranges.to_vec();
    if unit.is_empty() {
        return cursors;
    }
    for at in paragraph_starts(&*host.layout, ranges).into_iter().rev() {
        if let Some(new) = host.replace(TextRange::caret(at), unit) {
            let n = new.len();
            for c in &mut cursors {
                *c = c.map(|o| map_insert(o, at, n));
            }
        }
    }
    cursors
}

/// Remove one level of leading indentation from every touched paragraph.
pub fn outdent(host: &mut Host<'_>, ranges: &[TextRange], tab_stop: usize) -> Vec<TextRange> {
    let mut cursors = ranges.to_vec();
    for at in paragraph_starts(&*host.layout, ranges).into_iter().rev() {
        let n = leading_indent(&*host.buffer, at, tab_stop);
        if n == 0 {
            continue;
        }
        let removed = TextRange::with_len(at, n);
        if host.replace(removed, "").is_some() {
            for c in &mut cursors {
                *c = c.map(|o| map_delete(o, removed));
            }
        }
    }
    cursors
}

/// Chars of indentation at `at`: one tab, or up to `tab_stop` spaces.
fn leading_indent(buffer: &dyn TextBuffer, at: usize, tab_stop: usize) -> usize {
    if buffer.char_at(at) == Some('\t') {
        return 1;
    }
    (0..tab_stop)
        .take_while(|i| buffer.char_at(at + i) == Some(' '))
        .count()
}
