//! Translating and extending ranges through the layout.

use geom::{Direction, Point};

use crate::{Granularity, LayoutProvider, TextRange, Towards};

/// Move every range. A range that cannot move stays where it is.
pub fn translate(
    layout: &dyn LayoutProvider,
    len: usize,
    ranges: &[TextRange],
    direction: Direction,
    granularity: Granularity,
) -> Vec<TextRange> {
    if granularity == Granularity::Document {
        let offset = if direction.is_backward() { 0 } else { len };
        return vec![TextRange::caret(offset)];
    }
    ranges
        .iter()
        .map(|&r| {
            let edge = if direction.is_backward() { r.start } else { r.end };
            if granularity == Granularity::Character && !direction.is_vertical() && !r.is_empty() {
                return TextRange::caret(edge);
            }
            step(layout, len, edge, direction, granularity).map_or(r, TextRange::caret)
        })
        .collect()
}

/// Grow every range: backward directions move the start, forward directions
/// move the end. A vertical extension with no adjacent line drops the range.
pub fn extend(
    layout: &dyn LayoutProvider,
    len: usize,
    ranges: &[TextRange],
    direction: Direction,
    granularity: Granularity,
) -> Vec<TextRange> {
    if granularity == Granularity::Document {
        let (Some(first), Some(last)) = (ranges.first(), ranges.last()) else {
            return Vec::new();
        };
        let range = if direction.is_backward() {
            TextRange::new(0, last.end)
        } else {
            TextRange::new(first.start, len)
        };
        return vec![range];
    }
    ranges
        .iter()
        .filter_map(|&r| {
            if direction.is_backward() {
                step(layout, len, r.start, direction, granularity).map(|o| TextRange::new(o, r.end))
            } else {
                step(layout, len, r.end, direction, granularity).map(|o| TextRange::new(r.start, o))
            }
        })
        .collect()
}

/// Where one edge lands after a single step.
fn step(
    layout: &dyn LayoutProvider,
    len: usize,
    offset: usize,
    direction: Direction,
    granularity: Granularity,
) -> Option<usize> {
    let towards = if direction.is_backward() {
        Towards::Start
    } else {
        Towards::End
    };
    match granularity {
        Granularity::Character | Granularity::Line if direction.is_vertical() => {
            layout.offset_on_adjacent_line(offset, direction)
        }
        Granularity::Character => Some(layout.grapheme_boundary(offset, towards)),
        Granularity::Word => Some(layout.word_boundary(offset, towards)),
        Granularity::Line => Some(layout.line_boundary(offset, towards)),
        Granularity::Paragraph => Some(layout.paragraph_boundary(offset, towards)),
        Granularity::Page => Some(page(layout, len, offset, direction.is_backward())),
        Granularity::Document => Some(if direction.is_backward() { 0 } else { len }),
    }
}

/// The offset one page above or below, keeping the column.
fn page(layout: &dyn LayoutProvider, len: usize, offset: usize, up: bool) -> usize {
    let Some(rect) = layout.rect_for(TextRange::caret(offset)) else {
        return offset;
    };
    let rows = layout.page_height().max(1);
    if up {
        rect.tl
            .y
            .checked_sub(rows)
            .and_then(|y| layout.offset_at(Point { x: rect.tl.x, y }))
            .unwrap_or(0)
    } else {
        layout
            .offset_at(Point {
                x: rect.tl.x,
                y: rect.tl.y + rows,
            })
            .unwrap_or(len)
    }
}
