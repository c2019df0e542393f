//! Pointer and keyboard gestures that create and shape multiple ranges.

use std::{
    ops::Add,
    time::{Duration, Instant},
};

use geom::{Point, Rect};

use crate::{Granularity, LayoutProvider, TextRange};

/// Modifier key state.
#[derive(Default, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Mods {
    /// Shift is active.
    pub shift: bool,
    /// Control is active.
    pub ctrl: bool,
    /// Alt is active.
    pub alt: bool,
}

impl Mods {
    /// Exactly alt: a rectangular drag.
    pub fn is_rectangular(self) -> bool {
        self == Alt
    }

    /// Control and shift together: additive cursor placement.
    pub fn is_additive(self) -> bool {
        self.ctrl && self.shift
    }
}

impl Add<Self> for Mods {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        Self {
            shift: self.shift || other.shift,
            ctrl: self.ctrl || other.ctrl,
            alt: self.alt || other.alt,
        }
    }
}

/// No modifiers pressed.
#[allow(non_upper_case_globals)]
pub const Empty: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: false,
};

/// Shift-only modifier state.
#[allow(non_upper_case_globals)]
pub const Shift: Mods = Mods {
    shift: true,
    ctrl: false,
    alt: false,
};

/// Control-only modifier state.
#[allow(non_upper_case_globals)]
pub const Ctrl: Mods = Mods {
    shift: false,
    ctrl: true,
    alt: false,
};

/// Alt-only modifier state.
#[allow(non_upper_case_globals)]
pub const Alt: Mods = Mods {
    shift: false,
    ctrl: false,
    alt: true,
};

/// An in-progress pointer drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragState {
    /// Column selection between two points.
    Rectangle {
        /// Where the drag began.
        anchor: Point,
        /// The latest pointer position.
        current: Point,
    },
    /// Growing one range from the range created by the press.
    Extend {
        /// The range created by the press.
        anchor: TextRange,
        /// Cursors that existed before the press and survive the drag.
        base: Vec<TextRange>,
        /// Snapping unit, from the click count.
        granularity: Granularity,
    },
}

/// The last press, for click counting.
#[derive(Debug, Clone, Copy)]
struct ClickState {
    /// Location of the last press.
    location: Point,
    /// Time of the last press.
    last_click: Instant,
    /// Click count so far, capped at three.
    count: u8,
}

/// Counts rapid repeated presses at the same location.
#[derive(Debug, Clone)]
pub struct ClickTracker {
    /// Maximum gap between presses of one sequence.
    threshold: Duration,
    /// Previous press.
    last_click: Option<ClickState>,
}

impl ClickTracker {
    /// A tracker with the given double-click window.
    pub fn new(threshold: Duration) -> Self {
        Self {
            threshold,
            last_click: None,
        }
    }

    /// Register a press and return its click count: 1, 2 or 3.
    pub fn click(&mut self, location: Point, now: Instant) -> u8 {
        if let Some(state) = self.last_click.as_mut()
            && state.location == location
            && now.saturating_duration_since(state.last_click) <= self.threshold
        {
            state.count = state.count.saturating_add(1).min(3);
            state.last_click = now;
            return state.count;
        }
        self.last_click = Some(ClickState {
            location,
            last_click: now,
            count: 1,
        });
        1
    }
}

/// The snapping unit for a click count.
pub fn granularity_for_clicks(clicks: u8) -> Granularity {
    match clicks {
        0 | 1 => Granularity::Character,
        2 => Granularity::Word,
        _ => Granularity::Paragraph,
    }
}

/// The range a press at `offset` selects.
pub fn expand_at(layout: &dyn LayoutProvider, offset: usize, granularity: Granularity) -> TextRange {
    match granularity {
        Granularity::Word => layout.word_at(offset).unwrap_or(TextRange::caret(offset)),
        Granularity::Paragraph | Granularity::Page | Granularity::Document => {
            layout.paragraph_at(offset)
        }
        Granularity::Character | Granularity::Line => TextRange::caret(offset),
    }
}

/// Grow `anchor` to reach `offset`, snapping the moving edge outwards to the
/// drag's granularity.
pub fn extend_to(
    layout: &dyn LayoutProvider,
    anchor: TextRange,
    offset: usize,
    granularity: Granularity,
) -> TextRange {
    let snapped = expand_at(layout, offset, granularity);
    if offset >= anchor.start {
        TextRange::new(anchor.start, anchor.end.max(snapped.end))
    } else {
        TextRange::new(snapped.start, anchor.end)
    }
}

/// One range per display row crossed by the rectangle between two points,
/// covering the same columns on each row.
pub fn rectangle_ranges(layout: &dyn LayoutProvider, anchor: Point, current: Point) -> Vec<TextRange> {
    let rect = Rect::from_points(anchor, current);
    let cover = Rect { h: rect.h + 1, ..rect }.at_least(1, 1);
    let Some(covered) = layout.range_for(cover) else {
        return Vec::new();
    };
    layout
        .line_fragments(covered)
        .into_iter()
        .filter_map(|frag| cover.row(frag.tl.y))
        .filter_map(|row| layout.range_for(Rect { w: rect.w, ..row }))
        .collect()
}

/// The offset under a dragging pointer. Points below the text map to the
/// end of the buffer.
pub fn drag_offset(layout: &dyn LayoutProvider, point: Point, len: usize) -> usize {
    layout.offset_at(point).unwrap_or(len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GridLayout, RopeBuffer};

    fn layout(text: &str) -> GridLayout {
        let mut layout = GridLayout::new();
        layout.sync(&RopeBuffer::new(text));
        layout
    }

    fn p(x: u32, y: u32) -> Point {
        Point { x, y }
    }

    #[test]
    fn click_counting() {
        let mut t = ClickTracker::new(Duration::from_millis(500));
        let now = Instant::now();
        assert_eq!(t.click(p(1, 1), now), 1);
        assert_eq!(t.click(p(1, 1), now + Duration::from_millis(100)), 2);
        assert_eq!(t.click(p(1, 1), now + Duration::from_millis(200)), 3);
        assert_eq!(t.click(p(1, 1), now + Duration::from_millis(300)), 3);
        assert_eq!(t.click(p(2, 1), now + Duration::from_millis(400)), 1);
        assert_eq!(t.click(p(2, 1), now + Duration::from_secs(2)), 1);
    }

    #[test]
    fn mods() {
        assert!(Alt.is_rectangular());
        assert!(!(Alt + Shift).is_rectangular());
        assert!((Ctrl + Shift).is_additive());
        assert!(!Empty.is_additive());
    }

    #[test]
    fn rectangle_spans_rows() {
        let l = layout("abcdef\nab\nabcdef\n");
        let ranges = rectangle_ranges(&l, p(1, 0), p(4, 2));
        assert_eq!(
            ranges,
            vec![TextRange::new(1, 4), TextRange::new(8, 9), TextRange::new(11, 14)]
        );
    }

    #[test]
    fn zero_width_rectangle_makes_carets() {
        let l = layout("abc\nabc\nabc");
        let ranges = rectangle_ranges(&l, p(2, 0), p(2, 2));
        assert_eq!(
            ranges,
            vec![TextRange::caret(2), TextRange::caret(6), TextRange::caret(10)]
        );
    }

    #[test]
    fn rectangle_below_text_is_empty() {
        let l = layout("abc");
        assert!(rectangle_ranges(&l, p(0, 5), p(2, 7)).is_empty());
    }

    #[test]
    fn extend_snaps_outwards() {
        let l = layout("one two three");
        let anchor = expand_at(&l, 5, Granularity::Word);
        assert_eq!(anchor, TextRange::new(4, 7));
        assert_eq!(
            extend_to(&l, anchor, 10, Granularity::Word),
            TextRange::new(4, 13)
        );
        assert_eq!(
            extend_to(&l, anchor, 1, Granularity::Word),
            TextRange::new(0, 7)
        );
        assert_eq!(
            extend_to(&l, TextRange::caret(4), 2, Granularity::Character),
            TextRange::new(2, 4)
        );
        assert_eq!(
            expand_at(&l, 5, Granularity::Paragraph),
            TextRange::new(0, 13)
        );
    }

    #[test]
    fn drag_outside_rows() {
        let l = layout("ab\ncd");
        assert_eq!(drag_offset(&l, p(9, 9), 5), 5);
        assert_eq!(drag_offset(&l, p(1, 1), 5), 4);
    }
}
