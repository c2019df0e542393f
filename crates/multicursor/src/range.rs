use std::{cmp::Ordering, fmt, ops::Range};

use serde::{Deserialize, Serialize};

/// A half-open span of char offsets. An empty range is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TextRange {
    /// Range start offset (inclusive).
    pub start: usize,
    /// Range end offset (exclusive).
    pub end: usize,
}

impl TextRange {
    /// Construct a range covering `a..b`, in either order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Construct a range from a start offset and a length.
    pub fn with_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start.saturating_add(len),
        }
    }

    /// A caret at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Number of chars covered.
    pub fn len(self) -> usize {
        self.end - self.start
    }

    /// Return true if the range is a caret.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// Does the half-open range contain `offset`?
    pub fn contains(self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }

    /// Does `offset` fall within the range, counting both ends?
    pub fn touches(self, offset: usize) -> bool {
        offset >= self.start && offset <= self.end
    }

    /// Intersection counting shared endpoints, so abutting ranges and a
    /// caret on either edge of a selection intersect.
    pub fn meets(self, other: Self) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    /// The overlapping part of two ranges. Ranges that merely abut have no
    /// overlap.
    pub fn overlap(self, other: Self) -> Option<Self> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(Self { start, end })
    }

    /// The smallest range covering both.
    pub fn union(self, other: Self) -> Self {
        Self {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Move both ends by `delta`, saturating at zero.
    pub fn shift(self, delta: isize) -> Self {
        Self {
            start: self.start.saturating_add_signed(delta),
            end: self.end.saturating_add_signed(delta),
        }
    }

    /// Clamp both ends to `0..=len`.
    pub fn clamp(self, len: usize) -> Self {
        Self {
            start: self.start.min(len),
            end: self.end.min(len),
        }
    }

    /// Apply an offset mapping to both ends.
    pub fn map(self, f: impl Fn(usize) -> usize) -> Self {
        Self::new(f(self.start), f(self.end))
    }
}

impl Ord for TextRange {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.start.cmp(&other.start) {
            Ordering::Equal => self.end.cmp(&other.end),
            ordering => ordering,
        }
    }
}

impl PartialOrd for TextRange {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Range<usize>> for TextRange {
    fn from(r: Range<usize>) -> Self {
        Self::new(r.start, r.end)
    }
}

impl fmt::Display for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..{}", self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn construction_orders_endpoints() {
        assert_eq!(TextRange::new(5, 2), TextRange { start: 2, end: 5 });
        assert_eq!(TextRange::with_len(3, 4), TextRange::new(3, 7));
        assert!(TextRange::caret(9).is_empty());
        assert_eq!(TextRange::from(1..4).len(), 3);
    }

    #[test]
    fn meets_counts_shared_edges() {
        let a = TextRange::new(0, 3);
        assert!(a.meets(TextRange::new(3, 5)));
        assert!(a.meets(TextRange::caret(0)));
        assert!(a.meets(TextRange::caret(2)));
        assert!(!a.meets(TextRange::caret(4)));
        assert!(!TextRange::caret(3).meets(TextRange::caret(4)));
        assert_eq!(a.overlap(TextRange::new(3, 5)), None);
        assert_eq!(a.overlap(TextRange::new(1, 5)), Some(TextRange::new(1, 3)));
    }

    #[test]
    fn shift_saturates() {
        assert_eq!(TextRange::new(2, 4).shift(-3), TextRange::new(0, 1));
        assert_eq!(TextRange::new(2, 4).shift(3), TextRange::new(5, 7));
    }

    #[test]
    fn ordering_is_by_start_then_end() {
        let mut v = vec![TextRange::new(4, 6), TextRange::caret(4), TextRange::new(1, 9)];
        v.sort();
        assert_eq!(
            v,
            vec![TextRange::new(1, 9), TextRange::caret(4), TextRange::new(4, 6)]
        );
    }
}
