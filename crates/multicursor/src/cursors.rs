//! The range set: normalisation, coalescing, and position resynchronisation
//! after a buffer edit.

use std::slice;

use tracing::trace;

use crate::TextRange;

/// The engine's selection state. The variant is derived from the number of
/// ranges, so a set is `Multi` exactly when it holds two or more ranges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CursorSet {
    /// The ambient single selection.
    Single(TextRange),
    /// Two or more sorted, pairwise disjoint ranges.
    Multi(Vec<TextRange>),
}

impl Default for CursorSet {
    fn default() -> Self {
        Self::Single(TextRange::caret(0))
    }
}

impl CursorSet {
    /// Build a set from arbitrary ranges, normalising and coalescing them.
    /// Returns `None` when no ranges remain.
    pub fn from_ranges(ranges: impl IntoIterator<Item = TextRange>) -> Option<Self> {
        let mut ranges = coalesce(normalize(ranges));
        match ranges.len() {
            0 => None,
            1 => ranges.pop().map(Self::Single),
            _ => Some(Self::Multi(ranges)),
        }
    }

    /// All ranges, ascending.
    pub fn ranges(&self) -> &[TextRange] {
        match self {
            Self::Single(range) => slice::from_ref(range),
            Self::Multi(ranges) => ranges,
        }
    }

    /// Is multi-cursor mode active?
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::Multi(_))
    }

    /// Number of ranges.
    pub fn len(&self) -> usize {
        self.ranges().len()
    }

    /// A set always holds at least one range.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The highest range. This is the one that survives a cancel.
    pub fn last(&self) -> TextRange {
        match self {
            Self::Single(range) => *range,
            Self::Multi(ranges) => ranges.last().copied().unwrap_or_default(),
        }
    }

    /// The lowest range.
    pub fn first(&self) -> TextRange {
        match self {
            Self::Single(range) => *range,
            Self::Multi(ranges) => ranges.first().copied().unwrap_or_default(),
        }
    }

    /// True if every range fits within a buffer of `len` chars.
    pub fn fits(&self, len: usize) -> bool {
        self.ranges().iter().all(|r| r.end <= len)
    }
}

/// Sort ranges by start and drop duplicates.
pub fn normalize(ranges: impl IntoIterator<Item = TextRange>) -> Vec<TextRange> {
    let mut ranges: Vec<TextRange> = ranges.into_iter().collect();
    ranges.sort();
    ranges.dedup();
    ranges
}

/// Merge ranges that overlap or share an endpoint into their union. The
/// result is sorted and idempotent under repeated application.
pub fn coalesce(ranges: impl IntoIterator<Item = TextRange>) -> Vec<TextRange> {
    let mut out: Vec<TextRange> = Vec::new();
    for range in normalize(ranges) {
        match out.last_mut() {
            Some(last) if last.meets(range) => *last = last.union(range),
            _ => out.push(range),
        }
    }
    out
}

/// Adjust `range` after the buffer replaced `original` with text now
/// occupying `modified`. Both edit ranges share a start. A range that sat
/// entirely inside the edited span and ends up empty is dropped.
pub fn resync(range: TextRange, original: TextRange, modified: TextRange) -> Option<TextRange> {
    debug_assert_eq!(original.start, modified.start);
    let delta = modified.len() as isize - original.len() as isize;
    if range.start <= original.start {
        if range.end <= original.start {
            Some(range)
        } else if range.end <= original.end {
            Some(TextRange::new(range.start, range.end.min(modified.end)))
        } else {
            Some(TextRange::new(
                range.start,
                range.end.saturating_add_signed(delta),
            ))
        }
    } else if range.start < original.end {
        let start = range.start.min(modified.end);
        if range.end <= original.end {
            let end = range.end.min(modified.end);
            (start < end).then(|| TextRange::new(start, end))
        } else {
            Some(TextRange::new(start, range.end.saturating_add_signed(delta)))
        }
    } else {
        Some(range.shift(delta))
    }
}

/// Resynchronise every range in a set after an edit, dropping ranges that
/// the edit consumed.
pub fn resync_all(ranges: &[TextRange], original: TextRange, modified: TextRange) -> Vec<TextRange> {
    ranges
        .iter()
        .filter_map(|&r| {
            let out = resync(r, original, modified);
            if out.is_none() {
                trace!(range = %r, edit = %original, "range consumed by edit");
            }
            out
        })
        .collect()
}

/// Map an offset across an insertion of `len` chars at `at`. Offsets at the
/// insertion point move with the inserted text.
pub fn map_insert(offset: usize, at: usize, len: usize) -> usize {
    if offset >= at { offset + len } else { offset }
}

/// Map an offset across the removal of `removed`. Offsets inside the removed
/// span collapse onto its start.
pub fn map_delete(offset: usize, removed: TextRange) -> usize {
    if offset <= removed.start {
        offset
    } else if offset >= removed.end {
        offset - removed.len()
    } else {
        removed.start
    }
}
