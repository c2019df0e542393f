//! Cell-grid geometry used by layout providers and pointer gestures.

/// One-dimensional spans.
mod linesegment;
/// Point helpers.
mod point;
/// Rectangle operations.
mod rect;

pub use linesegment::LineSegment;
pub use point::Point;
pub use rect::Rect;

/// Cardinal directions.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum Direction {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
}

impl Direction {
    /// True for `Up` and `Down`.
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// True for directions that travel towards the start of a document.
    pub fn is_backward(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }
}
