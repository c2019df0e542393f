use crate::{LineSegment, Point};

/// An axis-aligned rectangle measured in grid cells.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct Rect {
    /// Top-left corner.
    pub tl: Point,
    /// Width in cells.
    pub w: u32,
    /// Height in cells.
    pub h: u32,
}

impl Rect {
    /// Construct a rectangle from its origin and size.
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self {
            tl: Point { x, y },
            w,
            h,
        }
    }

    /// The rectangle spanned by two corner points, in either order. The far
    /// corner is exclusive, so identical points produce an empty rectangle.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self::from_segments(LineSegment::between(a.x, b.x), LineSegment::between(a.y, b.y))
    }

    /// Build a rectangle from horizontal and vertical spans.
    pub fn from_segments(x: LineSegment, y: LineSegment) -> Self {
        Self::new(x.off, y.off, x.len, y.len)
    }

    /// The horizontal span.
    pub fn hextent(&self) -> LineSegment {
        LineSegment::new(self.tl.x, self.w)
    }

    /// The vertical span.
    pub fn vextent(&self) -> LineSegment {
        LineSegment::new(self.tl.y, self.h)
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u32 {
        self.hextent().far()
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u32 {
        self.vextent().far()
    }

    /// True if the rectangle covers no cells.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Grow the rectangle so that it is at least `w` by `h`, keeping its origin.
    pub fn at_least(&self, w: u32, h: u32) -> Self {
        Self {
            tl: self.tl,
            w: self.w.max(w),
            h: self.h.max(h),
        }
    }

    /// Does the rectangle contain the point?
    pub fn contains_point(&self, p: Point) -> bool {
        self.hextent().contains_value(p.x) && self.vextent().contains_value(p.y)
    }

    /// A single-row slice of this rectangle at row `y`, if `y` falls inside it.
    pub fn row(&self, y: u32) -> Option<Self> {
        self.vextent()
            .contains_value(y)
            .then(|| Self::new(self.tl.x, y, self.w, 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_normalizes() {
        let r = Rect::from_points(Point { x: 6, y: 4 }, Point { x: 2, y: 1 });
        assert_eq!(r, Rect::new(2, 1, 4, 3));
        assert_eq!(r.right(), 6);
        assert_eq!(r.bottom(), 4);
        assert!(Rect::from_points(Point { x: 1, y: 1 }, Point { x: 1, y: 1 }).is_empty());
    }

    #[test]
    fn rows_and_containment() {
        let r = Rect::new(3, 1, 2, 3).at_least(1, 1);
        assert_eq!(r.row(2), Some(Rect::new(3, 2, 2, 1)));
        assert_eq!(r.row(4), None);
        assert!(r.contains_point(Point { x: 4, y: 3 }));
        assert!(!r.contains_point(Point { x: 5, y: 3 }));
        assert_eq!(Rect::new(1, 1, 0, 1).at_least(1, 1), Rect::new(1, 1, 1, 1));
    }
}
