/// A directionless one-dimensional span along a single axis.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default)]
pub struct LineSegment {
    /// The offset of this span.
    pub off: u32,
    /// The length of this span.
    pub len: u32,
}

impl LineSegment {
    /// Construct a span.
    pub fn new(off: u32, len: u32) -> Self {
        Self { off, len }
    }

    /// Construct a span covering `a..b` regardless of argument order.
    pub fn between(a: u32, b: u32) -> Self {
        Self {
            off: a.min(b),
            len: a.abs_diff(b),
        }
    }

    /// The far limit of the span.
    pub fn far(&self) -> u32 {
        self.off.saturating_add(self.len)
    }

    /// Does `v` fall inside the half-open span?
    pub fn contains_value(&self, v: u32) -> bool {
        v >= self.off && v < self.far()
    }
}
