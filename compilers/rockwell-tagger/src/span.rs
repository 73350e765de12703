use rockwell_protocol::Tag;

/// Half-open range of slice positions, `start..end`.
///
/// The matcher works in slice positions and only converts to original token
/// indices when it emits a [`Tag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span start {start} after end {end}");
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }
}

/// Anything with a start and an end that can be compared for containment.
pub trait Spanned {
    fn bounds(&self) -> (usize, usize);

    /// Covers `other` and is larger on at least one side.
    fn strictly_contains(&self, other: &Self) -> bool {
        let (a_start, a_end) = self.bounds();
        let (b_start, b_end) = other.bounds();
        a_start <= b_start && a_end >= b_end && (a_start < b_start || a_end > b_end)
    }
}

impl Spanned for Span {
    fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}

impl Spanned for Tag {
    fn bounds(&self) -> (usize, usize) {
        (self.start, self.end)
    }
}
