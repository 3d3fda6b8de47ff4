use std::ops::Range;

// -------------------------------------------------------------------------------------------------

/// A half-open range `[start, end)` of sample frame indices.
///
/// Ranges are never inverted: constructing one with an `end` below `start` collapses it to an
/// empty range at `start`. Ranges which got built from inverted field values directly are
/// treated as empty ranges at `start` as well.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleRange {
    /// First frame index in the range.
    pub start: usize,
    /// One past the last frame index in the range.
    pub end: usize,
}

impl SampleRange {
    pub const fn new(start: usize, end: usize) -> Self {
        let end = if end < start { start } else { end };
        Self { start, end }
    }

    /// Range starting at `start` with the given frame count.
    pub const fn with_count(start: usize, count: usize) -> Self {
        Self::new(start, start.saturating_add(count))
    }

    /// Number of frames in the range.
    #[inline]
    pub const fn count(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    #[inline]
    pub const fn contains(&self, index: usize) -> bool {
        index >= self.start && index < self.end
    }

    /// The frame index in the middle of the range, rounded down.
    #[inline]
    pub const fn midpoint(&self) -> usize {
        self.start + self.count() / 2
    }

    /// Clamp both bounds into `[0, frame_count]`.
    pub fn clamped(&self, frame_count: usize) -> Self {
        Self::new(self.start.min(frame_count), self.end.min(frame_count))
    }

    /// Overlapping part of both ranges, or `None` when they don't overlap.
    pub fn intersection(&self, other: &SampleRange) -> Option<SampleRange> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        if start < end {
            Some(Self::new(start, end))
        } else {
            None
        }
    }

    /// The range with an inverted end collapsed to `start`.
    pub const fn normalized(&self) -> Self {
        Self::new(self.start, self.end)
    }

    pub fn as_range(&self) -> Range<usize> {
        let range = self.normalized();
        range.start..range.end
    }
}

impl From<Range<usize>> for SampleRange {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl From<SampleRange> for Range<usize> {
    fn from(range: SampleRange) -> Self {
        range.as_range()
    }
}

// -------------------------------------------------------------------------------------------------
