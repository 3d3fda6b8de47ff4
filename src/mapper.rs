use crate::{range::SampleRange, viewport::Viewport};

// -------------------------------------------------------------------------------------------------

/// Converts between sample frame indices and pixel x-coordinates for a fixed [`Viewport`].
///
/// Mappers are cheap, immutable snapshots: create a new one via
/// [`ViewportController::mapper`](crate::ViewportController::mapper) whenever the viewport
/// changed. All conversions clamp into the visible window and never divide by zero: while the
/// viewport has no width (not yet laid out) or an empty window, sample conversions return the
/// window start, x conversions return 0 and deltas are 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    range: SampleRange,
    width: f32,
}

impl CoordinateMapper {
    pub fn new(viewport: &Viewport) -> Self {
        Self {
            range: viewport.render_samples,
            width: viewport.width,
        }
    }

    /// The visible sample window.
    pub fn range(&self) -> SampleRange {
        self.range
    }

    /// The pixel width the window is rendered into.
    pub fn width(&self) -> f32 {
        self.width
    }

    fn is_degenerate(&self) -> bool {
        !(self.width.is_finite() && self.width > 0.0) || self.range.is_empty()
    }

    /// Unclamped, rounded frame offset from the window start for the given x position.
    fn frame_offset(&self, x: f32) -> f64 {
        (x as f64 / self.width as f64 * self.range.count() as f64).round()
    }

    /// Frame index at the given x position, clamped to `[start, end - 1]`.
    pub fn sample_index(&self, x: f32) -> usize {
        if self.is_degenerate() {
            return self.range.start;
        }
        let max_offset = (self.range.count() - 1) as f64;
        // NB: NaN offsets cast to 0
        self.range.start + self.frame_offset(x).clamp(0.0, max_offset) as usize
    }

    /// Frame boundary at the given x position, clamped to `[start, end]`. Use this for exclusive
    /// range ends, such as a selection's end handle.
    pub fn boundary_index(&self, x: f32) -> usize {
        if self.is_degenerate() {
            return self.range.start;
        }
        let max_offset = self.range.count() as f64;
        self.range.start + self.frame_offset(x).clamp(0.0, max_offset) as usize
    }

    /// X position of the given frame index, clamped to `[0, width]`.
    pub fn x(&self, sample_index: usize) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        let offset = sample_index as f64 - self.range.start as f64;
        let x = offset / self.range.count() as f64 * self.width as f64;
        (x as f32).clamp(0.0, self.width)
    }

    /// Number of frames a single pixel column represents.
    pub fn samples_per_pixel(&self) -> f64 {
        if self.is_degenerate() {
            return 0.0;
        }
        self.range.count() as f64 / self.width as f64
    }

    /// Converts a pixel distance into a fractional frame distance.
    pub fn sample_offset(&self, delta_x: f32) -> f64 {
        if !delta_x.is_finite() {
            return 0.0;
        }
        delta_x as f64 * self.samples_per_pixel()
    }

    /// Converts a pixel distance into a (rounded) frame distance.
    pub fn sample_delta(&self, delta_x: f32) -> i64 {
        self.sample_offset(delta_x).round() as i64
    }

    /// Pixel extent `(left, right)` of the given sample range in the current viewport, clamped to
    /// `[0, width]`. Returns `None` when the range is not visible at all.
    pub fn x_span(&self, range: SampleRange) -> Option<(f32, f32)> {
        let visible = self.range.intersection(&range)?;
        Some((self.x(visible.start), self.x(visible.end)))
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper_for(start: usize, end: usize, width: f32) -> CoordinateMapper {
        CoordinateMapper::new(&Viewport {
            render_samples: SampleRange::new(start, end),
            width,
        })
    }

    #[test]
    fn conversions() {
        let mapper = mapper_for(100, 200, 50.0);
        assert_eq!(mapper.sample_index(0.0), 100);
        assert_eq!(mapper.sample_index(25.0), 150);
        assert_eq!(mapper.sample_index(50.0), 199);
        assert_eq!(mapper.sample_index(-10.0), 100);
        assert_eq!(mapper.sample_index(1000.0), 199);
        assert_eq!(mapper.boundary_index(50.0), 200);
        assert_eq!(mapper.sample_index(f32::NAN), 100);

        assert_eq!(mapper.x(100), 0.0);
        assert_eq!(mapper.x(150), 25.0);
        assert_eq!(mapper.x(200), 50.0);
        assert_eq!(mapper.x(10), 0.0);
        assert_eq!(mapper.x(10_000), 50.0);

        assert_eq!(mapper.samples_per_pixel(), 2.0);
        assert_eq!(mapper.sample_delta(10.0), 20);
        assert_eq!(mapper.sample_delta(-2.5), -5);
        assert_eq!(mapper.sample_offset(0.25), 0.5);
        assert_eq!(mapper.sample_offset(f32::NAN), 0.0);
    }

    #[test]
    fn round_trip() {
        for (start, end, width) in [
            (0, 10, 1000.0),
            (0, 1_000_000, 1000.0),
            (12_345, 98_765, 333.0),
            (5, 6, 1.0),
        ] {
            let mapper = mapper_for(start, end, width);
            let step = ((end - start) / 997).max(1);
            for sample in (start..end).step_by(step) {
                let round_trip = mapper.sample_index(mapper.x(sample));
                assert!(
                    round_trip.abs_diff(sample) <= 1,
                    "{sample} became {round_trip}"
                );
            }
        }
    }

    #[test]
    fn zero_width() {
        let mapper = mapper_for(10, 20, 0.0);
        for sample in [0, 10, 15, 20, 1000] {
            assert_eq!(mapper.x(sample), 0.0);
        }
        assert_eq!(mapper.sample_index(5.0), 10);
        assert_eq!(mapper.boundary_index(5.0), 10);
        assert_eq!(mapper.samples_per_pixel(), 0.0);
        assert_eq!(mapper.sample_delta(100.0), 0);

        let empty = mapper_for(0, 0, 100.0);
        assert_eq!(empty.x(0), 0.0);
        assert_eq!(empty.sample_index(50.0), 0);
    }

    #[test]
    fn spans() {
        let mapper = mapper_for(100, 200, 100.0);
        assert_eq!(mapper.x_span(SampleRange::new(120, 150)), Some((20.0, 50.0)));
        assert_eq!(mapper.x_span(SampleRange::new(0, 150)), Some((0.0, 50.0)));
        assert_eq!(mapper.x_span(SampleRange::new(150, 500)), Some((50.0, 100.0)));
        assert_eq!(mapper.x_span(SampleRange::new(0, 100)), None);
        assert_eq!(mapper.x_span(SampleRange::new(200, 300)), None);
    }
}
