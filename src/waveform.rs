//! Reduction of audio sample buffers into per pixel-column min/max peaks.
//!
//! A waveform view usually has far fewer pixel columns than there are sample frames in the
//! visible range. [`reduce`] partitions the visible range into one bucket per column and condenses
//! each bucket into a [`PeakPair`], which can be drawn directly as a vertical bar.
//!
//! ## Examples
//!
//! ```rust
//! use waveview::{waveform, InterleavedBuffer, SampleRange};
//!
//! # fn main() -> Result<(), waveview::Error> {
//! let buffer = InterleavedBuffer::new(vec![0.1, 0.9, -0.9, 0.2, -0.2], 1, 44100)?;
//!
//! // one column: global min/max
//! let data = waveform::reduce(&buffer, SampleRange::new(0, 5), 1);
//! assert_eq!((data[0].min, data[0].max), (-0.9, 0.9));
//!
//! // one column per sample: every peak is a single value
//! let data = waveform::reduce(&buffer, SampleRange::new(0, 5), 5);
//! assert_eq!(data.len(), 5);
//! assert!(data.iter().all(|peak| peak.min == peak.max));
//! # Ok(()) }
//! ```

use std::ops::Index;

use crate::{buffer::SampleBuffer, range::SampleRange};

// -------------------------------------------------------------------------------------------------

/// Min/max amplitude extremes of a block of samples, which represents a single pixel column in a
/// waveform plot. `min` is always <= `max`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PeakPair {
    /// The minimum of all values which are represented by this column.
    pub min: f32,
    /// The maximum of all values which are represented by this column.
    pub max: f32,
}

impl PeakPair {
    /// Create a new peak pair. Swaps min and max when passed in the wrong order.
    pub fn new(min: f32, max: f32) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// A peak pair which represents a single sample value.
    #[inline]
    pub const fn from_value(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Union of both pairs: min of mins and max of maxes.
    #[inline]
    pub fn merge(self, other: PeakPair) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// True when both extremes are zero.
    pub fn is_silent(&self) -> bool {
        self.min == 0.0 && self.max == 0.0
    }
}

// -------------------------------------------------------------------------------------------------

/// Selects how multi-channel buffers get reduced.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
pub enum ChannelMode {
    /// Collapse all channels into a single trace (min of mins, max of maxes).
    #[default]
    Combined,
    /// Produce one trace per channel.
    Separate,
}

// -------------------------------------------------------------------------------------------------

/// Ordered peak pairs, one per pixel column, from left to right, together with the sample range
/// they were computed from.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WaveformData {
    range: SampleRange,
    peaks: Vec<PeakPair>,
}

impl WaveformData {
    /// Empty data for the given range: nothing gets drawn.
    pub fn empty(range: SampleRange) -> Self {
        Self {
            range,
            peaks: Vec::new(),
        }
    }

    /// The sample range the peaks got computed from.
    pub fn range(&self) -> SampleRange {
        self.range
    }

    pub fn peaks(&self) -> &[PeakPair] {
        &self.peaks
    }

    pub fn into_peaks(self) -> Vec<PeakPair> {
        self.peaks
    }

    /// Number of pixel columns.
    pub fn len(&self) -> usize {
        self.peaks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peaks.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PeakPair> {
        self.peaks.iter()
    }
}

impl Index<usize> for WaveformData {
    type Output = PeakPair;

    fn index(&self, index: usize) -> &Self::Output {
        &self.peaks[index]
    }
}

impl<'a> IntoIterator for &'a WaveformData {
    type Item = &'a PeakPair;
    type IntoIter = std::slice::Iter<'a, PeakPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.peaks.iter()
    }
}

// -------------------------------------------------------------------------------------------------

/// Frame range of bucket `index` when partitioning `range` into `bucket_count` buckets.
///
/// Bucket bounds are `start + floor(i * N / W)`, so buckets differ in size by at most one frame
/// and together cover the whole range without gaps or overlaps.
pub fn bucket_range(range: SampleRange, index: usize, bucket_count: usize) -> SampleRange {
    debug_assert!(bucket_count > 0, "Invalid bucket count");
    let count = range.count() as u128;
    let bucket_count = bucket_count as u128;
    let index = index as u128;
    let start = range.start + (index * count / bucket_count) as usize;
    let end = range.start + ((index + 1) * count / bucket_count) as usize;
    SampleRange::new(start, end.min(range.end))
}

/// Reduce the given range of the buffer into `pixel_width` peak pairs.
fn reduce_with<F, G>(
    range: SampleRange,
    pixel_width: usize,
    bucket_peak: F,
    frame_peak: G,
) -> WaveformData
where
    F: Fn(SampleRange) -> Option<PeakPair>,
    G: Fn(usize) -> Option<PeakPair>,
{
    let peaks = (0..pixel_width)
        .map(|index| {
            let bucket = bucket_range(range, index, pixel_width);
            if !bucket.is_empty() {
                bucket_peak(bucket).unwrap_or_default()
            } else if !range.is_empty() {
                // upscale: fewer frames than columns. use the nearest frame's value.
                frame_peak(bucket.start.min(range.end - 1)).unwrap_or_default()
            } else {
                PeakPair::default()
            }
        })
        .collect();
    WaveformData { range, peaks }
}

/// Clamp reduction arguments into valid bounds. Returns `None` for empty buffers.
fn clamp_arguments<B: SampleBuffer + ?Sized>(
    buffer: &B,
    range: SampleRange,
    pixel_width: usize,
) -> Option<(SampleRange, usize)> {
    let frame_count = buffer.frame_count();
    if frame_count == 0 {
        return None;
    }
    Some((range.clamped(frame_count), pixel_width.max(1)))
}

// -------------------------------------------------------------------------------------------------

/// Generates single trace display data with exactly `pixel_width` points from the given range of
/// the buffer. Multi-channel buffers get collapsed by taking the extremes across all channels.
///
/// The range is clamped to the buffer's bounds and `pixel_width` is clamped to at least 1. When
/// there are fewer frames than pixels, each column shows the value of its nearest frame. Empty
/// buffers result in empty data.
///
/// Runs in O(range.count() + pixel_width): each sample in the range is read exactly once.
pub fn reduce<B: SampleBuffer + ?Sized>(
    buffer: &B,
    range: SampleRange,
    pixel_width: usize,
) -> WaveformData {
    match clamp_arguments(buffer, range, pixel_width) {
        Some((range, pixel_width)) => reduce_with(
            range,
            pixel_width,
            |bucket| buffer.peak(bucket),
            |frame| buffer.frame_peak(frame),
        ),
        None => WaveformData::empty(SampleRange::default()),
    }
}

/// Generates display data separately for each channel in the buffer.
///
/// See [`reduce`] for more info about the range and `pixel_width` parameters. Empty buffers
/// result in no traces at all.
pub fn reduce_channels<B: SampleBuffer + ?Sized>(
    buffer: &B,
    range: SampleRange,
    pixel_width: usize,
) -> Vec<WaveformData> {
    match clamp_arguments(buffer, range, pixel_width) {
        Some((range, pixel_width)) => (0..buffer.channel_count())
            .map(|channel| {
                reduce_with(
                    range,
                    pixel_width,
                    |bucket| buffer.channel_peak(channel, bucket),
                    |frame| buffer.channel_peak(channel, SampleRange::with_count(frame, 1)),
                )
            })
            .collect(),
        None => Vec::new(),
    }
}

/// Generates one or more traces with the given channel mode. Always returns at least one trace,
/// which is empty for empty buffers.
pub fn reduce_traces<B: SampleBuffer + ?Sized>(
    buffer: &B,
    range: SampleRange,
    pixel_width: usize,
    mode: ChannelMode,
) -> Vec<WaveformData> {
    let traces = match mode {
        ChannelMode::Combined => vec![reduce(buffer, range, pixel_width)],
        ChannelMode::Separate => reduce_channels(buffer, range, pixel_width),
    };
    if traces.is_empty() {
        vec![WaveformData::empty(SampleRange::default())]
    } else {
        traces
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::{InterleavedBuffer, PlanarBuffer};

    fn mono(samples: &[f32]) -> InterleavedBuffer {
        InterleavedBuffer::new(samples.to_vec(), 1, 44100).unwrap()
    }

    #[test]
    fn single_sample_buckets() {
        let buffer = mono(&[0.1, 0.9, -0.9, 0.2, -0.2]);
        let data = reduce(&buffer, SampleRange::new(0, 5), 5);
        assert_eq!(
            data.peaks(),
            &[
                PeakPair::from_value(0.1),
                PeakPair::from_value(0.9),
                PeakPair::from_value(-0.9),
                PeakPair::from_value(0.2),
                PeakPair::from_value(-0.2),
            ]
        );
        assert_eq!(data.range(), SampleRange::new(0, 5));
    }

    #[test]
    fn single_column() {
        let buffer = mono(&[0.1, 0.9, -0.9, 0.2, -0.2]);
        let data = reduce(&buffer, SampleRange::new(0, 5), 1);
        assert_eq!(data.peaks(), &[PeakPair::new(-0.9, 0.9)]);
    }

    #[test]
    fn bucket_partitioning() {
        let range = SampleRange::new(3, 13);
        let buckets = (0..3)
            .map(|index| bucket_range(range, index, 3))
            .collect::<Vec<_>>();
        assert_eq!(
            buckets,
            vec![
                SampleRange::new(3, 6),
                SampleRange::new(6, 9),
                SampleRange::new(9, 13)
            ]
        );
        // more buckets than frames: every bucket has at most one frame
        let range = SampleRange::new(0, 3);
        for index in 0..8 {
            assert!(bucket_range(range, index, 8).count() <= 1);
        }
    }

    #[test]
    fn window_and_width_invariants() {
        let samples = (0..1000)
            .map(|i| (i as f32 * 0.37).sin() * 0.8)
            .collect::<Vec<_>>();
        let buffer = mono(&samples);
        for (start, end) in [(0, 1000), (10, 20), (999, 1000), (100, 777)] {
            for width in [1, 2, 7, 64, 333, 1024] {
                let data = reduce(&buffer, SampleRange::new(start, end), width);
                assert_eq!(data.len(), width);
                assert!(data.iter().all(|peak| peak.min <= peak.max));
            }
        }
    }

    #[test]
    fn upscaling() {
        let buffer = mono(&[0.5, -0.5]);
        let data = reduce(&buffer, SampleRange::new(0, 2), 4);
        assert_eq!(
            data.peaks(),
            &[
                PeakPair::from_value(0.5),
                PeakPair::from_value(0.5),
                PeakPair::from_value(-0.5),
                PeakPair::from_value(-0.5),
            ]
        );
    }

    #[test]
    fn degenerate_arguments() {
        let buffer = mono(&[0.1, 0.9, -0.9]);
        // zero width gets clamped to one column
        assert_eq!(reduce(&buffer, SampleRange::new(0, 3), 0).len(), 1);
        // out of bounds ranges get clamped
        let data = reduce(&buffer, SampleRange::new(1, 100), 1);
        assert_eq!(data.range(), SampleRange::new(1, 3));
        assert_eq!(data.peaks(), &[PeakPair::new(-0.9, 0.9)]);
        // empty range in a non-empty buffer: silent columns
        let data = reduce(&buffer, SampleRange::new(2, 2), 3);
        assert_eq!(data.peaks(), &[PeakPair::default(); 3]);
        // inverted ranges are empty ranges
        let inverted = SampleRange { start: 2, end: 1 };
        assert!(bucket_range(inverted, 0, 4).is_empty());
        let data = reduce(&buffer, inverted, 2);
        assert_eq!(data.range(), SampleRange::new(2, 2));
        assert_eq!(data.peaks(), &[PeakPair::default(); 2]);
        // empty buffers
        let empty = mono(&[]);
        assert!(reduce(&empty, SampleRange::new(0, 10), 100).is_empty());
        assert!(reduce_channels(&empty, SampleRange::new(0, 10), 100).is_empty());
        assert_eq!(
            reduce_traces(&empty, SampleRange::new(0, 10), 100, ChannelMode::Separate).len(),
            1
        );
    }

    #[test]
    fn multi_channel() {
        let buffer = PlanarBuffer::from_channels(
            vec![vec![0.1, 0.2, 0.3, 0.4], vec![-0.4, -0.3, -0.2, -0.1]],
            44100,
        )
        .unwrap();

        let combined = reduce(&buffer, SampleRange::new(0, 4), 2);
        assert_eq!(
            combined.peaks(),
            &[PeakPair::new(-0.4, 0.2), PeakPair::new(-0.2, 0.4)]
        );

        let separate = reduce_channels(&buffer, SampleRange::new(0, 4), 2);
        assert_eq!(separate.len(), 2);
        assert_eq!(
            separate[0].peaks(),
            &[PeakPair::new(0.1, 0.2), PeakPair::new(0.3, 0.4)]
        );
        assert_eq!(
            separate[1].peaks(),
            &[PeakPair::new(-0.4, -0.3), PeakPair::new(-0.2, -0.1)]
        );

        // interleaved and planar layouts reduce to the same result
        let interleaved = buffer.to_interleaved();
        assert_eq!(
            reduce(&interleaved, SampleRange::new(0, 4), 3),
            reduce(&buffer, SampleRange::new(0, 4), 3)
        );
    }

    #[test]
    fn channel_mode_names() {
        assert_eq!(ChannelMode::Separate.to_string(), "separate");
        assert_eq!("combined".parse::<ChannelMode>(), Ok(ChannelMode::Combined));
    }
}
