use std::sync::Arc;

use super::{interleaved_to_planar, PlanarBuffer, SampleBuffer};
use crate::{error::Error, range::SampleRange, waveform::PeakPair};

// -------------------------------------------------------------------------------------------------

/// An immutable, shared buffer of interleaved f32 samples, as delivered by most audio decoders.
///
/// The sample data is wrapped in an Arc, so cloning a buffer only copies a reference. This way a
/// file can be decoded once and then be viewed by as many waveforms and reduction workers as
/// necessary.
#[derive(Debug, Clone)]
pub struct InterleavedBuffer {
    samples: Arc<Vec<f32>>,
    channel_count: usize,
    sample_rate: u32,
}

impl InterleavedBuffer {
    /// Create a new buffer from the given interleaved samples.
    ///
    /// A trailing partial frame, if any, is not accessible.
    pub fn new(samples: Vec<f32>, channel_count: usize, sample_rate: u32) -> Result<Self, Error> {
        Self::with_shared(Arc::new(samples), channel_count, sample_rate)
    }

    /// Create a new buffer with the given, possibly shared, interleaved samples.
    pub fn with_shared(
        samples: Arc<Vec<f32>>,
        channel_count: usize,
        sample_rate: u32,
    ) -> Result<Self, Error> {
        if channel_count == 0 {
            return Err(Error::ParameterError(
                "buffer 'channel_count' must be > 0".to_string(),
            ));
        }
        if samples.len() % channel_count != 0 {
            log::warn!(
                "Interleaved buffer of {} samples has a partial trailing frame for {} channels",
                samples.len(),
                channel_count
            );
        }
        Ok(Self::from_validated(samples, channel_count, sample_rate))
    }

    pub(super) fn from_validated(
        samples: Arc<Vec<f32>>,
        channel_count: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            samples,
            channel_count,
            sample_rate,
        }
    }

    /// Shared reference to the raw interleaved sample data.
    pub fn samples(&self) -> Arc<Vec<f32>> {
        Arc::clone(&self.samples)
    }

    /// Copy the buffer into a planar layout.
    pub fn to_planar(&self) -> PlanarBuffer {
        let frame_count = self.frame_count();
        let mut planar = vec![vec![0.0; frame_count]; self.channel_count];
        interleaved_to_planar(
            &self.samples[..frame_count * self.channel_count],
            &mut planar,
        );
        PlanarBuffer::from_validated(planar, frame_count, self.sample_rate)
    }

    fn frames(&self, range: SampleRange) -> &[f32] {
        let range = range.clamped(self.frame_count());
        &self.samples[range.start * self.channel_count..range.end * self.channel_count]
    }
}

impl SampleBuffer for InterleavedBuffer {
    fn frame_count(&self) -> usize {
        self.samples.len() / self.channel_count
    }

    fn channel_count(&self) -> usize {
        self.channel_count
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    fn sample(&self, channel: usize, frame: usize) -> f32 {
        debug_assert!(channel < self.channel_count, "Invalid channel index");
        self.samples[frame * self.channel_count + channel]
    }

    fn channel_peak(&self, channel: usize, range: SampleRange) -> Option<PeakPair> {
        self.frames(range)
            .chunks_exact(self.channel_count)
            .map(|frame| PeakPair::from_value(frame[channel]))
            .reduce(PeakPair::merge)
    }

    fn peak(&self, range: SampleRange) -> Option<PeakPair> {
        // all channels are adjacent in memory: a single scan covers them all
        self.frames(range)
            .iter()
            .map(|value| PeakPair::from_value(*value))
            .reduce(PeakPair::merge)
    }
}

// -------------------------------------------------------------------------------------------------
