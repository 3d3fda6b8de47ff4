use std::sync::Arc;

use super::{planar_to_interleaved, InterleavedBuffer, SampleBuffer};
use crate::{error::Error, range::SampleRange, waveform::PeakPair};

// -------------------------------------------------------------------------------------------------

/// An immutable, shared buffer of planar (one slice per channel) f32 samples.
#[derive(Debug, Clone)]
pub struct PlanarBuffer {
    channels: Arc<Vec<Vec<f32>>>,
    frame_count: usize,
    sample_rate: u32,
}

impl PlanarBuffer {
    /// Create a new buffer from the given channel sample vectors. All channels must have the same
    /// length and there must be at least one channel.
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self, Error> {
        let frame_count = match channels.first() {
            Some(first) => first.len(),
            None => {
                return Err(Error::ParameterError(
                    "buffer must have at least one channel".to_string(),
                ))
            }
        };
        if let Some(index) = channels.iter().position(|c| c.len() != frame_count) {
            return Err(Error::ParameterError(format!(
                "buffer channel {} has {} frames, expected {}",
                index,
                channels[index].len(),
                frame_count
            )));
        }
        Ok(Self::from_validated(channels, frame_count, sample_rate))
    }

    pub(super) fn from_validated(
        channels: Vec<Vec<f32>>,
        frame_count: usize,
        sample_rate: u32,
    ) -> Self {
        Self {
            channels: Arc::new(channels),
            frame_count,
            sample_rate,
        }
    }

    /// Samples of a single channel.
    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.channels[channel]
    }

    /// Copy the buffer into an interleaved layout.
    pub fn to_interleaved(&self) -> InterleavedBuffer {
        let mut interleaved = vec![0.0; self.frame_count * self.channels.len()];
        planar_to_interleaved(&self.channels, &mut interleaved);
        InterleavedBuffer::from_validated(
            Arc::new(interleaved),
            self.channels.len(),
            self.sample_rate,
        )
    }
}

impl SampleBuffer for PlanarBuffer {
    fn frame_count(&self) -> usize {
        self.frame_count
    }

    fn channel_count(&self) -> usize {
        self.channels.len()
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    #[inline]
    fn sample(&self, channel: usize, frame: usize) -> f32 {
        self.channels[channel][frame]
    }

    fn channel_peak(&self, channel: usize, range: SampleRange) -> Option<PeakPair> {
        let range = range.clamped(self.frame_count);
        self.channels[channel][range.as_range()]
            .iter()
            .map(|value| PeakPair::from_value(*value))
            .reduce(PeakPair::merge)
    }
}

// -------------------------------------------------------------------------------------------------
