#[cfg(feature = "decoder")]
mod decoder;
mod interleaved;
mod planar;

pub use interleaved::InterleavedBuffer;
pub use planar::PlanarBuffer;

use crate::{range::SampleRange, waveform::PeakPair};

// -------------------------------------------------------------------------------------------------

/// Read access to a decoded, immutable PCM sample buffer.
///
/// The waveform reducer only ever reads through this trait, so any decoder output can be viewed
/// by implementing it. Implementations must return stable values for a fixed source and must not
/// fail for reads within `frame_count` and `channel_count`.
///
/// `channel_peak` and `peak` have generic default implementations based on `sample`. Buffers with
/// a contiguous memory layout should override them with tighter loops.
pub trait SampleBuffer: Send + Sync {
    /// Total number of sample frames in the buffer.
    fn frame_count(&self) -> usize;
    /// Number of channels in each frame.
    fn channel_count(&self) -> usize;
    /// Sample rate in Hz. Informational only: the reducer works on frame indices.
    fn sample_rate(&self) -> u32;

    /// Single sample value at the given channel and frame.
    fn sample(&self, channel: usize, frame: usize) -> f32;

    /// Min/max amplitude of a single channel within the given frame range, or `None` when the
    /// clamped range is empty.
    fn channel_peak(&self, channel: usize, range: SampleRange) -> Option<PeakPair> {
        range
            .clamped(self.frame_count())
            .as_range()
            .map(|frame| PeakPair::from_value(self.sample(channel, frame)))
            .reduce(PeakPair::merge)
    }

    /// Min/max amplitude across all channels within the given frame range, or `None` when the
    /// clamped range is empty.
    fn peak(&self, range: SampleRange) -> Option<PeakPair> {
        (0..self.channel_count())
            .filter_map(|channel| self.channel_peak(channel, range))
            .reduce(PeakPair::merge)
    }

    /// Min/max amplitude of the given frame across all channels.
    fn frame_peak(&self, frame: usize) -> Option<PeakPair> {
        self.peak(SampleRange::with_count(frame, 1))
    }
}

// -------------------------------------------------------------------------------------------------

/// Copy the given interleaved buffer into a planar one.
/// The planar buffer's layout defines layout of the interleaved buffer (channel and frame count).
pub(crate) fn interleaved_to_planar(interleaved: &[f32], planar: &mut [Vec<f32>]) {
    let channel_count = planar.len();
    match channel_count {
        1 => {
            for (p, i) in planar[0].iter_mut().zip(interleaved) {
                *p = *i;
            }
        }
        _ => {
            for (channel_index, channel_values) in planar.iter_mut().enumerate() {
                for (frame_index, value) in channel_values.iter_mut().enumerate() {
                    *value = interleaved[frame_index * channel_count + channel_index];
                }
            }
        }
    }
}

/// Copy the given planar buffer into an interleaved one.
pub(crate) fn planar_to_interleaved(planar: &[Vec<f32>], interleaved: &mut [f32]) {
    let channel_count = planar.len();
    for (channel_index, channel_values) in planar.iter().enumerate() {
        for (frame_index, value) in channel_values.iter().enumerate() {
            interleaved[frame_index * channel_count + channel_index] = *value;
        }
    }
}

// -------------------------------------------------------------------------------------------------
