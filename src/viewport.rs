pub mod gesture;

use std::sync::Arc;

use crate::{
    buffer::SampleBuffer,
    error::Error,
    mapper::CoordinateMapper,
    range::SampleRange,
    waveform::{ChannelMode, WaveformData},
    worker::{ReductionRequest, ReductionResult},
};

// -------------------------------------------------------------------------------------------------

/// The currently visible sample window and the pixel width it is rendered into.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible frame range of the buffer.
    pub render_samples: SampleRange,
    /// Width of the view in pixels. 0 while the view is not laid out.
    pub width: f32,
}

impl Viewport {
    /// Number of pixel columns the waveform gets reduced to.
    pub fn pixel_width(&self) -> usize {
        self.width.round() as usize
    }
}

// -------------------------------------------------------------------------------------------------

/// Options to configure a [`ViewportController`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportOptions {
    /// By default 1. Zooming in never narrows the window below this number of frames (or the
    /// buffer's frame count, when that is smaller).
    pub min_window_frames: usize,
    /// By default None: show the whole buffer. When set, the initial window, clamped into the
    /// buffer's bounds.
    pub initial_range: Option<SampleRange>,
    /// By default [`ChannelMode::Combined`]. How multi-channel buffers get reduced.
    pub channel_mode: ChannelMode,
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            min_window_frames: 1,
            initial_range: None,
            channel_mode: ChannelMode::Combined,
        }
    }
}

impl ViewportOptions {
    pub fn min_window_frames(mut self, frames: usize) -> Self {
        self.min_window_frames = frames;
        self
    }

    pub fn initial_range(mut self, range: SampleRange) -> Self {
        self.initial_range = Some(range);
        self
    }

    pub fn channel_mode(mut self, mode: ChannelMode) -> Self {
        self.channel_mode = mode;
        self
    }

    /// Validate all parameters. Returns Error::ParameterError on errors.
    pub fn validate(&self) -> Result<(), Error> {
        if self.min_window_frames == 0 {
            return Err(Error::ParameterError(
                "viewport options 'min_window_frames' value must be > 0".to_string(),
            ));
        }
        if let Some(range) = self.initial_range {
            if range.is_empty() {
                return Err(Error::ParameterError(format!(
                    "viewport options 'initial_range' value '{:?}' is empty",
                    range
                )));
            }
        }
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------

/// Owns and mutates the [`Viewport`] of a single waveform view.
///
/// The visible window always stays within the buffer's bounds and never collapses to an empty
/// range (unless the buffer itself is empty). `apply_zoom`, `apply_pan` and `set_width` are the
/// only operations which change the viewport; each of them bumps the controller's version and
/// invalidates the reduced waveform data, which gets recomputed on the next access.
///
/// Zoom and pan deltas which are too small to move the window by a whole frame are not lost:
/// the controller keeps the unapplied part and adds it to the next delta, so slow, continuous
/// gestures still move the window.
pub struct ViewportController {
    buffer: Arc<dyn SampleBuffer>,
    options: ViewportOptions,
    viewport: Viewport,
    version: u64,
    traces: Option<Vec<WaveformData>>,
    // zoom factor which got requested but not yet applied
    zoom_residual: f64,
    // frame offset which got requested but not yet applied
    pan_remainder: f64,
}

impl ViewportController {
    /// Create a new controller for the given buffer and view width, showing the whole buffer or
    /// the configured initial range.
    pub fn new(
        buffer: Arc<dyn SampleBuffer>,
        width: f32,
        options: ViewportOptions,
    ) -> Result<Self, Error> {
        options.validate()?;
        let frame_count = buffer.frame_count();
        let render_samples = options
            .initial_range
            .map(|range| range.clamped(frame_count))
            .filter(|range| !range.is_empty())
            .unwrap_or(SampleRange::new(0, frame_count));
        let viewport = Viewport {
            render_samples,
            width: Self::sanitize_width(width),
        };
        Ok(Self {
            buffer,
            options,
            viewport,
            version: 0,
            traces: None,
            zoom_residual: 1.0,
            pan_remainder: 0.0,
        })
    }

    /// Shared reference to the buffer this controller views.
    pub fn buffer(&self) -> &Arc<dyn SampleBuffer> {
        &self.buffer
    }

    pub fn options(&self) -> &ViewportOptions {
        &self.options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn render_samples(&self) -> SampleRange {
        self.viewport.render_samples
    }

    pub fn width(&self) -> f32 {
        self.viewport.width
    }

    /// Monotonically increasing counter, bumped on every viewport or buffer change.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Coordinate mapper for the current viewport.
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(&self.viewport)
    }

    /// Zoom in (factor > 1) or out (factor < 1) around the center of the visible window.
    ///
    /// The new window is shifted, not shrunk, when it would exceed the buffer's bounds. Factors
    /// which don't change the window's frame count are accumulated until they do. Invalid
    /// factors are ignored. Returns true when the window changed.
    pub fn apply_zoom(&mut self, factor: f32) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            log::warn!("Ignoring invalid zoom factor '{factor}'");
            return false;
        }
        if factor == 1.0 {
            return false;
        }
        let current = self.viewport.render_samples;
        if current.is_empty() {
            return false;
        }
        let frame_count = self.buffer.frame_count();
        let min_count = self
            .options
            .min_window_frames
            .min(frame_count)
            .min(current.count())
            .max(1);
        let factor = self.zoom_residual * factor as f64;
        let target_count = (current.count() as f64 / factor).round();
        let new_count = if target_count < min_count as f64 || target_count > frame_count as f64 {
            // hit a zoom limit: drop what's left
            self.zoom_residual = 1.0;
            (target_count as usize).clamp(min_count, frame_count)
        } else {
            let new_count = target_count as usize;
            self.zoom_residual = factor * new_count as f64 / current.count() as f64;
            new_count
        };
        let start = current
            .midpoint()
            .saturating_sub(new_count / 2)
            .min(frame_count - new_count);
        let changed = self.set_render_samples(SampleRange::with_count(start, new_count));
        if changed {
            self.pan_remainder = 0.0;
        }
        changed
    }

    /// Scroll the visible window by the given pixel distance. Positive values move the window
    /// towards the end of the buffer.
    ///
    /// The window slides along the buffer's bounds instead of getting truncated, so its frame
    /// count never changes. Fractions of a frame are carried over to the next call. Returns true
    /// when the window changed.
    pub fn apply_pan(&mut self, delta_pixels: f32) -> bool {
        let offset = self.mapper().sample_offset(delta_pixels);
        if offset == 0.0 {
            return false;
        }
        let offset = offset + self.pan_remainder;
        let delta = offset.round();
        if delta == 0.0 {
            self.pan_remainder = offset;
            return false;
        }
        let current = self.viewport.render_samples;
        let max_start = self.buffer.frame_count().saturating_sub(current.count());
        let target_start = current.start as f64 + delta;
        let start = target_start.clamp(0.0, max_start as f64);
        // remainders are dropped at the buffer's edges
        self.pan_remainder = if start == target_start {
            offset - delta
        } else {
            0.0
        };
        self.set_render_samples(SampleRange::with_count(start as usize, current.count()))
    }

    /// Update the view width in pixels, e.g. after a layout change. Negative or non finite
    /// widths are treated as 0. Returns true when the width changed.
    pub fn set_width(&mut self, pixels: f32) -> bool {
        let width = Self::sanitize_width(pixels);
        if width == self.viewport.width {
            return false;
        }
        self.viewport.width = width;
        self.changed();
        true
    }

    /// Replace the viewed buffer, e.g. after loading a new file. Resets the window to the whole
    /// new buffer.
    pub fn set_buffer(&mut self, buffer: Arc<dyn SampleBuffer>) {
        self.viewport.render_samples = SampleRange::new(0, buffer.frame_count());
        self.buffer = buffer;
        self.zoom_residual = 1.0;
        self.pan_remainder = 0.0;
        self.changed();
    }

    /// Drop the reduced waveform data, so it gets recomputed on next access.
    pub fn invalidate(&mut self) {
        self.traces = None;
    }

    /// True when the waveform data needs to be recomputed.
    pub fn is_invalidated(&self) -> bool {
        self.traces.is_none()
    }

    /// Reduced waveform data for the current viewport, recomputed when invalidated.
    ///
    /// With [`ChannelMode::Separate`] this is the first channel's trace: use
    /// [`traces`](Self::traces) to access all of them.
    pub fn waveform(&mut self) -> &WaveformData {
        &self.traces()[0]
    }

    /// All reduced waveform traces for the current viewport: a single one for
    /// [`ChannelMode::Combined`], else one per channel. Never empty.
    pub fn traces(&mut self) -> &[WaveformData] {
        if self.traces.is_none() {
            let traces = self.reduction_request().run();
            self.traces = Some(traces);
        }
        self.traces.as_deref().unwrap_or(&[])
    }

    /// Create a reduction request for the current viewport, tagged with the current version.
    /// Run it synchronously or pass it to a [`ReductionWorker`](crate::ReductionWorker).
    pub fn reduction_request(&self) -> ReductionRequest {
        ReductionRequest::new(
            self.version,
            Arc::clone(&self.buffer),
            self.viewport.render_samples,
            self.viewport.pixel_width(),
            self.options.channel_mode,
        )
    }

    /// Apply a reduction result. Results of outdated viewport versions or without any traces
    /// are discarded. Returns true when the result got applied.
    pub fn accept(&mut self, result: ReductionResult) -> bool {
        if result.traces.is_empty() {
            log::warn!(
                "Ignoring waveform result of version {} without traces",
                result.version
            );
            return false;
        }
        if result.version != self.version {
            log::debug!(
                "Discarding stale waveform of version {} (current is {})",
                result.version,
                self.version
            );
            return false;
        }
        self.traces = Some(result.traces);
        true
    }

    fn set_render_samples(&mut self, range: SampleRange) -> bool {
        if range == self.viewport.render_samples {
            return false;
        }
        self.viewport.render_samples = range;
        self.changed();
        true
    }

    fn changed(&mut self) {
        self.version += 1;
        self.invalidate();
    }

    fn sanitize_width(width: f32) -> f32 {
        if width.is_finite() && width > 0.0 {
            width
        } else {
            0.0
        }
    }
}

// -------------------------------------------------------------------------------------------------
