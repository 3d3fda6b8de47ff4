//! Geometry helpers for drawing reduced waveform data.
//!
//! Renderers draw one vertical bar per [`PeakPair`], spanning from the pair's `min` to its `max`
//! amplitude, scaled to half the view height around a horizontal centerline. These helpers
//! compute that geometry in view coordinates (y grows downwards), so the actual drawing only
//! needs to stroke lines or fill rects.

use crate::waveform::{PeakPair, WaveformData};

// -------------------------------------------------------------------------------------------------

/// A single vertical waveform bar in view coordinates.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct WaveformBar {
    /// Left edge of the bar's pixel column.
    pub x: f32,
    /// Width of the bar's pixel column.
    pub width: f32,
    /// Y position of the bar's max amplitude.
    pub top: f32,
    /// Y position of the bar's min amplitude. Always >= top.
    pub bottom: f32,
}

/// A highlighted horizontal region, spanning the whole view height.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct HighlightRect {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

// -------------------------------------------------------------------------------------------------

/// Y position of the given amplitude in a view of the given height.
#[inline]
pub fn amplitude_to_y(amplitude: f32, height: f32) -> f32 {
    let half_height = height / 2.0;
    half_height - amplitude * half_height
}

/// Compute bar geometry for all peaks in the given waveform, spread evenly across `width`.
/// Empty waveforms result in no bars.
pub fn bars(waveform: &WaveformData, width: f32, height: f32) -> Vec<WaveformBar> {
    if waveform.is_empty() {
        return Vec::new();
    }
    let column_width = width / waveform.len() as f32;
    waveform
        .iter()
        .enumerate()
        .map(|(index, peak)| bar(peak, index as f32 * column_width, column_width, height))
        .collect()
}

fn bar(peak: &PeakPair, x: f32, width: f32, height: f32) -> WaveformBar {
    WaveformBar {
        x,
        width,
        top: amplitude_to_y(peak.max, height),
        bottom: amplitude_to_y(peak.min, height),
    }
}

/// Highlight rect for a pixel span, as returned by [`CoordinateMapper::x_span`] or the
/// [`Selection`] span functions.
///
/// [`CoordinateMapper::x_span`]: crate::CoordinateMapper::x_span
/// [`Selection`]: crate::Selection
pub fn highlight(span: Option<(f32, f32)>, height: f32) -> Option<HighlightRect> {
    span.map(|(left, right)| HighlightRect {
        x: left,
        width: (right - left).max(0.0),
        height,
    })
}

// -------------------------------------------------------------------------------------------------
