//! Converts continuous gesture values into incremental viewport deltas.
//!
//! Gesture recognizers usually report absolute values relative to the gesture's start: the
//! total magnification or the total drag translation. [`ViewportController`] expects deltas
//! instead. The accumulators here remember the last reported value and hand out the difference
//! on every update, and reset when the gesture ends.
//!
//! [`ViewportController`]: crate::ViewportController

// -------------------------------------------------------------------------------------------------

/// Tracks a pinch/magnification gesture and yields incremental zoom factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomGesture {
    last_scale: f32,
}

impl Default for ZoomGesture {
    fn default() -> Self {
        Self { last_scale: 1.0 }
    }
}

impl ZoomGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremental zoom factor for the given total magnification of a running gesture.
    pub fn changed(&mut self, scale: f32) -> f32 {
        let factor = self.factor(scale);
        if factor != 1.0 {
            self.last_scale = scale;
        }
        factor
    }

    /// Final zoom factor for the given total magnification. Resets the accumulator.
    pub fn ended(&mut self, scale: f32) -> f32 {
        let factor = self.factor(scale);
        self.last_scale = 1.0;
        factor
    }

    fn factor(&self, scale: f32) -> f32 {
        if scale.is_finite() && scale > 0.0 {
            scale / self.last_scale
        } else {
            log::warn!("Ignoring invalid zoom gesture scale '{scale}'");
            1.0
        }
    }
}

// -------------------------------------------------------------------------------------------------

/// Tracks a horizontal drag gesture and yields incremental pan deltas in pixels.
///
/// Dragging the waveform to the right reveals earlier samples, so the returned deltas are
/// inverted drag distances.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PanGesture {
    last_translation: f32,
}

impl PanGesture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Incremental pan delta for the given total drag translation of a running gesture.
    pub fn changed(&mut self, translation: f32) -> f32 {
        let delta = self.delta(translation);
        if delta != 0.0 {
            self.last_translation = translation;
        }
        delta
    }

    /// Final pan delta for the given total drag translation. Resets the accumulator.
    pub fn ended(&mut self, translation: f32) -> f32 {
        let delta = self.delta(translation);
        self.last_translation = 0.0;
        delta
    }

    fn delta(&self, translation: f32) -> f32 {
        if translation.is_finite() {
            -(translation - self.last_translation)
        } else {
            log::warn!("Ignoring invalid pan gesture translation '{translation}'");
            0.0
        }
    }
}

// -------------------------------------------------------------------------------------------------
