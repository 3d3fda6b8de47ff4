use crate::{mapper::CoordinateMapper, range::SampleRange};

// -------------------------------------------------------------------------------------------------

/// One of the two draggable selection handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum SelectionHandle {
    Start,
    End,
}

// -------------------------------------------------------------------------------------------------

/// User selection and playback marker of a waveform view.
///
/// Both are stored as sample ranges, independent of the viewport. Their pixel positions are
/// derived from whatever viewport is current, so highlights follow zoom and pan automatically.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Selection {
    selected_samples: SampleRange,
    play_marker: SampleRange,
    enabled: bool,
}

impl Selection {
    /// Create a new, enabled selection with the given initial range.
    pub fn new(selected_samples: SampleRange) -> Self {
        Self {
            selected_samples: selected_samples.normalized(),
            play_marker: SampleRange::default(),
            enabled: true,
        }
    }

    pub fn selected_samples(&self) -> SampleRange {
        self.selected_samples
    }

    pub fn set_selected_samples(&mut self, range: SampleRange) {
        self.selected_samples = range.normalized();
    }

    pub fn play_marker(&self) -> SampleRange {
        self.play_marker
    }

    /// Set the currently playing range. Called by the playback collaborator.
    pub fn set_play_marker(&mut self, range: SampleRange) {
        self.play_marker = range.normalized();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Move the given handle to the frame at pixel position `x`.
    ///
    /// The start handle never passes the end handle and vice versa: the selection always keeps
    /// at least one frame. Drags are ignored while the selection is disabled. Returns true when
    /// the selection changed.
    pub fn drag_handle(
        &mut self,
        handle: SelectionHandle,
        x: f32,
        mapper: &CoordinateMapper,
    ) -> bool {
        if !self.enabled || mapper.range().is_empty() {
            return false;
        }
        let index = mapper.boundary_index(x);
        let current = self.selected_samples;
        let selected = match handle {
            SelectionHandle::Start => {
                SampleRange::new(index.min(current.end.saturating_sub(1)), current.end)
            }
            SelectionHandle::End => SampleRange::new(current.start, index.max(current.start + 1)),
        };
        if selected == current {
            return false;
        }
        log::debug!("Selection {handle} handle moved to frame {index}");
        self.selected_samples = selected;
        true
    }

    /// Pixel position of the given handle, clamped to the view.
    pub fn handle_x(&self, handle: SelectionHandle, mapper: &CoordinateMapper) -> f32 {
        match handle {
            SelectionHandle::Start => mapper.x(self.selected_samples.start),
            SelectionHandle::End => mapper.x(self.selected_samples.end),
        }
    }

    /// Pixel extent of the selection in the current viewport, if visible and enabled.
    pub fn selection_span(&self, mapper: &CoordinateMapper) -> Option<(f32, f32)> {
        if !self.enabled {
            return None;
        }
        mapper.x_span(self.selected_samples)
    }

    /// Pixel extent of the play marker in the current viewport, if visible.
    pub fn play_marker_span(&self, mapper: &CoordinateMapper) -> Option<(f32, f32)> {
        mapper.x_span(self.play_marker)
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewport::Viewport;

    fn mapper_for(start: usize, end: usize, width: f32) -> CoordinateMapper {
        CoordinateMapper::new(&Viewport {
            render_samples: SampleRange::new(start, end),
            width,
        })
    }

    fn assert_span_eq(span: Option<(f32, f32)>, expected: Option<(f32, f32)>) {
        match (span, expected) {
            (Some((left, right)), Some((expected_left, expected_right))) => {
                assert!((left - expected_left).abs() < 1e-4, "{left} != {expected_left}");
                assert!((right - expected_right).abs() < 1e-4, "{right} != {expected_right}");
            }
            _ => assert_eq!(span, expected),
        }
    }

    #[test]
    fn handle_drags() {
        let mapper = mapper_for(0, 1000, 100.0);
        let mut selection = Selection::new(SampleRange::new(200, 600));

        assert!(selection.drag_handle(SelectionHandle::Start, 30.0, &mapper));
        assert_eq!(selection.selected_samples(), SampleRange::new(300, 600));
        assert!(selection.drag_handle(SelectionHandle::End, 100.0, &mapper));
        assert_eq!(selection.selected_samples(), SampleRange::new(300, 1000));
        assert!(!selection.drag_handle(SelectionHandle::End, 1000.0, &mapper));

        // handles can't cross each other
        assert!(selection.drag_handle(SelectionHandle::Start, 100.0, &mapper));
        assert_eq!(selection.selected_samples(), SampleRange::new(999, 1000));
        assert!(!selection.drag_handle(SelectionHandle::End, -50.0, &mapper));
        assert_eq!(selection.selected_samples(), SampleRange::new(999, 1000));

        assert_span_eq(
            Some((
                selection.handle_x(SelectionHandle::Start, &mapper),
                selection.handle_x(SelectionHandle::End, &mapper),
            )),
            Some((99.9, 100.0)),
        );

        // disabled selections ignore drags
        selection.set_enabled(false);
        assert!(!selection.drag_handle(SelectionHandle::Start, 0.0, &mapper));
        assert_eq!(selection.selection_span(&mapper), None);
    }

    #[test]
    fn inverted_ranges() {
        let mapper = mapper_for(0, 1000, 100.0);
        let mut selection = Selection::new(SampleRange {
            start: 600,
            end: 200,
        });
        assert_eq!(selection.selected_samples(), SampleRange::new(600, 600));
        assert!(selection.drag_handle(SelectionHandle::End, 80.0, &mapper));
        assert_eq!(selection.selected_samples(), SampleRange::new(600, 800));

        selection.set_selected_samples(SampleRange { start: 50, end: 10 });
        assert_eq!(selection.selection_span(&mapper), None);
        selection.set_play_marker(SampleRange { start: 20, end: 0 });
        assert!(selection.play_marker().is_empty());
    }

    #[test]
    fn spans_follow_viewport() {
        let mut selection = Selection::new(SampleRange::new(200, 400));
        selection.set_play_marker(SampleRange::new(300, 301));

        let full = mapper_for(0, 1000, 100.0);
        assert_span_eq(selection.selection_span(&full), Some((20.0, 40.0)));
        assert_span_eq(selection.play_marker_span(&full), Some((30.0, 30.1)));

        // zoomed in: same sample ranges, new pixel positions
        let zoomed = mapper_for(250, 350, 100.0);
        assert_span_eq(selection.selection_span(&zoomed), Some((0.0, 100.0)));
        assert_span_eq(selection.play_marker_span(&zoomed), Some((50.0, 51.0)));

        // panned away
        let panned = mapper_for(500, 600, 100.0);
        assert_eq!(selection.selection_span(&panned), None);
        assert_eq!(selection.play_marker_span(&panned), None);
        assert_eq!(selection.selected_samples(), SampleRange::new(200, 400));
    }
}
