//! Drives a complete waveform view session through the public API: gestures feed the viewport
//! controller, selections follow the viewport and reductions run in the background worker.

use std::{sync::Arc, time::Duration};

use waveview::{
    render, waveform, ChannelMode, InterleavedBuffer, PanGesture, SampleBuffer, SampleRange,
    Selection, SelectionHandle, ViewportController, ViewportOptions, ZoomGesture,
};

// -------------------------------------------------------------------------------------------------

const FRAME_COUNT: usize = 1000;
const WIDTH: f32 = 100.0;
const HEIGHT: f32 = 50.0;

/// Stereo ramp: left channel rises from 0 to 1, right channel falls from 0 to -1.
fn stereo_ramp() -> Arc<InterleavedBuffer> {
    let samples = (0..FRAME_COUNT)
        .flat_map(|frame| {
            let value = frame as f32 / FRAME_COUNT as f32;
            [value, -value]
        })
        .collect();
    Arc::new(InterleavedBuffer::new(samples, 2, 48000).unwrap())
}

fn assert_approx_eq(a: f32, b: f32) {
    assert!((a - b).abs() < 1e-3, "{a} != {b}");
}

// -------------------------------------------------------------------------------------------------

#[test]
fn zoom_pan_select_render() {
    let buffer = stereo_ramp();
    let mut controller =
        ViewportController::new(buffer.clone(), WIDTH, ViewportOptions::default()).unwrap();
    assert_eq!(controller.render_samples(), SampleRange::new(0, FRAME_COUNT));
    assert_eq!(controller.waveform().len(), WIDTH as usize);

    // pinch to zoom in
    let mut zoom = ZoomGesture::new();
    assert!(controller.apply_zoom(zoom.changed(2.0)));
    assert_eq!(controller.render_samples(), SampleRange::new(250, 750));
    assert!(!controller.apply_zoom(zoom.ended(2.0)));

    // drag the waveform to the left: reveals later samples
    let mut pan = PanGesture::new();
    assert!(controller.apply_pan(pan.changed(-20.0)));
    assert_eq!(controller.render_samples(), SampleRange::new(350, 850));
    assert!(controller.apply_pan(pan.changed(-30.0)));
    assert_eq!(controller.render_samples(), SampleRange::new(400, 900));
    assert!(!controller.apply_pan(pan.ended(-30.0)));

    // panning past the end slides along the buffer's bounds
    assert!(controller.apply_pan(1000.0));
    assert_eq!(controller.render_samples(), SampleRange::new(500, 1000));

    let waveform = controller.waveform().clone();
    assert_eq!(waveform.range(), SampleRange::new(500, 1000));
    assert_eq!(waveform.len(), WIDTH as usize);
    assert!(waveform.iter().all(|peak| peak.min < 0.0 && peak.max > 0.0));

    // selection handles, in the zoomed viewport
    let mapper = controller.mapper();
    let mut selection = Selection::new(SampleRange::new(600, 700));
    let (left, right) = selection.selection_span(&mapper).unwrap();
    assert_approx_eq(left, 20.0);
    assert_approx_eq(right, 40.0);

    assert!(selection.drag_handle(SelectionHandle::Start, 10.0, &mapper));
    assert_eq!(selection.selected_samples(), SampleRange::new(550, 700));
    // the end handle can not pass the start handle
    assert!(selection.drag_handle(SelectionHandle::End, 5.0, &mapper));
    assert_eq!(selection.selected_samples(), SampleRange::new(550, 551));

    let rect = render::highlight(selection.selection_span(&mapper), HEIGHT).unwrap();
    assert_approx_eq(rect.x, 10.0);
    assert_approx_eq(rect.width, 0.2);
    assert_approx_eq(rect.height, HEIGHT);

    // play marker outside of the visible window
    selection.set_play_marker(SampleRange::new(100, 200));
    assert_eq!(selection.play_marker_span(&mapper), None);

    let bars = render::bars(&waveform, WIDTH, HEIGHT);
    assert_eq!(bars.len(), WIDTH as usize);
    assert!(bars
        .iter()
        .all(|bar| bar.top <= bar.bottom && bar.top >= 0.0 && bar.bottom <= HEIGHT));
}

#[test]
fn background_reductions() {
    let buffer = stereo_ramp();
    let options = ViewportOptions::default().channel_mode(ChannelMode::Separate);
    let mut controller = ViewportController::new(buffer.clone(), WIDTH, options).unwrap();
    let worker = waveview::ReductionWorker::new().unwrap();

    let mut zoom = ZoomGesture::new();
    for scale in [1.5, 2.0, 3.0, 4.0] {
        controller.apply_zoom(zoom.changed(scale));
        worker.request(controller.reduction_request()).unwrap();
    }
    controller.apply_zoom(zoom.ended(4.0));

    let result = worker
        .wait(controller.version(), Duration::from_secs(10))
        .unwrap();
    assert!(controller.accept(result));
    assert!(!controller.is_invalidated());

    let expected = waveform::reduce_channels(
        buffer.as_ref(),
        controller.render_samples(),
        WIDTH as usize,
    );
    assert_eq!(controller.traces(), expected.as_slice());
    assert_eq!(controller.traces().len(), buffer.channel_count());
}
