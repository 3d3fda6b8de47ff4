//! An example showcasing how to load an audio file, zoom and pan its waveform view, and write
//! the visible waveform together with a selection highlight into an SVG file.

use std::{path::PathBuf, sync::Arc};

use arg::{parse_args, Args};
use svg::{
    node::element::{path::Data, Path, Rectangle},
    Document,
};

use waveview::{
    render, ChannelMode, InterleavedBuffer, SampleRange, Selection, SelectionHandle,
    ViewportController, ViewportOptions,
};

// -------------------------------------------------------------------------------------------------

const DEFAULT_LOG_LEVEL: log::Level = if cfg!(debug_assertions) {
    log::Level::Debug
} else {
    log::Level::Warn
};

const DEFAULT_WIDTH: usize = 1024;
const HEIGHT: usize = 256;
const STROKE_WIDTH: usize = 1;

// -------------------------------------------------------------------------------------------------

#[derive(Args, Debug, Default)]
struct Arguments {
    #[arg(short = "f", long = "file")]
    /// Audio file to visualize.
    file_path: Option<PathBuf>,
    #[arg(short = "o", long = "output")]
    /// Write the SVG into the given file. By default next to the audio file.
    output_path: Option<PathBuf>,
    #[arg(short = "w", long = "width")]
    /// Width of the SVG in pixels. By default 1024.
    width: Option<usize>,
    #[arg(short = "z", long = "zoom")]
    /// Zoom factor which gets applied before rendering. By default 1.
    zoom: Option<f32>,
    #[arg(short = "p", long = "pan")]
    /// Pan distance in pixels which gets applied after zooming. By default 0.
    pan: Option<f32>,
    #[arg(short = "c", long = "channels")]
    /// Channel mode: \"combined\" or \"separate\". By default \"combined\".
    channel_mode: Option<ChannelMode>,
    #[arg(short = "l", long = "log-level")]
    /// Set logging level to \"debug\", \"info\", \"warn\" or \"error\".
    /// By default \"debug\" in dev builds and \"warn\" in release builds.
    log_level: Option<log::Level>,
}

// -------------------------------------------------------------------------------------------------

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args::<Arguments>();

    simple_logger::SimpleLogger::new()
        .with_level(args.log_level.unwrap_or(DEFAULT_LOG_LEVEL).to_level_filter())
        // disable logging in chatty modules
        .with_module_level("symphonia_core", log::LevelFilter::Warn)
        .with_module_level("symphonia_format", log::LevelFilter::Warn)
        .init()?;

    let file_path = args
        .file_path
        .ok_or("missing audio file argument: use --file PATH")?;
    let output_path = args
        .output_path
        .unwrap_or_else(|| file_path.with_extension("svg"));
    let width = args.width.unwrap_or(DEFAULT_WIDTH).max(1) as f32;
    let height = HEIGHT as f32;

    // decode and view the file
    let buffer = Arc::new(InterleavedBuffer::from_file(&file_path)?);
    let options =
        ViewportOptions::default().channel_mode(args.channel_mode.unwrap_or_default());
    let mut controller = ViewportController::new(buffer, width, options)?;
    controller.apply_zoom(args.zoom.unwrap_or(1.0));
    controller.apply_pan(args.pan.unwrap_or(0.0));
    log::info!(
        "Rendering frames {:?} of {:?}",
        controller.render_samples().as_range(),
        file_path
    );

    // select the middle third of the visible window via the handles
    let mapper = controller.mapper();
    let mut selection = Selection::new(controller.render_samples());
    selection.drag_handle(SelectionHandle::Start, width / 3.0, &mapper);
    selection.drag_handle(SelectionHandle::End, width * 2.0 / 3.0, &mapper);
    selection.set_play_marker(SampleRange::with_count(selection.selected_samples().start, 1));

    let mut document = Document::new().set("viewBox", (0, 0, width as usize, HEIGHT));

    // highlights
    if let Some(rect) = render::highlight(selection.selection_span(&mapper), height) {
        document = document.add(
            Rectangle::new()
                .set("x", rect.x)
                .set("width", rect.width)
                .set("height", rect.height)
                .set("fill", "lightblue"),
        );
    }
    if let Some(rect) = render::highlight(selection.play_marker_span(&mapper), height) {
        document = document.add(
            Rectangle::new()
                .set("x", rect.x)
                .set("width", rect.width.max(1.0))
                .set("height", rect.height)
                .set("fill", "orange"),
        );
    }

    // one path per trace, stacked vertically
    let traces = controller.traces();
    let trace_height = height / traces.len() as f32;
    for (trace_index, trace) in traces.iter().enumerate() {
        let offset_y = trace_index as f32 * trace_height;
        let mut data = Data::new();
        for bar in render::bars(trace, width, trace_height) {
            data = data
                .move_to((bar.x, offset_y + bar.top))
                .line_to((bar.x, offset_y + bar.bottom));
        }
        document = document.add(
            Path::new()
                .set("fill", "none")
                .set("stroke", "black")
                .set("stroke-width", STROKE_WIDTH)
                .set("d", data),
        );
    }

    svg::save(&output_path, &document)?;
    log::info!("Wrote waveform to {:?}", output_path);
    Ok(())
}
