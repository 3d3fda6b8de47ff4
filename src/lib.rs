#![doc = include_str!("../README.md")]

// private mods (will be partly re-exported)
mod buffer;
mod error;
mod mapper;
mod range;
mod selection;
mod viewport;
mod worker;

// public, flat re-exports
pub use error::Error;

pub use buffer::{InterleavedBuffer, PlanarBuffer, SampleBuffer};
pub use mapper::CoordinateMapper;
pub use range::SampleRange;
pub use selection::{Selection, SelectionHandle};
pub use viewport::{
    gesture::{PanGesture, ZoomGesture},
    Viewport, ViewportController, ViewportOptions,
};
pub use waveform::{ChannelMode, PeakPair, WaveformData};
pub use worker::{ReductionRequest, ReductionResult, ReductionWorker};

// public mods
pub mod render;
pub mod waveform;
