use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender};

use crate::{
    buffer::SampleBuffer,
    error::Error,
    range::SampleRange,
    waveform::{self, ChannelMode, WaveformData},
};

// -------------------------------------------------------------------------------------------------

/// A waveform reduction job, tagged with the viewport version it was created for.
#[derive(Clone)]
pub struct ReductionRequest {
    version: u64,
    buffer: Arc<dyn SampleBuffer>,
    range: SampleRange,
    pixel_width: usize,
    channel_mode: ChannelMode,
}

impl ReductionRequest {
    pub fn new(
        version: u64,
        buffer: Arc<dyn SampleBuffer>,
        range: SampleRange,
        pixel_width: usize,
        channel_mode: ChannelMode,
    ) -> Self {
        Self {
            version,
            buffer,
            range,
            pixel_width,
            channel_mode,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn range(&self) -> SampleRange {
        self.range
    }

    pub fn pixel_width(&self) -> usize {
        self.pixel_width
    }

    /// Run the reduction on the calling thread.
    pub fn run(&self) -> Vec<WaveformData> {
        if self.pixel_width == 0 {
            // view is not laid out yet: nothing to draw
            return vec![WaveformData::empty(self.range)];
        }
        log::debug!(
            "Reducing frames {:?} into {} columns",
            self.range.as_range(),
            self.pixel_width
        );
        waveform::reduce_traces(
            self.buffer.as_ref(),
            self.range,
            self.pixel_width,
            self.channel_mode,
        )
    }
}

/// Reduced waveform traces of a [`ReductionRequest`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionResult {
    /// Version of the request this result was computed for.
    pub version: u64,
    pub traces: Vec<WaveformData>,
}

// -------------------------------------------------------------------------------------------------

/// Command sent from the owner to the worker thread.
enum WorkerCommand {
    Reduce(ReductionRequest),
    Shutdown,
}

// -------------------------------------------------------------------------------------------------

/// Runs waveform reductions on a background thread, for buffers or windows which are too large to
/// be reduced within a single UI frame.
///
/// Requests are handled in order, but only the newest queued request gets computed: requests
/// which got superseded while the worker was busy are dropped. Results are tagged with their
/// request's version and [`poll`](Self::poll) only hands out results which match the current
/// viewport version, so stale results never get applied.
///
/// Dropping the worker stops and joins its thread.
pub struct ReductionWorker {
    command_sender: Sender<WorkerCommand>,
    result_receiver: Receiver<ReductionResult>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ReductionWorker {
    /// Spawn a new worker thread.
    pub fn new() -> Result<Self, Error> {
        let (command_sender, command_receiver) = crossbeam_channel::unbounded();
        let (result_sender, result_receiver) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name("waveform_reduction".to_string())
            .spawn(move || Self::run(command_receiver, result_sender))?;
        log::debug!("Waveform reduction worker started");
        Ok(Self {
            command_sender,
            result_receiver,
            thread: Some(thread),
        })
    }

    /// Queue a new reduction request.
    pub fn request(&self, request: ReductionRequest) -> Result<(), Error> {
        self.command_sender.send(WorkerCommand::Reduce(request))?;
        Ok(())
    }

    /// Fetch the newest finished result for the given viewport version without blocking.
    /// Results of other versions are discarded.
    pub fn poll(&self, current_version: u64) -> Option<ReductionResult> {
        let mut latest = None;
        for result in self.result_receiver.try_iter() {
            if let Some(result) = Self::filter_stale(result, current_version) {
                latest = Some(result);
            }
        }
        latest
    }

    /// Block until a result for the given viewport version arrives or the timeout elapsed.
    /// Results of other versions are discarded.
    pub fn wait(&self, current_version: u64, timeout: Duration) -> Option<ReductionResult> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_receiver.recv_timeout(remaining) {
                Ok(result) => {
                    if let Some(result) = Self::filter_stale(result, current_version) {
                        return Some(result);
                    }
                }
                Err(_) => return None,
            }
        }
    }

    fn filter_stale(result: ReductionResult, current_version: u64) -> Option<ReductionResult> {
        if result.version == current_version {
            Some(result)
        } else {
            log::debug!(
                "Discarding stale waveform of version {} (current is {})",
                result.version,
                current_version
            );
            None
        }
    }

    fn run(command_receiver: Receiver<WorkerCommand>, result_sender: Sender<ReductionResult>) {
        'commands: while let Ok(command) = command_receiver.recv() {
            let mut request = match command {
                WorkerCommand::Reduce(request) => request,
                WorkerCommand::Shutdown => break,
            };
            // only the newest queued request is of interest
            for command in command_receiver.try_iter() {
                match command {
                    WorkerCommand::Reduce(newer_request) => {
                        log::debug!(
                            "Skipping superseded waveform request of version {}",
                            request.version
                        );
                        request = newer_request;
                    }
                    WorkerCommand::Shutdown => break 'commands,
                }
            }
            let version = request.version;
            match catch_unwind(AssertUnwindSafe(|| request.run())) {
                Ok(traces) => {
                    if let Err(err) = result_sender.send(ReductionResult { version, traces }) {
                        log::warn!("Failed to send waveform reduction result: {err}");
                        break;
                    }
                }
                Err(payload) => {
                    log::error!(
                        "Waveform reduction of version {version} panicked: {}",
                        panic_message::panic_message(&payload)
                    );
                }
            }
        }
        log::debug!("Waveform reduction worker stopped");
    }
}

impl Drop for ReductionWorker {
    fn drop(&mut self) {
        if let Err(err) = self.command_sender.send(WorkerCommand::Shutdown) {
            log::warn!("Failed to send waveform worker shutdown message: {err}");
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                log::error!("Waveform reduction worker thread panicked");
            }
        }
    }
}

// -------------------------------------------------------------------------------------------------
