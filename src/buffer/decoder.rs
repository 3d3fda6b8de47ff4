use std::{fs::File, io, path::Path, sync::Arc};

use symphonia::core::{
    audio::{SampleBuffer as DecodeBuffer, SignalSpec},
    codecs::{CodecParameters, Decoder, DecoderOptions},
    conv::ConvertibleSample,
    errors::Error as SymphoniaError,
    formats::{FormatOptions, FormatReader},
    io::{MediaSource, MediaSourceStream},
    meta::MetadataOptions,
    probe::Hint,
};

use super::InterleavedBuffer;
use crate::error::Error;

// -------------------------------------------------------------------------------------------------

/// Decodes the default track of an audio file with Symphonia.
struct AudioDecoder {
    track_id: u32,
    decoder: Box<dyn Decoder>,
    format: Box<dyn FormatReader>,
}

impl AudioDecoder {
    /// Create a new decoder from the given file path.
    fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => Error::MediaFileNotFound,
            _ => Error::IoError(err),
        })?;
        let mut hint = Hint::new();
        if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
            hint.with_extension(extension);
        }
        Self::from_source(Box::new(file), hint)
    }

    /// Create a new decoder from the given encoded file contents.
    fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        Self::from_source(Box::new(io::Cursor::new(bytes)), Hint::new())
    }

    fn from_source(source: Box<dyn MediaSource>, hint: Hint) -> Result<Self, Error> {
        let source_stream = MediaSourceStream::new(source, Default::default());
        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                source_stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|_| Error::MediaFileProbeError)?;

        let format = probed.format;
        let track = format.default_track().ok_or(Error::MediaFileNotFound)?;
        let track_id = track.id;
        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|err| Error::AudioDecodingError(Box::new(err)))?;

        Ok(Self {
            track_id,
            decoder,
            format,
        })
    }

    fn codec_params(&self) -> &CodecParameters {
        self.decoder.codec_params()
    }

    fn signal_spec(&self) -> Result<SignalSpec, Error> {
        match (self.codec_params().sample_rate, self.codec_params().channels) {
            (Some(rate), Some(channels)) => Ok(SignalSpec { rate, channels }),
            _ => Err(Error::MediaFileProbeError),
        }
    }

    /// Decode the next packet of the selected track into `samples`. Returns `None` at the end of
    /// the stream or on unrecoverable errors. Corrupt packets are skipped.
    fn read_packet<S>(&mut self, samples: &mut DecodeBuffer<S>) -> Option<()>
    where
        S: ConvertibleSample,
    {
        loop {
            let packet = match self.format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(err)) if err.kind() == io::ErrorKind::UnexpectedEof => {
                    return None;
                }
                Err(err) => {
                    log::error!("Audio file decoder format error: {err}");
                    return None;
                }
            };
            if packet.track_id() != self.track_id {
                continue;
            }
            match self.decoder.decode(&packet) {
                Ok(decoded) => {
                    samples.copy_interleaved_ref(decoded);
                    return Some(());
                }
                Err(SymphoniaError::IoError(err)) => {
                    log::error!("Audio file decoder I/O error: {err}");
                }
                Err(SymphoniaError::DecodeError(err)) => {
                    log::error!("Audio file decoder error: {err}");
                }
                Err(err) => {
                    log::error!("Audio file decoder fatal error: {err}");
                    return None;
                }
            }
        }
    }

    /// Decode all remaining packets into a single interleaved buffer.
    fn decode_all(mut self) -> Result<InterleavedBuffer, Error> {
        let signal_spec = self.signal_spec()?;
        let channel_count = signal_spec.channels.count();

        // prealloc entire buffer, when the decoder gives us a frame hint
        let capacity = self.codec_params().n_frames.unwrap_or(0) as usize * channel_count;
        let mut samples = Vec::with_capacity(capacity);

        // decode the entire file in chunks of max_frames_per_packet sizes
        let decode_buffer_capacity = self
            .codec_params()
            .max_frames_per_packet
            .unwrap_or(16 * 1024 * channel_count as u64);
        let mut decode_buffer = DecodeBuffer::<f32>::new(decode_buffer_capacity, signal_spec);
        while self.read_packet(&mut decode_buffer).is_some() {
            samples.extend_from_slice(decode_buffer.samples());
        }
        if samples.is_empty() {
            return Err(Error::AudioDecodingError(Box::new(
                SymphoniaError::DecodeError("file contains no decodable audio"),
            )));
        }
        log::debug!(
            "Decoded {} frames with {} channels at {} Hz",
            samples.len() / channel_count,
            channel_count,
            signal_spec.rate
        );
        InterleavedBuffer::with_shared(Arc::new(samples), channel_count, signal_spec.rate)
    }
}

// -------------------------------------------------------------------------------------------------

impl InterleavedBuffer {
    /// Decode the audio file at the given path into a new interleaved sample buffer.
    ///
    /// This function will return an error if the file can't be found or failed to decode.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        AudioDecoder::from_file(path)?.decode_all()
    }

    /// Decode the given encoded audio file contents into a new interleaved sample buffer.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Error> {
        AudioDecoder::from_bytes(bytes)?.decode_all()
    }
}

// -------------------------------------------------------------------------------------------------
