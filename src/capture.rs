//! Seams to the capture and display sides of the application.
//!
//! Device access and session lifecycle live outside this crate. Capture code
//! hands over owned byte buffers; display code receives estimates.
use std::io::Read;
use std::path::Path;

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError};
use tracing::debug;

use crate::error::{PitchError, Result};
use crate::float::Float;
use crate::normalizer::SampleEncoding;
use crate::series::PitchEstimate;

/// A complete recording, as encoded bytes plus the metadata needed to decode it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSampleBuffer {
    bytes: Vec<u8>,
    sample_rate: usize,
    bytes_per_sample: usize,
}

impl RawSampleBuffer {
    pub fn new(bytes: Vec<u8>, sample_rate: usize, bytes_per_sample: usize) -> Self {
        RawSampleBuffer {
            bytes,
            sample_rate,
            bytes_per_sample,
        }
    }

    /// Read a 16-bit integer PCM WAV file. Only the first channel of a
    /// multichannel file is kept.
    pub fn from_wav<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = hound::WavReader::open(path)?;
        Self::from_hound(reader)
    }

    pub fn from_wav_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = hound::WavReader::new(reader)?;
        Self::from_hound(reader)
    }

    fn from_hound<R: Read>(mut reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
            return Err(PitchError::UnsupportedEncoding {
                bytes_per_sample: (spec.bits_per_sample as usize + 7) / 8,
            });
        }

        let channels = spec.channels.max(1) as usize;
        let mut bytes = Vec::with_capacity(reader.len() as usize / channels * 2);
        for sample in reader.samples::<i16>().step_by(channels) {
            bytes.extend_from_slice(&sample?.to_le_bytes());
        }
        debug!(
            sample_rate = spec.sample_rate,
            channels,
            samples = bytes.len() / 2,
            "decoded wav"
        );

        Ok(RawSampleBuffer::new(
            bytes,
            spec.sample_rate as usize,
            SampleEncoding::Pcm16.bytes_per_sample(),
        ))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn sample_rate(&self) -> usize {
        self.sample_rate
    }

    pub fn bytes_per_sample(&self) -> usize {
        self.bytes_per_sample
    }

    /// Number of whole samples in the buffer.
    pub fn sample_count(&self) -> usize {
        if self.bytes_per_sample == 0 {
            return 0;
        }
        self.bytes.len() / self.bytes_per_sample
    }
}

/// Pull side of a live capture.
pub trait FrameSource {
    /// The most recent captured frame, or `None` if nothing is available yet
    /// (or any more). An error ends the streaming session.
    fn try_latest_frame(&mut self) -> Result<Option<Vec<u8>>>;
}

/// Serves a recording one frame per call, as if it were being captured live.
pub struct ReplaySource {
    buffer: RawSampleBuffer,
    frame_bytes: usize,
    position: usize,
}

impl ReplaySource {
    pub fn new(buffer: RawSampleBuffer, frame_size: usize) -> Self {
        let frame_bytes = frame_size.saturating_mul(buffer.bytes_per_sample());
        ReplaySource {
            buffer,
            frame_bytes,
            position: 0,
        }
    }

    pub fn remaining_frames(&self) -> usize {
        if self.frame_bytes == 0 {
            return 0;
        }
        (self.buffer.bytes().len() - self.position) / self.frame_bytes
    }
}

impl FrameSource for ReplaySource {
    fn try_latest_frame(&mut self) -> Result<Option<Vec<u8>>> {
        if self.remaining_frames() == 0 {
            return Ok(None);
        }
        let start = self.position;
        self.position += self.frame_bytes;
        Ok(Some(self.buffer.bytes()[start..self.position].to_vec()))
    }
}

/// A capture callback pushing buffers into a channel. Older buffers queued
/// since the last pull are skipped in favour of the newest one.
impl FrameSource for Receiver<Vec<u8>> {
    fn try_latest_frame(&mut self) -> Result<Option<Vec<u8>>> {
        let mut latest = None;
        let mut skipped = 0usize;
        loop {
            match self.try_recv() {
                Ok(frame) => {
                    if latest.replace(frame).is_some() {
                        skipped += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        if skipped > 0 {
            debug!(skipped, "skipped stale capture buffers");
        }
        Ok(latest)
    }
}

/// Receives each estimate as it is appended to a streaming history.
pub trait EstimateSink<T: Float> {
    fn on_estimate(&mut self, estimate: &PitchEstimate<T>);
}

/// Forward estimates to a display thread. A full channel drops the estimate
/// rather than stalling analysis; the history still holds it.
impl<T: Float> EstimateSink<T> for Sender<PitchEstimate<T>> {
    fn on_estimate(&mut self, estimate: &PitchEstimate<T>) {
        match self.try_send(*estimate) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => debug!(index = estimate.index, "sink full"),
            Err(TrySendError::Disconnected(_)) => {}
        }
    }
}
