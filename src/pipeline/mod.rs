//! Wiring of normalizer, segmenter, detector and history into the batch and
//! streaming modes.
use tracing::{trace, warn};

use crate::capture::FrameSource;
use crate::config::PipelineConfig;
use crate::detector::spectral::SpectralPeakDetector;
use crate::detector::{no_pitch, PitchDetector};
use crate::error::Result;
use crate::float::Float;
use crate::normalizer::normalize_into;
use crate::segmenter::latest_frame;

pub mod batch;
pub mod stream;

pub use batch::{analyze_buffer, analyze_wav, BatchPipeline};
pub use stream::{StreamingPipeline, StreamingSession};

/// Turns encoded frames into frequencies. Owns the detector and a sample
/// buffer reused across frames.
pub struct FrameEstimator<T>
where
    T: Float,
{
    config: PipelineConfig,
    detector: SpectralPeakDetector<T>,
    samples: Vec<T>,
}

impl<T> FrameEstimator<T>
where
    T: Float,
{
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let detector = SpectralPeakDetector::from_config(&config)?;
        Ok(FrameEstimator {
            samples: Vec::with_capacity(config.frame_size),
            config,
            detector,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Estimate the pitch of one encoded frame of exactly `frame_size` samples.
    ///
    /// A frame that cannot be decoded yields [no_pitch] and a warning instead
    /// of an error, so one corrupt frame does not end a run.
    pub fn estimate_bytes(
        &mut self,
        bytes: &[u8],
        bytes_per_sample: usize,
        sample_rate: usize,
    ) -> Result<T> {
        if !self.decode(bytes, bytes_per_sample) {
            return Ok(no_pitch());
        }
        self.detector.get_pitch(&self.samples, sample_rate)
    }

    /// Pull the latest captured buffer from `source` and estimate the pitch of
    /// its most recent `frame_size` samples.
    ///
    /// `None` means there was nothing to analyze: no buffer, or a buffer too
    /// short to fill a frame.
    pub fn estimate_from<S>(&mut self, source: &mut S) -> Result<Option<T>>
    where
        S: FrameSource + ?Sized,
    {
        let bytes = match source.try_latest_frame()? {
            Some(bytes) => bytes,
            None => {
                trace!("no frame available");
                return Ok(None);
            }
        };

        if !self.decode(&bytes, self.config.bytes_per_sample) {
            return Ok(Some(no_pitch()));
        }
        let frame = match latest_frame(&self.samples, self.config.frame_size) {
            Some(frame) => frame,
            None => {
                trace!(samples = self.samples.len(), "captured buffer shorter than a frame");
                return Ok(None);
            }
        };
        self.detector
            .get_pitch(frame, self.config.sample_rate)
            .map(Some)
    }

    /// Decode `bytes` into the sample buffer. Returns false, after logging, for
    /// a buffer that cannot be decoded.
    fn decode(&mut self, bytes: &[u8], bytes_per_sample: usize) -> bool {
        self.samples.clear();
        match normalize_into(bytes, bytes_per_sample, &mut self.samples) {
            Ok(()) => true,
            Err(err) => {
                warn!(%err, "dropping undecodable frame");
                false
            }
        }
    }
}
