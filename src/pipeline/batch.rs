use std::path::Path;

use tracing::debug;

use crate::capture::RawSampleBuffer;
use crate::config::PipelineConfig;
use crate::error::{PitchError, Result};
use crate::float::Float;
use crate::pipeline::FrameEstimator;
use crate::segmenter::raw_frames;
use crate::series::PitchEstimate;

/// Analyzes whole recordings in one sequential pass.
pub struct BatchPipeline<T>
where
    T: Float,
{
    estimator: FrameEstimator<T>,
}

impl<T> BatchPipeline<T>
where
    T: Float,
{
    pub fn new(config: PipelineConfig) -> Result<Self> {
        Ok(BatchPipeline {
            estimator: FrameEstimator::new(config)?,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        self.estimator.config()
    }

    /// One estimate per whole frame of `buffer`, indexed from 0 in frame order.
    ///
    /// The buffer's own sample rate and encoding are used for decoding. The
    /// result is not bounded by the configured capacity. A buffer shorter
    /// than one frame yields an empty report.
    pub fn analyze(&mut self, buffer: &RawSampleBuffer) -> Result<Vec<PitchEstimate<T>>> {
        let sample_rate = buffer.sample_rate();
        if sample_rate == 0 {
            return Err(PitchError::InvalidSampleRate(sample_rate));
        }
        if sample_rate != self.config().sample_rate {
            debug!(
                buffer = sample_rate,
                configured = self.config().sample_rate,
                "analyzing at the buffer's sample rate"
            );
        }

        let frame_size = self.config().frame_size;
        let bytes_per_sample = buffer.bytes_per_sample();
        let frames = raw_frames(buffer.bytes(), frame_size, bytes_per_sample);
        let mut estimates = Vec::with_capacity(frames.len());
        for (index, frame) in frames.enumerate() {
            let frequency = self
                .estimator
                .estimate_bytes(frame, bytes_per_sample, sample_rate)?;
            estimates.push(PitchEstimate::new(index as u64, frequency));
        }

        debug!(
            frames = estimates.len(),
            pitched = estimates.iter().filter(|e| e.is_pitched()).count(),
            "batch analysis finished"
        );
        Ok(estimates)
    }
}

/// Build a [BatchPipeline] for `config` and run it over `buffer`.
pub fn analyze_buffer<T: Float>(
    buffer: &RawSampleBuffer,
    config: PipelineConfig,
) -> Result<Vec<PitchEstimate<T>>> {
    BatchPipeline::new(config)?.analyze(buffer)
}

/// Decode a 16-bit PCM WAV file and run a batch analysis over it.
pub fn analyze_wav<T: Float, P: AsRef<Path>>(
    path: P,
    config: PipelineConfig,
) -> Result<Vec<PitchEstimate<T>>> {
    let mut pipeline = BatchPipeline::new(config)?;
    let buffer = RawSampleBuffer::from_wav(path)?;
    pipeline.analyze(&buffer)
}
