//! Pipeline configuration.
//!
//! A [PipelineConfig] is built once, validated, and then shared read-only by
//! every stage of a pipeline for its whole lifetime.
use std::time::Duration;

use crate::error::{PitchError, Result};
use crate::normalizer::SampleEncoding;

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Sample rate of the captured audio, in Hz.
    pub sample_rate: usize,
    /// Width of one encoded sample. Only 16-bit PCM (2) is supported.
    pub bytes_per_sample: usize,
    /// Number of samples per analysis frame. Must be even and at least 2.
    pub frame_size: usize,
    /// Lower bound of the pitch search band, in Hz.
    pub min_frequency: f64,
    /// Upper bound of the pitch search band, in Hz.
    pub max_frequency: f64,
    /// Maximum number of estimates kept by a streaming session.
    pub capacity: usize,
    /// Streaming cadence.
    pub tick_interval: Duration,
    /// Frames whose summed squared amplitude falls below this are reported
    /// as unvoiced without running the transform. `0.0` disables the gate.
    pub power_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            bytes_per_sample: 2,
            frame_size: 1024,
            min_frequency: 80.0,
            max_frequency: 1000.0,
            capacity: 100,
            tick_interval: Duration::from_millis(100),
            power_threshold: 0.0,
        }
    }
}

impl PipelineConfig {
    pub fn with_sample_rate(mut self, sample_rate: usize) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_frame_size(mut self, frame_size: usize) -> Self {
        self.frame_size = frame_size;
        self
    }

    pub fn with_frequency_range(mut self, min_frequency: f64, max_frequency: f64) -> Self {
        self.min_frequency = min_frequency;
        self.max_frequency = max_frequency;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_power_threshold(mut self, power_threshold: f64) -> Self {
        self.power_threshold = power_threshold;
        self
    }

    /// The sample encoding described by `bytes_per_sample`.
    pub fn encoding(&self) -> Result<SampleEncoding> {
        SampleEncoding::from_width(self.bytes_per_sample)
    }

    /// Check every constraint. Pipelines call this in their constructors, so
    /// an invalid configuration never produces a partially built pipeline.
    pub fn validate(&self) -> Result<()> {
        validate_frame_size(self.frame_size)?;
        validate_frequency_range(self.min_frequency, self.max_frequency)?;
        if self.sample_rate == 0 {
            return Err(PitchError::InvalidSampleRate(self.sample_rate));
        }
        self.encoding()?;
        if self.capacity == 0 {
            return Err(PitchError::InvalidCapacity);
        }
        if self.tick_interval.is_zero() {
            return Err(PitchError::InvalidTickInterval);
        }
        Ok(())
    }
}

pub(crate) fn validate_frame_size(frame_size: usize) -> Result<()> {
    if frame_size < 2 || frame_size % 2 != 0 {
        return Err(PitchError::InvalidFrameSize(frame_size));
    }
    Ok(())
}

pub(crate) fn validate_frequency_range(min: f64, max: f64) -> Result<()> {
    let valid = min.is_finite() && max.is_finite() && min >= 0.0 && max >= 0.0 && min <= max;
    if !valid {
        return Err(PitchError::InvalidFrequencyRange { min, max });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_odd_and_tiny_frames() {
        for size in [0, 1, 3, 1023] {
            let config = PipelineConfig::default().with_frame_size(size);
            assert!(matches!(
                config.validate(),
                Err(PitchError::InvalidFrameSize(s)) if s == size
            ));
        }
        assert!(PipelineConfig::default().with_frame_size(2).validate().is_ok());
    }

    #[test]
    fn rejects_inverted_or_negative_band() {
        let inverted = PipelineConfig::default().with_frequency_range(1000.0, 80.0);
        assert!(matches!(
            inverted.validate(),
            Err(PitchError::InvalidFrequencyRange { .. })
        ));

        let negative = PipelineConfig::default().with_frequency_range(-1.0, 80.0);
        assert!(matches!(
            negative.validate(),
            Err(PitchError::InvalidFrequencyRange { .. })
        ));

        let point = PipelineConfig::default().with_frequency_range(440.0, 440.0);
        assert!(point.validate().is_ok());
    }

    #[test]
    fn rejects_unsupported_encoding() {
        let config = PipelineConfig {
            bytes_per_sample: 3,
            ..PipelineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PitchError::UnsupportedEncoding { bytes_per_sample: 3 })
        ));
    }

    #[test]
    fn rejects_zero_capacity_rate_and_interval() {
        assert!(matches!(
            PipelineConfig::default().with_capacity(0).validate(),
            Err(PitchError::InvalidCapacity)
        ));
        assert!(matches!(
            PipelineConfig::default().with_sample_rate(0).validate(),
            Err(PitchError::InvalidSampleRate(0))
        ));
        assert!(matches!(
            PipelineConfig::default()
                .with_tick_interval(Duration::ZERO)
                .validate(),
            Err(PitchError::InvalidTickInterval)
        ));
    }
}
