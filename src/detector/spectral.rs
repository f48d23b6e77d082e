use tracing::trace;

use crate::config::{validate_frequency_range, PipelineConfig};
use crate::detector::internals::DetectorInternals;
use crate::detector::{no_pitch, PitchDetector};
use crate::error::{PitchError, Result};
use crate::float::Float;
use crate::utils::buffer::square_sum;
use crate::utils::peak::{band_bins, bin_frequency, choose_peak};

/// Picks the strongest DFT bin inside a frequency band.
///
/// The estimate is quantized to the bin grid: with a frame of `n` samples at
/// `sample_rate` Hz the result is always a multiple of `sample_rate / n`.
pub struct SpectralPeakDetector<T>
where
    T: Float,
{
    internals: DetectorInternals<T>,
    min_frequency: f64,
    max_frequency: f64,
    power_threshold: T,
}

impl<T> SpectralPeakDetector<T>
where
    T: Float,
{
    pub fn new(size: usize, min_frequency: f64, max_frequency: f64) -> Result<Self> {
        validate_frequency_range(min_frequency, max_frequency)?;
        let internals = DetectorInternals::new(size)?;
        Ok(SpectralPeakDetector {
            internals,
            min_frequency,
            max_frequency,
            power_threshold: T::zero(),
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Ok(Self::new(config.frame_size, config.min_frequency, config.max_frequency)?
            .with_power_threshold(config.power_threshold))
    }

    /// Frames whose summed squared amplitude is below `power_threshold`
    /// report [no_pitch] without being transformed.
    pub fn with_power_threshold(mut self, power_threshold: f64) -> Self {
        self.power_threshold = T::from_f64_lossy(power_threshold);
        self
    }

    /// Magnitudes of the non-redundant half of the spectrum of `frame`.
    pub fn spectrum(&mut self, frame: &[T]) -> Result<Vec<T>> {
        self.check_frame(frame)?;
        Ok(self.internals.magnitude_spectrum(frame).to_vec())
    }

    fn check_frame(&self, frame: &[T]) -> Result<()> {
        if frame.len() != self.internals.size {
            return Err(PitchError::InvalidFrameSize(frame.len()));
        }
        Ok(())
    }
}

impl<T> PitchDetector<T> for SpectralPeakDetector<T>
where
    T: Float,
{
    fn get_pitch(&mut self, frame: &[T], sample_rate: usize) -> Result<T> {
        self.check_frame(frame)?;
        if sample_rate == 0 {
            return Err(PitchError::InvalidSampleRate(sample_rate));
        }

        if self.power_threshold > T::zero() && square_sum(frame) < self.power_threshold {
            trace!("frame below power threshold");
            return Ok(no_pitch());
        }

        let size = self.internals.size;
        let (first, last) =
            match band_bins(size, sample_rate, self.min_frequency, self.max_frequency) {
                Some(bins) => bins,
                None => {
                    trace!("no bin inside the search band");
                    return Ok(no_pitch());
                }
            };

        let spectrum = self.internals.magnitude_spectrum(frame);
        Ok(choose_peak(spectrum, first, last)
            .map(|peak| T::from_f64_lossy(bin_frequency(peak.bin, size, sample_rate)))
            .unwrap_or_else(no_pitch))
    }

    fn frame_size(&self) -> usize {
        self.internals.size
    }
}
