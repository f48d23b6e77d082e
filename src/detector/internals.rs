use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};

use crate::config::validate_frame_size;
use crate::error::Result;
use crate::float::Float;
use crate::utils::buffer::{copy_real_to_complex, magnitudes};
use crate::utils::buffer::{new_complex_buffer, new_real_buffer};

/// Data structure to hold the FFT plan and any buffers needed for a spectrum.
/// Everything is allocated once per frame size and reused for every frame.
pub struct DetectorInternals<T>
where
    T: Float,
{
    pub size: usize,
    fft: Arc<dyn Fft<T>>,
    signal_complex: Vec<Complex<T>>,
    scratch: Vec<Complex<T>>,
    spectrum: Vec<T>,
}

impl<T> DetectorInternals<T>
where
    T: Float,
{
    pub fn new(size: usize) -> Result<Self> {
        validate_frame_size(size)?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let scratch = new_complex_buffer(fft.get_inplace_scratch_len());

        Ok(DetectorInternals {
            size,
            fft,
            signal_complex: new_complex_buffer(size),
            scratch,
            spectrum: new_real_buffer(size / 2),
        })
    }

    /// Compute the magnitude of bins `0..size / 2` of the DFT of `signal`.
    /// The upper half mirrors the lower half for real input and is skipped.
    ///
    /// rustfft does not normalize, so magnitudes scale with `size`.
    pub fn magnitude_spectrum(&mut self, signal: &[T]) -> &[T] {
        assert_eq!(signal.len(), self.size);

        copy_real_to_complex(signal, &mut self.signal_complex);
        self.fft
            .process_with_scratch(&mut self.signal_complex, &mut self.scratch);
        magnitudes(&self.signal_complex[..self.size / 2], &mut self.spectrum);

        &self.spectrum
    }
}
