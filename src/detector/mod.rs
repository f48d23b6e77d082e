//! Frame-level pitch detection.
//!
//! A *detector* turns one fixed-size frame of normalized samples into a single
//! frequency estimate, or [no_pitch] when nothing usable is found.
use crate::error::Result;
use crate::float::Float;

pub mod internals;
pub mod spectral;

/// The frequency reported for a frame with no dominant component in band.
pub fn no_pitch<T: Float>() -> T {
    T::zero()
}

pub trait PitchDetector<T>
where
    T: Float,
{
    /// Estimate the pitch of `frame`, sampled at `sample_rate` Hz.
    fn get_pitch(&mut self, frame: &[T], sample_rate: usize) -> Result<T>;

    /// Number of samples every frame passed to [get_pitch](Self::get_pitch) must hold.
    fn frame_size(&self) -> usize;
}
