//! Generic [Float] type which acts as a stand-in for `f32` or `f64`.
use rustfft::num_traits::float::FloatCore as NumFloatCore;
use rustfft::FftNum;
use std::fmt::{Debug, Display};
use std::iter::Sum;

/// Frames are processed as arrays of [Float]s. A [Float] is normally `f32` or `f64`.
///
/// Configuration is kept in `f64`; the conversions below move values in and
/// out of the working type without going through the fallible `NumCast` path.
pub trait Float: Display + Debug + NumFloatCore + FftNum + Sum {
    fn from_f64_lossy(value: f64) -> Self;
    fn to_f64_lossy(self) -> f64;
    fn sqrt(self) -> Self;
    fn from_usize_lossy(value: usize) -> Self {
        Self::from_f64_lossy(value as f64)
    }
}

impl Float for f64 {
    fn from_f64_lossy(value: f64) -> Self {
        value
    }
    fn to_f64_lossy(self) -> f64 {
        self
    }
    fn sqrt(self) -> Self {
        f64::sqrt(self)
    }
}

impl Float for f32 {
    fn from_f64_lossy(value: f64) -> Self {
        value as f32
    }
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
    fn sqrt(self) -> Self {
        f32::sqrt(self)
    }
}
