//! Decoding of raw encoded samples into normalized amplitudes in `[-1.0, 1.0]`.
use crate::error::{PitchError, Result};
use crate::float::Float;

/// Full scale of a signed 16-bit sample.
pub const I16_SCALE: f64 = 32768.0;

/// Sample encodings understood by the normalizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleEncoding {
    /// Signed 16-bit little-endian PCM.
    Pcm16,
}

impl SampleEncoding {
    pub fn from_width(bytes_per_sample: usize) -> Result<Self> {
        match bytes_per_sample {
            2 => Ok(SampleEncoding::Pcm16),
            _ => Err(PitchError::UnsupportedEncoding { bytes_per_sample }),
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        match self {
            SampleEncoding::Pcm16 => 2,
        }
    }
}

/// Decode `bytes` into floats scaled to `[-1.0, 1.0]`.
///
/// Fails with [PitchError::UnsupportedEncoding] for any width other than 2
/// and with [PitchError::MisalignedBuffer] when `bytes` does not hold a whole
/// number of samples.
pub fn normalize<T: Float>(bytes: &[u8], bytes_per_sample: usize) -> Result<Vec<T>> {
    let mut output = Vec::with_capacity(bytes.len() / bytes_per_sample.max(1));
    normalize_into(bytes, bytes_per_sample, &mut output)?;
    Ok(output)
}

/// Like [normalize], but appends to `output` so callers can reuse its allocation.
pub fn normalize_into<T: Float>(
    bytes: &[u8],
    bytes_per_sample: usize,
    output: &mut Vec<T>,
) -> Result<()> {
    let encoding = SampleEncoding::from_width(bytes_per_sample)?;
    let width = encoding.bytes_per_sample();
    if bytes.len() % width != 0 {
        return Err(PitchError::MisalignedBuffer {
            len: bytes.len(),
            bytes_per_sample: width,
        });
    }

    let scale = T::from_f64_lossy(I16_SCALE);
    output.extend(bytes.chunks_exact(width).map(|pair| {
        let value = i16::from_le_bytes([pair[0], pair[1]]);
        T::from_f64_lossy(value as f64) / scale
    }));
    Ok(())
}

/// Scale a normalized sample back to 16-bit PCM, saturating at the range ends.
pub fn denormalize_i16<T: Float>(sample: T) -> i16 {
    let scaled = (sample.to_f64_lossy() * I16_SCALE).round();
    scaled.clamp(i16::MIN as f64, i16::MAX as f64) as i16
}

/// Encode 16-bit samples as little-endian bytes, the layout [normalize] reads.
pub fn encode_i16(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}
