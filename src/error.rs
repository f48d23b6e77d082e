//! Error type shared by every stage of the pipeline.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PitchError>;

#[derive(Debug, Error)]
pub enum PitchError {
    #[error("unsupported sample encoding: {bytes_per_sample} bytes per sample")]
    UnsupportedEncoding { bytes_per_sample: usize },

    #[error("buffer of {len} bytes is not a whole number of {bytes_per_sample}-byte samples")]
    MisalignedBuffer { len: usize, bytes_per_sample: usize },

    #[error("invalid frame size {0}: must be even and at least 2")]
    InvalidFrameSize(usize),

    #[error("invalid frequency range [{min}, {max}] Hz")]
    InvalidFrequencyRange { min: f64, max: f64 },

    #[error("invalid sample rate {0}")]
    InvalidSampleRate(usize),

    #[error("history capacity must be at least 1")]
    InvalidCapacity,

    #[error("tick interval must be non-zero")]
    InvalidTickInterval,

    #[error("no capture device available")]
    NoDeviceAvailable,

    #[error("capture initialization failed: {0}")]
    CaptureInitFailed(String),

    #[error("capture failed: {0}")]
    Capture(String),

    #[error("streaming worker panicked")]
    WorkerPanicked,

    #[error("wav decoding failed: {0}")]
    Wav(#[from] hound::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
