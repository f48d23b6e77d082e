//! # Voice Pitch
//! *voice_pitch* estimates the fundamental frequency of a voice signal from
//! 16-bit PCM audio, one fixed-size frame at a time, by picking the strongest
//! DFT bin inside a configured frequency band.
//!
//! # Modes
//!   * [Batch][pipeline::batch]: a whole recording is cut into frames and every
//!     frame gets an estimate.
//!   * [Streaming][pipeline::stream]: on a fixed cadence the latest captured
//!     frame is analyzed and appended to a bounded [PitchTimeSeries].
//!
//! Capture devices and display are left to the application; they plug in
//! through [FrameSource][capture::FrameSource] and
//! [EstimateSink][capture::EstimateSink].
//!
//! # Examples
//! ```
//! use voice_pitch::{analyze_buffer, PipelineConfig, RawSampleBuffer};
//!
//! fn main() -> voice_pitch::Result<()> {
//!     const SAMPLE_RATE: usize = 44100;
//!     const SIZE: usize = 1024;
//!
//!     // Two frames of a 220 Hz tone at half amplitude, as 16-bit PCM.
//!     let dt = 1.0 / SAMPLE_RATE as f64;
//!     let freq = 220.0;
//!     let bytes: Vec<u8> = (0..2 * SIZE)
//!         .map(|x| (0.5 * (2.0 * std::f64::consts::PI * x as f64 * dt * freq).sin() * 32767.0) as i16)
//!         .flat_map(|s| s.to_le_bytes())
//!         .collect();
//!     let buffer = RawSampleBuffer::new(bytes, SAMPLE_RATE, 2);
//!
//!     let config = PipelineConfig::default().with_frame_size(SIZE);
//!     let estimates = analyze_buffer::<f64>(&buffer, config)?;
//!
//!     for estimate in &estimates {
//!         println!("Frame {}: {:.1} Hz", estimate.index, estimate.frequency);
//!     }
//!     Ok(())
//! }
//! ```

pub use capture::RawSampleBuffer;
pub use config::PipelineConfig;
pub use error::{PitchError, Result};
pub use pipeline::{analyze_buffer, analyze_wav};
pub use series::{PitchEstimate, PitchTimeSeries};

pub mod capture;
pub mod config;
pub mod detector;
pub mod error;
pub mod float;
pub mod normalizer;
pub mod pipeline;
pub mod segmenter;
pub mod series;
pub mod utils;
