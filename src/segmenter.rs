//! Slicing of sample streams into fixed-length, non-overlapping analysis frames.
//!
//! A trailing remainder shorter than the frame size is dropped, never padded.
use std::slice::ChunksExact;

use crate::float::Float;

/// Number of whole frames of `frame_size` samples in `len` samples.
pub fn frame_count(len: usize, frame_size: usize) -> usize {
    if frame_size == 0 {
        return 0;
    }
    len / frame_size
}

/// Lazily walk `samples` one frame at a time, in stream order.
pub fn frames<T: Float>(samples: &[T], frame_size: usize) -> Frames<'_, T> {
    Frames {
        chunks: samples.chunks_exact(frame_size.max(1)),
        empty: frame_size == 0,
    }
}

/// Walk encoded bytes in frames of `frame_size` samples of `bytes_per_sample`
/// bytes each. Each frame can then be normalized on its own, so a decoding
/// failure stays confined to one frame.
pub fn raw_frames(bytes: &[u8], frame_size: usize, bytes_per_sample: usize) -> ChunksExact<'_, u8> {
    let frame_bytes = frame_size.saturating_mul(bytes_per_sample).max(1);
    if frame_size == 0 || bytes_per_sample == 0 {
        return bytes[..0].chunks_exact(1);
    }
    bytes.chunks_exact(frame_bytes)
}

/// The most recent `frame_size` samples of a captured chunk, if it holds
/// that many.
pub fn latest_frame<T: Float>(samples: &[T], frame_size: usize) -> Option<&[T]> {
    if frame_size == 0 || samples.len() < frame_size {
        return None;
    }
    Some(&samples[samples.len() - frame_size..])
}

pub struct Frames<'a, T> {
    chunks: ChunksExact<'a, T>,
    empty: bool,
}

impl<'a, T> Iterator for Frames<'a, T> {
    type Item = &'a [T];

    fn next(&mut self) -> Option<Self::Item> {
        if self.empty {
            return None;
        }
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.empty {
            return (0, Some(0));
        }
        self.chunks.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Frames<'a, T> {}
