//! Bounded, chronologically ordered history of pitch estimates.
use std::collections::VecDeque;

use crate::float::Float;

/// One estimate on the logical time axis: `index` counts analyzed frames
/// (or ticks), `frequency` is in Hz with `0.0` meaning no pitch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchEstimate<T: Float> {
    pub index: u64,
    pub frequency: T,
}

impl<T: Float> PitchEstimate<T> {
    pub fn new(index: u64, frequency: T) -> Self {
        PitchEstimate { index, frequency }
    }

    pub fn is_pitched(&self) -> bool {
        self.frequency > T::zero()
    }
}

/// A FIFO of at most `capacity` estimates. Appending to a full series evicts
/// the oldest entry. Indices keep counting across evictions.
#[derive(Debug, Clone)]
pub struct PitchTimeSeries<T: Float> {
    entries: VecDeque<PitchEstimate<T>>,
    capacity: usize,
    next_index: u64,
}

impl<T: Float> PitchTimeSeries<T> {
    /// A `capacity` of zero is raised to one; pipelines reject it earlier.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PitchTimeSeries {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            next_index: 0,
        }
    }

    /// Append `frequency` as the next estimate and return it.
    pub fn append(&mut self, frequency: T) -> PitchEstimate<T> {
        let estimate = PitchEstimate::new(self.next_index, frequency);
        self.next_index += 1;
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(estimate);
        estimate
    }

    pub fn latest(&self) -> Option<PitchEstimate<T>> {
        self.entries.back().copied()
    }

    /// Copy of the current contents, oldest first.
    pub fn snapshot(&self) -> Vec<PitchEstimate<T>> {
        self.entries.iter().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PitchEstimate<T>> + '_ {
        self.entries.iter()
    }

    /// The index the next appended estimate will receive.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop every entry and restart indices at zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next_index = 0;
    }
}
