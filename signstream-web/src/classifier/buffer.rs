//! Rolling gesture buffer for sequence classification
//!
//! Holds the last `capacity` feature vectors in chronological order. FILLING
//! until it holds `capacity` frames, READY from then on; the oldest frame is
//! evicted on every push once READY.

use std::collections::VecDeque;

use super::features::{FeatureVector, FEATURE_COUNT};

/// Default number of frames in the classification window
pub const BUFFER_SIZE: usize = 30;

#[derive(Debug, Clone)]
pub struct GestureBuffer {
    frames: VecDeque<FeatureVector>,
    capacity: usize,
}

impl GestureBuffer {
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            frames: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Push a new frame, evicting the oldest when full. Returns `is_ready()`.
    pub fn push(&mut self, features: FeatureVector) -> bool {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(features);
        self.is_ready()
    }

    /// Check if the buffer holds a full window
    pub fn is_ready(&self) -> bool {
        self.frames.len() == self.capacity
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns data in chronological order as a flat array
    /// Shape: [frame0.f0, frame0.f1, ..., frameN.f149]
    pub fn as_flat(&self) -> Vec<f32> {
        let mut result = Vec::with_capacity(self.frames.len() * FEATURE_COUNT);
        for frame in &self.frames {
            result.extend_from_slice(frame);
        }
        result
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }
}

impl Default for GestureBuffer {
    fn default() -> Self {
        Self::new()
    }
}
