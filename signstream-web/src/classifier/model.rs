//! Sequence model contract and sign vocabulary
//!
//! The trained network lives outside this crate. In the browser it runs in
//! JavaScript (tfjs / onnxruntime-web) and answers through the bridge; native
//! callers plug in anything implementing `SequenceModel`.

use crate::error::Result;

/// Label returned for a class index the vocabulary does not cover
pub const UNKNOWN_SIGN: &str = "Unknown";

/// Ordered sign labels; index i is the model's output class i
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignVocabulary {
    labels: Vec<String>,
}

impl SignVocabulary {
    pub fn new<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or(UNKNOWN_SIGN)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for SignVocabulary {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_VOCABULARY)
    }
}

/// A classifier over a `frames × features` window
pub trait SequenceModel {
    fn name(&self) -> String;

    /// `window` is row-major, oldest frame first. Returns one probability per
    /// vocabulary entry.
    fn predict(&mut self, window: &[f32], frames: usize, features: usize) -> Result<Vec<f32>>;
}
