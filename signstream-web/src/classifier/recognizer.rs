//! Sign recognizer - gesture buffer plus confidence-gated classification
//!
//! Two ways to classify a READY window:
//! - `recognize_sign` calls a `SequenceModel` in place.
//! - `request_inference` / `complete_inference` split the call for a model
//!   that answers later (the JS side). Each request carries the frame
//!   sequence number it was cut at; completions for frames at or before the
//!   last applied one, or from before a `clear_buffer`, are dropped.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::buffer::GestureBuffer;
use super::features::{FeatureVector, FEATURE_COUNT};
use super::model::{SequenceModel, SignVocabulary};
use crate::error::{Error, Result};

/// Default minimum probability for a sign to be reported
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    pub label: String,
    pub confidence: f32,
}

/// A window handed to an asynchronous model
#[derive(Debug, Clone)]
pub struct InferenceRequest {
    /// Frame sequence number of the newest frame in the window
    pub ticket: u64,
    pub frames: usize,
    pub features: usize,
    pub window: Vec<f32>,
}

pub struct SignRecognizer {
    buffer: GestureBuffer,
    vocabulary: SignVocabulary,
    threshold: f32,
    /// Whether the external model has reported itself loaded
    model_ready: bool,
    /// Frames pushed since creation
    frame_seq: u64,
    /// Sequence number at the last `clear_buffer`
    cleared_at: u64,
    last_applied: Option<u64>,
}

impl SignRecognizer {
    pub fn new(capacity: usize, vocabulary: SignVocabulary, threshold: f32) -> Self {
        Self {
            buffer: GestureBuffer::with_capacity(capacity),
            vocabulary,
            threshold,
            model_ready: false,
            frame_seq: 0,
            cleared_at: 0,
            last_applied: None,
        }
    }

    /// Append a frame; true once the window is full
    pub fn add_frame(&mut self, features: FeatureVector) -> bool {
        self.frame_seq += 1;
        self.buffer.push(features)
    }

    pub fn is_ready(&self) -> bool {
        self.buffer.is_ready()
    }

    pub fn buffered_frames(&self) -> usize {
        self.buffer.len()
    }

    pub fn set_model_ready(&mut self, ready: bool) {
        self.model_ready = ready;
    }

    /// Empty the window and invalidate outstanding requests
    pub fn clear_buffer(&mut self) {
        self.buffer.clear();
        self.cleared_at = self.frame_seq;
    }

    /// Classify the current window with `model`. None while FILLING, without
    /// a model, on inference failure, or below the confidence gate.
    pub fn recognize_sign(
        &mut self,
        model: Option<&mut dyn SequenceModel>,
    ) -> Option<RecognitionResult> {
        if !self.buffer.is_ready() {
            return None;
        }
        let model = model?;
        let window = self.buffer.as_flat();
        let ticket = self.frame_seq;

        match model.predict(&window, self.buffer.len(), FEATURE_COUNT) {
            Ok(probabilities) => self.apply(ticket, &probabilities),
            Err(err) => {
                warn!("Sign model '{}' failed: {}", model.name(), err);
                None
            }
        }
    }

    /// Cut the current window for an external model. None while FILLING or
    /// before the model is ready.
    pub fn request_inference(&self) -> Option<InferenceRequest> {
        if !self.buffer.is_ready() || !self.model_ready {
            return None;
        }
        Some(InferenceRequest {
            ticket: self.frame_seq,
            frames: self.buffer.len(),
            features: FEATURE_COUNT,
            window: self.buffer.as_flat(),
        })
    }

    /// Apply an external model's answer for `ticket`
    pub fn complete_inference(
        &mut self,
        ticket: u64,
        probabilities: &[f32],
    ) -> Option<RecognitionResult> {
        if ticket <= self.cleared_at {
            debug!("Dropping result for frame {} from before buffer clear", ticket);
            return None;
        }
        if ticket > self.frame_seq {
            warn!("Dropping result for frame {} that was never buffered", ticket);
            return None;
        }
        if self.last_applied.is_some_and(|last| ticket <= last) {
            debug!("Dropping stale result for frame {}", ticket);
            return None;
        }
        self.apply(ticket, probabilities)
    }

    fn apply(&mut self, ticket: u64, probabilities: &[f32]) -> Option<RecognitionResult> {
        self.last_applied = Some(ticket);
        match self.gate(probabilities) {
            Ok(result) => result,
            Err(err) => {
                warn!("Discarding prediction for frame {}: {}", ticket, err);
                None
            }
        }
    }

    /// Argmax plus confidence gate
    fn gate(&self, probabilities: &[f32]) -> Result<Option<RecognitionResult>> {
        if probabilities.len() != self.vocabulary.len() {
            return Err(Error::Inference(format!(
                "expected {} probabilities, got {}",
                self.vocabulary.len(),
                probabilities.len()
            )));
        }
        if probabilities.iter().any(|p| !p.is_finite()) {
            return Err(Error::Inference("non-finite probability".into()));
        }

        let Some((index, confidence)) = probabilities
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
        else {
            return Ok(None);
        };

        if confidence > self.threshold {
            Ok(Some(RecognitionResult {
                label: self.vocabulary.label(index).to_string(),
                confidence,
            }))
        } else {
            debug!(
                "Prediction '{}' at {:.2} below gate {:.2}",
                self.vocabulary.label(index),
                confidence,
                self.threshold
            );
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::buffer::BUFFER_SIZE;

    struct FixedModel {
        output: Result<Vec<f32>>,
        calls: usize,
        last_shape: (usize, usize, usize),
    }

    impl FixedModel {
        fn answering(probabilities: Vec<f32>) -> Self {
            Self { output: Ok(probabilities), calls: 0, last_shape: (0, 0, 0) }
        }

        fn failing() -> Self {
            Self {
                output: Err(Error::Inference("NaN in layer 2".into())),
                calls: 0,
                last_shape: (0, 0, 0),
            }
        }
    }

    impl SequenceModel for FixedModel {
        fn name(&self) -> String {
            "fixed".to_string()
        }

        fn predict(&mut self, window: &[f32], frames: usize, features: usize) -> Result<Vec<f32>> {
            self.calls += 1;
            self.last_shape = (window.len(), frames, features);
            match &self.output {
                Ok(p) => Ok(p.clone()),
                Err(e) => Err(Error::Inference(e.to_string())),
            }
        }
    }

    fn one_hot(index: usize, p: f32) -> Vec<f32> {
        let rest = (1.0 - p) / 9.0;
        (0..10).map(|i| if i == index { p } else { rest }).collect()
    }

    fn recognizer() -> SignRecognizer {
        SignRecognizer::new(BUFFER_SIZE, SignVocabulary::default(), CONFIDENCE_THRESHOLD)
    }

    fn fill(recognizer: &mut SignRecognizer, frames: usize) -> bool {
        let mut ready = false;
        for i in 0..frames {
            ready = recognizer.add_frame([i as f32 * 0.01; FEATURE_COUNT]);
        }
        ready
    }

    #[test]
    fn test_filling_never_recognizes() {
        let mut r = recognizer();
        let mut model = FixedModel::answering(one_hot(0, 0.95));
        assert!(!fill(&mut r, BUFFER_SIZE - 1));
        assert!(r.recognize_sign(Some(&mut model)).is_none());
        assert_eq!(model.calls, 0);
    }

    #[test]
    fn test_confident_prediction_is_reported() {
        let mut r = recognizer();
        let mut model = FixedModel::answering(one_hot(2, 0.9));
        assert!(fill(&mut r, BUFFER_SIZE));
        let result = r.recognize_sign(Some(&mut model)).unwrap();
        assert_eq!(result.label, "Yes");
        assert!(result.confidence > 0.7);
        assert_eq!(model.last_shape, (BUFFER_SIZE * FEATURE_COUNT, BUFFER_SIZE, FEATURE_COUNT));
    }

    #[test]
    fn test_gate_is_strict() {
        let mut r = recognizer();
        fill(&mut r, BUFFER_SIZE);
        let mut at_gate = FixedModel::answering(one_hot(1, 0.7));
        assert!(r.recognize_sign(Some(&mut at_gate)).is_none());
        let mut below = FixedModel::answering(one_hot(1, 0.5));
        assert!(r.recognize_sign(Some(&mut below)).is_none());
    }

    #[test]
    fn test_missing_model_returns_none() {
        let mut r = recognizer();
        fill(&mut r, BUFFER_SIZE);
        assert!(r.recognize_sign(None).is_none());
        assert!(r.request_inference().is_none());
    }

    #[test]
    fn test_inference_failure_keeps_buffer() {
        let mut r = recognizer();
        fill(&mut r, BUFFER_SIZE);
        let mut broken = FixedModel::failing();
        assert!(r.recognize_sign(Some(&mut broken)).is_none());
        assert!(r.is_ready());
        r.add_frame([0.0; FEATURE_COUNT]);
        let mut healthy = FixedModel::answering(one_hot(0, 0.8));
        assert_eq!(r.recognize_sign(Some(&mut healthy)).unwrap().label, "Hello");
    }

    #[test]
    fn test_malformed_probabilities_are_failures() {
        let mut r = recognizer();
        fill(&mut r, BUFFER_SIZE);
        let mut short = FixedModel::answering(vec![0.9, 0.1]);
        assert!(r.recognize_sign(Some(&mut short)).is_none());
        r.add_frame([0.0; FEATURE_COUNT]);
        let mut nan = one_hot(0, 0.9);
        nan[3] = f32::NAN;
        let mut nan_model = FixedModel::answering(nan);
        assert!(r.recognize_sign(Some(&mut nan_model)).is_none());
        assert!(r.is_ready());
    }

    #[test]
    fn test_clear_resets_readiness() {
        let mut r = recognizer();
        fill(&mut r, BUFFER_SIZE);
        r.clear_buffer();
        assert!(!r.is_ready());
        assert!(!fill(&mut r, BUFFER_SIZE - 1));
        assert!(r.add_frame([0.0; FEATURE_COUNT]));
    }

    #[test]
    fn test_async_roundtrip() {
        let mut r = recognizer();
        r.set_model_ready(true);
        fill(&mut r, BUFFER_SIZE);
        let request = r.request_inference().unwrap();
        assert_eq!(request.ticket, BUFFER_SIZE as u64);
        assert_eq!(request.window.len(), BUFFER_SIZE * FEATURE_COUNT);
        let result = r.complete_inference(request.ticket, &one_hot(4, 0.85)).unwrap();
        assert_eq!(result.label, "Please");
    }

    #[test]
    fn test_out_of_order_completion_is_dropped() {
        let mut r = recognizer();
        r.set_model_ready(true);
        fill(&mut r, BUFFER_SIZE);
        let older = r.request_inference().unwrap();
        r.add_frame([0.0; FEATURE_COUNT]);
        let newer = r.request_inference().unwrap();

        assert!(r.complete_inference(newer.ticket, &one_hot(5, 0.9)).is_some());
        assert!(r.complete_inference(older.ticket, &one_hot(6, 0.9)).is_none());
        assert!(r.complete_inference(newer.ticket, &one_hot(6, 0.9)).is_none());
    }

    #[test]
    fn test_completion_from_before_clear_is_dropped() {
        let mut r = recognizer();
        r.set_model_ready(true);
        fill(&mut r, BUFFER_SIZE);
        let request = r.request_inference().unwrap();
        r.clear_buffer();
        assert!(r.complete_inference(request.ticket, &one_hot(0, 0.99)).is_none());
    }

    #[test]
    fn test_unknown_ticket_is_dropped() {
        let mut r = recognizer();
        r.set_model_ready(true);
        fill(&mut r, BUFFER_SIZE);
        assert!(r.complete_inference(999, &one_hot(0, 0.99)).is_none());
    }
}
