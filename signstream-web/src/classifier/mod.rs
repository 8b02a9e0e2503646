//! Classifier module - sliding-window sign classification
//!
//! Note: in the browser the sequence model runs in JavaScript.
//! Rust handles feature extraction, frame buffering and the confidence gate.

mod buffer;
mod features;
mod model;
mod recognizer;

pub use buffer::{GestureBuffer, BUFFER_SIZE};
pub use features::{extract_features, FeatureVector, FEATURE_COUNT, HAND_FEATURES, POSE_FEATURES};
pub use model::{SequenceModel, SignVocabulary, UNKNOWN_SIGN};
pub use recognizer::{InferenceRequest, RecognitionResult, SignRecognizer, CONFIDENCE_THRESHOLD};
