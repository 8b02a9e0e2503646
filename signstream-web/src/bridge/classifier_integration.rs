//! Classifier integration - hands gesture windows to the JS model
//!
//! The sign model runs in JavaScript. JS polls `get_classification_request`
//! once the model is loaded, runs inference on the window, and answers with
//! `set_sign_result` under the same ticket. Late or stale answers are dropped
//! on the Rust side.

use tracing::{info, warn};
use wasm_bindgen::prelude::*;

use super::pipeline::with_session;
use crate::classifier::InferenceRequest;

/// A window cut for one asynchronous inference
#[wasm_bindgen]
pub struct ClassificationRequest {
    ticket: u64,
    frames: usize,
    features: usize,
    window: Vec<f32>,
}

#[wasm_bindgen]
impl ClassificationRequest {
    /// Safe as a JS number: tickets count frames up from 1
    #[wasm_bindgen(getter)]
    pub fn ticket(&self) -> f64 {
        self.ticket as f64
    }

    #[wasm_bindgen(getter)]
    pub fn frames(&self) -> usize {
        self.frames
    }

    #[wasm_bindgen(getter)]
    pub fn features(&self) -> usize {
        self.features
    }

    /// Row-major `frames × features`, oldest frame first
    #[wasm_bindgen(getter)]
    pub fn window(&self) -> Vec<f32> {
        self.window.clone()
    }
}

impl From<InferenceRequest> for ClassificationRequest {
    fn from(request: InferenceRequest) -> Self {
        Self {
            ticket: request.ticket,
            frames: request.frames,
            features: request.features,
            window: request.window,
        }
    }
}

/// Called from JS when the sign model has loaded (or failed to)
#[wasm_bindgen]
pub fn set_classifier_ready(ready: bool) {
    with_session(|session| session.set_model_ready(ready));
    info!("Sign classifier ready: {}", ready);
}

#[wasm_bindgen]
pub fn is_classifier_ready() -> bool {
    with_session(|session| session.is_model_ready())
}

/// Returns None until the buffer is full, the model is ready and recording is on
#[wasm_bindgen]
pub fn get_classification_request() -> Option<ClassificationRequest> {
    with_session(|session| session.request_inference()).map(ClassificationRequest::from)
}

/// Deliver the model's probabilities for `ticket`.
/// Returns the sign event as JSON when a sign passed the confidence gate.
#[wasm_bindgen]
pub fn set_sign_result(ticket: f64, probabilities: &[f32]) -> Option<String> {
    if !ticket.is_finite() || ticket < 1.0 {
        warn!("Ignoring sign result with invalid ticket {}", ticket);
        return None;
    }
    let event = with_session(|session| session.complete_inference(ticket as u64, probabilities))?;
    serde_json::to_string(&event)
        .map_err(|err| warn!("Failed to encode sign event: {}", err))
        .ok()
}
