//! Session storage and the per-frame JS bridge
//!
//! Receives MediaPipe results from JavaScript as flat Float32Arrays, runs
//! them through the active session, and hands the filtered frame back as
//! JSON for drawing and display.

use std::cell::RefCell;

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::identity::FaceDescriptor;
use crate::landmarks::{parse_flat, parse_hands, LandmarkFrame};
use crate::session::SessionContext;
use crate::tic::TicProfile;

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<SessionContext> = RefCell::new(SessionContext::default());
}

pub(super) fn with_session<R>(f: impl FnOnce(&mut SessionContext) -> R) -> R {
    SESSION.with(|cell| f(&mut cell.borrow_mut()))
}

/// Log a bridge failure and turn it into a JS exception
fn reject(context: &str, err: Error) -> JsValue {
    warn!("{}: {}", context, err);
    err.into()
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Replace the pipeline with a fresh one built from `config_json`.
/// Registered users and transcripts are discarded.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let config = PipelineConfig::from_json(config_json).map_err(|err| reject("configure", err))?;
    install_config(config);
    Ok(())
}

pub(crate) fn install_config(config: PipelineConfig) {
    with_session(|session| *session = SessionContext::new(config));
}

/// Register (or reset) a user. `tics_json` is an array of tic identifiers,
/// e.g. `["eye_blink_rapid", "head_nod"]`; unknown names are ignored.
#[wasm_bindgen]
pub fn register_user(user_id: &str, tics_json: &str) -> Result<(), JsValue> {
    let profile = if tics_json.trim().is_empty() {
        TicProfile::empty()
    } else {
        TicProfile::from_json(tics_json).map_err(|err| reject("register_user", err))?
    };
    with_session(|session| session.register_user(user_id, profile));
    Ok(())
}

/// Attach a face to a registered user: either 468 × 3 mesh values or a
/// precomputed descriptor
#[wasm_bindgen]
pub fn register_face(user_id: &str, data: &[f32]) -> Result<(), JsValue> {
    let descriptor = if data.len() == crate::landmarks::face::FACE_MESH_POINTS * 3 {
        let mesh = parse_flat(data).map_err(|err| reject("register_face", err))?;
        FaceDescriptor::from_face(&mesh)
    } else {
        FaceDescriptor::from_values(data)
    };
    let descriptor = descriptor
        .ok_or_else(|| reject("register_face", Error::InvalidInput("empty face data".into())))?;
    with_session(|session| session.register_face(user_id, descriptor))
        .map_err(|err| reject("register_face", err))
}

#[wasm_bindgen]
pub fn remove_user(user_id: &str) {
    with_session(|session| session.remove_user(user_id));
}

/// Pass `undefined` to fall back to the guest session
#[wasm_bindgen]
pub fn set_active_user(user_id: Option<String>) -> Result<(), JsValue> {
    with_session(|session| session.set_active_user(user_id.as_deref()))
        .map_err(|err| reject("set_active_user", err))
}

#[wasm_bindgen]
pub fn active_user() -> Option<String> {
    with_session(|session| session.active_user().map(str::to_string))
}

#[wasm_bindgen]
pub fn start_recording() {
    with_session(|session| session.start_recording());
}

#[wasm_bindgen]
pub fn stop_recording() {
    with_session(|session| session.stop_recording());
}

#[wasm_bindgen]
pub fn is_recording() -> bool {
    with_session(|session| session.is_recording())
}

/// Called from JavaScript once per camera frame.
///
/// - `hands`: `num_hands × 63` values (21 landmarks × x, y, z)
/// - `handedness`: one code per hand, 0 = left, 1 = right, anything else unknown
/// - `pose`: 99 values, or empty when no body was detected
/// - `face`: 1404 values, or empty when no face was detected
///
/// Returns the filtered frame, mood and hand shapes as JSON.
#[wasm_bindgen]
pub fn submit_frame(
    hands: &[f32],
    handedness: &[f32],
    pose: &[f32],
    face: &[f32],
) -> Result<String, JsValue> {
    let frame = LandmarkFrame {
        hands: parse_hands(hands, handedness).map_err(|err| reject("submit_frame hands", err))?,
        pose: parse_flat(pose).map_err(|err| reject("submit_frame pose", err))?,
        face: parse_flat(face).map_err(|err| reject("submit_frame face", err))?,
        timestamp_ms: js_sys::Date::now(),
    };

    let output = with_session(|session| session.process_frame(&frame))
        .map_err(|err| reject("submit_frame", err))?;
    serde_json::to_string(&output).map_err(|err| reject("submit_frame", err.into()))
}

#[wasm_bindgen]
pub fn get_transcript() -> String {
    with_session(|session| session.transcript())
}

#[wasm_bindgen]
pub fn clear_transcript() {
    with_session(|session| session.clear_transcript());
}
