//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod classifier_integration;
mod pipeline;

pub use pipeline::{
    active_user, clear_transcript, configure, get_transcript, is_recording, register_face,
    register_user, remove_user, set_active_user, start_recording, stop_recording, submit_frame,
};
pub(crate) use pipeline::install_config;

pub use classifier_integration::{
    get_classification_request, is_classifier_ready, set_classifier_ready, set_sign_result,
    ClassificationRequest,
};
