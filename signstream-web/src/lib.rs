//! SignStream Web - tic-aware sign language recognition
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! Everything below `bridge` is plain Rust and runs natively in tests.

mod bridge;
pub mod classifier;
pub mod config;
pub mod error;
pub mod identity;
pub mod landmarks;
pub mod logging;
pub mod mood;
pub mod record;
pub mod session;
pub mod tic;

use std::sync::Once;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{get_classification_request, set_sign_result, submit_frame};
pub use error::{Error, Result};
pub use session::SessionContext;

static LOGGING: Once = Once::new();

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Install console logging and build the pipeline from `config_json`
/// (empty string for defaults). Must be called before submit_frame.
#[wasm_bindgen]
pub fn init(config_json: &str) -> std::result::Result<(), JsValue> {
    let config = config::PipelineConfig::from_json(config_json)?;
    LOGGING.call_once(|| {
        if let Err(err) = logging::init_console_logging(&config.log_level) {
            web_sys::console::warn_1(&err.to_string().into());
        }
    });
    tracing::info!("SignStream initialized ({} signs)", config.vocabulary.len());
    bridge::install_config(config);
    Ok(())
}
