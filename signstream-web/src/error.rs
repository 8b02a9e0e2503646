//! Crate error type
//!
//! Missing detections and unknown tic names are never errors; they degrade
//! to a neutral result inside the pipeline. What remains here is bad input
//! from the JS side, bad configuration, and classifier failures.

use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum Error {
    Config(serde_json::Error),
    InvalidInput(String),
    Inference(String),
    UnknownUser(String),
    OutOfOrderFrame { last_ms: f64, got_ms: f64 },
    LoggingInit(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Config(err) => write!(f, "configuration error: {}", err),
            Error::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            Error::Inference(msg) => write!(f, "inference error: {}", msg),
            Error::UnknownUser(id) => write!(f, "unknown user: {}", id),
            Error::OutOfOrderFrame { last_ms, got_ms } => write!(
                f,
                "out of order frame: got {:.1}ms after {:.1}ms",
                got_ms, last_ms
            ),
            Error::LoggingInit(msg) => write!(f, "logging init error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err)
    }
}

impl From<Error> for JsValue {
    fn from(err: Error) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
