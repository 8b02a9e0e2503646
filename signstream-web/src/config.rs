//! Pipeline configuration
//!
//! Loaded from a JSON string handed over by JS. Every struct is
//! `#[serde(default)]`, so a partial document only overrides what it names.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sign labels in the order the shipped model was trained on
pub const DEFAULT_VOCABULARY: [&str; 10] = [
    "Hello", "Thank you", "Yes", "No", "Please", "Help", "Sorry", "Good", "Bad", "Question",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Frames in the classification window
    pub buffer_capacity: usize,
    /// Predictions at or below this probability are dropped
    pub confidence_threshold: f32,
    pub vocabulary: Vec<String>,
    /// EnvFilter directive, e.g. "info" or "signstream_web=debug"
    pub log_level: String,
    /// Maximum descriptor distance accepted as a face match
    pub face_match_threshold: f32,
    pub tics: TicConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TicConfig {
    pub eye_blink: BlinkPolicy,
    pub mouth_twitch: TwitchPolicy,
    pub head_nod: OscillationPolicy,
    pub shoulder_shrug: OscillationPolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkPolicy {
    pub window_ms: f64,
    /// Filter engages when the window holds more events than this
    pub count_threshold: usize,
    /// Lid separation below this counts as a closed eye
    pub closure_threshold: f32,
    /// Lid separation used before any open eye has been observed
    pub open_eye_aperture: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitchPolicy {
    pub window_ms: f64,
    pub count_threshold: usize,
    /// Frame-to-frame mouth width change that counts as a twitch
    pub twitch_delta: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct OscillationPolicy {
    pub window_ms: f64,
    /// Direction reversals needed to call a channel oscillating
    pub reversal_threshold: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 30,
            confidence_threshold: 0.7,
            vocabulary: DEFAULT_VOCABULARY.iter().map(|s| s.to_string()).collect(),
            log_level: "info".to_string(),
            face_match_threshold: 0.6,
            tics: TicConfig::default(),
        }
    }
}

impl Default for BlinkPolicy {
    fn default() -> Self {
        Self {
            window_ms: 1000.0,
            count_threshold: 3,
            closure_threshold: 0.01,
            open_eye_aperture: 0.03,
        }
    }
}

impl Default for TwitchPolicy {
    fn default() -> Self {
        Self {
            window_ms: 2000.0,
            count_threshold: 4,
            twitch_delta: 0.015,
        }
    }
}

impl Default for OscillationPolicy {
    fn default() -> Self {
        Self {
            window_ms: 2000.0,
            reversal_threshold: 3,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON document. An empty string yields defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: PipelineConfig = if text.trim().is_empty() {
            Self::default()
        } else {
            serde_json::from_str(text)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.buffer_capacity == 0 {
            return Err(Error::InvalidInput("buffer_capacity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(Error::InvalidInput(format!(
                "confidence_threshold {} outside [0, 1]",
                self.confidence_threshold
            )));
        }
        if self.vocabulary.is_empty() {
            return Err(Error::InvalidInput("vocabulary is empty".into()));
        }
        if !(self.face_match_threshold > 0.0) {
            return Err(Error::InvalidInput("face_match_threshold must be positive".into()));
        }
        let windows = [
            self.tics.eye_blink.window_ms,
            self.tics.mouth_twitch.window_ms,
            self.tics.head_nod.window_ms,
            self.tics.shoulder_shrug.window_ms,
        ];
        if windows.iter().any(|w| !(*w > 0.0)) {
            return Err(Error::InvalidInput("tic windows must be positive".into()));
        }
        Ok(())
    }
}
