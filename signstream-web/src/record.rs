//! Recognized-sign output: running transcript and storage records
//!
//! Records are immutable once built. Their storage schema belongs to the JS
//! persistence layer; this crate only fills in the fields.

use serde::{Deserialize, Serialize};

use crate::classifier::RecognitionResult;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Sign,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub user_id: String,
    pub input_type: InputKind,
    pub output_data: String,
    pub confidence: f32,
    pub timestamp_ms: f64,
}

impl TranslationRecord {
    pub fn from_sign(user_id: &str, result: &RecognitionResult, timestamp_ms: f64) -> Self {
        Self {
            user_id: user_id.to_string(),
            input_type: InputKind::Sign,
            output_data: result.label.clone(),
            confidence: result.confidence,
            timestamp_ms,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Recognized words for one session, space separated
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    words: Vec<String>,
}

impl Transcript {
    pub fn push(&mut self, word: &str) {
        self.words.push(word.to_string());
    }

    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_shape() {
        let result = RecognitionResult { label: "Hello".into(), confidence: 0.9 };
        let record = TranslationRecord::from_sign("u1", &result, 1234.0);
        let value: serde_json::Value = serde_json::from_str(&record.to_json().unwrap()).unwrap();
        assert_eq!(value["userId"], "u1");
        assert_eq!(value["inputType"], "sign");
        assert_eq!(value["outputData"], "Hello");
        assert_eq!(value["timestampMs"], 1234.0);
    }

    #[test]
    fn test_transcript_joins_words() {
        let mut transcript = Transcript::default();
        assert_eq!(transcript.text(), "");
        transcript.push("Hello");
        transcript.push("Thank you");
        assert_eq!(transcript.text(), "Hello Thank you");
        transcript.clear();
        assert!(transcript.is_empty());
    }
}
