//! Mood classification from face-mesh geometry
//!
//! Fixed thresholds, checked in order. The ranges overlap, so the first
//! matching rule wins.

use serde::{Deserialize, Serialize};

use crate::landmarks::face::{FACE_MESH_POINTS, LEFT_EYEBROW, LOWER_LIP, RIGHT_EYEBROW, UPPER_LIP};
use crate::landmarks::Landmark;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    #[default]
    Neutral,
    Happy,
    Sad,
    Surprised,
    Angry,
    Questioning,
}

impl MoodLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MoodLabel::Neutral => "neutral",
            MoodLabel::Happy => "happy",
            MoodLabel::Sad => "sad",
            MoodLabel::Surprised => "surprised",
            MoodLabel::Angry => "angry",
            MoodLabel::Questioning => "questioning",
        }
    }
}

/// Geometry the rules look at
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceGeometry {
    /// Vertical lip separation
    pub mouth_open: f32,
    /// Mean eyebrow y (image space, grows downwards)
    pub eyebrow_height: f32,
}

struct MoodRule {
    mood: MoodLabel,
    matches: fn(&FaceGeometry) -> bool,
}

const RULES: [MoodRule; 3] = [
    MoodRule {
        mood: MoodLabel::Surprised,
        matches: |g| g.mouth_open > 0.05 && g.eyebrow_height < 0.3,
    },
    MoodRule { mood: MoodLabel::Happy, matches: |g| g.mouth_open > 0.03 },
    MoodRule { mood: MoodLabel::Sad, matches: |g| g.eyebrow_height > 0.35 },
];

pub fn face_geometry(face: &[Landmark]) -> Option<FaceGeometry> {
    if face.len() < FACE_MESH_POINTS {
        return None;
    }
    Some(FaceGeometry {
        mouth_open: (face[UPPER_LIP].y - face[LOWER_LIP].y).abs(),
        eyebrow_height: (face[LEFT_EYEBROW].y + face[RIGHT_EYEBROW].y) / 2.0,
    })
}

pub fn classify_geometry(geometry: &FaceGeometry) -> MoodLabel {
    RULES
        .iter()
        .find(|rule| (rule.matches)(geometry))
        .map(|rule| rule.mood)
        .unwrap_or(MoodLabel::Neutral)
}

/// Mood for one face mesh; anything short of a full mesh is neutral
pub fn classify_mood(face: &[Landmark]) -> MoodLabel {
    face_geometry(face)
        .map(|g| classify_geometry(&g))
        .unwrap_or(MoodLabel::Neutral)
}
