//! Per-frame landmark containers
//!
//! An empty `LandmarkSet` always means "not detected this frame". Nothing in
//! the pipeline treats it as a set of zero-coordinate points.

use serde::{Deserialize, Serialize};

use super::hand::HAND_POINTS;
use crate::error::{Error, Result};

/// A single 3D landmark point (normalized coordinates)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32, // 0-1 normalized
    pub y: f32, // 0-1 normalized
    pub z: f32, // Relative depth
}

impl Landmark {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn distance_2d(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Index-stable keypoints from one detector
pub type LandmarkSet = Vec<Landmark>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// JS side encodes handedness as 0 = left, 1 = right, anything else unknown
    pub fn from_code(code: f32) -> Option<Self> {
        if code == 0.0 {
            Some(Handedness::Left)
        } else if code == 1.0 {
            Some(Handedness::Right)
        } else {
            None
        }
    }
}

/// One tracked hand: 21 landmarks plus the detector's handedness label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandLandmarks {
    pub handedness: Option<Handedness>,
    pub landmarks: LandmarkSet,
}

/// Everything the landmark source produced for one camera frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    pub hands: Vec<HandLandmarks>,
    pub pose: LandmarkSet,
    pub face: LandmarkSet,
    /// Capture time in milliseconds
    pub timestamp_ms: f64,
}

impl LandmarkFrame {
    pub fn new(timestamp_ms: f64) -> Self {
        Self {
            timestamp_ms,
            ..Default::default()
        }
    }

    pub fn with_hand(mut self, handedness: Option<Handedness>, landmarks: LandmarkSet) -> Self {
        self.hands.push(HandLandmarks { handedness, landmarks });
        self
    }

    pub fn with_pose(mut self, pose: LandmarkSet) -> Self {
        self.pose = pose;
        self
    }

    pub fn with_face(mut self, face: LandmarkSet) -> Self {
        self.face = face;
        self
    }
}

/// Parse a flat `[x0, y0, z0, x1, ...]` array as handed over from JS
pub fn parse_flat(data: &[f32]) -> Result<LandmarkSet> {
    if data.len() % 3 != 0 {
        return Err(Error::InvalidInput(format!(
            "landmark data length {} is not a multiple of 3",
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(3)
        .map(|c| Landmark::new(c[0], c[1], c[2]))
        .collect())
}

/// Parse `num_hands × 63` floats into hands, pairing each with its entry in
/// `handedness` (see `Handedness::from_code`). Missing codes mean unknown.
pub fn parse_hands(data: &[f32], handedness: &[f32]) -> Result<Vec<HandLandmarks>> {
    const STRIDE: usize = HAND_POINTS * 3;
    if data.len() % STRIDE != 0 {
        return Err(Error::InvalidInput(format!(
            "hand data length {} is not a multiple of {}",
            data.len(),
            STRIDE
        )));
    }
    data.chunks_exact(STRIDE)
        .enumerate()
        .map(|(i, chunk)| {
            Ok(HandLandmarks {
                handedness: handedness.get(i).and_then(|code| Handedness::from_code(*code)),
                landmarks: parse_flat(chunk)?,
            })
        })
        .collect()
}
