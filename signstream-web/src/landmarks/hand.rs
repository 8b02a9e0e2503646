//! MediaPipe Hands indices (21 per hand) and a coarse finger-state summary
//!
//! The summary feeds the avatar, not the classifier: each finger is
//! "extended" when its tip sits above its middle joint in image space.

use serde::Serialize;

use super::frame::{HandLandmarks, Handedness, Landmark};

pub const HAND_POINTS: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// (tip, reference joint) per finger, thumb first
const FINGER_TESTS: [(usize, usize); 5] = [
    (THUMB_TIP, THUMB_IP),
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerState {
    Extended,
    Folded,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandShape {
    pub handedness: Option<Handedness>,
    pub thumb: FingerState,
    pub index: FingerState,
    pub middle: FingerState,
    pub ring: FingerState,
    pub pinky: FingerState,
}

fn finger_state(landmarks: &[Landmark], tip: usize, joint: usize) -> FingerState {
    // y grows downwards in image space
    if landmarks[tip].y < landmarks[joint].y {
        FingerState::Extended
    } else {
        FingerState::Folded
    }
}

/// Summarize one hand. Returns None when the set is not a full 21-point hand.
pub fn extract_hand_shape(hand: &HandLandmarks) -> Option<HandShape> {
    let lm = &hand.landmarks;
    if lm.len() < HAND_POINTS {
        return None;
    }
    let [thumb, index, middle, ring, pinky] =
        FINGER_TESTS.map(|(tip, joint)| finger_state(lm, tip, joint));
    Some(HandShape {
        handedness: hand.handedness,
        thumb,
        index,
        middle,
        ring,
        pinky,
    })
}
