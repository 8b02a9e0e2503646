//! Landmark data model - MediaPipe hand / pose / face keypoints
//!
//! Re-exports only. Index constants live in the per-source submodules.

mod frame;
pub mod face;
pub mod hand;
pub mod pose;

pub use frame::{
    parse_flat, parse_hands, HandLandmarks, Handedness, Landmark, LandmarkFrame, LandmarkSet,
};
pub use hand::{extract_hand_shape, FingerState, HandShape};
