//! Feature extraction for sign classification
//!
//! One 150-value vector per frame, in a fixed order the model was trained on:
//! - 0..63: left hand slot, 21 landmarks × (x, y, z)
//! - 63..126: right hand slot, 21 landmarks × (x, y, z)
//! - 126..150: pose joints (shoulders, elbows, wrists, hips) × (x, y, z)
//!
//! Missing hands, short hand sets and missing joints are zero-filled so the
//! vector length never changes.

use crate::landmarks::hand::HAND_POINTS;
use crate::landmarks::pose::FEATURE_JOINTS;
use crate::landmarks::{HandLandmarks, Handedness, Landmark};

/// Hand slots in the feature vector
pub const HAND_SLOTS: usize = 2;

/// Values contributed by one hand slot
pub const HAND_FEATURES: usize = HAND_POINTS * 3;

/// Values contributed by the pose joints
pub const POSE_FEATURES: usize = FEATURE_JOINTS.len() * 3;

/// Number of features per frame
pub const FEATURE_COUNT: usize = HAND_SLOTS * HAND_FEATURES + POSE_FEATURES;

pub type FeatureVector = [f32; FEATURE_COUNT];

/// Slot per hand: labelled hands take their own slot, unlabelled (or
/// colliding) hands fill the first free one, extra hands are dropped.
fn assign_hand_slots(hands: &[HandLandmarks]) -> [Option<&HandLandmarks>; HAND_SLOTS] {
    let mut slots: [Option<&HandLandmarks>; HAND_SLOTS] = [None; HAND_SLOTS];
    let mut pending = Vec::new();

    for hand in hands {
        let preferred = match hand.handedness {
            Some(Handedness::Left) => Some(0),
            Some(Handedness::Right) => Some(1),
            None => None,
        };
        match preferred {
            Some(slot) if slots[slot].is_none() => slots[slot] = Some(hand),
            _ => pending.push(hand),
        }
    }
    for hand in pending {
        if let Some(free) = slots.iter_mut().find(|s| s.is_none()) {
            *free = Some(hand);
        }
    }
    slots
}

fn write_point(out: &mut [f32], point: &Landmark) {
    out[0] = point.x;
    out[1] = point.y;
    out[2] = point.z;
}

/// Build the feature vector for one frame of (already filtered) landmarks
pub fn extract_features(hands: &[HandLandmarks], pose: &[Landmark]) -> FeatureVector {
    let mut features = [0.0; FEATURE_COUNT];

    for (slot, hand) in assign_hand_slots(hands).iter().enumerate() {
        let Some(hand) = hand else { continue };
        let base = slot * HAND_FEATURES;
        for (i, point) in hand.landmarks.iter().take(HAND_POINTS).enumerate() {
            write_point(&mut features[base + i * 3..base + i * 3 + 3], point);
        }
    }

    let pose_base = HAND_SLOTS * HAND_FEATURES;
    for (i, joint) in FEATURE_JOINTS.iter().enumerate() {
        if let Some(point) = pose.get(*joint) {
            write_point(&mut features[pose_base + i * 3..pose_base + i * 3 + 3], point);
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::pose::{LEFT_SHOULDER, RIGHT_HIP};

    fn hand(handedness: Option<Handedness>, value: f32) -> HandLandmarks {
        HandLandmarks {
            handedness,
            landmarks: vec![Landmark::new(value, value, value); HAND_POINTS],
        }
    }

    #[test]
    fn test_length_is_fixed() {
        assert_eq!(FEATURE_COUNT, 150);
        assert_eq!(extract_features(&[], &[]).len(), 150);
        let three = [hand(None, 0.1), hand(None, 0.2), hand(None, 0.3)];
        assert_eq!(extract_features(&three, &vec![Landmark::default(); 33]).len(), 150);
    }

    #[test]
    fn test_nothing_detected_is_all_zero() {
        assert!(extract_features(&[], &[]).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_right_hand_only_fills_second_slot() {
        let features = extract_features(&[hand(Some(Handedness::Right), 0.7)], &[]);
        assert!(features[..HAND_FEATURES].iter().all(|v| *v == 0.0));
        assert!(features[HAND_FEATURES..2 * HAND_FEATURES].iter().all(|v| *v == 0.7));
    }

    #[test]
    fn test_unlabelled_hands_fill_in_detection_order() {
        let features = extract_features(&[hand(None, 0.1), hand(None, 0.2)], &[]);
        assert_eq!(features[0], 0.1);
        assert_eq!(features[HAND_FEATURES], 0.2);
    }

    #[test]
    fn test_colliding_labels_take_free_slot() {
        let features = extract_features(
            &[hand(Some(Handedness::Left), 0.1), hand(Some(Handedness::Left), 0.2)],
            &[],
        );
        assert_eq!(features[0], 0.1);
        assert_eq!(features[HAND_FEATURES], 0.2);
    }

    #[test]
    fn test_pose_joints_in_order() {
        let pose: Vec<Landmark> = (0..33).map(|i| Landmark::new(i as f32, 0.5, 0.0)).collect();
        let features = extract_features(&[], &pose);
        let base = 2 * HAND_FEATURES;
        assert_eq!(features[base], LEFT_SHOULDER as f32);
        assert_eq!(features[base + 21], RIGHT_HIP as f32);
    }

    #[test]
    fn test_short_pose_zero_fills_missing_joints() {
        let pose = vec![Landmark::new(0.5, 0.5, 0.5); 20];
        let features = extract_features(&[], &pose);
        let base = 2 * HAND_FEATURES;
        // Shoulders through wrists exist, hips (23, 24) do not
        assert_eq!(features[base], 0.5);
        assert!(features[base + 18..].iter().all(|v| *v == 0.0));
    }
}
