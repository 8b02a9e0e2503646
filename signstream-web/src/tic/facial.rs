//! Face-mesh tic channels: rapid blinking and mouth twitches
//!
//! Both follow the same pattern: record an event when the channel crosses
//! its trigger, prune to the window, and substitute a reference geometry
//! once the window holds more events than the policy allows.

use tracing::debug;

use super::history::{TicEvent, TicHistory};
use crate::config::{BlinkPolicy, TwitchPolicy};
use crate::landmarks::face::{
    EYELIDS, LEFT_LOWER_EYELID, LEFT_UPPER_EYELID, MOUTH_LEFT, MOUTH_RIGHT,
};
use crate::landmarks::{Landmark, LandmarkSet};

pub(super) fn filter_eye_blinks(
    face: LandmarkSet,
    history: &mut TicHistory,
    policy: &BlinkPolicy,
    now_ms: f64,
) -> LandmarkSet {
    let (Some(upper), Some(lower)) = (
        face.get(LEFT_UPPER_EYELID).copied(),
        face.get(LEFT_LOWER_EYELID).copied(),
    ) else {
        return face;
    };

    let aperture = (upper.y - lower.y).abs();
    if aperture < policy.closure_threshold {
        history.blinks.push(TicEvent, now_ms);
    } else {
        history.open_eye_aperture = Some(aperture);
    }
    history.blinks.prune(now_ms);

    if history.blinks.len() > policy.count_threshold {
        let reference = history.open_eye_aperture.unwrap_or(policy.open_eye_aperture);
        debug!(
            "Rapid blinking ({} closures in {}ms), holding eyes open at {:.3}",
            history.blinks.len(),
            policy.window_ms,
            reference
        );
        return normalize_eye_state(face, reference);
    }

    face
}

/// Set each eye's lid separation to `aperture`, anchored on the lower lid
fn normalize_eye_state(mut face: LandmarkSet, aperture: f32) -> LandmarkSet {
    for (upper_idx, lower_idx) in EYELIDS {
        if upper_idx >= face.len() || lower_idx >= face.len() {
            continue;
        }
        let lower = face[lower_idx];
        let upper = face[upper_idx];
        face[upper_idx] = Landmark::new(upper.x, lower.y - aperture, upper.z);
    }
    face
}

pub(super) fn filter_mouth_twitches(
    face: LandmarkSet,
    history: &mut TicHistory,
    policy: &TwitchPolicy,
    now_ms: f64,
) -> LandmarkSet {
    let (Some(left), Some(right)) = (
        face.get(MOUTH_LEFT).copied(),
        face.get(MOUTH_RIGHT).copied(),
    ) else {
        return face;
    };

    let width = left.distance_2d(&right);
    match history.last_mouth_width {
        Some(prev) if (width - prev).abs() > policy.twitch_delta => {
            history.mouth_twitches.push(TicEvent, now_ms);
        }
        _ => history.stable_mouth_width = Some(width),
    }
    history.last_mouth_width = Some(width);
    history.mouth_twitches.prune(now_ms);

    if history.mouth_twitches.len() > policy.count_threshold {
        if let Some(stable) = history.stable_mouth_width {
            debug!(
                "Mouth twitching ({} jumps in {}ms), holding width at {:.3}",
                history.mouth_twitches.len(),
                policy.window_ms,
                stable
            );
            return rescale_mouth(face, width, stable);
        }
    }

    face
}

/// Scale the mouth corners about their midpoint from `width` to `target`
fn rescale_mouth(mut face: LandmarkSet, width: f32, target: f32) -> LandmarkSet {
    if width < 1e-6 {
        return face;
    }
    let scale = target / width;
    let left = face[MOUTH_LEFT];
    let right = face[MOUTH_RIGHT];
    let mid = ((left.x + right.x) / 2.0, (left.y + right.y) / 2.0);
    for idx in [MOUTH_LEFT, MOUTH_RIGHT] {
        let p = face[idx];
        face[idx] = Landmark::new(
            mid.0 + (p.x - mid.0) * scale,
            mid.1 + (p.y - mid.1) * scale,
            p.z,
        );
    }
    face
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TicConfig;
    use crate::landmarks::face::{RIGHT_LOWER_EYELID, RIGHT_UPPER_EYELID};

    fn face_with_eyes(aperture: f32) -> LandmarkSet {
        let mut face = vec![Landmark::new(0.5, 0.5, 0.0); 478];
        face[LEFT_LOWER_EYELID] = Landmark::new(0.4, 0.40, 0.0);
        face[LEFT_UPPER_EYELID] = Landmark::new(0.4, 0.40 - aperture, 0.0);
        face[RIGHT_LOWER_EYELID] = Landmark::new(0.6, 0.40, 0.0);
        face[RIGHT_UPPER_EYELID] = Landmark::new(0.6, 0.40 - aperture, 0.0);
        face[MOUTH_LEFT] = Landmark::new(0.45, 0.7, 0.0);
        face[MOUTH_RIGHT] = Landmark::new(0.55, 0.7, 0.0);
        face
    }

    fn with_mouth_width(mut face: LandmarkSet, width: f32) -> LandmarkSet {
        face[MOUTH_LEFT] = Landmark::new(0.5 - width / 2.0, 0.7, 0.0);
        face[MOUTH_RIGHT] = Landmark::new(0.5 + width / 2.0, 0.7, 0.0);
        face
    }

    #[test]
    fn test_four_closures_hold_eyes_open() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);

        let mut out = Vec::new();
        for i in 0..4 {
            out = filter_eye_blinks(
                face_with_eyes(0.002),
                &mut history,
                &config.eye_blink,
                i as f64 * 100.0,
            );
        }
        let left = (out[LEFT_UPPER_EYELID].y - out[LEFT_LOWER_EYELID].y).abs();
        let right = (out[RIGHT_UPPER_EYELID].y - out[RIGHT_LOWER_EYELID].y).abs();
        assert!((left - 0.03).abs() < 1e-5);
        assert!((right - 0.03).abs() < 1e-5);
    }

    #[test]
    fn test_two_closures_pass_through() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);

        for i in 0..2 {
            let input = face_with_eyes(0.002);
            let out = filter_eye_blinks(
                input.clone(),
                &mut history,
                &config.eye_blink,
                i as f64 * 100.0,
            );
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_closures_outside_window_do_not_accumulate() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);

        for i in 0..6 {
            let input = face_with_eyes(0.002);
            let out = filter_eye_blinks(
                input.clone(),
                &mut history,
                &config.eye_blink,
                i as f64 * 600.0,
            );
            assert_eq!(out, input);
        }
    }

    #[test]
    fn test_reference_uses_last_open_aperture() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);

        filter_eye_blinks(face_with_eyes(0.025), &mut history, &config.eye_blink, 0.0);
        let mut out = Vec::new();
        for i in 1..=4 {
            out = filter_eye_blinks(
                face_with_eyes(0.001),
                &mut history,
                &config.eye_blink,
                i as f64 * 50.0,
            );
        }
        let left = (out[LEFT_UPPER_EYELID].y - out[LEFT_LOWER_EYELID].y).abs();
        assert!((left - 0.025).abs() < 1e-5);
    }

    #[test]
    fn test_missing_eyelids_skip_channel() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);
        let short = vec![Landmark::default(); 100];
        let out = filter_eye_blinks(short.clone(), &mut history, &config.eye_blink, 0.0);
        assert_eq!(out, short);
        assert!(history.blinks.is_empty());
    }

    #[test]
    fn test_mouth_twitches_rescale_to_stable_width() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);
        let base = face_with_eyes(0.03);

        filter_mouth_twitches(
            with_mouth_width(base.clone(), 0.10),
            &mut history,
            &config.mouth_twitch,
            0.0,
        );
        let mut out = Vec::new();
        for i in 1..=5 {
            let width = if i % 2 == 0 { 0.10 } else { 0.14 };
            out = filter_mouth_twitches(
                with_mouth_width(base.clone(), width),
                &mut history,
                &config.mouth_twitch,
                i as f64 * 100.0,
            );
        }
        assert_eq!(history.mouth_twitches.len(), 5);
        let width = out[MOUTH_LEFT].distance_2d(&out[MOUTH_RIGHT]);
        assert!((width - 0.10).abs() < 1e-5);
    }

    #[test]
    fn test_occasional_mouth_movement_passes_through() {
        let config = TicConfig::default();
        let mut history = TicHistory::new(&config);
        let base = face_with_eyes(0.03);

        for (i, width) in [0.10, 0.14, 0.14, 0.10, 0.10].iter().enumerate() {
            let input = with_mouth_width(base.clone(), *width);
            let out = filter_mouth_twitches(
                input.clone(),
                &mut history,
                &config.mouth_twitch,
                i as f64 * 100.0,
            );
            assert_eq!(out, input);
        }
    }
}
