//! Tic filter front end - dispatch a user's profile onto the tic channels
//!
//! Output always has the shape of the input. Tics that belong to the other
//! landmark source are no-ops here.

use super::facial::{filter_eye_blinks, filter_mouth_twitches};
use super::history::TicHistory;
use super::postural::{filter_head_nods, filter_shoulder_shrugs};
use super::profile::{TicKind, TicProfile};
use crate::config::TicConfig;
use crate::landmarks::{Landmark, LandmarkSet};

/// Tic filter state for exactly one user
#[derive(Debug, Clone)]
pub struct TicFilter {
    config: TicConfig,
    history: TicHistory,
}

impl TicFilter {
    pub fn new(config: TicConfig) -> Self {
        let history = TicHistory::new(&config);
        Self { config, history }
    }

    pub fn filter_facial_tics(
        &mut self,
        face: &[Landmark],
        profile: &TicProfile,
        now_ms: f64,
    ) -> LandmarkSet {
        let mut filtered = face.to_vec();
        if face.is_empty() {
            return filtered;
        }
        for tic in profile.iter() {
            filtered = match tic {
                TicKind::EyeBlinkRapid => {
                    filter_eye_blinks(filtered, &mut self.history, &self.config.eye_blink, now_ms)
                }
                TicKind::MouthTwitch => {
                    filter_mouth_twitches(
                        filtered,
                        &mut self.history,
                        &self.config.mouth_twitch,
                        now_ms,
                    )
                }
                TicKind::HeadNod | TicKind::ShoulderShrug => filtered,
            };
        }
        filtered
    }

    pub fn filter_postural_tics(
        &mut self,
        pose: &[Landmark],
        profile: &TicProfile,
        now_ms: f64,
    ) -> LandmarkSet {
        let mut filtered = pose.to_vec();
        if pose.is_empty() {
            return filtered;
        }
        for tic in profile.iter() {
            filtered = match tic {
                TicKind::HeadNod => {
                    filter_head_nods(filtered, &mut self.history, &self.config.head_nod, now_ms)
                }
                TicKind::ShoulderShrug => {
                    filter_shoulder_shrugs(
                        filtered,
                        &mut self.history,
                        &self.config.shoulder_shrug,
                        now_ms,
                    )
                }
                TicKind::EyeBlinkRapid | TicKind::MouthTwitch => filtered,
            };
        }
        filtered
    }

    pub fn history(&self) -> &TicHistory {
        &self.history
    }

    /// Forget every channel, e.g. when tracking stops
    pub fn reset(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::face::{LEFT_LOWER_EYELID, LEFT_UPPER_EYELID};

    fn closed_eye_face() -> LandmarkSet {
        let mut face = vec![Landmark::new(0.5, 0.5, 0.0); 468];
        face[LEFT_LOWER_EYELID] = Landmark::new(0.4, 0.400, 0.0);
        face[LEFT_UPPER_EYELID] = Landmark::new(0.4, 0.398, 0.0);
        face
    }

    #[test]
    fn test_empty_profile_is_identity() {
        let mut filter = TicFilter::new(TicConfig::default());
        let profile = TicProfile::empty();
        let face = closed_eye_face();
        for i in 0..10 {
            assert_eq!(filter.filter_facial_tics(&face, &profile, i as f64 * 10.0), face);
        }
        let pose: LandmarkSet = (0..33).map(|i| Landmark::new(0.01 * i as f32, 0.5, 0.0)).collect();
        assert_eq!(filter.filter_postural_tics(&pose, &profile, 0.0), pose);
        assert!(filter.history().blinks.is_empty());
    }

    #[test]
    fn test_postural_tics_ignore_face() {
        let mut filter = TicFilter::new(TicConfig::default());
        let profile = TicProfile::from_ids(&["head_nod", "shoulder_shrug"]);
        let face = closed_eye_face();
        for i in 0..10 {
            assert_eq!(filter.filter_facial_tics(&face, &profile, i as f64 * 10.0), face);
        }
    }

    #[test]
    fn test_blink_profile_engages_after_threshold() {
        let mut filter = TicFilter::new(TicConfig::default());
        let profile = TicProfile::from_ids(&["eye_blink_rapid", "future_tic"]);
        let face = closed_eye_face();

        for i in 0..3 {
            assert_eq!(filter.filter_facial_tics(&face, &profile, i as f64 * 100.0), face);
        }
        let out = filter.filter_facial_tics(&face, &profile, 300.0);
        assert_ne!(out, face);
        assert_eq!(out.len(), face.len());
    }

    #[test]
    fn test_reset_clears_history() {
        let mut filter = TicFilter::new(TicConfig::default());
        let profile = TicProfile::from_ids(&["eye_blink_rapid"]);
        let face = closed_eye_face();
        for i in 0..4 {
            filter.filter_facial_tics(&face, &profile, i as f64 * 100.0);
        }
        filter.reset();
        assert!(filter.history().blinks.is_empty());
        assert_eq!(filter.filter_facial_tics(&face, &profile, 400.0), face);
    }

    #[test]
    fn test_empty_face_is_no_detection() {
        let mut filter = TicFilter::new(TicConfig::default());
        let profile = TicProfile::from_ids(&["eye_blink_rapid", "mouth_twitch"]);
        assert!(filter.filter_facial_tics(&[], &profile, 0.0).is_empty());
    }
}
