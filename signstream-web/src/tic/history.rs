//! Per-user event histories, pruned to a sliding real-time window

use std::collections::VecDeque;

use crate::config::TicConfig;
use crate::landmarks::Landmark;

/// Marker sample for event-count channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicEvent;

/// Time-ordered samples for one signal channel
#[derive(Debug, Clone)]
pub struct ChannelHistory<T> {
    samples: VecDeque<(T, f64)>,
    window_ms: f64,
}

impl<T: Copy> ChannelHistory<T> {
    pub fn new(window_ms: f64) -> Self {
        Self {
            samples: VecDeque::new(),
            window_ms,
        }
    }

    pub fn push(&mut self, sample: T, timestamp_ms: f64) {
        self.samples.push_back((sample, timestamp_ms));
    }

    /// Drop every sample at least `window_ms` older than `now_ms`
    pub fn prune(&mut self, now_ms: f64) {
        while let Some((_, t)) = self.samples.front() {
            if now_ms - *t >= self.window_ms {
                self.samples.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = T> + '_ {
        self.samples.iter().map(|(s, _)| *s)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Everything the tic filter remembers about one user
#[derive(Debug, Clone)]
pub struct TicHistory {
    pub blinks: ChannelHistory<TicEvent>,
    /// Last lid separation seen with the eye open
    pub open_eye_aperture: Option<f32>,

    pub mouth_twitches: ChannelHistory<TicEvent>,
    pub last_mouth_width: Option<f32>,
    /// Last mouth width that arrived without a twitch
    pub stable_mouth_width: Option<f32>,

    pub head_positions: ChannelHistory<Landmark>,
    pub shoulder_positions: ChannelHistory<(Landmark, Landmark)>,
}

impl TicHistory {
    pub fn new(config: &TicConfig) -> Self {
        Self {
            blinks: ChannelHistory::new(config.eye_blink.window_ms),
            open_eye_aperture: None,
            mouth_twitches: ChannelHistory::new(config.mouth_twitch.window_ms),
            last_mouth_width: None,
            stable_mouth_width: None,
            head_positions: ChannelHistory::new(config.head_nod.window_ms),
            shoulder_positions: ChannelHistory::new(config.shoulder_shrug.window_ms),
        }
    }

    pub fn clear(&mut self) {
        self.blinks.clear();
        self.open_eye_aperture = None;
        self.mouth_twitches.clear();
        self.last_mouth_width = None;
        self.stable_mouth_width = None;
        self.head_positions.clear();
        self.shoulder_positions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_drops_old_samples() {
        let mut history = ChannelHistory::new(1000.0);
        history.push(1.0_f32, 0.0);
        history.push(2.0, 500.0);
        history.push(3.0, 900.0);
        history.prune(1200.0);
        assert_eq!(history.samples().collect::<Vec<_>>(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_prune_boundary_is_exclusive() {
        let mut history = ChannelHistory::new(1000.0);
        history.push(TicEvent, 0.0);
        history.prune(999.0);
        assert_eq!(history.len(), 1);
        history.prune(1000.0);
        assert!(history.is_empty());
    }
}
