//! Body-pose tic channels: head nods and shoulder shrugs
//!
//! A channel is flagged when its vertical trace keeps reversing direction
//! inside the window. Only the joints that feed the channel are replaced, by
//! their mean position over the window.

use tracing::debug;

use super::history::TicHistory;
use super::oscillation::is_oscillating;
use crate::config::OscillationPolicy;
use crate::landmarks::pose::{LEFT_SHOULDER, NOSE, RIGHT_SHOULDER};
use crate::landmarks::{Landmark, LandmarkSet};

fn mean_landmark(points: impl Iterator<Item = Landmark>) -> Option<Landmark> {
    let mut sum = (0.0_f32, 0.0_f32, 0.0_f32);
    let mut count = 0usize;
    for p in points {
        sum.0 += p.x;
        sum.1 += p.y;
        sum.2 += p.z;
        count += 1;
    }
    if count == 0 {
        return None;
    }
    let n = count as f32;
    Some(Landmark::new(sum.0 / n, sum.1 / n, sum.2 / n))
}

pub(super) fn filter_head_nods(
    mut pose: LandmarkSet,
    history: &mut TicHistory,
    policy: &OscillationPolicy,
    now_ms: f64,
) -> LandmarkSet {
    let Some(nose) = pose.get(NOSE).copied() else {
        return pose;
    };

    let channel = &mut history.head_positions;
    channel.push(nose, now_ms);
    channel.prune(now_ms);

    let trace: Vec<f32> = channel.samples().map(|p| p.y).collect();
    if is_oscillating(&trace, policy.reversal_threshold) {
        if let Some(held) = mean_landmark(channel.samples()) {
            debug!("Head nod tic over {} samples, holding nose at y={:.3}", trace.len(), held.y);
            pose[NOSE] = held;
        }
    }

    pose
}

pub(super) fn filter_shoulder_shrugs(
    mut pose: LandmarkSet,
    history: &mut TicHistory,
    policy: &OscillationPolicy,
    now_ms: f64,
) -> LandmarkSet {
    let (Some(left), Some(right)) = (
        pose.get(LEFT_SHOULDER).copied(),
        pose.get(RIGHT_SHOULDER).copied(),
    ) else {
        return pose;
    };

    let channel = &mut history.shoulder_positions;
    channel.push((left, right), now_ms);
    channel.prune(now_ms);

    let trace: Vec<f32> = channel.samples().map(|(l, r)| (l.y + r.y) / 2.0).collect();
    if is_oscillating(&trace, policy.reversal_threshold) {
        let held_left = mean_landmark(channel.samples().map(|(l, _)| l));
        let held_right = mean_landmark(channel.samples().map(|(_, r)| r));
        if let (Some(l), Some(r)) = (held_left, held_right) {
            debug!("Shoulder shrug tic over {} samples", trace.len());
            pose[LEFT_SHOULDER] = l;
            pose[RIGHT_SHOULDER] = r;
        }
    }

    pose
}
