//! Direction-reversal counting for scalar channels
//!
//! One voluntary motion is monotonic or reverses once. A repetitive tic
//! reverses again and again inside the window.

/// Fewer samples than this never count as oscillating
pub const MIN_OSCILLATION_SAMPLES: usize = 4;

/// Count local direction reversals: positions `i >= 2` where the step into
/// `v[i]` has the opposite sign of the step into `v[i-1]`. Flat steps never
/// count as a reversal.
pub fn count_reversals(values: &[f32]) -> usize {
    values
        .windows(3)
        .filter(|w| (w[2] - w[1]) * (w[1] - w[0]) < 0.0)
        .count()
}

pub fn is_oscillating(values: &[f32], reversal_threshold: usize) -> bool {
    if values.len() < MIN_OSCILLATION_SAMPLES {
        return false;
    }
    count_reversals(values) >= reversal_threshold
}
