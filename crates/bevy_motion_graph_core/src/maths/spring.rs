//! Critically-damped spring smoothing.
//!
//! Velocity changes head toward their target through a critically-damped
//! spring rather than linear acceleration: responsive to reversals, never
//! overshooting. The exponential term uses the usual cubic approximation,
//! stable for any positive time step.

use bevy::math::Vec3;

/// Hand-tuned smoothing-time bounds, in seconds, selected by a damping
/// ratio in [0, 1].
pub const MIN_DAMPING_TIME: f32 = 0.05;
pub const MAX_DAMPING_TIME: f32 = 0.25;

/// Maps a damping ratio in [0, 1] to a smoothing time constant.
pub fn damping_time(ratio: f32) -> f32 {
    let t = ratio.clamp(0., 1.);
    MIN_DAMPING_TIME + (MAX_DAMPING_TIME - MIN_DAMPING_TIME) * t
}

/// Moves `current` toward `target` over roughly `smooth_time` seconds.
/// `velocity` is the spring's rate accumulator and must be carried between
/// calls (and persisted across save/load).
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2. / smooth_time;
    let x = omega * dt;
    let exp = 1. / (1. + x + 0.48 * x * x + 0.235 * x * x * x);

    let max_change = max_speed * smooth_time;
    let change = (current - target).clamp(-max_change, max_change);
    let clamped_target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    // Suppress overshoot past the target.
    if (target - current > 0.) == (output > target) {
        output = target;
        *velocity = (output - target) / dt.max(1e-6);
    }

    output
}

/// Vector form of [`smooth_damp`]. The max-speed clamp applies to the
/// magnitude of the change, not per-axis.
pub fn smooth_damp_vec3(
    current: Vec3,
    target: Vec3,
    velocity: &mut Vec3,
    smooth_time: f32,
    max_speed: f32,
    dt: f32,
) -> Vec3 {
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2. / smooth_time;
    let x = omega * dt;
    let exp = 1. / (1. + x + 0.48 * x * x + 0.235 * x * x * x);

    let mut change = current - target;
    let max_change = max_speed * smooth_time;
    let sq_len = change.length_squared();
    if sq_len > max_change * max_change {
        change = change / sq_len.sqrt() * max_change;
    }
    let clamped_target = current - change;

    let temp = (*velocity + change * omega) * dt;
    *velocity = (*velocity - temp * omega) * exp;
    let mut output = clamped_target + (change + temp) * exp;

    let to_target = target - current;
    let overshoot = output - target;
    if to_target.dot(overshoot) > 0. {
        output = target;
        *velocity = overshoot / dt.max(1e-6);
    }

    output
}
