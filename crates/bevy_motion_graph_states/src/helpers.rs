//! Shared building blocks for the concrete states.

use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::{shaping, slope, slope::SlopeSpeedCurve},
};

/// Ground-locomotion target velocity: world-space input direction,
/// directionally shaped top speed, and slope projection with the speed
/// falloff curve applied when grounded.
pub fn ground_target_velocity(
    ctx: &StateContext,
    top_speed: f32,
    strafe_multiplier: f32,
    reverse_multiplier: f32,
    slope_curve: &SlopeSpeedCurve,
) -> Vec3 {
    let up = ctx.body.up;
    let direction = ctx.frame.move_direction(up);
    if direction == Vec3::ZERO {
        return Vec3::ZERO;
    }

    let mut speed = top_speed
        * ctx.frame.input_scale.clamp(0., 1.)
        * shaping::directional_multiplier(
            ctx.frame.input_move,
            strafe_multiplier,
            reverse_multiplier,
        );

    if ctx.body.is_grounded {
        speed *= slope_curve.multiplier(up, ctx.body.ground_normal);
        return slope::project_direction(direction, up, ctx.body.ground_normal) * speed;
    }

    direction * speed
}

/// The degraded-configuration fallback: hold the current velocity for one
/// tick's worth of displacement.
pub fn passthrough_move_vector(ctx: &StateContext) -> Vec3 {
    ctx.body.velocity * ctx.dt
}
