use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::{slope::SlopeSpeedCurve, spring},
    motion_state::MotionState,
    parameter::refs::{Remappable, SwitchRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

use crate::helpers;

/// Crouched ground locomotion. Same damped, slope-projected core as
/// [`MovementState`](super::movement::MovementState) at a reduced top
/// speed, completing when the crouch switch releases so the graph can
/// stand the character back up.
#[derive(Clone, Debug)]
pub struct CrouchMovementState {
    top_speed: DataValue<f32>,
    /// Multiplier on top speed while crouched.
    crouch_multiplier: DataValue<f32>,
    damping: DataValue<f32>,
    slope_curve: SlopeSpeedCurve,
    crouch_switch: SwitchRef,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl CrouchMovementState {
    pub const VELOCITY: &'static str = "velocity";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(top_speed: DataValue<f32>, crouch_switch: SwitchRef) -> Self {
        Self {
            top_speed,
            crouch_multiplier: DataValue::literal(0.5),
            damping: DataValue::literal(0.5),
            slope_curve: SlopeSpeedCurve::default(),
            crouch_switch,
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_crouch_multiplier(mut self, multiplier: DataValue<f32>) -> Self {
        self.crouch_multiplier = multiplier;
        self
    }
}

impl MotionState for CrouchMovementState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = false;
        self.move_vector = self.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        // Switch released (or never bound): ready to stand.
        let held = self
            .crouch_switch
            .get(ctx.blackboard)
            .map(|s| s.on)
            .unwrap_or(false);
        if !held {
            self.completed = true;
        }

        let speed = self.top_speed.get() * self.crouch_multiplier.get();
        let target =
            helpers::ground_target_velocity(&ctx, speed, 1., 1., &self.slope_curve);

        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );
        self.move_vector = self.velocity * ctx.dt;
        ctx.body.velocity = self.velocity + ctx.body.up * ctx.body.vertical_speed();
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.top_speed,
            &mut self.crouch_multiplier,
            &mut self.damping,
            &mut self.crouch_switch,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.velocity = reader.read_vec3(Self::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Crouch Movement".into()
    }
}
