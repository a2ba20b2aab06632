use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::{slope::SlopeSpeedCurve, spring},
    motion_state::MotionState,
    parameter::refs::{FloatRef, Remappable},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

use crate::helpers;

/// Core ground locomotion: directionally shaped top speed, slope-projected
/// target velocity, and critically-damped smoothing toward it.
///
/// Never completes on its own; the graph layer transitions away on its own
/// conditions (jump trigger, losing ground contact, and so on).
#[derive(Clone, Debug)]
pub struct MovementState {
    top_speed: DataValue<f32>,
    strafe_multiplier: DataValue<f32>,
    reverse_multiplier: DataValue<f32>,
    /// Damping ratio in [0, 1]; selects the smoothing time constant.
    damping: DataValue<f32>,
    slope_curve: SlopeSpeedCurve,
    /// Optional write-out of current planar speed for the animation bridge.
    speed_out: FloatRef,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
}

impl MovementState {
    pub const VELOCITY: &'static str = "velocity";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(top_speed: DataValue<f32>) -> Self {
        Self {
            top_speed,
            strafe_multiplier: DataValue::literal(0.75),
            reverse_multiplier: DataValue::literal(0.6),
            damping: DataValue::literal(0.5),
            slope_curve: SlopeSpeedCurve::default(),
            speed_out: FloatRef::unbound(),
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
        }
    }

    pub fn with_multipliers(mut self, strafe: DataValue<f32>, reverse: DataValue<f32>) -> Self {
        self.strafe_multiplier = strafe;
        self.reverse_multiplier = reverse;
        self
    }

    pub fn with_damping(mut self, damping: DataValue<f32>) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_slope_curve(mut self, curve: SlopeSpeedCurve) -> Self {
        self.slope_curve = curve;
        self
    }

    pub fn with_speed_out(mut self, speed_out: FloatRef) -> Self {
        self.speed_out = speed_out;
        self
    }
}

impl MotionState for MovementState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.move_vector = self.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let target = helpers::ground_target_velocity(
            &ctx,
            self.top_speed.get(),
            self.strafe_multiplier.get(),
            self.reverse_multiplier.get(),
            &self.slope_curve,
        );

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

        let vertical = ctx.body.up * ctx.body.vertical_speed();
        ctx.body.velocity = self.velocity + vertical;
        self.speed_out
            .set(ctx.blackboard, ctx.body.planar_velocity().length());
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.top_speed,
            &mut self.strafe_multiplier,
            &mut self.reverse_multiplier,
            &mut self.damping,
            &mut self.speed_out,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_vec3(Self::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.velocity = reader.read_vec3(Self::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Movement".into()
    }
}
