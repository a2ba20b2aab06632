use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Push-off with a sustained boost: the entry impulse of
/// [`PushOffState`](super::push_off::PushOffState) followed by a decaying
/// additive acceleration for `boost_duration` seconds, completing when the
/// boost window closes.
#[derive(Clone, Debug)]
pub struct PushOffExtendedState {
    push_speed: DataValue<f32>,
    vertical_boost: DataValue<f32>,
    probe_distance: DataValue<f32>,
    /// Boost acceleration at the start of the window, units/s². Decays
    /// linearly to zero over the window.
    boost_acceleration: DataValue<f32>,
    boost_duration: DataValue<f32>,

    push_direction: Vec3,
    elapsed: f32,
    impulse_applied: bool,
    move_vector: Vec3,
    completed: bool,
}

impl PushOffExtendedState {
    pub const PUSH_DIRECTION: &'static str = "pushDirection";
    pub const IMPULSE_APPLIED: &'static str = "impulseApplied";

    pub fn new(push_speed: DataValue<f32>) -> Self {
        Self {
            push_speed,
            vertical_boost: DataValue::literal(2.),
            probe_distance: DataValue::literal(1.),
            boost_acceleration: DataValue::literal(8.),
            boost_duration: DataValue::literal(0.4),
            push_direction: Vec3::ZERO,
            elapsed: 0.,
            impulse_applied: false,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_boost(mut self, acceleration: DataValue<f32>, duration: DataValue<f32>) -> Self {
        self.boost_acceleration = acceleration;
        self.boost_duration = duration;
        self
    }
}

impl MotionState for PushOffExtendedState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn on_enter(&mut self, ctx: StateContext) {
        let forward = ctx.frame.flat_forward(ctx.body.up);
        self.push_direction = ctx
            .environment
            .raycast(ctx.frame.position, forward, self.probe_distance.get())
            .map(|hit| hit.normal)
            .unwrap_or(-forward);
        self.elapsed = 0.;
        self.impulse_applied = false;
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if !self.impulse_applied {
            ctx.body.velocity = self.push_direction * self.push_speed.get()
                + ctx.body.up * self.vertical_boost.get();
            self.impulse_applied = true;
        }

        let duration = self.boost_duration.get().max(1e-4);
        if self.elapsed < duration {
            let falloff = 1. - self.elapsed / duration;
            ctx.body.velocity +=
                self.push_direction * self.boost_acceleration.get() * falloff * ctx.dt;
            self.elapsed += ctx.dt;
        } else {
            self.completed = true;
        }

        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.push_direction = Vec3::ZERO;
        self.elapsed = 0.;
        self.impulse_applied = false;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.push_speed,
            &mut self.vertical_boost,
            &mut self.probe_distance,
            &mut self.boost_acceleration,
            &mut self.boost_duration,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::PUSH_DIRECTION, self.push_direction);
        writer.write_f32(keys::ELAPSED, self.elapsed);
        writer.write_bool(Self::IMPULSE_APPLIED, self.impulse_applied);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.push_direction = reader.read_vec3(Self::PUSH_DIRECTION, self.push_direction);
        self.elapsed = reader.read_f32(keys::ELAPSED, self.elapsed);
        self.impulse_applied = reader.read_bool(Self::IMPULSE_APPLIED, self.impulse_applied);
    }

    fn display_name(&self) -> String {
        "Push Off (Extended)".into()
    }
}
