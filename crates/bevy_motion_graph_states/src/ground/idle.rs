use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Damps planar velocity to rest. Completes once the character is close
/// enough to stationary, letting the graph settle on a resting node.
#[derive(Clone, Debug)]
pub struct IdleState {
    /// Damping ratio for the stop; lower stops harder.
    damping: DataValue<f32>,
    stop_speed: DataValue<f32>,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl IdleState {
    pub const VELOCITY: &'static str = "velocity";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new() -> Self {
        Self {
            damping: DataValue::literal(0.25),
            stop_speed: DataValue::literal(0.05),
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_damping(mut self, damping: DataValue<f32>) -> Self {
        self.damping = damping;
        self
    }
}

impl Default for IdleState {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionState for IdleState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = self.velocity.length() < self.stop_speed.get();
        self.move_vector = self.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            Vec3::ZERO,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );
        if self.velocity.length() < self.stop_speed.get() {
            self.velocity = Vec3::ZERO;
            self.completed = true;
        }
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
        vec![&mut self.damping, &mut self.stop_speed]
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
        "Idle".into()
    }
}
