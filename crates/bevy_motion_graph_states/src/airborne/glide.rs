use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Controlled slow descent. Manages its own vertical motion (gravity off)
/// by sinking at a fixed rate while damping the planar velocity toward the
/// steered glide speed. Completes on landing.
#[derive(Clone, Debug)]
pub struct GlideState {
    glide_speed: DataValue<f32>,
    /// Downward drift while gliding, units/s.
    sink_rate: DataValue<f32>,
    damping: DataValue<f32>,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl GlideState {
    pub const VELOCITY: &'static str = "velocity";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(glide_speed: DataValue<f32>) -> Self {
        Self {
            glide_speed,
            sink_rate: DataValue::literal(1.5),
            damping: DataValue::literal(0.6),
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_sink_rate(mut self, sink_rate: DataValue<f32>) -> Self {
        self.sink_rate = sink_rate;
        self
    }
}

impl MotionState for GlideState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply_gravity(&self) -> bool {
        false
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = ctx.body.is_grounded;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if ctx.body.is_grounded {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let target = ctx.frame.move_direction(ctx.body.up) * self.glide_speed.get();
        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );

        ctx.body.velocity = self.velocity - ctx.body.up * self.sink_rate.get();
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.glide_speed,
            &mut self.sink_rate,
            &mut self.damping,
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
        "Glide".into()
    }
}
