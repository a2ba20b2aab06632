use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// One-shot kick away from the surface the character faces. The push
/// direction is captured at entry (the context can change before the first
/// update); the impulse is applied exactly once, then the state holds the
/// resulting velocity until the graph layer transitions away.
#[derive(Clone, Debug)]
pub struct PushOffState {
    push_speed: DataValue<f32>,
    vertical_boost: DataValue<f32>,
    /// How far ahead to look for the surface being pushed from.
    probe_distance: DataValue<f32>,

    push_direction: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl PushOffState {
    pub const PUSH_DIRECTION: &'static str = "pushDirection";

    pub fn new(push_speed: DataValue<f32>) -> Self {
        Self {
            push_speed,
            vertical_boost: DataValue::literal(2.),
            probe_distance: DataValue::literal(1.),
            push_direction: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_vertical_boost(mut self, boost: DataValue<f32>) -> Self {
        self.vertical_boost = boost;
        self
    }
}

impl MotionState for PushOffState {
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
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if !self.completed {
            ctx.body.velocity = self.push_direction * self.push_speed.get()
                + ctx.body.up * self.vertical_boost.get();
            self.completed = true;
        }
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.push_direction = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.push_speed,
            &mut self.vertical_boost,
            &mut self.probe_distance,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::PUSH_DIRECTION, self.push_direction);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.push_direction = reader.read_vec3(Self::PUSH_DIRECTION, self.push_direction);
    }

    fn display_name(&self) -> String {
        "Push Off".into()
    }
}
