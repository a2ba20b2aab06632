use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    persistence::{PropertyReader, PropertyWriter, keys},
};

/// Does nothing. Preserves the body velocity and reports completed from
/// the first tick, making it a safe default target for unfinished graph
/// wiring.
#[derive(Clone, Debug, Default)]
pub struct NullState {
    move_vector: Vec3,
}

impl NullState {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MotionState for NullState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        true
    }

    fn update(&mut self, ctx: StateContext) {
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, true);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
    }

    fn display_name(&self) -> String {
        "Null".into()
    }
}
