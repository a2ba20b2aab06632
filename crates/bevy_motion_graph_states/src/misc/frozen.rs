use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    persistence::{PropertyReader, PropertyWriter, keys},
};

/// Pins the character in place. Velocity is zeroed every tick and both
/// platform motion and external forces are ignored, so nothing the world
/// does moves a frozen character. Never completes on its own.
#[derive(Clone, Debug, Default)]
pub struct FrozenState;

impl FrozenState {
    pub fn new() -> Self {
        Self
    }
}

impl MotionState for FrozenState {
    fn move_vector(&self) -> Vec3 {
        Vec3::ZERO
    }

    fn apply_gravity(&self) -> bool {
        false
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn ignore_platform_move(&self) -> bool {
        true
    }

    fn ignore_external_forces(&self) -> bool {
        true
    }

    fn update(&mut self, ctx: StateContext) {
        ctx.body.velocity = Vec3::ZERO;
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, Vec3::ZERO);
        writer.write_bool(keys::COMPLETED, false);
    }

    fn read_properties(&mut self, _reader: &dyn PropertyReader) {}

    fn display_name(&self) -> String {
        "Frozen".into()
    }
}
