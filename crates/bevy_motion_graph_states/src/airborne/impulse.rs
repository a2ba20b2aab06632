use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Applies a fixed velocity impulse on its first update, then completes.
/// Useful as a launch pad, knockback, or scripted fling node. The impulse
/// is authored in world space; `local()` rotates it into the character's
/// facing instead.
#[derive(Clone, Debug)]
pub struct ImpulseState {
    impulse: DataValue<Vec3>,
    /// Replace the body velocity rather than adding to it.
    overwrite: bool,
    /// Interpret the impulse in character-local space.
    local: bool,

    move_vector: Vec3,
    completed: bool,
}

impl ImpulseState {
    pub fn new(impulse: DataValue<Vec3>) -> Self {
        Self {
            impulse,
            overwrite: false,
            local: false,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn overwriting(mut self) -> Self {
        self.overwrite = true;
        self
    }

    pub fn local(mut self) -> Self {
        self.local = true;
        self
    }
}

impl MotionState for ImpulseState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn ignore_external_forces(&self) -> bool {
        true
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if !self.completed {
            let mut impulse = self.impulse.get();
            if self.local {
                impulse = ctx.frame.rotation * impulse;
            }
            ctx.body.velocity = if self.overwrite {
                impulse
            } else {
                ctx.body.velocity + impulse
            };
            self.completed = true;
        }
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.impulse]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
    }

    fn display_name(&self) -> String {
        "Impulse".into()
    }
}
