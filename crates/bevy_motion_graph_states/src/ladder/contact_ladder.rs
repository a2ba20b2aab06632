use bevy::{log::debug, math::Vec3};
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::{Remappable, TransformRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Straight climb attached to a ladder published through a transform
/// parameter. Each tick the ladder transform is looked up again, so moving
/// ladders carry the character; the game detaches by nulling the parameter,
/// which completes the state. An unbound parameter degrades the same way.
#[derive(Clone, Debug)]
pub struct ContactLadderState {
    climb_speed: DataValue<f32>,
    /// Horizontal pull toward the ladder line, units/s².
    snap_strength: DataValue<f32>,
    ladder: TransformRef,

    move_vector: Vec3,
    completed: bool,
}

impl ContactLadderState {
    pub fn new(climb_speed: DataValue<f32>, ladder: TransformRef) -> Self {
        Self {
            climb_speed,
            snap_strength: DataValue::literal(8.),
            ladder,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }
}

impl MotionState for ContactLadderState {
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

    fn ignore_platform_move(&self) -> bool {
        true
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.completed = false;
        self.move_vector = Vec3::ZERO;
        ctx.body.velocity = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        let handle = self.ladder.get(ctx.blackboard).flatten();
        let Some(transform) = handle.and_then(|h| ctx.environment.transform(h)) else {
            // Detached (or never attached): hold still and hand back.
            if !self.completed {
                debug!("contact ladder has no resolvable ladder transform, completing");
            }
            self.completed = true;
            self.move_vector = Vec3::ZERO;
            ctx.body.velocity = Vec3::ZERO;
            return;
        };

        let up = ctx.body.up;
        let climb = ctx.frame.input_move.y.clamp(-1., 1.) * self.climb_speed.get();

        // Pull the planar offset back onto the ladder line.
        let offset = transform.translation - ctx.frame.position;
        let planar_offset = offset - up * offset.dot(up);
        let snap = planar_offset * self.snap_strength.get() * ctx.dt;

        let velocity = up * climb + snap;
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.climb_speed,
            &mut self.snap_strength,
            &mut self.ladder,
        ]
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
        "Contact Ladder".into()
    }
}
