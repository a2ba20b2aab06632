use bevy::{log::debug, math::Vec3};
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::{Remappable, TransformRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// One-shot shove directly away from a source transform. With no source
/// available the state degrades to a completed passthrough.
#[derive(Clone, Debug)]
pub struct RepulseState {
    repulse_speed: DataValue<f32>,
    vertical_boost: DataValue<f32>,
    source: TransformRef,

    move_vector: Vec3,
    completed: bool,
}

impl RepulseState {
    pub fn new(repulse_speed: DataValue<f32>, source: TransformRef) -> Self {
        Self {
            repulse_speed,
            vertical_boost: DataValue::literal(1.),
            source,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_vertical_boost(mut self, boost: DataValue<f32>) -> Self {
        self.vertical_boost = boost;
        self
    }
}

impl MotionState for RepulseState {
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
            let source = self
                .source
                .get(ctx.blackboard)
                .flatten()
                .and_then(|h| ctx.environment.transform(h));
            if let Some(source) = source {
                let up = ctx.body.up;
                let offset = ctx.frame.position - source.translation;
                let away = (offset - up * offset.dot(up)).normalize_or_zero();
                ctx.body.velocity =
                    away * self.repulse_speed.get() + up * self.vertical_boost.get();
            } else {
                debug!("repulse has no resolvable source transform, passing through");
            }
            self.completed = true;
        }
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.repulse_speed,
            &mut self.vertical_boost,
            &mut self.source,
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
        "Repulse".into()
    }
}
