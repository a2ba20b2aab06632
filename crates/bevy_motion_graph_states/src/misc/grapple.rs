use bevy::{log::debug, math::Vec3};
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::{Remappable, TransformRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Reel toward a grapple anchor published through a transform parameter.
/// The anchor distance is captured at entry; the pull accelerates up to
/// `max_speed` and completes on arrival, on detach (parameter nulled), or
/// if the character ends up farther away than it started.
#[derive(Clone, Debug)]
pub struct GrappleState {
    acceleration: DataValue<f32>,
    max_speed: DataValue<f32>,
    arrive_radius: DataValue<f32>,
    target: TransformRef,

    entry_distance: f32,
    speed: f32,
    move_vector: Vec3,
    completed: bool,
}

impl GrappleState {
    pub const ENTRY_DISTANCE: &'static str = "entryDistance";
    pub const SPEED: &'static str = "speed";

    pub fn new(target: TransformRef) -> Self {
        Self {
            acceleration: DataValue::literal(30.),
            max_speed: DataValue::literal(15.),
            arrive_radius: DataValue::literal(0.5),
            target,
            entry_distance: 0.,
            speed: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_pull(mut self, acceleration: DataValue<f32>, max_speed: DataValue<f32>) -> Self {
        self.acceleration = acceleration;
        self.max_speed = max_speed;
        self
    }

    fn anchor(&self, ctx: &StateContext) -> Option<Vec3> {
        let handle = self.target.get(ctx.blackboard).flatten()?;
        ctx.environment.transform(handle).map(|t| t.translation)
    }
}

impl MotionState for GrappleState {
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

    fn ignore_external_forces(&self) -> bool {
        true
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.entry_distance = self
            .anchor(&ctx)
            .map(|anchor| (anchor - ctx.frame.position).length())
            .unwrap_or(0.);
        self.speed = 0.;
        self.completed = self.entry_distance <= 0.;
        if self.completed {
            debug!("grapple entered with no anchor in range, completing");
        }
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let Some(anchor) = self.anchor(&ctx) else {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        };

        let offset = anchor - ctx.frame.position;
        let distance = offset.length();
        if distance <= self.arrive_radius.get() || distance > self.entry_distance + 0.5 {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        self.speed = (self.speed + self.acceleration.get() * ctx.dt).min(self.max_speed.get());
        let velocity = offset.normalize_or_zero() * self.speed;
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.entry_distance = 0.;
        self.speed = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.acceleration,
            &mut self.max_speed,
            &mut self.arrive_radius,
            &mut self.target,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_f32(Self::ENTRY_DISTANCE, self.entry_distance);
        writer.write_f32(Self::SPEED, self.speed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.entry_distance = reader.read_f32(Self::ENTRY_DISTANCE, self.entry_distance);
        self.speed = reader.read_f32(Self::SPEED, self.speed);
    }

    fn display_name(&self) -> String {
        "Grapple".into()
    }
}
