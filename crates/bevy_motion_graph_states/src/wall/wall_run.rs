use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Run along a wall. The wall normal is re-derived from a fresh cast every
/// tick so curved walls steer the run; losing contact or exhausting the run
/// window completes the state. Vertical lift decays linearly over the
/// window, giving the run its arc.
#[derive(Clone, Debug)]
pub struct WallRunState {
    run_speed: DataValue<f32>,
    /// Upward speed at the start of the run, units/s.
    initial_lift: DataValue<f32>,
    run_duration: DataValue<f32>,
    probe_distance: DataValue<f32>,

    wall_normal: Vec3,
    elapsed: f32,
    move_vector: Vec3,
    completed: bool,
}

impl WallRunState {
    pub const WALL_NORMAL: &'static str = "wallNormal";

    pub fn new(run_speed: DataValue<f32>) -> Self {
        Self {
            run_speed,
            initial_lift: DataValue::literal(2.),
            run_duration: DataValue::literal(1.2),
            probe_distance: DataValue::literal(1.),
            wall_normal: Vec3::ZERO,
            elapsed: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_run_window(mut self, lift: DataValue<f32>, duration: DataValue<f32>) -> Self {
        self.initial_lift = lift;
        self.run_duration = duration;
        self
    }

    /// Tangent along the wall closest to the direction the character faces.
    fn tangent(&self, forward: Vec3) -> Vec3 {
        (forward - self.wall_normal * forward.dot(self.wall_normal)).normalize_or_zero()
    }
}

impl MotionState for WallRunState {
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
        let forward = ctx.frame.flat_forward(ctx.body.up);
        self.wall_normal = ctx
            .environment
            .raycast(ctx.frame.position, forward, self.probe_distance.get())
            .map(|hit| hit.normal)
            .unwrap_or(Vec3::ZERO);
        self.elapsed = 0.;
        self.completed = self.wall_normal == Vec3::ZERO;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        // Track the surface: cast back toward where the wall last was.
        let Some(hit) = ctx.environment.raycast(
            ctx.frame.position,
            -self.wall_normal,
            self.probe_distance.get(),
        ) else {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        };
        self.wall_normal = hit.normal;

        let duration = self.run_duration.get().max(1e-4);
        if self.elapsed >= duration {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }
        let lift = self.initial_lift.get() * (1. - self.elapsed / duration);
        self.elapsed += ctx.dt;

        let forward = ctx.frame.flat_forward(ctx.body.up);
        let velocity = self.tangent(forward) * self.run_speed.get() + ctx.body.up * lift;
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.wall_normal = Vec3::ZERO;
        self.elapsed = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.run_speed,
            &mut self.initial_lift,
            &mut self.run_duration,
            &mut self.probe_distance,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::WALL_NORMAL, self.wall_normal);
        writer.write_f32(keys::ELAPSED, self.elapsed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.wall_normal = reader.read_vec3(Self::WALL_NORMAL, self.wall_normal);
        self.elapsed = reader.read_f32(keys::ELAPSED, self.elapsed);
    }

    fn display_name(&self) -> String {
        "Wall Run".into()
    }
}
