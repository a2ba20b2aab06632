use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Hold against a wall while sliding down slowly. Contact is re-cast each
/// tick; the state completes when the wall is gone or ground is reached.
#[derive(Clone, Debug)]
pub struct WallClingState {
    /// Downward creep while clinging, units/s.
    slide_speed: DataValue<f32>,
    /// Speed pressing the character into the wall, units/s.
    press_speed: DataValue<f32>,
    probe_distance: DataValue<f32>,

    wall_normal: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl WallClingState {
    pub const WALL_NORMAL: &'static str = "wallNormal";

    pub fn new(slide_speed: DataValue<f32>) -> Self {
        Self {
            slide_speed,
            press_speed: DataValue::literal(0.5),
            probe_distance: DataValue::literal(1.),
            wall_normal: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }
}

impl MotionState for WallClingState {
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
        self.completed = self.wall_normal == Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        ctx.body.velocity = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = Vec3::ZERO;
            return;
        }

        let hit = ctx.environment.raycast(
            ctx.frame.position,
            -self.wall_normal,
            self.probe_distance.get(),
        );
        let Some(hit) = hit else {
            self.completed = true;
            self.move_vector = Vec3::ZERO;
            return;
        };
        self.wall_normal = hit.normal;

        if ctx.body.is_grounded {
            self.completed = true;
            self.move_vector = Vec3::ZERO;
            ctx.body.velocity = Vec3::ZERO;
            return;
        }

        let velocity =
            -ctx.body.up * self.slide_speed.get() - self.wall_normal * self.press_speed.get();
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.wall_normal = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.slide_speed,
            &mut self.press_speed,
            &mut self.probe_distance,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::WALL_NORMAL, self.wall_normal);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.wall_normal = reader.read_vec3(Self::WALL_NORMAL, self.wall_normal);
    }

    fn display_name(&self) -> String {
        "Wall Cling".into()
    }
}
