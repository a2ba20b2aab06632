use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

const PHASE_RISE: u32 = 0;
const PHASE_FORWARD: u32 = 1;

/// Climb over a ledge in two phases: rise straight up past the lip, then
/// translate forward onto the surface. The phase index is part of the
/// saved properties so a mid-mantle snapshot resumes in the right phase.
#[derive(Clone, Debug)]
pub struct MantleState {
    rise_height: DataValue<f32>,
    rise_speed: DataValue<f32>,
    forward_distance: DataValue<f32>,
    forward_speed: DataValue<f32>,

    forward: Vec3,
    phase: u32,
    /// Distance covered within the current phase.
    progress: f32,
    move_vector: Vec3,
    completed: bool,
}

impl MantleState {
    pub const FORWARD: &'static str = "forward";
    pub const PROGRESS: &'static str = "progress";

    pub fn new(rise_height: DataValue<f32>, forward_distance: DataValue<f32>) -> Self {
        Self {
            rise_height,
            rise_speed: DataValue::literal(2.5),
            forward_distance,
            forward_speed: DataValue::literal(2.),
            forward: Vec3::ZERO,
            phase: PHASE_RISE,
            progress: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_speeds(mut self, rise_speed: DataValue<f32>, forward_speed: DataValue<f32>) -> Self {
        self.rise_speed = rise_speed;
        self.forward_speed = forward_speed;
        self
    }
}

impl MotionState for MantleState {
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
        self.forward = ctx.frame.flat_forward(ctx.body.up);
        self.phase = PHASE_RISE;
        self.progress = 0.;
        self.completed = false;
        self.move_vector = Vec3::ZERO;
        ctx.body.velocity = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = Vec3::ZERO;
            return;
        }

        let (direction, speed, extent) = match self.phase {
            PHASE_RISE => (ctx.body.up, self.rise_speed.get(), self.rise_height.get()),
            _ => (
                self.forward,
                self.forward_speed.get(),
                self.forward_distance.get(),
            ),
        };

        let remaining = (extent - self.progress).max(0.);
        let step = (speed * ctx.dt).min(remaining);
        self.progress += step;
        self.move_vector = direction * step;
        ctx.body.velocity = direction * speed;

        if self.progress >= extent {
            if self.phase == PHASE_RISE {
                self.phase = PHASE_FORWARD;
                self.progress = 0.;
            } else {
                self.completed = true;
                ctx.body.velocity = Vec3::ZERO;
            }
        }
    }

    fn on_exit(&mut self) {
        self.forward = Vec3::ZERO;
        self.phase = PHASE_RISE;
        self.progress = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.rise_height,
            &mut self.rise_speed,
            &mut self.forward_distance,
            &mut self.forward_speed,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::FORWARD, self.forward);
        writer.write_u32(keys::PHASE, self.phase);
        writer.write_f32(Self::PROGRESS, self.progress);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.forward = reader.read_vec3(Self::FORWARD, self.forward);
        self.phase = reader.read_u32(keys::PHASE, self.phase);
        self.progress = reader.read_f32(Self::PROGRESS, self.progress);
    }

    fn display_name(&self) -> String {
        "Mantle".into()
    }
}
