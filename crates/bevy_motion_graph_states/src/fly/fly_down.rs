use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::{Remappable, SwitchRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Hold-to-descend counterpart of [`FlyUpState`](super::fly_up::FlyUpState).
/// Completes on the switch's falling edge or when ground contact is
/// reached, so flight graphs can chain into a landing.
#[derive(Clone, Debug)]
pub struct FlyDownState {
    descend_speed: DataValue<f32>,
    damping: DataValue<f32>,
    descend_switch: SwitchRef,

    vertical: f32,
    smoothing: f32,
    move_vector: Vec3,
    completed: bool,
}

impl FlyDownState {
    pub const VERTICAL: &'static str = "vertical";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(descend_speed: DataValue<f32>, descend_switch: SwitchRef) -> Self {
        Self {
            descend_speed,
            damping: DataValue::literal(0.3),
            descend_switch,
            vertical: 0.,
            smoothing: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }
}

impl MotionState for FlyDownState {
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
        self.vertical = ctx.body.vertical_speed();
        self.smoothing = 0.;
        self.completed = ctx.body.is_grounded;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let held = self
            .descend_switch
            .get(ctx.blackboard)
            .map(|s| s.on)
            .unwrap_or(false);
        if !held || ctx.body.is_grounded {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let smooth_time = spring::damping_time(self.damping.get());
        self.vertical = spring::smooth_damp(
            self.vertical,
            -self.descend_speed.get(),
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );
        ctx.body.velocity = ctx.body.planar_velocity() + ctx.body.up * self.vertical;
        self.move_vector = ctx.body.up * self.vertical * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.vertical = 0.;
        self.smoothing = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.descend_speed,
            &mut self.damping,
            &mut self.descend_switch,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_f32(Self::VERTICAL, self.vertical);
        writer.write_f32(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.vertical = reader.read_f32(Self::VERTICAL, self.vertical);
        self.smoothing = reader.read_f32(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Fly Down".into()
    }
}
