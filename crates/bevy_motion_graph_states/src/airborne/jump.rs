use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::{FloatRef, Remappable},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Launches the character vertically and immediately completes, handing
/// control to a falling state. The takeoff speed is derived from the height
/// the jump should reach under the body's gravity: `v = sqrt(2 g h)`, with
/// `h` interpolated between `min_height` and `max_height` by the charge
/// parameter. An unbound charge jumps at full height.
#[derive(Clone, Debug)]
pub struct JumpState {
    min_height: DataValue<f32>,
    max_height: DataValue<f32>,
    charge: FloatRef,

    move_vector: Vec3,
    completed: bool,
}

impl JumpState {
    pub fn new(charge: FloatRef) -> Self {
        Self {
            min_height: DataValue::literal(0.25),
            max_height: DataValue::literal(1.),
            charge,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_heights(mut self, min_height: DataValue<f32>, max_height: DataValue<f32>) -> Self {
        self.min_height = min_height;
        self.max_height = max_height;
        self
    }
}

impl MotionState for JumpState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn apply_grounding_force(&self) -> bool {
        false
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if !self.completed {
            let charge = self.charge.get(ctx.blackboard).unwrap_or(1.).clamp(0., 1.);
            let height = self.min_height.get()
                + (self.max_height.get() - self.min_height.get()) * charge;
            let g = ctx.body.gravity.length();
            let takeoff = (2. * g * height.max(0.)).sqrt();
            ctx.body.velocity = ctx.body.planar_velocity() + ctx.body.up * takeoff;
            self.completed = true;
        }
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.min_height, &mut self.max_height, &mut self.charge]
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
        "Jump".into()
    }
}

#[cfg(test)]
mod tests {
    use bevy_motion_graph_core::{
        parameter::ParamValue, resolver::ReferenceResolver, shared_data::SharedStore,
    };

    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    #[test]
    fn unbound_charge_jumps_full_height() {
        let mut harness = Harness::grounded();
        harness.body.gravity = Vec3::new(0., -19.62, 0.);
        let mut state = JumpState::new(FloatRef::unbound());

        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(state.completed());
        // sqrt(2 * 19.62 * 1.0)
        assert!((harness.body.velocity.y - 6.264).abs() < 1e-2);
    }

    #[test]
    fn charge_interpolates_jump_height() {
        let mut harness = Harness::grounded();
        harness.body.gravity = Vec3::new(0., -19.62, 0.);
        harness.blackboard.declare("charge", ParamValue::Float(0.));

        let mut state = JumpState::new(FloatRef::named("charge"));
        let shared = SharedStore::default();
        ReferenceResolver::new(&harness.blackboard, &shared)
            .bind_state(&mut state)
            .unwrap();

        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        // Zero charge jumps at min height.
        let expected = (2.0_f32 * 19.62 * 0.25).sqrt();
        assert!((harness.body.velocity.y - expected).abs() < 1e-3);
    }

    #[test]
    fn takeoff_applied_exactly_once() {
        let mut harness = Harness::grounded();
        let mut state = JumpState::new(FloatRef::unbound());
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        let v = harness.body.velocity;
        state.update(harness.ctx(DT));
        assert_eq!(harness.body.velocity, v);
    }

    #[test]
    fn planar_velocity_carries_through_takeoff() {
        let mut harness = Harness::grounded();
        harness.body.velocity = Vec3::new(3., 0., -2.);
        let mut state = JumpState::new(FloatRef::unbound());
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert_eq!(harness.body.velocity.x, 3.);
        assert_eq!(harness.body.velocity.z, -2.);
        assert!(harness.body.velocity.y > 0.);
    }
}
