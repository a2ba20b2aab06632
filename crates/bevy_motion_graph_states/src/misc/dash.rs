use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Fixed-speed burst along the heading captured at entry. Camera movement
/// during the dash does not bend the path; the window expiring completes
/// the state.
#[derive(Clone, Debug)]
pub struct DashState {
    dash_speed: DataValue<f32>,
    dash_duration: DataValue<f32>,

    heading: Vec3,
    elapsed: f32,
    move_vector: Vec3,
    completed: bool,
}

impl DashState {
    pub const HEADING: &'static str = "heading";

    pub fn new(dash_speed: DataValue<f32>) -> Self {
        Self {
            dash_speed,
            dash_duration: DataValue::literal(0.2),
            heading: Vec3::ZERO,
            elapsed: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_duration(mut self, duration: DataValue<f32>) -> Self {
        self.dash_duration = duration;
        self
    }
}

impl MotionState for DashState {
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
        self.heading = ctx.frame.flat_forward(ctx.body.up);
        self.elapsed = 0.;
        self.completed = false;
        self.move_vector = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let velocity = self.heading * self.dash_speed.get();
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;

        self.elapsed += ctx.dt;
        if self.elapsed >= self.dash_duration.get() {
            self.completed = true;
        }
    }

    fn on_exit(&mut self) {
        self.heading = Vec3::ZERO;
        self.elapsed = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.dash_speed, &mut self.dash_duration]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::HEADING, self.heading);
        writer.write_f32(keys::ELAPSED, self.elapsed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.heading = reader.read_vec3(Self::HEADING, self.heading);
        self.elapsed = reader.read_f32(keys::ELAPSED, self.elapsed);
    }

    fn display_name(&self) -> String {
        "Dash".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 0.05;

    #[test]
    fn heading_is_captured_at_entry() {
        let mut harness = Harness::grounded();
        let mut state = DashState::new(DataValue::literal(12.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        let first = state.move_vector();

        // Turning the camera mid-dash must not bend the path.
        harness.frame.aim_forward = Vec3::X;
        state.update(harness.ctx(DT));
        assert!((state.move_vector() - first).length() < 1e-6);
    }

    #[test]
    fn window_expiry_completes() {
        let mut harness = Harness::grounded();
        let mut state =
            DashState::new(DataValue::literal(12.)).with_duration(DataValue::literal(0.1));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(!state.completed());
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }

    #[test]
    fn dashes_at_fixed_speed() {
        let mut harness = Harness::grounded();
        let mut state = DashState::new(DataValue::literal(12.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!((harness.body.velocity.length() - 12.).abs() < 1e-5);
    }
}
