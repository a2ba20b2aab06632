use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Default airborne state. Gravity is integrated by the graph layer; this
/// state only steers the planar component with limited air control and
/// completes when ground contact returns.
#[derive(Clone, Debug)]
pub struct FallingState {
    /// Planar speed air control accelerates towards.
    air_speed: DataValue<f32>,
    /// Steering acceleration while airborne, units/s².
    air_control: DataValue<f32>,

    move_vector: Vec3,
    completed: bool,
}

impl FallingState {
    pub fn new(air_speed: DataValue<f32>) -> Self {
        Self {
            air_speed,
            air_control: DataValue::literal(10.),
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_air_control(mut self, air_control: DataValue<f32>) -> Self {
        self.air_control = air_control;
        self
    }
}

impl MotionState for FallingState {
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
        self.completed = ctx.body.is_grounded;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if ctx.body.is_grounded {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let target = ctx.frame.move_direction(ctx.body.up) * self.air_speed.get();
        let planar = ctx.body.planar_velocity();
        let delta = target - planar;
        let max_step = self.air_control.get() * ctx.dt;
        let step = if delta.length() > max_step {
            delta.normalize_or_zero() * max_step
        } else {
            delta
        };
        ctx.body.velocity = planar + step + ctx.body.up * ctx.body.vertical_speed();
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.air_speed, &mut self.air_control]
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
        "Falling".into()
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    #[test]
    fn air_control_steers_toward_input() {
        let mut harness = Harness::new();
        harness.frame.input_move = Vec2::new(1., 0.);
        let mut state = FallingState::new(DataValue::literal(4.));
        state.on_enter(harness.ctx(DT));

        for _ in 0..120 {
            state.update(harness.ctx(DT));
        }
        assert!((harness.body.velocity.x - 4.).abs() < 1e-2);
    }

    #[test]
    fn vertical_speed_untouched_by_steering() {
        let mut harness = Harness::new();
        harness.body.velocity = Vec3::new(0., -7., 0.);
        harness.frame.input_move = Vec2::new(1., 0.);
        let mut state = FallingState::new(DataValue::literal(4.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert_eq!(harness.body.velocity.y, -7.);
    }

    #[test]
    fn landing_completes() {
        let mut harness = Harness::new();
        let mut state = FallingState::new(DataValue::literal(4.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(!state.completed());

        harness.body.is_grounded = true;
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
