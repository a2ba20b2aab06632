use bevy::math::{Vec2, Vec3};
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Short evasive burst along the stick direction, quantized to the eight
/// compass directions of the character frame. No input dodges backwards.
/// The direction is locked at entry; steering during the burst is ignored.
#[derive(Clone, Debug)]
pub struct DodgeState {
    dodge_speed: DataValue<f32>,
    dodge_duration: DataValue<f32>,

    direction: Vec3,
    elapsed: f32,
    move_vector: Vec3,
    completed: bool,
}

impl DodgeState {
    pub const DIRECTION: &'static str = "direction";

    pub fn new(dodge_speed: DataValue<f32>) -> Self {
        Self {
            dodge_speed,
            dodge_duration: DataValue::literal(0.25),
            direction: Vec3::ZERO,
            elapsed: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_duration(mut self, duration: DataValue<f32>) -> Self {
        self.dodge_duration = duration;
        self
    }

    /// Snaps a stick vector to the nearest of the eight compass directions,
    /// returning a unit [`Vec2`] in input space.
    fn quantize(input: Vec2) -> Vec2 {
        let step = std::f32::consts::FRAC_PI_4;
        let angle = input.y.atan2(input.x);
        let snapped = (angle / step).round() * step;
        Vec2::new(snapped.cos(), snapped.sin())
    }
}

impl MotionState for DodgeState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn on_enter(&mut self, ctx: StateContext) {
        let input = if ctx.frame.input_move.length_squared() > 1e-4 {
            Self::quantize(ctx.frame.input_move)
        } else {
            Vec2::new(0., -1.)
        };
        let forward = ctx.frame.flat_forward(ctx.body.up);
        let right = ctx.frame.flat_right(ctx.body.up);
        self.direction = (right * input.x + forward * input.y).normalize_or_zero();
        self.elapsed = 0.;
        self.completed = false;
        self.move_vector = Vec3::ZERO;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = Vec3::ZERO;
            return;
        }

        let planar = self.direction * self.dodge_speed.get();
        ctx.body.velocity = planar + ctx.body.up * ctx.body.vertical_speed();
        self.move_vector = planar * ctx.dt;

        self.elapsed += ctx.dt;
        if self.elapsed >= self.dodge_duration.get() {
            self.completed = true;
        }
    }

    fn on_exit(&mut self) {
        self.direction = Vec3::ZERO;
        self.elapsed = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![&mut self.dodge_speed, &mut self.dodge_duration]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::DIRECTION, self.direction);
        writer.write_f32(keys::ELAPSED, self.elapsed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.direction = reader.read_vec3(Self::DIRECTION, self.direction);
        self.elapsed = reader.read_f32(keys::ELAPSED, self.elapsed);
    }

    fn display_name(&self) -> String {
        "Dodge".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 0.05;

    #[test]
    fn diagonal_input_snaps_to_compass_direction() {
        // Slightly off the forward-right diagonal still dodges on it.
        let snapped = DodgeState::quantize(Vec2::new(0.8, 1.0));
        let diagonal = Vec2::splat(std::f32::consts::FRAC_1_SQRT_2);
        assert!((snapped - diagonal).length() < 1e-5);
    }

    #[test]
    fn no_input_dodges_backwards() {
        let mut harness = Harness::grounded();
        let mut state = DodgeState::new(DataValue::literal(8.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        // Facing -Z, so backwards is +Z.
        assert!(state.move_vector().z > 0.);
        assert!(state.move_vector().x.abs() < 1e-5);
    }

    #[test]
    fn direction_locked_at_entry() {
        let mut harness = Harness::grounded();
        harness.frame.input_move = Vec2::new(0., 1.);
        let mut state = DodgeState::new(DataValue::literal(8.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        let first = state.move_vector();

        harness.frame.input_move = Vec2::new(1., 0.);
        state.update(harness.ctx(DT));
        assert!((state.move_vector() - first).length() < 1e-6);
    }

    #[test]
    fn completes_after_duration() {
        let mut harness = Harness::grounded();
        let mut state = DodgeState::new(DataValue::literal(8.));
        state.on_enter(harness.ctx(DT));
        for _ in 0..5 {
            state.update(harness.ctx(DT));
        }
        assert!(state.completed());
        // A completed dodge contributes no further displacement.
        state.update(harness.ctx(DT));
        assert_eq!(state.move_vector(), Vec3::ZERO);
    }
}
