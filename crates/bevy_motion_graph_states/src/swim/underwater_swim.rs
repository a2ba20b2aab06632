use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Fully submerged swimming. Forward input follows the full aim direction
/// so the character can dive and surface by looking; a constant buoyancy
/// drift pushes gently upward. Completes when the water is gone.
#[derive(Clone, Debug)]
pub struct UnderwaterSwimState {
    swim_speed: DataValue<f32>,
    damping: DataValue<f32>,
    /// Upward drift from buoyancy, units/s.
    buoyancy: DataValue<f32>,

    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl UnderwaterSwimState {
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(swim_speed: DataValue<f32>) -> Self {
        Self {
            swim_speed,
            damping: DataValue::literal(0.7),
            buoyancy: DataValue::literal(0.3),
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_buoyancy(mut self, buoyancy: DataValue<f32>) -> Self {
        self.buoyancy = buoyancy;
        self
    }
}

impl MotionState for UnderwaterSwimState {
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
        self.velocity = ctx.body.velocity;
        self.smoothing = Vec3::ZERO;
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if ctx
            .environment
            .water_surface_height(ctx.frame.position)
            .is_none()
        {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let forward = ctx.frame.aim_forward.normalize_or_zero();
        let right = ctx.frame.flat_right(ctx.body.up);
        let input = ctx.frame.input_move;
        let direction = (forward * input.y + right * input.x).normalize_or_zero();
        let target = direction * self.swim_speed.get() * input.length().min(1.);

        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            target,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );

        ctx.body.velocity = self.velocity + ctx.body.up * self.buoyancy.get();
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.swim_speed,
            &mut self.damping,
            &mut self.buoyancy,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(keys::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.velocity = reader.read_vec3(keys::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Underwater Swim".into()
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec2;

    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    fn submerged() -> Harness {
        let mut harness = Harness::new();
        harness.env.water_height = Some(10.);
        harness
    }

    #[test]
    fn dives_along_the_aim_direction() {
        let mut harness = submerged();
        harness.frame.aim_forward = Vec3::new(0., -1., -1.).normalize();
        harness.frame.input_move = Vec2::new(0., 1.);
        let mut state = UnderwaterSwimState::new(DataValue::literal(4.)).with_buoyancy(
            DataValue::literal(0.),
        );
        state.on_enter(harness.ctx(DT));
        for _ in 0..600 {
            state.update(harness.ctx(DT));
        }
        assert!(harness.body.velocity.y < -2.);
        assert!(harness.body.velocity.z < -2.);
    }

    #[test]
    fn buoyancy_drifts_upward_at_rest() {
        let mut harness = submerged();
        let mut state = UnderwaterSwimState::new(DataValue::literal(4.));
        state.on_enter(harness.ctx(DT));
        for _ in 0..300 {
            state.update(harness.ctx(DT));
        }
        assert!((harness.body.velocity.y - 0.3).abs() < 1e-2);
    }

    #[test]
    fn water_gone_completes() {
        let mut harness = submerged();
        let mut state = UnderwaterSwimState::new(DataValue::literal(4.));
        state.on_enter(harness.ctx(DT));
        harness.env.water_height = None;
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
