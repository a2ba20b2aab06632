use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Hold position at the water surface. Planar drift is damped out and the
/// body bobs toward its resting height below the tracked surface, with the
/// same per-tick surface smoothing as the swim states. Completes when the
/// water disappears or the character touches ground.
#[derive(Clone, Debug)]
pub struct TreadWaterState {
    head_offset: DataValue<f32>,
    damping: DataValue<f32>,
    surface_blend: DataValue<f32>,
    vertical_gain: DataValue<f32>,

    tracked_surface: f32,
    velocity: Vec3,
    smoothing: Vec3,
    move_vector: Vec3,
    completed: bool,
}

impl TreadWaterState {
    pub const TRACKED_SURFACE: &'static str = "trackedSurface";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new() -> Self {
        Self {
            head_offset: DataValue::literal(-1.2),
            damping: DataValue::literal(0.4),
            surface_blend: DataValue::literal(0.15),
            vertical_gain: DataValue::literal(3.),
            tracked_surface: 0.,
            velocity: Vec3::ZERO,
            smoothing: Vec3::ZERO,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }
}

impl Default for TreadWaterState {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionState for TreadWaterState {
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
        self.tracked_surface = ctx
            .environment
            .water_surface_height(ctx.frame.position)
            .unwrap_or_else(|| ctx.frame.position.dot(ctx.body.up));
        self.velocity = ctx.body.planar_velocity();
        self.smoothing = Vec3::ZERO;
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let surface = ctx.environment.water_surface_height(ctx.frame.position);
        let (Some(surface), false) = (surface, ctx.body.is_grounded) else {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        };

        let blend = self.surface_blend.get().clamp(0., 1.);
        self.tracked_surface += (surface - self.tracked_surface) * blend;

        let up = ctx.body.up;
        let target_height = self.tracked_surface + self.head_offset.get();
        let vertical = (target_height - ctx.frame.position.dot(up)) * self.vertical_gain.get();

        let smooth_time = spring::damping_time(self.damping.get());
        self.velocity = spring::smooth_damp_vec3(
            self.velocity,
            Vec3::ZERO,
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );

        ctx.body.velocity = self.velocity + up * vertical;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.tracked_surface = 0.;
        self.velocity = Vec3::ZERO;
        self.smoothing = Vec3::ZERO;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.head_offset,
            &mut self.damping,
            &mut self.surface_blend,
            &mut self.vertical_gain,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_f32(Self::TRACKED_SURFACE, self.tracked_surface);
        writer.write_vec3(keys::VELOCITY, self.velocity);
        writer.write_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.tracked_surface = reader.read_f32(Self::TRACKED_SURFACE, self.tracked_surface);
        self.velocity = reader.read_vec3(keys::VELOCITY, self.velocity);
        self.smoothing = reader.read_vec3(Self::SMOOTHING, self.smoothing);
    }

    fn display_name(&self) -> String {
        "Tread Water".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    #[test]
    fn damps_planar_drift_to_zero() {
        let mut harness = Harness::new();
        harness.env.water_height = Some(1.2);
        harness.body.velocity = Vec3::new(2., 0., 0.);
        let mut state = TreadWaterState::new();
        state.on_enter(harness.ctx(DT));
        for _ in 0..600 {
            state.update(harness.ctx(DT));
        }
        assert!(harness.body.planar_velocity().length() < 1e-2);
    }

    #[test]
    fn bobs_toward_resting_height() {
        let mut harness = Harness::new();
        harness.env.water_height = Some(1.2);
        // Half a meter too deep.
        harness.frame.position = Vec3::new(0., -0.5, 0.);
        let mut state = TreadWaterState::new();
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(harness.body.velocity.y > 0.);
    }

    #[test]
    fn grounding_completes() {
        let mut harness = Harness::new();
        harness.env.water_height = Some(1.2);
        let mut state = TreadWaterState::new();
        state.on_enter(harness.ctx(DT));
        harness.body.is_grounded = true;
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
