use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::slope,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Crouch-slide: accelerates down the fall line of the current slope and
/// bleeds speed through friction on flatter ground. Completes when the
/// slide has decayed below a threshold or ground contact is lost.
#[derive(Clone, Debug)]
pub struct SlideState {
    /// Downslope acceleration at full steepness, units/s².
    slope_acceleration: DataValue<f32>,
    /// Flat-ground deceleration, units/s².
    friction: DataValue<f32>,
    end_speed: DataValue<f32>,

    velocity: Vec3,
    /// Set once the slide has reached `end_speed`; entering at rest on a
    /// slope gets a chance to build up before the end check applies.
    peaked: bool,
    move_vector: Vec3,
    completed: bool,
}

impl SlideState {
    pub const VELOCITY: &'static str = "velocity";
    pub const PEAKED: &'static str = "peaked";

    pub fn new() -> Self {
        Self {
            slope_acceleration: DataValue::literal(12.),
            friction: DataValue::literal(6.),
            end_speed: DataValue::literal(1.),
            velocity: Vec3::ZERO,
            peaked: false,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_tuning(
        mut self,
        slope_acceleration: DataValue<f32>,
        friction: DataValue<f32>,
    ) -> Self {
        self.slope_acceleration = slope_acceleration;
        self.friction = friction;
        self
    }
}

impl Default for SlideState {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionState for SlideState {
    fn move_vector(&self) -> Vec3 {
        self.move_vector
    }

    fn completed(&self) -> bool {
        self.completed
    }

    fn on_enter(&mut self, ctx: StateContext) {
        self.velocity = ctx.body.planar_velocity();
        self.peaked = false;
        self.completed = false;
        self.move_vector = self.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if !ctx.body.is_grounded {
            self.completed = true;
            self.move_vector = self.velocity * ctx.dt;
            return;
        }

        let up = ctx.body.up;
        let normal = ctx.body.ground_normal;

        // Fall line, flattened to the plane perpendicular to up; the slope
        // projection below re-adds the vertical component.
        let fall = (up - normal * up.dot(normal)).normalize_or_zero() * -1.;
        let downhill = (fall - up * fall.dot(up)).normalize_or_zero();
        // Sine of the slope angle: the gravity component along the fall line.
        let cosine = normal.dot(up).clamp(0., 1.);
        let steepness = (1. - cosine * cosine).max(0.).sqrt();

        self.velocity += downhill * self.slope_acceleration.get() * steepness * ctx.dt;

        let speed = self.velocity.length();
        if speed > 0. {
            let drop = self.friction.get() * (1. - steepness) * ctx.dt;
            self.velocity *= ((speed - drop).max(0.)) / speed;
        }

        if self.velocity.length() >= self.end_speed.get() {
            self.peaked = true;
        } else if self.peaked {
            self.completed = true;
        }

        // Follow the slope so the slide hugs the ground.
        let projected = slope::project_direction(self.velocity, up, normal);
        self.move_vector = projected * ctx.dt;
        ctx.body.velocity = self.velocity + up * ctx.body.vertical_speed();
    }

    fn on_exit(&mut self) {
        self.velocity = Vec3::ZERO;
        self.peaked = false;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.slope_acceleration,
            &mut self.friction,
            &mut self.end_speed,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::VELOCITY, self.velocity);
        writer.write_bool(Self::PEAKED, self.peaked);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.velocity = reader.read_vec3(Self::VELOCITY, self.velocity);
        self.peaked = reader.read_bool(Self::PEAKED, self.peaked);
    }

    fn display_name(&self) -> String {
        "Slide".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    #[test]
    fn accelerates_downhill() {
        let mut harness = Harness::grounded();
        harness.body.ground_normal = Vec3::new(-0.4, 1., 0.).normalize();
        let mut state = SlideState::new();
        state.on_enter(harness.ctx(DT));

        for _ in 0..60 {
            state.update(harness.ctx(DT));
        }
        assert!(!state.completed());
        // Downhill on this slope is -X.
        assert!(harness.body.velocity.x < -0.5);
    }

    #[test]
    fn entering_at_rest_on_a_slope_does_not_complete_instantly() {
        let mut harness = Harness::grounded();
        harness.body.ground_normal = Vec3::new(-0.4, 1., 0.).normalize();
        let mut state = SlideState::new();
        state.on_enter(harness.ctx(DT));

        state.update(harness.ctx(DT));
        assert!(!state.completed());
    }

    #[test]
    fn steep_slope_builds_past_end_speed() {
        let mut harness = Harness::grounded();
        // ~45 degrees: slope gain has to beat residual friction outright.
        harness.body.ground_normal = Vec3::new(-1., 1., 0.).normalize();
        let mut state = SlideState::new();
        state.on_enter(harness.ctx(DT));

        for _ in 0..60 {
            state.update(harness.ctx(DT));
        }
        assert!(!state.completed());
        assert!(harness.body.velocity.length() > 1.);
    }

    #[test]
    fn friction_stops_slide_on_flat_ground() {
        let mut harness = Harness::grounded();
        harness.body.velocity = Vec3::new(3., 0., 0.);
        let mut state = SlideState::new();
        state.on_enter(harness.ctx(DT));

        for _ in 0..120 {
            state.update(harness.ctx(DT));
            if state.completed() {
                break;
            }
        }
        assert!(state.completed());
    }

    #[test]
    fn leaving_ground_completes() {
        let mut harness = Harness::grounded();
        harness.body.velocity = Vec3::new(3., 0., 0.);
        let mut state = SlideState::new();
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));

        harness.body.is_grounded = false;
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
