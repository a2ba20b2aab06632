use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    motion_state::MotionState,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Burst of speed along the wall tangent. Like the wall run, the surface
/// is re-cast every tick; the dash ends the instant contact is lost or the
/// dash window expires. The tangent is chosen once at entry so the dash
/// direction does not wobble with the camera.
#[derive(Clone, Debug)]
pub struct WallDashState {
    dash_speed: DataValue<f32>,
    dash_duration: DataValue<f32>,
    probe_distance: DataValue<f32>,

    wall_normal: Vec3,
    tangent: Vec3,
    elapsed: f32,
    move_vector: Vec3,
    completed: bool,
}

impl WallDashState {
    pub const WALL_NORMAL: &'static str = "wallNormal";
    pub const TANGENT: &'static str = "tangent";

    pub fn new(dash_speed: DataValue<f32>) -> Self {
        Self {
            dash_speed,
            dash_duration: DataValue::literal(0.3),
            probe_distance: DataValue::literal(1.),
            wall_normal: Vec3::ZERO,
            tangent: Vec3::ZERO,
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

impl MotionState for WallDashState {
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
        match ctx
            .environment
            .raycast(ctx.frame.position, forward, self.probe_distance.get())
        {
            Some(hit) => {
                self.wall_normal = hit.normal;
                self.tangent =
                    (forward - hit.normal * forward.dot(hit.normal)).normalize_or_zero();
                self.completed = self.tangent == Vec3::ZERO;
            }
            None => {
                self.wall_normal = Vec3::ZERO;
                self.tangent = Vec3::ZERO;
                self.completed = true;
            }
        }
        self.elapsed = 0.;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        if self.completed {
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let still_touching = ctx
            .environment
            .raycast(
                ctx.frame.position,
                -self.wall_normal,
                self.probe_distance.get(),
            )
            .is_some();
        if !still_touching || self.elapsed >= self.dash_duration.get() {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }
        self.elapsed += ctx.dt;

        let velocity = self.tangent * self.dash_speed.get();
        ctx.body.velocity = velocity;
        self.move_vector = velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.wall_normal = Vec3::ZERO;
        self.tangent = Vec3::ZERO;
        self.elapsed = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.dash_speed,
            &mut self.dash_duration,
            &mut self.probe_distance,
        ]
    }

    fn write_properties(&self, writer: &mut dyn PropertyWriter) {
        writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
        writer.write_bool(keys::COMPLETED, self.completed);
        writer.write_vec3(Self::WALL_NORMAL, self.wall_normal);
        writer.write_vec3(Self::TANGENT, self.tangent);
        writer.write_f32(keys::ELAPSED, self.elapsed);
    }

    fn read_properties(&mut self, reader: &dyn PropertyReader) {
        self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
        self.completed = reader.read_bool(keys::COMPLETED, self.completed);
        self.wall_normal = reader.read_vec3(Self::WALL_NORMAL, self.wall_normal);
        self.tangent = reader.read_vec3(Self::TANGENT, self.tangent);
        self.elapsed = reader.read_f32(keys::ELAPSED, self.elapsed);
    }

    fn display_name(&self) -> String {
        "Wall Dash".into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    fn angled_wall_harness() -> Harness {
        let mut harness = Harness::new();
        harness.env.wall = Some((Vec3::new(0., 0., -0.6), Vec3::Z));
        // Face into the wall at 45° so the tangent is well defined.
        harness.frame.aim_forward = Vec3::new(1., 0., -1.).normalize();
        harness
    }

    #[test]
    fn dashes_along_the_wall_plane() {
        let mut harness = angled_wall_harness();
        let mut state = WallDashState::new(DataValue::literal(10.));
        state.on_enter(harness.ctx(DT));
        assert!(!state.completed());

        state.update(harness.ctx(DT));
        assert!(harness.body.velocity.x > 9.9);
        assert!(harness.body.velocity.z.abs() < 1e-5);
    }

    #[test]
    fn dash_window_expires() {
        let mut harness = angled_wall_harness();
        let mut state =
            WallDashState::new(DataValue::literal(10.)).with_duration(DataValue::literal(0.1));
        state.on_enter(harness.ctx(DT));
        for _ in 0..10 {
            state.update(harness.ctx(DT));
        }
        assert!(state.completed());
    }

    #[test]
    fn losing_contact_completes() {
        let mut harness = angled_wall_harness();
        let mut state = WallDashState::new(DataValue::literal(10.));
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(!state.completed());

        harness.env.wall = None;
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
