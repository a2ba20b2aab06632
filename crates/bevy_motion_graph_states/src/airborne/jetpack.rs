use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::{Remappable, SwitchRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Damped vertical thrust while the thrust switch is held. Vertical speed
/// springs toward `rise_speed`; planar velocity gets limited air control.
/// Releasing the switch (or leaving it unbound) completes the state.
#[derive(Clone, Debug)]
pub struct JetpackState {
    rise_speed: DataValue<f32>,
    damping: DataValue<f32>,
    air_speed: DataValue<f32>,
    /// Steering acceleration while thrusting, units/s².
    air_control: DataValue<f32>,
    thrust_switch: SwitchRef,

    vertical: f32,
    smoothing: f32,
    move_vector: Vec3,
    completed: bool,
}

impl JetpackState {
    pub const VERTICAL: &'static str = "vertical";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(rise_speed: DataValue<f32>, thrust_switch: SwitchRef) -> Self {
        Self {
            rise_speed,
            damping: DataValue::literal(0.5),
            air_speed: DataValue::literal(4.),
            air_control: DataValue::literal(10.),
            thrust_switch,
            vertical: 0.,
            smoothing: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }

    pub fn with_damping(mut self, damping: DataValue<f32>) -> Self {
        self.damping = damping;
        self
    }
}

impl MotionState for JetpackState {
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
        self.completed = false;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn update(&mut self, ctx: StateContext) {
        let held = self
            .thrust_switch
            .get(ctx.blackboard)
            .map(|s| s.on)
            .unwrap_or(false);
        if !held {
            self.completed = true;
            self.move_vector = ctx.body.velocity * ctx.dt;
            return;
        }

        let smooth_time = spring::damping_time(self.damping.get());
        self.vertical = spring::smooth_damp(
            self.vertical,
            self.rise_speed.get(),
            &mut self.smoothing,
            smooth_time,
            f32::MAX,
            ctx.dt,
        );

        let up = ctx.body.up;
        let target = ctx.frame.move_direction(up) * self.air_speed.get();
        let planar = ctx.body.planar_velocity();
        let delta = target - planar;
        let max_step = self.air_control.get() * ctx.dt;
        let step = if delta.length() > max_step {
            delta.normalize_or_zero() * max_step
        } else {
            delta
        };

        ctx.body.velocity = planar + step + up * self.vertical;
        self.move_vector = ctx.body.velocity * ctx.dt;
    }

    fn on_exit(&mut self) {
        self.vertical = 0.;
        self.smoothing = 0.;
        self.move_vector = Vec3::ZERO;
        self.completed = false;
    }

    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        vec![
            &mut self.rise_speed,
            &mut self.damping,
            &mut self.air_speed,
            &mut self.air_control,
            &mut self.thrust_switch,
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
        "Jetpack".into()
    }
}

#[cfg(test)]
mod tests {
    use bevy_motion_graph_core::{
        parameter::{ParamKind, ParamValue, SwitchValue},
        resolver::ReferenceResolver,
        shared_data::SharedStore,
    };

    use super::*;
    use crate::testing::Harness;

    const DT: f32 = 1. / 60.;

    fn bound_state(harness: &mut Harness) -> JetpackState {
        harness
            .blackboard
            .declare("thrust", ParamValue::Switch(SwitchValue::default()));
        let mut state = JetpackState::new(DataValue::literal(5.), SwitchRef::named("thrust"));
        let shared = SharedStore::default();
        ReferenceResolver::new(&harness.blackboard, &shared)
            .bind_state(&mut state)
            .unwrap();
        state
    }

    #[test]
    fn held_switch_climbs_toward_rise_speed() {
        let mut harness = Harness::new();
        let mut state = bound_state(&mut harness);
        let thrust = harness.blackboard.handle("thrust", ParamKind::Switch).unwrap();
        harness.blackboard.set_switch(thrust, true);

        state.on_enter(harness.ctx(DT));
        for _ in 0..600 {
            state.update(harness.ctx(DT));
        }
        assert!(!state.completed());
        assert!((harness.body.velocity.y - 5.).abs() < 1e-2);
    }

    #[test]
    fn release_completes() {
        let mut harness = Harness::new();
        let mut state = bound_state(&mut harness);
        let thrust = harness.blackboard.handle("thrust", ParamKind::Switch).unwrap();
        harness.blackboard.set_switch(thrust, true);

        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(!state.completed());

        harness.blackboard.set_switch(thrust, false);
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }

    #[test]
    fn unbound_switch_completes_immediately() {
        let mut harness = Harness::new();
        let mut state = JetpackState::new(DataValue::literal(5.), SwitchRef::unbound());
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }
}
