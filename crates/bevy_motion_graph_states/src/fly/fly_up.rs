use bevy::math::Vec3;
use bevy_motion_graph_core::{
    context::StateContext,
    maths::spring,
    motion_state::MotionState,
    parameter::refs::{Remappable, SwitchRef},
    persistence::{PropertyReader, PropertyWriter, keys},
    shared_data::DataValue,
};

/// Hold-to-climb. Vertical speed springs toward `rise_speed` while the
/// climb switch is held; the falling edge completes the state so the graph
/// can drop back into level flight.
#[derive(Clone, Debug)]
pub struct FlyUpState {
    rise_speed: DataValue<f32>,
    damping: DataValue<f32>,
    climb_switch: SwitchRef,

    vertical: f32,
    smoothing: f32,
    move_vector: Vec3,
    completed: bool,
}

impl FlyUpState {
    pub const VERTICAL: &'static str = "vertical";
    pub const SMOOTHING: &'static str = "smoothing";

    pub fn new(rise_speed: DataValue<f32>, climb_switch: SwitchRef) -> Self {
        Self {
            rise_speed,
            damping: DataValue::literal(0.3),
            climb_switch,
            vertical: 0.,
            smoothing: 0.,
            move_vector: Vec3::ZERO,
            completed: false,
        }
    }
}

impl MotionState for FlyUpState {
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
            .climb_switch
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
            &mut self.rise_speed,
            &mut self.damping,
            &mut self.climb_switch,
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
        "Fly Up".into()
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

    #[test]
    fn climbs_while_held_and_completes_on_release() {
        let mut harness = Harness::new();
        harness
            .blackboard
            .declare("climb", ParamValue::Switch(SwitchValue::default()));
        let mut state = FlyUpState::new(DataValue::literal(3.), SwitchRef::named("climb"));
        let shared = SharedStore::default();
        ReferenceResolver::new(&harness.blackboard, &shared)
            .bind_state(&mut state)
            .unwrap();

        let climb = harness.blackboard.handle("climb", ParamKind::Switch).unwrap();
        harness.blackboard.set_switch(climb, true);

        state.on_enter(harness.ctx(DT));
        for _ in 0..600 {
            state.update(harness.ctx(DT));
        }
        assert!(!state.completed());
        assert!((harness.body.velocity.y - 3.).abs() < 1e-2);

        harness.blackboard.set_switch(climb, false);
        state.update(harness.ctx(DT));
        assert!(state.completed());
    }

    #[test]
    fn planar_velocity_passes_through() {
        let mut harness = Harness::new();
        harness
            .blackboard
            .declare("climb", ParamValue::Switch(SwitchValue::default()));
        let mut state = FlyUpState::new(DataValue::literal(3.), SwitchRef::named("climb"));
        let shared = SharedStore::default();
        ReferenceResolver::new(&harness.blackboard, &shared)
            .bind_state(&mut state)
            .unwrap();
        let climb = harness.blackboard.handle("climb", ParamKind::Switch).unwrap();
        harness.blackboard.set_switch(climb, true);

        harness.body.velocity = Vec3::new(2., 0., 0.);
        state.on_enter(harness.ctx(DT));
        state.update(harness.ctx(DT));
        assert_eq!(harness.body.velocity.x, 2.);
    }
}
