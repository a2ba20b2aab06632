//! Graph template and per-character instance containers.
//!
//! A [`GraphTemplate`] is the authored asset: parameter declarations,
//! shared tunables, and one prototype per state. [`GraphTemplate::instantiate`]
//! clones the prototypes, builds a private blackboard, and runs the
//! resolver pass so every reference a state owns points into that
//! character's own data. Transition selection stays outside: the host
//! calls [`GraphInstance::enter`] and [`GraphInstance::tick`] and samples
//! `completed` itself.

use bevy::log::debug;
use indexmap::IndexMap;
use uuid::Uuid;

use crate::{
    context::{ControllerFrame, Environment, StateContext},
    errors::GraphError,
    motion_state::{MotionState, TickOutput},
    parameter::{ParamValue, blackboard::Blackboard},
    persistence::{GraphSnapshot, SaveBlob, SavedValue},
    resolver::ReferenceResolver,
    shared_data::SharedStore,
};

pub use crate::context::CharacterBody;

/// Authored graph template, shared by any number of characters.
#[derive(Clone, Debug, Default)]
pub struct GraphTemplate {
    parameters: IndexMap<String, ParamValue>,
    shared: SharedStore,
    states: IndexMap<String, Box<dyn MotionState>>,
}

impl GraphTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        default: ParamValue,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        if self.parameters.contains_key(&name) {
            return Err(GraphError::DuplicateParameter(name));
        }
        self.parameters.insert(name, default);
        Ok(self)
    }

    pub fn with_state(
        mut self,
        name: impl Into<String>,
        state: impl MotionState,
    ) -> Result<Self, GraphError> {
        let name = name.into();
        if self.states.contains_key(&name) {
            return Err(GraphError::DuplicateState(name));
        }
        self.states.insert(name, Box::new(state));
        Ok(self)
    }

    pub fn with_shared(mut self, shared: SharedStore) -> Self {
        self.shared = shared;
        self
    }

    pub fn shared_mut(&mut self) -> &mut SharedStore {
        &mut self.shared
    }

    pub fn state_names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(|s| s.as_str())
    }

    /// Builds a fully-private instance: clones every state prototype,
    /// declares the parameters on a fresh blackboard, then swaps and
    /// verifies every declared reference field.
    pub fn instantiate(&self) -> Result<GraphInstance, GraphError> {
        let mut blackboard = Blackboard::new();
        for (name, default) in &self.parameters {
            blackboard.declare(name.clone(), default.clone());
        }

        let mut states = self.states.clone();
        {
            let resolver = ReferenceResolver::new(&blackboard, &self.shared);
            for (name, state) in states.iter_mut() {
                resolver.bind_state(state.as_mut())?;
                resolver.verify_state(name, state.as_mut())?;
            }
        }

        Ok(GraphInstance {
            instance_id: Uuid::new_v4(),
            blackboard,
            states,
            active: None,
        })
    }
}

/// A template instantiated for one character. Owns that character's
/// blackboard and state set for its whole lifetime.
#[derive(Clone, Debug)]
pub struct GraphInstance {
    instance_id: Uuid,
    blackboard: Blackboard,
    states: IndexMap<String, Box<dyn MotionState>>,
    active: Option<usize>,
}

impl GraphInstance {
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn blackboard(&self) -> &Blackboard {
        &self.blackboard
    }

    pub fn blackboard_mut(&mut self) -> &mut Blackboard {
        &mut self.blackboard
    }

    pub fn active_name(&self) -> Option<&str> {
        self.active
            .and_then(|i| self.states.get_index(i))
            .map(|(name, _)| name.as_str())
    }

    pub fn active_state(&self) -> Option<&dyn MotionState> {
        self.active
            .and_then(|i| self.states.get_index(i))
            .map(|(_, state)| state.as_ref())
    }

    pub fn state(&self, name: &str) -> Option<&dyn MotionState> {
        self.states.get(name).map(|s| s.as_ref())
    }

    /// Makes `name` the active state, exiting the current one first. The
    /// outer transition logic decides when; `completed` is advisory.
    pub fn enter(
        &mut self,
        name: &str,
        frame: &ControllerFrame,
        body: &mut CharacterBody,
        environment: &dyn Environment,
    ) -> Result<(), GraphError> {
        let index = self
            .states
            .get_index_of(name)
            .ok_or_else(|| GraphError::UnknownState(name.to_string()))?;

        self.exit_active();

        let (_, state) = self.states.get_index_mut(index).unwrap();
        state.on_enter(StateContext {
            dt: 0.,
            frame,
            body,
            blackboard: &mut self.blackboard,
            environment,
        });
        self.active = Some(index);
        Ok(())
    }

    /// Force-exits the active state, tolerated at any internal phase.
    pub fn exit_active(&mut self) {
        if let Some(index) = self.active.take()
            && let Some((_, state)) = self.states.get_index_mut(index)
        {
            state.on_exit();
        }
    }

    /// Runs one simulation tick on the active state. Rolls switch history
    /// first so edges span exactly one tick. Returns `None` when no state
    /// is active.
    pub fn tick(
        &mut self,
        dt: f32,
        frame: &ControllerFrame,
        body: &mut CharacterBody,
        environment: &dyn Environment,
    ) -> Option<TickOutput> {
        let index = self.active?;
        self.blackboard.begin_tick();
        let (_, state) = self.states.get_index_mut(index)?;
        state.update(StateContext {
            dt,
            frame,
            body,
            blackboard: &mut self.blackboard,
            environment,
        });
        Some(TickOutput::sample(state.as_ref()))
    }

    /// Snapshots the whole instance: active state, blackboard, and one
    /// blob per state keyed by state name.
    pub fn save(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot {
            active: self.active_name().map(str::to_string),
            ..Default::default()
        };
        for (name, value) in self.blackboard.iter() {
            snapshot
                .parameters
                .insert(name.to_string(), SavedValue::from(value));
        }
        for (name, state) in &self.states {
            let mut blob = SaveBlob::new();
            state.write_properties(&mut blob);
            snapshot.states.insert(name.clone(), blob);
        }
        snapshot
    }

    /// Restores a snapshot taken from an instance of the same template.
    /// Unknown states or parameters in the snapshot are skipped; states
    /// missing from it keep their current fields. Does not run lifecycle
    /// calls: the restored active state resumes mid-lifecycle, exactly as
    /// it was at save time.
    pub fn restore(&mut self, snapshot: &GraphSnapshot) {
        for (name, saved) in &snapshot.parameters {
            let Some(current) = self.blackboard.value_by_name(name) else {
                debug!("snapshot parameter {name:?} not declared on this graph, skipping");
                continue;
            };
            if let Some(value) = saved.apply_to(current) {
                self.blackboard.set_value_by_name(name, value);
            }
        }

        for (name, blob) in &snapshot.states {
            match self.states.get_mut(name) {
                Some(state) => state.read_properties(blob),
                None => debug!("snapshot state {name:?} not present in this graph, skipping"),
            }
        }

        self.active = snapshot
            .active
            .as_deref()
            .and_then(|name| self.states.get_index_of(name));
    }
}

#[cfg(test)]
mod tests {
    use bevy::math::Vec3;

    use super::*;
    use crate::{
        context::NullEnvironment,
        parameter::refs::{FloatRef, Remappable},
        persistence::{PropertyReader, PropertyWriter, keys},
        shared_data::DataValue,
    };

    /// Minimal state exercising a parameter ref and a shared data value.
    #[derive(Clone, Debug, Default)]
    struct CountingState {
        gain: DataValue<f32>,
        charge: FloatRef,
        accumulated: f32,
        move_vector: Vec3,
    }

    impl MotionState for CountingState {
        fn move_vector(&self) -> Vec3 {
            self.move_vector
        }

        fn update(&mut self, ctx: StateContext) {
            let charge = self.charge.get(ctx.blackboard).unwrap_or(1.);
            self.accumulated += self.gain.get() * charge * ctx.dt;
            self.move_vector = ctx.body.up * self.accumulated * ctx.dt;
            self.charge.set(ctx.blackboard, charge + 1.);
        }

        fn on_exit(&mut self) {
            self.accumulated = 0.;
            self.move_vector = Vec3::ZERO;
        }

        fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
            vec![&mut self.gain, &mut self.charge]
        }

        fn write_properties(&self, writer: &mut dyn PropertyWriter) {
            writer.write_vec3(keys::MOVE_VECTOR, self.move_vector);
            writer.write_f32("accumulated", self.accumulated);
        }

        fn read_properties(&mut self, reader: &dyn PropertyReader) {
            self.move_vector = reader.read_vec3(keys::MOVE_VECTOR, self.move_vector);
            self.accumulated = reader.read_f32("accumulated", self.accumulated);
        }

        fn display_name(&self) -> String {
            "Counting".into()
        }
    }

    fn template() -> GraphTemplate {
        let mut shared = SharedStore::default();
        shared.insert_float("gain", 2.);
        GraphTemplate::new()
            .with_parameter("charge", ParamValue::Float(1.))
            .unwrap()
            .with_state(
                "counting",
                CountingState {
                    gain: DataValue::shared("gain", 0.),
                    charge: FloatRef::named("charge"),
                    ..Default::default()
                },
            )
            .unwrap()
            .with_shared(shared)
    }

    #[test]
    fn instances_do_not_share_parameters() {
        let template = template();
        let mut a = template.instantiate().unwrap();
        let mut b = template.instantiate().unwrap();

        let frame = ControllerFrame::default();
        let env = NullEnvironment;
        let mut body = CharacterBody::default();

        a.enter("counting", &frame, &mut body, &env).unwrap();
        b.enter("counting", &frame, &mut body, &env).unwrap();

        // Three ticks on A mutate A's charge parameter via the state.
        for _ in 0..3 {
            a.tick(0.02, &frame, &mut body, &env);
        }

        let charge_a = a.blackboard().value_by_name("charge").unwrap().clone();
        let charge_b = b.blackboard().value_by_name("charge").unwrap().clone();
        assert_eq!(charge_a, ParamValue::Float(4.));
        assert_eq!(charge_b, ParamValue::Float(1.));
    }

    #[test]
    fn unknown_reference_fails_instantiation() {
        let template = GraphTemplate::new()
            .with_state(
                "counting",
                CountingState {
                    charge: FloatRef::named("charge"),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            template.instantiate(),
            Err(GraphError::UnknownParameter(_))
        ));
    }

    #[test]
    fn entering_twice_exits_previous_state() {
        let template = template();
        let mut instance = template.instantiate().unwrap();
        let frame = ControllerFrame::default();
        let env = NullEnvironment;
        let mut body = CharacterBody::default();

        instance.enter("counting", &frame, &mut body, &env).unwrap();
        instance.tick(0.02, &frame, &mut body, &env);
        instance.enter("counting", &frame, &mut body, &env).unwrap();

        // on_exit reset the accumulator before re-entry.
        let out = instance.tick(0.02, &frame, &mut body, &env).unwrap();
        let fresh = 2. * 2. * 0.02 * 0.02; // gain * charge(after A's writes) * dt * dt
        assert!((out.move_vector.y - fresh).abs() < 1e-6);
    }

    #[test]
    fn snapshot_restores_state_and_blackboard() {
        let template = template();
        let mut original = template.instantiate().unwrap();
        let frame = ControllerFrame::default();
        let env = NullEnvironment;
        let mut body = CharacterBody::default();

        original.enter("counting", &frame, &mut body, &env).unwrap();
        for _ in 0..5 {
            original.tick(0.02, &frame, &mut body, &env);
        }
        let snapshot = original.save();

        let mut restored = template.instantiate().unwrap();
        restored.restore(&snapshot);
        assert_eq!(restored.active_name(), Some("counting"));

        let mut body_a = body;
        let mut body_b = body;
        let out_a = original.tick(0.02, &frame, &mut body_a, &env).unwrap();
        let out_b = restored.tick(0.02, &frame, &mut body_b, &env).unwrap();
        assert!((out_a.move_vector - out_b.move_vector).length() < 1e-6);
    }

    #[test]
    fn snapshot_bytes_round_trip() {
        let template = template();
        let mut instance = template.instantiate().unwrap();
        let frame = ControllerFrame::default();
        let env = NullEnvironment;
        let mut body = CharacterBody::default();
        instance.enter("counting", &frame, &mut body, &env).unwrap();
        instance.tick(0.02, &frame, &mut body, &env);

        let bytes = instance.save().to_bytes().unwrap();
        let decoded = GraphSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.active.as_deref(), Some("counting"));
    }
}
