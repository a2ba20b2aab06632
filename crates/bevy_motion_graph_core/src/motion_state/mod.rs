//! The per-tick motion state contract.
//!
//! One state is active per character at a time. The host controller feeds
//! it a [`StateContext`] each physics tick, reads back the move vector and
//! physics-interaction flags, and composes the final displacement itself.
//!
//! Lifecycle: `on_enter` → (`update` × N) → `on_exit`, repeated for as
//! long as the instance lives. The accessors must be valid to read at any
//! point between enter and exit, including before the first `update` of a
//! tick (a state entered mid-tick has to behave sanely). `on_exit` may be
//! forced by the outer transition logic at any tick boundary regardless of
//! `completed`, and must reset all private continuous fields.
//!
//! States never fail: missing configuration degrades to a passthrough
//! (hold the current velocity, latch `completed`) and is expected to be
//! caught by author-time validation instead.

use std::fmt::Debug;

use bevy::math::Vec3;

use crate::{
    context::StateContext,
    parameter::refs::Remappable,
    persistence::{PropertyReader, PropertyWriter},
};

pub trait MotionState: MotionStateClone + Send + Sync + Debug + 'static {
    /// This tick's displacement contribution. Already multiplied by the
    /// tick duration; not a velocity.
    fn move_vector(&self) -> Vec3;

    /// Signals the outer transition logic that this state is ready to be
    /// left. The graph layer may ignore it (higher-priority interrupts) or
    /// exit earlier.
    fn completed(&self) -> bool {
        false
    }

    fn apply_gravity(&self) -> bool {
        true
    }

    /// Should the host snap the character onto detected ground.
    fn apply_grounding_force(&self) -> bool {
        true
    }

    /// Should the character ignore velocity inherited from a moving
    /// platform underfoot.
    fn ignore_platform_move(&self) -> bool {
        false
    }

    fn ignore_external_forces(&self) -> bool {
        false
    }

    /// Entry-time snapshot hook. Capture whatever the algorithm needs here
    /// (heading at dash start, distance at grapple start): the context may
    /// change before the first `update`.
    #[allow(unused_variables)]
    fn on_enter(&mut self, ctx: StateContext) {}

    fn update(&mut self, ctx: StateContext);

    /// Must zero all private continuous fields so a later re-entry of the
    /// same instance starts clean.
    fn on_exit(&mut self) {}

    /// Declarative list of every parameter/data reference this state owns,
    /// walked by the resolver during instantiation. A field left out of
    /// this list never gets privatized, so keep it exhaustive.
    fn reference_fields(&mut self) -> Vec<&mut dyn Remappable> {
        Vec::new()
    }

    /// Snapshots continuous fields under stable per-state keys. Base keys
    /// (`moveVector`, `completed`) go first.
    fn write_properties(&self, writer: &mut dyn PropertyWriter);

    /// Symmetric to `write_properties`; missing keys keep current values.
    fn read_properties(&mut self, reader: &dyn PropertyReader);

    /// The name of this state.
    fn display_name(&self) -> String;
}

pub trait MotionStateClone {
    fn clone_motion_state(&self) -> Box<dyn MotionState>;
}

impl<T> MotionStateClone for T
where
    T: 'static + MotionState + Clone,
{
    fn clone_motion_state(&self) -> Box<dyn MotionState> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn MotionState> {
    fn clone(&self) -> Self {
        self.clone_motion_state()
    }
}

/// Flag set sampled from a state after an update. What the host acts on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TickOutput {
    pub move_vector: Vec3,
    pub completed: bool,
    pub apply_gravity: bool,
    pub apply_grounding_force: bool,
    pub ignore_platform_move: bool,
    pub ignore_external_forces: bool,
}

impl TickOutput {
    pub fn sample(state: &dyn MotionState) -> Self {
        Self {
            move_vector: state.move_vector(),
            completed: state.completed(),
            apply_gravity: state.apply_gravity(),
            apply_grounding_force: state.apply_grounding_force(),
            ignore_platform_move: state.ignore_platform_move(),
            ignore_external_forces: state.ignore_external_forces(),
        }
    }
}
