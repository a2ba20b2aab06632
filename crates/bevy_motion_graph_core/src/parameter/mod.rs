pub mod blackboard;
pub mod refs;

use bevy::{
    math::Vec3,
    reflect::{Reflect, std_traits::ReflectDefault},
};
use serde::{Deserialize, Serialize};

/// Opaque identifier for a host-side scene transform. The host resolves it
/// through [`Environment::transform`](crate::context::Environment::transform);
/// the graph never dereferences it directly.
#[derive(
    Reflect, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default,
)]
#[reflect(Default)]
pub struct TransformHandle(pub u64);

/// Switch parameter payload. `was_on` is rolled by
/// [`Blackboard::begin_tick`](blackboard::Blackboard::begin_tick) once per
/// simulation tick so states can sample rising/falling edges.
#[derive(Reflect, Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub struct SwitchValue {
    pub on: bool,
    pub was_on: bool,
}

impl SwitchValue {
    pub fn rising(&self) -> bool {
        self.on && !self.was_on
    }

    pub fn falling(&self) -> bool {
        !self.on && self.was_on
    }
}

#[derive(Reflect, Default, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[reflect(Default)]
pub enum ParamKind {
    #[default]
    Float,
    Vector,
    Int,
    Switch,
    Transform,
    Trigger,
    Event,
}

/// A typed blackboard cell. One per declared parameter per character
/// instance; visible to every state in the same instance within a tick.
#[derive(Reflect, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[reflect(Default)]
pub enum ParamValue {
    Float(f32),
    Vector(Vec3),
    Int(i32),
    Switch(SwitchValue),
    /// `None` means "no active linkage" (e.g. not attached to a ladder).
    Transform(Option<TransformHandle>),
    Trigger(bool),
    /// One-shot event with a small payload code.
    Event(Option<i32>),
}

impl ParamValue {
    pub fn default_from_kind(kind: ParamKind) -> Self {
        match kind {
            ParamKind::Float => ParamValue::Float(0.),
            ParamKind::Vector => ParamValue::Vector(Vec3::ZERO),
            ParamKind::Int => ParamValue::Int(0),
            ParamKind::Switch => ParamValue::Switch(SwitchValue::default()),
            ParamKind::Transform => ParamValue::Transform(None),
            ParamKind::Trigger => ParamValue::Trigger(false),
            ParamKind::Event => ParamValue::Event(None),
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::Float(0.)
    }
}

impl From<&ParamValue> for ParamKind {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Vector(_) => ParamKind::Vector,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Switch(_) => ParamKind::Switch,
            ParamValue::Transform(_) => ParamKind::Transform,
            ParamValue::Trigger(_) => ParamKind::Trigger,
            ParamValue::Event(_) => ParamKind::Event,
        }
    }
}

/// Index into a [`Blackboard`](blackboard::Blackboard), paired with the kind
/// it was resolved against so typed access can reject stale handles.
#[derive(Reflect, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParamHandle {
    pub index: usize,
    pub kind: ParamKind,
}
