//! Save-game persistence channel.
//!
//! Each state snapshots its continuous fields through a small typed
//! key/value contract. Keys are short strings stable across versions and
//! local to one state; the graph snapshot namespaces each state's blob
//! under the state's name, so identical local keys in two states never
//! collide. Missing keys on load fall back to the caller's default, never
//! an error: loading an old save must resume cleanly with new fields at
//! their current values.

use bevy::math::Vec3;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    errors::GraphError,
    parameter::{ParamValue, SwitchValue, TransformHandle},
};

/// Base keys shared by every state. Written and read before any
/// state-local key, mirroring the base-first call order of the contract.
pub mod keys {
    pub const MOVE_VECTOR: &str = "moveVector";
    pub const COMPLETED: &str = "completed";
    pub const VELOCITY: &str = "velocity";
    pub const ELAPSED: &str = "elapsed";
    pub const PHASE: &str = "phase";
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SavedValue {
    F32(f32),
    I32(i32),
    U32(u32),
    Bool(bool),
    Vec3([f32; 3]),
    Transform(Option<u64>),
    Event(Option<i32>),
}

impl From<&ParamValue> for SavedValue {
    fn from(value: &ParamValue) -> Self {
        match value {
            ParamValue::Float(v) => SavedValue::F32(*v),
            ParamValue::Vector(v) => SavedValue::Vec3((*v).into()),
            ParamValue::Int(v) => SavedValue::I32(*v),
            // Switch history is re-derived on the first tick after load.
            ParamValue::Switch(v) => SavedValue::Bool(v.on),
            ParamValue::Transform(v) => SavedValue::Transform(v.map(|h| h.0)),
            ParamValue::Trigger(v) => SavedValue::Bool(*v),
            ParamValue::Event(v) => SavedValue::Event(*v),
        }
    }
}

impl SavedValue {
    /// Rehydrates a parameter value, using the live value to pick the
    /// target kind (switch vs trigger both save as `Bool`).
    pub fn apply_to(&self, current: &ParamValue) -> Option<ParamValue> {
        match (self, current) {
            (SavedValue::F32(v), ParamValue::Float(_)) => Some(ParamValue::Float(*v)),
            (SavedValue::Vec3(v), ParamValue::Vector(_)) => Some(ParamValue::Vector((*v).into())),
            (SavedValue::I32(v), ParamValue::Int(_)) => Some(ParamValue::Int(*v)),
            (SavedValue::Bool(v), ParamValue::Switch(_)) => Some(ParamValue::Switch(SwitchValue {
                on: *v,
                was_on: *v,
            })),
            (SavedValue::Transform(v), ParamValue::Transform(_)) => {
                Some(ParamValue::Transform(v.map(TransformHandle)))
            }
            (SavedValue::Bool(v), ParamValue::Trigger(_)) => Some(ParamValue::Trigger(*v)),
            (SavedValue::Event(v), ParamValue::Event(_)) => Some(ParamValue::Event(*v)),
            _ => None,
        }
    }
}

/// Write half of the persistence channel.
pub trait PropertyWriter {
    fn write_f32(&mut self, key: &str, value: f32);
    fn write_i32(&mut self, key: &str, value: i32);
    fn write_u32(&mut self, key: &str, value: u32);
    fn write_bool(&mut self, key: &str, value: bool);
    fn write_vec3(&mut self, key: &str, value: Vec3);
}

/// Read half of the persistence channel. Every read takes the caller's
/// default so a missing key is indistinguishable from "field unchanged".
pub trait PropertyReader {
    fn read_f32(&self, key: &str, default: f32) -> f32;
    fn read_i32(&self, key: &str, default: i32) -> i32;
    fn read_u32(&self, key: &str, default: u32) -> u32;
    fn read_bool(&self, key: &str, default: bool) -> bool;
    fn read_vec3(&self, key: &str, default: Vec3) -> Vec3;
}

/// In-memory key/value blob backing both halves of the channel.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SaveBlob {
    entries: IndexMap<String, SavedValue>,
}

impl SaveBlob {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<SavedValue> {
        self.entries.shift_remove(key)
    }
}

impl PropertyWriter for SaveBlob {
    fn write_f32(&mut self, key: &str, value: f32) {
        self.entries.insert(key.to_string(), SavedValue::F32(value));
    }

    fn write_i32(&mut self, key: &str, value: i32) {
        self.entries.insert(key.to_string(), SavedValue::I32(value));
    }

    fn write_u32(&mut self, key: &str, value: u32) {
        self.entries.insert(key.to_string(), SavedValue::U32(value));
    }

    fn write_bool(&mut self, key: &str, value: bool) {
        self.entries.insert(key.to_string(), SavedValue::Bool(value));
    }

    fn write_vec3(&mut self, key: &str, value: Vec3) {
        self.entries
            .insert(key.to_string(), SavedValue::Vec3(value.into()));
    }
}

impl PropertyReader for SaveBlob {
    fn read_f32(&self, key: &str, default: f32) -> f32 {
        match self.entries.get(key) {
            Some(SavedValue::F32(v)) => *v,
            _ => default,
        }
    }

    fn read_i32(&self, key: &str, default: i32) -> i32 {
        match self.entries.get(key) {
            Some(SavedValue::I32(v)) => *v,
            _ => default,
        }
    }

    fn read_u32(&self, key: &str, default: u32) -> u32 {
        match self.entries.get(key) {
            Some(SavedValue::U32(v)) => *v,
            _ => default,
        }
    }

    fn read_bool(&self, key: &str, default: bool) -> bool {
        match self.entries.get(key) {
            Some(SavedValue::Bool(v)) => *v,
            _ => default,
        }
    }

    fn read_vec3(&self, key: &str, default: Vec3) -> Vec3 {
        match self.entries.get(key) {
            Some(SavedValue::Vec3(v)) => Vec3::from(*v),
            _ => default,
        }
    }
}

/// Full mid-simulation snapshot of a graph instance: the active state
/// name, every blackboard parameter, and one namespaced blob per state.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub active: Option<String>,
    pub parameters: IndexMap<String, SavedValue>,
    pub states: IndexMap<String, SaveBlob>,
}

impl GraphSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, GraphError> {
        rmp_serde::to_vec(self).map_err(|err| GraphError::SnapshotEncode(err.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, GraphError> {
        rmp_serde::from_slice(bytes).map_err(|err| GraphError::SnapshotDecode(err.to_string()))
    }

    /// Human-readable dump, for debugging saves and for golden tests.
    pub fn to_ron_string(&self) -> Result<String, GraphError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|err| GraphError::SnapshotEncode(err.to_string()))
    }

    pub fn from_ron_str(source: &str) -> Result<Self, GraphError> {
        ron::from_str(source).map_err(|err| GraphError::SnapshotDecode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_returns_default() {
        let blob = SaveBlob::new();
        assert_eq!(blob.read_f32("velocity", 3.5), 3.5);
        assert_eq!(blob.read_vec3("heading", Vec3::X), Vec3::X);
    }

    #[test]
    fn mismatched_kind_returns_default() {
        let mut blob = SaveBlob::new();
        blob.write_bool("velocity", true);
        assert_eq!(blob.read_f32("velocity", 1.25), 1.25);
    }

    #[test]
    fn blob_round_trips_through_messagepack() {
        let mut blob = SaveBlob::new();
        blob.write_vec3(keys::MOVE_VECTOR, Vec3::new(1., 2., 3.));
        blob.write_bool(keys::COMPLETED, true);
        blob.write_u32(keys::PHASE, 2);

        let mut snapshot = GraphSnapshot::default();
        snapshot.active = Some("movement".to_string());
        snapshot.states.insert("movement".to_string(), blob);

        let bytes = snapshot.to_bytes().unwrap();
        let restored = GraphSnapshot::from_bytes(&bytes).unwrap();
        assert_eq!(restored.active.as_deref(), Some("movement"));
        let blob = &restored.states["movement"];
        assert_eq!(
            blob.read_vec3(keys::MOVE_VECTOR, Vec3::ZERO),
            Vec3::new(1., 2., 3.)
        );
        assert!(blob.read_bool(keys::COMPLETED, false));
        assert_eq!(blob.read_u32(keys::PHASE, 0), 2);
    }

    #[test]
    fn ron_dump_round_trips() {
        let mut snapshot = GraphSnapshot::default();
        snapshot
            .parameters
            .insert("speed".to_string(), SavedValue::F32(4.));
        let text = snapshot.to_ron_string().unwrap();
        let restored = GraphSnapshot::from_ron_str(&text).unwrap();
        assert_eq!(restored.parameters["speed"], SavedValue::F32(4.));
    }
}
