use bevy::math::Vec3;
use indexmap::IndexMap;

use crate::{
    errors::GraphError,
    parameter::{ParamHandle, ParamKind, ParamValue, SwitchValue, TransformHandle},
};

/// Per-character parameter table. Built from a graph template's parameter
/// declarations at instantiation time; every state in the same instance
/// reads and writes the same cells, and no cell is ever shared between
/// instances.
///
/// Typed accessors return `None` on a kind mismatch or stale handle rather
/// than panicking; states treat that as missing configuration.
#[derive(Clone, Debug, Default)]
pub struct Blackboard {
    params: IndexMap<String, ParamValue>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, default: ParamValue) -> ParamHandle {
        let name = name.into();
        let kind = ParamKind::from(&default);
        let entry = self.params.entry(name);
        let index = entry.index();
        entry.or_insert(default);
        ParamHandle { index, kind }
    }

    pub fn handle(&self, name: &str, kind: ParamKind) -> Result<ParamHandle, GraphError> {
        let (index, _, value) = self
            .params
            .get_full(name)
            .ok_or_else(|| GraphError::UnknownParameter(name.to_string()))?;
        let found = ParamKind::from(value);
        if found != kind {
            return Err(GraphError::MismatchedParameterKind {
                name: name.to_string(),
                expected: kind,
                found,
            });
        }
        Ok(ParamHandle { index, kind })
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.params.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Rolls switch history. Called once per simulation tick, before the
    /// active state updates, so rising/falling edges span exactly one tick.
    pub fn begin_tick(&mut self) {
        for value in self.params.values_mut() {
            if let ParamValue::Switch(switch) = value {
                switch.was_on = switch.on;
            }
        }
    }

    fn get(&self, handle: ParamHandle) -> Option<&ParamValue> {
        self.params
            .get_index(handle.index)
            .map(|(_, value)| value)
            .filter(|value| ParamKind::from(*value) == handle.kind)
    }

    fn get_mut(&mut self, handle: ParamHandle) -> Option<&mut ParamValue> {
        self.params
            .get_index_mut(handle.index)
            .map(|(_, value)| value)
            .filter(|value| ParamKind::from(&**value) == handle.kind)
    }

    pub fn float(&self, handle: ParamHandle) -> Option<f32> {
        match self.get(handle)? {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_float(&mut self, handle: ParamHandle, value: f32) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Float(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn vector(&self, handle: ParamHandle) -> Option<Vec3> {
        match self.get(handle)? {
            ParamValue::Vector(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_vector(&mut self, handle: ParamHandle, value: Vec3) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Vector(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn int(&self, handle: ParamHandle) -> Option<i32> {
        match self.get(handle)? {
            ParamValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_int(&mut self, handle: ParamHandle, value: i32) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Int(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn switch(&self, handle: ParamHandle) -> Option<SwitchValue> {
        match self.get(handle)? {
            ParamValue::Switch(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_switch(&mut self, handle: ParamHandle, on: bool) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Switch(v)) => {
                v.on = on;
                true
            }
            _ => false,
        }
    }

    pub fn transform(&self, handle: ParamHandle) -> Option<Option<TransformHandle>> {
        match self.get(handle)? {
            ParamValue::Transform(v) => Some(*v),
            _ => None,
        }
    }

    pub fn set_transform(&mut self, handle: ParamHandle, value: Option<TransformHandle>) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Transform(v)) => {
                *v = value;
                true
            }
            _ => false,
        }
    }

    pub fn fire_trigger(&mut self, handle: ParamHandle) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Trigger(v)) => {
                *v = true;
                true
            }
            _ => false,
        }
    }

    /// Returns whether the trigger was set, clearing it in the same call.
    pub fn take_trigger(&mut self, handle: ParamHandle) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Trigger(v)) => std::mem::take(v),
            _ => false,
        }
    }

    pub fn peek_trigger(&self, handle: ParamHandle) -> Option<bool> {
        match self.get(handle)? {
            ParamValue::Trigger(v) => Some(*v),
            _ => None,
        }
    }

    pub fn raise_event(&mut self, handle: ParamHandle, payload: i32) -> bool {
        match self.get_mut(handle) {
            Some(ParamValue::Event(v)) => {
                *v = Some(payload);
                true
            }
            _ => false,
        }
    }

    /// Returns and clears the pending event payload, if any.
    pub fn take_event(&mut self, handle: ParamHandle) -> Option<i32> {
        match self.get_mut(handle) {
            Some(ParamValue::Event(v)) => v.take(),
            _ => None,
        }
    }

    pub fn value_by_name(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }

    pub fn set_value_by_name(&mut self, name: &str, value: ParamValue) -> bool {
        match self.params.get_mut(name) {
            Some(slot) if ParamKind::from(&*slot) == ParamKind::from(&value) => {
                *slot = value;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> (Blackboard, ParamHandle, ParamHandle, ParamHandle) {
        let mut bb = Blackboard::new();
        let speed = bb.declare("speed", ParamValue::Float(0.));
        let sprint = bb.declare("sprint", ParamValue::Switch(SwitchValue::default()));
        let jump = bb.declare("jump", ParamValue::Trigger(false));
        (bb, speed, sprint, jump)
    }

    #[test]
    fn typed_access_rejects_mismatched_kind() {
        let (bb, speed, ..) = board();
        let bad = ParamHandle {
            index: speed.index,
            kind: ParamKind::Vector,
        };
        assert_eq!(bb.vector(bad), None);
        assert_eq!(bb.float(speed), Some(0.));
    }

    #[test]
    fn take_trigger_clears() {
        let (mut bb, _, _, jump) = board();
        assert!(!bb.take_trigger(jump));
        bb.fire_trigger(jump);
        assert!(bb.take_trigger(jump));
        assert!(!bb.take_trigger(jump));
    }

    #[test]
    fn begin_tick_rolls_switch_history() {
        let (mut bb, _, sprint, _) = board();
        bb.set_switch(sprint, true);
        assert!(bb.switch(sprint).unwrap().rising());

        bb.begin_tick();
        let switch = bb.switch(sprint).unwrap();
        assert!(switch.on && !switch.rising());

        bb.set_switch(sprint, false);
        assert!(bb.switch(sprint).unwrap().falling());

        bb.begin_tick();
        let switch = bb.switch(sprint).unwrap();
        assert!(!switch.on && !switch.falling());
    }

    #[test]
    fn handle_lookup_checks_kind() {
        let (bb, ..) = board();
        assert!(bb.handle("speed", ParamKind::Float).is_ok());
        assert!(matches!(
            bb.handle("speed", ParamKind::Int),
            Err(GraphError::MismatchedParameterKind { .. })
        ));
        assert!(matches!(
            bb.handle("missing", ParamKind::Float),
            Err(GraphError::UnknownParameter(_))
        ));
    }
}
