//! Typed parameter reference slots held by motion states.
//!
//! A slot is authored with a parameter *name* at template level and swapped
//! to a per-instance [`ParamHandle`] by the resolver pass during
//! instantiation. States expose every slot they own through
//! [`MotionState::reference_fields`](crate::motion_state::MotionState::reference_fields)
//! so the pass is mechanical: there is no per-field call for an implementer
//! to forget.

use bevy::math::Vec3;

use crate::{
    errors::GraphError,
    parameter::{ParamHandle, ParamKind, SwitchValue, TransformHandle, blackboard::Blackboard},
    resolver::ReferenceResolver,
};

/// A reference that the instantiation pass can rewrite. Implemented by the
/// typed parameter refs below and by [`DataValue`](crate::shared_data::DataValue).
pub trait Remappable {
    fn swap(&mut self, resolver: &ReferenceResolver) -> Result<(), GraphError>;

    /// True when the reference no longer points at template-level data.
    /// Unbound slots count as resolved: they are optional by construction.
    fn is_resolved(&self) -> bool;

    /// Field label used in diagnostics when verification fails.
    fn label(&self) -> &str;
}

#[derive(Clone, Debug, Default)]
enum Binding {
    #[default]
    Unbound,
    Name(String),
    Handle(ParamHandle),
}

macro_rules! param_ref {
    ($(#[$doc:meta])* $name:ident, $kind:expr) => {
        $(#[$doc])*
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            binding: Binding,
        }

        impl $name {
            pub fn named(name: impl Into<String>) -> Self {
                Self {
                    binding: Binding::Name(name.into()),
                }
            }

            pub fn unbound() -> Self {
                Self {
                    binding: Binding::Unbound,
                }
            }

            pub fn is_bound(&self) -> bool {
                matches!(self.binding, Binding::Handle(_))
            }

            fn handle(&self) -> Option<ParamHandle> {
                match self.binding {
                    Binding::Handle(handle) => Some(handle),
                    _ => None,
                }
            }
        }

        impl Remappable for $name {
            fn swap(&mut self, resolver: &ReferenceResolver) -> Result<(), GraphError> {
                if let Binding::Name(name) = &self.binding {
                    let handle = resolver.swap_param(name, $kind)?;
                    self.binding = Binding::Handle(handle);
                }
                Ok(())
            }

            fn is_resolved(&self) -> bool {
                !matches!(self.binding, Binding::Name(_))
            }

            fn label(&self) -> &str {
                match &self.binding {
                    Binding::Name(name) => name,
                    _ => stringify!($name),
                }
            }
        }
    };
}

param_ref!(
    /// Reference to a `Float` parameter.
    FloatRef,
    ParamKind::Float
);
param_ref!(
    /// Reference to a `Vector` parameter.
    VectorRef,
    ParamKind::Vector
);
param_ref!(
    /// Reference to an `Int` parameter.
    IntRef,
    ParamKind::Int
);
param_ref!(
    /// Reference to a `Switch` parameter.
    SwitchRef,
    ParamKind::Switch
);
param_ref!(
    /// Reference to a `Transform` parameter.
    TransformRef,
    ParamKind::Transform
);
param_ref!(
    /// Reference to a `Trigger` parameter.
    TriggerRef,
    ParamKind::Trigger
);
param_ref!(
    /// Reference to an `Event` parameter.
    EventRef,
    ParamKind::Event
);

impl FloatRef {
    pub fn get(&self, blackboard: &Blackboard) -> Option<f32> {
        blackboard.float(self.handle()?)
    }

    pub fn set(&self, blackboard: &mut Blackboard, value: f32) -> bool {
        self.handle()
            .map(|h| blackboard.set_float(h, value))
            .unwrap_or(false)
    }
}

impl VectorRef {
    pub fn get(&self, blackboard: &Blackboard) -> Option<Vec3> {
        blackboard.vector(self.handle()?)
    }

    pub fn set(&self, blackboard: &mut Blackboard, value: Vec3) -> bool {
        self.handle()
            .map(|h| blackboard.set_vector(h, value))
            .unwrap_or(false)
    }
}

impl IntRef {
    pub fn get(&self, blackboard: &Blackboard) -> Option<i32> {
        blackboard.int(self.handle()?)
    }

    pub fn set(&self, blackboard: &mut Blackboard, value: i32) -> bool {
        self.handle()
            .map(|h| blackboard.set_int(h, value))
            .unwrap_or(false)
    }
}

impl SwitchRef {
    pub fn get(&self, blackboard: &Blackboard) -> Option<SwitchValue> {
        blackboard.switch(self.handle()?)
    }

    pub fn set(&self, blackboard: &mut Blackboard, on: bool) -> bool {
        self.handle()
            .map(|h| blackboard.set_switch(h, on))
            .unwrap_or(false)
    }
}

impl TransformRef {
    pub fn get(&self, blackboard: &Blackboard) -> Option<Option<TransformHandle>> {
        blackboard.transform(self.handle()?)
    }

    pub fn set(&self, blackboard: &mut Blackboard, value: Option<TransformHandle>) -> bool {
        self.handle()
            .map(|h| blackboard.set_transform(h, value))
            .unwrap_or(false)
    }
}

impl TriggerRef {
    /// Consumes the trigger: returns whether it was set and clears it.
    pub fn take(&self, blackboard: &mut Blackboard) -> bool {
        self.handle()
            .map(|h| blackboard.take_trigger(h))
            .unwrap_or(false)
    }

    pub fn fire(&self, blackboard: &mut Blackboard) -> bool {
        self.handle()
            .map(|h| blackboard.fire_trigger(h))
            .unwrap_or(false)
    }
}

impl EventRef {
    /// Consumes the pending event payload, if any.
    pub fn take(&self, blackboard: &mut Blackboard) -> Option<i32> {
        blackboard.take_event(self.handle()?)
    }

    pub fn raise(&self, blackboard: &mut Blackboard, payload: i32) -> bool {
        self.handle()
            .map(|h| blackboard.raise_event(h, payload))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parameter::ParamValue, shared_data::SharedStore};

    #[test]
    fn unbound_ref_reads_none() {
        let bb = Blackboard::new();
        assert_eq!(FloatRef::unbound().get(&bb), None);
        assert!(FloatRef::unbound().is_resolved());
    }

    #[test]
    fn named_ref_resolves_through_resolver() {
        let mut bb = Blackboard::new();
        bb.declare("charge", ParamValue::Float(0.5));
        let shared = SharedStore::default();
        let resolver = ReferenceResolver::new(&bb, &shared);

        let mut charge = FloatRef::named("charge");
        assert!(!charge.is_resolved());
        charge.swap(&resolver).unwrap();
        assert!(charge.is_resolved() && charge.is_bound());
        assert_eq!(charge.get(&bb), Some(0.5));
    }

    #[test]
    fn kind_mismatch_fails_swap() {
        let mut bb = Blackboard::new();
        bb.declare("charge", ParamValue::Int(1));
        let shared = SharedStore::default();
        let resolver = ReferenceResolver::new(&bb, &shared);

        let mut charge = FloatRef::named("charge");
        assert!(charge.swap(&resolver).is_err());
    }
}
