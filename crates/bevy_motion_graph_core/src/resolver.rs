//! The instancing-time reference resolver.
//!
//! When a graph template is instantiated for a character, every state's
//! declared reference fields are swapped from authored names to handles
//! into that character's private blackboard (shared constants stay bound
//! to the shared store). After the pass, no two instances built from the
//! same template can touch the same per-character parameter.

use std::sync::Arc;

use crate::{
    errors::GraphError,
    motion_state::MotionState,
    parameter::{ParamHandle, ParamKind, blackboard::Blackboard},
    shared_data::{DataLike, SharedStore, SharedValue},
};

pub struct ReferenceResolver<'a> {
    blackboard: &'a Blackboard,
    shared: &'a SharedStore,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(blackboard: &'a Blackboard, shared: &'a SharedStore) -> Self {
        Self { blackboard, shared }
    }

    /// Resolves an authored parameter name to an instance handle, checking
    /// the declared kind.
    pub fn swap_param(&self, name: &str, kind: ParamKind) -> Result<ParamHandle, GraphError> {
        self.blackboard.handle(name, kind)
    }

    /// Resolves an authored shared-constant name against the shared store.
    pub fn swap_shared<T: DataLike>(&self, name: &str) -> Result<Arc<SharedValue<T>>, GraphError> {
        T::lookup(self.shared, name).ok_or_else(|| GraphError::UnknownSharedValue {
            name: name.to_string(),
            kind: T::KIND,
        })
    }

    /// Runs the swap over every reference field the state declares.
    pub fn bind_state(&self, state: &mut dyn MotionState) -> Result<(), GraphError> {
        for field in state.reference_fields() {
            field.swap(self)?;
        }
        Ok(())
    }

    /// Asserts the swap left nothing pointing at template-level data.
    /// `bind_state` already fails on unknown names, so this only fires if a
    /// state hands out a different field list on the second call.
    pub fn verify_state(&self, state_name: &str, state: &mut dyn MotionState) -> Result<(), GraphError> {
        for field in state.reference_fields() {
            if !field.is_resolved() {
                return Err(GraphError::UnresolvedReference {
                    state: state_name.to_string(),
                    field: field.label().to_string(),
                });
            }
        }
        Ok(())
    }
}
