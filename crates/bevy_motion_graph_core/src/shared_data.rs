//! Shared tunable constants and the literal-or-reference value wrapper.
//!
//! A [`SharedValue`] is a named, read-mostly number that many graphs and
//! states can point at, so a designer tunes one asset instead of chasing
//! copies. A [`DataValue`] is what a state actually holds: a literal with
//! an optional reference that, once bound, wins over the literal. Reads are
//! O(1) after binding; range clamping happens at author time only.

use std::sync::Arc;

use bevy::{math::Vec3, platform::collections::HashMap};

use crate::{errors::GraphError, parameter::refs::Remappable, resolver::ReferenceResolver};

/// A named tunable constant shared across character instances.
#[derive(Debug)]
pub struct SharedValue<T> {
    name: String,
    value: T,
}

impl<T: Copy> SharedValue<T> {
    pub fn new(name: impl Into<String>, value: T) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> T {
        self.value
    }
}

/// Name-addressable pools of shared constants, one per supported type.
#[derive(Debug, Default, Clone)]
pub struct SharedStore {
    floats: HashMap<String, Arc<SharedValue<f32>>>,
    vectors: HashMap<String, Arc<SharedValue<Vec3>>>,
    ints: HashMap<String, Arc<SharedValue<i32>>>,
}

impl SharedStore {
    pub fn insert_float(&mut self, name: impl Into<String>, value: f32) {
        let name = name.into();
        self.floats
            .insert(name.clone(), Arc::new(SharedValue::new(name, value)));
    }

    pub fn insert_vector(&mut self, name: impl Into<String>, value: Vec3) {
        let name = name.into();
        self.vectors
            .insert(name.clone(), Arc::new(SharedValue::new(name, value)));
    }

    pub fn insert_int(&mut self, name: impl Into<String>, value: i32) {
        let name = name.into();
        self.ints
            .insert(name.clone(), Arc::new(SharedValue::new(name, value)));
    }

    pub fn float(&self, name: &str) -> Option<Arc<SharedValue<f32>>> {
        self.floats.get(name).cloned()
    }

    pub fn vector(&self, name: &str) -> Option<Arc<SharedValue<Vec3>>> {
        self.vectors.get(name).cloned()
    }

    pub fn int(&self, name: &str) -> Option<Arc<SharedValue<i32>>> {
        self.ints.get(name).cloned()
    }
}

/// Types that can live in a [`SharedStore`] pool.
pub trait DataLike: Copy + Default + Send + Sync + std::fmt::Debug + 'static {
    const KIND: &'static str;

    fn lookup(store: &SharedStore, name: &str) -> Option<Arc<SharedValue<Self>>>;
}

impl DataLike for f32 {
    const KIND: &'static str = "float";

    fn lookup(store: &SharedStore, name: &str) -> Option<Arc<SharedValue<Self>>> {
        store.float(name)
    }
}

impl DataLike for i32 {
    const KIND: &'static str = "int";

    fn lookup(store: &SharedStore, name: &str) -> Option<Arc<SharedValue<Self>>> {
        store.int(name)
    }
}

impl DataLike for Vec3 {
    const KIND: &'static str = "vector";

    fn lookup(store: &SharedStore, name: &str) -> Option<Arc<SharedValue<Self>>> {
        store.vector(name)
    }
}

#[derive(Clone, Debug)]
enum ReferenceSlot<T: DataLike> {
    Pending(String),
    Bound(Arc<SharedValue<T>>),
}

/// Literal-or-reference value. Authored as either an inline literal or the
/// name of a shared constant; [`DataValue::check_reference`] binds the name
/// during instantiation, leaving shared data shared (only per-character
/// parameters get privatized by the resolver).
#[derive(Clone, Debug)]
pub struct DataValue<T: DataLike> {
    literal: T,
    reference: Option<ReferenceSlot<T>>,
}

impl<T: DataLike> Default for DataValue<T> {
    fn default() -> Self {
        Self {
            literal: T::default(),
            reference: None,
        }
    }
}

impl<T: DataLike> DataValue<T> {
    pub fn literal(value: T) -> Self {
        Self {
            literal: value,
            reference: None,
        }
    }

    /// A reference to a shared constant, with a literal fallback used until
    /// (and unless) the reference binds.
    pub fn shared(name: impl Into<String>, fallback: T) -> Self {
        Self {
            literal: fallback,
            reference: Some(ReferenceSlot::Pending(name.into())),
        }
    }

    pub fn get(&self) -> T {
        match &self.reference {
            Some(ReferenceSlot::Bound(shared)) => shared.value(),
            _ => self.literal,
        }
    }

    /// Called once per instantiation. No-op for literals; rebinds pending
    /// names against the shared store.
    pub fn check_reference(&mut self, resolver: &ReferenceResolver) -> Result<(), GraphError> {
        if let Some(ReferenceSlot::Pending(name)) = &self.reference {
            let shared = resolver.swap_shared::<T>(name)?;
            self.reference = Some(ReferenceSlot::Bound(shared));
        }
        Ok(())
    }

}

impl<T: DataLike + PartialOrd> DataValue<T> {
    /// Author-time guard: clamps the literal into `[min, max]`. Runtime
    /// reads accept out-of-range values as-is.
    pub fn clamp_value(&mut self, min: T, max: T) {
        if self.literal < min {
            self.literal = min;
        } else if self.literal > max {
            self.literal = max;
        }
    }
}

impl<T: DataLike> Remappable for DataValue<T> {
    fn swap(&mut self, resolver: &ReferenceResolver) -> Result<(), GraphError> {
        self.check_reference(resolver)
    }

    fn is_resolved(&self) -> bool {
        !matches!(self.reference, Some(ReferenceSlot::Pending(_)))
    }

    fn label(&self) -> &str {
        match &self.reference {
            Some(ReferenceSlot::Pending(name)) => name,
            Some(ReferenceSlot::Bound(shared)) => shared.name(),
            None => "literal",
        }
    }
}
