//! # Motion graph state engine
//!
//! A per-frame, per-character state machine for first-person character
//! movement. Each active [`MotionState`](motion_state::MotionState)
//! computes a displacement contribution and a small set of
//! physics-interaction flags, reads and writes a typed parameter
//! blackboard, and can be save-game serialized mid-simulation.
//!
//! What lives here:
//! - the [`parameter`] family: typed blackboard cells shared between
//!   states within one character instance;
//! - [`shared_data`]: literal-or-reference tunables addressable by name;
//! - the [`resolver`]: the instancing pass that privatizes per-character
//!   references so template graphs can be shared safely;
//! - the [`motion_state`] trait and [`context`] types;
//! - the [`persistence`] channel for bit-faithful save/load of
//!   mid-simulation continuous state;
//! - [`graph`]: template and instance containers;
//! - [`maths`]: critically-damped smoothing, slope projection and
//!   directional speed shaping.
//!
//! Out of scope, by design: transition selection, collision and final
//! displacement (the host controller's job), rendering, input mapping and
//! asset authoring. The [`context::Environment`] trait is the only window
//! into the host world.

pub mod context;
pub mod errors;
pub mod graph;
pub mod maths;
pub mod motion_state;
pub mod parameter;
pub mod persistence;
pub mod plugin;
pub mod resolver;
pub mod shared_data;

pub mod prelude {
    pub use crate::{
        context::{
            CharacterBody, ControllerFrame, Environment, NullEnvironment, StateContext, SurfaceHit,
        },
        errors::GraphError,
        graph::{GraphInstance, GraphTemplate},
        maths::{shaping, slope, spring},
        motion_state::{MotionState, TickOutput},
        parameter::{
            ParamHandle, ParamKind, ParamValue, SwitchValue, TransformHandle,
            blackboard::Blackboard,
            refs::{
                EventRef, FloatRef, IntRef, Remappable, SwitchRef, TransformRef, TriggerRef,
                VectorRef,
            },
        },
        persistence::{
            GraphSnapshot, PropertyReader, PropertyWriter, SaveBlob, SavedValue, keys,
        },
        plugin::MotionGraphCorePlugin,
        resolver::ReferenceResolver,
        shared_data::{DataValue, SharedStore, SharedValue},
    };
}
