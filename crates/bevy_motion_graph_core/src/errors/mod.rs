use thiserror::Error;

use crate::parameter::ParamKind;

/// Errors raised while building or instantiating a motion graph.
///
/// Runtime state updates never produce these: a misconfigured state
/// degrades to a velocity-preserving passthrough instead (see the
/// `motion_state` module docs).
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no parameter named {0:?} is declared on this graph")]
    UnknownParameter(String),
    #[error("parameter {name:?} is declared as {found:?} but was referenced as {expected:?}")]
    MismatchedParameterKind {
        name: String,
        expected: ParamKind,
        found: ParamKind,
    },
    #[error("no shared {kind} value named {name:?} exists")]
    UnknownSharedValue { name: String, kind: &'static str },
    #[error("state {state:?} left reference {field:?} unresolved after the binding pass")]
    UnresolvedReference { state: String, field: String },
    #[error("no state named {0:?} exists in this graph")]
    UnknownState(String),
    #[error("a state named {0:?} is already present in this graph")]
    DuplicateState(String),
    #[error("a parameter named {0:?} is already declared on this graph")]
    DuplicateParameter(String),
    #[error("failed to encode snapshot: {0}")]
    SnapshotEncode(String),
    #[error("failed to decode snapshot: {0}")]
    SnapshotDecode(String),
}
