use bevy::app::{App, Plugin};

use crate::{
    context::{CharacterBody, ControllerFrame, SurfaceHit},
    maths::slope::SlopeSpeedCurve,
    parameter::{ParamKind, ParamValue, SwitchValue, TransformHandle},
};

/// Registers the engine's plain value types for reflection-based tooling
/// (inspectors, debug overlays). The engine itself has no systems: the
/// host character controller drives graph instances directly.
pub struct MotionGraphCorePlugin;

impl Plugin for MotionGraphCorePlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<ParamKind>()
            .register_type::<ParamValue>()
            .register_type::<SwitchValue>()
            .register_type::<TransformHandle>()
            .register_type::<ControllerFrame>()
            .register_type::<CharacterBody>()
            .register_type::<SurfaceHit>()
            .register_type::<SlopeSpeedCurve>();
    }
}
