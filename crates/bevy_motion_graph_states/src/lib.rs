//! # Built-in motion states
//!
//! The concrete [`MotionState`](bevy_motion_graph_core::motion_state::MotionState)
//! library, grouped by locomotion family. Every state keeps its own
//! continuous simulation fields, declares all of its parameter/data
//! references for the resolver pass, and snapshots itself through the
//! persistence channel so a save can resume mid-state.

pub mod airborne;
pub mod fly;
pub mod ground;
pub mod helpers;
pub mod ladder;
pub mod misc;
pub mod swim;
pub mod wall;

#[cfg(test)]
pub(crate) mod testing;

pub mod prelude {
    pub use crate::{
        airborne::{
            falling::FallingState, glide::GlideState, impulse::ImpulseState,
            jetpack::JetpackState, jump::JumpState,
        },
        fly::{fly::FlyState, fly_down::FlyDownState, fly_up::FlyUpState},
        ground::{
            crouch_movement::CrouchMovementState, dodge::DodgeState, idle::IdleState,
            movement::MovementState, push_off::PushOffState,
            push_off_extended::PushOffExtendedState, slide::SlideState,
        },
        ladder::{contact_ladder::ContactLadderState, ladder_climb::LadderClimbState},
        misc::{
            dash::DashState, frozen::FrozenState, grapple::GrappleState, null::NullState,
            repulse::RepulseState,
        },
        swim::{
            stroke_swim::StrokeSwimState, surface_swim::SurfaceSwimState,
            tread_water::TreadWaterState, underwater_swim::UnderwaterSwimState,
        },
        wall::{
            mantle::MantleState, wall_cling::WallClingState, wall_dash::WallDashState,
            wall_run::WallRunState,
        },
    };
}
