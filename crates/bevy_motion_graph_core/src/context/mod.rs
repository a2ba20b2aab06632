pub mod environment;

use bevy::{
    math::{Quat, Vec2, Vec3},
    reflect::{Reflect, std_traits::ReflectDefault},
};

pub use environment::{Environment, NullEnvironment, SurfaceHit};

use crate::parameter::blackboard::Blackboard;

/// Read-only per-tick snapshot of the host controller's input and aim.
#[derive(Reflect, Clone, Copy, Debug)]
#[reflect(Default)]
pub struct ControllerFrame {
    /// Raw 2D move input: x is strafe (right positive), y is forward.
    pub input_move: Vec2,
    /// Analog input magnitude scale, 0 to 1.
    pub input_scale: f32,
    /// World-space aim direction.
    pub aim_forward: Vec3,
    /// Aim yaw in radians.
    pub aim_heading: f32,
    /// Aim pitch in radians, positive looking up.
    pub aim_pitch: f32,
    /// Character world position (feet).
    pub position: Vec3,
    /// Character world rotation.
    pub rotation: Quat,
}

impl Default for ControllerFrame {
    fn default() -> Self {
        Self {
            input_move: Vec2::ZERO,
            input_scale: 1.,
            aim_forward: Vec3::NEG_Z,
            aim_heading: 0.,
            aim_pitch: 0.,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl ControllerFrame {
    /// Aim forward flattened onto the plane perpendicular to `up`.
    pub fn flat_forward(&self, up: Vec3) -> Vec3 {
        (self.aim_forward - up * self.aim_forward.dot(up)).normalize_or_zero()
    }

    pub fn flat_right(&self, up: Vec3) -> Vec3 {
        self.flat_forward(up).cross(up)
    }

    /// World-space input direction on the plane perpendicular to `up`.
    /// Zero when there is no input.
    pub fn move_direction(&self, up: Vec3) -> Vec3 {
        let forward = self.flat_forward(up);
        let right = forward.cross(up);
        (right * self.input_move.x + forward * self.input_move.y).normalize_or_zero()
    }
}

/// Host character-controller state a motion state may read and (for
/// velocity) write. Final displacement stays with the host: states only
/// return a move vector and flags.
#[derive(Reflect, Clone, Copy, Debug)]
#[reflect(Default)]
pub struct CharacterBody {
    pub velocity: Vec3,
    pub up: Vec3,
    pub gravity: Vec3,
    pub is_grounded: bool,
    pub ground_normal: Vec3,
    /// Velocity inherited from a moving platform underfoot.
    pub platform_velocity: Vec3,
    pub radius: f32,
    pub height: f32,
    pub step_height: f32,
    /// Maximum walkable slope angle in radians.
    pub slope_limit: f32,
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            up: Vec3::Y,
            gravity: Vec3::new(0., -9.81, 0.),
            is_grounded: false,
            ground_normal: Vec3::Y,
            platform_velocity: Vec3::ZERO,
            radius: 0.4,
            height: 1.8,
            step_height: 0.3,
            slope_limit: std::f32::consts::FRAC_PI_4,
        }
    }
}

impl CharacterBody {
    /// Velocity component perpendicular to `up`.
    pub fn planar_velocity(&self) -> Vec3 {
        self.velocity - self.up * self.velocity.dot(self.up)
    }

    /// Signed velocity component along `up`.
    pub fn vertical_speed(&self) -> f32 {
        self.velocity.dot(self.up)
    }
}

/// Everything an active state sees during one lifecycle call. Rebuilt by
/// the graph instance each tick; states never hold onto it.
pub struct StateContext<'a> {
    /// Tick duration in seconds.
    pub dt: f32,
    pub frame: &'a ControllerFrame,
    pub body: &'a mut CharacterBody,
    pub blackboard: &'a mut Blackboard,
    pub environment: &'a dyn Environment,
}

impl<'a> StateContext<'a> {
    pub fn reborrow(&mut self) -> StateContext<'_> {
        StateContext {
            dt: self.dt,
            frame: self.frame,
            body: self.body,
            blackboard: self.blackboard,
            environment: self.environment,
        }
    }
}
