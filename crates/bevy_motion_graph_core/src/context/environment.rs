use bevy::{math::Vec3, reflect::Reflect, transform::components::Transform};

use crate::parameter::TransformHandle;

/// Result of a host shape/ray query against level geometry.
#[derive(Reflect, Clone, Copy, Debug)]
pub struct SurfaceHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub distance: f32,
}

/// Host-side queries a motion state may issue. Collision detection itself
/// is the host's job; this is the narrow read-only window into it.
pub trait Environment {
    /// Casts a ray into level geometry. `direction` need not be normalized;
    /// `max_distance` is measured along the normalized direction.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit>;

    /// Resolves a transform parameter to a world transform, or `None` if
    /// the handle no longer refers to a live scene object.
    fn transform(&self, handle: TransformHandle) -> Option<Transform>;

    /// World-space water surface height at a position, or `None` when the
    /// position is not over a water volume.
    fn water_surface_height(&self, position: Vec3) -> Option<f32>;
}

/// Environment that answers every query with "nothing there". Useful for
/// tests and for graphs whose states never touch the world.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEnvironment;

impl Environment for NullEnvironment {
    fn raycast(&self, _origin: Vec3, _direction: Vec3, _max_distance: f32) -> Option<SurfaceHit> {
        None
    }

    fn transform(&self, _handle: TransformHandle) -> Option<Transform> {
        None
    }

    fn water_surface_height(&self, _position: Vec3) -> Option<f32> {
        None
    }
}
