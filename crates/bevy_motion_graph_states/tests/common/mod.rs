//! Environment stub shared by the integration tests.

use bevy::{math::Vec3, platform::collections::HashMap, transform::components::Transform};
use bevy_motion_graph_core::{
    context::{Environment, SurfaceHit},
    parameter::TransformHandle,
};

/// A world with one wall plane, a flat water level, and a transform table.
#[derive(Debug, Default)]
pub struct MockEnv {
    /// Infinite plane: (point on plane, outward normal).
    pub wall: Option<(Vec3, Vec3)>,
    pub water_height: Option<f32>,
    pub transforms: HashMap<u64, Transform>,
}

impl Environment for MockEnv {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let (point, normal) = self.wall?;
        let direction = direction.normalize_or_zero();
        let denom = direction.dot(normal);
        if denom >= -1e-6 {
            return None;
        }
        let t = (point - origin).dot(normal) / denom;
        if t < 0. || t > max_distance {
            return None;
        }
        Some(SurfaceHit {
            point: origin + direction * t,
            normal,
            distance: t,
        })
    }

    fn transform(&self, handle: TransformHandle) -> Option<Transform> {
        self.transforms.get(&handle.0).copied()
    }

    fn water_surface_height(&self, _position: Vec3) -> Option<f32> {
        self.water_height
    }
}
