//! Unit-test harness shared by the per-state test modules.

use bevy::{math::Vec3, platform::collections::HashMap, transform::components::Transform};
use bevy_motion_graph_core::{
    context::{CharacterBody, ControllerFrame, Environment, StateContext, SurfaceHit},
    parameter::{TransformHandle, blackboard::Blackboard},
};

/// Environment stub with a single configurable wall plane, water level and
/// transform table.
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

pub struct Harness {
    pub frame: ControllerFrame,
    pub body: CharacterBody,
    pub blackboard: Blackboard,
    pub env: MockEnv,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            frame: ControllerFrame::default(),
            body: CharacterBody::default(),
            blackboard: Blackboard::new(),
            env: MockEnv::default(),
        }
    }

    pub fn grounded() -> Self {
        let mut harness = Self::new();
        harness.body.is_grounded = true;
        harness
    }

    pub fn ctx(&mut self, dt: f32) -> StateContext<'_> {
        StateContext {
            dt,
            frame: &self.frame,
            body: &mut self.body,
            blackboard: &mut self.blackboard,
            environment: &self.env,
        }
    }
}
