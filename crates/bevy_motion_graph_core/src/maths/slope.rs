//! Slope-aware direction projection and speed falloff.

use bevy::{
    math::Vec3,
    reflect::{Reflect, std_traits::ReflectDefault},
};

/// Projects a movement direction onto the ground plane by intersecting a
/// ray from the direction's tip along `up` with the slope plane, instead of
/// naive vector projection. The horizontal component of the result equals
/// the input, so ground speed as seen from above is preserved on slopes.
///
/// Falls back to the unprojected direction when the ground is (near)
/// vertical relative to `up`.
pub fn project_direction(direction: Vec3, up: Vec3, ground_normal: Vec3) -> Vec3 {
    let denom = ground_normal.dot(up);
    if denom.abs() < 1e-4 {
        return direction;
    }
    let t = -ground_normal.dot(direction) / denom;
    direction + up * t
}

/// Designer curve scaling top speed by ground steepness: full speed below
/// `min_angle`, falling off to zero at `limit_angle`. Angles in radians.
#[derive(Reflect, Clone, Copy, Debug)]
#[reflect(Default)]
pub struct SlopeSpeedCurve {
    pub min_angle: f32,
    pub limit_angle: f32,
    /// Shape of the falloff; 1 is linear, higher keeps speed longer.
    pub exponent: f32,
}

impl Default for SlopeSpeedCurve {
    fn default() -> Self {
        Self {
            min_angle: 10f32.to_radians(),
            limit_angle: 45f32.to_radians(),
            exponent: 1.,
        }
    }
}

impl SlopeSpeedCurve {
    pub fn multiplier(&self, up: Vec3, ground_normal: Vec3) -> f32 {
        let angle = ground_normal.dot(up).clamp(-1., 1.).acos();
        if angle <= self.min_angle {
            return 1.;
        }
        if angle >= self.limit_angle {
            return 0.;
        }
        let t = (angle - self.min_angle) / (self.limit_angle - self.min_angle);
        1. - t.powf(self.exponent.max(1e-3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_ground_is_identity() {
        let direction = Vec3::new(3., 0., -4.);
        let projected = project_direction(direction, Vec3::Y, Vec3::Y);
        assert_eq!(projected, direction);
    }

    #[test]
    fn projection_preserves_horizontal_speed() {
        let direction = Vec3::new(1., 0., 0.);
        let normal = Vec3::new(-0.5, 1., 0.).normalize();
        let projected = project_direction(direction, Vec3::Y, normal);
        // Horizontal component untouched; vertical follows the slope.
        assert!((projected.x - 1.).abs() < 1e-6);
        assert!(projected.y > 0.);
        assert!((projected.dot(normal)).abs() < 1e-5);
    }

    #[test]
    fn vertical_wall_falls_back() {
        let direction = Vec3::new(1., 0., 0.);
        let projected = project_direction(direction, Vec3::Y, Vec3::X);
        assert_eq!(projected, direction);
    }

    #[test]
    fn falloff_curve_bounds() {
        let curve = SlopeSpeedCurve::default();
        assert_eq!(curve.multiplier(Vec3::Y, Vec3::Y), 1.);

        let steep = Vec3::new(0., 1., 1.).normalize();
        assert_eq!(curve.multiplier(Vec3::Y, steep), 0.);

        let mid = Vec3::new(0., 1., (27.5f32.to_radians()).tan()).normalize();
        let m = curve.multiplier(Vec3::Y, mid);
        assert!(m > 0. && m < 1.);
    }
}
