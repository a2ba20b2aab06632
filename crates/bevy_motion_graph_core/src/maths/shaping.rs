//! Directional top-speed shaping.

use bevy::math::Vec2;

/// Scales top speed by independent strafe and reverse multipliers,
/// combined multiplicatively from the raw input vector's axis magnitudes.
/// Pure forward input yields 1; pure strafe yields `strafe`; pure reverse
/// yields `reverse`; diagonals blend both.
pub fn directional_multiplier(input: Vec2, strafe: f32, reverse: f32) -> f32 {
    let len = input.length();
    if len < 1e-5 {
        return 1.;
    }
    let lateral = input.x.abs() / len;
    let backward = (-input.y).max(0.) / len;
    (1. + (strafe - 1.) * lateral) * (1. + (reverse - 1.) * backward)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_is_unscaled() {
        assert_eq!(directional_multiplier(Vec2::new(0., 1.), 0.8, 0.5), 1.);
    }

    #[test]
    fn pure_strafe_and_reverse() {
        assert!((directional_multiplier(Vec2::new(1., 0.), 0.8, 0.5) - 0.8).abs() < 1e-6);
        assert!((directional_multiplier(Vec2::new(0., -1.), 0.8, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn diagonal_reverse_combines_multiplicatively() {
        let m = directional_multiplier(Vec2::new(1., -1.), 0.8, 0.5);
        let inv_sqrt2 = std::f32::consts::FRAC_1_SQRT_2;
        let expected = (1. + (0.8 - 1.) * inv_sqrt2) * (1. + (0.5 - 1.) * inv_sqrt2);
        assert!((m - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_input_is_neutral() {
        assert_eq!(directional_multiplier(Vec2::ZERO, 0.1, 0.1), 1.);
    }
}
