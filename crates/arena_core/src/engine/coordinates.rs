//! 2D vectors, headings and angle helpers.
//!
//! Positions are world coordinates centered on the arena origin (the zone
//! center). Headings are angles in radians, counterclockwise from the +X axis.
//! Direction arguments throughout the crate must be unit vectors, with a
//! 1e-5 tolerance on the magnitude.

use std::f32::consts::PI;

pub type Vec2 = nalgebra::Vector2<f32>;

/// Magnitude tolerance accepted by [`is_normalized`].
pub const NORMALIZED_EPS: f32 = 1.0e-5;

#[inline]
pub fn vec2(x: f32, y: f32) -> Vec2 {
    Vec2::new(x, y)
}

#[inline]
pub fn is_normalized(v: Vec2) -> bool {
    (v.norm() - 1.0).abs() < NORMALIZED_EPS
}

/// Unit vector pointing along a heading angle.
#[inline]
pub fn heading_dir(heading: f32) -> Vec2 {
    Vec2::new(heading.cos(), heading.sin())
}

/// Heading angle of a (non-zero) vector.
#[inline]
pub fn heading_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Counterclockwise perpendicular.
#[inline]
pub fn perp_ccw(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Clockwise perpendicular.
#[inline]
pub fn perp_cw(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Rotate a vector by an angle in radians.
#[inline]
pub fn rotate_vec(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unsigned angle between two unit vectors, in `[0, π]`.
#[inline]
pub fn angle_between(a: Vec2, b: Vec2) -> f32 {
    a.dot(&b).clamp(-1.0, 1.0).acos()
}

/// Wrap an angle into `(-π, π]`.
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a <= -PI {
        a += 2.0 * PI;
    }
    a
}

/// Step a heading toward a target heading along the shorter arc, turning at
/// most `max_step` radians. Returns the new heading.
pub fn step_heading(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = wrap_angle(target - current);
    if delta.abs() <= max_step {
        target
    } else {
        wrap_angle(current + max_step.copysign(delta))
    }
}

#[inline]
pub fn clamp01(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_is_normalized_tolerance() {
        assert!(is_normalized(vec2(1.0, 0.0)));
        assert!(is_normalized(vec2(0.6, 0.8)));
        assert!(!is_normalized(vec2(1.0, 1.0)));
        assert!(!is_normalized(vec2(0.0, 0.0)));
    }

    #[test]
    fn test_heading_round_trip() {
        for &angle in &[0.0, 0.5, -1.2, 3.0] {
            let dir = heading_dir(angle);
            assert!(is_normalized(dir));
            assert!((heading_of(dir) - angle).abs() < 1e-6);
        }
    }

    #[test]
    fn test_perpendiculars_are_orthogonal() {
        let v = vec2(0.6, 0.8);
        assert!(perp_ccw(v).dot(&v).abs() < 1e-6);
        assert!(perp_cw(v).dot(&v).abs() < 1e-6);
        // ccw of +X is +Y
        assert!((perp_ccw(vec2(1.0, 0.0)) - vec2(0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_angle_between() {
        let a = vec2(1.0, 0.0);
        assert!((angle_between(a, vec2(0.0, 1.0)) - FRAC_PI_2).abs() < 1e-5);
        assert!(angle_between(a, a) < 1e-5);
    }

    #[test]
    fn test_step_heading_shorter_arc() {
        // From +170° to -170° the short way crosses π.
        let current = 170f32.to_radians();
        let target = -170f32.to_radians();
        let stepped = step_heading(current, target, 10f32.to_radians());
        assert!((wrap_angle(stepped - target)).abs() < 1e-4);

        // Clamped step moves by exactly max_step.
        let stepped = step_heading(0.0, 1.0, 0.25);
        assert!((stepped - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_vec() {
        let r = rotate_vec(vec2(1.0, 0.0), FRAC_PI_2);
        assert!((r - vec2(0.0, 1.0)).norm() < 1e-6);
    }
}
