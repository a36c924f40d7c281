//! Scalar and vector easing helpers used by agents, gates and the player motor.

use glam::Vec3;
use std::f32::consts::{PI, TAU};

/// Linear interpolation without clamping.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap an angle in radians into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Move `current` toward `target` by at most `max_delta`, never overshooting.
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance < f32::EPSILON {
        target
    } else {
        current + to_target / distance * max_delta
    }
}

/// Critically damped spring toward `target`. `velocity` carries state between calls.
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }
    let smooth_time = smooth_time.max(1e-4);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);
    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // No overshoot past the target.
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = 0.0;
    }
    output
}

/// [`smooth_damp`] for angles in radians, taking the short way round.
pub fn smooth_damp_angle(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    let target = current + wrap_angle(target - current);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_towards_stops_at_target() {
        let a = Vec3::ZERO;
        let b = Vec3::new(0.0, -5.0, 0.0);
        assert_eq!(move_towards(a, b, 2.0), Vec3::new(0.0, -2.0, 0.0));
        assert_eq!(move_towards(a, b, 10.0), b);
    }

    #[test]
    fn smooth_damp_converges_without_overshoot() {
        let mut v = 0.0;
        let mut h = 0.0;
        for _ in 0..120 {
            h = smooth_damp(h, 3.0, &mut v, 0.1, 1.0 / 60.0);
            assert!(h <= 3.0);
        }
        assert!((h - 3.0).abs() < 1e-3);
    }

    #[test]
    fn angles_wrap_and_damp_the_short_way() {
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(-0.5) + 0.5).abs() < 1e-6);

        let mut v = 0.0;
        let start = PI - 0.1;
        let next = smooth_damp_angle(start, -PI + 0.1, &mut v, 0.1, 1.0 / 60.0);
        assert!(next > start, "should turn through PI, got {next}");
    }
}
