//! Small vector and scalar helpers shared by the scanners and the controller.

use crate::collision::{settings::DIST_EPS, types::Vec3};

/// Is every component of `p` finite?
///
/// Points produced by failed queries are never handed around (they are `None`), but
/// callers may still pass garbage in; those inputs are treated as "no result".
#[inline]
pub fn is_valid_point(p: &Vec3) -> bool {
    p.iter().all(|v| v.is_finite())
}

/// Are two positions equal within [`DIST_EPS`]?
#[inline]
pub fn approx_eq(a: &Vec3, b: &Vec3) -> bool {
    (a - b).norm_squared() <= DIST_EPS * DIST_EPS
}

/// Result of a single [`move_towards`] step.
#[derive(Clone, Copy, Debug)]
pub struct MoveTowardResult {
    /// New position after the step.
    pub position: Vec3,
    /// Distance actually covered by this step.
    pub travelled: f32,
    /// Did the step land on the target?
    pub arrived: bool,
}

/// Step from `current` toward `target` by at most `max_delta`.
///
/// The target is reached exactly (not approximately) when it lies within `max_delta`,
/// so position-equality checks after a final step are reliable.
#[inline]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> MoveTowardResult {
    let delta = target - current;
    let dist = delta.norm();

    if dist <= max_delta.max(0.0) || dist <= DIST_EPS {
        return MoveTowardResult {
            position: target,
            travelled: dist,
            arrived: true,
        };
    }

    let step = max_delta.max(0.0);
    MoveTowardResult {
        position: current + delta / dist * step,
        travelled: step,
        arrived: false,
    }
}

/// Linear interpolation with `t` clamped to `0..=1`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Vector linear interpolation with `t` clamped to `0..=1`.
#[inline]
pub fn lerp_vec(a: Vec3, b: Vec3, t: f32) -> Vec3 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Round `value` to `decimals` decimal places.
#[inline]
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let scale = 10f32.powi(decimals);
    (value * scale).round() / scale
}

/// Wrap an angle once into `-360..=360` degrees, then clamp it.
#[inline]
pub fn clamp_angle(mut angle: f32, min: f32, max: f32) -> f32 {
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.clamp(min, max)
}

/// Point of `points` closest to `origin`. Ties keep the earliest point.
pub fn closest_point(origin: &Vec3, points: &[Vec3]) -> Option<Vec3> {
    points.iter().copied().fold(None, |best: Option<Vec3>, p| match best {
        Some(b) if (b - origin).norm_squared() <= (p - origin).norm_squared() => Some(b),
        _ => Some(p),
    })
}

/// Push `point` unless an equal point (within [`DIST_EPS`]) is already present.
///
/// Returns whether the point was added.
pub fn push_unique(points: &mut Vec<Vec3>, point: Vec3) -> bool {
    if points.iter().any(|p| approx_eq(p, &point)) {
        return false;
    }
    points.push(point);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_towards_snaps_onto_target() {
        let res = move_towards(Vec3::zeros(), Vec3::new(0.0, 0.3, 0.0), 0.5);
        assert!(res.arrived);
        assert_eq!(res.position, Vec3::new(0.0, 0.3, 0.0));
        assert!((res.travelled - 0.3).abs() < 1.0e-6);
    }

    #[test]
    fn move_towards_limits_step() {
        let res = move_towards(Vec3::zeros(), Vec3::new(0.0, 0.0, -2.0), 0.5);
        assert!(!res.arrived);
        assert!((res.position - Vec3::new(0.0, 0.0, -0.5)).norm() < 1.0e-6);
    }

    #[test]
    fn clamp_angle_wraps_once() {
        assert_eq!(clamp_angle(370.0, -90.0, 90.0), 10.0);
        assert_eq!(clamp_angle(-100.0, -90.0, 90.0), -90.0);
    }

    #[test]
    fn round_to_three_decimals() {
        assert!((round_to(3.14159, 3) - 3.142).abs() < 1.0e-6);
    }

    #[test]
    fn closest_point_prefers_earliest_on_ties() {
        let pts = [Vec3::new(1.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)];
        assert_eq!(closest_point(&Vec3::zeros(), &pts), Some(pts[0]));
        assert_eq!(closest_point(&Vec3::zeros(), &[]), None);
    }

    #[test]
    fn push_unique_dedupes() {
        let mut pts = Vec::new();
        assert!(push_unique(&mut pts, Vec3::new(1.0, 2.0, 3.0)));
        assert!(!push_unique(&mut pts, Vec3::new(1.0, 2.0, 3.0)));
        assert_eq!(pts.len(), 1);
    }

    #[test]
    fn invalid_points_are_detected() {
        assert!(is_valid_point(&Vec3::zeros()));
        assert!(!is_valid_point(&Vec3::new(f32::NEG_INFINITY, 0.0, 0.0)));
        assert!(!is_valid_point(&Vec3::new(0.0, f32::NAN, 0.0)));
    }
}
