use std::fmt;

use crate::collision::types::{Transform, Vec3};
use crate::math::is_valid_point;

/// Ledge height class relative to the character's reach frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LedgeType {
    #[default]
    Unset,
    Low,
    Mid,
    High,
}

/// A candidate ledge in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgePoint {
    pub position: Vec3,
    pub ledge_type: LedgeType,
}

/// Rejections raised by geometric classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeometryError {
    /// A point with non-finite components.
    InvalidPoint,
    /// A zero-length or non-finite direction.
    InvalidDirection,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeometryError::InvalidPoint => write!(f, "point has non-finite components"),
            GeometryError::InvalidDirection => write!(f, "direction is zero or non-finite"),
        }
    }
}

impl std::error::Error for GeometryError {}

/// Local-space heights separating low, mid and high ledges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LedgeCutoffs {
    /// Ledges at or below this local height are low.
    pub low: f32,
    /// Ledges at or above this local height are high.
    pub high: f32,
}

impl LedgeCutoffs {
    /// Classify a world-space `point` by its height in `frame`'s local space.
    pub fn classify(&self, frame: &Transform, point: &Vec3) -> Result<LedgeType, GeometryError> {
        if !is_valid_point(point) {
            return Err(GeometryError::InvalidPoint);
        }

        let local_y = frame.inverse_transform_point(*point).y;
        Ok(if local_y <= self.low {
            LedgeType::Low
        } else if local_y >= self.high {
            LedgeType::High
        } else {
            LedgeType::Mid
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUTOFFS: LedgeCutoffs = LedgeCutoffs { low: 0.8, high: 1.6 };

    #[test]
    fn boundaries_fall_into_outer_buckets() {
        let frame = Transform::default();
        let at = |y: f32| CUTOFFS.classify(&frame, &Vec3::new(0.0, y, -0.5));
        assert_eq!(at(0.8), Ok(LedgeType::Low));
        assert_eq!(at(0.81), Ok(LedgeType::Mid));
        assert_eq!(at(1.59), Ok(LedgeType::Mid));
        assert_eq!(at(1.6), Ok(LedgeType::High));
    }

    #[test]
    fn classification_is_relative_to_the_frame() {
        let frame = Transform::from_translation(Vec3::new(0.0, 10.0, 0.0));
        assert_eq!(
            CUTOFFS.classify(&frame, &Vec3::new(0.0, 11.0, 0.0)),
            Ok(LedgeType::Mid)
        );
    }

    #[test]
    fn invalid_points_are_rejected() {
        let frame = Transform::default();
        assert_eq!(
            CUTOFFS.classify(&frame, &Vec3::new(f32::NEG_INFINITY, 0.0, 0.0)),
            Err(GeometryError::InvalidPoint)
        );
    }
}
