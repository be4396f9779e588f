/*!
Core collision types and math aliases shared by the collision submodules and the
parkour components.

This module intentionally contains no algorithms. It defines the data types
exchanged between:
- the query contract (`ShapeCastService`)
- the static world backend (broad phase + narrow phase)
- the kinematic mover (sweep-and-slide)
- the ledge scanners and the controller
*/

use rapier3d::na;

/// Common math aliases for clarity and consistency.
pub type Vec3 = na::Vector3<f32>;
pub type Vec2 = na::Vector2<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;
pub type Point3 = na::Point3<f32>;

/// World up axis.
#[inline]
pub fn up() -> Vec3 {
    Vec3::y()
}

/// Stable identifier of a collider inside a collision world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// A rigid transform (isometry) in world space.
///
/// Characters use it as their reference frame: the translation sits at the feet,
/// local forward is `-Z`, local right is `+X` and local up is `+Y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::from_translation(Vec3::zeros())
    }
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    #[inline]
    pub fn from_translation(translation: Vec3) -> Self {
        Self::new(translation, Quat::identity())
    }

    /// A transform rotated `yaw` radians about +Y.
    #[inline]
    pub fn from_translation_yaw(translation: Vec3, yaw: f32) -> Self {
        Self::new(
            translation,
            Quat::from_axis_angle(&Vec3::y_axis(), yaw),
        )
    }

    /// Convert to an nalgebra `Isometry3` for use with parry3d narrow-phase queries.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(
            na::Translation3::new(self.translation.x, self.translation.y, self.translation.z),
            self.rotation,
        )
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, -1.0)
    }

    #[inline]
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::x()
    }

    #[inline]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::y()
    }

    /// Local-space point to world space.
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.translation + self.rotation * local
    }

    /// World-space point to local space.
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.translation)
    }

    /// Local-space direction to world space (rotation only).
    #[inline]
    pub fn transform_direction(&self, local: Vec3) -> Vec3 {
        self.rotation * local
    }

    /// Rotate about world +Y by `angle` radians.
    #[inline]
    pub fn rotate_yaw(&mut self, angle: f32) {
        self.rotation = Quat::from_axis_angle(&Vec3::y_axis(), angle) * self.rotation;
    }
}

/// A single result of a cast or ray query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    /// World-space contact point on the hit collider.
    pub point: Vec3,
    /// World-space surface normal of the hit collider at `point`.
    pub normal: Vec3,
    /// Distance travelled along the cast direction before contact (meters).
    pub distance: f32,
    /// The collider that was hit, when the backend tracks identities.
    pub collider: Option<ColliderId>,
}

/// Capsule specification for the character body.
///
/// `half_height` is the half-length of the cylinder section (aligned with +Y),
/// so the total capsule height is 2*half_height + 2*radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CapsuleSpec {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleSpec {
    /// Capsule that exactly fits a standing height.
    pub fn from_height(height: f32, radius: f32) -> Self {
        Self {
            radius,
            half_height: (height * 0.5 - radius).max(0.0),
        }
    }

    pub fn height(&self) -> f32 {
        2.0 * (self.half_height + self.radius)
    }

    /// Segment end points of a Y-aligned capsule centred at `center`.
    pub fn segment(&self, center: Vec3) -> (Vec3, Vec3) {
        let offset = Vec3::new(0.0, self.half_height, 0.0);
        (center - offset, center + offset)
    }
}

/// A single contact result used by the sweep-and-slide loop.
#[derive(Clone, Copy, Debug)]
pub struct MoveHit {
    /// World-space contact normal, opposing the motion.
    pub normal: Vec3,
    /// Fraction (0..1) of the tested translation where the hit occurred.
    pub fraction: f32,
}

/// Result of a kinematic movement step (after sweep-and-slide).
#[derive(Clone, Copy, Debug)]
pub struct MoveResult {
    /// Final capsule center position after applying the step and sliding.
    pub end_pos: Vec3,
    /// Information about the last hit encountered during the step (if any).
    pub last_hit: Option<MoveHit>,
}
