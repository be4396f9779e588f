use crate::layers::LayerMask;

use super::types::{ColliderId, Hit, Quat, Vec3};

/// Synchronous shape queries against a collision world.
///
/// Every call is deterministic for a fixed world state and fixed parameters. Directions
/// do not need to be normalized; implementations normalize them and return no hits for
/// a zero direction.
///
/// Casts report only colliders first touched during the sweep: a collider that already
/// overlaps the shape at its starting pose is skipped. `*_cast_all` results are sorted
/// by ascending distance.
pub trait ShapeCastService {
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit>;

    /// Sweep a capsule with segment `p1..p2` and return the earliest hit.
    fn capsule_cast(
        &self,
        p1: Vec3,
        p2: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit>;

    fn box_cast_all(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit>;

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ColliderId>;

    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        mask: LayerMask,
    ) -> Vec<ColliderId>;

    fn overlap_capsule(&self, p1: Vec3, p2: Vec3, radius: f32, mask: LayerMask)
    -> Vec<ColliderId>;

    /// Cast a ray and return the first hit together with the surface normal.
    fn raycast_with_normal(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit>;

    fn check_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> bool {
        !self.overlap_sphere(center, radius, mask).is_empty()
    }

    fn check_box(&self, center: Vec3, half_extents: Vec3, orientation: Quat, mask: LayerMask) -> bool {
        !self.overlap_box(center, half_extents, orientation, mask).is_empty()
    }

    fn check_capsule(&self, p1: Vec3, p2: Vec3, radius: f32, mask: LayerMask) -> bool {
        !self.overlap_capsule(p1, p2, radius, mask).is_empty()
    }
}
