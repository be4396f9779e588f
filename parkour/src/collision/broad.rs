use rapier3d::na;
use rapier3d::parry::{
    bounding_volume::Aabb,
    partitioning::{Bvh, BvhBuildStrategy},
    shape::Shape,
};

use super::{
    types::{Iso, Vec3},
    world::StaticCollider,
};

/// Acceleration structure for broad-phase queries over immutable world statics.
///
/// Notes:
/// - Finite shapes are stored as world-space AABBs in a BVH. Planes are handled separately
///   because they are infinite and always candidates.
/// - `non_plane_indices` maps each BVH leaf back to its index in the collider slice.
/// - `plane_indices` stores indices of planes in the collider slice.
pub struct WorldAccel {
    /// BVH over finite static shapes (AABBs).
    pub bvh: Bvh,
    /// Indices into the collider slice for the AABBs above.
    pub non_plane_indices: Vec<usize>,
    /// Indices into the collider slice for planes.
    pub plane_indices: Vec<usize>,
}

impl WorldAccel {
    /// Return true if this accelerator has no non-plane entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.non_plane_indices.is_empty()
    }

    /// Number of non-plane entries (AABBs) in this accelerator.
    #[inline]
    pub fn len(&self) -> usize {
        self.non_plane_indices.len()
    }
}

/// Build a broad-phase accelerator over immutable world statics.
pub fn build_world_accel(colliders: &[StaticCollider]) -> WorldAccel {
    let mut aabbs: Vec<Aabb> = Vec::new();
    let mut non_plane_indices: Vec<usize> = Vec::new();
    let mut plane_indices: Vec<usize> = Vec::new();

    for (i, collider) in colliders.iter().enumerate() {
        if collider.is_plane {
            plane_indices.push(i);
        } else {
            aabbs.push(collider.shape.compute_aabb(&collider.iso));
            non_plane_indices.push(i);
        }
    }

    WorldAccel {
        bvh: Bvh::from_leaves(BvhBuildStrategy::Binned, &aabbs),
        non_plane_indices,
        plane_indices,
    }
}

/// Compute the AABB swept by `shape` at `iso` translating by `translation`.
///
/// The resulting AABB is inflated by `margin` to conservatively include near misses.
pub fn swept_shape_aabb(shape: &dyn Shape, iso: &Iso, translation: Vec3, margin: f32) -> Aabb {
    let start = shape.compute_aabb(iso);
    let end_iso = Iso::from_parts(
        na::Translation3::from(iso.translation.vector + translation),
        iso.rotation,
    );
    let end = shape.compute_aabb(&end_iso);

    aabb_inflate(&aabb_union(&start, &end), margin)
}

/// AABB around the segment `origin..origin + direction * max_distance`.
pub fn ray_aabb(origin: Vec3, direction: Vec3, max_distance: f32) -> Aabb {
    let end = origin + direction * max_distance;
    Aabb {
        mins: na::Point3::new(origin.x.min(end.x), origin.y.min(end.y), origin.z.min(end.z)),
        maxs: na::Point3::new(origin.x.max(end.x), origin.y.max(end.y), origin.z.max(end.z)),
    }
}

/// Candidate collider indices whose AABB intersects `aabb`, planes first.
///
/// Returns indices referencing the collider slice (not the BVH leaf array), ascending.
pub fn query_candidates(accel: &WorldAccel, aabb: &Aabb) -> Vec<usize> {
    let mut out: Vec<usize> = accel.plane_indices.clone();
    out.extend(
        accel
            .bvh
            .intersect_aabb(aabb)
            .map(|leaf_idx| accel.non_plane_indices[leaf_idx as usize]),
    );
    // Keep results independent from BVH traversal order.
    out.sort_unstable();
    out
}

/// Compute the union of two AABBs.
fn aabb_union(a: &Aabb, b: &Aabb) -> Aabb {
    let min = na::Point3::new(
        a.mins.x.min(b.mins.x),
        a.mins.y.min(b.mins.y),
        a.mins.z.min(b.mins.z),
    );
    let max = na::Point3::new(
        a.maxs.x.max(b.maxs.x),
        a.maxs.y.max(b.maxs.y),
        a.maxs.z.max(b.maxs.z),
    );
    Aabb {
        mins: min,
        maxs: max,
    }
}

/// Inflate an AABB by `margin` on all sides.
fn aabb_inflate(a: &Aabb, margin: f32) -> Aabb {
    if margin <= 0.0 {
        return *a;
    }
    let delta = na::Vector3::new(margin, margin, margin);
    Aabb {
        mins: a.mins - delta,
        maxs: a.maxs + delta,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_aabb_orders_corners() {
        let aabb = ray_aabb(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, -1.0, -1.0), 2.0);
        assert_eq!(aabb.mins, na::Point3::new(1.0, 0.0, 1.0));
        assert_eq!(aabb.maxs, na::Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn inflate_grows_every_side() {
        let a = Aabb {
            mins: na::Point3::new(0.0, 0.0, 0.0),
            maxs: na::Point3::new(1.0, 1.0, 1.0),
        };
        let b = aabb_inflate(&a, 0.5);
        assert_eq!(b.mins, na::Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(b.maxs, na::Point3::new(1.5, 1.5, 1.5));
        assert_eq!(aabb_union(&a, &b), b);
    }
}
