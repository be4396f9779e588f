//! Parry-backed static collision world.
//!
//! The world is built once from a list of static collider definitions and then only
//! queried. It implements [`ShapeCastService`], so every parkour component can run against
//! it directly.
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets
//!   and return hits in a stable order.
//! - Query-focused: casts, overlaps and rays only. Nothing in here moves.

use rapier3d::na::{self, Translation3, UnitQuaternion, UnitVector3};
use rapier3d::parry::shape::{Ball, Capsule, Cuboid, SharedShape, Shape};

use crate::layers::LayerMask;

use super::{
    broad::{self, WorldAccel},
    narrow_phase,
    service::ShapeCastService,
    types::{ColliderId, Hit, Iso, Quat, Vec3},
};

/// Canonical definition of an immutable world collider.
///
/// Conventions
/// - Units are meters.
/// - Rotation is a unit quaternion.
/// - For planes, we use a pose-derived normal: `normal = rotation * +Y`,
///   and compute `dist = dot(normal, translation) + offset_along_normal`.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: UnitQuaternion<f32>,
    /// Collider shape parameters.
    pub shape: ColliderShapeDef,
    /// Layers this collider belongs to.
    pub layers: LayerMask,
}

impl WorldStaticDef {
    pub fn new(id: u32, translation: Vec3, shape: ColliderShapeDef, layers: LayerMask) -> Self {
        Self {
            id,
            translation,
            rotation: UnitQuaternion::identity(),
            shape,
            layers,
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space), offset along the pose-derived normal.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Y-aligned capsule (meters).
    CapsuleY { radius: f32, half_height: f32 },

    /// Y-aligned cylinder (meters).
    CylinderY { radius: f32, half_height: f32 },

    /// Rounded cuboid (meters).
    ///
    /// `border_radius` rounds all edges/corners.
    RoundCuboid {
        half_extents: Vec3,
        border_radius: f32,
    },
}

impl ColliderShapeDef {
    /// Are all size parameters finite and strictly positive?
    fn is_valid(&self) -> bool {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        match self {
            ColliderShapeDef::Plane {
                offset_along_normal,
            } => offset_along_normal.is_finite(),
            ColliderShapeDef::Cuboid { half_extents } => half_extents.iter().all(|v| positive(*v)),
            ColliderShapeDef::Sphere { radius } => positive(*radius),
            ColliderShapeDef::CapsuleY {
                radius,
                half_height,
            }
            | ColliderShapeDef::CylinderY {
                radius,
                half_height,
            } => positive(*radius) && positive(*half_height),
            ColliderShapeDef::RoundCuboid {
                half_extents,
                border_radius,
            } => half_extents.iter().all(|v| positive(*v)) && positive(*border_radius),
        }
    }
}

/// A collider as stored by the world: a shape at a fixed world pose.
pub struct StaticCollider {
    pub id: ColliderId,
    pub iso: Iso,
    pub shape: SharedShape,
    pub layers: LayerMask,
    pub is_plane: bool,
}

/// Build a stored collider from a `WorldStaticDef`.
fn collider_from_def(def: &WorldStaticDef) -> StaticCollider {
    let pose = Iso::from_parts(Translation3::from(def.translation), def.rotation);

    let (iso, shape, is_plane) = match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Derive world-space plane normal from pose rotation: n = R * +Y.
            // Then compute plane dist: n ⋅ x = dist, where x is any point on the plane.
            let n = def.rotation * Vec3::y();
            let dist = n.dot(&def.translation) + *offset_along_normal;
            let unit_n = UnitVector3::new_normalize(n);

            // Represent the plane `unit_n ⋅ x = dist` by placing the half-space at `unit_n * dist`.
            let iso = Iso::from_parts(
                Translation3::from(unit_n.into_inner() * dist),
                UnitQuaternion::identity(),
            );
            (iso, SharedShape::halfspace(unit_n), true)
        }

        ColliderShapeDef::Cuboid { half_extents } => (
            pose,
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z),
            false,
        ),

        ColliderShapeDef::Sphere { radius } => (pose, SharedShape::ball(*radius), false),

        ColliderShapeDef::CapsuleY {
            radius,
            half_height,
        } => (pose, SharedShape::capsule_y(*half_height, *radius), false),

        ColliderShapeDef::CylinderY {
            radius,
            half_height,
        } => (pose, SharedShape::cylinder(*half_height, *radius), false),

        ColliderShapeDef::RoundCuboid {
            half_extents,
            border_radius,
        } => (
            pose,
            SharedShape::round_cuboid(
                half_extents.x,
                half_extents.y,
                half_extents.z,
                *border_radius,
            ),
            false,
        ),
    };

    StaticCollider {
        id: ColliderId(def.id),
        iso,
        shape,
        layers: def.layers,
        is_plane,
    }
}

/// In-memory static collision world with a broad-phase accelerator.
pub struct StaticWorld {
    colliders: Vec<StaticCollider>,
    accel: WorldAccel,
}

impl StaticWorld {
    /// Build a world from a list of static collider definitions.
    ///
    /// Determinism
    /// - The input is sorted by `id` before insertion.
    /// - Definitions with non-finite poses or non-positive sizes are skipped with a warning.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let colliders: Vec<StaticCollider> = defs
            .iter()
            .filter(|def| {
                let valid = def.translation.iter().all(|v| v.is_finite()) && def.shape.is_valid();
                if !valid {
                    log::warn!("skipping invalid static collider definition {}", def.id);
                }
                valid
            })
            .map(collider_from_def)
            .collect();

        let accel = broad::build_world_accel(&colliders);
        log::debug!(
            "built static world: {} colliders ({} planes)",
            colliders.len(),
            accel.plane_indices.len()
        );

        Self { colliders, accel }
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Candidates for a sweep of `shape` from `iso` along `translation`, filtered by `mask`.
    fn sweep_candidates<'a>(
        &'a self,
        shape: &dyn Shape,
        iso: &Iso,
        translation: Vec3,
        mask: LayerMask,
    ) -> impl Iterator<Item = &'a StaticCollider> + 'a {
        let swept = broad::swept_shape_aabb(shape, iso, translation, 0.0);
        self.filtered(broad::query_candidates(&self.accel, &swept), mask)
    }

    fn filtered<'a>(
        &'a self,
        indices: Vec<usize>,
        mask: LayerMask,
    ) -> impl Iterator<Item = &'a StaticCollider> + 'a {
        indices
            .into_iter()
            .map(move |idx| &self.colliders[idx])
            .filter(move |c| c.layers.intersects(mask))
    }

    fn cast_all(
        &self,
        shape: &dyn Shape,
        iso: &Iso,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit> {
        let Some(dir) = direction.try_normalize(1.0e-6) else {
            return Vec::new();
        };
        if !(max_distance > 0.0) {
            return Vec::new();
        }

        let mut hits: Vec<Hit> = self
            .sweep_candidates(shape, iso, dir * max_distance, mask)
            .filter_map(|c| narrow_phase::cast_shape_against_static(iso, shape, dir, max_distance, c))
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    fn cast_first(
        &self,
        shape: &dyn Shape,
        iso: &Iso,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        let dir = direction.try_normalize(1.0e-6)?;
        if !(max_distance > 0.0) {
            return None;
        }

        self.sweep_candidates(shape, iso, dir * max_distance, mask)
            .fold(None, |best, c| {
                narrow_phase::earliest(
                    best,
                    narrow_phase::cast_shape_against_static(iso, shape, dir, max_distance, c),
                )
            })
    }

    fn overlap(&self, shape: &dyn Shape, iso: &Iso, mask: LayerMask) -> Vec<ColliderId> {
        let aabb = shape.compute_aabb(iso);
        self.filtered(broad::query_candidates(&self.accel, &aabb), mask)
            .filter(|c| narrow_phase::intersects_static(iso, shape, c))
            .map(|c| c.id)
            .collect()
    }
}

fn translation_iso(center: Vec3) -> Iso {
    Iso::from_parts(Translation3::from(center), UnitQuaternion::identity())
}

fn capsule_between(p1: Vec3, p2: Vec3, radius: f32) -> Capsule {
    Capsule::new(na::Point3::from(p1), na::Point3::from(p2), radius)
}

impl ShapeCastService for StaticWorld {
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit> {
        let ball = Ball::new(radius);
        self.cast_all(&ball, &translation_iso(origin), direction, max_distance, mask)
    }

    fn capsule_cast(
        &self,
        p1: Vec3,
        p2: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        // The segment is already in world space.
        let capsule = capsule_between(p1, p2, radius);
        self.cast_first(&capsule, &Iso::identity(), direction, max_distance, mask)
    }

    fn box_cast_all(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit> {
        let cuboid = Cuboid::new(half_extents);
        let iso = Iso::from_parts(Translation3::from(center), orientation);
        self.cast_all(&cuboid, &iso, direction, max_distance, mask)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ColliderId> {
        let ball = Ball::new(radius);
        self.overlap(&ball, &translation_iso(center), mask)
    }

    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        mask: LayerMask,
    ) -> Vec<ColliderId> {
        let cuboid = Cuboid::new(half_extents);
        let iso = Iso::from_parts(Translation3::from(center), orientation);
        self.overlap(&cuboid, &iso, mask)
    }

    fn overlap_capsule(
        &self,
        p1: Vec3,
        p2: Vec3,
        radius: f32,
        mask: LayerMask,
    ) -> Vec<ColliderId> {
        let capsule = capsule_between(p1, p2, radius);
        self.overlap(&capsule, &Iso::identity(), mask)
    }

    fn raycast_with_normal(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        let dir = direction.try_normalize(1.0e-6)?;
        if !(max_distance > 0.0) {
            return None;
        }

        let aabb = broad::ray_aabb(origin, dir, max_distance);
        self.filtered(broad::query_candidates(&self.accel, &aabb), mask)
            .fold(None, |best, c| {
                narrow_phase::earliest(
                    best,
                    narrow_phase::cast_ray_against_static(origin, dir, max_distance, c),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::{CollisionLayer, LayerMask};

    fn ground() -> LayerMask {
        LayerMask::of(&[CollisionLayer::Ground])
    }

    fn wall() -> LayerMask {
        LayerMask::of(&[CollisionLayer::Wall])
    }

    /// Floor plane at y = 0 and a 2m tall, 1m thick wall whose near face is at z = -2.
    fn scene() -> StaticWorld {
        StaticWorld::build(vec![
            WorldStaticDef::new(
                2,
                Vec3::new(0.0, 1.0, -2.5),
                ColliderShapeDef::Cuboid {
                    half_extents: Vec3::new(2.0, 1.0, 0.5),
                },
                wall(),
            ),
            WorldStaticDef::new(
                1,
                Vec3::zeros(),
                ColliderShapeDef::Plane {
                    offset_along_normal: 0.0,
                },
                ground(),
            ),
        ])
    }

    #[test]
    fn build_skips_invalid_definitions() {
        let world = StaticWorld::build(vec![
            WorldStaticDef::new(
                1,
                Vec3::new(f32::NAN, 0.0, 0.0),
                ColliderShapeDef::Sphere { radius: 1.0 },
                ground(),
            ),
            WorldStaticDef::new(2, Vec3::zeros(), ColliderShapeDef::Sphere { radius: 0.0 }, ground()),
            WorldStaticDef::new(3, Vec3::zeros(), ColliderShapeDef::Sphere { radius: 1.0 }, ground()),
        ]);
        assert_eq!(world.len(), 1);
    }

    #[test]
    fn overlap_sphere_respects_layers() {
        let world = scene();
        let center = Vec3::new(0.0, 1.0, -2.0);
        assert_eq!(world.overlap_sphere(center, 0.1, wall()), vec![ColliderId(2)]);
        assert!(world.overlap_sphere(center, 0.1, ground()).is_empty());
        assert!(world.check_sphere(Vec3::new(0.0, 0.1, 0.0), 0.5, ground()));
        assert!(!world.check_sphere(Vec3::new(0.0, 3.0, 0.0), 0.5, LayerMask::everything()));
    }

    #[test]
    fn raycast_reports_face_normal_and_distance() {
        let world = scene();
        let hit = world
            .raycast_with_normal(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 0.0, -1.0), 5.0, wall())
            .expect("wall ahead");
        assert!((hit.distance - 2.0).abs() < 1.0e-4);
        assert!((hit.normal - Vec3::z()).norm() < 1.0e-4);
        assert_eq!(hit.collider, Some(ColliderId(2)));
    }

    #[test]
    fn raycast_misses_when_out_of_range_or_zero_direction() {
        let world = scene();
        let origin = Vec3::new(0.0, 1.0, 0.0);
        assert!(world
            .raycast_with_normal(origin, Vec3::new(0.0, 0.0, -1.0), 1.5, wall())
            .is_none());
        assert!(world
            .raycast_with_normal(origin, Vec3::zeros(), 5.0, wall())
            .is_none());
    }

    #[test]
    fn sphere_cast_all_sorts_hits_by_distance() {
        let world = scene();
        let hits = world.sphere_cast_all(
            Vec3::new(0.0, 3.0, -1.0),
            0.25,
            Vec3::new(0.0, -1.0, 0.0),
            5.0,
            LayerMask::everything(),
        );
        assert!(!hits.is_empty());
        assert!(hits.windows(2).all(|w| w[0].distance <= w[1].distance));
        // The floor is the only thing below this column.
        assert!((hits[0].distance - 2.75).abs() < 1.0e-3);
    }

    #[test]
    fn casts_skip_colliders_touched_at_start() {
        let world = scene();
        // Sphere already sunk into the floor, moving up: nothing to report.
        let hits = world.sphere_cast_all(
            Vec3::new(0.0, 0.1, 3.0),
            0.5,
            Vec3::y(),
            1.0,
            ground(),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn capsule_cast_hits_wall_ahead() {
        let world = scene();
        let hit = world
            .capsule_cast(
                Vec3::new(0.0, 0.6, 0.0),
                Vec3::new(0.0, 1.4, 0.0),
                0.5,
                Vec3::new(0.0, 0.0, -1.0),
                3.0,
                wall(),
            )
            .expect("capsule reaches the wall");
        assert!((hit.distance - 1.5).abs() < 1.0e-3);
    }
}
