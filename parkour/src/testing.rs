//! Scene builders and a scripted world shared by unit tests.

use std::cell::Cell;

use crate::collision::{
    ColliderId, ColliderShapeDef, Hit, Quat, ShapeCastService, StaticWorld, Transform, Vec3,
    WorldStaticDef,
};
use crate::layers::{CollisionLayer, LayerMask};

/// Infinite floor at y = 0.
pub fn floor_def(id: u32) -> WorldStaticDef {
    WorldStaticDef::new(
        id,
        Vec3::zeros(),
        ColliderShapeDef::Plane {
            offset_along_normal: 0.0,
        },
        LayerMask::of(&[CollisionLayer::Ground]),
    )
}

/// 6m wide, 1m thick wall from the floor up to `height`, near face at `z = -near`.
pub fn wall_def(id: u32, height: f32, near: f32) -> WorldStaticDef {
    WorldStaticDef::new(
        id,
        Vec3::new(0.0, height / 2.0, -near - 0.5),
        ColliderShapeDef::Cuboid {
            half_extents: Vec3::new(3.0, height / 2.0, 0.5),
        },
        LayerMask::of(&[CollisionLayer::Wall]),
    )
}

pub fn floor_and_wall(height: f32, near: f32) -> StaticWorld {
    StaticWorld::build(vec![floor_def(1), wall_def(2, height, near)])
}

/// Character standing at the origin, facing -Z.
pub fn player_frame() -> Transform {
    Transform::default()
}

/// A real static world with a switch that makes every capsule cast report a blocking hit.
pub struct ScriptedWorld {
    pub inner: StaticWorld,
    pub block_capsule_casts: Cell<bool>,
    pub capsule_casts: Cell<u32>,
}

impl ScriptedWorld {
    pub fn new(inner: StaticWorld) -> Self {
        Self {
            inner,
            block_capsule_casts: Cell::new(false),
            capsule_casts: Cell::new(0),
        }
    }
}

impl ShapeCastService for ScriptedWorld {
    fn sphere_cast_all(
        &self,
        origin: Vec3,
        radius: f32,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Vec<Hit> {
        self.inner
            .sphere_cast_all(origin, radius, direction, max_distance, mask)
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
        self.capsule_casts.set(self.capsule_casts.get() + 1);
        if self.block_capsule_casts.get() {
            return Some(Hit {
                point: p1,
                normal: -direction,
                distance: 0.01,
                collider: None,
            });
        }
        self.inner
            .capsule_cast(p1, p2, radius, direction, max_distance, mask)
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
        self.inner
            .box_cast_all(center, half_extents, orientation, direction, max_distance, mask)
    }

    fn overlap_sphere(&self, center: Vec3, radius: f32, mask: LayerMask) -> Vec<ColliderId> {
        self.inner.overlap_sphere(center, radius, mask)
    }

    fn overlap_box(
        &self,
        center: Vec3,
        half_extents: Vec3,
        orientation: Quat,
        mask: LayerMask,
    ) -> Vec<ColliderId> {
        self.inner.overlap_box(center, half_extents, orientation, mask)
    }

    fn overlap_capsule(
        &self,
        p1: Vec3,
        p2: Vec3,
        radius: f32,
        mask: LayerMask,
    ) -> Vec<ColliderId> {
        self.inner.overlap_capsule(p1, p2, radius, mask)
    }

    fn raycast_with_normal(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<Hit> {
        self.inner
            .raycast_with_normal(origin, direction, max_distance, mask)
    }
}
