use rapier3d::na;
use rapier3d::parry::{
    query::{self, Ray, RayCast as _, ShapeCastOptions},
    shape::Shape,
};

use super::{
    settings::INITIAL_CONTACT_TOI,
    types::{Hit, Iso, Vec3},
    world::StaticCollider,
};

/// Sweep `shape` from `shape_iso` along the unit `direction` for `max_distance` against a
/// single static collider and return the contact, if any.
///
/// Contacts that already exist at the start pose are dropped.
pub fn cast_shape_against_static(
    shape_iso: &Iso,
    shape: &dyn Shape,
    direction: Vec3,
    max_distance: f32,
    collider: &StaticCollider,
) -> Option<Hit> {
    let vel = direction * max_distance;

    let mut opts = ShapeCastOptions::with_max_time_of_impact(1.0);
    opts.stop_at_penetration = true;

    let hit = match query::cast_shapes(
        shape_iso,
        &vel,
        shape,
        &collider.iso,
        &na::Vector3::zeros(),
        &*collider.shape,
        opts,
    ) {
        Ok(Some(hit)) => hit,
        Ok(None) => return None,
        Err(_) => {
            log::warn!("unsupported shape pair in cast against collider {:?}", collider.id);
            return None;
        }
    };

    if hit.time_of_impact <= INITIAL_CONTACT_TOI {
        return None;
    }

    // Witness and normal on the static collider are expressed in its local space.
    let point = collider.iso * hit.witness2;
    let normal = collider.iso.rotation * hit.normal2.into_inner();

    Some(Hit {
        point: point.coords,
        normal,
        distance: hit.time_of_impact * max_distance,
        collider: Some(collider.id),
    })
}

/// Does `shape` at `shape_iso` overlap the static collider?
pub fn intersects_static(shape_iso: &Iso, shape: &dyn Shape, collider: &StaticCollider) -> bool {
    match query::intersection_test(shape_iso, shape, &collider.iso, &*collider.shape) {
        Ok(hit) => hit,
        Err(_) => {
            log::warn!(
                "unsupported shape pair in overlap against collider {:?}",
                collider.id
            );
            false
        }
    }
}

/// Cast a ray against a single static collider, returning the hit with its world normal.
///
/// Rays starting inside a collider do not report it.
pub fn cast_ray_against_static(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    collider: &StaticCollider,
) -> Option<Hit> {
    let ray = Ray::new(na::Point3::from(origin), direction);
    let hit = collider
        .shape
        .cast_ray_and_get_normal(&collider.iso, &ray, max_distance, true)?;

    if hit.time_of_impact <= INITIAL_CONTACT_TOI {
        return None;
    }

    Some(Hit {
        point: origin + direction * hit.time_of_impact,
        normal: hit.normal,
        distance: hit.time_of_impact,
        collider: Some(collider.id),
    })
}

/// Keep the earliest of two optional hits.
#[inline]
pub fn earliest(best: Option<Hit>, candidate: Option<Hit>) -> Option<Hit> {
    match (best, candidate) {
        (Some(b), Some(c)) if c.distance < b.distance => Some(c),
        (None, c) => c,
        (b, _) => b,
    }
}
