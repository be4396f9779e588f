use crate::layers::LayerMask;

use super::{
    service::ShapeCastService,
    settings::{DEFAULT_MAX_ITERATIONS, DEFAULT_SKIN, MIN_MOVE_SQ},
    types::{CapsuleSpec, MoveHit, MoveResult, Vec3},
};

/// Parameters for a single kinematic movement attempt.
///
/// - Movement is expressed as a desired translation for this tick (meters).
/// - Collision is handled by capsule-casting through a [`ShapeCastService`], stopping at
///   contact minus `skin`, and sliding along the contact normal.
/// - The slide step iterates up to `max_iterations` to handle corners.
#[derive(Clone, Copy, Debug)]
pub struct MoveRequest {
    /// Starting world position of the capsule's center.
    pub start_pos: Vec3,
    /// Desired world-space translation for this step.
    pub desired_translation: Vec3,
    /// Capsule shape for the actor.
    pub capsule: CapsuleSpec,
    /// Layers the capsule collides with.
    pub mask: LayerMask,
    /// Separation to keep from surfaces to avoid jitter (meters).
    pub skin: f32,
    /// Max iterations of slide resolution (for corners).
    pub max_iterations: u32,
}

impl MoveRequest {
    #[inline]
    pub fn with_defaults(
        start_pos: Vec3,
        desired_translation: Vec3,
        capsule: CapsuleSpec,
        mask: LayerMask,
    ) -> Self {
        Self {
            start_pos,
            desired_translation,
            capsule,
            mask,
            skin: DEFAULT_SKIN,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Kinematic sweep-and-slide for a Y-aligned capsule.
///
/// Algorithm:
/// - Capsule-cast along the remaining translation.
/// - On hit, move to just before the contact (minus `skin`) and slide along the contact normal.
/// - Iterate to handle corners until `max_iterations` or the remaining motion is negligible.
pub fn move_capsule<S: ShapeCastService + ?Sized>(world: &S, req: MoveRequest) -> MoveResult {
    let mut pos = req.start_pos;
    let mut remaining = req.desired_translation;
    let mut last_hit = None;

    if !pos.iter().all(|v| v.is_finite()) || !remaining.iter().all(|v| v.is_finite()) {
        log::error!("move_capsule called with a non-finite position or translation");
        return MoveResult {
            end_pos: req.start_pos,
            last_hit: None,
        };
    }

    for _ in 0..req.max_iterations {
        // Early out if remaining motion is too small to matter.
        if remaining.norm_squared() <= MIN_MOVE_SQ {
            break;
        }

        let len = remaining.norm();
        let dir = remaining / len;
        // Start the sweep one skin behind the body so resting contacts still register.
        let back = dir * req.skin;
        let (p1, p2) = req.capsule.segment(pos - back);

        match world.capsule_cast(p1, p2, req.capsule.radius, dir, len + req.skin, req.mask) {
            None => {
                // No hit: move fully and finish. Any earlier contact is still reported.
                pos += remaining;
                break;
            }
            Some(hit) => {
                // Travel up to the contact point (minus skin), measured from `pos`.
                let travel = (hit.distance - req.skin).clamp(0.0, len);
                pos += dir * (travel - req.skin).max(0.0);

                // Slide along the hit plane: remove the normal component from the leftover.
                let n = hit.normal.try_normalize(1.0e-6).unwrap_or_else(Vec3::zeros);
                let leftover = dir * (len - travel);
                let slide = leftover - n * leftover.dot(&n);

                remaining = slide;
                last_hit = Some(MoveHit {
                    normal: n,
                    fraction: travel / len,
                });

                // If the slide is negligible, we're done.
                if slide.norm_squared() <= MIN_MOVE_SQ {
                    break;
                }
            }
        }
    }

    MoveResult {
        end_pos: pos,
        last_hit,
    }
}
