/*!
Collision root module.

Everything the parkour components know about geometry goes through the
[`ShapeCastService`] trait. The rest of this module is a parry3d-backed static world
implementing it, plus the kinematic mover used by the controller:

- types:        shared data types (Transform, Hit, CapsuleSpec, etc.)
- settings:     tolerance constants
- service:      the shape query contract
- broad:        broad-phase helpers (BVH, swept AABBs, candidate queries)
- narrow_phase: thin wrappers over parry3d queries (shape casts, intersections, rays)
- world:        static world built from collider definitions
- kinematic:    sweep-and-slide capsule mover
*/

pub mod broad;
pub mod kinematic;
pub mod narrow_phase;
pub mod service;
pub mod settings;
pub mod types;
pub mod world;

// Re-export commonly used types and functions.
pub use kinematic::{MoveRequest, move_capsule};
pub use service::ShapeCastService;
pub use types::{
    CapsuleSpec, ColliderId, Hit, Iso, MoveHit, MoveResult, Quat, Transform, Vec2, Vec3, up,
};
pub use world::{ColliderShapeDef, StaticCollider, StaticWorld, WorldStaticDef};
