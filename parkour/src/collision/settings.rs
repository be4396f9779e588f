/*!
Collision tolerances used by the static world backend and the kinematic mover.

Notes
- Distances are in meters, time in seconds.
- Favor practical world-space tolerances over machine epsilon for robust behavior.
*/

/// Separation from surfaces kept when sliding the character body (meters).
/// Too large creates visible gaps; too small risks jitter on contact.
pub const DEFAULT_SKIN: f32 = 0.02;

/// Maximum number of slide iterations per kinematic step.
/// Higher values help with tight corners at the cost of more queries.
pub const DEFAULT_MAX_ITERATIONS: u32 = 4;

/// Minimum squared movement threshold to consider a step meaningful (m^2).
/// Movements below this are treated as zero to avoid tiny oscillations.
pub const MIN_MOVE_SQ: f32 = 1.0e-8;

/// Practical small distance for comparisons (meters).
/// Use for dot-product guards, equality checks in world space, etc.
pub const DIST_EPS: f32 = 1.0e-5;

/// Casts that start already touching a collider report a time of impact at or below
/// this fraction; those contacts are dropped so only colliders met during the sweep
/// are reported.
pub const INITIAL_CONTACT_TOI: f32 = 1.0e-6;
