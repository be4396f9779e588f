//! Forward wall analysis and ledge scanning.
//!
//! Every update sweeps a column of small spheres forward, from the character's maximum
//! reach down to a lower bound. Wall points with open space above and behind them are
//! ledge candidates. The controller picks the candidate closest to the wall cast origin.
//!
//! All reference offsets in [`WallClimberConfig`] are expressed in the character's local
//! space (feet at the origin, forward `-Z`).

use crate::collision::{ShapeCastService, Transform, Vec3, up};
use crate::constants::{
    DEFAULT_MAX_DEBUG_MARKERS, DEFAULT_ONTO_LEDGE_SPACING, DEFAULT_VERTICAL_CAST_STEP,
    DEFAULT_VERTICAL_LEDGE_SPACING, HORIZONTAL_SCAN_SAMPLES,
};
use crate::layers::{LayerMask, default_wall_layers};
use crate::ledge::{GeometryError, LedgeCutoffs, LedgePoint, LedgeType};
use crate::math::{closest_point, is_valid_point, push_unique};

/// How far behind a ledge point the face-normal ray starts (meters).
const FACE_PROBE_BACKOFF: f32 = 0.1;

/// How far below a ledge point the face-normal ray runs, so rays aimed at a corner
/// still meet the face (meters).
const FACE_PROBE_DROP: f32 = 0.02;

/// Upper bound on forward casts per scan. Finer steps are widened to fit.
const MAX_VERTICAL_CASTS: usize = 256;

#[derive(Clone, Debug)]
pub struct WallClimberConfig {
    pub enabled: bool,
    pub layers: LayerMask,
    /// Reference point for picking the closest wall hit.
    pub wall_cast_origin: Vec3,
    /// Highest point the character can grab; the forward scan starts here.
    pub max_ledge_reach_origin: Vec3,
    pub top_capsule_origin: Vec3,
    pub bottom_capsule_origin: Vec3,
    /// The forward scan stops once it passes below this point.
    pub lowest_wall_detection_bound: Vec3,
    pub capsule_radius: f32,
    /// Radius of the stepped forward sphere casts.
    pub wall_cast_radius: f32,
    pub forward_wall_cast_distance: f32,
    pub vertical_cast_step: f32,
    /// Space required above a wall point.
    pub vertical_ledge_spacing: f32,
    /// Space required past a wall point, onto the ledge.
    pub onto_ledge_spacing: f32,
    /// Radius of the open-space probe placed above and past a wall point.
    pub open_space_radius: f32,
    /// Radius of the probes used by lateral ledge scans.
    pub scan_radius: f32,
    pub low_ledge_cutoff: f32,
    pub high_ledge_cutoff: f32,
    pub show_debug: bool,
    pub max_markers: usize,
}

impl Default for WallClimberConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layers: default_wall_layers(),
            wall_cast_origin: Vec3::new(0.0, 1.5, 0.0),
            max_ledge_reach_origin: Vec3::new(0.0, 2.2, 0.0),
            top_capsule_origin: Vec3::new(0.0, 1.36, 0.0),
            bottom_capsule_origin: Vec3::new(0.0, 0.55, 0.0),
            lowest_wall_detection_bound: Vec3::new(0.0, 0.4, 0.0),
            capsule_radius: 0.5,
            wall_cast_radius: 0.25,
            forward_wall_cast_distance: 1.0,
            vertical_cast_step: DEFAULT_VERTICAL_CAST_STEP,
            vertical_ledge_spacing: DEFAULT_VERTICAL_LEDGE_SPACING,
            onto_ledge_spacing: DEFAULT_ONTO_LEDGE_SPACING,
            open_space_radius: 0.05,
            scan_radius: 0.1,
            low_ledge_cutoff: 0.9,
            high_ledge_cutoff: 1.6,
            show_debug: false,
            max_markers: DEFAULT_MAX_DEBUG_MARKERS,
        }
    }
}

/// Debug visualization state. Never read by the simulation.
#[derive(Clone, Debug, Default)]
pub struct DebugMarkers {
    /// Valid wall hits from the last scan, at most `max_markers`.
    pub wall_hits: Vec<Vec3>,
    /// Where the body would stand on the last standable wall hit.
    pub standable_preview: Option<Vec3>,
}

pub struct WallClimber {
    config: WallClimberConfig,
    cutoffs: LedgeCutoffs,
    ledge_points: Vec<LedgePoint>,
    markers: DebugMarkers,
}

impl WallClimber {
    pub fn new(config: WallClimberConfig) -> Self {
        let cutoffs = LedgeCutoffs {
            low: config.low_ledge_cutoff,
            high: config.high_ledge_cutoff,
        };
        Self {
            config,
            cutoffs,
            ledge_points: Vec::new(),
            markers: DebugMarkers::default(),
        }
    }

    pub fn config(&self) -> &WallClimberConfig {
        &self.config
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        if !enabled {
            self.ledge_points.clear();
        }
    }

    /// Rebuild the ledge candidates for this frame.
    pub fn update<S: ShapeCastService + ?Sized>(&mut self, world: &S, frame: &Transform) {
        self.ledge_points.clear();
        if self.config.show_debug {
            self.markers.wall_hits.clear();
            self.markers.standable_preview = None;
        }

        if !self.config.enabled {
            return;
        }

        if self.is_obstacle_detected(world, frame) {
            self.analyze_forward_obstacle(world, frame);
        }
    }

    /// Cheap gate: does the body, stretched up to max reach, hit anything ahead?
    pub fn is_obstacle_detected<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        frame: &Transform,
    ) -> bool {
        let cfg = &self.config;
        world
            .capsule_cast(
                frame.transform_point(cfg.max_ledge_reach_origin),
                frame.transform_point(cfg.bottom_capsule_origin),
                cfg.capsule_radius,
                frame.forward(),
                cfg.forward_wall_cast_distance,
                cfg.layers,
            )
            .is_some()
    }

    fn analyze_forward_obstacle<S: ShapeCastService + ?Sized>(
        &mut self,
        world: &S,
        frame: &Transform,
    ) {
        let cfg = &self.config;
        let forward = frame.forward();
        let wall_origin = frame.transform_point(cfg.wall_cast_origin);
        let top = frame.transform_point(cfg.max_ledge_reach_origin);
        let lowest_y = frame.transform_point(cfg.lowest_wall_detection_bound).y;

        if !(cfg.vertical_cast_step > 0.0) {
            log::error!("wall scan needs a positive vertical cast step");
            return;
        }

        let span = top.y - lowest_y;
        let step = cfg.vertical_cast_step.max(span / MAX_VERTICAL_CASTS as f32);
        if step > cfg.vertical_cast_step {
            log::warn!(
                "vertical cast step {} too fine, scanning every {step:.4}m",
                cfg.vertical_cast_step
            );
        }
        let cast_count = if span > 0.0 {
            ((span / step).ceil() as usize).min(MAX_VERTICAL_CASTS)
        } else {
            0
        };

        let mut candidates: Vec<Vec3> = Vec::new();
        let mut marker_pool_exhausted = false;

        for i in 0..cast_count {
            let mut cast_origin = top;
            cast_origin.y = top.y - i as f32 * step;
            let hits: Vec<Vec3> = world
                .sphere_cast_all(
                    cast_origin,
                    cfg.wall_cast_radius,
                    forward,
                    cfg.forward_wall_cast_distance,
                    cfg.layers,
                )
                .into_iter()
                .map(|hit| hit.point)
                .collect();

            if let Some(point) = closest_point(&wall_origin, &hits)
                && point.y >= lowest_y
                && point.y <= top.y
            {
                if cfg.show_debug {
                    if self.markers.wall_hits.len() < cfg.max_markers {
                        self.markers.wall_hits.push(point);
                    } else if !marker_pool_exhausted {
                        marker_pool_exhausted = true;
                        log::warn!("wall climber debug markers exhausted ({})", cfg.max_markers);
                    }
                    if self.is_point_standable(world, frame, &point) {
                        let half_body = (cfg.top_capsule_origin.y - cfg.bottom_capsule_origin.y)
                            / 2.0
                            + cfg.capsule_radius;
                        self.markers.standable_preview =
                            Some(self.standing_point(frame, &point) + up() * half_body);
                    }
                }

                if self.is_wall_point_ledgeable(world, &point, &forward) {
                    push_unique(&mut candidates, point);
                }
            }
        }

        self.ledge_points = candidates
            .into_iter()
            .map(|position| LedgePoint {
                position,
                ledge_type: self.determine_ledge_type(frame, &position),
            })
            .collect();

        log::trace!("wall scan found {} ledge points", self.ledge_points.len());
    }

    /// Is there open space above `point` and past it along `forward`?
    pub fn is_wall_point_ledgeable<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        point: &Vec3,
        forward: &Vec3,
    ) -> bool {
        let cfg = &self.config;
        let probe = point + up() * cfg.vertical_ledge_spacing + forward * cfg.onto_ledge_spacing;
        !world.check_sphere(probe, cfg.open_space_radius, cfg.layers)
    }

    pub fn try_determine_ledge_type(
        &self,
        frame: &Transform,
        point: &Vec3,
    ) -> Result<LedgeType, GeometryError> {
        self.cutoffs.classify(frame, point)
    }

    /// Classify `point` against the low/high cutoffs. Invalid points log an error and
    /// come back as [`LedgeType::Unset`].
    pub fn determine_ledge_type(&self, frame: &Transform, point: &Vec3) -> LedgeType {
        match self.try_determine_ledge_type(frame, point) {
            Ok(ledge_type) => ledge_type,
            Err(err) => {
                log::error!("cannot classify ledge at {point:?}: {err}");
                LedgeType::Unset
            }
        }
    }

    /// Where the feet end up when climbing onto the ledge at `point`.
    pub fn standing_point(&self, frame: &Transform, point: &Vec3) -> Vec3 {
        point
            + up() * self.config.vertical_ledge_spacing
            + frame.forward() * self.config.onto_ledge_spacing
    }

    /// Would the body fit standing on the ledge at `point`?
    pub fn is_point_standable<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        frame: &Transform,
        point: &Vec3,
    ) -> bool {
        if !is_valid_point(point) {
            log::error!("cannot test standability of invalid point {point:?}");
            return false;
        }

        let cfg = &self.config;
        let base = self.standing_point(frame, point);
        let body_span = cfg.top_capsule_origin.y - cfg.bottom_capsule_origin.y;
        let feet = base + up() * cfg.capsule_radius;
        let head = base + up() * (body_span + cfg.capsule_radius);
        !world.check_capsule(feet, head, cfg.capsule_radius, cfg.layers)
    }

    /// Surface normal of the wall face behind `point`, probing along `cast_direction`.
    pub fn get_face_normal<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        point: &Vec3,
        cast_direction: &Vec3,
    ) -> Option<Vec3> {
        if !is_valid_point(point) {
            return None;
        }
        let dir = cast_direction.try_normalize(1.0e-6)?;
        let origin = point - dir * FACE_PROBE_BACKOFF - up() * FACE_PROBE_DROP;
        world
            .raycast_with_normal(origin, dir, FACE_PROBE_BACKOFF * 2.0, self.config.layers)
            .map(|hit| hit.normal)
    }

    /// Move a ledge point seen from above onto the wall face in front of `frame`.
    ///
    /// Casts forward from the body at the point's height. Returns the face corner at that
    /// height together with the face normal.
    pub fn project_onto_face<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        frame: &Transform,
        point: &Vec3,
    ) -> Option<(Vec3, Vec3)> {
        if !is_valid_point(point) {
            return None;
        }
        let forward = frame.forward();
        let offset = point - frame.translation;
        let origin = frame.translation + up() * (offset.dot(&up()) - FACE_PROBE_DROP);
        let reach = offset.dot(&forward).max(0.0) + FACE_PROBE_BACKOFF;

        let hit = world.raycast_with_normal(origin, forward, reach, self.config.layers)?;
        Some((hit.point + up() * FACE_PROBE_DROP, hit.normal))
    }

    /// Sample `num_casts` points evenly between `start` and `end` and keep the ledgeable
    /// wall points found there.
    pub fn scan_for_ledge_points_along_line<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        start: &Vec3,
        end: &Vec3,
        forward: &Vec3,
        num_casts: usize,
    ) -> Vec<Vec3> {
        let mut found = Vec::new();
        if !is_valid_point(start) || !is_valid_point(end) || !is_valid_point(forward) {
            return found;
        }
        let Some(forward) = forward.try_normalize(1.0e-6) else {
            return found;
        };

        let cfg = &self.config;
        for i in 0..num_casts {
            let t = if num_casts > 1 {
                i as f32 / (num_casts - 1) as f32
            } else {
                0.0
            };
            let sample = start.lerp(end, t);

            let candidate = if world.check_sphere(sample, cfg.scan_radius, cfg.layers) {
                Some(sample)
            } else {
                world
                    .sphere_cast_all(
                        sample,
                        cfg.scan_radius,
                        forward,
                        cfg.forward_wall_cast_distance,
                        cfg.layers,
                    )
                    .first()
                    .map(|hit| hit.point)
            };

            if let Some(point) = candidate
                && self.is_wall_point_ledgeable(world, &point, &forward)
            {
                push_unique(&mut found, point);
            }
        }
        found
    }

    /// Can the body move `cast_distance` along `direction`, with ledge points to hold on to?
    ///
    /// Returns the ledge points found along the way, or `None` when the body is blocked
    /// or no ledge continues in that direction.
    pub fn is_horizontal_climbing_available<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        frame: &Transform,
        direction: &Vec3,
        cast_distance: f32,
        forward: &Vec3,
        origin: &Vec3,
    ) -> Option<Vec<Vec3>> {
        let cfg = &self.config;
        let dir = direction.try_normalize(1.0e-6)?;

        let blocked = world
            .capsule_cast(
                frame.transform_point(cfg.bottom_capsule_origin),
                frame.transform_point(cfg.top_capsule_origin),
                cfg.capsule_radius,
                dir,
                cast_distance,
                cfg.layers,
            )
            .is_some();
        if blocked {
            log::trace!("horizontal climb blocked along {dir:?}");
            return None;
        }

        let end = origin + dir * cast_distance;
        let points =
            self.scan_for_ledge_points_along_line(world, origin, &end, forward, HORIZONTAL_SCAN_SAMPLES);
        (!points.is_empty()).then_some(points)
    }

    pub fn is_ledge_available(&self) -> bool {
        !self.ledge_points.is_empty()
    }

    pub fn ledge_points(&self) -> &[LedgePoint] {
        &self.ledge_points
    }

    /// Candidate closest to the wall cast origin.
    pub fn closest_ledge_point(&self, frame: &Transform) -> Option<LedgePoint> {
        let origin = frame.transform_point(self.config.wall_cast_origin);
        self.ledge_points.iter().copied().fold(None, |best, p| match best {
            Some(b) if (b.position - origin).norm_squared()
                <= (p.position - origin).norm_squared() =>
            {
                Some(b)
            }
            _ => Some(p),
        })
    }

    /// Body capsule segment in world space.
    pub fn body_segment(&self, frame: &Transform) -> (Vec3, Vec3) {
        (
            frame.transform_point(self.config.bottom_capsule_origin),
            frame.transform_point(self.config.top_capsule_origin),
        )
    }

    pub fn debug_markers(&self) -> &DebugMarkers {
        &self.markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{ColliderShapeDef, StaticWorld, WorldStaticDef};
    use crate::layers::CollisionLayer;
    use crate::testing::{ScriptedWorld, floor_and_wall, floor_def, player_frame, wall_def};

    fn climber() -> WallClimber {
        WallClimber::new(WallClimberConfig::default())
    }

    fn closest_after_update(world: &StaticWorld) -> Option<LedgePoint> {
        let frame = player_frame();
        let mut wc = climber();
        wc.update(world, &frame);
        wc.closest_ledge_point(&frame)
    }

    #[test]
    fn detects_obstacle_only_when_wall_is_ahead() {
        let frame = player_frame();
        let wc = climber();
        assert!(wc.is_obstacle_detected(&floor_and_wall(1.2, 0.8), &frame));
        assert!(!wc.is_obstacle_detected(&floor_and_wall(1.2, 3.0), &frame));
    }

    #[test]
    fn classifies_wall_tops_by_height() {
        let mid = closest_after_update(&floor_and_wall(1.2, 0.8)).expect("mid ledge");
        assert_eq!(mid.ledge_type, LedgeType::Mid);
        assert!((mid.position.y - 1.2).abs() < 0.06);
        assert!((mid.position.z + 0.8).abs() < 1.0e-3);

        let high = closest_after_update(&floor_and_wall(1.8, 0.8)).expect("high ledge");
        assert_eq!(high.ledge_type, LedgeType::High);

        let low = closest_after_update(&floor_and_wall(0.7, 0.8)).expect("low ledge");
        assert_eq!(low.ledge_type, LedgeType::Low);
    }

    #[test]
    fn wall_taller_than_reach_has_no_ledge() {
        let frame = player_frame();
        let mut wc = climber();
        wc.update(&floor_and_wall(4.0, 0.8), &frame);
        assert!(!wc.is_ledge_available());
        assert!(wc.closest_ledge_point(&frame).is_none());
    }

    #[test]
    fn disabled_climber_finds_nothing() {
        let frame = player_frame();
        let mut wc = climber();
        wc.set_enabled(false);
        wc.update(&floor_and_wall(1.2, 0.8), &frame);
        assert!(!wc.is_ledge_available());
    }

    #[test]
    fn ledge_type_is_stable_and_rejects_invalid_points() {
        let frame = player_frame();
        let wc = climber();
        let p = Vec3::new(0.0, 1.2, -0.8);
        assert_eq!(wc.determine_ledge_type(&frame, &p), wc.determine_ledge_type(&frame, &p));

        let bad = Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY);
        assert_eq!(wc.determine_ledge_type(&frame, &bad), LedgeType::Unset);
        assert_eq!(
            wc.try_determine_ledge_type(&frame, &bad),
            Err(GeometryError::InvalidPoint)
        );
    }

    #[test]
    fn tiny_cast_step_still_finishes_the_scan() {
        let frame = player_frame();
        let mut wc = WallClimber::new(WallClimberConfig {
            vertical_cast_step: 1.0e-8,
            ..Default::default()
        });
        wc.update(&floor_and_wall(1.2, 0.8), &frame);
        let mid = wc.closest_ledge_point(&frame).expect("mid ledge");
        assert_eq!(mid.ledge_type, LedgeType::Mid);
        assert!((mid.position.y - 1.2).abs() < 0.06);
    }

    #[test]
    fn points_on_the_wall_top_project_onto_the_near_face() {
        let world = floor_and_wall(1.2, 0.5);
        let wc = climber();
        let top = Vec3::new(0.0, 1.2, -0.75);

        // Straight down the face from inside the wall finds nothing.
        assert!(wc
            .get_face_normal(&world, &top, &Vec3::new(0.0, 0.0, -1.0))
            .is_none());

        let (corner, normal) = wc
            .project_onto_face(&world, &player_frame(), &top)
            .expect("face");
        assert!((corner - Vec3::new(0.0, 1.2, -0.5)).norm() < 1.0e-4);
        assert!((normal - Vec3::z()).norm() < 1.0e-4);

        // Nothing in front of the body at that height.
        assert!(wc
            .project_onto_face(&world, &player_frame(), &Vec3::new(0.0, 3.0, -0.75))
            .is_none());
    }

    #[test]
    fn face_normal_points_back_at_the_climber() {
        let world = floor_and_wall(1.2, 0.8);
        let wc = climber();
        let corner = Vec3::new(0.0, 1.2, -0.8);
        let n = wc
            .get_face_normal(&world, &corner, &Vec3::new(0.0, 0.0, -1.0))
            .expect("face");
        assert!((n - Vec3::z()).norm() < 1.0e-4);

        // Nothing behind a point floating in the air.
        assert!(wc
            .get_face_normal(&world, &Vec3::new(0.0, 3.0, 0.0), &Vec3::new(0.0, 0.0, -1.0))
            .is_none());
        assert!(wc
            .get_face_normal(&world, &Vec3::new(f32::NAN, 0.0, 0.0), &Vec3::new(0.0, 0.0, -1.0))
            .is_none());
    }

    #[test]
    fn standability_needs_headroom() {
        let frame = player_frame();
        let wc = climber();
        let corner = Vec3::new(0.0, 1.2, -0.8);
        assert!(wc.is_point_standable(&floor_and_wall(1.2, 0.8), &frame, &corner));

        let ceiling = StaticWorld::build(vec![
            floor_def(1),
            wall_def(2, 1.2, 0.8),
            WorldStaticDef::new(
                3,
                Vec3::new(0.0, 2.1, -1.3),
                ColliderShapeDef::Cuboid {
                    half_extents: Vec3::new(3.0, 0.1, 0.5),
                },
                LayerMask::of(&[CollisionLayer::Wall]),
            ),
        ]);
        assert!(!wc.is_point_standable(&ceiling, &frame, &corner));
        assert!(!wc.is_point_standable(&ceiling, &frame, &Vec3::new(f32::NAN, 0.0, 0.0)));
    }

    #[test]
    fn line_scan_stops_where_the_wall_ends() {
        let world = floor_and_wall(1.2, 0.8);
        let wc = climber();
        let fwd = Vec3::new(0.0, 0.0, -1.0);

        let along = wc.scan_for_ledge_points_along_line(
            &world,
            &Vec3::new(-1.0, 1.2, -0.8),
            &Vec3::new(1.0, 1.2, -0.8),
            &fwd,
            5,
        );
        assert_eq!(along.len(), 5);

        let past_end = wc.scan_for_ledge_points_along_line(
            &world,
            &Vec3::new(2.5, 1.2, -0.8),
            &Vec3::new(4.5, 1.2, -0.8),
            &fwd,
            3,
        );
        assert_eq!(past_end.len(), 1);

        let invalid = wc.scan_for_ledge_points_along_line(
            &world,
            &Vec3::new(f32::NEG_INFINITY, 0.0, 0.0),
            &Vec3::new(1.0, 1.2, -0.8),
            &fwd,
            3,
        );
        assert!(invalid.is_empty());
    }

    #[test]
    fn blocked_body_cancels_horizontal_climb() {
        let world = ScriptedWorld::new(floor_and_wall(2.0, 1.0));
        let frame = player_frame();
        let wc = climber();
        let corner = Vec3::new(0.0, 2.0, -1.0);
        let fwd = Vec3::new(0.0, 0.0, -1.0);

        // The ledge continues to the right, so an unblocked body finds points.
        let free = wc.is_horizontal_climbing_available(&world, &frame, &Vec3::x(), 1.0, &fwd, &corner);
        assert_eq!(free.map(|p| p.len()), Some(3));

        world.block_capsule_casts.set(true);
        let blocked =
            wc.is_horizontal_climbing_available(&world, &frame, &Vec3::x(), 1.0, &fwd, &corner);
        assert!(blocked.is_none());
    }
}
