//! Fixed-volume ledge detector.
//!
//! A detector owns a box-shaped detection area in front of the character. A ledge is a
//! solid surface found by sweeping a thin box down through the area, with enough open
//! space above it to fit the opening box.

use crate::collision::{ShapeCastService, Transform, Vec3};
use crate::constants::{DEFAULT_MAX_LEDGE_DISTANCE_FROM_DETECTOR, LEDGE_OPENING_CLEARANCE};
use crate::events::EventBus;
use crate::layers::{LayerMask, default_ground_layers};

#[derive(Clone, Debug)]
pub struct LedgeDetectorConfig {
    /// Center of the detection area in the character's local space.
    pub center_offset: Vec3,
    /// Full size of the detection area.
    pub detection_area_size: Vec3,
    /// Full size of the box swept down through the area.
    pub ledge_cast_size: Vec3,
    /// Full size of the open space required above a surface.
    pub min_open_space_size: Vec3,
    /// Detected surfaces farther than this from the area center are ignored.
    pub max_ledge_distance: f32,
    pub layers: LayerMask,
}

impl LedgeDetectorConfig {
    pub fn at(center_offset: Vec3, detection_area_size: Vec3) -> Self {
        Self {
            center_offset,
            detection_area_size,
            ledge_cast_size: Vec3::new(0.2, 0.05, 0.2),
            min_open_space_size: Vec3::new(0.4, 0.6, 0.4),
            max_ledge_distance: DEFAULT_MAX_LEDGE_DISTANCE_FROM_DETECTOR,
            layers: default_ground_layers(),
        }
    }
}

pub struct LedgeDetector {
    config: LedgeDetectorConfig,
    /// Receives the opening position of every successful detection.
    pub on_ledge_detected: EventBus<Vec3>,
}

impl LedgeDetector {
    pub fn new(config: LedgeDetectorConfig) -> Self {
        Self {
            config,
            on_ledge_detected: EventBus::new(),
        }
    }

    pub fn config(&self) -> &LedgeDetectorConfig {
        &self.config
    }

    pub fn update_cast_settings(
        &mut self,
        detection_area_size: Vec3,
        ledge_cast_size: Vec3,
        min_open_space_size: Vec3,
    ) {
        self.config.detection_area_size = detection_area_size;
        self.config.ledge_cast_size = ledge_cast_size;
        self.config.min_open_space_size = min_open_space_size;
    }

    /// World-space center of the detection area.
    pub fn position(&self, frame: &Transform) -> Vec3 {
        frame.transform_point(self.config.center_offset)
    }

    pub fn max_ledge_distance(&self) -> f32 {
        self.config.max_ledge_distance
    }

    /// Is anything inside the detection area?
    pub fn is_obstruction_detected<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
        frame: &Transform,
    ) -> bool {
        world.check_box(
            self.position(frame),
            self.config.detection_area_size / 2.0,
            frame.rotation,
            self.config.layers,
        )
    }

    /// Look for a ledge inside the detection area.
    ///
    /// Returns the center of the free opening above the surface and emits it on
    /// `on_ledge_detected`. A miss is silent.
    pub fn detect_ledge<S: ShapeCastService + ?Sized>(
        &mut self,
        world: &S,
        frame: &Transform,
    ) -> Option<Vec3> {
        let cfg = &self.config;
        let center = self.position(frame);
        let up = frame.up();

        let cast_start = center + up * (cfg.detection_area_size.y / 2.0 - cfg.ledge_cast_size.y / 2.0);
        let cast_distance = cfg.detection_area_size.y - cfg.ledge_cast_size.y;

        let hits = world.box_cast_all(
            cast_start,
            cfg.ledge_cast_size / 2.0,
            frame.rotation,
            -up,
            cast_distance,
            cfg.layers,
        );

        // Only the first hit seeds the opening test.
        let surface = hits.first()?.point;
        if (surface - center).norm() > cfg.max_ledge_distance {
            log::trace!("ignoring ledge surface too far from detector at {center:?}");
            return None;
        }

        let opening = surface + up * (cfg.min_open_space_size.y / 2.0 + LEDGE_OPENING_CLEARANCE);
        let blocked = world.check_box(
            opening,
            cfg.min_open_space_size / 2.0,
            frame.rotation,
            cfg.layers,
        );
        if blocked {
            return None;
        }

        self.on_ledge_detected.emit(&opening);
        Some(opening)
    }
}
