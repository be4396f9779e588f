//! Arbitration between the high, mid and low ledge detectors.

use crate::collision::{ShapeCastService, Transform, Vec3};
use crate::constants::LEDGE_OPENING_CLEARANCE;
use crate::events::{EventBus, LedgeDetection};
use crate::ledge::LedgeType;
use crate::ledge_detector::{LedgeDetector, LedgeDetectorConfig};

/// Cast sizes shared by every tier, plus each tier's own area.
#[derive(Clone, Debug)]
pub struct LedgeDetectionConfig {
    pub ledge_cast_size: Vec3,
    pub valid_opening_size: Vec3,
    pub high: LedgeDetectorConfig,
    pub mid: LedgeDetectorConfig,
    pub low: LedgeDetectorConfig,
    /// Scan on construction?
    pub active: bool,
}

impl Default for LedgeDetectionConfig {
    fn default() -> Self {
        let area = Vec3::new(0.5, 0.6, 0.5);
        Self {
            ledge_cast_size: Vec3::new(0.2, 0.05, 0.2),
            valid_opening_size: Vec3::new(0.4, 0.6, 0.4),
            high: LedgeDetectorConfig::at(Vec3::new(0.0, 1.9, -0.7), area),
            mid: LedgeDetectorConfig::at(Vec3::new(0.0, 1.3, -0.7), area),
            low: LedgeDetectorConfig::at(Vec3::new(0.0, 0.7, -0.7), area),
            active: false,
        }
    }
}

pub struct LedgeDetectionManager {
    ledge_cast_size: Vec3,
    valid_opening_size: Vec3,
    high: LedgeDetector,
    mid: LedgeDetector,
    low: LedgeDetector,
    active: bool,
    pub on_ledge_detected: EventBus<LedgeDetection>,
}

impl LedgeDetectionManager {
    pub fn new(config: LedgeDetectionConfig) -> Self {
        let mut manager = Self {
            ledge_cast_size: config.ledge_cast_size,
            valid_opening_size: config.valid_opening_size,
            high: LedgeDetector::new(config.high),
            mid: LedgeDetector::new(config.mid),
            low: LedgeDetector::new(config.low),
            active: config.active,
            on_ledge_detected: EventBus::new(),
        };
        manager.update_detectors();
        manager
    }

    pub fn activate_detection(&mut self, enabled: bool) {
        if self.active != enabled {
            log::debug!("ledge detection active: {enabled}");
        }
        self.active = enabled;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Change the shared cast sizes. They reach the detectors on the next update.
    pub fn set_cast_sizes(&mut self, ledge_cast_size: Vec3, valid_opening_size: Vec3) {
        self.ledge_cast_size = ledge_cast_size;
        self.valid_opening_size = valid_opening_size;
    }

    /// Push the shared cast sizes into every tier.
    pub fn update_detectors(&mut self) {
        let (cast, opening) = (self.ledge_cast_size, self.valid_opening_size);
        for detector in [&mut self.high, &mut self.mid, &mut self.low] {
            let area = detector.config().detection_area_size;
            detector.update_cast_settings(area, cast, opening);
        }
    }

    pub fn detector(&self, ledge_type: LedgeType) -> Option<&LedgeDetector> {
        match ledge_type {
            LedgeType::High => Some(&self.high),
            LedgeType::Mid => Some(&self.mid),
            LedgeType::Low => Some(&self.low),
            LedgeType::Unset => None,
        }
    }

    pub fn detector_mut(&mut self, ledge_type: LedgeType) -> Option<&mut LedgeDetector> {
        match ledge_type {
            LedgeType::High => Some(&mut self.high),
            LedgeType::Mid => Some(&mut self.mid),
            LedgeType::Low => Some(&mut self.low),
            LedgeType::Unset => None,
        }
    }

    /// Run one detection pass.
    ///
    /// Tiers are tried high, then mid, then low. Each runs its full scan only when its area
    /// is obstructed, and the first tier that finds a ledge wins.
    pub fn tick<S: ShapeCastService + ?Sized>(
        &mut self,
        world: &S,
        frame: &Transform,
    ) -> Option<LedgeDetection> {
        if !self.active {
            return None;
        }

        self.update_detectors();

        let tiers = [LedgeType::High, LedgeType::Mid, LedgeType::Low];
        let found = tiers.into_iter().find_map(|ledge_type| {
            let detector = self.detector_mut(ledge_type)?;
            if !detector.is_obstruction_detected(world, frame) {
                return None;
            }
            detector
                .detect_ledge(world, frame)
                .map(|position| LedgeDetection {
                    ledge_type,
                    position,
                })
        })?;

        log::trace!("{:?} ledge detected at {:?}", found.ledge_type, found.position);
        self.on_ledge_detected.emit(&found);
        Some(found)
    }

    /// The ledge surface under a detection's opening.
    pub fn surface_point(&self, detection: &LedgeDetection, frame: &Transform) -> Vec3 {
        detection.position
            - frame.up() * (self.valid_opening_size.y / 2.0 + LEDGE_OPENING_CLEARANCE)
    }

    /// Is `position` still within reach of the detector for `ledge_type`?
    pub fn is_ledge_still_valid(
        &self,
        ledge_type: LedgeType,
        position: &Vec3,
        frame: &Transform,
    ) -> bool {
        match self.detector(ledge_type) {
            Some(detector) => {
                (detector.position(frame) - position).norm() <= detector.max_ledge_distance()
            }
            None => {
                log::error!("cannot validate a ledge without a type");
                false
            }
        }
    }
}
