//! Per-frame wiring of the controller, the tiered ledge detectors and the fixed-step clock.

use crate::collision::{ShapeCastService, Transform};
use crate::constants::{DEFAULT_FIXED_TIMESTEP, MAX_FIXED_STEPS_PER_FRAME};
use crate::controller::{ControllerConfig, FirstPersonController};
use crate::events::LedgeDetection;
use crate::input::InputSnapshot;
use crate::ledge::LedgePoint;
use crate::ledge_detection_manager::{LedgeDetectionConfig, LedgeDetectionManager};

#[derive(Clone, Debug)]
pub struct RigConfig {
    pub controller: ControllerConfig,
    pub detection: LedgeDetectionConfig,
    pub fixed_timestep: f32,
    /// Fixed steps allowed per frame before the backlog is dropped.
    pub max_fixed_steps: u32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            detection: LedgeDetectionConfig {
                active: true,
                ..Default::default()
            },
            fixed_timestep: DEFAULT_FIXED_TIMESTEP,
            max_fixed_steps: MAX_FIXED_STEPS_PER_FRAME,
        }
    }
}

pub struct ParkourRig {
    controller: FirstPersonController,
    detection: LedgeDetectionManager,
    fixed_timestep: f32,
    max_fixed_steps: u32,
    accumulator: f32,
    /// Last frame's tier detection, revalidated before the controller sees it.
    carried: Option<LedgeDetection>,
}

impl ParkourRig {
    pub fn new(config: RigConfig, transform: Transform) -> Self {
        let fixed_timestep = if config.fixed_timestep > 0.0 {
            config.fixed_timestep
        } else {
            log::warn!(
                "invalid fixed timestep {}, using {DEFAULT_FIXED_TIMESTEP}",
                config.fixed_timestep
            );
            DEFAULT_FIXED_TIMESTEP
        };

        Self {
            controller: FirstPersonController::new(config.controller, transform),
            detection: LedgeDetectionManager::new(config.detection),
            fixed_timestep,
            max_fixed_steps: config.max_fixed_steps.max(1),
            accumulator: 0.0,
            carried: None,
        }
    }

    /// Run one frame. Returns how many fixed steps ran.
    pub fn update<S: ShapeCastService + ?Sized>(
        &mut self,
        world: &S,
        input: &mut InputSnapshot,
        dt: f32,
    ) -> u32 {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("skipping rig update with dt = {dt}");
            return 0;
        }

        let frame = *self.controller.transform();

        let tier_ledge = self
            .carried
            .take()
            .filter(|d| {
                self.detection
                    .is_ledge_still_valid(d.ledge_type, &d.position, &frame)
            })
            .map(|d| LedgePoint {
                position: self.detection.surface_point(&d, &frame),
                ledge_type: d.ledge_type,
            });
        self.controller.set_tier_ledge(tier_ledge);

        self.carried = self.detection.tick(world, &frame);

        self.controller.tick(world, input, dt);

        self.accumulator += dt;
        let mut steps = 0;
        while self.accumulator >= self.fixed_timestep && steps < self.max_fixed_steps {
            self.controller.fixed_tick(world, self.fixed_timestep);
            self.accumulator -= self.fixed_timestep;
            steps += 1;
        }
        if self.accumulator >= self.fixed_timestep {
            log::warn!(
                "dropping {:.3}s of fixed-step backlog after {steps} steps",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        self.controller.late_tick(dt);
        steps
    }

    pub fn controller(&self) -> &FirstPersonController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut FirstPersonController {
        &mut self.controller
    }

    pub fn detection(&self) -> &LedgeDetectionManager {
        &self.detection
    }

    pub fn detection_mut(&mut self) -> &mut LedgeDetectionManager {
        &mut self.detection
    }

    pub fn carried_detection(&self) -> Option<LedgeDetection> {
        self.carried
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{StaticWorld, Vec2, Vec3};
    use crate::controller::MovementState;
    use crate::events::ControllerEvent;
    use crate::ledge::LedgeType;
    use crate::testing::{floor_and_wall, floor_def};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rig() -> ParkourRig {
        ParkourRig::new(RigConfig::default(), Transform::default())
    }

    #[test]
    fn fixed_steps_follow_the_accumulator() {
        let world = StaticWorld::build(vec![floor_def(1)]);
        let mut r = rig();
        let mut idle = InputSnapshot::default();

        assert_eq!(r.update(&world, &mut idle, 0.05), 2);
        // A long hitch is capped and its backlog dropped.
        assert_eq!(r.update(&world, &mut idle, 1.0), MAX_FIXED_STEPS_PER_FRAME);
        assert_eq!(r.update(&world, &mut idle, 0.01), 0);
        assert_eq!(r.update(&world, &mut idle, 0.0), 0);
    }

    #[test]
    fn tier_detections_reach_the_controller_one_frame_later() {
        let world = floor_and_wall(1.2, 0.5);
        let mut r = rig();
        let mut idle = InputSnapshot::default();

        r.update(&world, &mut idle, 0.02);
        assert_eq!(
            r.carried_detection().map(|d| d.ledge_type),
            Some(LedgeType::Mid)
        );
        assert!(r.controller().tier_ledge().is_none());

        r.update(&world, &mut idle, 0.02);
        let ledge = r.controller().tier_ledge().expect("carried ledge");
        assert_eq!(ledge.ledge_type, LedgeType::Mid);
        assert!((ledge.position.y - 1.2).abs() < 1.0e-3);

        // Far from the wall the carried detection is stale.
        r.controller_mut()
            .set_transform(Transform::from_translation(Vec3::new(0.0, 0.0, 10.0)));
        r.update(&world, &mut idle, 0.02);
        assert!(r.controller().tier_ledge().is_none());
        assert!(r.carried_detection().is_none());
    }

    #[test]
    fn tier_detection_alone_drives_a_climb() {
        let world = floor_and_wall(1.2, 0.5);
        let mut r = rig();
        r.controller_mut().wall_climber_mut().set_enabled(false);
        let exits = Rc::new(RefCell::new(0));
        let e = Rc::clone(&exits);
        r.controller_mut().events.subscribe(move |ev: &ControllerEvent| {
            if *ev == ControllerEvent::MidTransitionExit {
                *e.borrow_mut() += 1;
            }
        });

        for _ in 0..10 {
            let mut sprint = InputSnapshot {
                move_axis: Vec2::new(0.0, 1.0),
                sprint: true,
                ..Default::default()
            };
            r.update(&world, &mut sprint, 0.02);
            if r.controller().movement_state() == MovementState::Climbing {
                break;
            }
        }
        assert_eq!(r.controller().movement_state(), MovementState::Climbing);
        assert_eq!(
            r.controller().transition().map(|t| t.ledge_type),
            Some(LedgeType::Mid)
        );

        let mut idle = InputSnapshot::default();
        for _ in 0..200 {
            r.update(&world, &mut idle, 0.02);
            if r.controller().movement_state() == MovementState::General {
                break;
            }
        }
        assert_eq!(r.controller().movement_state(), MovementState::General);
        assert_eq!(*exits.borrow(), 1);
        assert!(r.controller().transform().translation.y > 1.2);
    }

    #[test]
    fn climbs_advance_only_on_fixed_steps() {
        let world = floor_and_wall(1.2, 0.8);
        let mut r = rig();
        let exits = Rc::new(RefCell::new(0));
        let e = Rc::clone(&exits);
        r.controller_mut().events.subscribe(move |ev: &ControllerEvent| {
            if *ev == ControllerEvent::MidTransitionExit {
                *e.borrow_mut() += 1;
            }
        });

        let mut sprint = InputSnapshot {
            move_axis: Vec2::new(0.0, 1.0),
            sprint: true,
            ..Default::default()
        };
        assert_eq!(r.update(&world, &mut sprint, 0.01), 0);
        assert_eq!(r.controller().movement_state(), MovementState::Climbing);
        let start = r.controller().transform().translation;

        let mut idle = InputSnapshot::default();
        assert_eq!(r.update(&world, &mut idle, 0.01), 1);
        assert!(r.controller().transform().translation.y > start.y);

        for _ in 0..200 {
            r.update(&world, &mut idle, 0.02);
            if r.controller().movement_state() == MovementState::General {
                break;
            }
        }
        assert_eq!(r.controller().movement_state(), MovementState::General);
        assert_eq!(*exits.borrow(), 1);
    }
}
