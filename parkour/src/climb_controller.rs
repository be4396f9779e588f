//! Standalone point-to-point climb mover.
//!
//! Moves a position in a straight line toward an end point at a clamped minimum speed,
//! passing through any geometry on the way.
//! The first-person controller runs its own, richer climb state machine; this mover is
//! for callers that only need a simple low transition.

use crate::collision::Vec3;
use crate::constants::DEFAULT_MIN_TRANSITION_SPEED;
use crate::math::{approx_eq, is_valid_point, move_towards};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClimbState {
    #[default]
    NotClimbing,
    LowTransition,
}

#[derive(Clone, Copy, Debug)]
pub struct ClimbControllerConfig {
    pub min_transition_speed: f32,
}

impl Default for ClimbControllerConfig {
    fn default() -> Self {
        Self {
            min_transition_speed: DEFAULT_MIN_TRANSITION_SPEED,
        }
    }
}

#[derive(Debug)]
pub struct ClimbController {
    config: ClimbControllerConfig,
    state: ClimbState,
    end_point: Vec3,
    speed: f32,
    total_distance: f32,
    traversed: f32,
}

impl ClimbController {
    pub fn new(config: ClimbControllerConfig) -> Self {
        Self {
            config,
            state: ClimbState::NotClimbing,
            end_point: Vec3::zeros(),
            speed: 0.0,
            total_distance: 0.0,
            traversed: 0.0,
        }
    }

    pub fn climb_state(&self) -> ClimbState {
        self.state
    }

    /// Start moving from `position` to `end_point`.
    ///
    /// Only accepted while not climbing; returns whether the transition started.
    pub fn enter_low_transition(&mut self, position: Vec3, end_point: Vec3, speed: f32) -> bool {
        if self.state != ClimbState::NotClimbing {
            log::debug!("ignoring low transition request while already climbing");
            return false;
        }
        if !is_valid_point(&position) || !is_valid_point(&end_point) {
            log::error!("cannot start a low transition toward {end_point:?}");
            return false;
        }

        self.end_point = end_point;
        self.speed = speed.max(self.config.min_transition_speed);
        self.total_distance = (end_point - position).norm();
        self.traversed = 0.0;
        self.state = ClimbState::LowTransition;
        log::debug!(
            "low transition to {end_point:?} over {:.3}m at {:.2}m/s",
            self.total_distance,
            self.speed
        );
        true
    }

    /// Advance the transition, moving `position` in place.
    ///
    /// The step ignores collisions. Hosts that need the body blocked should resolve the
    /// displacement through [`crate::collision::move_capsule`] themselves.
    pub fn tick(&mut self, position: &mut Vec3, dt: f32) {
        if self.state != ClimbState::LowTransition {
            return;
        }

        // Either condition ends the transition on its own.
        if self.is_finished(position) {
            self.state = ClimbState::NotClimbing;
            return;
        }

        let step = move_towards(*position, self.end_point, self.speed * dt.max(0.0));
        *position = step.position;
        self.traversed += step.travelled;

        if self.is_finished(position) {
            self.state = ClimbState::NotClimbing;
        }
    }

    fn is_finished(&self, position: &Vec3) -> bool {
        approx_eq(position, &self.end_point) || self.traversed >= self.total_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moves_to_end_point_at_minimum_speed() {
        let mut cc = ClimbController::new(ClimbControllerConfig::default());
        let mut pos = Vec3::zeros();
        assert!(cc.enter_low_transition(pos, Vec3::new(0.0, 1.0, 0.0), 0.5));
        assert_eq!(cc.climb_state(), ClimbState::LowTransition);

        // Speed is clamped up to 2 m/s: 0.25s covers half the distance.
        cc.tick(&mut pos, 0.25);
        assert!((pos.y - 0.5).abs() < 1.0e-5);
        assert_eq!(cc.climb_state(), ClimbState::LowTransition);

        cc.tick(&mut pos, 0.25);
        assert_eq!(pos, Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(cc.climb_state(), ClimbState::NotClimbing);
    }

    #[test]
    fn rejects_new_transition_while_moving() {
        let mut cc = ClimbController::new(ClimbControllerConfig::default());
        assert!(cc.enter_low_transition(Vec3::zeros(), Vec3::new(0.0, 2.0, 0.0), 3.0));
        assert!(!cc.enter_low_transition(Vec3::zeros(), Vec3::new(5.0, 0.0, 0.0), 3.0));
    }

    #[test]
    fn traversed_distance_alone_ends_the_transition() {
        let mut cc = ClimbController::new(ClimbControllerConfig::default());
        let mut pos = Vec3::zeros();
        cc.enter_low_transition(pos, Vec3::new(1.0, 0.0, 0.0), 2.0);
        // Something else shoves the body off the line; distance covered still finishes it.
        cc.tick(&mut pos, 0.25);
        pos.z += 3.0;
        cc.tick(&mut pos, 0.5);
        assert_eq!(cc.climb_state(), ClimbState::NotClimbing);
    }

    #[test]
    fn invalid_end_point_is_rejected() {
        let mut cc = ClimbController::new(ClimbControllerConfig::default());
        assert!(!cc.enter_low_transition(
            Vec3::zeros(),
            Vec3::new(f32::NEG_INFINITY, 0.0, 0.0),
            2.0
        ));
        assert_eq!(cc.climb_state(), ClimbState::NotClimbing);
    }
}
