use crate::collision::{ShapeCastService, up};
use crate::events::{ControllerEvent, FootSoundType};

use super::{ControllerConfig, FirstPersonController};

/// Landing severity from the vertical velocity at contact.
///
/// A velocity exactly at a threshold lands in the heavier bucket.
pub fn classify_landing(vertical_velocity: f32, config: &ControllerConfig) -> FootSoundType {
    if vertical_velocity <= -config.nasty_landing_speed {
        FootSoundType::LandNasty
    } else if vertical_velocity <= -config.heavy_landing_speed {
        FootSoundType::LandHeavy
    } else if vertical_velocity <= -config.moderate_landing_speed {
        FootSoundType::LandModerate
    } else {
        FootSoundType::LandEasy
    }
}

impl FirstPersonController {
    /// Literal grounding comes straight from the probe. Logical grounding only drops
    /// after the fall timeout, but comes back as soon as the probe touches again.
    pub(super) fn update_grounded<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        let probe = self.transform.translation - up() * self.config.grounded_offset;
        self.literally_grounded =
            world.check_sphere(probe, self.config.grounded_radius, self.config.ground_layers);

        if self.literally_grounded {
            self.fall_timeout_delta = self.config.fall_timeout;
            if self.fall_timeout_completed {
                self.fall_timeout_completed = false;
                self.logically_grounded = true;
                self.update_landing_severity();
                log::debug!(
                    "landed at {:.2}m/s ({:?})",
                    self.vertical_velocity,
                    self.landing
                );
                self.emit(ControllerEvent::Land(self.landing));
            }
            return;
        }

        if self.fall_timeout_completed {
            return;
        }
        self.fall_timeout_delta -= dt;
        if self.fall_timeout_delta <= 0.0 {
            self.fall_timeout_completed = true;
            self.logically_grounded = false;
            self.emit(ControllerEvent::Ungrounded);
        }
    }

    pub(super) fn update_landing_severity(&mut self) {
        self.landing = classify_landing(self.vertical_velocity, &self.config);
    }

    pub(super) fn apply_gravity(&mut self, dt: f32) {
        if self.literally_grounded {
            if self.vertical_velocity < 0.0 {
                self.vertical_velocity = crate::constants::GROUND_STICK_VELOCITY;
            }
            return;
        }
        self.vertical_velocity = (self.vertical_velocity + self.config.gravity * dt)
            .max(-self.config.terminal_velocity);
    }

    pub(super) fn update_jump(&mut self, dt: f32) {
        if !self.logically_grounded {
            return;
        }

        if self.jump_timeout_completed {
            if self.input.jump {
                self.vertical_velocity = jump_velocity(&self.config);
                self.jump_timeout_completed = false;
                self.jump_timeout_delta = self.config.jump_timeout;
                self.emit(ControllerEvent::Jump);
            }
        } else {
            self.jump_timeout_delta -= dt;
            if self.jump_timeout_delta <= 0.0 {
                self.jump_timeout_completed = true;
                self.jump_timeout_delta = self.config.jump_timeout;
            }
        }
    }
}

/// Launch speed that peaks at `jump_height` under `gravity`.
pub fn jump_velocity(config: &ControllerConfig) -> f32 {
    (config.jump_height * -2.0 * config.gravity).max(0.0).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn landing_boundaries_land_in_heavier_bucket() {
        let cfg = ControllerConfig::default();
        assert_eq!(classify_landing(-2.0, &cfg), FootSoundType::LandEasy);
        assert_eq!(classify_landing(-4.999, &cfg), FootSoundType::LandEasy);
        assert_eq!(classify_landing(-5.0, &cfg), FootSoundType::LandModerate);
        assert_eq!(classify_landing(-8.9, &cfg), FootSoundType::LandModerate);
        assert_eq!(classify_landing(-9.0, &cfg), FootSoundType::LandHeavy);
        assert_eq!(classify_landing(-15.0, &cfg), FootSoundType::LandNasty);
        assert_eq!(classify_landing(-40.0, &cfg), FootSoundType::LandNasty);
        assert_eq!(classify_landing(3.0, &cfg), FootSoundType::LandEasy);
    }

    #[test]
    fn jump_velocity_reaches_apex_height() {
        let cfg = ControllerConfig::default();
        let v = jump_velocity(&cfg);
        assert!((v - (1.2_f32 * 30.0).sqrt()).abs() < 1.0e-5);
        // v^2 / (2g) is the apex.
        assert!((v * v / (2.0 * -cfg.gravity) - cfg.jump_height).abs() < 1.0e-4);
    }
}
