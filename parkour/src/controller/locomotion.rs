use crate::collision::{
    CapsuleSpec, MoveRequest, ShapeCastService, Vec3, move_capsule, up,
};
use crate::events::ControllerEvent;
use crate::math::{clamp_angle, lerp, round_to};

use super::FirstPersonController;

/// Gap between the top of a crouched body and the clearance box above it.
const CROUCH_CLEARANCE_GAP: f32 = 0.01;

/// Contacts whose normal points further down than this count as a ceiling.
const CEILING_NORMAL_THRESHOLD: f32 = 0.7;

impl FirstPersonController {
    pub(super) fn update_sprint(&mut self) {
        let sprinting = self.config.sprint_available
            && self.input.sprint
            && !self.is_crouched
            && !self.is_crouch_transitioning();

        if sprinting == self.is_sprinting {
            return;
        }
        self.is_sprinting = sprinting;
        self.emit(if sprinting {
            ControllerEvent::RunEnter
        } else {
            ControllerEvent::RunExit
        });
    }

    /// Enter on input alone; exit only once nothing sits above the standing body.
    pub(super) fn update_crouch<S: ShapeCastService + ?Sized>(&mut self, world: &S) {
        if self.is_crouched {
            self.is_uncrouch_available = !self.is_overhead_blocked(world);
        }

        if !self.is_crouched && self.config.crouch_available && self.input.crouch {
            self.is_crouched = true;
            self.body_height = self.config.crouch_height;
            self.emit(ControllerEvent::CrouchEnter);
        } else if self.is_crouched
            && (!self.input.crouch || !self.config.crouch_available)
            && self.is_uncrouch_available
        {
            self.is_crouched = false;
            self.body_height = self.config.standing_height;
            self.emit(ControllerEvent::CrouchExit);
        }
    }

    fn is_overhead_blocked<S: ShapeCastService + ?Sized>(&self, world: &S) -> bool {
        let cfg = &self.config;
        let half_height = cfg.standing_height / 2.0;
        let half_width = (cfg.body_radius + cfg.crouch_cast_tweak) / 2.0;
        let center =
            self.transform.translation + up() * (half_height + CROUCH_CLEARANCE_GAP);
        let blocked = world.check_box(
            center,
            Vec3::new(half_width, half_height, half_width),
            self.transform.rotation,
            cfg.ground_layers,
        );
        if blocked {
            log::trace!("standing up blocked above {:?}", self.transform.translation);
        }
        blocked
    }

    /// Ease the camera toward the crouch or standing height.
    pub(super) fn update_camera_height(&mut self, dt: f32) {
        let target = if self.is_crouched {
            self.config.crouch_height
        } else {
            self.config.standing_height
        };
        if self.camera_height == target {
            return;
        }

        let step = self.config.camera_height_transition_speed * dt;
        let next = if self.camera_height > target {
            self.camera_height - step
        } else {
            self.camera_height + step
        };

        // Compared in whole centimetres so the transition always lands on the target.
        let crossed = if self.camera_height > target {
            round_to(next, 2) <= round_to(target, 2)
        } else {
            round_to(next, 2) >= round_to(target, 2)
        };
        self.camera_height = if crossed { target } else { next };
    }

    pub(super) fn update_horizontal_speed(&mut self, dt: f32) {
        let cfg = &self.config;
        let target = if !self.input.has_move() {
            0.0
        } else if self.is_sprinting {
            cfg.sprint_speed
        } else if self.is_crouched || self.is_crouch_transitioning() {
            cfg.crouch_speed
        } else {
            cfg.move_speed
        };

        let magnitude = if self.input.analog_movement {
            self.input.move_axis.norm().min(1.0)
        } else {
            1.0
        };

        let current = self.horizontal_speed;
        self.speed = if (current - target).abs() > crate::constants::SPEED_OFFSET {
            round_to(lerp(current, target * magnitude, dt * cfg.speed_change_rate), 3)
        } else {
            target
        };
    }

    pub(super) fn update_move_direction(&mut self) {
        self.move_direction = if self.input.has_move() {
            let axis = self.input.move_axis;
            (self.transform.right() * axis.x + self.transform.forward() * axis.y)
                .try_normalize(1.0e-6)
                .unwrap_or_else(Vec3::zeros)
        } else {
            Vec3::zeros()
        };
    }

    /// Resolve this tick's displacement against the world in one sweep.
    pub(super) fn move_character<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        let displacement =
            self.move_direction * (self.speed * dt) + up() * (self.vertical_velocity * dt);

        let capsule = CapsuleSpec::from_height(self.body_height, self.config.body_radius);
        let lift = up() * (self.body_height / 2.0);
        let start = self.transform.translation;

        let result = move_capsule(
            world,
            MoveRequest::with_defaults(start + lift, displacement, capsule, self.config.ground_layers),
        );
        self.transform.translation = result.end_pos - lift;

        // Rising into a ceiling ends the rise.
        if self.vertical_velocity > 0.0
            && result
                .last_hit
                .is_some_and(|hit| hit.normal.dot(&up()) < -CEILING_NORMAL_THRESHOLD)
        {
            log::debug!("head hit a ceiling at {:?}", self.transform.translation);
            self.vertical_velocity = 0.0;
        }

        let moved = self.transform.translation - start;
        self.horizontal_speed = Vec3::new(moved.x, 0.0, moved.z).norm() / dt;
    }

    /// Apply look input: yaw turns the body, pitch is kept for the camera.
    pub(super) fn rotate_camera(&mut self, dt: f32) {
        let look = self.input.look;
        if look.norm_squared() < crate::constants::LOOK_THRESHOLD * crate::constants::LOOK_THRESHOLD {
            return;
        }

        let multiplier = if self.input.look_is_mouse_delta { 1.0 } else { dt };
        let cfg = &self.config;

        self.camera_pitch = clamp_angle(
            self.camera_pitch + look.y * cfg.rotation_speed * multiplier,
            cfg.bottom_clamp,
            cfg.top_clamp,
        );

        // Positive look.x turns right, which is clockwise seen from above.
        let yaw = -(look.x * cfg.rotation_speed * multiplier).to_radians();
        self.transform.rotate_yaw(yaw);
    }
}
