//! Climb entry and per-fixed-tick climb driving.
//!
//! Low and mid ledges are a two-phase straight move: up to the midway point above the
//! start, then across onto the ledge. High ledges first pull the body into a hang, then
//! wait for input: drop, peek, shuffle sideways, or climb over (which reuses the two-phase
//! move).

use crate::collision::{ShapeCastService, Vec3, up};
use crate::events::ControllerEvent;
use crate::ledge::{LedgePoint, LedgeType};
use crate::math::{lerp_vec, move_towards, push_unique};

use super::{
    ClimbTransition, DeferredAction, FirstPersonController, MovementState, WallHangState,
};
use crate::constants::HORIZONTAL_CLIMB_INPUT_DEADZONE;

impl FirstPersonController {
    /// Try to start a climb from General.
    ///
    /// Returns whether the controller switched to Climbing.
    pub(super) fn enter_climb<S: ShapeCastService + ?Sized>(&mut self, world: &S) -> bool {
        if !self.config.climb_enabled || self.movement_state != MovementState::General {
            return false;
        }

        let Some((ledge, normal)) = self.ledge_candidate(world) else {
            return false;
        };
        if ledge.ledge_type == LedgeType::Unset {
            log::error!("rejecting climb toward unclassified ledge {:?}", ledge.position);
            return false;
        }
        if normal.is_none() {
            log::warn!("no wall face found behind ledge {:?}", ledge.position);
        }

        let grounded_entry =
            self.is_sprinting && self.logically_grounded && self.input.is_forwards_pressed();
        let falling_entry = !self.logically_grounded && self.vertical_velocity < 0.0;

        match ledge.ledge_type {
            LedgeType::Low | LedgeType::Mid if grounded_entry => {
                self.begin_climb(ledge, normal);
                self.emit(if ledge.ledge_type == LedgeType::Low {
                    ControllerEvent::LowTransitionEnter
                } else {
                    ControllerEvent::MidTransitionEnter
                });
                true
            }
            // Hanging needs the face to shuffle along.
            LedgeType::High if normal.is_none() => false,
            LedgeType::High if grounded_entry && self.input.jump && self.high_grab_ready => {
                self.begin_ledge_grab(ledge, normal, true)
            }
            LedgeType::High if falling_entry && self.high_grab_ready => {
                self.begin_ledge_grab(ledge, normal, false)
            }
            _ => false,
        }
    }

    /// Wall climber candidates win; a carried tier detection is the fallback.
    ///
    /// Tier points sit on top of the wall, so they are moved onto the near face first.
    fn ledge_candidate<S: ShapeCastService + ?Sized>(
        &self,
        world: &S,
    ) -> Option<(LedgePoint, Option<Vec3>)> {
        let forward = self.transform.forward();

        if let Some(point) = self.wall_climber.closest_ledge_point(&self.transform) {
            let ledge_type = self
                .wall_climber
                .determine_ledge_type(&self.transform, &point.position);
            let normal = self
                .wall_climber
                .get_face_normal(world, &point.position, &forward);
            return Some((
                LedgePoint {
                    position: point.position,
                    ledge_type,
                },
                normal,
            ));
        }

        let tier = self.tier_ledge?;
        match self
            .wall_climber
            .project_onto_face(world, &self.transform, &tier.position)
        {
            Some((corner, normal)) => Some((
                LedgePoint {
                    position: corner,
                    ledge_type: tier.ledge_type,
                },
                Some(normal),
            )),
            None => {
                let normal = self
                    .wall_climber
                    .get_face_normal(world, &tier.position, &forward);
                Some((tier, normal))
            }
        }
    }

    fn begin_ledge_grab(
        &mut self,
        ledge: LedgePoint,
        normal: Option<Vec3>,
        skip_input_delay: bool,
    ) -> bool {
        let Some(hang_origin) = self.config.wall_hang_origin else {
            log::warn!("no wall hang origin configured, cannot grab high ledge");
            return false;
        };
        let offset = ledge.position - self.transform.transform_point(hang_origin);

        self.begin_climb(ledge, normal);
        self.wall_hang = Some(WallHangState::new(offset, skip_input_delay));
        self.high_grab_ready = false;
        log::debug!("grabbing high ledge at {:?}", ledge.position);
        true
    }

    fn begin_climb(&mut self, ledge: LedgePoint, normal: Option<Vec3>) {
        let start = self.transform.translation;
        let end = self.wall_climber.standing_point(&self.transform, &ledge.position);

        self.movement_state = MovementState::Climbing;
        self.transition = Some(ClimbTransition::new(ledge.ledge_type, start, end));
        self.ledge_position = Some(ledge.position);
        self.wall_normal = normal;
        self.climbing_points.clear();

        self.vertical_velocity = 0.0;
        self.update_landing_severity();
        self.horizontal_speed = 0.0;
        self.speed = 0.0;
        self.move_direction = Vec3::zeros();

        if self.is_sprinting {
            self.is_sprinting = false;
            self.emit(ControllerEvent::RunExit);
        }
        self.jump_timeout_completed = false;
        self.jump_timeout_delta = self.config.jump_timeout;

        log::debug!(
            "{:?} climb from {start:?} to {end:?}",
            ledge.ledge_type
        );
    }

    /// Drive the active climb by one fixed step.
    pub(super) fn climb<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        let Some(transition) = self.transition else {
            log::error!("climbing without an active transition");
            self.movement_state = MovementState::General;
            return;
        };

        match transition.ledge_type {
            LedgeType::Low | LedgeType::Mid => {
                if transition.complete {
                    self.finish_ground_transition(transition.ledge_type);
                } else {
                    self.move_up_and_over(dt);
                }
            }
            LedgeType::High => self.climb_high(world, dt),
            LedgeType::Unset => {
                log::error!("climbing toward an unclassified ledge, aborting");
                self.movement_state = MovementState::General;
                self.transition = None;
            }
        }
    }

    fn climb_high<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        let Some(hang) = self.wall_hang else {
            log::error!("high climb without hang state, aborting");
            self.exit_high_climb();
            return;
        };

        if !hang.is_hanging {
            self.enter_hang(dt);
        } else if hang.is_climbing_over {
            if self.transition.is_some_and(|t| t.complete) {
                self.exit_high_climb();
            } else {
                self.move_up_and_over(dt);
            }
        } else if hang.input_delay_complete {
            self.hang(world, dt);
        }
    }

    fn enter_hang(&mut self, dt: f32) {
        let duration = self.config.enter_hang_duration;
        let input_delay = self.config.wall_hang_input_delay;
        let (Some(hang), Some(transition)) = (self.wall_hang.as_mut(), self.transition) else {
            return;
        };

        hang.enter_hang_elapsed += dt;
        let t = if duration > 0.0 {
            hang.enter_hang_elapsed / duration
        } else {
            1.0
        };
        self.transform.translation =
            lerp_vec(transition.start_point, transition.start_point + hang.offset, t);

        if hang.enter_hang_elapsed < duration {
            return;
        }

        hang.enter_hang_elapsed = 0.0;
        hang.is_hanging = true;
        hang.hang_origin = self.transform.translation;
        if hang.skip_input_delay {
            hang.skip_input_delay = false;
            hang.input_delay_complete = true;
        } else {
            hang.input_delay_task = Some(
                self.scheduler
                    .schedule(input_delay, DeferredAction::CompleteWallHangInputDelay),
            );
        }
        self.emit(ControllerEvent::WallHangEntered);
    }

    fn hang<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        let input = self.input;

        if input.move_axis.y < 0.0 && input.sprint {
            log::debug!("dropping from ledge");
            self.exit_high_climb();
            return;
        }

        if input.move_axis.y > 0.0 && input.sprint {
            let standable = self.ledge_position.is_some_and(|ledge| {
                self.wall_climber
                    .is_point_standable(world, &self.transform, &ledge)
            });
            if standable {
                if let Some(hang) = self.wall_hang.as_mut() {
                    hang.peek_elapsed = 0.0;
                    hang.is_climbing_over = true;
                }
                self.emit(ControllerEvent::WallClimbOverTriggered);
                return;
            }
        }

        self.peek(input.move_axis.y > 0.0, dt);

        if input.move_axis.x.abs() > HORIZONTAL_CLIMB_INPUT_DEADZONE {
            self.climb_horizontally(world, input.move_axis.x, dt);
        }
    }

    /// Raise the body toward the peek height while `raising`, lower it back otherwise.
    fn peek(&mut self, raising: bool, dt: f32) {
        let duration = self.config.peek_duration;
        let rise = up() * self.config.peek_offset;
        let Some(hang) = self.wall_hang.as_mut() else {
            return;
        };

        let before = hang.peek_elapsed;
        hang.peek_elapsed = if raising {
            (hang.peek_elapsed + dt).min(duration)
        } else {
            (hang.peek_elapsed - dt).max(0.0)
        };
        if hang.peek_elapsed == before {
            return;
        }

        let t = if duration > 0.0 {
            hang.peek_elapsed / duration
        } else {
            0.0
        };
        self.transform.translation = lerp_vec(hang.hang_origin, hang.hang_origin + rise, t);
    }

    fn climb_horizontally<S: ShapeCastService + ?Sized>(&mut self, world: &S, axis: f32, dt: f32) {
        let (Some(normal), Some(ledge)) = (self.wall_normal, self.ledge_position) else {
            log::warn!("no wall normal to climb along");
            return;
        };
        let wall_right = normal.cross(&-up());
        let direction = if axis > 0.0 { wall_right } else { -wall_right };
        let speed = self.config.wall_hang_climb_speed;

        let Some(points) = self.wall_climber.is_horizontal_climbing_available(
            world,
            &self.transform,
            &direction,
            speed,
            &-normal,
            &ledge,
        ) else {
            return;
        };
        for point in points {
            push_unique(&mut self.climbing_points, point);
        }

        let displacement = direction * (speed * dt);
        self.transform.translation += displacement;
        self.ledge_position = Some(ledge + displacement);
        if let Some(hang) = self.wall_hang.as_mut() {
            hang.hang_origin += displacement;
        }
        if let Some(transition) = self.transition.as_mut() {
            transition.shift(&displacement);
        }
    }

    /// Two-phase move: straight up (or down) to the midway point, then onto the end point.
    fn move_up_and_over(&mut self, dt: f32) {
        let speed = self.transition_speed();
        let Some(transition) = self.transition.as_mut() else {
            return;
        };

        let max_delta = speed * dt;
        if !transition.midway_reached {
            let step = move_towards(self.transform.translation, transition.midway_point(), max_delta);
            self.transform.translation = step.position;
            transition.midway_reached = step.arrived;
        } else if !transition.complete {
            let step = move_towards(self.transform.translation, transition.end_point, max_delta);
            self.transform.translation = step.position;
            transition.complete = step.arrived;
        }
    }

    fn transition_speed(&self) -> f32 {
        match self.transition.map(|t| t.ledge_type) {
            Some(LedgeType::Low) => self.config.low_transition_speed,
            Some(LedgeType::Mid) => self.config.mid_transition_speed,
            _ => self.config.high_transition_speed,
        }
    }

    fn finish_ground_transition(&mut self, ledge_type: LedgeType) {
        self.leave_climbing();
        self.emit(if ledge_type == LedgeType::Low {
            ControllerEvent::LowTransitionExit
        } else {
            ControllerEvent::MidTransitionExit
        });
    }

    /// Leave a high climb by dropping or finishing a climb-over. Starts the re-grab cooldown.
    fn exit_high_climb(&mut self) {
        if let Some(task) = self.wall_hang.and_then(|h| h.input_delay_task) {
            self.scheduler.cancel(task);
        }
        if let Some(task) = self.high_grab_cooldown.take() {
            self.scheduler.cancel(task);
        }

        self.high_grab_ready = false;
        self.high_grab_cooldown = Some(
            self.scheduler
                .schedule(self.config.high_grab_cooldown, DeferredAction::ReadyHighGrab),
        );

        self.leave_climbing();
        self.emit(ControllerEvent::WallHangExited);
    }

    fn leave_climbing(&mut self) {
        self.movement_state = MovementState::General;
        self.transition = None;
        self.wall_hang = None;
        self.vertical_velocity = 0.0;
        log::debug!("climb finished at {:?}", self.transform.translation);
    }
}
