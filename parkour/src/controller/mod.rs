//! First-person locomotion and the parkour climb state machine.
//!
//! The controller owns the character transform. Each frame the host calls, in order:
//! [`FirstPersonController::tick`] (states, velocities, one resolved move), zero or more
//! [`FirstPersonController::fixed_tick`] (climb driving), then
//! [`FirstPersonController::late_tick`] (camera look).

mod climb;
mod config;
mod grounded;
mod locomotion;
mod state;

pub use config::ControllerConfig;
pub use grounded::{classify_landing, jump_velocity};
pub use state::{ClimbTransition, DeferredAction, MovementState, WallHangState};

use crate::collision::{ShapeCastService, Transform, Vec3, up};
use crate::events::{ControllerEvent, EventBus, FootSoundType};
use crate::input::InputSnapshot;
use crate::ledge::LedgePoint;
use crate::scheduler::{Scheduler, TaskHandle};
use crate::wall_climber::WallClimber;

pub struct FirstPersonController {
    config: ControllerConfig,
    transform: Transform,
    input: InputSnapshot,
    wall_climber: WallClimber,
    scheduler: Scheduler<DeferredAction>,
    pub events: EventBus<ControllerEvent>,
    movement_state: MovementState,

    // Grounding and vertical motion
    literally_grounded: bool,
    logically_grounded: bool,
    fall_timeout_delta: f32,
    fall_timeout_completed: bool,
    jump_timeout_delta: f32,
    jump_timeout_completed: bool,
    vertical_velocity: f32,
    landing: FootSoundType,

    // Horizontal motion and posture
    speed: f32,
    horizontal_speed: f32,
    move_direction: Vec3,
    is_sprinting: bool,
    is_crouched: bool,
    is_uncrouch_available: bool,
    body_height: f32,
    camera_height: f32,
    camera_pitch: f32,

    // Climbing
    transition: Option<ClimbTransition>,
    wall_hang: Option<WallHangState>,
    ledge_position: Option<Vec3>,
    wall_normal: Option<Vec3>,
    high_grab_ready: bool,
    high_grab_cooldown: Option<TaskHandle>,
    tier_ledge: Option<LedgePoint>,
    climbing_points: Vec<Vec3>,
}

impl FirstPersonController {
    pub fn new(config: ControllerConfig, transform: Transform) -> Self {
        let wall_climber = WallClimber::new(config.wall_climber.clone());
        Self {
            transform,
            input: InputSnapshot::default(),
            wall_climber,
            scheduler: Scheduler::new(),
            events: EventBus::new(),
            movement_state: MovementState::General,

            literally_grounded: false,
            logically_grounded: true,
            fall_timeout_delta: config.fall_timeout,
            fall_timeout_completed: false,
            jump_timeout_delta: config.jump_timeout,
            jump_timeout_completed: true,
            vertical_velocity: 0.0,
            landing: FootSoundType::LandEasy,

            speed: 0.0,
            horizontal_speed: 0.0,
            move_direction: Vec3::zeros(),
            is_sprinting: false,
            is_crouched: false,
            is_uncrouch_available: true,
            body_height: config.standing_height,
            camera_height: config.standing_height,
            camera_pitch: 0.0,

            transition: None,
            wall_hang: None,
            ledge_position: None,
            wall_normal: None,
            high_grab_ready: true,
            high_grab_cooldown: None,
            tier_ledge: None,
            climbing_points: Vec::new(),

            config,
        }
    }

    /// Variable-rate update.
    ///
    /// Consumes the jump edge from `input`. In General state this determines states,
    /// applies velocities and resolves a single displacement against `world`.
    pub fn tick<S: ShapeCastService + ?Sized>(
        &mut self,
        world: &S,
        input: &mut InputSnapshot,
        dt: f32,
    ) {
        if !dt.is_finite() || dt <= 0.0 {
            log::warn!("skipping controller tick with dt = {dt}");
            return;
        }

        self.input = *input;
        input.consume_jump();

        self.run_deferred(dt);

        if self.movement_state == MovementState::General {
            self.wall_climber.update(world, &self.transform);
            self.determine_states(world, dt);
        }
        if self.movement_state == MovementState::General {
            self.apply_velocities(dt);
            self.move_character(world, dt);
        }

        self.input.jump = false;
    }

    /// Fixed-rate update; drives climb motion.
    pub fn fixed_tick<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        if self.movement_state == MovementState::Climbing && dt > 0.0 {
            self.climb(world, dt);
        }
    }

    /// Runs after movement; applies look input.
    pub fn late_tick(&mut self, dt: f32) {
        self.rotate_camera(dt);
    }

    fn determine_states<S: ShapeCastService + ?Sized>(&mut self, world: &S, dt: f32) {
        self.update_grounded(world, dt);
        self.update_sprint();
        self.update_landing_severity();
        self.update_crouch(world);
        self.update_camera_height(dt);
        self.enter_climb(world);
    }

    fn apply_velocities(&mut self, dt: f32) {
        self.apply_gravity(dt);
        self.update_horizontal_speed(dt);
        self.update_jump(dt);
        self.update_move_direction();
    }

    fn run_deferred(&mut self, dt: f32) {
        for action in self.scheduler.advance(dt) {
            match action {
                DeferredAction::CompleteWallHangInputDelay => {
                    if let Some(hang) = self.wall_hang.as_mut() {
                        hang.input_delay_complete = true;
                        hang.input_delay_task = None;
                    }
                }
                DeferredAction::ReadyHighGrab => {
                    self.high_grab_ready = true;
                    self.high_grab_cooldown = None;
                    log::debug!("high grab ready");
                }
            }
        }
    }

    fn emit(&mut self, event: ControllerEvent) {
        log::trace!("controller event {event:?}");
        self.events.emit(&event);
    }

    /// Offer a ledge from the tiered detectors for the next climb entry check.
    pub fn set_tier_ledge(&mut self, ledge: Option<LedgePoint>) {
        self.tier_ledge = ledge;
    }

    pub fn tier_ledge(&self) -> Option<LedgePoint> {
        self.tier_ledge
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Teleport. Vertical velocity is kept.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn wall_climber(&self) -> &WallClimber {
        &self.wall_climber
    }

    pub fn wall_climber_mut(&mut self) -> &mut WallClimber {
        &mut self.wall_climber
    }

    // Queries

    /// Horizontal speed actually achieved on the last move.
    pub fn get_speed(&self) -> f32 {
        self.horizontal_speed
    }

    /// Speed the controller is currently aiming for.
    pub fn target_speed(&self) -> f32 {
        self.speed
    }

    pub fn is_ungrounded(&self) -> bool {
        !self.logically_grounded
    }

    pub fn is_literally_grounded(&self) -> bool {
        self.literally_grounded
    }

    pub fn is_sprinting(&self) -> bool {
        self.is_sprinting
    }

    pub fn is_forwards_pressed(&self) -> bool {
        self.input.is_forwards_pressed()
    }

    pub fn is_crouched(&self) -> bool {
        self.is_crouched
    }

    /// Is the camera still moving between crouch and standing height?
    pub fn is_crouch_transitioning(&self) -> bool {
        let target = if self.is_crouched {
            self.config.crouch_height
        } else {
            self.config.standing_height
        };
        self.camera_height != target
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn landing_severity(&self) -> FootSoundType {
        self.landing
    }

    pub fn body_height(&self) -> f32 {
        self.body_height
    }

    pub fn camera_height(&self) -> f32 {
        self.camera_height
    }

    /// Camera pitch in degrees.
    pub fn camera_pitch(&self) -> f32 {
        self.camera_pitch
    }

    pub fn movement_state(&self) -> MovementState {
        self.movement_state
    }

    pub fn transition(&self) -> Option<&ClimbTransition> {
        self.transition.as_ref()
    }

    pub fn wall_hang(&self) -> Option<&WallHangState> {
        self.wall_hang.as_ref()
    }

    pub fn ledge_position(&self) -> Option<Vec3> {
        self.ledge_position
    }

    /// Lateral climbing axis along the current wall.
    pub fn wall_right(&self) -> Option<Vec3> {
        self.wall_normal.map(|n| n.cross(&-up()))
    }

    pub fn is_high_grab_ready(&self) -> bool {
        self.high_grab_ready
    }

    pub fn high_grab_cooldown_remaining(&self) -> Option<f32> {
        self.high_grab_cooldown
            .and_then(|task| self.scheduler.remaining(task))
    }

    /// Ledge points found while shuffling sideways on the current climb.
    pub fn climbing_points(&self) -> &[Vec3] {
        &self.climbing_points
    }
}
