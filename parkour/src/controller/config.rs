use crate::collision::Vec3;
use crate::constants::*;
use crate::layers::{LayerMask, default_ground_layers};
use crate::wall_climber::WallClimberConfig;

/// Tuning for [`super::FirstPersonController`].
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    // Movement
    pub move_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub speed_change_rate: f32,
    pub rotation_speed: f32,
    pub sprint_available: bool,

    // Jump and fall
    pub jump_height: f32,
    pub gravity: f32,
    pub jump_timeout: f32,
    pub fall_timeout: f32,
    pub terminal_velocity: f32,

    // Grounding
    pub grounded_offset: f32,
    pub grounded_radius: f32,
    pub ground_layers: LayerMask,

    // Landing severity, as downward speeds at contact.
    pub moderate_landing_speed: f32,
    pub heavy_landing_speed: f32,
    pub nasty_landing_speed: f32,

    // Body and crouch
    pub body_radius: f32,
    pub standing_height: f32,
    pub crouch_height: f32,
    pub crouch_available: bool,
    /// Widens the overhead clearance box used before standing up.
    pub crouch_cast_tweak: f32,
    pub camera_height_transition_speed: f32,

    // Camera
    pub top_clamp: f32,
    pub bottom_clamp: f32,

    // Climbing
    pub climb_enabled: bool,
    pub low_transition_speed: f32,
    pub mid_transition_speed: f32,
    pub high_transition_speed: f32,
    /// Local point (roughly the hands) that is brought onto a high ledge when hanging.
    /// High ledges cannot be grabbed without it.
    pub wall_hang_origin: Option<Vec3>,
    pub enter_hang_duration: f32,
    pub wall_hang_input_delay: f32,
    pub high_grab_cooldown: f32,
    pub peek_duration: f32,
    pub peek_offset: f32,
    pub wall_hang_climb_speed: f32,

    pub wall_climber: WallClimberConfig,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            move_speed: DEFAULT_MOVE_SPEED,
            sprint_speed: DEFAULT_SPRINT_SPEED,
            crouch_speed: DEFAULT_CROUCH_SPEED,
            speed_change_rate: DEFAULT_SPEED_CHANGE_RATE,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            sprint_available: true,

            jump_height: DEFAULT_JUMP_HEIGHT,
            gravity: DEFAULT_GRAVITY,
            jump_timeout: DEFAULT_JUMP_TIMEOUT,
            fall_timeout: DEFAULT_FALL_TIMEOUT,
            terminal_velocity: DEFAULT_TERMINAL_VELOCITY,

            grounded_offset: DEFAULT_GROUNDED_OFFSET,
            grounded_radius: DEFAULT_GROUNDED_RADIUS,
            ground_layers: default_ground_layers(),

            moderate_landing_speed: DEFAULT_MODERATE_LANDING_SPEED,
            heavy_landing_speed: DEFAULT_HEAVY_LANDING_SPEED,
            nasty_landing_speed: DEFAULT_NASTY_LANDING_SPEED,

            body_radius: DEFAULT_BODY_RADIUS,
            standing_height: DEFAULT_STANDING_HEIGHT,
            crouch_height: DEFAULT_CROUCH_HEIGHT,
            crouch_available: true,
            crouch_cast_tweak: 0.0,
            camera_height_transition_speed: DEFAULT_CAMERA_HEIGHT_TRANSITION_SPEED,

            top_clamp: DEFAULT_TOP_CLAMP,
            bottom_clamp: DEFAULT_BOTTOM_CLAMP,

            climb_enabled: true,
            low_transition_speed: DEFAULT_LOW_TRANSITION_SPEED,
            mid_transition_speed: DEFAULT_MID_TRANSITION_SPEED,
            high_transition_speed: DEFAULT_HIGH_TRANSITION_SPEED,
            wall_hang_origin: Some(Vec3::new(0.0, 1.8, -0.55)),
            enter_hang_duration: DEFAULT_ENTER_HANG_DURATION,
            wall_hang_input_delay: DEFAULT_WALL_HANG_INPUT_DELAY,
            high_grab_cooldown: DEFAULT_HIGH_GRAB_COOLDOWN,
            peek_duration: DEFAULT_PEEK_DURATION,
            peek_offset: DEFAULT_PEEK_OFFSET,
            wall_hang_climb_speed: DEFAULT_WALL_HANG_CLIMB_SPEED,

            wall_climber: WallClimberConfig::default(),
        }
    }
}
