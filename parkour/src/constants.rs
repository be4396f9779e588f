//! Default tuning values.
//!
//! Every value here seeds a `Default` config struct and can be overridden per character.
//! Units are meters, seconds and meters per second unless stated otherwise.

/// Walking speed (m/s).
pub const DEFAULT_MOVE_SPEED: f32 = 4.0;

/// Sprinting speed (m/s).
pub const DEFAULT_SPRINT_SPEED: f32 = 6.0;

/// Speed while crouched or while the crouch camera transition is running (m/s).
pub const DEFAULT_CROUCH_SPEED: f32 = 2.0;

/// Acceleration/deceleration factor of the horizontal speed smoothing.
pub const DEFAULT_SPEED_CHANGE_RATE: f32 = 10.0;

/// Horizontal speeds within this band of the target snap to it.
pub const SPEED_OFFSET: f32 = 0.1;

/// Look sensitivity (degrees per input unit).
pub const DEFAULT_ROTATION_SPEED: f32 = 1.0;

/// Look inputs with a squared length below this are ignored.
pub const LOOK_THRESHOLD: f32 = 0.01;

/// Jump apex height (meters).
pub const DEFAULT_JUMP_HEIGHT: f32 = 1.2;

/// Gravity acceleration (m/s^2). Negative is down.
pub const DEFAULT_GRAVITY: f32 = -15.0;

/// Time after a jump before another jump is accepted (seconds).
pub const DEFAULT_JUMP_TIMEOUT: f32 = 0.1;

/// Time off the ground before the character counts as ungrounded (seconds).
pub const DEFAULT_FALL_TIMEOUT: f32 = 0.15;

/// Maximum falling speed (m/s).
pub const DEFAULT_TERMINAL_VELOCITY: f32 = 53.0;

/// Vertical velocity held while touching the ground so the body stays glued to slopes.
pub const GROUND_STICK_VELOCITY: f32 = -2.0;

/// Offset of the grounded probe. Negative values move the probe up from the feet.
pub const DEFAULT_GROUNDED_OFFSET: f32 = -0.14;

/// Radius of the grounded probe. Should match the body radius.
pub const DEFAULT_GROUNDED_RADIUS: f32 = 0.5;

/// Landing severity thresholds (downward speed at contact, m/s).
pub const DEFAULT_MODERATE_LANDING_SPEED: f32 = 5.0;
pub const DEFAULT_HEAVY_LANDING_SPEED: f32 = 9.0;
pub const DEFAULT_NASTY_LANDING_SPEED: f32 = 15.0;

/// Body radius (meters).
pub const DEFAULT_BODY_RADIUS: f32 = 0.5;

/// Standing body height (meters).
pub const DEFAULT_STANDING_HEIGHT: f32 = 1.86;

/// Crouched body height (meters).
pub const DEFAULT_CROUCH_HEIGHT: f32 = 1.0;

/// Camera height change rate during crouch transitions (m/s).
pub const DEFAULT_CAMERA_HEIGHT_TRANSITION_SPEED: f32 = 2.0;

/// Camera pitch limits (degrees).
pub const DEFAULT_TOP_CLAMP: f32 = 90.0;
pub const DEFAULT_BOTTOM_CLAMP: f32 = -90.0;

/// Climb transition speeds per ledge type (m/s).
pub const DEFAULT_LOW_TRANSITION_SPEED: f32 = 1.0;
pub const DEFAULT_MID_TRANSITION_SPEED: f32 = 1.0;
pub const DEFAULT_HIGH_TRANSITION_SPEED: f32 = 1.0;

/// Time to pull into the hang pose after grabbing a high ledge (seconds).
pub const DEFAULT_ENTER_HANG_DURATION: f32 = 0.2;

/// Delay before hang inputs are accepted after a falling grab (seconds).
pub const DEFAULT_WALL_HANG_INPUT_DELAY: f32 = 0.2;

/// Time after leaving a high ledge before another high grab is allowed (seconds).
pub const DEFAULT_HIGH_GRAB_COOLDOWN: f32 = 0.33;

/// Time to rise fully into the peek pose (seconds).
pub const DEFAULT_PEEK_DURATION: f32 = 0.33;

/// Height gained by peeking over a ledge (meters).
pub const DEFAULT_PEEK_OFFSET: f32 = 1.0;

/// Lateral speed while hanging (m/s).
pub const DEFAULT_WALL_HANG_CLIMB_SPEED: f32 = 1.0;

/// Lateral input below this magnitude does not move a hanging character.
pub const HORIZONTAL_CLIMB_INPUT_DEADZONE: f32 = 0.1;

/// Forward input at or above this counts as "forward pressed".
pub const FORWARD_PRESSED_THRESHOLD: f32 = 0.99;

/// Vertical distance between two forward wall casts (meters).
pub const DEFAULT_VERTICAL_CAST_STEP: f32 = 0.05;

/// Height above a wall point probed for open space (meters).
pub const DEFAULT_VERTICAL_LEDGE_SPACING: f32 = 0.1;

/// Depth past a wall point probed for open space (meters).
pub const DEFAULT_ONTO_LEDGE_SPACING: f32 = 0.1;

/// Lower bound on the standalone climb mover's speed (m/s).
pub const DEFAULT_MIN_TRANSITION_SPEED: f32 = 2.0;

/// Maximum distance between a tier detector and the ledge it reports (meters).
pub const DEFAULT_MAX_LEDGE_DISTANCE_FROM_DETECTOR: f32 = 0.5;

/// Clearance added above a detected surface before probing for open space (meters).
pub const LEDGE_OPENING_CLEARANCE: f32 = 0.01;

/// Number of samples scanned for ledge points during a lateral hang move.
pub const HORIZONTAL_SCAN_SAMPLES: usize = 3;

/// Size of the wall climber's debug marker pool.
pub const DEFAULT_MAX_DEBUG_MARKERS: usize = 20;

/// Fixed simulation step for climb motion (seconds).
pub const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 50.0;

/// Upper bound on fixed steps per frame, to avoid spiralling after a long hitch.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;
