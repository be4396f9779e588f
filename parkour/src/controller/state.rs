use crate::collision::Vec3;
use crate::ledge::LedgeType;
use crate::scheduler::TaskHandle;

/// Which per-tick routines run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MovementState {
    #[default]
    General,
    Climbing,
}

/// An active climb. Exists only while the controller is climbing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClimbTransition {
    pub ledge_type: LedgeType,
    pub start_point: Vec3,
    pub end_point: Vec3,
    pub midway_reached: bool,
    pub complete: bool,
}

impl ClimbTransition {
    pub fn new(ledge_type: LedgeType, start_point: Vec3, end_point: Vec3) -> Self {
        Self {
            ledge_type,
            start_point,
            end_point,
            midway_reached: false,
            complete: false,
        }
    }

    /// Directly above (or below) the start, at the end point's height.
    pub fn midway_point(&self) -> Vec3 {
        Vec3::new(self.start_point.x, self.end_point.y, self.start_point.z)
    }

    /// Move both ends by the same displacement.
    pub fn shift(&mut self, displacement: &Vec3) {
        self.start_point += displacement;
        self.end_point += displacement;
    }
}

/// High-ledge hang bookkeeping. Exists only while a high transition is active.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallHangState {
    pub is_hanging: bool,
    pub is_climbing_over: bool,
    /// Position of the body once fully hanging.
    pub hang_origin: Vec3,
    /// Displacement from the grab position into the hang pose.
    pub offset: Vec3,
    pub enter_hang_elapsed: f32,
    pub peek_elapsed: f32,
    pub input_delay_complete: bool,
    /// Skip the input delay once hanging (sprinting grabs are quicker than falling ones).
    pub skip_input_delay: bool,
    pub input_delay_task: Option<TaskHandle>,
}

impl WallHangState {
    pub fn new(offset: Vec3, skip_input_delay: bool) -> Self {
        Self {
            is_hanging: false,
            is_climbing_over: false,
            hang_origin: Vec3::zeros(),
            offset,
            enter_hang_elapsed: 0.0,
            peek_elapsed: 0.0,
            input_delay_complete: false,
            skip_input_delay,
            input_delay_task: None,
        }
    }
}

/// Work the controller defers through its scheduler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredAction {
    CompleteWallHangInputDelay,
    ReadyHighGrab,
}
