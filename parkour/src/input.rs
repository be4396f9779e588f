use crate::collision::types::Vec2;
use crate::constants::FORWARD_PRESSED_THRESHOLD;

/// Player intent for one frame, as sampled by whatever input layer drives the character.
///
/// `move_axis.x` is strafe (+ right), `move_axis.y` is forward (+ forward).
/// `jump` is an edge: the controller consumes it once per tick whether or not it was used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InputSnapshot {
    pub move_axis: Vec2,
    pub look: Vec2,
    pub jump: bool,
    pub sprint: bool,
    pub crouch: bool,
    /// Scale movement speed by stick deflection instead of treating any input as full.
    pub analog_movement: bool,
    /// Look deltas come from a mouse and are not scaled by the frame time.
    pub look_is_mouse_delta: bool,
}

impl Default for InputSnapshot {
    fn default() -> Self {
        Self {
            move_axis: Vec2::zeros(),
            look: Vec2::zeros(),
            jump: false,
            sprint: false,
            crouch: false,
            analog_movement: false,
            look_is_mouse_delta: true,
        }
    }
}

impl InputSnapshot {
    /// Read and reset the jump edge.
    pub fn consume_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    pub fn is_forwards_pressed(&self) -> bool {
        self.move_axis.y >= FORWARD_PRESSED_THRESHOLD
    }

    pub fn has_move(&self) -> bool {
        self.move_axis != Vec2::zeros()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jump_is_consumed_once() {
        let mut input = InputSnapshot {
            jump: true,
            ..Default::default()
        };
        assert!(input.consume_jump());
        assert!(!input.consume_jump());
    }

    #[test]
    fn forwards_requires_full_deflection() {
        let mut input = InputSnapshot::default();
        input.move_axis = Vec2::new(0.0, 0.5);
        assert!(!input.is_forwards_pressed());
        input.move_axis = Vec2::new(0.0, 1.0);
        assert!(input.is_forwards_pressed());
    }
}
