//! Per-tick input sampling
//!
//! The host feeds key events (or an analog axis) into the [`InputSampler`]
//! as they arrive; once per tick the controller takes an immutable
//! [`FrameInput`] snapshot. Taking the snapshot consumes the jump edges,
//! so an edge is observed by exactly one tick.

use crate::input::buttons::{ButtonState, ControlKey};

/// Immutable snapshot of the input relevant to one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInput {
    /// Horizontal axis in [-1, 1]. Negative is left.
    pub x: f32,
    /// Jump was pressed since the previous tick.
    pub jump_down: bool,
    /// Jump is currently held. Sampled for observers; the solver itself
    /// keys off the edges.
    pub jump_held: bool,
    /// Jump was released since the previous tick.
    pub jump_up: bool,
}

impl FrameInput {
    /// No input at all.
    pub const NEUTRAL: FrameInput = FrameInput {
        x: 0.0,
        jump_down: false,
        jump_held: false,
        jump_up: false,
    };
}

/// Accumulates raw device state between ticks and produces the per-tick
/// [`FrameInput`] snapshot.
///
/// Digital left/right keys synthesize a -1/0/+1 axis and take precedence
/// over the analog axis while held, so keyboard input wins over a drifting
/// gamepad stick.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    axis: f32,
    move_left: bool,
    move_right: bool,
    jump: ButtonState,
}

impl InputSampler {
    /// Create a sampler with everything released.
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key press or release event.
    ///
    /// Returns `true` if the key was a control key and was handled.
    pub fn handle_key(&mut self, key: ControlKey, pressed: bool) -> bool {
        match key {
            ControlKey::MoveLeft => {
                self.move_left = pressed;
                true
            }
            ControlKey::MoveRight => {
                self.move_right = pressed;
                true
            }
            ControlKey::Jump => {
                self.jump.set(pressed);
                true
            }
        }
    }

    /// Set the analog horizontal axis, clamped to [-1, 1].
    pub fn set_axis(&mut self, value: f32) {
        self.axis = value.clamp(-1.0, 1.0);
    }

    /// The effective horizontal axis: digital keys while any are held,
    /// the analog axis otherwise.
    pub fn horizontal_axis(&self) -> f32 {
        if self.move_left || self.move_right {
            ((self.move_right as i32) - (self.move_left as i32)) as f32
        } else {
            self.axis
        }
    }

    /// The current jump button state.
    pub fn jump(&self) -> &ButtonState {
        &self.jump
    }

    /// Take the snapshot for this tick and consume the jump edges.
    pub fn sample(&mut self) -> FrameInput {
        let input = FrameInput {
            x: self.horizontal_axis(),
            jump_down: self.jump.pressed(),
            jump_held: self.jump.held(),
            jump_up: self.jump.released(),
        };
        self.jump.clear_edges();
        input
    }

    /// Reset all input state to released.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
