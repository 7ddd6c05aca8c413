//! Movement intent component.
//!
//! Intents represent the desired movement from player input or AI. The
//! controller reads the intent once per fixed step; the jump flag is consumed
//! by the step that reads it so a single press produces a single jump.

use bevy::prelude::*;

/// Per-character player intent.
///
/// `move_x` and `crouch` are held values: they persist until changed.
/// `jump` is a one-shot request cleared by the next fixed step.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// let mut intent = MoveIntent::new();
/// intent.move_character(1.0, false, true);
/// assert!(intent.is_moving());
/// assert!(intent.jump);
///
/// // Values are clamped to [-1, 1]
/// intent.set_move(-3.0);
/// assert_eq!(intent.move_x, -1.0);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct MoveIntent {
    /// Horizontal movement intent (-1.0 = left, 1.0 = right).
    pub move_x: f32,
    /// Whether the character wants to crouch (and charge a jump).
    pub crouch: bool,
    /// Whether the character wants to jump this step.
    pub jump: bool,
}

impl MoveIntent {
    /// Create an idle intent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set every field at once.
    ///
    /// This mirrors the classic `Move(move, crouch, jump)` entry point. Call it
    /// from an input system before the fixed step runs.
    pub fn move_character(&mut self, move_x: f32, crouch: bool, jump: bool) {
        self.set_move(move_x);
        self.crouch = crouch;
        self.jump = jump;
    }

    /// Set horizontal movement intent (clamped to -1.0..1.0).
    ///
    /// NaN is treated as no input.
    pub fn set_move(&mut self, move_x: f32) {
        self.move_x = if move_x.is_nan() {
            0.0
        } else {
            move_x.clamp(-1.0, 1.0)
        };
    }

    /// Set crouch intent.
    pub fn set_crouch(&mut self, crouch: bool) {
        self.crouch = crouch;
    }

    /// Request a jump on the next fixed step.
    pub fn request_jump(&mut self) {
        self.jump = true;
    }

    /// Check if there is horizontal movement intent.
    pub fn is_moving(&self) -> bool {
        self.move_x.abs() > 0.001
    }

    /// Clear the one-shot jump request.
    pub fn consume_jump(&mut self) {
        self.jump = false;
    }

    /// Clear all intent.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
