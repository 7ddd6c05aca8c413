//! Character state and state marker components.
//!
//! [`CharacterState`] is the controller's own bookkeeping, mutated once per
//! fixed step and by the air control lockout. The marker components mirror
//! it for use in queries and are synced at the end of every step.

use bevy::prelude::*;

use crate::config::PlatformerConfig;
use crate::error::ConfigurationError;

/// Per-character controller state.
///
/// # Example
///
/// ```rust
/// use msg_platformer_controller::prelude::*;
///
/// let mut state = CharacterState::new(&PlatformerConfig::default());
/// assert!(state.facing_right);
/// assert!(!state.air_control_enabled);
///
/// state.flip();
/// assert!(!state.facing_right);
/// assert_eq!(state.facing_sign(), -1.0);
/// ```
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq)]
#[reflect(Component)]
pub struct CharacterState {
    /// Ground-mask geometry other than self overlaps the ground probe.
    pub grounded: bool,
    /// Ground-mask geometry other than self overlaps the wall probe.
    pub on_wall: bool,
    /// Current horizontal orientation.
    pub facing_right: bool,
    /// Airborne non-wall jumps since the character last touched ground.
    pub bonus_jumps_used: u32,
    /// Accumulated crouch charge (0.0-1.0).
    pub charge_level: f32,
    /// Whether horizontal steering is permitted while airborne.
    pub air_control_enabled: bool,
}

impl Default for CharacterState {
    fn default() -> Self {
        Self::new(&PlatformerConfig::default())
    }
}

impl CharacterState {
    /// Fresh state for a newly spawned character.
    pub fn new(config: &PlatformerConfig) -> Self {
        Self {
            grounded: false,
            on_wall: false,
            facing_right: true,
            bonus_jumps_used: 0,
            charge_level: 0.0,
            air_control_enabled: config.air_control_default,
        }
    }

    /// Toggle the facing direction.
    ///
    /// Calling it twice restores the original orientation.
    #[inline]
    pub fn flip(&mut self) {
        self.facing_right = !self.facing_right;
    }

    /// `1.0` when facing right, `-1.0` when facing left.
    #[inline]
    pub fn facing_sign(&self) -> f32 {
        if self.facing_right { 1.0 } else { -1.0 }
    }

    /// Whether horizontal input is applied this step.
    #[inline]
    pub fn can_steer(&self) -> bool {
        self.grounded || self.air_control_enabled
    }

    /// Whether an airborne non-wall jump is still available.
    #[inline]
    pub fn has_bonus_jump(&self, config: &PlatformerConfig) -> bool {
        self.bonus_jumps_used < config.max_bonus_jumps
    }
}

/// Entity whose `Transform` x scale is negated when the character flips.
///
/// Without this component the character's own `Transform` is flipped. Point it
/// at a sprite child to keep physics colliders unscaled.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct FacingVisual(pub Entity);

/// Marker component placed on characters that passed initialization.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct ControllerReady;

/// Marker component placed on characters that failed initialization.
///
/// Faulted characters are skipped by every controller system.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct ControllerFault(pub ConfigurationError);

/// Marker component indicating the character is grounded.
///
/// This is a marker component - it has no data, just indicates state.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Grounded;

/// Marker component indicating the character is airborne.
///
/// Mutually exclusive with [`Grounded`].
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct Airborne;

/// Marker component indicating the wall probe touches geometry.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct OnWall;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_uses_config_air_control() {
        let state = CharacterState::new(&PlatformerConfig::default());
        assert!(!state.air_control_enabled);

        let state = CharacterState::new(&PlatformerConfig::player());
        assert!(state.air_control_enabled);
    }

    #[test]
    fn new_state_defaults() {
        let state = CharacterState::default();
        assert!(!state.grounded);
        assert!(!state.on_wall);
        assert!(state.facing_right);
        assert_eq!(state.bonus_jumps_used, 0);
        assert_eq!(state.charge_level, 0.0);
    }

    #[test]
    fn flip_is_a_toggle() {
        let mut state = CharacterState::default();
        state.flip();
        assert!(!state.facing_right);
        state.flip();
        assert!(state.facing_right);
    }

    #[test]
    fn can_steer_when_grounded_or_air_control() {
        let mut state = CharacterState::default();
        assert!(!state.can_steer());

        state.grounded = true;
        assert!(state.can_steer());

        state.grounded = false;
        state.air_control_enabled = true;
        assert!(state.can_steer());
    }

    #[test]
    fn bonus_jump_availability() {
        let config = PlatformerConfig::default();
        let mut state = CharacterState::default();
        assert!(state.has_bonus_jump(&config));
        state.bonus_jumps_used = 2;
        assert!(!state.has_bonus_jump(&config));
    }
}
