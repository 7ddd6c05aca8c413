//! Controller configuration components.
//!
//! This module defines the tuning of a platformer character: run speed, jump
//! forces, bonus jumps, crouch charging, probe radii and the wall jump lockout.

use std::time::Duration;

use bevy::prelude::*;

use crate::error::ConfigurationError;

/// Radius of the overlap circle used to determine if grounded.
pub const GROUNDED_RADIUS: f32 = 0.2;

/// Radius of the overlap circle used to determine if the character can stand up.
pub const CEILING_RADIUS: f32 = 0.01;

/// Collision filter selecting which bodies count as "ground".
///
/// The same mask is used for the ground, wall and ceiling probes. Each bit is
/// a collision group; a body is considered if any of its membership bits is
/// set in the mask.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroundMask(pub u32);

impl GroundMask {
    /// Every collision group counts as ground.
    pub const ALL: GroundMask = GroundMask(u32::MAX);
    /// Nothing counts as ground.
    pub const NONE: GroundMask = GroundMask(0);

    /// Mask made of a single group index (`0..32`).
    pub fn group(index: u32) -> Self {
        GroundMask(1u32.checked_shl(index).unwrap_or(0))
    }

    /// Raw bits of the mask.
    #[inline]
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether a body with the given membership bits passes the mask.
    #[inline]
    pub fn accepts(self, memberships: u32) -> bool {
        self.0 & memberships != 0
    }

    /// Union of two masks.
    pub fn with(self, other: GroundMask) -> Self {
        GroundMask(self.0 | other.0)
    }
}

impl Default for GroundMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// Configuration parameters for a platformer character.
///
/// All values are read at spawn time and treated as immutable afterwards.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct PlatformerConfig {
    // === Movement Settings ===
    /// The fastest the character can travel on the x axis (units/second).
    pub max_speed: f32,

    /// Fraction of `max_speed` applied to crouching movement (0.0-1.0).
    pub crouch_speed_factor: f32,

    /// Whether the character can steer while airborne before the first wall jump.
    ///
    /// A wall jump always turns air control back on once its lockout expires.
    pub air_control_default: bool,

    // === Jump Settings ===
    /// Upward impulse of a plain jump, a bonus jump and a wall jump.
    pub jump_force: f32,

    /// Upward impulse of a fully charged jump.
    pub max_jump_force: f32,

    /// Number of airborne (non wall) jumps allowed before landing again.
    pub max_bonus_jumps: u32,

    /// Charge gained per second of grounded crouching (charge is capped at 1.0).
    pub charge_speed: f32,

    /// How long air control stays disabled after a wall jump (real time).
    pub wall_jump_lockout: Duration,

    // === Probe Settings ===
    /// Collision filter for every probe.
    pub ground_mask: GroundMask,

    /// Radius of the ground probe overlap circle.
    pub grounded_probe_radius: f32,

    /// Radius of the wall probe overlap circle.
    pub wall_check_radius: f32,

    /// Radius of the ceiling probe overlap circle.
    pub ceiling_probe_radius: f32,
}

impl Default for PlatformerConfig {
    fn default() -> Self {
        Self {
            // Movement settings
            max_speed: 10.0,
            crouch_speed_factor: 0.36,
            air_control_default: false,

            // Jump settings
            jump_force: 400.0,
            max_jump_force: 800.0,
            max_bonus_jumps: 2,
            charge_speed: 1.0,
            wall_jump_lockout: Duration::from_millis(400),

            // Probe settings
            ground_mask: GroundMask::ALL,
            grounded_probe_radius: GROUNDED_RADIUS,
            wall_check_radius: 0.2,
            ceiling_probe_radius: CEILING_RADIUS,
        }
    }
}

impl PlatformerConfig {
    /// Create a config optimized for responsive player control.
    ///
    /// Same as the default but with air control available from the start.
    pub fn player() -> Self {
        Self {
            air_control_default: true,
            ..default()
        }
    }

    /// Upward impulse for a jump at the given charge level.
    ///
    /// Linear interpolation between `jump_force` (charge 0) and
    /// `max_jump_force` (charge 1). The charge is clamped to `[0, 1]`.
    #[inline]
    pub fn charged_jump_force(&self, charge: f32) -> f32 {
        let t = charge.clamp(0.0, 1.0);
        // Exact at both endpoints.
        self.jump_force * (1.0 - t) + self.max_jump_force * t
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigurationError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigurationError::InvalidParameter {
                    name,
                    reason: "must be finite and non-negative",
                })
            }
        }

        non_negative("max_speed", self.max_speed)?;
        non_negative("jump_force", self.jump_force)?;
        non_negative("max_jump_force", self.max_jump_force)?;
        non_negative("charge_speed", self.charge_speed)?;
        non_negative("grounded_probe_radius", self.grounded_probe_radius)?;
        non_negative("wall_check_radius", self.wall_check_radius)?;
        non_negative("ceiling_probe_radius", self.ceiling_probe_radius)?;

        if !(0.0..=1.0).contains(&self.crouch_speed_factor) {
            return Err(ConfigurationError::InvalidParameter {
                name: "crouch_speed_factor",
                reason: "must be within [0, 1]",
            });
        }

        Ok(())
    }

    /// Builder: set max speed.
    pub fn with_max_speed(mut self, max_speed: f32) -> Self {
        self.max_speed = max_speed;
        self
    }

    /// Builder: set the crouch speed factor.
    pub fn with_crouch_speed_factor(mut self, factor: f32) -> Self {
        self.crouch_speed_factor = factor;
        self
    }

    /// Builder: set whether air control is available before the first wall jump.
    pub fn with_air_control(mut self, enabled: bool) -> Self {
        self.air_control_default = enabled;
        self
    }

    /// Builder: set plain and fully charged jump forces.
    pub fn with_jump_forces(mut self, jump_force: f32, max_jump_force: f32) -> Self {
        self.jump_force = jump_force;
        self.max_jump_force = max_jump_force;
        self
    }

    /// Builder: set the number of bonus jumps.
    pub fn with_bonus_jumps(mut self, count: u32) -> Self {
        self.max_bonus_jumps = count;
        self
    }

    /// Builder: set charge speed (charge per second).
    pub fn with_charge_speed(mut self, speed: f32) -> Self {
        self.charge_speed = speed;
        self
    }

    /// Builder: set the wall jump air control lockout.
    pub fn with_wall_jump_lockout(mut self, duration: Duration) -> Self {
        self.wall_jump_lockout = duration;
        self
    }

    /// Builder: set the ground mask.
    pub fn with_ground_mask(mut self, mask: GroundMask) -> Self {
        self.ground_mask = mask;
        self
    }

    /// Builder: set the radii of the ground, wall and ceiling probes.
    pub fn with_probe_radii(mut self, ground: f32, wall: f32, ceiling: f32) -> Self {
        self.grounded_probe_radius = ground;
        self.wall_check_radius = wall;
        self.ceiling_probe_radius = ceiling;
        self
    }
}
