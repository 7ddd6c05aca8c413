//! Air control lockout after a wall jump.
//!
//! A wall jump disables air control at once and schedules its restoration
//! after a fixed amount of real time. The timer is ticked from `Time<Real>`,
//! independently of the fixed-step loop, and lives on the character entity so
//! that despawning the character discards any pending restore.
//!
//! Rapid repeated wall jumps coalesce: scheduling while a restore is pending
//! cancels it and starts the full duration again from the latest call.

use std::time::Duration;

use bevy::prelude::*;

use crate::state::CharacterState;

/// Pending air control restore for one character.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
pub struct AirControlLockout {
    pending: Option<Timer>,
}

impl AirControlLockout {
    /// Disable air control now and restore it after `duration`.
    ///
    /// Replaces any restore that is still pending.
    pub fn schedule(&mut self, state: &mut CharacterState, duration: Duration) {
        state.air_control_enabled = false;
        self.pending = Some(Timer::new(duration, TimerMode::Once));
    }

    /// Drop a pending restore without touching air control.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Whether a restore is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Time left until the pending restore fires.
    pub fn remaining(&self) -> Option<Duration> {
        self.pending.as_ref().map(Timer::remaining)
    }

    /// Advance the pending restore by `delta` of real time.
    ///
    /// Re-enables air control and returns `true` on the tick the lockout
    /// expires. Returns `false` when nothing is pending or time remains.
    pub fn tick(&mut self, state: &mut CharacterState, delta: Duration) -> bool {
        let Some(timer) = self.pending.as_mut() else {
            return false;
        };

        timer.tick(delta);
        if !timer.finished() {
            return false;
        }

        self.pending = None;
        state.air_control_enabled = true;
        true
    }
}
