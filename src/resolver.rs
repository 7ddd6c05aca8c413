//! Jump and movement resolution.
//!
//! [`resolve_step`] is the per-fixed-step decision logic of the controller. It
//! runs after the environment sample and turns the current [`MoveIntent`] into
//! velocity and impulse commands on a [`CharacterBody`], animation parameters
//! and updated [`CharacterState`].
//!
//! The branches run in a fixed order:
//!
//! 1. crouch release guard (ceiling test)
//! 2. horizontal movement and facing flip
//! 3. wall jump, else 4. bonus jump
//! 5. grounded or charged jump
//! 6. charge accumulation
//!
//! Nothing in here depends on the ECS, so any physics engine or animator can
//! drive it through the two traits.

use bevy::prelude::*;

use crate::animation::{AnimationSink, params};
use crate::config::PlatformerConfig;
use crate::intent::MoveIntent;
use crate::lockout::AirControlLockout;
use crate::state::CharacterState;

/// The rigid body side of a character, as seen by the resolver.
pub trait CharacterBody {
    /// Current linear velocity.
    fn velocity(&self) -> Vec2;

    /// Overwrite the linear velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Queue an impulse for the next physics step.
    fn add_impulse(&mut self, impulse: Vec2);

    /// Negate the horizontal scale of the character's visual.
    fn flip_visual(&mut self);

    /// Whether geometry above the head prevents standing up.
    ///
    /// Only called while a crouching character tries to stand.
    fn ceiling_blocked(&mut self) -> bool;
}

/// Which jump fired during a step.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpKind {
    /// Jump off a wall while airborne.
    Wall,
    /// Airborne jump consuming a bonus jump.
    Bonus,
    /// Plain jump from the ground.
    Grounded,
    /// Jump from the ground carrying crouch charge.
    Charged,
}

/// Summary of what a step did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepReport {
    /// Crouch state written to the animator.
    pub crouching: bool,
    /// Horizontal input was applied.
    pub steered: bool,
    /// Number of facing flips (0, 1 or 2).
    pub flips: u32,
    /// Airborne jump that fired, if any.
    pub air_jump: Option<JumpKind>,
    /// Grounded or charged jump that fired, if any.
    pub ground_jump: Option<JumpKind>,
    /// Sum of impulses queued this step.
    pub impulse: Vec2,
}

impl StepReport {
    /// Whether any jump fired.
    pub fn jumped(&self) -> bool {
        self.air_jump.is_some() || self.ground_jump.is_some()
    }
}

/// Toggle facing and mirror the visual.
pub fn flip(state: &mut CharacterState, body: &mut impl CharacterBody) {
    state.flip();
    body.flip_visual();
}

/// Resolve one fixed step of player intent.
///
/// `fixed_dt` is the duration of the fixed step in seconds, used for charge
/// accumulation.
pub fn resolve_step(
    state: &mut CharacterState,
    lockout: &mut AirControlLockout,
    config: &PlatformerConfig,
    intent: &MoveIntent,
    fixed_dt: f32,
    body: &mut impl CharacterBody,
    anim: &mut impl AnimationSink,
) -> StepReport {
    let mut report = StepReport::default();
    let jump = intent.jump;

    // The previous step's Crouch flag decides whether standing up must be checked.
    let mut crouch = intent.crouch;
    if !crouch && anim.get_bool(params::CROUCH) && body.ceiling_blocked() {
        crouch = true;
    }
    anim.set_bool(params::CROUCH, crouch);
    report.crouching = crouch;

    if state.can_steer() {
        let movement = if crouch {
            intent.move_x * config.crouch_speed_factor
        } else {
            intent.move_x
        };

        anim.set_float(params::SPEED, movement.abs());

        let velocity = body.velocity();
        body.set_velocity(Vec2::new(movement * config.max_speed, velocity.y));
        report.steered = true;

        if (movement > 0.0 && !state.facing_right) || (movement < 0.0 && state.facing_right) {
            flip(state, body);
            report.flips += 1;
        }
    }

    if jump && state.on_wall && !state.grounded {
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(velocity.x, 0.0));

        // Push away from the wall the character is facing.
        let impulse = Vec2::new(
            -0.5 * config.jump_force * state.facing_sign(),
            config.jump_force,
        );
        body.add_impulse(impulse);
        report.impulse += impulse;

        flip(state, body);
        report.flips += 1;

        lockout.schedule(state, config.wall_jump_lockout);
        report.air_jump = Some(JumpKind::Wall);
    } else if jump && !state.grounded && !state.on_wall && state.has_bonus_jump(config) {
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(velocity.x, 0.0));

        let impulse = Vec2::new(0.0, config.jump_force);
        body.add_impulse(impulse);
        report.impulse += impulse;

        state.bonus_jumps_used += 1;
        report.air_jump = Some(JumpKind::Bonus);
    }

    let pressed_jump = jump && state.grounded && anim.get_bool(params::GROUND);
    let released_charge = state.grounded && !crouch && state.charge_level > 0.0;
    if pressed_jump || released_charge {
        state.grounded = false;
        anim.set_bool(params::GROUND, false);

        let impulse = Vec2::new(0.0, config.charged_jump_force(state.charge_level));
        body.add_impulse(impulse);
        report.impulse += impulse;

        report.ground_jump = Some(if state.charge_level > 0.0 {
            JumpKind::Charged
        } else {
            JumpKind::Grounded
        });
        state.charge_level = 0.0;
    }

    if crouch && state.grounded {
        state.charge_level = (state.charge_level + fixed_dt * config.charge_speed).min(1.0);
    }

    report
}
