//! Environment sampling.
//!
//! Every fixed step the ground and wall probes are tested with circle overlap
//! queries against the ground mask. The ceiling probe is only tested on demand
//! by the resolver, see [`ceiling_blocked`].

use bevy::prelude::*;

use crate::animation::{AnimationSink, params};
use crate::backend::{OverlapRequest, PlatformerPhysicsBackend};
use crate::config::PlatformerConfig;
use crate::state::CharacterState;

/// World-space positions of the sampled probes of a character.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProbePositions {
    /// Ground probe position.
    pub ground: Vec2,
    /// Wall probe position.
    pub wall: Vec2,
}

/// Result of one environment sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnvironmentSample {
    /// Something other than self overlaps the ground probe.
    pub grounded: bool,
    /// Something other than self overlaps the wall probe.
    pub on_wall: bool,
}

impl EnvironmentSample {
    /// Derive the sample from raw overlap hits.
    pub fn from_hits(self_entity: Entity, ground_hits: &[Entity], wall_hits: &[Entity]) -> Self {
        Self {
            grounded: has_support(ground_hits, self_entity),
            on_wall: has_support(wall_hits, self_entity),
        }
    }
}

/// Bodies that produced the last ground and wall decisions.
///
/// Self is already filtered out. Useful to know which platform the character
/// stands on or which wall it clings to.
#[derive(Component, Reflect, Debug, Clone, Default, PartialEq)]
#[reflect(Component)]
pub struct ProbeContacts {
    /// Bodies overlapping the ground probe.
    pub ground: Vec<Entity>,
    /// Bodies overlapping the wall probe.
    pub wall: Vec<Entity>,
}

impl ProbeContacts {
    /// Build contacts from raw hits, dropping self.
    pub fn from_hits(self_entity: Entity, ground_hits: &[Entity], wall_hits: &[Entity]) -> Self {
        let others = |hits: &[Entity]| {
            hits.iter()
                .copied()
                .filter(|&e| e != self_entity)
                .collect::<Vec<_>>()
        };
        Self {
            ground: others(ground_hits),
            wall: others(wall_hits),
        }
    }

    /// First body found under the feet, if any.
    pub fn ground_entity(&self) -> Option<Entity> {
        self.ground.first().copied()
    }

    /// First body found at the wall probe, if any.
    pub fn wall_entity(&self) -> Option<Entity> {
        self.wall.first().copied()
    }
}

/// Whether any hit is a body other than `self_entity`.
#[inline]
pub fn has_support(hits: &[Entity], self_entity: Entity) -> bool {
    hits.iter().any(|&e| e != self_entity)
}

/// Apply a sample to the character state and publish it to the animator.
///
/// Resets the bonus jump counter when grounded. `Ground` and `vSpeed` are
/// written on every call, before the resolver runs.
pub fn apply_sample(
    state: &mut CharacterState,
    anim: &mut impl AnimationSink,
    sample: EnvironmentSample,
    vertical_velocity: f32,
) {
    state.grounded = sample.grounded;
    if state.grounded {
        state.bonus_jumps_used = 0;
    }
    state.on_wall = sample.on_wall;

    anim.set_bool(params::GROUND, state.grounded);
    anim.set_float(params::V_SPEED, vertical_velocity);
}

/// Query the ground and wall probes through a backend.
pub fn sample_probes<B: PlatformerPhysicsBackend>(
    world: &mut World,
    entity: Entity,
    probes: ProbePositions,
    config: &PlatformerConfig,
) -> (EnvironmentSample, ProbeContacts) {
    let ground_hits = OverlapRequest::new(
        probes.ground,
        config.grounded_probe_radius,
        config.ground_mask,
    )
    .run::<B>(world);

    let wall_hits =
        OverlapRequest::new(probes.wall, config.wall_check_radius, config.ground_mask)
            .run::<B>(world);

    (
        EnvironmentSample::from_hits(entity, &ground_hits, &wall_hits),
        ProbeContacts::from_hits(entity, &ground_hits, &wall_hits),
    )
}

/// Single-shot ceiling test used when a crouching character tries to stand.
///
/// Any hit blocks standing up.
pub fn ceiling_blocked<B: PlatformerPhysicsBackend>(
    world: &mut World,
    ceiling_probe: Vec2,
    config: &PlatformerConfig,
) -> bool {
    !OverlapRequest::new(ceiling_probe, config.ceiling_probe_radius, config.ground_mask)
        .run::<B>(world)
        .is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationParameters;

    fn me() -> Entity {
        Entity::from_raw(1)
    }

    fn floor() -> Entity {
        Entity::from_raw(2)
    }

    #[test]
    fn self_only_hit_is_not_support() {
        assert!(!has_support(&[me()], me()));
        assert!(!has_support(&[], me()));
        assert!(has_support(&[me(), floor()], me()));
    }

    #[test]
    fn sample_from_hits() {
        let sample = EnvironmentSample::from_hits(me(), &[floor()], &[me()]);
        assert!(sample.grounded);
        assert!(!sample.on_wall);
    }

    #[test]
    fn contacts_drop_self() {
        let contacts = ProbeContacts::from_hits(me(), &[me(), floor()], &[me()]);
        assert_eq!(contacts.ground, vec![floor()]);
        assert!(contacts.wall.is_empty());
        assert_eq!(contacts.ground_entity(), Some(floor()));
        assert_eq!(contacts.wall_entity(), None);
    }

    #[test]
    fn grounded_sample_resets_bonus_jumps() {
        let mut state = CharacterState {
            bonus_jumps_used: 2,
            ..default()
        };
        let mut anim = AnimationParameters::new();

        apply_sample(
            &mut state,
            &mut anim,
            EnvironmentSample {
                grounded: true,
                on_wall: false,
            },
            -1.5,
        );

        assert!(state.grounded);
        assert_eq!(state.bonus_jumps_used, 0);
        assert!(anim.get_bool(params::GROUND));
        assert_eq!(anim.float(params::V_SPEED), Some(-1.5));
    }

    #[test]
    fn airborne_sample_keeps_bonus_jumps() {
        let mut state = CharacterState {
            grounded: true,
            bonus_jumps_used: 1,
            ..default()
        };
        let mut anim = AnimationParameters::new();

        apply_sample(
            &mut state,
            &mut anim,
            EnvironmentSample {
                grounded: false,
                on_wall: true,
            },
            3.0,
        );

        assert!(!state.grounded);
        assert!(state.on_wall);
        assert_eq!(state.bonus_jumps_used, 1);
        assert!(!anim.get_bool(params::GROUND));
        assert_eq!(anim.float(params::V_SPEED), Some(3.0));
    }
}
