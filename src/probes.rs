//! Probe points.
//!
//! A character carries three probe entities (usually children) whose global
//! positions are used for the ground, wall and ceiling overlap tests. They can
//! be supplied explicitly with [`CharacterProbes::new`] or found by name among
//! the character's children at spawn.

use bevy::prelude::*;

use crate::detection::ProbePositions;
use crate::error::{ConfigurationError, ProbeKind};

/// The probe entities of a character.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct CharacterProbes {
    /// Probe marking where to check if the character is grounded.
    pub ground: Entity,
    /// Probe marking where to check for walls.
    pub wall: Entity,
    /// Probe marking where to check for ceilings.
    pub ceiling: Entity,
}

impl CharacterProbes {
    /// Create probes from explicit entities.
    pub fn new(ground: Entity, wall: Entity, ceiling: Entity) -> Self {
        Self {
            ground,
            wall,
            ceiling,
        }
    }

    /// Get the entity of one probe.
    pub fn get(&self, kind: ProbeKind) -> Entity {
        match kind {
            ProbeKind::Ground => self.ground,
            ProbeKind::Wall => self.wall,
            ProbeKind::Ceiling => self.ceiling,
        }
    }

    /// Find the probes among the direct children of `entity`.
    ///
    /// Children are matched by `Name` (`GroundCheck`, `WallCheck`,
    /// `CeilingCheck`). Fails with the first probe that cannot be found.
    pub fn from_children(world: &World, entity: Entity) -> Result<Self, ConfigurationError> {
        let find = |kind: ProbeKind| -> Result<Entity, ConfigurationError> {
            let children: &[Entity] = world
                .get::<Children>(entity)
                .map(|children| &children[..])
                .unwrap_or(&[]);
            children
                .iter()
                .copied()
                .find(|&child| {
                    world
                        .get::<Name>(child)
                        .is_some_and(|name| name.as_str() == kind.child_name())
                })
                .ok_or(ConfigurationError::MissingProbe(kind))
        };

        Ok(Self {
            ground: find(ProbeKind::Ground)?,
            wall: find(ProbeKind::Wall)?,
            ceiling: find(ProbeKind::Ceiling)?,
        })
    }

    /// Check that every probe entity exists and has a `GlobalTransform`.
    pub fn validate(&self, world: &World) -> Result<(), ConfigurationError> {
        for kind in ProbeKind::ALL {
            let probe = self.get(kind);
            if world.get_entity(probe).is_err() {
                return Err(ConfigurationError::MissingProbe(kind));
            }
            if world.get::<GlobalTransform>(probe).is_none() {
                return Err(ConfigurationError::ProbeWithoutTransform(kind));
            }
        }
        Ok(())
    }

    /// Read the current world-space positions of the ground and wall probes.
    ///
    /// The ceiling probe is read on demand when standing up.
    ///
    /// Returns the first probe that has lost its transform on failure.
    pub fn positions(&self, world: &World) -> Result<ProbePositions, ProbeKind> {
        let position = |kind: ProbeKind| {
            world
                .get::<GlobalTransform>(self.get(kind))
                .map(|t| t.translation().xy())
                .ok_or(kind)
        };

        Ok(ProbePositions {
            ground: position(ProbeKind::Ground)?,
            wall: position(ProbeKind::Wall)?,
        })
    }
}
