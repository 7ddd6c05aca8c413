//! Core controller systems.
//!
//! These systems glue the backend agnostic sampler and resolver to the ECS.
//! They are generic over the physics backend to allow different physics
//! engines to be used.

use std::marker::PhantomData;

use bevy::prelude::*;

use crate::animation::AnimationParameters;
use crate::backend::PlatformerPhysicsBackend;
use crate::config::PlatformerConfig;
use crate::detection::{self, EnvironmentSample, ProbeContacts};
use crate::error::ConfigurationError;
use crate::intent::MoveIntent;
use crate::lockout::AirControlLockout;
use crate::probes::CharacterProbes;
use crate::resolver::{self, CharacterBody};
use crate::state::{
    Airborne, CharacterState, ControllerFault, ControllerReady, FacingVisual, Grounded, OnWall,
};

/// Validate newly spawned characters before their first tick.
///
/// Probes are taken from an explicit [`CharacterProbes`] or looked up among
/// the children. Missing runtime components are inserted with defaults. A
/// character that fails validation gets a [`ControllerFault`] and is never
/// ticked.
pub fn initialize_controllers(world: &mut World) {
    let pending: Vec<(Entity, PlatformerConfig, Option<CharacterProbes>)> = world
        .query_filtered::<
            (Entity, &PlatformerConfig, Option<&CharacterProbes>),
            (Without<ControllerReady>, Without<ControllerFault>),
        >()
        .iter(world)
        .map(|(e, config, probes)| (e, *config, probes.copied()))
        .collect();

    for (entity, config, probes) in pending {
        match prepare_character(world, entity, &config, probes) {
            Ok(probes) => {
                let mut entity_mut = world.entity_mut(entity);
                if !entity_mut.contains::<CharacterState>() {
                    entity_mut.insert(CharacterState::new(&config));
                }
                if !entity_mut.contains::<MoveIntent>() {
                    entity_mut.insert(MoveIntent::default());
                }
                if !entity_mut.contains::<AnimationParameters>() {
                    entity_mut.insert(AnimationParameters::default());
                }
                if !entity_mut.contains::<AirControlLockout>() {
                    entity_mut.insert(AirControlLockout::default());
                }
                entity_mut.insert((probes, ProbeContacts::default(), ControllerReady));
                debug!("platformer controller {entity} initialized");
            }
            Err(err) => {
                error!("platformer controller {entity} disabled: {err}");
                world.entity_mut(entity).insert(ControllerFault(err));
            }
        }
    }
}

fn prepare_character(
    world: &World,
    entity: Entity,
    config: &PlatformerConfig,
    probes: Option<CharacterProbes>,
) -> Result<CharacterProbes, ConfigurationError> {
    config.validate()?;
    let probes = match probes {
        Some(probes) => probes,
        None => CharacterProbes::from_children(world, entity)?,
    };
    probes.validate(world)?;
    Ok(probes)
}

/// Sample ground and wall probes for every ready character.
///
/// Writes `grounded`/`on_wall` into [`CharacterState`], resets bonus jumps
/// when grounded and publishes `Ground` and `vSpeed`.
pub fn sample_environment<B: PlatformerPhysicsBackend>(world: &mut World) {
    let characters: Vec<(Entity, PlatformerConfig, CharacterProbes)> = world
        .query_filtered::<(Entity, &PlatformerConfig, &CharacterProbes), With<ControllerReady>>()
        .iter(world)
        .map(|(e, config, probes)| (e, *config, *probes))
        .collect();

    let mut q_state =
        world.query::<(&mut CharacterState, &mut AnimationParameters, &mut ProbeContacts)>();

    for (entity, config, probes) in characters {
        let (sample, contacts) = match probes.positions(world) {
            Ok(positions) => detection::sample_probes::<B>(world, entity, positions, &config),
            Err(kind) => {
                warn!("platformer controller {entity}: {kind} probe lost its transform");
                (EnvironmentSample::default(), ProbeContacts::default())
            }
        };

        let vertical_velocity = B::get_velocity(world, entity).y;

        let Ok((mut state, mut anim, mut last_contacts)) = q_state.get_mut(world, entity) else {
            continue;
        };

        if sample.grounded && !state.grounded {
            trace!("platformer controller {entity} landed");
        }
        detection::apply_sample(&mut state, &mut *anim, sample, vertical_velocity);
        if *last_contacts != contacts {
            *last_contacts = contacts;
        }
    }
}

/// [`CharacterBody`] backed by the ECS world and a physics backend.
struct WorldBody<'w, B: PlatformerPhysicsBackend> {
    world: &'w mut World,
    entity: Entity,
    visual: Entity,
    ceiling_probe: Entity,
    config: PlatformerConfig,
    _marker: PhantomData<B>,
}

impl<B: PlatformerPhysicsBackend> CharacterBody for WorldBody<'_, B> {
    fn velocity(&self) -> Vec2 {
        B::get_velocity(&*self.world, self.entity)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        B::set_velocity(&mut *self.world, self.entity, velocity);
    }

    fn add_impulse(&mut self, impulse: Vec2) {
        B::apply_impulse(&mut *self.world, self.entity, impulse);
    }

    fn flip_visual(&mut self) {
        if let Some(mut transform) = self.world.get_mut::<Transform>(self.visual) {
            transform.scale.x = -transform.scale.x;
        }
    }

    fn ceiling_blocked(&mut self) -> bool {
        let Some(probe) = self
            .world
            .get::<GlobalTransform>(self.ceiling_probe)
            .map(|t| t.translation().xy())
        else {
            return false;
        };
        detection::ceiling_blocked::<B>(&mut *self.world, probe, &self.config)
    }
}

/// Resolve movement and jumps for every ready character.
///
/// Consumes the jump request of each [`MoveIntent`].
pub fn resolve_movement<B: PlatformerPhysicsBackend>(world: &mut World) {
    let characters: Vec<(Entity, PlatformerConfig, CharacterProbes, MoveIntent, Entity)> = world
        .query_filtered::<(
            Entity,
            &PlatformerConfig,
            &CharacterProbes,
            &MoveIntent,
            Option<&FacingVisual>,
        ), With<ControllerReady>>()
        .iter(world)
        .map(|(e, config, probes, intent, visual)| {
            (
                e,
                *config,
                *probes,
                *intent,
                visual.map(|v| v.0).unwrap_or(e),
            )
        })
        .collect();

    let dt = B::get_fixed_timestep(world);
    let mut q_state = world.query::<(
        &mut CharacterState,
        &mut AirControlLockout,
        &mut AnimationParameters,
        &mut MoveIntent,
    )>();

    for (entity, config, probes, intent, visual) in characters {
        // Take the mutable pieces out so the body can borrow the world.
        let Ok((state, mut lockout, mut anim, mut stored_intent)) = q_state.get_mut(world, entity)
        else {
            continue;
        };
        let mut state = *state;
        let mut lockout = std::mem::take(&mut *lockout);
        let mut anim = std::mem::take(&mut *anim);
        if stored_intent.jump {
            stored_intent.consume_jump();
        }

        let mut body = WorldBody::<B> {
            world: &mut *world,
            entity,
            visual,
            ceiling_probe: probes.ceiling,
            config,
            _marker: PhantomData,
        };

        let report = resolver::resolve_step(
            &mut state,
            &mut lockout,
            &config,
            &intent,
            dt,
            &mut body,
            &mut anim,
        );

        if let Some(kind) = report.air_jump.or(report.ground_jump) {
            debug!(
                "platformer controller {entity}: {kind:?} jump, impulse {}",
                report.impulse
            );
        }
        if report.air_jump == Some(resolver::JumpKind::Wall) {
            debug!(
                "platformer controller {entity}: air control locked for {:?}",
                config.wall_jump_lockout
            );
        }

        if let Ok((mut stored_state, mut stored_lockout, mut stored_anim, _)) =
            q_state.get_mut(world, entity)
        {
            if *stored_state != state {
                *stored_state = state;
            }
            *stored_lockout = lockout;
            *stored_anim = anim;
        }
    }
}

/// Tick pending air control restores with real time.
///
/// Runs every frame, independently of the fixed-step loop.
pub fn tick_air_control_lockouts(
    time: Res<Time<Real>>,
    mut q: Query<(Entity, &mut AirControlLockout, &mut CharacterState), Without<ControllerFault>>,
) {
    let delta = time.delta();
    for (entity, mut lockout, mut state) in &mut q {
        if !lockout.is_pending() {
            continue;
        }
        if lockout.tick(&mut state, delta) {
            debug!("platformer controller {entity}: air control restored");
        }
    }
}

/// Sync state marker components based on [`CharacterState`].
pub fn sync_state_markers(
    mut commands: Commands,
    q_characters: Query<
        (Entity, &CharacterState, Has<Grounded>, Has<Airborne>, Has<OnWall>),
        With<ControllerReady>,
    >,
) {
    for (entity, state, has_grounded, has_airborne, has_wall) in &q_characters {
        // Sync Grounded/Airborne
        if state.grounded && !has_grounded {
            commands.entity(entity).insert(Grounded).remove::<Airborne>();
        } else if !state.grounded && !has_airborne {
            commands.entity(entity).insert(Airborne).remove::<Grounded>();
        }

        // Sync OnWall
        if state.on_wall && !has_wall {
            commands.entity(entity).insert(OnWall);
        } else if !state.on_wall && has_wall {
            commands.entity(entity).remove::<OnWall>();
        }
    }
}
