//! Rapier2D physics backend implementation.
//!
//! This module provides the physics backend for Bevy Rapier2D.
//! Enable with the `rapier2d` feature.

use bevy::ecs::system::SystemState;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

use crate::backend::PlatformerPhysicsBackend;
use crate::config::GroundMask;

/// Rapier2D physics backend for the platformer controller.
///
/// Overlap queries go through the default `RapierContext`. Velocity is read
/// from and written to [`Velocity::linvel`], jump impulses are accumulated in
/// [`ExternalImpulse`] and integrated by Rapier on its next step.
pub struct Rapier2dBackend;

impl PlatformerPhysicsBackend for Rapier2dBackend {
    fn plugin() -> impl Plugin {
        Rapier2dBackendPlugin
    }

    fn overlap_circle(
        world: &mut World,
        center: Vec2,
        radius: f32,
        mask: GroundMask,
    ) -> Vec<Entity> {
        if !world.contains_resource::<RapierOverlapState>() {
            let state = RapierOverlapState::from_world(world);
            world.insert_resource(state);
        }

        world.resource_scope(|world, mut state: Mut<RapierOverlapState>| {
            let rapier_context = state.0.get(world);
            let Ok(context) = rapier_context.single() else {
                return Vec::new();
            };
            rapier_overlap_circle(&context, center, radius, mask)
        })
    }

    fn get_velocity(world: &World, entity: Entity) -> Vec2 {
        world
            .get::<Velocity>(entity)
            .map(|v| v.linvel)
            .unwrap_or(Vec2::ZERO)
    }

    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2) {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.linvel = velocity;
        }
    }

    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2) {
        if let Some(mut ext_impulse) = world.get_mut::<ExternalImpulse>(entity) {
            ext_impulse.impulse += impulse;
        } else if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            // No ExternalImpulse: treat the body as unit mass
            vel.linvel += impulse;
        }
    }
}

/// Plugin that sets up Rapier2D-specific state for the platformer controller.
pub struct Rapier2dBackendPlugin;

impl Plugin for Rapier2dBackendPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<RapierOverlapState>();
    }
}

/// Cached system state used to reach the Rapier context from exclusive systems.
#[derive(Resource)]
struct RapierOverlapState(SystemState<ReadRapierContext<'static, 'static>>);

impl FromWorld for RapierOverlapState {
    fn from_world(world: &mut World) -> Self {
        Self(SystemState::new(world))
    }
}

/// Collect every non-sensor collider overlapping a circle.
///
/// Colliders are matched when their membership intersects `mask`.
fn rapier_overlap_circle(
    context: &RapierContext,
    center: Vec2,
    radius: f32,
    mask: GroundMask,
) -> Vec<Entity> {
    let shape = Collider::ball(radius);
    let filter = QueryFilter::default()
        .exclude_sensors()
        .groups(CollisionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(mask.bits()),
        ));

    let mut hits = Vec::new();
    context.intersections_with_shape(center, 0.0, &shape, filter, |entity| {
        hits.push(entity);
        true
    });
    hits
}

/// Rapier2D components for a platformer character.
///
/// Pair it with [`crate::PlatformerCharacterBundle`] and a `Collider`.
///
/// # Example
///
/// ```rust
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_platformer_controller::prelude::*;
///
/// fn spawn_player(mut commands: Commands) {
///     commands.spawn((
///         Transform::from_xyz(0.0, 2.0, 0.0),
///         PlatformerCharacterBundle::new(PlatformerConfig::player()),
///         Rapier2dCharacterBundle::rotation_locked(),
///         Collider::cuboid(0.4, 0.8),
///     ));
/// }
/// # let _ = spawn_player;
/// ```
#[derive(Bundle, Default)]
pub struct Rapier2dCharacterBundle {
    /// The rigid body type, [`RigidBody::Dynamic`] for a character.
    pub rigid_body: RigidBody,
    /// Linear velocity, overwritten horizontally by the controller when steering.
    pub velocity: Velocity,
    /// Jump impulses are accumulated here.
    pub external_impulse: ExternalImpulse,
    /// Which axes are locked.
    pub locked_axes: LockedAxes,
    /// Damping coefficients.
    pub damping: Damping,
}

impl Rapier2dCharacterBundle {
    /// Dynamic body without damping, free to rotate.
    pub fn new() -> Self {
        Self {
            rigid_body: RigidBody::Dynamic,
            velocity: Velocity::default(),
            external_impulse: ExternalImpulse::default(),
            locked_axes: LockedAxes::empty(),
            damping: Damping {
                linear_damping: 0.0,
                angular_damping: 1.0,
            },
        }
    }

    /// Dynamic body that always stays upright.
    ///
    /// This is what most platformer characters want.
    pub fn rotation_locked() -> Self {
        Self {
            locked_axes: LockedAxes::ROTATION_LOCKED,
            ..Self::new()
        }
    }

    /// Set the rigid body type.
    pub fn with_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = body;
        self
    }

    /// Set the linear and angular damping.
    pub fn with_damping(mut self, linear: f32, angular: f32) -> Self {
        self.damping = Damping {
            linear_damping: linear,
            angular_damping: angular,
        };
        self
    }
}
