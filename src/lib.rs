//! # `msg_platformer_controller`
//!
//! A 2D platformer character controller with physics backend abstraction.
//!
//! This crate provides a classic platformer feel on top of a dynamic rigidbody:
//! - Ground and wall detection with circle overlap probes
//! - Grounded jumps, charged jumps (crouch to charge, release to jump)
//! - A limited number of bonus (air) jumps
//! - Wall jumps with a short real-time air control lockout
//! - Facing flips and animation parameters (`Ground`, `Crouch`, `Speed`, `vSpeed`)
//! - Abstracts physics backend for easy swapping (Rapier2D included)
//!
//! ## Architecture
//!
//! Every fixed step runs four phases:
//! 1. **Preparation**: newly spawned characters are validated and their probes resolved
//! 2. **Sensors**: the ground and wall probes are sampled through the backend
//! 3. **Resolve**: intent is turned into velocity, impulses and animation parameters
//! 4. **Finalize**: state marker components are synced
//!
//! The decision logic itself lives in [`resolver::resolve_step`] and does not
//! depend on the ECS.
//!
//! ## Usage
//!
//! ```rust
//! use bevy::prelude::*;
//! use msg_platformer_controller::prelude::*;
//!
//! fn spawn_player(mut commands: Commands) {
//!     commands
//!         .spawn((
//!             Transform::default(),
//!             PlatformerCharacterBundle::new(PlatformerConfig::player()),
//!         ))
//!         .with_children(|parent| {
//!             parent.spawn((Name::new("GroundCheck"), Transform::from_xyz(0.0, -0.8, 0.0)));
//!             parent.spawn((Name::new("WallCheck"), Transform::from_xyz(0.45, 0.0, 0.0)));
//!             parent.spawn((Name::new("CeilingCheck"), Transform::from_xyz(0.0, 0.85, 0.0)));
//!         });
//! }
//!
//! fn read_input(keys: Res<ButtonInput<KeyCode>>, mut q: Query<&mut MoveIntent>) {
//!     for mut intent in &mut q {
//!         let mut move_x = 0.0;
//!         if keys.pressed(KeyCode::ArrowLeft) {
//!             move_x -= 1.0;
//!         }
//!         if keys.pressed(KeyCode::ArrowRight) {
//!             move_x += 1.0;
//!         }
//!         intent.set_move(move_x);
//!         intent.set_crouch(keys.pressed(KeyCode::ArrowDown));
//!         if keys.just_pressed(KeyCode::Space) {
//!             intent.request_jump();
//!         }
//!     }
//! }
//! # let _ = (spawn_player, read_input);
//! ```

use bevy::prelude::*;

pub mod animation;
pub mod backend;
pub mod config;
pub mod detection;
pub mod error;
pub mod intent;
pub mod lockout;
pub mod probes;
pub mod resolver;
pub mod state;
pub mod systems;

#[cfg(feature = "rapier2d")]
pub mod rapier;

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::animation::{AnimationParameters, AnimationSink, AnimationValue};
    pub use crate::backend::PlatformerPhysicsBackend;
    pub use crate::config::{GroundMask, PlatformerConfig};
    pub use crate::detection::ProbeContacts;
    pub use crate::error::{ConfigurationError, ProbeKind};
    pub use crate::intent::MoveIntent;
    pub use crate::lockout::AirControlLockout;
    pub use crate::probes::CharacterProbes;
    pub use crate::resolver::{CharacterBody, JumpKind, StepReport};
    pub use crate::state::{
        Airborne, CharacterState, ControllerFault, ControllerReady, FacingVisual, Grounded, OnWall,
    };
    pub use crate::{PlatformerCharacterBundle, PlatformerControllerPlugin, PlatformerControllerSet};

    #[cfg(feature = "rapier2d")]
    pub use crate::rapier::{Rapier2dBackend, Rapier2dCharacterBundle};
}

/// Phases of the controller inside `FixedUpdate`, in execution order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformerControllerSet {
    /// Validate new characters and resolve their probes.
    Preparation,
    /// Sample the ground and wall probes.
    Sensors,
    /// Resolve movement and jumps.
    Resolve,
    /// Sync marker components.
    Finalize,
}

/// Main plugin for the platformer controller.
///
/// This plugin is generic over a physics backend `B` which provides the actual
/// physics operations (overlap queries, velocity and impulses).
///
/// # Type Parameters
/// - `B`: The physics backend implementation (e.g., `Rapier2dBackend`)
///
/// # Examples
///
/// With Rapier2D backend:
/// ```rust,no_run
/// use bevy::prelude::*;
/// use bevy_rapier2d::prelude::*;
/// use msg_platformer_controller::prelude::*;
///
/// App::new()
///     .add_plugins(MinimalPlugins)
///     .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
///     .add_plugins(PlatformerControllerPlugin::<Rapier2dBackend>::default())
///     .run();
/// ```
pub struct PlatformerControllerPlugin<B: backend::PlatformerPhysicsBackend> {
    _marker: std::marker::PhantomData<B>,
}

impl<B: backend::PlatformerPhysicsBackend> Default for PlatformerControllerPlugin<B> {
    fn default() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl<B: backend::PlatformerPhysicsBackend> Plugin for PlatformerControllerPlugin<B> {
    fn build(&self, app: &mut App) {
        // Register core types
        app.register_type::<config::PlatformerConfig>();
        app.register_type::<config::GroundMask>();
        app.register_type::<state::CharacterState>();
        app.register_type::<state::FacingVisual>();
        app.register_type::<state::ControllerReady>();
        app.register_type::<state::Grounded>();
        app.register_type::<state::Airborne>();
        app.register_type::<state::OnWall>();
        app.register_type::<intent::MoveIntent>();
        app.register_type::<animation::AnimationParameters>();
        app.register_type::<lockout::AirControlLockout>();
        app.register_type::<probes::CharacterProbes>();
        app.register_type::<detection::ProbeContacts>();

        // Add the physics backend plugin
        app.add_plugins(B::plugin());

        app.configure_sets(
            FixedUpdate,
            (
                PlatformerControllerSet::Preparation,
                PlatformerControllerSet::Sensors,
                PlatformerControllerSet::Resolve,
                PlatformerControllerSet::Finalize,
            )
                .chain(),
        );

        // Core systems run in FixedUpdate for consistent physics behavior
        app.add_systems(
            FixedUpdate,
            (
                systems::initialize_controllers.in_set(PlatformerControllerSet::Preparation),
                systems::sample_environment::<B>.in_set(PlatformerControllerSet::Sensors),
                systems::resolve_movement::<B>.in_set(PlatformerControllerSet::Resolve),
                systems::sync_state_markers.in_set(PlatformerControllerSet::Finalize),
            ),
        );

        // The wall jump lockout runs on real time, outside of the fixed loop
        app.add_systems(PreUpdate, systems::tick_air_control_lockouts);
    }
}

/// Components needed by a platformer character, except physics and probes.
///
/// Probes are found among the children at spawn (see
/// [`probes::CharacterProbes::from_children`]) unless a
/// [`probes::CharacterProbes`] component is inserted alongside.
#[derive(Bundle, Default)]
pub struct PlatformerCharacterBundle {
    /// Tuning.
    pub config: config::PlatformerConfig,
    /// Controller state.
    pub state: state::CharacterState,
    /// Player or AI intent.
    pub intent: intent::MoveIntent,
    /// Animation parameters published every step.
    pub animation: animation::AnimationParameters,
    /// Pending wall jump lockout.
    pub lockout: lockout::AirControlLockout,
}

impl PlatformerCharacterBundle {
    /// Create a character bundle for the given configuration.
    pub fn new(config: config::PlatformerConfig) -> Self {
        Self {
            config,
            state: state::CharacterState::new(&config),
            ..default()
        }
    }
}
