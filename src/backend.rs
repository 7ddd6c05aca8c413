//! Physics backend abstraction.
//!
//! This module defines the trait that physics backends must implement
//! to work with the platformer controller. This allows easy swapping
//! between physics engines (Rapier2D, Avian, custom, etc.).

use bevy::prelude::*;

use crate::config::GroundMask;

/// Trait for physics backend implementations.
///
/// Implement this trait to integrate a physics engine with the platformer
/// controller. The backend handles overlap queries and velocity/impulse
/// manipulation; all decisions are made by the controller itself.
///
/// For an example implementation, see the `rapier` module's `Rapier2dBackend`.
pub trait PlatformerPhysicsBackend: 'static + Send + Sync {
    /// Returns the plugin that sets up this backend.
    fn plugin() -> impl Plugin;

    /// Collect every body overlapping a circle.
    ///
    /// The result must include the querying character itself if its collider
    /// overlaps; filtering out "self" is the controller's job.
    ///
    /// # Arguments
    /// * `world` - The ECS world for queries
    /// * `center` - Circle center in world space
    /// * `radius` - Circle radius
    /// * `mask` - Only bodies accepted by this mask are reported
    fn overlap_circle(world: &mut World, center: Vec2, radius: f32, mask: GroundMask)
    -> Vec<Entity>;

    /// Get the current velocity of an entity.
    fn get_velocity(world: &World, entity: Entity) -> Vec2;

    /// Set the velocity of an entity.
    fn set_velocity(world: &mut World, entity: Entity, velocity: Vec2);

    /// Apply an impulse to an entity.
    ///
    /// Impulse is an instantaneous change in momentum, integrated by the
    /// physics engine on its next step.
    fn apply_impulse(world: &mut World, entity: Entity, impulse: Vec2);

    /// Get the fixed timestep delta time.
    fn get_fixed_timestep(world: &World) -> f32 {
        world
            .get_resource::<Time<Fixed>>()
            .map(|t| t.timestep().as_secs_f32())
            .filter(|&d| d > 0.0)
            .unwrap_or(1.0 / 64.0)
    }
}

/// Empty plugin for backends that don't need additional setup.
pub struct NoOpBackendPlugin;

impl Plugin for NoOpBackendPlugin {
    fn build(&self, _app: &mut App) {}
}

/// A single circle overlap query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlapRequest {
    /// Circle center in world space.
    pub center: Vec2,
    /// Circle radius.
    pub radius: f32,
    /// Bodies that count as hits.
    pub mask: GroundMask,
}

impl OverlapRequest {
    /// Create a new overlap request.
    pub fn new(center: Vec2, radius: f32, mask: GroundMask) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            mask,
        }
    }

    /// Run this request against a backend.
    pub fn run<B: PlatformerPhysicsBackend>(&self, world: &mut World) -> Vec<Entity> {
        B::overlap_circle(world, self.center, self.radius, self.mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_request_clamps_negative_radius() {
        let request = OverlapRequest::new(Vec2::ZERO, -1.0, GroundMask::ALL);
        assert_eq!(request.radius, 0.0);
    }
}
