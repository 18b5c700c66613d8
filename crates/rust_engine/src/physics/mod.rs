//! Physics module for collision detection and queries
//!
//! Provides 2D shapes, layer filtering, ray queries and new-overlap events
//! behind the [`PhysicsService`] trait.

pub mod collision;
pub mod collision_layers;
pub mod collision_system;

pub use collision::{ColliderId, PlacedShape, Ray2, RayHit, Shape2};
pub use collision_layers::CollisionLayers;
pub use collision_system::{BodyDesc, CollisionPair, CollisionWorld, PhysicsService};
