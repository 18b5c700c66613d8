//! Collision layer system for filtering collision detection
//!
//! Based on Game Engine Architecture 3rd Edition, Section 13.3.8:
//! "Most games need to filter collisions... This is typically done via
//! collision layers or groups."

use bitflags::bitflags;

bitflags! {
    /// Collision layer membership and masks
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// The visible play area boundary surface
        const VIEWPORT = 1 << 0;
        /// Ships, aliens and asteroids
        const FLYING_OBJECT = 1 << 1;
        /// Projectiles
        const MISSILE = 1 << 2;
        /// Static geometry that blocks spawning
        const OBSTACLE = 1 << 3;
        /// Every layer
        const ALL = u32::MAX;
    }
}

impl CollisionLayers {
    /// Check if two bodies should collide based on their layers and masks
    ///
    /// A's layer must be in B's mask AND B's layer must be in A's mask.
    ///
    /// # Example
    /// ```
    /// use rust_engine::physics::CollisionLayers;
    ///
    /// let ship = CollisionLayers::FLYING_OBJECT;
    /// let ship_mask = CollisionLayers::FLYING_OBJECT | CollisionLayers::MISSILE;
    /// let missile = CollisionLayers::MISSILE;
    /// let missile_mask = CollisionLayers::FLYING_OBJECT;
    ///
    /// assert!(CollisionLayers::should_collide(ship, ship_mask, missile, missile_mask));
    /// assert!(!CollisionLayers::should_collide(missile, missile_mask, missile, missile_mask));
    /// ```
    pub fn should_collide(
        layer_a: Self,
        mask_a: Self,
        layer_b: Self,
        mask_b: Self,
    ) -> bool {
        layer_a.intersects(mask_b) && layer_b.intersects(mask_a)
    }
}
