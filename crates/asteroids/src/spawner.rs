//! Spawn coordinator
//!
//! Picks spawn points with a downward containment probe and hands pooled
//! instances to `activate`. Sampling retries are capped by
//! `session.spawn_retry_limit`; when every sample is rejected the last one
//! is used anyway and a warning is logged.

use rand::Rng;
use rust_engine::foundation::math::{utils, Vec2};
use rust_engine::physics::CollisionLayers;

use crate::context::{probe_direction, ColliderTag, GameContext};
use crate::entity::{AsteroidSize, EntityId};
use crate::error::GameResult;
use crate::pool::PoolKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpawnRegion {
    InsideViewport,
    OutsideViewport,
}

impl GameContext {
    /// Random visible point whose probe first touches the viewport surface
    ///
    /// Points inside obstacles or other flying objects are rejected.
    pub fn find_valid_spawn_point_inside_viewport(&mut self) -> Vec2 {
        self.find_spawn_point(SpawnRegion::InsideViewport)
    }

    /// Random off-screen point whose probe touches nothing at all
    pub fn find_valid_spawn_point_outside_viewport(&mut self) -> Vec2 {
        self.find_spawn_point(SpawnRegion::OutsideViewport)
    }

    fn find_spawn_point(&mut self, region: SpawnRegion) -> Vec2 {
        let limit = self.config.session.spawn_retry_limit.max(1);
        let mut point = Vec2::zeros();

        for _ in 0..limit {
            point = match region {
                SpawnRegion::InsideViewport => self.viewport.sample_inside(&mut self.rng),
                SpawnRegion::OutsideViewport => self.viewport.sample_outside(&mut self.rng),
            };

            let hit = self
                .physics
                .raycast(point, probe_direction(), f32::INFINITY, CollisionLayers::ALL);
            let accepted = match region {
                SpawnRegion::InsideViewport => hit.is_some_and(|h| h.tag == ColliderTag::Viewport),
                SpawnRegion::OutsideViewport => hit.is_none(),
            };
            if accepted {
                return point;
            }
        }

        log::warn!(
            "No valid spawn point {:?} after {} samples, using ({:.1}, {:.1})",
            region,
            limit,
            point.x,
            point.y
        );
        point
    }

    /// Spawn an asteroid of `size`
    ///
    /// Without a position the asteroid starts off-screen and heads for the
    /// player; with a position but no velocity it flies in a random
    /// direction. The speed always comes from the size's configured range.
    pub fn spawn_asteroid(
        &mut self,
        size: AsteroidSize,
        position: Option<Vec2>,
        velocity: Option<Vec2>,
    ) -> GameResult<EntityId> {
        let (position, direction) = match (position, velocity) {
            (Some(position), Some(velocity)) => (position, velocity),
            (Some(position), None) => (position, self.random_direction()),
            (None, Some(velocity)) => (self.find_valid_spawn_point_outside_viewport(), velocity),
            (None, None) => {
                let position = self.find_valid_spawn_point_outside_viewport();
                (position, self.direction_to_player(position))
            }
        };

        let id = self.acquire(PoolKey::Asteroid(size))?;
        self.activate(id, position, direction);
        log::trace!("Spawned {:?} asteroid {:?} at {:?}", size, id, position);
        Ok(id)
    }

    /// Spawn the alien unless one is already flying
    ///
    /// Returns `Ok(None)` when the single-alien rule blocked the spawn.
    pub fn spawn_alien(&mut self, position: Vec2, direction: Vec2) -> GameResult<Option<EntityId>> {
        if self.alien_active() {
            log::trace!("Alien already active, spawn skipped");
            return Ok(None);
        }

        let id = self.acquire(PoolKey::Alien)?;
        self.activate(id, position, direction);
        log::debug!("Alien {:?} spawned at ({:.1}, {:.1})", id, position.x, position.y);
        Ok(Some(id))
    }

    fn random_direction(&mut self) -> Vec2 {
        utils::direction_from_angle(self.rng.gen_range(0.0..std::f32::consts::TAU))
    }

    fn direction_to_player(&mut self, from: Vec2) -> Vec2 {
        let target = self
            .entity(self.player_id())
            .map_or_else(Vec2::zeros, |p| p.position);
        let direction = utils::normalize_or_zero(target - from);
        if direction == Vec2::zeros() {
            self.random_direction()
        } else {
            direction
        }
    }
}
