//! Keyed entity pool
//!
//! Entities are built once, the first time a key runs out of inactive
//! instances, and are recycled from then on. Every instance lives in one
//! arena so an [`EntityId`] stays valid for the lifetime of the pool; the
//! per-key lists only index into it.
//!
//! # Architecture
//!
//! - One prototype per [`PoolKey`], cloned when the key's list has no
//!   inactive instance left
//! - Pools grow on demand and never shrink
//! - `acquire` never hands out an active instance

use std::collections::HashMap;

use crate::entity::{AsteroidSize, EntityId, FlyingObject, FlyingObjectKind, Variant};

/// Category an instance is pooled under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PoolKey {
    /// The player ship
    Player,
    /// The alien ship
    Alien,
    /// Asteroids of one size
    Asteroid(AsteroidSize),
    /// Missiles fired by one kind of character
    Missile(FlyingObjectKind),
}

impl PoolKey {
    /// Key an instance belongs to, derived from its variant
    pub fn of(object: &FlyingObject) -> Self {
        match &object.variant {
            Variant::Player { .. } => Self::Player,
            Variant::Alien { .. } => Self::Alien,
            Variant::Asteroid(asteroid) => Self::Asteroid(asteroid.size),
            Variant::Missile(missile) => Self::Missile(missile.owner),
        }
    }
}

/// Errors that can occur during pool lookups
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// No prototype was registered for the key
    #[error("no prototype registered for pool key {0:?}")]
    MissingPrototype(PoolKey),
}

/// Outcome of [`EntityPool::acquire`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Acquired {
    /// The inactive instance handed out
    pub id: EntityId,
    /// Whether the instance was constructed by this call
    pub created: bool,
}

/// Statistics for the entity pool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Acquisitions served by an existing inactive instance
    pub reused: u64,
    /// Acquisitions that constructed a new instance
    pub created: u64,
}

/// Growable pools of reusable flying objects
#[derive(Debug, Clone, Default)]
pub struct EntityPool {
    entities: Vec<FlyingObject>,
    pools: HashMap<PoolKey, Vec<EntityId>>,
    prototypes: HashMap<PoolKey, FlyingObject>,
    stats: PoolStats,
}

impl EntityPool {
    /// Create an empty pool without prototypes
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the template cloned when `key` needs a new instance
    pub fn register_prototype(&mut self, prototype: FlyingObject) {
        let key = PoolKey::of(&prototype);
        self.prototypes.insert(key, prototype);
    }

    /// Whether `key` can construct instances
    pub fn has_prototype(&self, key: PoolKey) -> bool {
        self.prototypes.contains_key(&key)
    }

    /// Hand out an inactive instance for `key`
    ///
    /// # Arguments
    ///
    /// * `key` - Category of the requested instance
    ///
    /// # Returns
    ///
    /// * `Ok(Acquired)` - The first inactive instance of the key, or a new
    ///   one cloned from the prototype when every instance is active
    /// * `Err(PoolError::MissingPrototype)` - The key has no inactive
    ///   instance and no prototype to build one from
    ///
    /// The instance is returned as is; the caller activates it.
    pub fn acquire(&mut self, key: PoolKey) -> Result<Acquired, PoolError> {
        let free = self
            .pools
            .get(&key)
            .and_then(|ids| ids.iter().copied().find(|id| !self.entities[id.index()].active));

        if let Some(id) = free {
            self.stats.reused += 1;
            return Ok(Acquired { id, created: false });
        }

        let prototype = self
            .prototypes
            .get(&key)
            .ok_or(PoolError::MissingPrototype(key))?
            .clone();

        #[allow(clippy::cast_possible_truncation)]
        let id = EntityId(self.entities.len() as u32);
        self.entities.push(prototype);
        let list = self.pools.entry(key).or_default();
        list.push(id);
        self.stats.created += 1;

        log::debug!(
            "Pool {:?} grew to {} instances ({} total)",
            key,
            list.len(),
            self.entities.len()
        );

        Ok(Acquired { id, created: true })
    }

    /// Look up an instance
    pub fn get(&self, id: EntityId) -> Option<&FlyingObject> {
        self.entities.get(id.index())
    }

    /// Look up an instance mutably
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut FlyingObject> {
        self.entities.get_mut(id.index())
    }

    /// Number of active instances pooled under `key`
    pub fn active_count(&self, key: PoolKey) -> usize {
        self.pools.get(&key).map_or(0, |ids| {
            ids.iter().filter(|id| self.entities[id.index()].active).count()
        })
    }

    /// Number of instances, active or not, pooled under `key`
    pub fn instance_count(&self, key: PoolKey) -> usize {
        self.pools.get(&key).map_or(0, Vec::len)
    }

    /// Instances pooled under `key`, in construction order
    pub fn ids(&self, key: PoolKey) -> &[EntityId] {
        self.pools.get(&key).map_or(&[][..], Vec::as_slice)
    }

    /// Every instance id, in construction order
    #[allow(clippy::cast_possible_truncation)]
    pub fn all_ids(&self) -> impl Iterator<Item = EntityId> {
        (0..self.entities.len() as u32).map(EntityId)
    }

    /// Every instance with its id
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &FlyingObject)> {
        self.all_ids().zip(self.entities.iter())
    }

    /// Every instance with its id, mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut FlyingObject)> {
        self.all_ids().zip(self.entities.iter_mut())
    }

    /// Total number of instances across all keys
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no instance has been constructed yet
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Acquisition statistics
    pub fn stats(&self) -> &PoolStats {
        &self.stats
    }
}
