//! Collision router
//!
//! Turns raw physics contacts into gameplay outcomes. Contacts are resolved
//! against a snapshot taken before any handler runs, so an entity that was
//! recycled by an earlier handler in the same step is left alone.

use rust_engine::physics::{ColliderId, CollisionLayers, CollisionPair};

use crate::context::{ColliderTag, GameContext};
use crate::entity::{EntityId, FlyingObjectKind};

/// What touched an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// A missile, identified by its activation
    Missile {
        /// Missile entity
        id: EntityId,
        /// Activation the contact belongs to
        generation: u32,
        /// Kind of the character that fired it
        owner: FlyingObjectKind,
    },
    /// Another flying object, touched directly
    FlyingObject {
        /// The other entity
        id: EntityId,
        /// Its kind
        kind: FlyingObjectKind,
    },
    /// Anything the rules do not know about
    Unknown,
}

#[derive(Debug, Clone, Copy)]
struct Side {
    id: EntityId,
    generation: u32,
    contact: Contact,
}

impl GameContext {
    /// Describe an entity as the other side of a contact
    pub fn contact_of(&self, id: EntityId) -> Contact {
        let Some(object) = self.pool.get(id) else {
            return Contact::Unknown;
        };

        if let Some(missile) = object.missile_state() {
            return Contact::Missile {
                id,
                generation: object.generation,
                owner: missile.owner,
            };
        }

        object
            .kind()
            .map_or(Contact::Unknown, |kind| Contact::FlyingObject { id, kind })
    }

    /// Apply the collision rules to `receiver` touched by `other`
    ///
    /// - A live missile fired by another kind is consumed and destroys the
    ///   receiver, awarding score when the player fired it.
    /// - Player and alien are destroyed by any direct flying object contact.
    /// - Asteroids are destroyed by direct contact with anything but another
    ///   asteroid.
    pub fn hit_by_collider(&mut self, receiver: EntityId, other: Contact) {
        let Some(object) = self.pool.get(receiver) else {
            log::warn!("Collision for unknown entity {:?}", receiver);
            return;
        };
        if !object.active {
            return;
        }
        // Missiles react through their own sweep
        let Some(kind) = object.kind() else {
            return;
        };

        match other {
            Contact::Missile { id, generation, owner } => {
                if owner == kind || !self.is_live(id, generation) {
                    return;
                }
                self.deactivate(id);
                self.destroy(receiver, owner == FlyingObjectKind::Player);
            }
            Contact::FlyingObject { kind: other_kind, .. } => match kind {
                FlyingObjectKind::Player | FlyingObjectKind::Alien => self.destroy(receiver, false),
                FlyingObjectKind::Asteroid => {
                    if other_kind != FlyingObjectKind::Asteroid {
                        self.destroy(receiver, false);
                    }
                }
            },
            Contact::Unknown => {
                log::debug!("Ignoring contact without gameplay meaning on {:?}", receiver);
            }
        }
    }

    /// Dispatch newly overlapping pairs reported by the physics service
    pub fn resolve_overlaps(&mut self, pairs: &[CollisionPair]) {
        let snapshot: Vec<(Side, Side)> = pairs
            .iter()
            .filter_map(|pair| Some((self.side(pair.a)?, self.side(pair.b)?)))
            .collect();

        for (a, b) in snapshot {
            self.deliver(a, b);
            self.deliver(b, a);
        }
    }

    fn side(&self, collider: ColliderId) -> Option<Side> {
        let id = EntityId::from_collider(collider)?;
        let object = self.pool.get(id)?;
        Some(Side {
            id,
            generation: object.generation,
            contact: self.contact_of(id),
        })
    }

    fn deliver(&mut self, receiver: Side, other: Side) {
        if matches!(receiver.contact, Contact::Missile { .. }) {
            return;
        }
        let current = self.pool.get(receiver.id).map(|o| o.generation);
        if current != Some(receiver.generation) {
            log::trace!("Skipping contact for recycled {:?}", receiver.id);
            return;
        }
        self.hit_by_collider(receiver.id, other.contact);
    }

    fn is_live(&self, id: EntityId, generation: u32) -> bool {
        self.pool
            .get(id)
            .is_some_and(|o| o.active && o.generation == generation)
    }

    /// Sweep one missile from its previous to its current position
    ///
    /// The first flying object on the path that does not belong to the
    /// owner's kind is hit and the missile snaps to the contact point. The
    /// missile despawns once its lifetime is over.
    pub fn sweep_missile(&mut self, id: EntityId) {
        let now = self.clock.now();
        let Some(object) = self.pool.get(id).filter(|o| o.active) else {
            return;
        };
        let Some(missile) = object.missile_state() else {
            return;
        };

        let owner = missile.owner;
        let from = missile.previous_position;
        let despawn_at = missile.despawn_at;
        let generation = object.generation;
        let path = object.position - from;
        let length = path.norm();

        let mut snapped = None;
        if length > f32::EPSILON {
            let hit = self
                .physics
                .raycast(from, path, length, CollisionLayers::FLYING_OBJECT)
                .filter(|hit| hit.tag == ColliderTag::FlyingObject);

            if let Some(hit) = hit {
                let target = EntityId::from_collider(hit.collider).filter(|target| {
                    self.pool
                        .get(*target)
                        .filter(|o| o.active)
                        .and_then(|o| o.kind())
                        .is_some_and(|kind| kind != owner)
                });

                if let Some(target) = target {
                    self.hit_by_collider(target, Contact::Missile { id, generation, owner });
                    snapped = Some(hit.point);
                }
            }
        }

        if let Some(object) = self.pool.get_mut(id) {
            if let Some(point) = snapped {
                object.position = point;
            }
            let position = object.position;
            if let Some(missile) = object.missile_state_mut() {
                missile.previous_position = position;
            }
        }

        if now >= despawn_at {
            self.deactivate(id);
        }
    }
}
