//! Core collision detection system
//!
//! Based on Game Engine Architecture 3rd Edition, Chapter 13.
//!
//! Gameplay code talks to [`PhysicsService`], never to a concrete world, so
//! tests can swap in deterministic stub geometry. [`CollisionWorld`] is the
//! reference implementation: a brute-force broad phase, which is plenty for
//! the few dozen bodies an arcade round keeps alive.

use std::collections::{BTreeMap, BTreeSet};

use crate::foundation::math::Vec2;
use crate::physics::collision::{ColliderId, PlacedShape, Ray2, RayHit, Shape2};
use crate::physics::collision_layers::CollisionLayers;

/// Collision pair representing two bodies that started overlapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollisionPair {
    /// Body with the smaller id
    pub a: ColliderId,
    /// Body with the larger id
    pub b: ColliderId,
}

impl CollisionPair {
    /// Create a new collision pair (always stores smaller id first for consistency)
    pub fn new(a: ColliderId, b: ColliderId) -> Self {
        if a <= b {
            Self { a, b }
        } else {
            Self { a: b, b: a }
        }
    }
}

/// Registration data for a body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc<T> {
    /// Shape relative to the body position
    pub shape: Shape2,
    /// Layers the body belongs to
    pub layer: CollisionLayers,
    /// Layers the body overlaps with
    pub mask: CollisionLayers,
    /// Gameplay tag reported by ray hits
    pub tag: T,
    /// Initial world position
    pub position: Vec2,
    /// Disabled bodies are invisible to rays and overlaps
    pub enabled: bool,
}

/// What gameplay code requires from a 2D physics/collision backend
pub trait PhysicsService<T: Copy> {
    /// Add a body, replacing any previous body with the same id
    fn register_body(&mut self, id: ColliderId, desc: BodyDesc<T>);

    /// Move a body and toggle whether it takes part in queries
    fn set_body_state(&mut self, id: ColliderId, position: Vec2, enabled: bool);

    /// First enabled body on `layers` hit by the ray within `max_distance`
    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit<T>>;

    /// Pairs that overlap now but did not overlap on the previous call
    fn detect_new_overlaps(&mut self) -> Vec<CollisionPair>;
}

#[derive(Debug, Clone)]
struct Body<T> {
    shape: Shape2,
    layer: CollisionLayers,
    mask: CollisionLayers,
    tag: T,
    position: Vec2,
    enabled: bool,
}

impl<T> Body<T> {
    fn placed(&self) -> PlacedShape {
        self.shape.at(self.position)
    }
}

/// Reference physics backend: circles and boxes, brute-force pair tests
#[derive(Debug, Clone)]
pub struct CollisionWorld<T> {
    bodies: BTreeMap<ColliderId, Body<T>>,
    previous_pairs: BTreeSet<CollisionPair>,
}

impl<T: Copy> CollisionWorld<T> {
    /// Create an empty world
    pub fn new() -> Self {
        Self {
            bodies: BTreeMap::new(),
            previous_pairs: BTreeSet::new(),
        }
    }

    /// Number of registered bodies, enabled or not
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Tag of a registered body
    pub fn tag(&self, id: ColliderId) -> Option<T> {
        self.bodies.get(&id).map(|b| b.tag)
    }

    fn current_pairs(&self) -> BTreeSet<CollisionPair> {
        let enabled: Vec<_> = self.bodies.iter().filter(|(_, b)| b.enabled).collect();
        let mut pairs = BTreeSet::new();

        for (i, (id_a, body_a)) in enabled.iter().enumerate() {
            for (id_b, body_b) in &enabled[i + 1..] {
                if !CollisionLayers::should_collide(body_a.layer, body_a.mask, body_b.layer, body_b.mask) {
                    continue;
                }
                if body_a.placed().intersects(&body_b.placed()) {
                    pairs.insert(CollisionPair::new(**id_a, **id_b));
                }
            }
        }

        pairs
    }
}

impl<T: Copy> Default for CollisionWorld<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy> PhysicsService<T> for CollisionWorld<T> {
    fn register_body(&mut self, id: ColliderId, desc: BodyDesc<T>) {
        self.bodies.insert(
            id,
            Body {
                shape: desc.shape,
                layer: desc.layer,
                mask: desc.mask,
                tag: desc.tag,
                position: desc.position,
                enabled: desc.enabled,
            },
        );
    }

    fn set_body_state(&mut self, id: ColliderId, position: Vec2, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(&id) {
            body.position = position;
            body.enabled = enabled;
        } else {
            log::warn!("set_body_state for unknown collider {:?}", id);
        }
    }

    fn raycast(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        layers: CollisionLayers,
    ) -> Option<RayHit<T>> {
        let ray = Ray2::new(origin, direction);
        if ray.direction == Vec2::zeros() {
            return None;
        }

        self.bodies
            .iter()
            .filter(|(_, body)| body.enabled && body.layer.intersects(layers))
            .filter_map(|(id, body)| {
                let placed = body.placed();
                placed
                    .raycast(&ray, max_distance)
                    .map(|distance| (*id, body, distance, placed.area()))
            })
            // Nested shapes tie at zero; the innermost one is the first surface.
            // BTreeMap order makes the smaller id win remaining ties.
            .min_by(|a, b| a.2.total_cmp(&b.2).then(a.3.total_cmp(&b.3)))
            .map(|(collider, body, distance, _)| RayHit {
                collider,
                tag: body.tag,
                point: ray.point_at(distance),
                distance,
            })
    }

    fn detect_new_overlaps(&mut self) -> Vec<CollisionPair> {
        let current = self.current_pairs();
        let new_pairs = current.difference(&self.previous_pairs).copied().collect();
        self.previous_pairs = current;
        new_pairs
    }
}
