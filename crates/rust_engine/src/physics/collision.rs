//! Collision shapes and intersection tests
//!
//! Everything here is 2D and allocation free. Rays that start inside a
//! shape report a hit at distance zero, matching how containment probes
//! are used by gameplay code.

use crate::foundation::math::{utils, Rect, Vec2};

/// Identifier of a collider registered with a physics service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColliderId(pub u32);

/// A ray in 2D world space
#[derive(Debug, Clone, Copy)]
pub struct Ray2 {
    /// The origin point of the ray in world space
    pub origin: Vec2,
    /// The direction of the ray (normalized on construction)
    pub direction: Vec2,
}

impl Ray2 {
    /// Creates a new ray with the given origin and direction
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self {
            origin,
            direction: utils::normalize_or_zero(direction),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }
}

/// Result of a ray query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit<T> {
    /// The collider that was hit
    pub collider: ColliderId,
    /// Gameplay tag attached to the collider
    pub tag: T,
    /// The point of intersection in world space
    pub point: Vec2,
    /// The distance from the ray origin to the hit point
    pub distance: f32,
}

/// Collision shape relative to the owning body's position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape2 {
    /// Circle of the given radius centred on the body
    Circle {
        /// Circle radius
        radius: f32,
    },
    /// Axis-aligned box of the given half extents centred on the body
    Box {
        /// Half of the width and height
        half_extents: Vec2,
    },
}

impl Shape2 {
    /// Place the shape at a world position
    pub fn at(&self, position: Vec2) -> PlacedShape {
        match *self {
            Self::Circle { radius } => PlacedShape::Circle { center: position, radius },
            Self::Box { half_extents } => PlacedShape::Box(Rect {
                center: position,
                half_extents,
            }),
        }
    }
}

/// A shape positioned in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacedShape {
    /// World-space circle
    Circle {
        /// Centre of the circle
        center: Vec2,
        /// Circle radius
        radius: f32,
    },
    /// World-space axis-aligned box
    Box(Rect),
}

impl PlacedShape {
    /// Shape-vs-shape overlap test (touching counts as overlapping)
    pub fn intersects(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Circle { center: a, radius: ra }, Self::Circle { center: b, radius: rb }) => {
                let r = ra + rb;
                (a - b).norm_squared() <= r * r
            }
            (Self::Circle { center, radius }, Self::Box(rect))
            | (Self::Box(rect), Self::Circle { center, radius }) => {
                let closest = closest_point_on_rect(rect, *center);
                (closest - center).norm_squared() <= radius * radius
            }
            (Self::Box(a), Self::Box(b)) => {
                let d = (a.center - b.center).abs();
                let r = a.half_extents + b.half_extents;
                d.x <= r.x && d.y <= r.y
            }
        }
    }

    /// Enclosed area, used to order nested shapes
    pub fn area(&self) -> f32 {
        match self {
            Self::Circle { radius, .. } => std::f32::consts::PI * radius * radius,
            Self::Box(rect) => rect.width() * rect.height(),
        }
    }

    /// Distance along `ray` to the first contact, if within `max_distance`
    pub fn raycast(&self, ray: &Ray2, max_distance: f32) -> Option<f32> {
        let t = match self {
            Self::Circle { center, radius } => ray_circle(ray, *center, *radius)?,
            Self::Box(rect) => ray_rect(ray, rect, max_distance)?,
        };
        (t <= max_distance).then_some(t)
    }
}

fn closest_point_on_rect(rect: &Rect, point: Vec2) -> Vec2 {
    let min = rect.min();
    let max = rect.max();
    Vec2::new(point.x.clamp(min.x, max.x), point.y.clamp(min.y, max.y))
}

fn ray_circle(ray: &Ray2, center: Vec2, radius: f32) -> Option<f32> {
    let m = ray.origin - center;
    let c = m.norm_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = m.dot(&ray.direction);
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some((-b - discriminant.sqrt()).max(0.0))
}

fn ray_rect(ray: &Ray2, rect: &Rect, max_distance: f32) -> Option<f32> {
    let min = rect.min();
    let max = rect.max();
    let mut t_min = 0.0_f32;
    let mut t_max = max_distance;

    for axis in 0..2 {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];

        if direction.abs() < f32::EPSILON {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let mut t1 = (min[axis] - origin) * inv;
        let mut t2 = (max[axis] - origin) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}
