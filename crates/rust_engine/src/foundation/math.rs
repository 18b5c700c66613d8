//! Math utilities and types
//!
//! Provides the 2D math types used by the arcade simulation. World space is
//! right-handed with +Y up and the origin at the centre of the play area.

pub use nalgebra::{Unit, Vector2};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Axis-aligned rectangle stored as centre and half extents
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Centre of the rectangle
    pub center: Vec2,

    /// Half of the width and height
    pub half_extents: Vec2,
}

impl Rect {
    /// Create a rectangle from its centre and full size
    pub fn from_center_size(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_extents: size * 0.5,
        }
    }

    /// Create a rectangle from two opposite corners
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min).abs() * 0.5,
        }
    }

    /// Lower-left corner
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    /// Upper-right corner
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    /// Full width
    pub fn width(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    /// Full height
    pub fn height(&self) -> f32 {
        self.half_extents.y * 2.0
    }

    /// Whether the point lies inside or on the border of the rectangle
    pub fn contains(&self, point: Vec2) -> bool {
        let d = point - self.center;
        d.x.abs() <= self.half_extents.x && d.y.abs() <= self.half_extents.y
    }

    /// Grow the rectangle by a fraction of its own size on every side
    ///
    /// A margin of `0.4` on X adds 40% of the width to the left and another
    /// 40% to the right.
    pub fn expanded_by_fraction(&self, margin_x: f32, margin_y: f32) -> Self {
        Self {
            center: self.center,
            half_extents: Vec2::new(
                self.half_extents.x * (1.0 + 2.0 * margin_x),
                self.half_extents.y * (1.0 + 2.0 * margin_y),
            ),
        }
    }
}

/// Math utility functions
pub mod utils {
    use super::Vec2;

    /// Normalize a vector, returning zero for (near) zero-length input
    pub fn normalize_or_zero(v: Vec2) -> Vec2 {
        let len = v.norm();
        if len > f32::EPSILON {
            v / len
        } else {
            Vec2::zeros()
        }
    }

    /// Unit direction for a rotation in radians, measured from +X counter-clockwise
    pub fn direction_from_angle(radians: f32) -> Vec2 {
        Vec2::new(radians.cos(), radians.sin())
    }

    /// Rotation in radians of a direction vector, measured from +X counter-clockwise
    pub fn angle_of(direction: Vec2) -> f32 {
        direction.y.atan2(direction.x)
    }

    /// Clamp the length of a vector to `max_len`
    pub fn clamp_length(v: Vec2, max_len: f32) -> Vec2 {
        let len = v.norm();
        if len > max_len && len > f32::EPSILON {
            v * (max_len / len)
        } else {
            v
        }
    }
}
