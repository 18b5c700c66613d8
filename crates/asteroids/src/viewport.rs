//! Visible play area
//!
//! World space is centred on the viewport, one world unit per screen pixel,
//! +Y up. Screen space has its origin in the lower-left corner.

use rand::Rng;
use rust_engine::foundation::math::{Rect, Vec2};

use crate::config::ViewportConfig;

/// The camera-visible rectangle and the band around it used for off-screen
/// spawning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    rect: Rect,
    outside: Rect,
}

impl Viewport {
    /// Build the viewport described by `config`
    pub fn new(config: &ViewportConfig) -> Self {
        let rect = Rect::from_center_size(Vec2::zeros(), Vec2::new(config.width, config.height));
        Self {
            rect,
            outside: rect.expanded_by_fraction(config.outside_margin_x, config.outside_margin_y),
        }
    }

    /// Visible rectangle in world space
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Sampling rectangle for off-screen spawn points
    pub fn outside_rect(&self) -> Rect {
        self.outside
    }

    /// Whether a world point is visible
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Project a world point to screen pixels
    pub fn world_to_screen(&self, point: Vec2) -> Vec2 {
        point - self.rect.min()
    }

    /// Project screen pixels back to world space
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.rect.min()
    }

    /// Mirror a position that left the visible rectangle to the opposite edge
    ///
    /// Only one axis flips per call, X taking precedence, mirrored through
    /// the viewport centre. Uses the same per-axis test as [`Self::contains`],
    /// so any point `contains` rejects is moved.
    pub fn wrap(&self, point: Vec2) -> Vec2 {
        let center = self.rect.center;
        let d = point - center;
        if d.x.abs() > self.rect.half_extents.x {
            Vec2::new(center.x - d.x, point.y)
        } else if d.y.abs() > self.rect.half_extents.y {
            Vec2::new(point.x, center.y - d.y)
        } else {
            point
        }
    }

    /// Uniform random point inside the visible rectangle
    pub fn sample_inside(&self, rng: &mut impl Rng) -> Vec2 {
        sample(&self.rect, rng)
    }

    /// Uniform random point inside the expanded off-screen rectangle
    pub fn sample_outside(&self, rng: &mut impl Rng) -> Vec2 {
        sample(&self.outside, rng)
    }
}

fn sample(rect: &Rect, rng: &mut impl Rng) -> Vec2 {
    let min = rect.min();
    let max = rect.max();
    Vec2::new(rng.gen_range(min.x..=max.x), rng.gen_range(min.y..=max.y))
}
