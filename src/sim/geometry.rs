//! Small geometry primitives and random helpers
//!
//! Vector arithmetic comes from `glam`; this module adds the shapes the
//! collision code works with and the few helpers glam does not provide.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A circle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Overlap test against another circle (touching counts)
    #[inline]
    pub fn intersects_circle(&self, other: &Circle) -> bool {
        let radius_sum = self.radius + other.radius;
        self.center.distance_squared(other.center) <= radius_sum * radius_sum
    }

    /// Overlap test against an axis-aligned rectangle, using the distance
    /// from the circle center to the closest point of the rectangle
    #[inline]
    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        let dx = (rect.min.x - self.center.x)
            .max(self.center.x - rect.max.x)
            .max(0.0);
        let dy = (rect.min.y - self.center.y)
            .max(self.center.y - rect.max.y)
            .max(0.0);
        dx * dx + dy * dy <= self.radius * self.radius
    }
}

/// An axis-aligned rectangle in pixel space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    /// Bounds of grid cell (x, y)
    pub fn from_cell(x: i32, y: i32, cell_size: f32) -> Self {
        Self::new(x as f32 * cell_size, y as f32 * cell_size, cell_size, cell_size)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Strict overlap (shared edges do not count)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }
}

/// Linear interpolation between two scalars
#[inline]
pub fn lerp(start: f32, end: f32, factor: f32) -> f32 {
    start + (end - start) * factor
}

/// Round to a number of decimal places
pub fn round_to(value: f32, decimals: i32) -> f32 {
    let factor = 10f32.powi(decimals);
    (value * factor).round() / factor
}

/// Uniform float in [min, max)
pub fn random_between(rng: &mut impl Rng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}

/// Uniform integer in [min, max]
pub fn random_int_between(rng: &mut impl Rng, min: i32, max: i32) -> i32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

/// Random element of a slice (None when empty)
pub fn random_element<'a, T>(rng: &mut impl Rng, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(rng.random_range(0..items.len()))
}
