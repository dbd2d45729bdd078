//! Ray type for intersection queries.
//!
//! A ray is defined by an origin point, a direction vector, and the
//! interval of valid parameters `t`. The component-wise reciprocal of
//! the direction is cached at construction so the slab ray/box test can
//! multiply instead of divide.

use crate::{Interval, Vec3};

/// A parametric ray `P(t) = origin + t * direction`.
///
/// Immutable after construction: `direction_inv` is derived from
/// `direction` and must never go stale, so there are no direction
/// setters. Build a new ray instead.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    origin: Vec3,
    /// Direction vector (not necessarily normalized)
    direction: Vec3,
    /// Component-wise reciprocal of `direction`. Zero components yield
    /// IEEE infinities, which the slab test relies on.
    direction_inv: Vec3,
    /// Valid parameter range, `[0, +inf)` by default
    range: Interval,
}

impl Ray {
    /// Create a new ray with the default `[0, +inf)` parameter range.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self::with_range(origin, direction, Interval::new(0.0, f32::INFINITY))
    }

    /// Create a ray with an explicit valid parameter range.
    #[inline]
    pub fn with_range(origin: Vec3, direction: Vec3, range: Interval) -> Self {
        Self {
            origin,
            direction,
            direction_inv: direction.recip(),
            range,
        }
    }

    /// Get the ray's origin point.
    #[inline]
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Get the ray's direction vector.
    #[inline]
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Get the cached component-wise reciprocal of the direction.
    #[inline]
    pub fn direction_inv(&self) -> Vec3 {
        self.direction_inv
    }

    /// Get the valid parameter range.
    #[inline]
    pub fn range(&self) -> Interval {
        self.range
    }

    /// Compute a point along the ray at parameter t.
    /// P(t) = origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + t * self.direction
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::Z)
    }
}
