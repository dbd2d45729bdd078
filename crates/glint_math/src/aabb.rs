//! Axis-aligned bounding box for spatial acceleration structures (BVH).

use crate::{Mat4, Ray, Vec3, Vec4};

/// An axis-aligned bounding box stored as component-wise min/max corners.
///
/// The canonical empty box is `min = +inf, max = -inf`; merging anything
/// into it yields that thing's bounds. `min > max` never occurs outside
/// the empty state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An empty box (contains nothing, absorbs nothing under merge).
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::INFINITY,
        max: Vec3::NEG_INFINITY,
    };

    /// Create a box directly from its two corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box from two arbitrary corner points (sorted per axis).
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Expand this box in place to contain `point`. Returns `&mut self`
    /// for chaining during construction loops.
    pub fn merge_point(&mut self, point: Vec3) -> &mut Self {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
        self
    }

    /// Expand this box in place to contain `other`. Returns `&mut self`
    /// for chaining.
    pub fn merge(&mut self, other: &Aabb) -> &mut Self {
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self
    }

    /// Return a new box containing both inputs, mutating neither.
    pub fn union(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb {
            min: a.min.min(b.min),
            max: a.max.max(b.max),
        }
    }

    /// Center point of the box.
    pub fn centroid(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Extent of the box per axis.
    pub fn diagonal(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index (0=X, 1=Y, 2=Z) of the axis with the largest extent.
    /// Ties prefer x over y over z.
    pub fn max_extent_axis(&self) -> usize {
        let d = self.diagonal();
        if d.x > d.y && d.x > d.z {
            0
        } else if d.y > d.z {
            1
        } else {
            2
        }
    }

    /// Total surface area of the box.
    pub fn surface_area(&self) -> f32 {
        let d = self.diagonal();
        2.0 * (d.x * d.y + d.x * d.z + d.y * d.z)
    }

    /// Per-axis interval overlap test; touching boxes count as overlapping.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
            && self.min.z <= other.max.z
            && other.min.z <= self.max.z
    }

    /// Returns true if `point` is strictly inside the box.
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpgt(self.min).all() && point.cmplt(self.max).all()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        [
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
        ]
    }

    /// Axis-aligned bounds of this box under an affine transform,
    /// computed by merging the eight transformed corners.
    pub fn transform(&self, matrix: &Mat4) -> Aabb {
        let mut out = Aabb::EMPTY;
        for corner in self.corners() {
            let p = *matrix * Vec4::new(corner.x, corner.y, corner.z, 1.0);
            out.merge_point(p.truncate());
        }
        out
    }

    /// Slab-method ray/box test.
    ///
    /// Per axis: `t0 = (min - origin) * dir_inv`, `t1 = (max - origin) *
    /// dir_inv`, sorted per axis; hit iff the latest entry is no later
    /// than the earliest exit and the exit is not behind the origin.
    /// Zero direction components flow through as IEEE infinities; a NaN
    /// from `0 * inf` (origin exactly on a slab plane with a parallel
    /// ray) makes the comparison fail closed to "miss".
    pub fn intersects_ray(&self, ray: &Ray) -> bool {
        let t0 = (self.min - ray.origin()) * ray.direction_inv();
        let t1 = (self.max - ray.origin()) * ray.direction_inv();
        let t_near = t0.min(t1);
        let t_far = t0.max(t1);

        let t_enter = t_near.x.max(t_near.y).max(t_near.z);
        let t_exit = t_far.x.min(t_far.y).min(t_far.z);
        t_exit >= 0.0 && t_enter <= t_exit
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
