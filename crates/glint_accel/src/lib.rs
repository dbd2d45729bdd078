//! Glint acceleration structure - CPU ray intersection
//!
//! A bounding volume hierarchy and the ray/primitive solvers underneath
//! it. The renderer hands this crate a flat list of primitives and gets
//! back nearest-hit queries (picking, CPU ray tracing) and area-weighted
//! surface samples (direct-light importance sampling). The tree is
//! immutable once built; scene changes rebuild it.

mod bvh;
mod intersectable;
mod intersection;
mod material;
mod mesh;
mod sphere;
mod triangle;

pub use bvh::{BvhNode, BvhTree, SplitMethod};
pub use intersectable::{Intersectable, Primitive};
pub use intersection::Intersection;
pub use material::Material;
pub use mesh::Mesh;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export common math types from glint_math
pub use glint_math::{Aabb, Interval, Ray, Vec2, Vec3};
