//! Capability trait for anything a ray can hit.

use crate::Intersection;
use glint_math::{Aabb, Ray};
use rand::RngCore;
use std::sync::Arc;

/// Shared handle to a primitive.
///
/// Primitives are shared-immutable: a mesh and the BVH built over it may
/// both hold one, and intersection results carry a `Weak` back-reference
/// to it. BVH nodes never own primitives exclusively, only handles.
pub type Primitive = Arc<dyn Intersectable>;

/// Anything that can answer ray queries: leaf primitives (triangles,
/// spheres) and aggregates that forward into a sub-tree (meshes).
pub trait Intersectable: Send + Sync {
    /// Boolean visibility test. The default just runs the full query;
    /// primitives with a cheaper predicate can override.
    fn intersect(&self, ray: &Ray) -> bool {
        self.get_intersection(ray).hit
    }

    /// Nearest intersection along `ray`, or a default (miss) record.
    fn get_intersection(&self, ray: &Ray) -> Intersection;

    /// World-space bounds of this primitive.
    fn bounds(&self) -> Aabb;

    /// Surface area, used as the importance-sampling weight. This is a
    /// sampling measure, not a spatial one: aggregates report the sum of
    /// their leaves' areas.
    fn area(&self) -> f32;

    /// Draw a uniform point on the surface. Returns the sampled point
    /// (position, normal, uv, material filled in) and the pdf with
    /// respect to area, `1 / area()` for leaf primitives.
    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32);

    /// Whether this primitive emits light (candidate for light sampling).
    fn is_emissive(&self) -> bool;
}
