//! Result value of a ray intersection query.

use crate::{Intersectable, Material};
use glint_math::{Vec2, Vec3};
use std::sync::{Arc, Weak};

/// Record of a ray/primitive intersection.
///
/// A default-constructed record means "no hit" and carries
/// `distance = +inf`, which keeps nearest-hit comparisons well-defined
/// without a separate miss branch. The primitive and material fields are
/// non-owning: the primitive owns its material association, the result
/// only points back at them.
#[derive(Clone)]
pub struct Intersection {
    /// Whether the ray hit anything
    pub hit: bool,
    /// World-space impact point
    pub point: Vec3,
    /// Surface normal at the impact point
    pub normal: Vec3,
    /// Interpolated texture coordinates
    pub uv: Vec2,
    /// Parametric distance along the ray, +inf on a miss
    pub distance: f32,
    /// Material of the hit surface, shared immutably with the primitive
    pub material: Option<Arc<Material>>,
    /// Back-reference to the hit primitive, attached by the BVH leaf
    pub primitive: Option<Weak<dyn Intersectable>>,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            hit: false,
            point: Vec3::ZERO,
            normal: Vec3::ZERO,
            uv: Vec2::ZERO,
            distance: f32::INFINITY,
            material: None,
            primitive: None,
        }
    }
}

impl Intersection {
    /// Whether the hit surface emits light.
    pub fn has_emission(&self) -> bool {
        self.material
            .as_ref()
            .map(|m| m.has_emission())
            .unwrap_or(false)
    }

    /// Emission of the hit surface, zero when absent or non-emissive.
    pub fn emission(&self) -> Vec3 {
        self.material
            .as_ref()
            .map(|m| m.emission)
            .unwrap_or(Vec3::ZERO)
    }
}
