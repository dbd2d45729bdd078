//! Minimal surface description attached to primitives.
//!
//! The real material system (shaders, textures, uniforms) lives outside
//! this crate; intersection queries only need the emission term for
//! light sampling and a flat base color for debug output. Materials are
//! shared immutably via `Arc` - primitives reference them, nothing here
//! mutates them.

use glint_math::Vec3;

/// Immutable per-surface constants shared by one or more primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub base_color: Vec3,
    pub emission: Vec3,
}

impl Material {
    /// A non-emissive material with the given base color.
    pub fn new(base_color: Vec3) -> Self {
        Self {
            base_color,
            emission: Vec3::ZERO,
        }
    }

    /// An emissive material (a light source for importance sampling).
    pub fn emissive(base_color: Vec3, emission: Vec3) -> Self {
        Self {
            base_color,
            emission,
        }
    }

    /// Whether this material emits light.
    pub fn has_emission(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new(Vec3::splat(0.5))
    }
}
