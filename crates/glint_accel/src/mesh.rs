//! Mesh aggregate: a bag of triangles behind its own BVH.
//!
//! Decomposes an indexed vertex buffer into world-space triangles and
//! owns a sub-tree over them. As an `Intersectable` it forwards every
//! query into that sub-tree, which is what lets a scene-level BVH be
//! built hierarchically over meshes-of-meshes.

use crate::{BvhTree, Intersectable, Intersection, Material, Primitive, SplitMethod, Triangle};
use glint_math::{Aabb, Mat4, Ray, Vec2, Vec3};
use rand::RngCore;
use std::sync::Arc;

/// A triangle mesh with a private BVH.
pub struct Mesh {
    bvh: BvhTree,
    material: Arc<Material>,
}

impl Mesh {
    /// Build a mesh from an indexed triangle list.
    ///
    /// `indices` come in groups of three; `uvs`, when present, must be
    /// parallel to `positions`. Vertices are transformed into world
    /// space by `model_matrix` before the triangles cache their derived
    /// state, so the sub-tree is built over world-space geometry.
    pub fn new(
        positions: &[Vec3],
        uvs: Option<&[Vec2]>,
        indices: &[u32],
        model_matrix: &Mat4,
        material: Arc<Material>,
        split_method: SplitMethod,
    ) -> Self {
        debug_assert!(indices.len() % 3 == 0, "indices must form whole triangles");

        let triangles: Vec<Primitive> = indices
            .chunks_exact(3)
            .map(|chunk| {
                let (i0, i1, i2) = (chunk[0] as usize, chunk[1] as usize, chunk[2] as usize);
                let (uv0, uv1, uv2) = match uvs {
                    Some(uvs) => (uvs[i0], uvs[i1], uvs[i2]),
                    None => (Vec2::ZERO, Vec2::ZERO, Vec2::ZERO),
                };
                let mut tri = Triangle::with_uvs(
                    positions[i0],
                    positions[i1],
                    positions[i2],
                    uv0,
                    uv1,
                    uv2,
                    Arc::clone(&material),
                );
                tri.transform(model_matrix);
                Arc::new(tri) as Primitive
            })
            .collect();

        log::debug!("Mesh decomposed into {} triangles", triangles.len());

        Self {
            bvh: BvhTree::build(triangles, 1, split_method),
            material,
        }
    }

    /// Number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.bvh.primitive_count()
    }

    /// The mesh's internal tree, for debug visualization walks.
    pub fn bvh(&self) -> &BvhTree {
        &self.bvh
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

impl Intersectable for Mesh {
    fn get_intersection(&self, ray: &Ray) -> Intersection {
        self.bvh.intersect(ray)
    }

    fn bounds(&self) -> Aabb {
        self.bvh.world_bounds()
    }

    /// Sum of the triangle areas (the sub-tree root area), so nested
    /// area-weighted sampling composes across tree levels.
    fn area(&self) -> f32 {
        self.bvh.total_area()
    }

    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        // The sub-tree already returns pdf relative to the mesh's own
        // area; the enclosing tree rescales it by this leaf's area.
        self.bvh.sample(rng)
    }

    fn is_emissive(&self) -> bool {
        self.material.has_emission()
    }
}
