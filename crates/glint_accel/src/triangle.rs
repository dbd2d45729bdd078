//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection and
//! uniform area sampling via barycentric coordinates.

use crate::{Intersectable, Intersection, Material};
use glint_math::{Aabb, Mat4, Ray, Vec2, Vec3, Vec4};
use rand::{Rng, RngCore};
use std::sync::Arc;

/// Near-parallel rejection threshold for the Möller-Trumbore determinant.
const EPSILON: f32 = 1e-6;

/// A single triangle with cached derived state.
///
/// The edges, face normal and area are derived from the vertices and
/// recomputed on every vertex mutation; `transform` is the only mutator.
pub struct Triangle {
    /// Vertices, counter-clockwise order
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Cached edges v1-v0 and v2-v0
    e1: Vec3,
    e2: Vec3,
    /// Per-vertex texture coordinates
    uv0: Vec2,
    uv1: Vec2,
    uv2: Vec2,
    /// Unit face normal, from e1 x e2
    normal: Vec3,
    /// Surface area, |e1 x e2| / 2
    area: f32,
    /// Shared material association
    material: Arc<Material>,
}

impl Triangle {
    /// Create a triangle from three vertices with zeroed UVs.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Arc<Material>) -> Self {
        Self::with_uvs(v0, v1, v2, Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, material)
    }

    /// Create a triangle with per-vertex texture coordinates.
    pub fn with_uvs(
        v0: Vec3,
        v1: Vec3,
        v2: Vec3,
        uv0: Vec2,
        uv1: Vec2,
        uv2: Vec2,
        material: Arc<Material>,
    ) -> Self {
        let mut tri = Self {
            v0,
            v1,
            v2,
            e1: Vec3::ZERO,
            e2: Vec3::ZERO,
            uv0,
            uv1,
            uv2,
            normal: Vec3::ZERO,
            area: 0.0,
            material,
        };
        tri.recompute_derived();
        tri
    }

    /// Apply a homogeneous transform to the vertices. The cached edges,
    /// normal and area are re-derived immediately; vertices are never
    /// mutated without this recomputation.
    pub fn transform(&mut self, matrix: &Mat4) {
        self.v0 = transform_point(matrix, self.v0);
        self.v1 = transform_point(matrix, self.v1);
        self.v2 = transform_point(matrix, self.v2);
        self.recompute_derived();
    }

    fn recompute_derived(&mut self) {
        self.e1 = self.v1 - self.v0;
        self.e2 = self.v2 - self.v0;
        let cross = self.e1.cross(self.e2);
        self.normal = cross.normalize();
        self.area = cross.length() * 0.5;
    }

    /// The triangle's unit face normal.
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// The triangle's vertices.
    pub fn vertices(&self) -> (Vec3, Vec3, Vec3) {
        (self.v0, self.v1, self.v2)
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }
}

fn transform_point(matrix: &Mat4, p: Vec3) -> Vec3 {
    (*matrix * Vec4::new(p.x, p.y, p.z, 1.0)).truncate()
}

impl Intersectable for Triangle {
    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// One-sided by policy: rays hitting the back face (direction along
    /// the geometric normal) are rejected up front.
    fn get_intersection(&self, ray: &Ray) -> Intersection {
        let mut isect = Intersection::default();

        if ray.direction().dot(self.normal) > 0.0 {
            return isect;
        }

        // O + tD = (1-u-v) V0 + u V1 + v V2
        let s1 = ray.direction().cross(self.e2);
        let det = self.e1.dot(s1);
        if det.abs() < EPSILON {
            return isect;
        }

        let det_inv = 1.0 / det;
        let s = ray.origin() - self.v0;
        let s2 = s.cross(self.e1);

        let u = s.dot(s1) * det_inv;
        if !(0.0..=1.0).contains(&u) {
            return isect;
        }
        let v = ray.direction().dot(s2) * det_inv;
        if v < 0.0 || u + v > 1.0 {
            return isect;
        }
        let t = self.e2.dot(s2) * det_inv;
        if t < 0.0 {
            return isect;
        }

        isect.hit = true;
        isect.distance = t;
        isect.point = ray.at(t);
        isect.normal = self.normal;
        isect.uv = (1.0 - u - v) * self.uv0 + u * self.uv1 + v * self.uv2;
        isect.material = Some(self.material.clone());
        isect
    }

    fn bounds(&self) -> Aabb {
        let mut aabb = Aabb::from_points(self.v0, self.v1);
        aabb.merge_point(self.v2);
        aabb
    }

    fn area(&self) -> f32 {
        self.area
    }

    /// Uniform sampling over the triangle's surface.
    ///
    /// `x = sqrt(r1)` warps the unit square into barycentric space so
    /// the density is uniform in area; pdf is therefore `1 / area`.
    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        let x = rng.gen::<f32>().sqrt();
        let y = rng.gen::<f32>();

        let mut pos = Intersection::default();
        pos.point = self.v0 * (1.0 - x) + self.v1 * (x * (1.0 - y)) + self.v2 * (x * y);
        pos.uv = self.uv0 * (1.0 - x) + self.uv1 * (x * (1.0 - y)) + self.uv2 * (x * y);
        pos.normal = self.normal;
        pos.material = Some(self.material.clone());

        (pos, 1.0 / self.area)
    }

    fn is_emissive(&self) -> bool {
        self.material.has_emission()
    }
}
