//! Sphere primitive.

use crate::{Intersectable, Intersection, Material};
use glint_math::{solve_quadratic, Aabb, Mat4, Ray, Vec3, Vec4};
use rand::{Rng, RngCore};
use std::f32::consts::PI;
use std::sync::Arc;

/// Default minimum accepted hit distance.
///
/// Inherited scene tuning rather than a numerical epsilon; override per
/// sphere with [`Sphere::with_min_hit_distance`] when 0.5 world units is
/// too coarse.
pub const DEFAULT_MIN_HIT_DISTANCE: f32 = 0.5;

/// A sphere with cached derived state (`radius²`, area).
pub struct Sphere {
    center: Vec3,
    radius: f32,
    /// Cached radius², recomputed on transform
    radius2: f32,
    /// Cached surface area 4πr², recomputed on transform
    area: f32,
    /// Hits closer than this along the ray are rejected
    min_hit_distance: f32,
    material: Arc<Material>,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, material: Arc<Material>) -> Self {
        Self {
            center,
            radius,
            radius2: radius * radius,
            area: 4.0 * PI * radius * radius,
            min_hit_distance: DEFAULT_MIN_HIT_DISTANCE,
            material,
        }
    }

    /// Override the near-hit rejection threshold.
    pub fn with_min_hit_distance(mut self, min_hit_distance: f32) -> Self {
        self.min_hit_distance = min_hit_distance;
        self
    }

    /// Move the center and scale the radius through a homogeneous
    /// transform, then recompute the derived fields. Assumes a uniform
    /// scale; the radius follows the transformed x basis vector.
    pub fn transform(&mut self, matrix: &Mat4) {
        let c = *matrix * Vec4::new(self.center.x, self.center.y, self.center.z, 1.0);
        self.center = c.truncate();
        self.radius *= matrix.x_axis.truncate().length();
        self.radius2 = self.radius * self.radius;
        self.area = 4.0 * PI * self.radius2;
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }
}

impl Intersectable for Sphere {
    /// Boolean test without the near-distance policy: any root in front
    /// of the origin counts.
    fn intersect(&self, ray: &Ray) -> bool {
        let l = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * ray.direction().dot(l);
        let c = l.dot(l) - self.radius2;
        match solve_quadratic(a, b, c) {
            Some((t0, t1)) => t0.max(t1) >= 0.0,
            None => false,
        }
    }

    fn get_intersection(&self, ray: &Ray) -> Intersection {
        let mut isect = Intersection::default();

        // Analytic solution of |O + tD - C|² = r²
        let l = ray.origin() - self.center;
        let a = ray.direction().dot(ray.direction());
        let b = 2.0 * ray.direction().dot(l);
        let c = l.dot(l) - self.radius2;

        let Some((t0, t1)) = solve_quadratic(a, b, c) else {
            return isect;
        };

        // Smaller positive root, or the larger if the ray starts inside
        let t = if t0 < 0.0 { t1 } else { t0 };
        if t < self.min_hit_distance {
            return isect;
        }

        isect.hit = true;
        isect.distance = t;
        isect.point = ray.at(t);
        isect.normal = (isect.point - self.center).normalize();
        isect.material = Some(self.material.clone());
        isect
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(
            self.center - Vec3::splat(self.radius),
            self.center + Vec3::splat(self.radius),
        )
    }

    fn area(&self) -> f32 {
        self.area
    }

    /// Uniform sampling over the sphere's surface; pdf = 1 / (4πr²).
    fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        let theta = 2.0 * PI * rng.gen::<f32>();
        let phi = PI * rng.gen::<f32>();
        let dir = Vec3::new(
            phi.cos(),
            phi.sin() * theta.cos(),
            phi.sin() * theta.sin(),
        );

        let mut pos = Intersection::default();
        pos.point = self.center + self.radius * dir;
        pos.normal = dir;
        pos.material = Some(self.material.clone());

        (pos, 1.0 / self.area)
    }

    fn is_emissive(&self) -> bool {
        self.material.has_emission()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn unit_sphere() -> Sphere {
        Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::default()))
    }

    #[test]
    fn test_sphere_axial_hit() {
        // Unit sphere at origin, ray from (0,0,5) toward -Z
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let isect = sphere.get_intersection(&ray);
        assert!(isect.hit);
        assert!((isect.distance - 4.0).abs() < 1e-5);
        assert!((isect.point - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
        assert!((isect.normal - Vec3::new(0.0, 0.0, 1.0)).length() < 1e-5);
    }

    #[test]
    fn test_sphere_miss() {
        let sphere = unit_sphere();
        let ray = Ray::new(Vec3::new(0.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(!sphere.get_intersection(&ray).hit);
        assert!(!sphere.intersect(&ray));
    }

    #[test]
    fn test_sphere_behind_origin() {
        let sphere = unit_sphere();
        // Both roots negative: sphere entirely behind the ray
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(!sphere.get_intersection(&ray).hit);
        assert!(!sphere.intersect(&ray));
    }

    #[test]
    fn test_sphere_inside_takes_far_root() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, Arc::new(Material::default()));
        // Origin inside: t0 < 0, accept t1
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        let isect = sphere.get_intersection(&ray);
        assert!(isect.hit);
        assert!((isect.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_min_hit_distance_policy() {
        let near = Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::default()));
        // Hit at t = 0.2, below the 0.5 default threshold
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.2), Vec3::new(0.0, 0.0, -1.0));
        assert!(!near.get_intersection(&ray).hit);

        // Lowering the threshold accepts the same hit
        let tolerant = Sphere::new(Vec3::ZERO, 1.0, Arc::new(Material::default()))
            .with_min_hit_distance(1e-4);
        let isect = tolerant.get_intersection(&ray);
        assert!(isect.hit);
        assert!((isect.distance - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_sphere_bounds_and_area() {
        let sphere = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 2.0, Arc::new(Material::default()));
        let b = sphere.bounds();
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(b.max, Vec3::new(3.0, 4.0, 5.0));
        assert!((sphere.area() - 16.0 * PI).abs() < 1e-4);
    }

    #[test]
    fn test_sphere_transform_recomputes() {
        let mut sphere = unit_sphere();
        sphere.transform(&Mat4::from_scale_rotation_translation(
            Vec3::splat(3.0),
            glint_math::Quat::IDENTITY,
            Vec3::new(0.0, 10.0, 0.0),
        ));

        assert!((sphere.center() - Vec3::new(0.0, 10.0, 0.0)).length() < 1e-5);
        assert!((sphere.radius() - 3.0).abs() < 1e-5);
        assert!((sphere.area() - 36.0 * PI).abs() < 1e-3);
    }

    #[test]
    fn test_sphere_sample_on_surface() {
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0, Arc::new(Material::default()));
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..128 {
            let (pos, pdf) = sphere.sample(&mut rng);
            assert!(((pos.point - sphere.center()).length() - 2.0).abs() < 1e-5);
            assert!((pos.normal.length() - 1.0).abs() < 1e-5);
            assert!((pdf - 1.0 / sphere.area()).abs() < 1e-9);
        }
    }
}
