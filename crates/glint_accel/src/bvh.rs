//! Bounding volume hierarchy: builder and query engine.
//!
//! Builds a binary tree over a primitive set and answers nearest-hit
//! queries and area-weighted sample queries. The tree is immutable after
//! construction and safe to query from multiple threads; a scene change
//! discards and rebuilds it.

use crate::{Intersection, Primitive};
use glint_math::{Aabb, Ray};
use rand::{Rng, RngCore};
use std::sync::Arc;
use std::time::Instant;

/// Hard cap on `max_prims_per_leaf`.
const MAX_PRIMS_PER_LEAF_LIMIT: usize = 255;

/// SAH cost model constants (relative units).
const INTERSECTION_COST: f32 = 1.0;
const TRAVERSAL_COST: f32 = 1.5;

/// How the builder partitions a subset of primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMethod {
    /// Object-median split on the centroid axis of largest extent.
    Median,
    /// Sweep surface-area-heuristic split: evaluates every candidate
    /// partition on all three axes and picks the cheapest.
    Sah,
}

/// A node of the hierarchy.
///
/// A leaf holds exactly one primitive handle; an interior node owns its
/// two children exclusively (strict tree, never shared). A node's bounds
/// contain the bounds of every primitive in its subtree, and its area is
/// the sum of its leaf areas - the importance-sampling weight, not a
/// spatial measure.
pub enum BvhNode {
    Leaf {
        primitive: Primitive,
        bounds: Aabb,
        area: f32,
    },
    Interior {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bounds: Aabb,
        area: f32,
        /// Split axis chosen by the builder (diagnostics)
        axis: usize,
    },
}

impl BvhNode {
    /// Bounds of this node's subtree.
    pub fn bounds(&self) -> Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } => *bounds,
            BvhNode::Interior { bounds, .. } => *bounds,
        }
    }

    /// Summed leaf area of this node's subtree.
    pub fn area(&self) -> f32 {
        match self {
            BvhNode::Leaf { area, .. } => *area,
            BvhNode::Interior { area, .. } => *area,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, BvhNode::Leaf { .. })
    }

    /// Children of an interior node, `None` for a leaf.
    pub fn children(&self) -> Option<(&BvhNode, &BvhNode)> {
        match self {
            BvhNode::Leaf { .. } => None,
            BvhNode::Interior { left, right, .. } => Some((left, right)),
        }
    }

    /// Split axis recorded for an interior node, `None` for a leaf.
    pub fn split_axis(&self) -> Option<usize> {
        match self {
            BvhNode::Leaf { .. } => None,
            BvhNode::Interior { axis, .. } => Some(*axis),
        }
    }

    /// Depth-first walk (root first), calling `visit` with each node and
    /// its depth. This is the read-only surface the renderer uses to
    /// draw per-depth wireframe boxes.
    pub fn visit(&self, visit: &mut dyn FnMut(&BvhNode, usize)) {
        self.visit_at(0, visit);
    }

    fn visit_at(&self, depth: usize, visit: &mut dyn FnMut(&BvhNode, usize)) {
        visit(self, depth);
        if let BvhNode::Interior { left, right, .. } = self {
            left.visit_at(depth + 1, visit);
            right.visit_at(depth + 1, visit);
        }
    }
}

/// The acceleration structure: owns the root node and a copy of the flat
/// primitive list it was built from (kept for diagnostics only).
pub struct BvhTree {
    root: Option<Box<BvhNode>>,
    primitives: Vec<Primitive>,
    max_prims_per_leaf: usize,
    split_method: SplitMethod,
}

impl BvhTree {
    /// Build a tree over `primitives`. An empty input produces a valid
    /// empty tree whose queries report "no hit" / pdf 0.
    ///
    /// Leaves always hold exactly one primitive; `max_prims_per_leaf`
    /// is recorded (clamped to 255) as a build parameter but does not
    /// widen leaves.
    pub fn build(
        primitives: Vec<Primitive>,
        max_prims_per_leaf: usize,
        split_method: SplitMethod,
    ) -> Self {
        let start = Instant::now();

        let root = if primitives.is_empty() {
            None
        } else {
            // Carry the original index as a sort tie-breaker so repeated
            // builds over the same input produce identical trees.
            let mut subset: Vec<(Primitive, usize)> = primitives
                .iter()
                .map(|p| Arc::clone(p))
                .zip(0..)
                .collect();
            Some(Box::new(recursive_build(&mut subset, split_method)))
        };

        log::debug!(
            "BVH build complete: {} primitives, {:?} split, {:.2?} elapsed",
            primitives.len(),
            split_method,
            start.elapsed()
        );

        Self {
            root,
            primitives,
            max_prims_per_leaf: max_prims_per_leaf.min(MAX_PRIMS_PER_LEAF_LIMIT),
            split_method,
        }
    }

    /// Nearest intersection of `ray` with any primitive in the tree.
    /// Misses (and the empty tree) return the default no-hit record with
    /// `distance = +inf`.
    pub fn intersect(&self, ray: &Ray) -> Intersection {
        match &self.root {
            Some(root) => intersect_node(root, ray),
            None => Intersection::default(),
        }
    }

    /// Draw a point on the scene surface, weighted by primitive area.
    ///
    /// The split point is drawn as `sqrt(u) * root_area`, the law
    /// downstream light sampling assumes: the sqrt skews the draw
    /// toward the high end of the area range, so the weighting is the
    /// recursive bracket selection below, not an exact
    /// `area / total_area` pick. The returned pdf is always
    /// `1 / total_area`; the empty tree returns pdf 0.
    pub fn sample(&self, rng: &mut dyn RngCore) -> (Intersection, f32) {
        let Some(root) = &self.root else {
            return (Intersection::default(), 0.0);
        };

        let split = rng.gen::<f32>().sqrt() * root.area();
        let (pos, pdf) = sample_node(root, split, rng);
        (pos, pdf / root.area())
    }

    /// Bounds of the whole tree; the empty box for an empty tree.
    pub fn world_bounds(&self) -> Aabb {
        match &self.root {
            Some(root) => root.bounds(),
            None => Aabb::EMPTY,
        }
    }

    /// Summed area of all primitives, 0 for an empty tree.
    pub fn total_area(&self) -> f32 {
        self.root.as_ref().map(|r| r.area()).unwrap_or(0.0)
    }

    /// Root node for read-only walks (debug visualization).
    pub fn root(&self) -> Option<&BvhNode> {
        self.root.as_deref()
    }

    /// Number of primitives the tree was built over.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    pub fn max_prims_per_leaf(&self) -> usize {
        self.max_prims_per_leaf
    }

    pub fn split_method(&self) -> SplitMethod {
        self.split_method
    }
}

/// Centroid coordinate of a primitive's bounds on `axis`.
fn centroid_on(primitive: &Primitive, axis: usize) -> f32 {
    primitive.bounds().centroid()[axis]
}

/// Sort a subset by centroid coordinate on `axis`. `total_cmp` plus the
/// original-index tie-breaker gives a total order, so builds are
/// deterministic even with duplicate or degenerate centroids.
fn sort_by_axis(subset: &mut [(Primitive, usize)], axis: usize) {
    subset.sort_by(|a, b| {
        centroid_on(&a.0, axis)
            .total_cmp(&centroid_on(&b.0, axis))
            .then(a.1.cmp(&b.1))
    });
}

fn recursive_build(subset: &mut [(Primitive, usize)], split_method: SplitMethod) -> BvhNode {
    match subset.len() {
        0 => unreachable!("recursive_build requires a non-empty subset"),
        1 => {
            let primitive = Arc::clone(&subset[0].0);
            let bounds = primitive.bounds();
            let area = primitive.area();
            BvhNode::Leaf {
                primitive,
                bounds,
                area,
            }
        }
        2 => {
            // Kept uniform with the general branch: two single-primitive
            // leaves under one interior node.
            let (first, second) = subset.split_at_mut(1);
            let left = Box::new(recursive_build(first, split_method));
            let right = Box::new(recursive_build(second, split_method));
            let bounds = Aabb::union(&left.bounds(), &right.bounds());
            let area = left.area() + right.area();
            BvhNode::Interior {
                left,
                right,
                bounds,
                area,
                axis: 0,
            }
        }
        n => {
            let (axis, mid) = match split_method {
                SplitMethod::Median => median_split(subset),
                SplitMethod::Sah => sah_split(subset),
            };
            debug_assert!(mid > 0 && mid < n);

            let (left_subset, right_subset) = subset.split_at_mut(mid);
            let left = Box::new(recursive_build(left_subset, split_method));
            let right = Box::new(recursive_build(right_subset, split_method));
            let bounds = Aabb::union(&left.bounds(), &right.bounds());
            let area = left.area() + right.area();
            BvhNode::Interior {
                left,
                right,
                bounds,
                area,
                axis,
            }
        }
    }
}

/// Object-median split: sort by centroid on the axis where the centroids
/// spread the widest, cut at the midpoint index. Always balanced, so the
/// recursion depth stays logarithmic even when every centroid coincides.
fn median_split(subset: &mut [(Primitive, usize)]) -> (usize, usize) {
    let mut centroid_bounds = Aabb::EMPTY;
    for (primitive, _) in subset.iter() {
        centroid_bounds.merge_point(primitive.bounds().centroid());
    }
    let axis = centroid_bounds.max_extent_axis();

    sort_by_axis(subset, axis);
    (axis, subset.len() / 2)
}

/// Sweep SAH split: for each axis, sort by centroid and evaluate the
/// cost of every candidate partition with prefix/suffix surface areas;
/// keep the cheapest. Falls back to the median split when no candidate
/// produces a finite cost (all-degenerate bounds).
fn sah_split(subset: &mut [(Primitive, usize)]) -> (usize, usize) {
    let n = subset.len();
    let mut left_areas = vec![0.0f32; n];

    let mut best: Option<(f32, usize, usize)> = None;
    let mut node_surface = 0.0f32;

    for axis in 0..3 {
        sort_by_axis(subset, axis);

        // Surface areas of the growing left prefix
        let mut bounds = Aabb::EMPTY;
        for (i, (primitive, _)) in subset.iter().enumerate() {
            bounds.merge(&primitive.bounds());
            left_areas[i] = bounds.surface_area();
        }
        if axis == 0 {
            node_surface = bounds.surface_area();
        }

        // Sweep the right suffix and compare candidate costs
        let mut bounds = Aabb::EMPTY;
        let per_prim = INTERSECTION_COST / node_surface;
        for i in (1..n).rev() {
            bounds.merge(&subset[i].0.bounds());

            let cost = 2.0 * TRAVERSAL_COST
                + per_prim
                    * (i as f32 * left_areas[i - 1]
                        + (n - i) as f32 * bounds.surface_area());
            if cost.is_finite() && best.map_or(true, |(c, _, _)| cost < c) {
                best = Some((cost, axis, i));
            }
        }
    }

    match best {
        Some((_, axis, index)) => {
            // The subset is currently sorted on z; restore the winning order
            if axis != 2 {
                sort_by_axis(subset, axis);
            }
            (axis, index)
        }
        None => median_split(subset),
    }
}

fn intersect_node(node: &BvhNode, ray: &Ray) -> Intersection {
    if !node.bounds().intersects_ray(ray) {
        return Intersection::default();
    }

    match node {
        BvhNode::Leaf { primitive, .. } => {
            let mut isect = primitive.get_intersection(ray);
            // Aggregates already tagged the innermost primitive; only
            // attach the back-reference when this leaf is the real hit.
            if isect.hit && isect.primitive.is_none() {
                isect.primitive = Some(Arc::downgrade(primitive));
            }
            isect
        }
        BvhNode::Interior { left, right, .. } => {
            // Sibling boxes can overlap under a median split, so a hit
            // in one subtree does not rule out a closer hit in the
            // other: visit both and keep the smaller distance (a miss
            // carries +inf).
            let l = intersect_node(left, ray);
            let r = intersect_node(right, ray);
            if l.distance < r.distance {
                l
            } else {
                r
            }
        }
    }
}

/// Descend by area bracket: `split` is a point in `[0, node.area)`; at
/// each interior node it selects the child whose area bracket it falls
/// into. The leaf's own pdf (1/leaf_area) is scaled by the leaf area
/// here and divided by the root area in [`BvhTree::sample`], so the
/// final pdf is `1 / total_area` whichever leaf is reached.
fn sample_node(node: &BvhNode, split: f32, rng: &mut dyn RngCore) -> (Intersection, f32) {
    match node {
        BvhNode::Leaf {
            primitive, area, ..
        } => {
            let (pos, pdf) = primitive.sample(rng);
            (pos, pdf * area)
        }
        BvhNode::Interior { left, right, .. } => {
            if split < left.area() {
                sample_node(left, split, rng)
            } else {
                sample_node(right, split - left.area(), rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Intersectable, Material, Sphere, Triangle};
    use glint_math::{Vec2, Vec3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Test-only primitive: an axis-aligned box that reports its own
    /// bounds and surface area but never intersects anything.
    struct BoxPrim(Aabb);

    impl Intersectable for BoxPrim {
        fn get_intersection(&self, _ray: &Ray) -> Intersection {
            Intersection::default()
        }

        fn bounds(&self) -> Aabb {
            self.0
        }

        fn area(&self) -> f32 {
            self.0.surface_area()
        }

        fn sample(&self, _rng: &mut dyn RngCore) -> (Intersection, f32) {
            (Intersection::default(), 0.0)
        }

        fn is_emissive(&self) -> bool {
            false
        }
    }

    fn tri(v0: Vec3, v1: Vec3, v2: Vec3) -> Primitive {
        Arc::new(Triangle::new(v0, v1, v2, Arc::new(Material::default())))
    }

    /// A soup of disjoint triangles scattered by a seeded RNG.
    fn triangle_soup(count: usize, seed: u64) -> Vec<Primitive> {
        let mut rng = StdRng::seed_from_u64(seed);
        (0..count)
            .map(|_| {
                let base = Vec3::new(
                    rng.gen_range(-20.0..20.0),
                    rng.gen_range(-20.0..20.0),
                    rng.gen_range(-20.0..20.0),
                );
                let e1 = Vec3::new(
                    rng.gen_range(0.2..1.0),
                    rng.gen_range(-0.3..0.3),
                    rng.gen_range(-0.3..0.3),
                );
                let e2 = Vec3::new(
                    rng.gen_range(-0.3..0.3),
                    rng.gen_range(0.2..1.0),
                    rng.gen_range(-0.3..0.3),
                );
                tri(base, base + e1, base + e2)
            })
            .collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = BvhTree::build(vec![], 1, SplitMethod::Median);
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let isect = tree.intersect(&ray);
        assert!(!isect.hit);
        assert_eq!(isect.distance, f32::INFINITY);

        let mut rng = StdRng::seed_from_u64(0);
        let (pos, pdf) = tree.sample(&mut rng);
        assert!(!pos.hit);
        assert_eq!(pdf, 0.0);

        assert_eq!(tree.world_bounds(), Aabb::EMPTY);
        assert_eq!(tree.total_area(), 0.0);
        assert!(tree.root().is_none());
    }

    #[test]
    fn test_single_primitive_is_leaf() {
        let tree = BvhTree::build(
            vec![tri(Vec3::ZERO, Vec3::X, Vec3::Y)],
            1,
            SplitMethod::Median,
        );
        let root = tree.root().expect("non-empty tree has a root");
        assert!(root.is_leaf());
        assert!((root.area() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_max_prims_clamp() {
        let tree = BvhTree::build(vec![tri(Vec3::ZERO, Vec3::X, Vec3::Y)], 10_000, SplitMethod::Median);
        assert_eq!(tree.max_prims_per_leaf(), 255);
    }

    #[test]
    fn test_pair_becomes_two_leaves() {
        let tree = BvhTree::build(
            vec![
                tri(Vec3::ZERO, Vec3::X, Vec3::Y),
                tri(Vec3::splat(5.0), Vec3::splat(5.0) + Vec3::X, Vec3::splat(5.0) + Vec3::Y),
            ],
            1,
            SplitMethod::Median,
        );
        let root = tree.root().unwrap();
        let (left, right) = root.children().expect("pair root is interior");
        assert!(left.is_leaf());
        assert!(right.is_leaf());
        assert!((root.area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_through_tree() {
        // The sphere's own hit record must survive BVH traversal unchanged
        let sphere: Primitive = Arc::new(Sphere::new(
            Vec3::ZERO,
            1.0,
            Arc::new(Material::default()),
        ));
        let tree = BvhTree::build(vec![sphere], 1, SplitMethod::Median);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let isect = tree.intersect(&ray);
        assert!(isect.hit);
        assert!((isect.distance - 4.0).abs() < 1e-5);
        assert!((isect.point - Vec3::Z).length() < 1e-5);
        assert!((isect.normal - Vec3::Z).length() < 1e-5);
        assert!(isect.primitive.is_some(), "leaf attaches the back-reference");
    }

    #[test]
    fn test_bvh_matches_linear_scan() {
        let prims = triangle_soup(200, 42);
        let tree = BvhTree::build(prims.clone(), 1, SplitMethod::Median);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let origin = Vec3::new(
                rng.gen_range(-30.0..30.0),
                rng.gen_range(-30.0..30.0),
                30.0,
            );
            let target = Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let ray = Ray::new(origin, (target - origin).normalize());

            let tree_hit = tree.intersect(&ray);
            let brute_hit = prims
                .iter()
                .map(|p| p.get_intersection(&ray))
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
                .unwrap();

            assert_eq!(tree_hit.hit, brute_hit.hit, "hit flags must agree");
            if brute_hit.hit {
                assert!(
                    (tree_hit.distance - brute_hit.distance).abs() < 1e-4,
                    "tree {} vs brute {}",
                    tree_hit.distance,
                    brute_hit.distance
                );
            }
        }
    }

    #[test]
    fn test_bvh_sah_matches_linear_scan() {
        let prims = triangle_soup(120, 9);
        let tree = BvhTree::build(prims.clone(), 1, SplitMethod::Sah);

        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..100 {
            let origin = Vec3::new(rng.gen_range(-30.0..30.0), 30.0, rng.gen_range(-30.0..30.0));
            let target = Vec3::new(
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
                rng.gen_range(-20.0..20.0),
            );
            let ray = Ray::new(origin, (target - origin).normalize());

            let tree_hit = tree.intersect(&ray);
            let brute_hit = prims
                .iter()
                .map(|p| p.get_intersection(&ray))
                .min_by(|a, b| a.distance.total_cmp(&b.distance))
                .unwrap();

            assert_eq!(tree_hit.hit, brute_hit.hit);
            if brute_hit.hit {
                assert!((tree_hit.distance - brute_hit.distance).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_area_invariant_exact() {
        // root.area must be the exact sum of leaf areas (summed, not
        // recomputed from bounds)
        for method in [SplitMethod::Median, SplitMethod::Sah] {
            let prims = triangle_soup(64, 5);
            let tree = BvhTree::build(prims, 1, method);
            let root = tree.root().unwrap();

            let mut leaf_sum = 0.0f32;
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                match node.children() {
                    None => leaf_sum += node.area(),
                    Some((l, r)) => {
                        // Every interior node's area is exactly its
                        // children's sum
                        assert_eq!(node.area(), l.area() + r.area());
                        stack.push(l);
                        stack.push(r);
                    }
                }
            }
            // Summation order matches the build's bottom-up accumulation
            // only approximately; allow float tolerance at the root
            assert!(
                (leaf_sum - root.area()).abs() <= root.area() * 1e-5,
                "leaf sum {} vs root {}",
                leaf_sum,
                root.area()
            );
        }
    }

    #[test]
    fn test_three_boxes_scenario() {
        // Unit boxes at x = 0, 10, 20
        let boxes: Vec<Primitive> = (0..3)
            .map(|i| {
                let min = Vec3::new(i as f32 * 10.0, 0.0, 0.0);
                Arc::new(BoxPrim(Aabb::new(min, min + Vec3::ONE))) as Primitive
            })
            .collect();
        let leaf_surface_sum: f32 = boxes.iter().map(|b| b.bounds().surface_area()).sum();

        let tree = BvhTree::build(boxes, 1, SplitMethod::Median);
        let root_bounds = tree.world_bounds();

        assert_eq!(root_bounds.max_extent_axis(), 0);
        // Union box is 21 x 1 x 1
        let union_surface = Aabb::new(Vec3::ZERO, Vec3::new(21.0, 1.0, 1.0)).surface_area();
        assert_eq!(root_bounds.surface_area(), union_surface);
        assert_ne!(root_bounds.surface_area(), leaf_surface_sum);

        // The recorded split axis at the root is x as well
        assert_eq!(tree.root().unwrap().split_axis(), Some(0));
    }

    #[test]
    fn test_sampling_distribution_follows_split_law() {
        // One small and one large triangle. Under the sqrt split draw
        // the left-bracket probability is (left_area / total)^2, so the
        // small (left) triangle is picked with frequency 0.01, not its
        // area fraction 0.1.
        let small = tri(Vec3::ZERO, Vec3::X, Vec3::Y); // area 0.5
        let big = tri(
            Vec3::new(100.0, 0.0, 0.0),
            Vec3::new(103.0, 0.0, 0.0),
            Vec3::new(100.0, 3.0, 0.0),
        ); // area 4.5
        let tree = BvhTree::build(vec![small, big], 1, SplitMethod::Median);

        let mut rng = StdRng::seed_from_u64(99);
        let draws = 20_000;
        let mut small_count = 0usize;
        for _ in 0..draws {
            let (pos, pdf) = tree.sample(&mut rng);
            // The pdf is 1 / total_area whichever leaf was reached
            assert!((pdf - 1.0 / 5.0).abs() < 1e-4);
            if pos.point.x < 50.0 {
                small_count += 1;
            }
        }

        let observed = small_count as f32 / draws as f32;
        let expected = (0.5f32 / 5.0).powi(2);
        assert!(
            (observed - expected).abs() < 0.005,
            "observed {} vs expected {}",
            observed,
            expected
        );
    }

    #[test]
    fn test_sampling_pdf_constant_across_leaves() {
        // Deeper tree: the composed pdf must still be 1 / total_area
        // no matter which leaf the descent reaches
        let prims = triangle_soup(32, 17);
        let total: f32 = prims.iter().map(|p| p.area()).sum();
        let tree = BvhTree::build(prims, 1, SplitMethod::Median);

        let mut rng = StdRng::seed_from_u64(23);
        for _ in 0..500 {
            let (_, pdf) = tree.sample(&mut rng);
            assert!(
                (pdf - 1.0 / total).abs() < 1.0 / total * 1e-3,
                "pdf {} vs 1/total {}",
                pdf,
                1.0 / total
            );
        }
    }

    #[test]
    fn test_build_idempotence() {
        // Identical input (same order) must give structurally identical
        // trees: same split axes, bounds and leaf placement in preorder
        fn shape(tree: &BvhTree) -> Vec<(bool, Option<usize>, Aabb, usize)> {
            let mut out = Vec::new();
            if let Some(root) = tree.root() {
                root.visit(&mut |node, depth| {
                    out.push((node.is_leaf(), node.split_axis(), node.bounds(), depth));
                });
            }
            out
        }

        for method in [SplitMethod::Median, SplitMethod::Sah] {
            let a = BvhTree::build(triangle_soup(97, 21), 1, method);
            let b = BvhTree::build(triangle_soup(97, 21), 1, method);
            assert_eq!(shape(&a), shape(&b), "rebuild diverged for {:?}", method);
        }
    }

    #[test]
    fn test_identical_centroids_stay_balanced() {
        // Degenerate input: every centroid coincides. The index
        // tie-breaker keeps the median split balanced instead of
        // degenerating into a list.
        let prims: Vec<Primitive> = (0..64)
            .map(|_| tri(Vec3::ZERO, Vec3::X, Vec3::Y))
            .collect();
        let tree = BvhTree::build(prims, 1, SplitMethod::Median);

        let mut max_depth = 0;
        tree.root().unwrap().visit(&mut |_, depth| {
            max_depth = max_depth.max(depth);
        });
        assert!(max_depth <= 7, "depth {} for 64 identical prims", max_depth);
    }

    #[test]
    fn test_visit_orders_root_first() {
        let tree = BvhTree::build(triangle_soup(8, 3), 1, SplitMethod::Median);
        let mut depths = Vec::new();
        tree.root()
            .unwrap()
            .visit(&mut |node, depth| depths.push((depth, node.is_leaf())));

        assert_eq!(depths[0].0, 0, "root visited first");
        assert!(!depths[0].1, "root of 8 prims is interior");
        // Depth never jumps by more than one going down
        for w in depths.windows(2) {
            assert!(w[1].0 <= w[0].0 + 1);
        }
        assert_eq!(depths.iter().filter(|(_, leaf)| *leaf).count(), 8);
    }
}
