// Copyright 2020 @TwoCookingMice

use super::constants::{ Float, Vector3f,
                       FLOAT_MIN, FLOAT_MAX };
use super::ray::{ Ray3f };

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AABB {
    pub p_min: Vector3f,
    pub p_max: Vector3f
}

/// Entry and exit distances of a ray against an `AABB`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SlabHit {
    pub t_near: Float,
    pub t_far: Float
}

impl SlabHit {
    pub fn miss() -> Self {
        Self { t_near: std::f32::INFINITY, t_far: std::f32::NEG_INFINITY }
    }

    pub fn hit(&self) -> bool {
        self.t_far > self.t_near
    }
}

impl Default for AABB {
    fn default() -> Self {
        Self { p_min: Vector3f::new(FLOAT_MAX, FLOAT_MAX, FLOAT_MAX),
               p_max: Vector3f::new(FLOAT_MIN, FLOAT_MIN, FLOAT_MIN) }
    }
}

impl AABB {
    pub fn new(p_min: Vector3f, p_max: Vector3f) -> Self {
        Self { p_min: p_min.inf(&p_max), p_max: p_max.sup(&p_min) }
    }

    pub fn unit() -> Self {
        Self::new(Vector3f::new(0.0, 0.0, 0.0), Vector3f::new(1.0, 1.0, 1.0))
    }

    pub fn center(&self) -> Vector3f {
        0.5f32 * self.p_min + 0.5f32 * self.p_max
    }

    pub fn expand_by_aabb(&mut self, other: &AABB) {
        self.p_min = self.p_min.inf(&other.p_min);
        self.p_max = self.p_max.sup(&other.p_max);
    }

    pub fn contains(&self, p: &Vector3f) -> bool {
        (0..3).all(|idx| p[idx] >= self.p_min[idx] && p[idx] <= self.p_max[idx])
    }

    /// Slab test with inverse directions. Axes the ray runs parallel to are
    /// resolved explicitly so no `0 * inf` NaN can reach the min/max chain.
    pub fn slab_intersect(&self, origin: &Vector3f, dir: &Vector3f) -> SlabHit {
        if !self.is_valid() {
            return SlabHit::miss();
        }

        let mut t_near = std::f32::NEG_INFINITY;
        let mut t_far = std::f32::INFINITY;

        for idx in 0..3 {
            if dir[idx] == 0.0 {
                if origin[idx] < self.p_min[idx] || origin[idx] > self.p_max[idx] {
                    return SlabHit::miss();
                }
                continue;
            }

            let inv = 1.0 / dir[idx];
            let t0 = (self.p_min[idx] - origin[idx]) * inv;
            let t1 = (self.p_max[idx] - origin[idx]) * inv;
            t_near = t_near.max(t0.min(t1));
            t_far = t_far.min(t0.max(t1));
        }

        SlabHit { t_near, t_far }
    }

    pub fn ray_intersect(&self, ray: &Ray3f) -> SlabHit {
        self.slab_intersect(&ray.origin(), &ray.dir())
    }

    pub fn diagnal(&self) -> Vector3f {
        self.p_max - self.p_min
    }

    pub fn widest_edge(&self) -> Float {
        self.diagnal().max()
    }

    pub fn is_valid(&self) -> bool {
        (0..3).all(|idx| self.p_min[idx] <= self.p_max[idx])
    }
}

/* Test for AABB */
#[cfg(test)]
mod tests {
    use super::AABB;
    use super::Ray3f;
    use super::Vector3f;

    fn unit_cube() -> AABB {
        AABB::new(Vector3f::new(-1.0, -1.0, -1.0), Vector3f::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_geometry() {
        let mut bbox = AABB::new(Vector3f::new(1.0, 7.0, 3.0), Vector3f::new(4.0, 4.0, 4.0));
        assert_eq!(bbox.p_min, Vector3f::new(1.0, 4.0, 3.0));
        assert_eq!(bbox.p_max, Vector3f::new(4.0, 7.0, 4.0));
        assert!((bbox.center() - Vector3f::new(2.5, 5.5, 3.5)).norm() < 1e-6);

        bbox.expand_by_aabb(&AABB::new(Vector3f::new(-1.0, 5.0, 6.0), Vector3f::new(-1.0, 5.0, 6.0)));
        assert_eq!(bbox.p_min[0], -1.0);
        assert_eq!(bbox.p_max[2], 6.0);
        assert_eq!(bbox.widest_edge(), 5.0);

        let mut empty = AABB::default();
        assert!(!empty.is_valid());
        empty.expand_by_aabb(&bbox);
        assert_eq!(empty, bbox);
    }

    #[test]
    fn test_slab_hit_through_center() {
        let ray = Ray3f::new(Vector3f::new(0.0, 0.0, 5.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = unit_cube().ray_intersect(&ray);
        assert!(hit.hit());
        assert!((hit.t_near - 4.0).abs() < 1e-6);
        assert!((hit.t_far - 6.0).abs() < 1e-6);
    }

    #[test]
    fn test_slab_parallel_ray_outside_misses() {
        let hit = unit_cube().slab_intersect(&Vector3f::new(0.0, 2.0, 5.0),
                                             &Vector3f::new(0.0, 0.0, -1.0));
        assert!(!hit.hit());
        assert!(!hit.t_near.is_nan() && !hit.t_far.is_nan());
    }

    #[test]
    fn test_slab_parallel_ray_on_face_plane() {
        // Origin exactly on the y = 1 plane with zero y direction.
        let hit = unit_cube().slab_intersect(&Vector3f::new(0.0, 1.0, 5.0),
                                             &Vector3f::new(0.0, 0.0, -1.0));
        assert!(hit.hit());
        assert!(!hit.t_near.is_nan() && !hit.t_far.is_nan());
    }

    #[test]
    fn test_slab_origin_inside() {
        let hit = unit_cube().slab_intersect(&Vector3f::zeros(), &Vector3f::new(1.0, 0.0, 0.0));
        assert!(hit.hit());
        assert!(hit.t_near < 0.0);
        assert!((hit.t_far - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_slab_no_hit_when_entry_not_before_exit() {
        let o = Vector3f::new(-1.1, 0.0, 0.0);
        let d = Vector3f::new(-0.1, 10.0, 10.0);
        let hit = unit_cube().ray_intersect(&Ray3f::new(o, d));
        assert!(hit.t_near >= hit.t_far);
        assert!(!hit.hit());
    }
}
