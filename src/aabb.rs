use crate::interval::Interval;
use crate::vec3::{Point3, Ray};

/// An axis-aligned bounding box stored as three per-axis intervals — the
/// bounding volume used by every LBVH node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    pub const fn new(x: Interval, y: Interval, z: Interval) -> Self {
        Self { x, y, z }
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Builds the bounding box enclosing two corner points, order-independent.
    pub fn from_points(a: Point3, b: Point3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    pub fn axis(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Midpoint of the box — the point Morton-encoded during LBVH construction.
    pub fn centroid(&self) -> Point3 {
        Point3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// `2(xy + xz + yz)` over the box's axis lengths.
    pub fn surface_area(&self) -> f32 {
        let (dx, dy, dz) = (self.x.size(), self.y.size(), self.z.size());
        2.0 * (dx * dy + dx * dz + dy * dz)
    }

    /// Per-axis interval union — the bounding box of two children.
    pub fn union(a: &Aabb, b: &Aabb) -> Aabb {
        Aabb::new(
            Interval::union(a.x, b.x),
            Interval::union(a.y, b.y),
            Interval::union(a.z, b.z),
        )
    }

    /// Slab-method ray-box test. `t_window` is consumed by value so the caller
    /// can reuse its original window; on hit, returns the tightened window
    /// (entry/exit `t`), useful for ordering BVH children during traversal.
    pub fn hit(&self, ray: &Ray, mut t_window: Interval) -> Option<Interval> {
        for axis in 0..3 {
            let inv_d = 1.0 / ray.direction[axis];
            let mut t0 = (self.axis(axis).min - ray.origin[axis]) * inv_d;
            let mut t1 = (self.axis(axis).max - ray.origin[axis]) * inv_d;
            if inv_d < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }
            t_window.min = t0.max(t_window.min);
            t_window.max = t1.min(t_window.max);
            if t_window.max <= t_window.min {
                return None;
            }
        }
        Some(t_window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3::Vec3;

    #[test]
    fn centroid_is_midpoint() {
        let b = Aabb::from_points(Point3::zero(), Point3::new(10.0, 4.0, 2.0));
        assert_eq!(b.centroid(), Point3::new(5.0, 2.0, 1.0));
    }

    #[test]
    fn union_encloses_both_boxes() {
        let a = Aabb::from_points(Point3::zero(), Point3::new(1.0, 1.0, 1.0));
        let b = Aabb::from_points(Point3::new(-1.0, -1.0, -1.0), Point3::new(0.5, 0.5, 0.5));
        let u = Aabb::union(&a, &b);
        assert_eq!(u.x, Interval::new(-1.0, 1.0));
        assert_eq!(u.y, Interval::new(-1.0, 1.0));
        assert_eq!(u.z, Interval::new(-1.0, 1.0));
    }

    #[test]
    fn ray_from_inside_hits_with_straddling_window() {
        let b = Aabb::from_points(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let r = Ray::new(Point3::zero(), Vec3::new(1.0, 0.3, -0.2));
        let hit = b.hit(&r, Interval::new(-f32::INFINITY, f32::INFINITY));
        let window = hit.expect("ray origin inside the box must hit");
        assert!(window.min <= 0.0 && 0.0 <= window.max);
    }

    #[test]
    fn ray_missing_the_box_returns_none() {
        let b = Aabb::from_points(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0));
        let r = Ray::new(Point3::zero(), Vec3::new(1.0, 0.0, 0.0));
        assert!(b.hit(&r, Interval::new(0.0, f32::INFINITY)).is_none());
    }

    #[test]
    fn surface_area_of_unit_cube() {
        let b = Aabb::from_points(Point3::zero(), Point3::ones());
        assert_eq!(b.surface_area(), 6.0);
    }
}
