use crate::aabb::Aabb;
use crate::interval::Interval;
use crate::material::Material;
use crate::vec3::{Point3, Ray, Vec3};

/// The analytic primitive the core renders. Created at scene build time and
/// immutable thereafter; `build_acceleration` reorders a scene's spheres by
/// Morton code but never mutates one in place.
#[derive(Debug, Clone, Copy)]
pub struct Sphere {
    pub center: Point3,
    pub radius: f32,
    pub material: Material,
}

impl Sphere {
    pub fn new(center: Point3, radius: f32, material: Material) -> Self {
        debug_assert!(radius > 0.0, "sphere radius must be positive");
        Self {
            center,
            radius,
            material,
        }
    }

    /// `AABB(center - r, center + r)`.
    pub fn bounding_box(&self) -> Aabb {
        let r = Vec3::new(self.radius, self.radius, self.radius);
        Aabb::from_points(self.center - r, self.center + r)
    }

    /// Analytic ray-sphere intersection. `t_window` bounds the accepted hit
    /// distance; on a hit the window's `max` is the only bound this function
    /// cares about (traversal tightens it further across primitives).
    pub fn hit(&self, ray: &Ray, t_window: Interval) -> Option<HitRecord> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let discriminant = h * h - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let mut root = (h - sqrt_d) / a;
        if !t_window.surrounds(root) {
            root = (h + sqrt_d) / a;
            if !t_window.surrounds(root) {
                return None;
            }
        }

        let point = ray.point(root);
        let outward_normal = (point - self.center) / self.radius;
        let front_face = ray.direction.dot(outward_normal) < 0.0;
        let normal = if front_face {
            outward_normal
        } else {
            -outward_normal
        };

        Some(HitRecord {
            point,
            normal,
            incoming_dir: ray.direction,
            t: root,
            front_face,
            material: self.material,
        })
    }
}

/// The aggregated result of a successful intersection, carried from
/// traversal into material scatter. `normal` is always oriented against the
/// incoming ray: `dot(normal, incoming_dir) <= 0`.
#[derive(Debug, Clone, Copy)]
pub struct HitRecord {
    pub point: Point3,
    pub incoming_dir: Vec3,
    pub normal: Vec3,
    pub front_face: bool,
    pub t: f32,
    pub material: Material,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;

    fn unit_sphere_at_origin() -> Sphere {
        Sphere::new(Point3::zero(), 1.0, Material::lambertian(Vec3::ones()))
    }

    #[test]
    fn ray_aimed_at_center_hits_at_expected_t() {
        let s = Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0, Material::lambertian(Vec3::ones()));
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        let hit = s.hit(&r, Interval::new(0.001, f32::INFINITY)).unwrap();
        let oc_len = (s.center - r.origin).length();
        let expected_t = oc_len - s.radius;
        assert!((hit.t - expected_t).abs() / expected_t < 1e-4);
    }

    #[test]
    fn normal_opposes_incoming_ray_and_is_unit_length() {
        let s = unit_sphere_at_origin();
        let r = Ray::new(Point3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = s.hit(&r, Interval::new(0.001, f32::INFINITY)).unwrap();
        assert!(hit.normal.dot(hit.incoming_dir) <= 0.0);
        assert!((hit.normal.length() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn ray_missing_sphere_returns_none() {
        let s = unit_sphere_at_origin();
        let r = Ray::new(Point3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.hit(&r, Interval::new(0.001, f32::INFINITY)).is_none());
    }

    #[test]
    fn hit_outside_t_window_is_rejected() {
        let s = Sphere::new(Point3::new(0.0, 0.0, -5.0), 1.0, Material::lambertian(Vec3::ones()));
        let r = Ray::new(Point3::zero(), Vec3::new(0.0, 0.0, -1.0));
        assert!(s.hit(&r, Interval::new(0.001, 1.0)).is_none());
    }

    #[test]
    fn bounding_box_matches_center_and_radius() {
        let s = Sphere::new(Point3::new(1.0, 2.0, 3.0), 0.5, Material::lambertian(Vec3::ones()));
        let bbox = s.bounding_box();
        assert_eq!(bbox.x, Interval::new(0.5, 1.5));
        assert_eq!(bbox.y, Interval::new(1.5, 2.5));
        assert_eq!(bbox.z, Interval::new(2.5, 3.5));
    }
}
