use crate::bvh::Lbvh;
use crate::interval::Interval;
use crate::material::Material;
use crate::sphere::{HitRecord, Sphere};
use crate::vec3::{Point3, Ray};

/// Owns the primitive list, their materials (inline in each `Sphere`), and
/// the acceleration structure built over them. Immutable during rendering —
/// `build_acceleration` is only ever called between frames, never while the
/// render kernel is reading the tree.
pub struct Scene {
    pending: Vec<Sphere>,
    bvh: Lbvh,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            bvh: Lbvh::empty(),
        }
    }

    /// Registers a new sphere. Does not affect the acceleration structure
    /// until the next `build_acceleration` call.
    pub fn add_sphere(&mut self, center: Point3, radius: f32, material: Material) {
        self.pending.push(Sphere::new(center, radius, material));
    }

    /// Rebuilds the LBVH from every primitive registered so far (via
    /// `add_sphere` since the last build). A scene with zero primitives
    /// builds an empty tree; every query against it reports "no hit".
    pub fn build_acceleration(&mut self) {
        let primitives = std::mem::take(&mut self.pending);
        self.pending = primitives.clone();
        let count = primitives.len();
        self.bvh = Lbvh::build(primitives);
        log::debug!("built LBVH over {count} primitives");
    }

    pub fn primitive_count(&self) -> usize {
        self.bvh.primitives.len()
    }

    /// Closest intersection along `ray` within `t_window`, or `None` on a miss.
    pub fn hit(&self, ray: &Ray, t_window: Interval) -> Option<HitRecord> {
        self.bvh.closest_hit(ray, t_window)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
