use rand::Rng;
use std::fmt;
use std::ops::{Add, AddAssign, Div, DivAssign, Index, Mul, MulAssign, Neg, Sub};

/// A 3-component vector used for positions, directions, and colors.
///
/// Components are stored as 32-bit floats — the precision the LBVH's Morton
/// quantization and the per-pixel kernel are built around. All arithmetic is
/// componentwise unless documented otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

pub type Point3 = Vec3;
pub type Color = Vec3;

impl Vec3 {
    #[inline(always)]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline(always)]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    #[inline(always)]
    pub const fn ones() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline(always)]
    pub const fn unit_y() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    #[inline(always)]
    pub const fn unit_z() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    #[inline(always)]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    #[inline(always)]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Returns the unit vector. Caller must ensure `length() > EPSILON`; see
    /// `near_zero`.
    #[inline(always)]
    pub fn normalized(self) -> Self {
        let len = self.length();
        debug_assert!(len > 1e-8, "attempted to normalize a near-zero vector");
        self / len
    }

    #[inline(always)]
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Used to construct orthonormal camera bases.
    #[inline(always)]
    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    /// Specular reflection of `self` about the surface normal `n`: I - 2(I·N)N.
    #[inline(always)]
    pub fn reflect(self, normal: Self) -> Self {
        self - normal * 2.0 * self.dot(normal)
    }

    /// Snell's-law refraction, `eta_ratio` = n_incident / n_transmitted.
    /// Returns `None` on total internal reflection (negative discriminant).
    #[inline]
    pub fn refract(self, normal: Self, eta_ratio: f32) -> Option<Self> {
        let cos_theta = (-self).dot(normal).min(1.0);
        let r_perp = (self + normal * cos_theta) * eta_ratio;
        let discriminant = 1.0 - r_perp.length_squared();
        if discriminant < 0.0 {
            return None;
        }
        let r_parallel = normal * -(discriminant.sqrt());
        Some(r_perp + r_parallel)
    }

    /// Componentwise (Hadamard) product — used to attenuate path throughput
    /// by a material's albedo.
    #[inline(always)]
    pub fn hadamard(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    #[inline(always)]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self * (1.0 - t) + other * t
    }

    #[inline(always)]
    pub fn saturate(self) -> Self {
        Self::new(
            self.x.clamp(0.0, 1.0),
            self.y.clamp(0.0, 1.0),
            self.z.clamp(0.0, 1.0),
        )
    }

    /// Replaces any non-finite component with 0 — the last line of defense
    /// before gamma so the render kernel never emits a NaN pixel.
    #[inline]
    pub fn clamp_finite(self) -> Self {
        Self::new(
            if self.x.is_finite() { self.x } else { 0.0 },
            if self.y.is_finite() { self.y } else { 0.0 },
            if self.z.is_finite() { self.z } else { 0.0 },
        )
    }

    /// Approximates the sRGB transfer function with a plain square root.
    #[inline(always)]
    pub fn gamma_correct(self) -> Self {
        Self::new(self.x.max(0.0).sqrt(), self.y.max(0.0).sqrt(), self.z.max(0.0).sqrt())
    }

    /// True when all components are below the near-zero threshold — guards
    /// against degenerate Lambertian scatter directions.
    #[inline(always)]
    pub fn near_zero(self) -> bool {
        const EPS: f32 = 1e-5;
        self.x.abs() < EPS && self.y.abs() < EPS && self.z.abs() < EPS
    }

    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let c = self.saturate();
        (
            (c.x * 255.999) as u8,
            (c.y * 255.999) as u8,
            (c.z * 255.999) as u8,
        )
    }

    /// Uniform point inside the unit ball via rejection sampling.
    pub fn random_in_unit_sphere(rng: &mut impl Rng) -> Self {
        loop {
            let v = Self::new(
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
                rng.gen_range(-1.0..1.0),
            );
            if v.length_squared() < 1.0 {
                return v;
            }
        }
    }

    /// Uniform point on the unit sphere, used by the Lambertian scatter law.
    pub fn random_unit_vector(rng: &mut impl Rng) -> Self {
        Self::random_in_unit_sphere(rng).normalized()
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn mul(self, t: f32) -> Self {
        Self::new(self.x * t, self.y * t, self.z * t)
    }
}

impl Mul<Vec3> for f32 {
    type Output = Vec3;
    #[inline(always)]
    fn mul(self, v: Vec3) -> Vec3 {
        v * self
    }
}

impl MulAssign<f32> for Vec3 {
    #[inline(always)]
    fn mul_assign(&mut self, t: f32) {
        self.x *= t;
        self.y *= t;
        self.z *= t;
    }
}

impl Div<f32> for Vec3 {
    type Output = Self;
    #[inline(always)]
    fn div(self, t: f32) -> Self {
        let inv = 1.0 / t;
        Self::new(self.x * inv, self.y * inv, self.z * inv)
    }
}

impl DivAssign<f32> for Vec3 {
    #[inline(always)]
    fn div_assign(&mut self, t: f32) {
        let inv = 1.0 / t;
        self.x *= inv;
        self.y *= inv;
        self.z *= inv;
    }
}

impl Index<usize> for Vec3 {
    type Output = f32;
    fn index(&self, i: usize) -> &f32 {
        match i {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vec3 index out of bounds: {i}"),
        }
    }
}

/// A parametric ray `R(t) = origin + t * direction`.
///
/// Invariant: `direction` is nonzero; this is a caller precondition, not
/// checked at construction (see the error-handling policy for degenerate rays).
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Point3,
    pub direction: Vec3,
}

impl Ray {
    #[inline(always)]
    pub const fn new(origin: Point3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    #[inline(always)]
    pub fn point(self, t: f32) -> Point3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_and_cross_are_orthogonal() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let c = a.cross(b);
        assert_eq!(c, Vec3::new(0.0, 0.0, 1.0));
        assert_eq!(a.dot(b), 0.0);
        assert_eq!(a.dot(c), 0.0);
    }

    #[test]
    fn reflect_about_normal() {
        let incoming = Vec3::new(1.0, -1.0, 0.0);
        let normal = Vec3::unit_y();
        let reflected = incoming.reflect(normal);
        assert_eq!(reflected, Vec3::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn refract_head_on_is_unbent() {
        let incoming = Vec3::new(0.0, 0.0, -1.0);
        let normal = Vec3::new(0.0, 0.0, 1.0);
        let refracted = incoming.refract(normal, 1.0 / 1.5).unwrap();
        assert!((refracted.x).abs() < 1e-6);
        assert!((refracted.y).abs() < 1e-6);
        assert!(refracted.z < 0.0);
    }

    #[test]
    fn refract_reports_total_internal_reflection() {
        // Grazing ray leaving a dense medium for a sparser one triggers TIR.
        let incoming = Vec3::new(0.999, 0.0447, 0.0).normalized();
        let normal = Vec3::new(0.0, 1.0, 0.0);
        assert!(incoming.refract(normal, 1.5).is_none());
    }

    #[test]
    fn ray_point_is_exact() {
        let r = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 1.0));
        for t in [-2.0_f32, 0.0, 0.5, 10.0] {
            assert_eq!(r.point(t), r.origin + r.direction * t);
        }
    }

    #[test]
    fn near_zero_detects_tiny_vectors() {
        assert!(Vec3::new(1e-6, -1e-6, 0.0).near_zero());
        assert!(!Vec3::new(1e-3, 0.0, 0.0).near_zero());
    }

    #[test]
    fn random_unit_vector_lies_on_sphere() {
        let mut rng = rand::thread_rng();
        for _ in 0..10_000 {
            let v = Vec3::random_unit_vector(&mut rng);
            assert!((v.length() - 1.0).abs() < 1e-2);
        }
    }

    #[test]
    fn clamp_finite_strips_nan_and_inf() {
        let v = Vec3::new(f32::NAN, f32::INFINITY, f32::NEG_INFINITY).clamp_finite();
        assert_eq!(v, Vec3::zero());
    }
}
