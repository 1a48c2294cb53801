use rand::Rng;

use crate::vec3::{Color, Vec3};

/// Surface BRDF, stored as a tagged variant inline with each primitive rather
/// than behind a trait object — the hot path (millions of scatters per frame)
/// never pays for a virtual call.
#[derive(Debug, Clone, Copy)]
pub enum Material {
    Lambertian { albedo: Color },
    Reflective { albedo: Color, fuzz: f32 },
    Dielectric { refraction_index: f32 },
}

impl Material {
    pub fn lambertian(albedo: Color) -> Self {
        Material::Lambertian { albedo }
    }

    pub fn reflective(albedo: Color, fuzz: f32) -> Self {
        Material::Reflective {
            albedo,
            fuzz: fuzz.clamp(0.0, 1.0),
        }
    }

    pub fn dielectric(refraction_index: f32) -> Self {
        Material::Dielectric { refraction_index }
    }

    /// Scatters an incoming ray off a surface hit. `incoming_dir` is the
    /// unnormalized incoming ray direction, `normal` is unit-length and
    /// already oriented against it, `front_face` tells which side of a
    /// dielectric boundary the ray is approaching from.
    ///
    /// Returns `(did_scatter, scattered_direction, attenuation)`. When
    /// `did_scatter` is false the path is absorbed.
    pub fn scatter(
        &self,
        incoming_dir: Vec3,
        normal: Vec3,
        front_face: bool,
        rng: &mut impl Rng,
    ) -> (bool, Vec3, Color) {
        match *self {
            Material::Lambertian { albedo } => {
                let mut dir = normal + Vec3::random_unit_vector(rng);
                if dir.near_zero() {
                    dir = normal;
                }
                (true, dir, albedo)
            }
            Material::Reflective { albedo, fuzz } => {
                let reflected = incoming_dir.normalized().reflect(normal);
                let dir = reflected + Vec3::random_unit_vector(rng) * fuzz;
                let did_scatter = dir.dot(normal) > 0.0;
                (did_scatter, dir, albedo)
            }
            Material::Dielectric { refraction_index } => {
                let eta_ratio = if front_face {
                    1.0 / refraction_index
                } else {
                    refraction_index
                };
                let unit_dir = incoming_dir.normalized();
                let cos_theta = (-unit_dir).dot(normal).min(1.0);
                let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

                let cannot_refract = eta_ratio * sin_theta > 1.0;
                let dir = if cannot_refract
                    || schlick_reflectance(cos_theta, eta_ratio) > rng.gen::<f32>()
                {
                    unit_dir.reflect(normal)
                } else {
                    unit_dir
                        .refract(normal, eta_ratio)
                        .unwrap_or_else(|| unit_dir.reflect(normal))
                };
                (true, dir, Color::ones())
            }
        }
    }
}

/// Schlick's polynomial approximation to the Fresnel reflectance of a
/// dielectric boundary.
fn schlick_reflectance(cosine: f32, refraction_index: f32) -> f32 {
    let r0 = ((1.0 - refraction_index) / (1.0 + refraction_index)).powi(2);
    r0 + (1.0 - r0) * (1.0 - cosine).powi(5)
}
