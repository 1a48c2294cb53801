use rand::Rng;

use crate::material::Material;
use crate::vec3::{Color, Point3, Vec3};

/// One sphere's placement and material, ready to hand to `Renderer::add_sphere`.
pub struct SpherePlacement {
    pub center: Point3,
    pub radius: f32,
    pub material: Material,
}

/// A complete scene description: geometry plus the camera pose it was
/// composed for. Presets own no acceleration structure of their own — the
/// caller feeds `spheres` into a `Renderer` and builds it there.
pub struct SceneDescription {
    pub name: &'static str,
    pub spheres: Vec<SpherePlacement>,
    pub look_from: Point3,
    pub look_at: Point3,
    pub fov_vertical_deg: f32,
}

/// Built-in scene presets, one per end-to-end scenario worth demoing.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ScenePreset {
    /// A single Lambertian sphere on a large ground sphere.
    Single,
    /// Four hero spheres — matte, reflective, and two nested glass shells —
    /// on a checker-free ground sphere.
    Showcase,
    /// Five mirror spheres nearly enclosing the camera, to exercise the
    /// depth bound: rays that never escape terminate at zero radiance.
    DepthTest,
    /// A hundred small random spheres scattered over a ground sphere, sized
    /// to exercise the acceleration structure.
    Stress,
}

impl ScenePreset {
    pub fn build(self) -> SceneDescription {
        match self {
            ScenePreset::Single => build_single(),
            ScenePreset::Showcase => build_showcase(),
            ScenePreset::DepthTest => build_depth_test(),
            ScenePreset::Stress => build_stress(),
        }
    }
}

fn ground(radius: f32, albedo: Color) -> SpherePlacement {
    SpherePlacement {
        center: Point3::new(0.0, -radius - 0.5, -1.0),
        radius,
        material: Material::lambertian(albedo),
    }
}

fn build_single() -> SceneDescription {
    SceneDescription {
        name: "Single",
        spheres: vec![
            ground(100.0, Color::new(0.5, 0.5, 0.5)),
            SpherePlacement {
                center: Point3::new(0.0, 0.0, -1.0),
                radius: 0.5,
                material: Material::lambertian(Color::new(0.7, 0.3, 0.3)),
            },
        ],
        look_from: Point3::new(0.0, 0.5, 2.0),
        look_at: Point3::new(0.0, 0.0, -1.0),
        fov_vertical_deg: 40.0,
    }
}

fn build_showcase() -> SceneDescription {
    let mut spheres = vec![ground(1000.0, Color::new(0.5, 0.5, 0.5))];

    spheres.push(SpherePlacement {
        center: Point3::new(0.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::dielectric(1.5),
    });
    spheres.push(SpherePlacement {
        center: Point3::new(0.0, 1.0, 0.0),
        radius: -0.95,
        material: Material::dielectric(1.5),
    });
    spheres.push(SpherePlacement {
        center: Point3::new(-4.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::lambertian(Color::new(0.7, 0.15, 0.15)),
    });
    spheres.push(SpherePlacement {
        center: Point3::new(4.0, 1.0, 0.0),
        radius: 1.0,
        material: Material::reflective(Color::new(0.85, 0.85, 0.9), 0.0),
    });

    let mut rng = rand::thread_rng();
    for a in -6..6 {
        for b in -6..6 {
            let center = Point3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if [
                Point3::new(4.0, 0.2, 0.0),
                Point3::new(-4.0, 0.2, 0.0),
                Point3::new(0.0, 0.2, 0.0),
            ]
            .iter()
            .any(|hero| (center - *hero).length() < 0.9)
            {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material = if choose_mat < 0.7 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Material::lambertian(albedo)
            } else if choose_mat < 0.9 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Material::reflective(albedo, rng.gen_range(0.0..0.3))
            } else {
                Material::dielectric(1.5)
            };
            spheres.push(SpherePlacement { center, radius: 0.2, material });
        }
    }

    SceneDescription {
        name: "Showcase",
        spheres,
        look_from: Point3::new(13.0, 2.0, 3.0),
        look_at: Point3::new(0.0, 0.5, 0.0),
        fov_vertical_deg: 20.0,
    }
}

fn build_depth_test() -> SceneDescription {
    let mirror = Material::reflective(Color::new(0.95, 0.95, 0.95), 0.0);
    // Radius nearly equal to the center offset leaves each sphere's surface
    // only a unit away from the origin, so the five of them nearly enclose
    // it; the one missing face (+z) leaves a gap only a few degrees wide.
    let r = 1000.0;
    let spheres = [
        (r + 1.0, 0.0, 0.0),
        (-(r + 1.0), 0.0, 0.0),
        (0.0, r + 1.0, 0.0),
        (0.0, -(r + 1.0), 0.0),
        (0.0, 0.0, -(r + 1.0)),
    ]
    .into_iter()
    .map(|(x, y, z)| SpherePlacement {
        center: Point3::new(x, y, z),
        radius: r,
        material: mirror,
    })
    .collect();

    SceneDescription {
        name: "DepthTest",
        spheres,
        look_from: Point3::zero(),
        // Aimed diagonally into a wall rather than straight down the narrow
        // +z gap, so the camera ray actually bounces inside the cage.
        look_at: Vec3::new(1.0, 1.0, 1.0),
        fov_vertical_deg: 90.0,
    }
}

fn build_stress() -> SceneDescription {
    let mut spheres = vec![ground(1000.0, Color::new(0.5, 0.5, 0.5))];

    let mut rng = rand::thread_rng();
    for _ in 0..100 {
        let center = Point3::new(
            rng.gen_range(-15.0..15.0),
            rng.gen_range(0.1..0.4),
            rng.gen_range(-15.0..15.0),
        );
        let radius = rng.gen_range(0.08..0.35);
        let albedo = Color::new(rng.gen(), rng.gen(), rng.gen());
        spheres.push(SpherePlacement { center, radius, material: Material::lambertian(albedo) });
    }

    SceneDescription {
        name: "Stress (100 spheres)",
        spheres,
        look_from: Point3::new(10.0, 4.0, 10.0),
        look_at: Point3::zero(),
        fov_vertical_deg: 30.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_preset_builds_at_least_one_sphere() {
        for preset in [
            ScenePreset::Single,
            ScenePreset::Showcase,
            ScenePreset::DepthTest,
            ScenePreset::Stress,
        ] {
            let desc = preset.build();
            assert!(!desc.spheres.is_empty(), "{} has no spheres", desc.name);
        }
    }

    #[test]
    fn depth_test_has_exactly_five_spheres() {
        assert_eq!(build_depth_test().spheres.len(), 5);
    }

    #[test]
    fn stress_preset_has_roughly_one_hundred_spheres() {
        let desc = build_stress();
        assert_eq!(desc.spheres.len(), 101);
    }
}
