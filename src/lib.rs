pub mod aabb;
pub mod bvh;
pub mod camera;
pub mod config;
pub mod error;
pub mod interval;
pub mod material;
pub mod morton;
pub mod presets;
pub mod renderer;
pub mod scene;
pub mod sphere;
pub mod vec3;

use camera::{Camera, CameraConfig, CursorPos, InputDir};
use config::Config;
use renderer::{Framebuffer, RenderStats};
use scene::Scene;
use vec3::{Color, Point3};

/// Top-level session: owns the scene, the camera, and the reusable
/// framebuffer, and is the single thing an outer layer (CLI, embedder)
/// drives every frame. Mirrors the external interface: register geometry,
/// build the tree, push input, render.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    config: Config,
    framebuffer: Framebuffer,
    frame_counter: u64,
}

impl Renderer {
    pub fn new(config: Config, look_from: Point3, look_at: Point3) -> Self {
        let camera_config = CameraConfig {
            look_from,
            look_at,
            up_hint: config.up_hint,
            fov_vertical_deg: config.fov_vertical_deg,
            aspect_ratio: config.aspect_ratio,
            image_width: config.image_width,
            image_height: config.image_height(),
            speed: config.camera_speed,
        };
        let camera = Camera::new(camera_config);
        let framebuffer = Framebuffer::new(camera.image_width, camera.image_height);
        Self {
            scene: Scene::new(),
            camera,
            config,
            framebuffer,
            frame_counter: 0,
        }
    }

    /// Registers a sphere with the scene. Invisible to `render()` until the
    /// next `build_acceleration()`.
    pub fn add_sphere(&mut self, center: Point3, radius: f32, material: material::Material) {
        self.scene.add_sphere(center, radius, material);
    }

    /// Rebuilds the acceleration structure over every sphere added so far.
    pub fn build_acceleration(&mut self) {
        self.scene.build_acceleration();
    }

    pub fn set_input_dir(&mut self, dir: InputDir) {
        self.camera.set_input_dir(dir);
    }

    pub fn set_cursor(&mut self, cursor: CursorPos) {
        self.camera.set_cursor(cursor);
    }

    /// Applies the currently-held input state to the camera pose. Call once
    /// per frame before `render()`.
    pub fn update_camera(&mut self) {
        self.camera.update();
    }

    /// Traces one full frame and returns the resulting pixel buffer together
    /// with this frame's statistics. The buffer is reused across calls; its
    /// contents are only valid until the next `render()`.
    pub fn render(&mut self) -> (&[Color], RenderStats) {
        let stats = renderer::render(
            &mut self.framebuffer,
            &self.scene,
            &self.camera,
            &self.config,
            self.frame_counter,
        );
        self.frame_counter += 1;
        (&self.framebuffer.pixels, stats)
    }

    pub fn image_width(&self) -> u32 {
        self.framebuffer.width
    }

    pub fn image_height(&self) -> u32 {
        self.framebuffer.height
    }

    pub fn primitive_count(&self) -> usize {
        self.scene.primitive_count()
    }

    pub fn camera_position(&self) -> Point3 {
        self.camera.position
    }

    pub fn camera_look_at(&self) -> Point3 {
        self.camera.look_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use material::Material;

    #[test]
    fn end_to_end_render_produces_finite_pixels() {
        let mut r = Renderer::new(
            Config {
                image_width: 64,
                samples_per_pixel: 4,
                max_depth: 8,
                ..Config::default()
            },
            Point3::new(0.0, 0.0, 2.0),
            Point3::zero(),
        );
        r.add_sphere(Point3::zero(), 0.5, Material::lambertian(Color::new(0.6, 0.3, 0.3)));
        r.build_acceleration();
        r.update_camera();
        let width = r.image_width();
        let height = r.image_height();
        let (pixels, stats) = r.render();
        assert_eq!(pixels.len(), (width * height) as usize);
        assert!(stats.total_rays > 0);
        for p in pixels {
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
        }
    }
}
