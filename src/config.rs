use crate::vec3::Vec3;

/// The core's entire externally-tunable surface. No files are read and no
/// environment variables are consulted to produce one — the outer layer
/// (CLI flags, a preset, whatever) is responsible for populating it.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub image_width: u32,
    pub aspect_ratio: f32,
    pub fov_vertical_deg: f32,
    pub t_min: f32,
    pub t_max: f32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    pub camera_speed: f32,
    pub up_hint: Vec3,
}

impl Config {
    /// Image height is `ceil(width / aspect_ratio)`, floored at 1.
    pub fn image_height(&self) -> u32 {
        let h = (self.image_width as f32 / self.aspect_ratio).ceil() as u32;
        h.max(1)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_width: 400,
            aspect_ratio: 16.0 / 9.0,
            fov_vertical_deg: 40.0,
            t_min: 0.001,
            t_max: 1.0e10,
            samples_per_pixel: 32,
            max_depth: 12,
            camera_speed: 0.1,
            up_hint: Vec3::unit_y(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_height_rounds_up() {
        let mut config = Config {
            image_width: 401,
            aspect_ratio: 16.0 / 9.0,
            ..Config::default()
        };
        assert_eq!(config.image_height(), 226);
        config.image_width = 400;
        assert_eq!(config.image_height(), 225);
    }
}
