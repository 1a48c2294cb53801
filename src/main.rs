//! # lumen-trace
//!
//! An interactive Monte Carlo path tracer that renders spheres directly in
//! your terminal, live, as you fly the camera around with the keyboard and
//! mouse.
//!
//! ## Architecture
//!
//! - **Geometry**: spheres only, indexed by an LBVH built with Karras'
//!   parallel construction algorithm.
//! - **Materials**: Lambertian, Reflective (with fuzz), Dielectric (glass).
//! - **Camera**: pinhole, FOV-driven, repositioned every frame from the
//!   currently-held input direction and cursor position.
//! - **Output**: half-block (▀) truecolor cells, two image rows per terminal row.

use std::io::{self, Write};
use std::time::Duration;

use clap::Parser;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};

use anyhow::Context;

use lumen_trace::camera::{CursorPos, InputDir};
use lumen_trace::config::Config;
use lumen_trace::error::SessionError;
use lumen_trace::presets::ScenePreset;
use lumen_trace::vec3::Color;
use lumen_trace::Renderer;

/// lumen-trace — fly a camera through a sphere-only Monte Carlo path tracer
/// rendered directly in your terminal.
#[derive(Parser, Debug)]
#[command(
    name = "lumen-trace",
    version,
    about = "An interactive terminal path tracer",
    after_help = "CONTROLS:\n  \
                  w/a/s/d  strafe and dolly\n  \
                  r/f      rise and fall\n  \
                  mouse    look around\n  \
                  q / Esc  quit\n\n\
                  EXAMPLES:\n  \
                  lumen-trace --scene showcase\n  \
                  lumen-trace --scene depth-test --spp 8 --width 120\n  \
                  lumen-trace --scene stress --bounces 6 --frames 1"
)]
struct Cli {
    /// Scene preset to render
    #[arg(short, long, value_enum, default_value_t = ScenePreset::Showcase)]
    scene: ScenePreset,

    /// Output width in terminal columns
    #[arg(short = 'W', long, default_value_t = 120)]
    width: u32,

    /// Samples per pixel per frame — higher values reduce noise at the cost
    /// of frame rate.
    #[arg(long, default_value_t = 8)]
    spp: u32,

    /// Maximum ray bounce depth.
    #[arg(long, default_value_t = 12)]
    bounces: u32,

    /// Vertical field of view in degrees, overriding the preset's own.
    #[arg(long)]
    fov: Option<f32>,

    /// Render this many frames non-interactively and exit instead of
    /// entering the live navigation loop. Useful for benchmarking and CI.
    #[arg(long)]
    frames: Option<u32>,
}

/// Maps a color channel in `[0,1]` to the SGR truecolor byte.
#[inline]
fn channel_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Renders the framebuffer as half-block characters: each terminal row packs
/// two image rows, the top one as foreground color and the bottom as
/// background, via `▀`. Odd heights repeat the last row as their own bottom half.
fn render_halfblock(pixels: &[Color], width: u32, height: u32, out: &mut String) {
    let mut y = 0;
    while y < height {
        let bottom_y = (y + 1).min(height - 1);
        for x in 0..width {
            let top = pixels[(y * width + x) as usize];
            let bottom = pixels[(bottom_y * width + x) as usize];
            out.push_str(&format!(
                "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                channel_byte(top.x),
                channel_byte(top.y),
                channel_byte(top.z),
                channel_byte(bottom.x),
                channel_byte(bottom.y),
                channel_byte(bottom.z),
            ));
        }
        out.push_str("\x1b[0m\r\n");
        y += 2;
    }
}

fn run_interactive(renderer: &mut Renderer) -> Result<(), SessionError> {
    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, EnableMouseCapture)?;

    let mut frame_buf = String::new();
    let result = (|| -> io::Result<()> {
        loop {
            if event::poll(Duration::from_millis(16))? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let (mut dx, mut dy, mut dz) = (0, 0, 0);
                        match key.code {
                            KeyCode::Char('q') | KeyCode::Esc => break,
                            KeyCode::Char('a') => dx = -1,
                            KeyCode::Char('d') => dx = 1,
                            KeyCode::Char('r') => dy = 1,
                            KeyCode::Char('f') => dy = -1,
                            KeyCode::Char('w') => dz = -1,
                            KeyCode::Char('s') => dz = 1,
                            _ => {}
                        }
                        renderer.set_input_dir(InputDir::new(dx, dy, dz));
                    }
                    Event::Mouse(mouse) => {
                        let w = renderer.image_width().max(1) as f32;
                        let h = renderer.image_height().max(1) as f32;
                        renderer.set_cursor(CursorPos {
                            x: mouse.column as f32 / w,
                            y: mouse.row as f32 / h,
                        });
                    }
                    Event::Resize(_, _) => {}
                    _ => {}
                }
            } else {
                renderer.set_input_dir(InputDir::default());
            }

            renderer.update_camera();
            let width = renderer.image_width();
            let height = renderer.image_height();
            let (pixels, stats) = renderer.render();

            frame_buf.clear();
            render_halfblock(pixels, width, height, &mut frame_buf);

            queue!(stdout, MoveTo(0, 0))?;
            stdout.write_all(frame_buf.as_bytes())?;
            queue!(stdout, Clear(ClearType::FromCursorDown))?;
            write!(stdout, "frame: {:.1} Mrays/s\r\n", stats.mrays_per_sec())?;
            stdout.flush()?;
        }
        Ok(())
    })();

    execute!(stdout, DisableMouseCapture, Show, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result.map_err(SessionError::from)
}

fn run_headless(renderer: &mut Renderer, frames: u32) {
    for _ in 0..frames {
        renderer.update_camera();
        renderer.render();
    }
    let width = renderer.image_width();
    let height = renderer.image_height();
    let (pixels, stats) = renderer.render();
    let mut out = String::new();
    render_halfblock(pixels, width, height, &mut out);
    print!("{out}");
    eprintln!(
        "rendered {} primitives in {:.2}s ({:.2} Mrays/s)",
        renderer.primitive_count(),
        stats.elapsed_secs,
        stats.mrays_per_sec()
    );
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let desc = cli.scene.build();
    if desc.spheres.is_empty() {
        return Err(SessionError::EmptyScene).context("building scene preset");
    }
    log::info!("loaded preset \"{}\" ({} spheres)", desc.name, desc.spheres.len());

    let config = Config {
        image_width: cli.width,
        samples_per_pixel: cli.spp,
        max_depth: cli.bounces,
        fov_vertical_deg: cli.fov.unwrap_or(desc.fov_vertical_deg),
        ..Config::default()
    };

    let mut renderer = Renderer::new(config, desc.look_from, desc.look_at);
    for sphere in desc.spheres {
        renderer.add_sphere(sphere.center, sphere.radius, sphere.material);
    }
    renderer.build_acceleration();

    match cli.frames {
        Some(frames) => run_headless(&mut renderer, frames.max(1)),
        None => run_interactive(&mut renderer).context("interactive render loop")?,
    }
    Ok(())
}
