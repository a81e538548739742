//! Window-less render benchmark.
//!
//! ```bash
//! cargo run --release --bin bench_headless -- --frames 600
//! cargo run --release --bin bench_headless -- --obj assets/f22.obj
//! ```

use anyhow::Context;
use clap::Parser;
use log::info;
use std::{path::PathBuf, time::Instant};

use heretic::{
    engine::{Engine, RenderOptions, Viewport},
    math::Vec3,
    obj::load_obj,
    renderer::{RendererExt, Software},
    world::{Camera, Projection, shapes},
};

#[derive(Parser, Debug)]
#[command(name = "bench_headless", about = "Render frames off-screen and report timings")]
struct Cli {
    /// OBJ file to render instead of the built-in cube.
    #[arg(long)]
    obj: Option<PathBuf>,

    #[arg(long, default_value_t = 300)]
    frames: usize,

    #[arg(long, default_value_t = 1024)]
    width: usize,

    #[arg(long, default_value_t = 1024)]
    height: usize,

    /// Overlay the wireframe on every triangle.
    #[arg(long)]
    wireframe: bool,
}

/// Simulated seconds per frame.
const FRAME_DT: f64 = 1.0 / 60.0;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mesh = match &cli.obj {
        Some(path) => {
            let mut mesh = load_obj(path).with_context(|| format!("cannot load {}", path.display()))?;
            mesh.normalize_coordinates();
            mesh.center_coordinates();
            mesh
        }
        None => shapes::cube(),
    };

    let viewport = Viewport::new(cli.width, cli.height);
    let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Projection::Perspective, viewport.aspect());
    let mut engine = Engine::new(viewport, camera);
    engine.load_mesh(mesh).context("mesh rejected")?;
    engine.options_mut().insert(RenderOptions::AUTO_ROTATE);
    engine.options_mut().set(RenderOptions::SHOW_WIREFRAME, cli.wireframe);

    let mut renderer = Software::new();
    let mut checksum = 0u64;
    let mut visible = 0usize;

    let start = Instant::now();
    for _ in 0..cli.frames {
        visible += engine.update(FRAME_DT).visible;
        renderer.draw_frame(&engine, |fb, _, _| {
            checksum = fb.iter().fold(checksum, |acc, &px| acc.wrapping_mul(31).wrapping_add(px as u64));
        });
    }
    let elapsed = start.elapsed();

    let frames = cli.frames.max(1) as f64;
    let avg_ms = elapsed.as_secs_f64() * 1000.0 / frames;
    info!(
        "{} frames at {}x{}: {avg_ms:.3} ms/frame ({:.1} FPS), {:.1} visible triangles/frame, checksum {checksum:016x}",
        cli.frames,
        cli.width,
        cli.height,
        1000.0 / avg_ms,
        visible as f64 / frames
    );
    Ok(())
}
