//! Interactive software-rendered mesh viewer.
//!
//! ```bash
//! cargo run --release -- obj assets/f22.obj --perspective
//! cargo run --release -- iso game.bin --map 1
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use heretic::{
    engine::{Engine, FramePacer, RenderOptions, Viewport},
    iso::{DiscImage, GNS_SECTORS},
    math::Vec3,
    obj::load_obj,
    renderer::{RendererExt, Software},
    world::{Camera, Color, Mesh, Projection, Texture},
};

const HELP: &str = "\
Esc  quit
A    auto-rotate
T    texture
W    wireframe
L    lighting
P    orthographic / perspective
B    map background / checkerboard
J/K  previous / next map
H    this help
Left-drag orbits, wheel zooms.";

/// Size of the checkerboard attached to untextured OBJ meshes with UVs.
const CHECKER_TEXTURE_SIZE: usize = 64;

#[derive(Parser, Debug)]
#[command(name = "view_sw", about = "Software-rendered mesh viewer")]
struct Cli {
    #[command(subcommand)]
    source: Source,

    #[arg(long, global = true, default_value_t = 1024)]
    width: usize,

    #[arg(long, global = true, default_value_t = 1024)]
    height: usize,

    /// Frame cap, 0 for uncapped.
    #[arg(long, global = true, default_value_t = 60)]
    fps: u32,

    /// Start in perspective instead of orthographic projection.
    #[arg(long, global = true)]
    perspective: bool,
}

#[derive(Subcommand, Debug)]
enum Source {
    /// Wavefront OBJ file.
    Obj { file: PathBuf },
    /// Game disc image; J/K step through its maps.
    Iso {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        map: usize,
    },
}

/// Where meshes come from after start-up.
enum Scene {
    Obj,
    Disc {
        image: DiscImage<BufReader<File>>,
        map: usize,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    // ─────────── engine & camera ─────────────
    let projection = if cli.perspective { Projection::Perspective } else { Projection::Orthographic };
    let viewport = Viewport::new(cli.width, cli.height);
    let camera = Camera::new(Vec3::new(1.0, 1.0, -1.0), Vec3::ZERO, projection, viewport.aspect());
    let mut engine = Engine::new(viewport, camera);

    // ─────────── initial mesh ────────────────
    let mut scene = match &cli.source {
        Source::Obj { file } => {
            let mesh = obj_mesh(file)?;
            engine.load_mesh(mesh).context("OBJ mesh rejected")?;
            Scene::Obj
        }
        Source::Iso { file, map } => {
            let mut image = DiscImage::open(file)
                .with_context(|| format!("cannot open disc image {}", file.display()))?;
            let mesh = image.read_mesh(*map).with_context(|| format!("cannot load MAP{map:03}"))?;
            engine.load_mesh(mesh).context("map mesh rejected")?;
            engine.camera_mut().set_ground_clamp(true);
            Scene::Disc { image, map: *map }
        }
    };
    recenter(&mut engine);

    let title = engine.mesh().map_or_else(String::new, |m| m.name.clone());
    let mut win = Window::new(&title, cli.width, cli.height, WindowOptions::default())?;
    let mut renderer = Software::new();
    let mut pacer = FramePacer::new(cli.fps);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    let mut last_mouse: Option<(f32, f32)> = None;
    let mut dt = pacer.budget().as_secs_f64();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        /* --------------- toggles ------------------------------------------ */
        let toggles = [
            (Key::A, RenderOptions::AUTO_ROTATE),
            (Key::T, RenderOptions::SHOW_TEXTURE),
            (Key::W, RenderOptions::SHOW_WIREFRAME),
            (Key::L, RenderOptions::SHOW_LIGHTING),
            (Key::B, RenderOptions::MAP_BACKGROUND),
        ];
        for (key, flag) in toggles {
            if win.is_key_pressed(key, KeyRepeat::No) {
                engine.options_mut().toggle(flag);
            }
        }
        if win.is_key_pressed(Key::P, KeyRepeat::No) {
            engine.camera_mut().toggle_projection();
        }
        if win.is_key_pressed(Key::H, KeyRepeat::No) {
            println!("{HELP}");
        }

        /* --------------- map stepping ------------------------------------- */
        if let Scene::Disc { image, map } = &mut scene {
            let step = if win.is_key_pressed(Key::J, KeyRepeat::No) {
                -1
            } else if win.is_key_pressed(Key::K, KeyRepeat::No) {
                1
            } else {
                0
            };
            if step != 0 {
                if let Some(next) = step_map(&mut engine, image, *map, step) {
                    *map = next;
                    recenter(&mut engine);
                    if let Some(mesh) = engine.mesh() {
                        win.set_title(&mesh.name);
                    }
                }
            }
        }

        /* --------------- mouse -------------------------------------------- */
        let mouse = win.get_mouse_pos(MouseMode::Pass);
        if win.get_mouse_down(MouseButton::Left) {
            if let (Some((lx, ly)), Some((x, y))) = (last_mouse, mouse) {
                engine.camera_mut().process_orbit((x - lx) as f64, (y - ly) as f64, dt);
            }
        }
        last_mouse = mouse;
        if let Some((_, wheel)) = win.get_scroll_wheel() {
            if wheel != 0.0 {
                engine.camera_mut().adjust_zoom(wheel.signum() as f64);
            }
        }

        /* --------------- update + draw ------------------------------------ */
        dt = pacer.tick();
        let t0 = Instant::now();
        engine.update(dt);

        let mut presented = Ok(());
        renderer.draw_frame(&engine, |fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            presented = win.update_with_buffer(fb, w, h);
        });
        presented?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            let stats = engine.stats();
            info!(
                "avg render: {avg_ms:.2} ms ({:.1} FPS), {} of {} triangles visible",
                1000.0 / avg_ms,
                stats.visible,
                stats.total
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Load an OBJ file, fit it into the unit cube and give UV-mapped meshes
/// a checkerboard to show.
fn obj_mesh(path: &Path) -> anyhow::Result<Mesh> {
    let mut mesh = load_obj(path).with_context(|| format!("cannot load {}", path.display()))?;
    mesh.normalize_coordinates();
    mesh.center_coordinates();
    if mesh.texture.is_none() && mesh.triangles.iter().any(|t| t.texcoords.is_some()) {
        mesh.texture = Some(Texture::checkerboard(
            CHECKER_TEXTURE_SIZE,
            CHECKER_TEXTURE_SIZE,
            Color::WHITE,
            Color::gray(128),
        ));
    }
    Ok(mesh)
}

/// Walk from `from` in direction `step` to the next map that loads.
fn step_map(
    engine: &mut Engine,
    image: &mut DiscImage<BufReader<File>>,
    from: usize,
    step: isize,
) -> Option<usize> {
    let last = GNS_SECTORS.len() - 1;
    let mut map = from;
    loop {
        map = map.checked_add_signed(step).filter(|&m| (1..=last).contains(&m))?;
        match image.read_mesh(map) {
            Ok(mesh) => match engine.load_mesh(mesh) {
                Ok(()) => return Some(map),
                Err(e) => warn!("MAP{map:03} rejected: {e}"),
            },
            Err(e) => warn!("MAP{map:03} skipped: {e}"),
        }
    }
}

/// Orbit around the centre of the loaded mesh.
fn recenter(engine: &mut Engine) {
    if let Some(center) = engine.mesh().map(Mesh::coord_center) {
        engine.camera_mut().set_target(center);
    }
}
