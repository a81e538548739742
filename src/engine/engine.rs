use log::info;

use crate::{
    engine::{
        pipeline::{self, AUTO_ROTATE_SPEED},
        types::{FrameStats, ProjectedTriangle, RenderOptions, Viewport},
    },
    renderer::{Canvas, Clipped, raster},
    world::{
        camera::Camera,
        color::{Background, Color},
        mesh::{Mesh, MeshError},
        model::Model,
    },
};

/// Highlight colour of the wireframe overlay.
pub const WIREFRAME_COLOR: Color = Color::MAGENTA;

/// Owns everything one frame needs: the model, the camera, the toggles
/// and the render list produced by the last [`Engine::update`].
pub struct Engine {
    model: Option<Model>,
    camera: Camera,
    options: RenderOptions,
    viewport: Viewport,
    render_list: Vec<ProjectedTriangle>,
    stats: FrameStats,
}

impl Engine {
    pub fn new(viewport: Viewport, camera: Camera) -> Self {
        let mut camera = camera;
        camera.set_aspect(viewport.aspect());
        Self {
            model: None,
            camera,
            options: RenderOptions::default(),
            viewport,
            render_list: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /// Replace the current mesh. An invalid mesh is rejected and the
    /// previous one (if any) stays in place.
    pub fn load_mesh(&mut self, mesh: Mesh) -> Result<(), MeshError> {
        mesh.validate()?;
        info!(
            "mesh '{}': {} triangles, texture: {}, palettes: {}, lights: {}",
            mesh.name,
            mesh.triangles.len(),
            mesh.texture.as_ref().map_or("none".to_string(), |t| format!("{}x{}", t.width(), t.height())),
            mesh.palettes.len(),
            mesh.lighting.as_ref().map_or(0, |l| l.directional.len()),
        );
        self.model = Some(Model::new(mesh));
        self.render_list.clear();
        self.stats = FrameStats::default();
        Ok(())
    }

    /// Drop the mesh, leaving nothing to draw.
    pub fn unload_mesh(&mut self) -> Option<Mesh> {
        self.render_list.clear();
        self.stats = FrameStats::default();
        self.model.take().map(Model::into_mesh)
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.model.as_ref().map(Model::mesh)
    }

    /*──────────────────────── per frame ─────────────────────────────*/

    /// Advance auto-rotation by `dt` seconds and rebuild the render list.
    pub fn update(&mut self, dt: f64) -> FrameStats {
        let Some(model) = self.model.as_mut() else {
            self.render_list.clear();
            self.stats = FrameStats::default();
            return self.stats;
        };

        if self.options.contains(RenderOptions::AUTO_ROTATE) {
            model.mesh_mut().rotation.y += AUTO_ROTATE_SPEED * dt;
            model.update_matrix();
        }

        self.stats = pipeline::project_model(model, &self.camera, &self.viewport, &mut self.render_list);
        self.stats
    }

    /// Rasterize the current render list, back to front. Nothing is
    /// written outside the viewport.
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        let Some(model) = self.model.as_ref() else { return };
        let mesh = model.mesh();
        let mut clipped = Clipped::new(canvas, self.viewport.width, self.viewport.height);
        let canvas = &mut clipped;
        let textured = self.options.contains(RenderOptions::SHOW_TEXTURE);
        let lit = self.options.contains(RenderOptions::SHOW_LIGHTING);
        let wireframe = self.options.contains(RenderOptions::SHOW_WIREFRAME);

        for tri in &self.render_list {
            let light = lit.then_some(tri.light_color);
            match (textured, tri.texcoords.as_ref(), mesh.texture.as_ref()) {
                (true, Some(uv), Some(texture)) => {
                    let palette = tri.palette.and_then(|p| mesh.palettes.get(p));
                    raster::draw_textured_triangle(canvas, &tri.points, uv, texture, palette, light);
                }
                _ => {
                    let color = light.map_or(tri.color, |l| tri.color.modulate(l));
                    raster::draw_filled_triangle(canvas, &tri.points, color);
                }
            }
            if wireframe {
                raster::draw_triangle(canvas, &tri.points, WIREFRAME_COLOR);
            }
        }
    }

    /// Render list from the last `update`, farthest triangle first.
    pub fn triangles_to_render(&self) -> &[ProjectedTriangle] {
        &self.render_list
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /*──────────────────────── state access ──────────────────────────*/

    pub fn options(&self) -> RenderOptions {
        self.options
    }

    pub fn options_mut(&mut self) -> &mut RenderOptions {
        &mut self.options
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, width: usize, height: usize) {
        self.viewport = Viewport::new(width, height);
        self.camera.set_aspect(self.viewport.aspect());
    }

    /// Gradient to paint behind the mesh, when enabled and available.
    pub fn background(&self) -> Option<Background> {
        if !self.options.contains(RenderOptions::MAP_BACKGROUND) {
            return None;
        }
        self.mesh().and_then(|m| m.background)
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::Vec3,
        world::{
            camera::Projection,
            mesh::TriangleGeometry,
            shapes,
            texture::{Palette, Tex, Texture},
        },
    };

    fn engine() -> Engine {
        let cam = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Projection::Perspective, 1.0);
        Engine::new(Viewport::new(100, 100), cam)
    }

    fn count_pixels(e: &Engine) -> Vec<(i32, i32, Color)> {
        let mut px = Vec::new();
        e.render(&mut |x: i32, y: i32, c: Color| px.push((x, y, c)));
        px
    }

    #[test]
    fn update_without_mesh_is_empty() {
        let mut e = engine();
        assert_eq!(e.update(0.016), FrameStats::default());
        assert!(e.triangles_to_render().is_empty());
        assert!(count_pixels(&e).is_empty());
    }

    #[test]
    fn invalid_mesh_keeps_previous() {
        let mut e = engine();
        e.load_mesh(shapes::cube()).unwrap();
        let bad = Mesh::new("bad", vec![TriangleGeometry::new([Vec3::ZERO; 3], Color::WHITE).with_palette(0)]);
        assert!(e.load_mesh(bad).is_err());
        assert_eq!(e.mesh().map(|m| m.name.as_str()), Some("cube"));
    }

    #[test]
    fn auto_rotate_advances_y_rotation() {
        let mut e = engine();
        e.load_mesh(shapes::cube()).unwrap();
        e.options_mut().insert(RenderOptions::AUTO_ROTATE);
        e.update(2.0);
        let rot = e.mesh().unwrap().rotation;
        assert!((rot.y - 1.0).abs() < 1e-12);
        assert_eq!(rot.x, 0.0);
    }

    #[test]
    fn untextured_render_uses_flat_colour() {
        let mut e = engine();
        e.load_mesh(shapes::cube()).unwrap();
        e.options_mut().remove(RenderOptions::SHOW_LIGHTING);
        e.update(0.0);
        let px = count_pixels(&e);
        assert!(!px.is_empty());
        assert!(px.iter().all(|&(x, y, c)| c == Color::WHITE && (0..=100).contains(&x) && (0..=100).contains(&y)));
    }

    #[test]
    fn eye_close_to_mesh_stays_inside_viewport() {
        let cam = Camera::new(Vec3::new(0.0, 0.0, -1.01), Vec3::ZERO, Projection::Perspective, 1.0);
        let mut e = Engine::new(Viewport::new(100, 100), cam);
        e.load_mesh(shapes::cube()).unwrap();
        e.options_mut().insert(RenderOptions::SHOW_WIREFRAME);
        e.update(0.0);
        let tris = e.triangles_to_render().len();
        assert!(tris > 0);

        let px = count_pixels(&e);
        assert!(!px.is_empty());
        assert!(px.iter().all(|&(x, y, _)| (0..100).contains(&x) && (0..100).contains(&y)));
        // one full fill plus three clipped edges per triangle at most
        assert!(px.len() <= tris * (100 * 100 + 3 * 300));
    }

    #[test]
    fn wireframe_overlays_magenta() {
        let mut e = engine();
        e.load_mesh(shapes::cube()).unwrap();
        e.options_mut().insert(RenderOptions::SHOW_WIREFRAME);
        e.update(0.0);
        assert!(count_pixels(&e).iter().any(|p| p.2 == WIREFRAME_COLOR));
    }

    #[test]
    fn textured_render_goes_through_palette() {
        let mut mesh = shapes::cube();
        mesh.texture = Some(Texture::indexed(4, 4, vec![1; 16]).unwrap());
        let mut pal = Palette::default();
        pal[1] = Color::rgba(10, 20, 30, 255);
        mesh.palettes.push(pal);
        for t in &mut mesh.triangles {
            t.palette = Some(0);
            t.texcoords = Some([Tex::new(0.1, 0.1), Tex::new(0.1, 0.9), Tex::new(0.9, 0.9)]);
        }
        let mut e = engine();
        e.load_mesh(mesh).unwrap();
        e.options_mut().remove(RenderOptions::SHOW_LIGHTING);
        e.update(0.0);
        let px = count_pixels(&e);
        assert!(!px.is_empty());
        assert!(px.iter().all(|p| p.2 == Color::rgba(10, 20, 30, 255)));
    }

    #[test]
    fn background_needs_flag_and_mesh_gradient() {
        let mut mesh = shapes::cube();
        let bg = Background::new(Color::RED, Color::BLUE);
        mesh.background = Some(bg);
        let mut e = engine();
        e.load_mesh(mesh).unwrap();
        assert_eq!(e.background(), None);
        e.options_mut().insert(RenderOptions::MAP_BACKGROUND);
        assert_eq!(e.background(), Some(bg));
    }
}
