//! Per-frame geometry pipeline.
//!
//! ```text
//! model ─world─▶ (light) ─view─▶ (depth) ─proj─▶ ÷w ─viewport─▶ cull ─▶ sort
//! ```
//!
//! Lighting runs on world-space vertices. The view transform is a rigid
//! rotation + translation, so the normal/light angle is the same in
//! either space and the light directions can stay in world units.

use crate::{
    engine::types::{FrameStats, ProjectedTriangle, Viewport},
    math::{Homogeneous, Vec2, Vec3},
    world::{
        camera::{Camera, Projection},
        light::light_color,
        model::Model,
    },
};

/// Radians per second added to the mesh's Y rotation while auto-rotating.
pub const AUTO_ROTATE_SPEED: f64 = 0.5;

/// Transform, light, project and cull every triangle of `model`, then
/// depth-sort the survivors into `out` (cleared first).
pub fn project_model(
    model: &Model,
    camera: &Camera,
    viewport: &Viewport,
    out: &mut Vec<ProjectedTriangle>,
) -> FrameStats {
    out.clear();
    let mesh = model.mesh();
    let world_m = model.world_matrix();
    let view_m = camera.view_matrix();
    let proj_m = camera.projection_matrix();
    let perspective = camera.projection() == Projection::Perspective;

    let mut stats = FrameStats { total: mesh.triangles.len(), ..FrameStats::default() };

    for (i, tri) in mesh.triangles.iter().enumerate() {
        /*----- 1. model → world, lighting --------------------------------*/
        let world = tri.vertices.map(|v| world_m.mul_vec3(v));
        let light = light_color(mesh.lighting.as_ref(), &world);

        /*----- 2. world → view, sort key ---------------------------------*/
        let view: [Vec3; 3] = world.map(|v| view_m.mul_vec3(v));
        let avg_depth = (view[0].z + view[1].z + view[2].z) / 3.0;

        /*----- 3. projection + viewport ----------------------------------*/
        let points = view.map(|v| {
            let mut p = proj_m.mul_vec4(v.extend(1.0));
            if perspective {
                p = p.perspective_divide();
            }
            // screen Y grows downward
            Vec2::new(p.x * viewport.half_w + viewport.half_w, -p.y * viewport.half_h + viewport.half_h)
        });

        /*----- 4. back-face cull on the projected triangle ---------------*/
        if should_cull(&points) {
            stats.culled += 1;
            continue;
        }

        out.push(ProjectedTriangle {
            points,
            texcoords: tri.texcoords,
            palette: tri.palette,
            color: tri.color,
            light_color: light,
            avg_depth,
            source: i,
        });
    }

    sort_by_depth(out);
    stats.visible = out.len();
    stats
}

/// `true` when the screen-space winding is clockwise (facing away).
#[inline]
pub fn should_cull(points: &[Vec2; 3]) -> bool {
    let ab = points[1] - points[0];
    let ac = points[2] - points[0];
    ab.perp_dot(ac) < 0.0
}

/// Painter's order: farthest first; equal depths keep their order.
///
/// Intersecting or interleaved triangles can still come out wrong; there
/// is no per-pixel depth test behind this.
pub fn sort_by_depth(list: &mut [ProjectedTriangle]) {
    list.sort_by(|a, b| b.avg_depth.total_cmp(&a.avg_depth));
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
