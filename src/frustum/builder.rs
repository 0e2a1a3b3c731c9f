use log::trace;
use na::{point, Point3, Vector3};
use nalgebra as na;

use super::lights::LightBinding;
use super::params::{BarnMode, FilterParameters};
use super::shape::ShapeCache;
use super::util::{bilinear, normalize_or_zero};
use crate::error::Result;

/// The renderer halves width, height and radius compared to their authoring values.
const BASE_SCALE: f32 = 0.5;
/// Smallest |z| a projection direction is divided by.
const MIN_DIRECTION_Z: f32 = 0.001;
/// The filter's rounded rect always lies in its XY plane, projection and softness assume it.
pub const FILTER_AXIS: usize = 2;

/// (filter corner, light corner) pairs for each mode.
/// Physical looks at the opposite light corner, analytic keeps the same index.
pub fn corner_pairing(mode: BarnMode) -> [(usize, usize); 4] {
    return match mode {
        BarnMode::Physical => [(0, 2), (1, 3), (2, 0), (3, 1)],
        BarnMode::Analytic => [(0, 0), (1, 1), (2, 2), (3, 3)],
    };
}

/// Corners of the filter rect in filter space, in (-,+), (+,+), (+,-), (-,-) order.
pub fn filter_corners(params: &FilterParameters) -> [Point3<f32>; 4] {
    let w = params.width + params.radius;
    let h = params.height + params.radius;
    return [
        point![-0.5 * w, 0.5 * h, 0.0],
        point![0.5 * w, 0.5 * h, 0.0],
        point![0.5 * w, -0.5 * h, 0.0],
        point![-0.5 * w, -0.5 * h, 0.0],
    ];
}

/// Rounded rect in filter space: a copy of the cached circle with each quarter scaled by the radius
/// and pushed out to its corner.
///
/// Corners are processed in circle order, top right, top left, bottom left, bottom right. Each
/// group holds one arc plus the duplicated boundary vertex, so both vertices of a boundary are
/// moved by their own corner.
pub fn build_base_shape(params: &FilterParameters, cache: &ShapeCache) -> Result<Vec<Point3<f32>>> {
    let shape = cache.shape(params.subdivisions, FILTER_AXIS)?;
    let group_len = shape.key().arc_len() + 1;
    let (x, y) = shape.key().plane();
    let mut vtxs = shape.to_working_copy();

    let l_pos = params.width + params.left;
    let r_pos = params.width + params.right;
    let t_pos = params.height + params.top;
    let b_pos = params.height + params.bottom;

    let (l_edge, r_edge, t_edge, b_edge) = match params.edge_mode {
        true => (
            params.edge * params.left_edge,
            params.edge * params.right_edge,
            params.edge * params.top_edge,
            params.edge * params.bottom_edge,
        ),
        false => (0.0, 0.0, 0.0, 0.0),
    };

    // (horizontal edge, horizontal position, vertical edge, vertical position) per corner.
    let corners = [
        (r_edge, r_pos, t_edge, t_pos),
        (l_edge, -l_pos, t_edge, t_pos),
        (l_edge, -l_pos, b_edge, -b_pos),
        (r_edge, r_pos, b_edge, -b_pos),
    ];
    for (group, (h_edge, h_pos, v_edge, v_pos)) in vtxs.chunks_mut(group_len).zip(corners) {
        for vtx in group {
            vtx[x] = (vtx[x] * (params.radius + h_edge) + h_pos) * params.scale_width;
            vtx[y] = (vtx[y] * (params.radius + v_edge) + v_pos) * params.scale_height;
        }
    }

    for vtx in vtxs.iter_mut() {
        vtx.coords *= BASE_SCALE;
    }

    return Ok(vtxs);
}

/// Direction used by analytic mode, before shearing.
fn analytic_target(
    p_fltr: Point3<f32>,
    light: &LightBinding,
    params: &FilterParameters,
) -> Point3<f32> {
    if !params.use_light_direction {
        if params.directional {
            // Straight down the filter's Z.
            return point![p_fltr.x, p_fltr.y, p_fltr.z - 1.0];
        }
        // From the filter center, offset in Z.
        return point![0.0, 0.0, p_fltr.z - params.apex];
    }

    if params.directional {
        // Filter corner translated to the light position.
        return light.position + p_fltr.coords;
    }
    // Toward the light center, at apex distance from the filter center.
    return Point3::from(normalize_or_zero(light.position.coords) * params.apex);
}

/// The 4 rays (filter corner, normalized direction) the frustum is extruded along for one light.
pub fn ordered_projection_vectors(
    light: &LightBinding,
    params: &FilterParameters,
) -> [(Point3<f32>, Vector3<f32>); 4] {
    let f_vtxs = filter_corners(params);

    return corner_pairing(params.barn_mode).map(|(pf, pl)| {
        let p_fltr = f_vtxs[pf];
        let v = match params.barn_mode {
            BarnMode::Physical => normalize_or_zero(light.corners[pl] - p_fltr),
            BarnMode::Analytic => {
                let v = normalize_or_zero(analytic_target(p_fltr, light, params) - p_fltr);
                normalize_or_zero(Vector3::new(v.x - params.shear_x, v.y - params.shear_y, v.z))
            }
        };
        (p_fltr, v)
    });
}

/// Point `depth` away from the filter plane, on the side opposite to where the ray points: rays aim
/// at the light, the frustum extends past the filter away from it.
/// A ray almost parallel to the plane is clamped instead of going to infinity.
pub fn project_to_depth(origin: Point3<f32>, direction: Vector3<f32>, depth: f32) -> Point3<f32> {
    let distance = -depth.max(0.0) / direction.z.abs().max(MIN_DIRECTION_Z);
    return origin + direction * distance;
}

/// Far corners of the frustum for one light, in projection order.
pub fn far_corners(light: &LightBinding, params: &FilterParameters) -> [Point3<f32>; 4] {
    return ordered_projection_vectors(light, params)
        .map(|(origin, direction)| project_to_depth(origin, direction, params.depth));
}

/// Full vertex buffer: near shape, soft near shape, then far and soft far shapes for every light.
pub fn build_vertices(
    base_shape: &[Point3<f32>],
    params: &FilterParameters,
    lights: &[LightBinding],
) -> Vec<Point3<f32>> {
    let soft_scale = params.soft_scale();
    let soften = |vtx: &Point3<f32>| point![vtx.x * soft_scale, vtx.y * soft_scale, vtx.z];

    let block = base_shape.len();
    let mut vertices = Vec::<Point3<f32>>::with_capacity(2 * block * (1 + lights.len()));

    // near shape
    vertices.extend_from_slice(base_shape);
    // near softness
    vertices.extend(base_shape.iter().map(soften));

    for (i, light) in lights.iter().enumerate() {
        let npos = far_corners(light, params);
        trace!("light #{} far corners: {:?}", i, npos);
        // Projection order is (-,+), (+,+), (+,-), (-,-), bilinear wants p00, p10, p01, p11.
        let (p00, p10, p01, p11) = (npos[3], npos[2], npos[0], npos[1]);

        // far shape
        vertices.extend(base_shape.iter().map(|vtx| bilinear(*vtx, p00, p10, p01, p11)));
        // far softness
        vertices.extend(
            base_shape
                .iter()
                .map(|vtx| bilinear(soften(vtx), p00, p10, p01, p11)),
        );
    }

    return vertices;
}
