use log::trace;
use na::{matrix, point, Matrix4, Point3};
use nalgebra as na;

use super::util::safe_inverse;

/// Corners of a unit light quad in its own space, in (-,+), (+,+), (+,-), (-,-) order.
pub fn light_corners() -> [Point3<f32>; 4] {
    return [
        point![-0.5, 0.5, 0.0],
        point![0.5, 0.5, 0.0],
        point![0.5, -0.5, 0.0],
        point![-0.5, -0.5, 0.0],
    ];
}

/// One light feeding the filter, expressed in filter space. Only lives for one build.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightBinding {
    pub corners: [Point3<f32>; 4],
    pub position: Point3<f32>,
}

/// Z-up to Y-up basis change between the host scene and the filter visualization.
pub fn axis_fix() -> Matrix4<f32> {
    return matrix![1.0, 0.0,  0.0, 0.0;
                   0.0, 0.0, -1.0, 0.0;
                   0.0, 1.0,  0.0, 0.0;
                   0.0, 0.0,  0.0, 1.0];
}

/// Bring every light into filter space: its 4 corners and its position.
/// Lights are independent of each other, the output keeps the input order.
pub fn compute_light_bindings(
    filter_world: &Matrix4<f32>,
    light_worlds: &[Matrix4<f32>],
) -> Vec<LightBinding> {
    let fix = axis_fix();
    let filter_frame = filter_world * fix;

    let mut bindings = Vec::<LightBinding>::with_capacity(light_worlds.len());
    for (i, light_world) in light_worlds.iter().enumerate() {
        let light_to_filter = safe_inverse(light_world) * filter_frame * fix;
        let corners = light_corners().map(|corner| light_to_filter.transform_point(&corner));

        // Only the translation part of the light transform matters for its position. It goes
        // through the filter frame itself, not its inverse like the corners do, so a light above
        // the filter ends up on the filter's -Y axis.
        let translation = point![light_world[(0, 3)], light_world[(1, 3)], light_world[(2, 3)]];
        let position = filter_frame.transform_point(&translation);

        trace!("light #{} in filter space: position {:?}", i, position);
        bindings.push(LightBinding { corners, position });
    }

    return bindings;
}
