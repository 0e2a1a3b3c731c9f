use na::{matrix, Matrix4, Point3, Vector2, Vector3};
use nalgebra as na;

use crate::config::CameraConfig;

/// Points with a smaller homogeneous w are considered behind the camera.
const MIN_W: f32 = 1.0e-4;

/// Simple look-at camera with a one point perspective, projecting to x, y in [-1.0, 1.0].
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    pub vp_matrix: Matrix4<f32>, // World to normalized screen coordinates.
}

impl Camera {
    pub fn new(
        look_from: Vector3<f32>,
        look_at: Vector3<f32>,
        up: Vector3<f32>,
        focal_distance: f32,
        extent: f32,
    ) -> Self {
        // New coordinate system a, b, c around camera position.
        let new_z = (look_from - look_at).normalize();
        let new_y = (up - new_z.dot(&up) * new_z).normalize();
        let new_x = new_y.cross(&new_z).normalize();
        let model_matrix = matrix![new_x.x, new_x.y, new_x.z, 0.0;
                                   new_y.x, new_y.y, new_y.z, 0.0;
                                   new_z.x, new_z.y, new_z.z, 0.0;
                                   0.0,     0.0,     0.0,     1.0];
        let view_matrix = matrix![1.0, 0.0, 0.0, -look_from.x;
                                  0.0, 1.0, 0.0, -look_from.y;
                                  0.0, 0.0, 1.0, -look_from.z;
                                  0.0, 0.0, 0.0, 1.0];
        let coef = -1.0 / focal_distance;
        let projection_matrix = matrix![1.0, 0.0, 0.0,  0.0;
                                        0.0, 1.0, 0.0,  0.0;
                                        0.0, 0.0, 1.0,  0.0;
                                        0.0, 0.0, coef, 1.0];
        // Things at look_at distance and within `extent` of it end up in [-1.0, 1.0].
        let distance = (look_from - look_at).norm();
        let s = (1.0 + distance / focal_distance) / extent;
        let screen_matrix = Matrix4::new_nonuniform_scaling(&Vector3::new(s, s, 1.0));

        return Self {
            vp_matrix: screen_matrix * projection_matrix * model_matrix * view_matrix,
        };
    }

    pub fn from_config(config: &CameraConfig) -> Self {
        return Self::new(
            config.look_from(),
            config.look_at(),
            config.up(),
            config.focal_distance,
            config.extent,
        );
    }

    /// Normalized screen coordinates of a world point, None for points behind the camera.
    pub fn project(&self, p: &Point3<f32>) -> Option<Vector2<f32>> {
        let h = self.vp_matrix * p.to_homogeneous();
        if h.w < MIN_W {
            return None;
        }
        return Some(Vector2::new(h.x / h.w, h.y / h.w));
    }
}
