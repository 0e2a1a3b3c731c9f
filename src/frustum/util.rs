use log::warn;
use na::{Matrix4, Point3, Vector3};
use nalgebra as na;

/// Length below which a vector is treated as zero.
const NORMALIZE_EPSILON: f32 = 1.0e-12;

/// Normalized copy of a vector, zero vector stays zero instead of turning into NaN.
pub fn normalize_or_zero(v: Vector3<f32>) -> Vector3<f32> {
    return v.try_normalize(NORMALIZE_EPSILON).unwrap_or_else(Vector3::zeros);
}

/// Bilinear interpolation over a quad. `v` is centered, i.e. x and y in [-0.5, 0.5] map onto the
/// quad, values outside of that range extrapolate.
pub fn bilinear(
    v: Point3<f32>,
    p00: Point3<f32>,
    p10: Point3<f32>,
    p01: Point3<f32>,
    p11: Point3<f32>,
) -> Point3<f32> {
    let a = p00.coords * (0.5 - v.x) + p10.coords * (v.x + 0.5);
    let b = p01.coords * (0.5 - v.x) + p11.coords * (v.x + 0.5);
    return Point3::from(a * (0.5 - v.y) + b * (v.y + 0.5));
}

/// Inverse which always gives a usable matrix: a singular matrix gets its diagonal nudged before a
/// second attempt, and falls back to identity if that fails too.
pub fn safe_inverse(m: &Matrix4<f32>) -> Matrix4<f32> {
    if let Some(inverse) = m.try_inverse() {
        return inverse;
    }
    warn!("singular light transform, inverting a nudged copy");
    let nudged = m + Matrix4::from_diagonal_element(1.0e-6);
    return nudged.try_inverse().unwrap_or_else(Matrix4::identity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use na::{point, vector};

    #[test]
    fn zero_vector_normalizes_to_zero() {
        let v = normalize_or_zero(Vector3::zeros());
        assert_eq!(v, Vector3::zeros());
        assert_relative_eq!(normalize_or_zero(vector![0.0, 3.0, 4.0]), vector![0.0, 0.6, 0.8]);
    }

    #[test]
    fn bilinear_hits_quad_corners() {
        let p00 = point![-1.0, -1.0, 0.0];
        let p10 = point![1.0, -1.0, 0.0];
        let p01 = point![-1.0, 1.0, 2.0];
        let p11 = point![1.0, 1.0, 2.0];
        assert_relative_eq!(bilinear(point![-0.5, -0.5, 0.0], p00, p10, p01, p11), p00);
        assert_relative_eq!(bilinear(point![0.5, -0.5, 0.0], p00, p10, p01, p11), p10);
        assert_relative_eq!(bilinear(point![-0.5, 0.5, 0.0], p00, p10, p01, p11), p01);
        assert_relative_eq!(bilinear(point![0.5, 0.5, 0.0], p00, p10, p01, p11), p11);
        assert_relative_eq!(
            bilinear(point![0.0, 0.0, 0.0], p00, p10, p01, p11),
            point![0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn singular_matrix_still_inverts() {
        let singular = Matrix4::from_diagonal(&na::Vector4::new(1.0, 1.0, 0.0, 1.0));
        let inverse = safe_inverse(&singular);
        assert!(inverse.iter().all(|value| value.is_finite()));

        let regular = Matrix4::new_translation(&vector![1.0, 2.0, 3.0]);
        assert_relative_eq!(safe_inverse(&regular) * regular, Matrix4::identity(), epsilon = 1e-6);
    }
}
