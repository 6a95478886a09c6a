// Matrix-vector helpers for the software rasterizer.
//
// Extends glam::Mat4 / glam::Mat3 with the homogeneous operations the
// rasterizer needs. glam already provides transform_point3(),
// transform_vector3() and inverse().

use glam::{Mat3, Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a point to homogeneous coordinates (implicit w=1) without
    /// the perspective divide.
    fn transform_homogeneous(&self, point: Vec3) -> Vec4;
}

impl Mat4Ext for Mat4 {
    fn transform_homogeneous(&self, point: Vec3) -> Vec4 {
        *self * point.extend(1.0)
    }
}

/// Extension trait for Mat3.
pub trait Mat3Ext {
    /// Invert the matrix, returning `None` when the determinant magnitude is
    /// at or below `epsilon` (or not finite).
    fn try_inverse(&self, epsilon: f32) -> Option<Mat3>;
}

impl Mat3Ext for Mat3 {
    fn try_inverse(&self, epsilon: f32) -> Option<Mat3> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() <= epsilon {
            return None;
        }
        let inverse = self.inverse();
        inverse.is_finite().then_some(inverse)
    }
}

/// Build a 3x3 matrix from three row vectors.
///
/// glam stores matrices column-major, so the rows are transposed into columns.
pub fn mat3_from_rows(r0: Vec3, r1: Vec3, r2: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(r0.x, r1.x, r2.x),
        Vec3::new(r0.y, r1.y, r2.y),
        Vec3::new(r0.z, r1.z, r2.z),
    )
}
