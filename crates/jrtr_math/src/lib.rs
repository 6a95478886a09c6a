// Re-export glam for convenience
pub use glam::*;

// jrtr math types
mod camera;
mod transform;
mod viewport;

pub use camera::{Camera, Frustum};
pub use transform::{mat3_from_rows, Mat3Ext, Mat4Ext};
pub use viewport::viewport_matrix;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_creation() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v.x, 1.0);
        assert_eq!(v.y, 2.0);
        assert_eq!(v.z, 3.0);
    }

    #[test]
    fn test_mat4_vec4_column_convention() {
        // Composition applies right-to-left to column vectors.
        let scale = Mat4::from_scale(Vec3::splat(2.0));
        let shift = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
        let p = (shift * scale) * Vec4::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(p, Vec4::new(3.0, 2.0, 2.0, 1.0));
    }
}
