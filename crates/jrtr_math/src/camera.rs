use glam::{Mat4, Vec3};

/// Virtual camera defined by a center of projection, a look-at point and an up vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub center_of_projection: Vec3,
    pub look_at_point: Vec3,
    pub up_vector: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            center_of_projection: Vec3::new(0.0, 0.0, 10.0),
            look_at_point: Vec3::ZERO,
            up_vector: Vec3::Y,
        }
    }
}

impl Camera {
    /// Create a new camera looking from `center_of_projection` at `look_at_point`.
    pub fn new(center_of_projection: Vec3, look_at_point: Vec3) -> Self {
        Self {
            center_of_projection,
            look_at_point,
            up_vector: Vec3::Y,
        }
    }

    /// Get the camera matrix (world → camera space)
    pub fn camera_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.center_of_projection, self.look_at_point, self.up_vector)
    }

    /// Move the center of projection, keeping the look-at point.
    pub fn set_center_of_projection(&mut self, center: Vec3) {
        self.center_of_projection = center;
    }
}

/// Viewing frustum producing the projection matrix (camera → clip space).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    pub near_plane: f32,
    pub far_plane: f32,
    pub aspect_ratio: f32,
    /// Vertical field of view in radians
    pub vertical_fov: f32,
}

impl Default for Frustum {
    fn default() -> Self {
        Self {
            near_plane: 1.0,
            far_plane: 100.0,
            aspect_ratio: 1.0,
            vertical_fov: 60.0_f32.to_radians(),
        }
    }
}

impl Frustum {
    /// Get the projection matrix (OpenGL clip-space conventions)
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.vertical_fov,
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }

    /// Update aspect ratio (e.g., on viewport resize)
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect_ratio = aspect;
    }
}
