//! Triangle setup and per-pixel evaluation.
//!
//! A triangle is given by three screen-homogeneous vertices (x, y, w) where
//! x/w and y/w are pixel coordinates. Setup builds the 3x3 matrix M whose
//! rows are the vertices and inverts it once. Every per-pixel quantity is
//! then a dot product with p = (px, py, 1):
//!
//! - edge values: transpose(M⁻¹)·p, all positive inside the triangle
//! - 1/w: (M⁻¹·(1, 1, 1))·p
//! - an attribute a: ((M⁻¹·a)·p) / (1/w), perspective-correct

use jrtr_core::{Texture, TextureFilter};
use jrtr_math::{mat3_from_rows, Mat3, Mat3Ext, Vec2, Vec3};

use crate::sampler;

/// Matrices with |det| at or below this are treated as singular.
pub const DEGENERATE_EPSILON: f32 = 1e-10;

/// Inclusive pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelBounds {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl PixelBounds {
    /// Intersection with another rectangle, if any.
    pub fn intersect(&self, other: &PixelBounds) -> Option<PixelBounds> {
        let b = PixelBounds {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        };
        (b.min_x <= b.max_x && b.min_y <= b.max_y).then_some(b)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Triangle {
    vertices: [Vec3; 3],
    inverse: Mat3,
    det: f32,
    degenerate: bool,
    /// M⁻¹·(1, 1, 1)
    w_plane: Vec3,
}

impl Triangle {
    /// Set up a triangle without back-face culling.
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self::setup(v0, v1, v2, false)
    }

    /// Set up a triangle. With `cull_back_faces`, a negative determinant
    /// (clockwise on screen with y up) marks it degenerate.
    pub fn setup(v0: Vec3, v1: Vec3, v2: Vec3, cull_back_faces: bool) -> Self {
        let m = mat3_from_rows(v0, v1, v2);
        let det = m.determinant();
        let inverse = m.try_inverse(DEGENERATE_EPSILON);
        let degenerate = inverse.is_none() || (cull_back_faces && det < 0.0);
        let inverse = inverse.unwrap_or(Mat3::ZERO);

        Self {
            vertices: [v0, v1, v2],
            inverse,
            det,
            degenerate,
            w_plane: inverse * Vec3::ONE,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Determinant of the vertex matrix. Positive for counter-clockwise
    /// triangles in front of the camera.
    pub fn determinant(&self) -> f32 {
        self.det
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    /// Edge function values at pixel (px, py).
    #[inline]
    pub fn edge_values(&self, px: f32, py: f32) -> Vec3 {
        let p = Vec3::new(px, py, 1.0);
        Vec3::new(
            self.inverse.x_axis.dot(p),
            self.inverse.y_axis.dot(p),
            self.inverse.z_axis.dot(p),
        )
    }

    /// Strict inside test; pixels exactly on an edge are outside.
    #[inline]
    pub fn contains(&self, px: f32, py: f32) -> bool {
        if self.degenerate {
            return false;
        }
        let e = self.edge_values(px, py);
        e.x > 0.0 && e.y > 0.0 && e.z > 0.0
    }

    /// Interpolated 1/w at pixel (px, py).
    #[inline]
    pub fn inverse_w(&self, px: f32, py: f32) -> f32 {
        self.w_plane.dot(Vec3::new(px, py, 1.0))
    }

    /// Perspective-correct w at pixel (px, py). Smaller is nearer.
    #[inline]
    pub fn depth(&self, px: f32, py: f32) -> f32 {
        1.0 / self.inverse_w(px, py)
    }

    /// Precompute the plane M⁻¹·a for per-vertex values `a`.
    #[inline]
    pub fn plane(&self, a: [f32; 3]) -> Vec3 {
        self.inverse * Vec3::from_array(a)
    }

    /// Evaluate a precomputed attribute plane at pixel (px, py).
    #[inline]
    pub fn evaluate(&self, plane: Vec3, px: f32, py: f32) -> f32 {
        let p = Vec3::new(px, py, 1.0);
        plane.dot(p) / self.w_plane.dot(p)
    }

    /// Perspective-correct interpolation of one scalar attribute.
    pub fn interpolate(&self, px: f32, py: f32, a: [f32; 3]) -> f32 {
        self.evaluate(self.plane(a), px, py)
    }

    /// Perspective-correct interpolation of a color or other Vec3 attribute.
    pub fn interpolate_vec3(&self, px: f32, py: f32, a: [Vec3; 3]) -> Vec3 {
        Vec3::new(
            self.interpolate(px, py, [a[0].x, a[1].x, a[2].x]),
            self.interpolate(px, py, [a[0].y, a[1].y, a[2].y]),
            self.interpolate(px, py, [a[0].z, a[1].z, a[2].z]),
        )
    }

    /// Perspective-correct interpolation of texture coordinates.
    pub fn interpolate_uv(&self, px: f32, py: f32, uvs: [Vec2; 3]) -> Vec2 {
        Vec2::new(
            self.interpolate(px, py, [uvs[0].x, uvs[1].x, uvs[2].x]),
            self.interpolate(px, py, [uvs[0].y, uvs[1].y, uvs[2].y]),
        )
    }

    /// Texture color at pixel (px, py).
    pub fn sample(
        &self,
        px: f32,
        py: f32,
        uvs: [Vec2; 3],
        texture: &Texture,
        filter: TextureFilter,
    ) -> Vec3 {
        sampler::sample(texture, self.interpolate_uv(px, py, uvs), filter)
    }

    /// Pixel rectangle covering the projected triangle plus a one pixel
    /// margin, clamped to a `width` x `height` viewport.
    ///
    /// Returns `None` when the rectangle misses the viewport entirely or a
    /// vertex projects to a non-finite position.
    pub fn pixel_bounds(&self, width: u32, height: u32) -> Option<PixelBounds> {
        if width == 0 || height == 0 {
            return None;
        }
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);
        for v in &self.vertices {
            let s = Vec2::new(v.x / v.z, v.y / v.z);
            if !s.is_finite() {
                return None;
            }
            min = min.min(s);
            max = max.max(s);
        }

        // Clamp before the integer cast so huge coordinates cannot overflow
        let (wf, hf) = (width as f32, height as f32);
        let lo_x = (min.x.floor() - 1.0).clamp(-1.0, wf) as i64;
        let lo_y = (min.y.floor() - 1.0).clamp(-1.0, hf) as i64;
        let hi_x = (max.x.ceil() + 1.0).clamp(-1.0, wf) as i64;
        let hi_y = (max.y.ceil() + 1.0).clamp(-1.0, hf) as i64;
        let (w, h) = (width as i64, height as i64);
        if hi_x < 0 || hi_y < 0 || lo_x >= w || lo_y >= h {
            return None;
        }

        Some(PixelBounds {
            min_x: lo_x.clamp(0, w - 1) as u32,
            min_y: lo_y.clamp(0, h - 1) as u32,
            max_x: hi_x.clamp(0, w - 1) as u32,
            max_y: hi_y.clamp(0, h - 1) as u32,
        })
    }
}
