//! Vertex types flowing through the rasterizer.

use jrtr_math::{Mat4, Mat4Ext, Vec2, Vec3, Vec4};

/// An object-space vertex as submitted by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    /// RGB in 0-1
    pub color: Vec3,
    pub uv: Vec2,
}

impl Vertex {
    pub fn new(position: Vec3, color: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }

    /// White vertex without texture coordinates.
    pub fn at(position: Vec3) -> Self {
        Self::new(position, Vec3::ONE, Vec2::ZERO)
    }

    /// Transform into screen-homogeneous space by `m` (viewport * mvp).
    pub fn transform(&self, m: &Mat4) -> ClipVertex {
        ClipVertex {
            position: m.transform_homogeneous(self.position),
            color: self.color,
            uv: self.uv,
        }
    }
}

/// A vertex after the full transform but before the perspective divide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    /// (x, y, z, w); x and y are pixel coordinates times w
    pub position: Vec4,
    pub color: Vec3,
    pub uv: Vec2,
}

impl ClipVertex {
    /// Linear interpolation of every attribute, used by the clipper.
    pub fn lerp(&self, other: &ClipVertex, t: f32) -> ClipVertex {
        ClipVertex {
            position: self.position.lerp(other.position, t),
            color: self.color.lerp(other.color, t),
            uv: self.uv.lerp(other.uv, t),
        }
    }

    /// The (x, y, w) triple used for triangle setup.
    #[inline]
    pub fn xyw(&self) -> Vec3 {
        Vec3::new(self.position.x, self.position.y, self.position.w)
    }

    #[inline]
    pub fn w(&self) -> f32 {
        self.position.w
    }
}
