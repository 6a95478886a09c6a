//! Vertex data representation for the jrtr scene graph.
//!
//! Stores the per-vertex attribute streams of one drawable together with
//! its triangle index list. Flat `f32` arrays (stride 3 for positions,
//! colors and normals, stride 2 for texture coordinates) are accepted and
//! validated on construction.

use jrtr_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors raised by malformed vertex data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VertexDataError {
    #[error("{semantic} array length {len} is not a multiple of stride {stride}")]
    Stride {
        semantic: &'static str,
        len: usize,
        stride: usize,
    },

    #[error("{semantic} has {len} entries but there are {expected} vertices")]
    LengthMismatch {
        semantic: &'static str,
        len: usize,
        expected: usize,
    },

    #[error("index list length {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

pub type VertexDataResult<T> = Result<T, VertexDataError>;

/// Vertex attribute streams plus triangle connectivity.
///
/// Every present attribute stream has exactly one entry per vertex; every
/// index references an existing vertex. Both invariants are checked by the
/// constructors and the `with_*` builders.
#[derive(Clone, Debug)]
pub struct VertexData {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,

    /// Per-vertex colors, RGB in 0-1
    colors: Option<Vec<Vec3>>,

    /// Per-vertex normals
    normals: Option<Vec<Vec3>>,

    /// Texture coordinates
    tex_coords: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    indices: Vec<u32>,
}

impl VertexData {
    /// Create vertex data from positions and indices.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> VertexDataResult<Self> {
        if indices.len() % 3 != 0 {
            return Err(VertexDataError::IncompleteTriangle(indices.len()));
        }
        if let Some(&index) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(VertexDataError::IndexOutOfRange {
                index,
                vertex_count: positions.len(),
            });
        }
        Ok(Self {
            positions,
            colors: None,
            normals: None,
            tex_coords: None,
            indices,
        })
    }

    /// Create vertex data from a flat position array with stride 3.
    pub fn from_flat(positions: &[f32], indices: Vec<u32>) -> VertexDataResult<Self> {
        Self::new(unflatten3("position", positions)?, indices)
    }

    /// Attach per-vertex colors.
    pub fn with_colors(mut self, colors: Vec<Vec3>) -> VertexDataResult<Self> {
        self.check_len("color", colors.len())?;
        self.colors = Some(colors);
        Ok(self)
    }

    /// Attach per-vertex colors from a flat array with stride 3.
    pub fn with_flat_colors(self, colors: &[f32]) -> VertexDataResult<Self> {
        let colors = unflatten3("color", colors)?;
        self.with_colors(colors)
    }

    /// Attach per-vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> VertexDataResult<Self> {
        self.check_len("normal", normals.len())?;
        self.normals = Some(normals);
        Ok(self)
    }

    /// Attach per-vertex normals from a flat array with stride 3.
    pub fn with_flat_normals(self, normals: &[f32]) -> VertexDataResult<Self> {
        let normals = unflatten3("normal", normals)?;
        self.with_normals(normals)
    }

    /// Attach texture coordinates.
    pub fn with_tex_coords(mut self, tex_coords: Vec<Vec2>) -> VertexDataResult<Self> {
        self.check_len("texture coordinate", tex_coords.len())?;
        self.tex_coords = Some(tex_coords);
        Ok(self)
    }

    /// Attach texture coordinates from a flat array with stride 2.
    pub fn with_flat_tex_coords(self, tex_coords: &[f32]) -> VertexDataResult<Self> {
        if tex_coords.len() % 2 != 0 {
            return Err(VertexDataError::Stride {
                semantic: "texture coordinate",
                len: tex_coords.len(),
                stride: 2,
            });
        }
        let tex_coords = tex_coords
            .chunks_exact(2)
            .map(|c| Vec2::new(c[0], c[1]))
            .collect();
        self.with_tex_coords(tex_coords)
    }

    fn check_len(&self, semantic: &'static str, len: usize) -> VertexDataResult<()> {
        if len != self.positions.len() {
            return Err(VertexDataError::LengthMismatch {
                semantic,
                len,
                expected: self.positions.len(),
            });
        }
        Ok(())
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[Vec3]> {
        self.colors.as_deref()
    }

    pub fn normals(&self) -> Option<&[Vec3]> {
        self.normals.as_deref()
    }

    pub fn tex_coords(&self) -> Option<&[Vec2]> {
        self.tex_coords.as_deref()
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Check if the vertex data has texture coordinates.
    pub fn has_tex_coords(&self) -> bool {
        self.tex_coords.is_some()
    }

    /// Get the number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Iterate over the triangles as index triplets.
    pub fn triangles(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|t| [t[0] as usize, t[1] as usize, t[2] as usize])
    }

    /// Compute smooth vertex normals by averaging face normals.
    ///
    /// Replaces existing normals. Faces are counter-clockwise when seen from
    /// the side their normal points to.
    pub fn compute_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];

        for [i0, i1, i2] in self.triangles() {
            let p0 = self.positions[i0];
            let p1 = self.positions[i1];
            let p2 = self.positions[i2];
            let face_normal = (p1 - p0).cross(p2 - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }
}

fn unflatten3(semantic: &'static str, data: &[f32]) -> VertexDataResult<Vec<Vec3>> {
    if data.len() % 3 != 0 {
        return Err(VertexDataError::Stride {
            semantic,
            len: data.len(),
            stride: 3,
        });
    }
    Ok(data
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> VertexData {
        VertexData::from_flat(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], vec![0, 1, 2])
            .unwrap()
    }

    #[test]
    fn test_vertex_data_creation() {
        let data = unit_triangle();

        assert_eq!(data.vertex_count(), 3);
        assert_eq!(data.triangle_count(), 1);
        assert!(data.normals().is_none());
        assert!(!data.has_tex_coords());
    }

    #[test]
    fn test_flat_stride_error() {
        let err = VertexData::from_flat(&[0.0, 1.0], vec![]).unwrap_err();
        assert_eq!(
            err,
            VertexDataError::Stride {
                semantic: "position",
                len: 2,
                stride: 3
            }
        );
    }

    #[test]
    fn test_index_out_of_range() {
        let err = VertexData::new(vec![Vec3::ZERO; 3], vec![0, 1, 3]).unwrap_err();
        assert_eq!(
            err,
            VertexDataError::IndexOutOfRange {
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn test_incomplete_triangle() {
        let err = VertexData::new(vec![Vec3::ZERO; 3], vec![0, 1]).unwrap_err();
        assert_eq!(err, VertexDataError::IncompleteTriangle(2));
    }

    #[test]
    fn test_attribute_length_mismatch() {
        let err = unit_triangle()
            .with_flat_colors(&[1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, VertexDataError::LengthMismatch { len: 1, expected: 3, .. }));
    }

    #[test]
    fn test_flat_tex_coords() {
        let data = unit_triangle()
            .with_flat_tex_coords(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0])
            .unwrap();
        assert_eq!(data.tex_coords().unwrap()[1], Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_compute_normals() {
        // Counter-clockwise seen from +Z produces a +Z normal
        let mut data = unit_triangle();
        data.compute_normals();

        for normal in data.normals().unwrap() {
            assert!((normal.z - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_triangles_iterator() {
        let data = VertexData::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y, Vec3::ONE],
            vec![0, 1, 2, 1, 3, 2],
        )
        .unwrap();
        let tris: Vec<_> = data.triangles().collect();
        assert_eq!(tris, vec![[0, 1, 2], [1, 3, 2]]);
    }
}
