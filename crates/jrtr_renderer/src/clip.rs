//! Near-plane clipping in homogeneous space.
//!
//! Triangles are clipped against the single plane w = epsilon with the
//! Sutherland-Hodgman algorithm. The viewport transform leaves w untouched,
//! so clipping can run on screen-homogeneous vertices.

use crate::vertex::ClipVertex;

/// Vertices with w below this are behind (or on) the camera plane.
pub const NEAR_W_EPSILON: f32 = 1e-5;

/// True when every vertex lies in front of the near plane.
pub fn in_front(tri: &[ClipVertex; 3], epsilon: f32) -> bool {
    tri.iter().all(|v| v.w() >= epsilon)
}

/// Clip a triangle against w >= epsilon.
///
/// Returns zero, one or two triangles with the input winding preserved.
pub fn clip_near(tri: &[ClipVertex; 3], epsilon: f32) -> Vec<[ClipVertex; 3]> {
    if in_front(tri, epsilon) {
        return vec![*tri];
    }

    let mut polygon: Vec<ClipVertex> = Vec::with_capacity(4);
    for i in 0..3 {
        let a = &tri[i];
        let b = &tri[(i + 1) % 3];
        let da = a.w() - epsilon;
        let db = b.w() - epsilon;

        if da >= 0.0 {
            polygon.push(*a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            polygon.push(a.lerp(b, da / (da - db)));
        }
    }

    if polygon.len() < 3 {
        return Vec::new();
    }
    (1..polygon.len() - 1)
        .map(|i| [polygon[0], polygon[i], polygon[i + 1]])
        .collect()
}
