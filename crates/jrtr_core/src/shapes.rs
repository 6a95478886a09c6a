//! Procedural shapes used by the demo applications.
//!
//! All faces are counter-clockwise when seen from outside.

use jrtr_math::{Vec2, Vec3};
use thiserror::Error;

use crate::vertex_data::{VertexData, VertexDataError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    #[error("{segments} bezier segments need {expected} control points, got {got}")]
    ControlPoints {
        segments: usize,
        expected: usize,
        got: usize,
    },

    #[error("{name} must be at least {min}, got {got}")]
    Resolution {
        name: &'static str,
        min: usize,
        got: usize,
    },

    #[error(transparent)]
    VertexData(#[from] VertexDataError),
}

pub type ShapeResult<T> = Result<T, ShapeError>;

const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
const GREEN: Vec3 = Vec3::new(0.0, 1.0, 0.0);
const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);

fn check_min(name: &'static str, min: usize, got: usize) -> ShapeResult<()> {
    if got < min {
        return Err(ShapeError::Resolution { name, min, got });
    }
    Ok(())
}

/// Axis-aligned cube of half-size `half` with one color per face pair and
/// a full [0,1]² texture square on every face.
pub fn cube(half: f32) -> ShapeResult<VertexData> {
    #[rustfmt::skip]
    let corners: [[f32; 3]; 24] = [
        [-1.0, -1.0,  1.0], [ 1.0, -1.0,  1.0], [ 1.0,  1.0,  1.0], [-1.0,  1.0,  1.0], // front
        [-1.0, -1.0, -1.0], [-1.0, -1.0,  1.0], [-1.0,  1.0,  1.0], [-1.0,  1.0, -1.0], // left
        [ 1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0,  1.0, -1.0], [ 1.0,  1.0, -1.0], // back
        [ 1.0, -1.0,  1.0], [ 1.0, -1.0, -1.0], [ 1.0,  1.0, -1.0], [ 1.0,  1.0,  1.0], // right
        [ 1.0,  1.0,  1.0], [ 1.0,  1.0, -1.0], [-1.0,  1.0, -1.0], [-1.0,  1.0,  1.0], // top
        [-1.0, -1.0,  1.0], [-1.0, -1.0, -1.0], [ 1.0, -1.0, -1.0], [ 1.0, -1.0,  1.0], // bottom
    ];
    let face_colors = [RED, GREEN, RED, GREEN, BLUE, BLUE];
    let face_normals = [Vec3::Z, -Vec3::X, -Vec3::Z, Vec3::X, Vec3::Y, -Vec3::Y];
    let face_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let positions = corners.iter().map(|c| Vec3::from_array(*c) * half).collect();
    let mut colors = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for face in 0..6 {
        colors.extend([face_colors[face]; 4]);
        normals.extend([face_normals[face]; 4]);
        uvs.extend(face_uvs);
        let base = face as u32 * 4;
        indices.extend([base, base + 2, base + 3, base, base + 1, base + 2]);
    }

    Ok(VertexData::new(positions, indices)?
        .with_colors(colors)?
        .with_normals(normals)?
        .with_tex_coords(uvs)?)
}

/// The textured house on a ground plane.
///
/// The texture atlas holds the walls in the lower-left 0.45 square, the
/// roof above it and the ground in the right half.
pub fn house() -> ShapeResult<VertexData> {
    #[rustfmt::skip]
    let positions: [f32; 126] = [
        -4.0,-4.0,4.0, 4.0,-4.0,4.0, 4.0,4.0,4.0, -4.0,4.0,4.0,         // front face
        -4.0,-4.0,-4.0, -4.0,-4.0,4.0, -4.0,4.0,4.0, -4.0,4.0,-4.0,     // left face
        4.0,-4.0,-4.0, -4.0,-4.0,-4.0, -4.0,4.0,-4.0, 4.0,4.0,-4.0,     // back face
        4.0,-4.0,4.0, 4.0,-4.0,-4.0, 4.0,4.0,-4.0, 4.0,4.0,4.0,         // right face
        4.0,4.0,4.0, 4.0,4.0,-4.0, -4.0,4.0,-4.0, -4.0,4.0,4.0,         // top face
        -4.0,-4.0,4.0, -4.0,-4.0,-4.0, 4.0,-4.0,-4.0, 4.0,-4.0,4.0,     // bottom face
        -20.0,-4.0,20.0, 20.0,-4.0,20.0, 20.0,-4.0,-20.0, -20.0,-4.0,-20.0, // ground floor
        -4.0,4.0,4.0, 4.0,4.0,4.0, 0.0,8.0,4.0,                         // front roof
        4.0,4.0,4.0, 4.0,4.0,-4.0, 0.0,8.0,-4.0, 0.0,8.0,4.0,           // right roof
        -4.0,4.0,4.0, 0.0,8.0,4.0, 0.0,8.0,-4.0, -4.0,4.0,-4.0,         // left roof
        4.0,4.0,-4.0, -4.0,4.0,-4.0, 0.0,8.0,-4.0,                      // back roof
    ];

    const R: f32 = 0.5 * 0.45;
    #[rustfmt::skip]
    let tex_coords: [f32; 84] = [
        0.0,0.45, 0.0,1.0, 0.45,1.0, 0.45,0.45, // front
        0.0,0.45, 0.0,1.0, 0.45,1.0, 0.45,0.45, // left
        0.0,0.45, 0.0,1.0, 0.45,1.0, 0.45,0.45, // back
        0.0,0.45, 0.0,1.0, 0.45,1.0, 0.45,0.45, // right
        0.0,0.0, 0.0,0.0, 0.0,0.0, 0.0,0.0,     // top
        0.0,0.0, 0.0,0.0, 0.0,0.0, 0.0,0.0,     // bottom
        0.48,0.0, 1.0,0.0, 1.0,1.0, 0.48,1.0,   // ground floor
        0.0,1.0, 0.45,1.0, R,0.6,               // front roof
        0.0,0.0, 0.0,0.4, R,0.4, R,0.0,         // right roof
        0.0,0.0, R,0.0, R,0.4, 0.0,0.4,         // left roof
        0.0,1.0, 0.45,1.0, R,0.6,               // back roof
    ];

    let mut colors = Vec::with_capacity(42);
    for (color, count) in [
        (RED, 4),
        (GREEN, 4),
        (RED, 4),
        (GREEN, 4),
        (BLUE, 8),
        (Vec3::new(0.0, 0.5, 0.0), 4),
        (BLUE, 3),
        (RED, 4),
        (GREEN, 4),
        (BLUE, 3),
    ] {
        colors.extend(std::iter::repeat(color).take(count));
    }

    #[rustfmt::skip]
    let indices = vec![
        0,2,3, 0,1,2,         // front face
        4,6,7, 4,5,6,         // left face
        8,10,11, 8,9,10,      // back face
        12,14,15, 12,13,14,   // right face
        16,18,19, 16,17,18,   // top face
        20,22,23, 20,21,22,   // bottom face
        24,26,27, 24,25,26,   // ground floor
        28,29,30,             // roof
        31,33,34, 31,32,33,
        35,37,38, 35,36,37,
        39,40,41,
    ];

    let mut data = VertexData::from_flat(&positions, indices)?
        .with_colors(colors)?
        .with_flat_tex_coords(&tex_coords)?;
    data.compute_normals();
    Ok(data)
}

/// Closed cylinder around the z axis with `resolution` segments.
///
/// Vertices alternate between white and black, so the sides show stripes.
pub fn cylinder(resolution: usize, radius: f32, half_height: f32) -> ShapeResult<VertexData> {
    check_min("cylinder resolution", 3, resolution)?;
    let n = resolution as u32;
    let step = std::f32::consts::TAU / resolution as f32;

    let mut positions = Vec::with_capacity(2 * resolution);
    for z in [half_height, -half_height] {
        for i in 0..resolution {
            let a = i as f32 * step;
            positions.push(Vec3::new(radius * a.cos(), radius * a.sin(), z));
        }
    }
    let colors = (0..2 * resolution)
        .map(|i| if i % 2 == 0 { Vec3::ONE } else { Vec3::ZERO })
        .collect();

    let mut indices = Vec::with_capacity(12 * resolution - 12);
    // top
    for i in 0..n - 2 {
        indices.extend([0, i + 1, i + 2]);
    }
    // bottom
    for i in n..2 * n - 2 {
        indices.extend([n, i + 2, i + 1]);
    }
    // sides
    for i in 0..n {
        let next = (i + 1) % n;
        indices.extend([i, n + i, n + next]);
        indices.extend([i, n + next, next]);
    }

    Ok(VertexData::new(positions, indices)?.with_colors(colors)?)
}

/// Evaluate one cubic Bezier segment with de Casteljau's algorithm.
pub fn cubic_bezier(p: &[Vec3; 4], t: f32) -> Vec3 {
    let q0 = p[0].lerp(p[1], t);
    let q1 = p[1].lerp(p[2], t);
    let q2 = p[2].lerp(p[3], t);
    let r0 = q0.lerp(q1, t);
    let r1 = q1.lerp(q2, t);
    r0.lerp(r1, t)
}

/// Revolve a piecewise cubic Bezier profile around the z axis.
///
/// The profile lives in the xz half-plane: distance from the z axis is the
/// radius, z is the height. `control_points` holds `3 * segments + 1`
/// points; consecutive segments share their end point. Each segment is
/// sampled at `resolution` points, each ring at `angle_resolution` points.
/// Faces point outward when z grows along the profile. Ends of the profile
/// that lie off the axis are closed with a fan.
pub fn bezier_revolution(
    segments: usize,
    control_points: &[Vec3],
    resolution: usize,
    angle_resolution: usize,
) -> ShapeResult<VertexData> {
    check_min("bezier segments", 1, segments)?;
    check_min("bezier resolution", 2, resolution)?;
    check_min("angle resolution", 3, angle_resolution)?;
    let expected = 3 * segments + 1;
    if control_points.len() != expected {
        return Err(ShapeError::ControlPoints {
            segments,
            expected,
            got: control_points.len(),
        });
    }

    // Sample the profile as (radius, height)
    let mut profile = vec![radial(control_points[0])];
    for seg in control_points.windows(4).step_by(3) {
        let seg = [seg[0], seg[1], seg[2], seg[3]];
        for i in 1..resolution {
            let t = i as f32 / (resolution - 1) as f32;
            profile.push(radial(cubic_bezier(&seg, t)));
        }
    }

    let rings = profile.len();
    let k_count = angle_resolution;
    let step = std::f32::consts::TAU / k_count as f32;

    let mut positions = Vec::with_capacity(rings * k_count + 2);
    let mut uvs = Vec::with_capacity(rings * k_count + 2);
    for (i, (r, z)) in profile.iter().enumerate() {
        for k in 0..k_count {
            let a = k as f32 * step;
            positions.push(Vec3::new(r * a.cos(), r * a.sin(), *z));
            uvs.push(Vec2::new(k as f32 / k_count as f32, i as f32 / (rings - 1) as f32));
        }
    }

    let idx = |i: usize, k: usize| (i * k_count + k % k_count) as u32;
    let mut indices = Vec::new();
    for i in 0..rings - 1 {
        for k in 0..k_count {
            indices.extend([idx(i, k), idx(i, k + 1), idx(i + 1, k + 1)]);
            indices.extend([idx(i, k), idx(i + 1, k + 1), idx(i + 1, k)]);
        }
    }

    // Caps
    let (r0, z0) = profile[0];
    if r0 > 1e-6 {
        let center = positions.len() as u32;
        positions.push(Vec3::new(0.0, 0.0, z0));
        uvs.push(Vec2::new(0.5, 0.0));
        for k in 0..k_count {
            indices.extend([center, idx(0, k + 1), idx(0, k)]);
        }
    }
    let (r1, z1) = profile[rings - 1];
    if r1 > 1e-6 {
        let center = positions.len() as u32;
        positions.push(Vec3::new(0.0, 0.0, z1));
        uvs.push(Vec2::new(0.5, 1.0));
        for k in 0..k_count {
            indices.extend([center, idx(rings - 1, k), idx(rings - 1, k + 1)]);
        }
    }

    let colors = (0..positions.len())
        .map(|i| if i % 2 == 0 { Vec3::ONE } else { Vec3::ZERO })
        .collect();

    let mut data = VertexData::new(positions, indices)?
        .with_colors(colors)?
        .with_tex_coords(uvs)?;
    data.compute_normals();
    Ok(data)
}

fn radial(p: Vec3) -> (f32, f32) {
    (p.truncate().length(), p.z)
}

/// Unit square in the xy plane spanning [-1, 1]², uv spanning [0, 1]².
pub fn quad() -> ShapeResult<VertexData> {
    let positions = vec![
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
    ];
    let uvs = vec![
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];
    Ok(VertexData::new(positions, vec![0, 1, 2, 0, 2, 3])?
        .with_colors(vec![Vec3::ONE; 4])?
        .with_normals(vec![Vec3::Z; 4])?
        .with_tex_coords(uvs)?)
}
