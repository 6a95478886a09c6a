//! Texture reconstruction filters.
//!
//! Texture coordinates map [0, 1] onto [0, width] and [0, height]; texel
//! row 0 is v = 0. Every lookup clamps to the texture edge.

use jrtr_core::{Texture, TextureFilter};
use jrtr_math::{Vec2, Vec3};

#[inline]
fn texel_color(texture: &Texture, x: i64, y: i64) -> Vec3 {
    let [r, g, b] = texture.texel(x, y);
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

/// Nearest-neighbour lookup: round u*W and v*H to the closest texel.
pub fn sample_nearest(texture: &Texture, uv: Vec2) -> Vec3 {
    let x = (uv.x * texture.width() as f32).round() as i64;
    let y = (uv.y * texture.height() as f32).round() as i64;
    texel_color(texture, x, y)
}

/// Bilinear lookup between the four texels around (u*W, v*H).
///
/// Interpolates horizontally on both rows first, then vertically.
pub fn sample_bilinear(texture: &Texture, uv: Vec2) -> Vec3 {
    let fx = uv.x * texture.width() as f32;
    let fy = uv.y * texture.height() as f32;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let bottom = texel_color(texture, x0, y0).lerp(texel_color(texture, x0 + 1, y0), tx);
    let top = texel_color(texture, x0, y0 + 1).lerp(texel_color(texture, x0 + 1, y0 + 1), tx);
    bottom.lerp(top, ty)
}

pub fn sample(texture: &Texture, uv: Vec2, filter: TextureFilter) -> Vec3 {
    match filter {
        TextureFilter::Nearest => sample_nearest(texture, uv),
        TextureFilter::Bilinear => sample_bilinear(texture, uv),
    }
}
