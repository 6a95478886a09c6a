use glam::{Mat4, Vec4};

/// Build the viewport matrix mapping normalized device coordinates to pixels.
///
/// x_s = x * W/2 + (W-1)/2 and y_s = y * H/2 + (H-1)/2, so NDC -1 lands half
/// a pixel outside the first pixel center and +1 half a pixel past the last.
/// The y axis points up: pixel row 0 is the bottom of the image.
pub fn viewport_matrix(width: u32, height: u32) -> Mat4 {
    let w = width as f32;
    let h = height as f32;
    Mat4::from_cols(
        Vec4::new(w / 2.0, 0.0, 0.0, 0.0),
        Vec4::new(0.0, h / 2.0, 0.0, 0.0),
        Vec4::new(0.0, 0.0, 1.0, 0.0),
        Vec4::new((w - 1.0) / 2.0, (h - 1.0) / 2.0, 0.0, 1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_corners() {
        let vp = viewport_matrix(10, 20);
        let lo = vp * Vec4::new(-1.0, -1.0, 0.0, 1.0);
        let hi = vp * Vec4::new(1.0, 1.0, 0.0, 1.0);
        assert_eq!(lo.truncate().truncate(), glam::Vec2::new(-0.5, -0.5));
        assert_eq!(hi.truncate().truncate(), glam::Vec2::new(9.5, 19.5));
    }

    #[test]
    fn test_viewport_scales_with_w() {
        // Applied before the perspective divide, the offset is scaled by w
        let vp = viewport_matrix(10, 10);
        let p = vp * Vec4::new(0.0, 0.0, 0.0, 2.0);
        assert_eq!(p.x / p.w, 4.5);
        assert_eq!(p.y / p.w, 4.5);
        assert_eq!(p.w, 2.0);
    }
}
