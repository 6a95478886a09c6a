//! Color and depth storage for the rasterizer.
//!
//! Colors are packed `0x00RRGGBB`. Depth holds the perspective-correct w of
//! the nearest fragment, +∞ where nothing was drawn. Rows are stored bottom
//! up: row 0 is the bottom row of the image, matching the y-up viewport.

use std::path::Path;

use jrtr_math::Vec3;

/// Pack an RGB color in 0-1 into `0x00RRGGBB`, clamping each channel.
#[inline]
pub fn pack_rgb(color: Vec3) -> u32 {
    let c = (color.clamp(Vec3::ZERO, Vec3::ONE) * 255.0 + 0.5).as_uvec3();
    (c.x << 16) | (c.y << 8) | c.z
}

#[inline]
pub fn unpack_rgb(pixel: u32) -> [u8; 3] {
    [(pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8]
}

/// Owned color and depth buffers of exactly width * height entries.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    color: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    /// Allocate buffers cleared to `background` and +∞ depth.
    ///
    /// The caller guarantees that width * height fits in memory.
    pub fn new(width: u32, height: u32, background: u32) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            color: vec![background; len],
            depth: vec![f32::INFINITY; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn clear(&mut self, background: u32) {
        self.color.fill(background);
        self.depth.fill(f32::INFINITY);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Write `color` at (x, y) if `depth` is strictly nearer than the stored
    /// value. Out-of-range writes are dropped. Returns whether it was written.
    #[inline]
    pub fn test_and_set(&mut self, x: u32, y: u32, depth: f32, color: u32) -> bool {
        match self.index(x, y) {
            Some(idx) if depth < self.depth[idx] => {
                self.depth[idx] = depth;
                self.color[idx] = color;
                true
            }
            _ => false,
        }
    }

    /// Whether `depth` at (x, y) would pass the depth test.
    #[inline]
    pub fn passes_depth(&self, x: u32, y: u32, depth: f32) -> bool {
        matches!(self.index(x, y), Some(idx) if depth < self.depth[idx])
    }

    /// Copy the `width` x `height` region starting at (x, y) into a new
    /// buffer. The region must lie inside this buffer.
    pub fn crop(&self, x: u32, y: u32, width: u32, height: u32) -> FrameBuffer {
        debug_assert!(x + width <= self.width && y + height <= self.height);
        let mut tile = FrameBuffer::new(width, height, 0);
        for row in 0..height {
            let src = (y + row) as usize * self.width as usize + x as usize;
            let dst = row as usize * width as usize;
            let cols = width as usize;
            tile.color[dst..dst + cols].copy_from_slice(&self.color[src..src + cols]);
            tile.depth[dst..dst + cols].copy_from_slice(&self.depth[src..src + cols]);
        }
        tile
    }

    /// Copy `tile` into this buffer with its bottom-left corner at (x, y).
    /// Parts outside this buffer are ignored.
    pub fn blit(&mut self, tile: &FrameBuffer, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        let cols = tile.width.min(self.width - x) as usize;
        let rows = tile.height.min(self.height - y);
        for row in 0..rows {
            let src = row as usize * tile.width as usize;
            let dst = (y + row) as usize * self.width as usize + x as usize;
            self.color[dst..dst + cols].copy_from_slice(&tile.color[src..src + cols]);
            self.depth[dst..dst + cols].copy_from_slice(&tile.depth[src..src + cols]);
        }
    }

    /// Exchange the color storage with `other`, which must have the same
    /// length.
    pub(crate) fn swap_color(&mut self, other: &mut Vec<u32>) {
        debug_assert_eq!(self.color.len(), other.len());
        std::mem::swap(&mut self.color, other);
    }

    pub fn color_buffer(&self) -> ColorBuffer<'_> {
        ColorBuffer::new(self.width, self.height, &self.color)
    }

    pub fn depth_buffer(&self) -> DepthBuffer<'_> {
        DepthBuffer {
            width: self.width,
            height: self.height,
            depths: &self.depth,
        }
    }
}

/// Read-only view of a packed color buffer.
#[derive(Debug, Clone, Copy)]
pub struct ColorBuffer<'a> {
    width: u32,
    height: u32,
    pixels: &'a [u32],
}

impl<'a> ColorBuffer<'a> {
    pub(crate) fn new(width: u32, height: u32, pixels: &'a [u32]) -> Self {
        debug_assert_eq!(pixels.len(), width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Packed color at (x, y) with y counted from the bottom.
    pub fn pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Raw packed pixels, bottom row first.
    pub fn as_slice(&self) -> &'a [u32] {
        self.pixels
    }

    /// Raw pixel memory in native byte order.
    pub fn as_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.pixels)
    }

    /// Tightly packed RGB8 rows, top row first, ready for display or export.
    pub fn to_rgb_top_down(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for row in self.pixels.chunks_exact(self.width.max(1) as usize).rev() {
            for &p in row {
                out.extend_from_slice(&unpack_rgb(p));
            }
        }
        out
    }

    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[(self.height - 1 - y) as usize * self.width as usize + x as usize];
            image::Rgb(unpack_rgb(p))
        })
    }

    /// Save as an image file; the format follows the file extension.
    pub fn save(&self, path: &Path) -> image::ImageResult<()> {
        self.to_image().save(path)
    }
}

/// Read-only view of the depth buffer.
#[derive(Debug, Clone, Copy)]
pub struct DepthBuffer<'a> {
    width: u32,
    height: u32,
    depths: &'a [f32],
}

impl<'a> DepthBuffer<'a> {
    pub fn depth(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.depths[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.depths
    }
}
