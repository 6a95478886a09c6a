//! Bucket-based tile rasterization.
//!
//! Divides the framebuffer into tiles (buckets) that are rasterized
//! independently and in parallel using rayon. Every bucket walks the full
//! triangle list in submission order, so the merged result matches the
//! sequential path exactly.

use rayon::prelude::*;

use crate::framebuffer::FrameBuffer;
use crate::rasterizer::PreparedTriangle;
use crate::triangle::PixelBounds;

/// A rectangular region of the framebuffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    /// X coordinate of the bucket's bottom-left corner
    pub x: u32,
    /// Y coordinate of the bucket's bottom-left corner (rows count up)
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Index of this bucket in the render order
    pub index: usize,
}

impl Bucket {
    pub fn new(x: u32, y: u32, width: u32, height: u32, index: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
            index,
        }
    }

    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Inclusive pixel rectangle covered by this bucket.
    pub fn bounds(&self) -> PixelBounds {
        PixelBounds {
            min_x: self.x,
            min_y: self.y,
            max_x: self.x + self.width - 1,
            max_y: self.y + self.height - 1,
        }
    }
}

/// Default bucket size in pixels.
pub const DEFAULT_BUCKET_SIZE: u32 = 64;

/// Generate buckets covering a `width` x `height` image, sorted center-out.
///
/// A `bucket_size` of zero falls back to [`DEFAULT_BUCKET_SIZE`].
pub fn generate_buckets(width: u32, height: u32, bucket_size: u32) -> Vec<Bucket> {
    let size = if bucket_size == 0 {
        DEFAULT_BUCKET_SIZE
    } else {
        bucket_size
    };
    let mut buckets = Vec::new();

    let mut y = 0;
    while y < height {
        let mut x = 0;
        while x < width {
            let bw = size.min(width - x);
            let bh = size.min(height - y);
            buckets.push(Bucket::new(x, y, bw, bh, buckets.len()));
            x = x.saturating_add(size);
        }
        y = y.saturating_add(size);
    }

    sort_spiral(&mut buckets, width, height);
    for (i, bucket) in buckets.iter_mut().enumerate() {
        bucket.index = i;
    }

    buckets
}

/// Sort buckets by distance of their center from the image center.
fn sort_spiral(buckets: &mut [Bucket], width: u32, height: u32) {
    let center_x = width as f32 / 2.0;
    let center_y = height as f32 / 2.0;
    let dist = |b: &Bucket| {
        let cx = b.x as f32 + b.width as f32 / 2.0;
        let cy = b.y as f32 + b.height as f32 / 2.0;
        (cx - center_x).powi(2) + (cy - center_y).powi(2)
    };

    buckets.sort_by(|a, b| dist(a).total_cmp(&dist(b)));
}

/// Result of rasterizing one bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    /// Bucket-sized color and depth, seeded from the target before drawing
    pub tile: FrameBuffer,
    pub pixels_written: u64,
}

/// Rasterize every triangle that overlaps `bucket` into a copy of the
/// bucket's region of `target`.
pub fn render_bucket(
    bucket: &Bucket,
    triangles: &[PreparedTriangle<'_>],
    target: &FrameBuffer,
) -> BucketResult {
    let mut tile = target.crop(bucket.x, bucket.y, bucket.width, bucket.height);
    let area = bucket.bounds();
    let mut pixels_written = 0;

    for tri in triangles {
        if let Some(bounds) = tri.bounds().intersect(&area) {
            pixels_written += tri.rasterize(bounds, &mut tile, bucket.x, bucket.y);
        }
    }

    BucketResult {
        bucket: *bucket,
        tile,
        pixels_written,
    }
}

/// Rasterize `triangles` into `target` bucket by bucket on the rayon pool.
/// Returns the number of pixel writes.
pub fn render_buckets(
    triangles: &[PreparedTriangle<'_>],
    target: &mut FrameBuffer,
    bucket_size: u32,
) -> u64 {
    let buckets = generate_buckets(target.width(), target.height(), bucket_size);
    let results: Vec<BucketResult> = {
        let target: &FrameBuffer = target;
        buckets
            .par_iter()
            .map(|bucket| render_bucket(bucket, triangles, target))
            .collect()
    };

    log::trace!("Rasterized {} buckets", results.len());

    results
        .into_iter()
        .map(|result| {
            target.blit(&result.tile, result.bucket.x, result.bucket.y);
            result.pixels_written
        })
        .sum()
}
