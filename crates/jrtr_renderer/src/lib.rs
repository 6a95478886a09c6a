//! jrtr renderer - a software triangle rasterizer.
//!
//! Triangles are set up from screen-homogeneous vertices, interpolated
//! perspective-correctly and resolved with a w-buffer. Textures are
//! sampled with nearest or bilinear filtering. An optional tiled path
//! rasterizes buckets in parallel with rayon and produces the same image
//! as the sequential path.

mod bucket;
mod clip;
mod error;
mod framebuffer;
mod rasterizer;
mod sampler;
mod triangle;
mod vertex;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use clip::{clip_near, NEAR_W_EPSILON};
pub use error::{RenderError, RenderResult};
pub use framebuffer::{pack_rgb, unpack_rgb, ColorBuffer, DepthBuffer, FrameBuffer};
pub use rasterizer::{FrameStats, PreparedTriangle, Rasterizer, RenderConfig};
pub use sampler::{sample, sample_bilinear, sample_nearest};
pub use triangle::{PixelBounds, Triangle, DEGENERATE_EPSILON};
pub use vertex::{ClipVertex, Vertex};
