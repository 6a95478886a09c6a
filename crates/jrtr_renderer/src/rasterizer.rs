//! The frame-level rasterizer.
//!
//! Owns the color and depth buffers, transforms and clips submitted
//! triangles, and resolves visibility with a strict depth test: a fragment
//! replaces the stored one only when its w is smaller, so on exact ties the
//! first triangle drawn wins.

use jrtr_core::{
    Material, RenderItem, SceneManager, Shading, Texture, TextureFilter, VertexData,
};
use jrtr_math::{viewport_matrix, Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::bucket::{render_buckets, DEFAULT_BUCKET_SIZE};
use crate::clip::{clip_near, in_front, NEAR_W_EPSILON};
use crate::error::{RenderError, RenderResult};
use crate::framebuffer::{pack_rgb, ColorBuffer, DepthBuffer, FrameBuffer};
use crate::sampler;
use crate::triangle::{PixelBounds, Triangle};
use crate::vertex::{ClipVertex, Vertex};

/// Rasterizer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Clear color, RGB in 0-1
    pub background: [f32; 3],
    /// Skip triangles that are clockwise on screen
    pub cull_back_faces: bool,
    /// Use the tiled rayon path in `draw_items`
    pub parallel: bool,
    /// Bucket edge length for the tiled path
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            cull_back_faces: true,
            parallel: false,
            bucket_size: DEFAULT_BUCKET_SIZE,
        }
    }
}

impl RenderConfig {
    pub fn background_pixel(&self) -> u32 {
        pack_rgb(Vec3::from_array(self.background))
    }
}

/// Counters for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to the rasterizer
    pub submitted: u64,
    /// Triangles (or clipped pieces) skipped as degenerate, back-facing or
    /// entirely behind the camera
    pub culled: u64,
    /// Triangles that crossed the near plane and were clipped
    pub clipped: u64,
    /// Fragments that passed the depth test
    pub pixels_written: u64,
}

/// How a prepared triangle colors its fragments.
#[derive(Debug, Clone, Copy)]
enum Fill<'a> {
    VertexColor {
        planes: [Vec3; 3],
    },
    Textured {
        planes: [Vec3; 2],
        texture: &'a Texture,
        filter: TextureFilter,
    },
}

/// A set-up, on-screen triangle ready for scan conversion.
#[derive(Debug, Clone, Copy)]
pub struct PreparedTriangle<'a> {
    triangle: Triangle,
    bounds: PixelBounds,
    fill: Fill<'a>,
}

impl<'a> PreparedTriangle<'a> {
    pub fn triangle(&self) -> &Triangle {
        &self.triangle
    }

    /// Clamped screen rectangle of the triangle.
    pub fn bounds(&self) -> PixelBounds {
        self.bounds
    }

    #[inline]
    fn shade(&self, px: f32, py: f32) -> Vec3 {
        let tri = &self.triangle;
        match self.fill {
            Fill::VertexColor { planes } => Vec3::new(
                tri.evaluate(planes[0], px, py),
                tri.evaluate(planes[1], px, py),
                tri.evaluate(planes[2], px, py),
            ),
            Fill::Textured {
                planes,
                texture,
                filter,
            } => {
                let uv = Vec2::new(
                    tri.evaluate(planes[0], px, py),
                    tri.evaluate(planes[1], px, py),
                );
                sampler::sample(texture, uv, filter)
            }
        }
    }

    /// Scan-convert the pixels of `area` into `target`, whose bottom-left
    /// pixel is image pixel (origin_x, origin_y). Returns the number of
    /// fragments written.
    pub fn rasterize(
        &self,
        area: PixelBounds,
        target: &mut FrameBuffer,
        origin_x: u32,
        origin_y: u32,
    ) -> u64 {
        let mut written = 0;
        for y in area.min_y..=area.max_y {
            let py = y as f32;
            for x in area.min_x..=area.max_x {
                let px = x as f32;
                if !self.triangle.contains(px, py) {
                    continue;
                }
                let depth = self.triangle.depth(px, py);
                let (tx, ty) = (x - origin_x, y - origin_y);
                if !target.passes_depth(tx, ty, depth) {
                    continue;
                }
                let color = pack_rgb(self.shade(px, py));
                if target.test_and_set(tx, ty, depth, color) {
                    written += 1;
                }
            }
        }
        written
    }
}

/// Software rasterizer with a double-buffered color output.
///
/// # Example
///
/// ```ignore
/// let mut raster = Rasterizer::with_size(640, 480, RenderConfig::default())?;
/// raster.begin_frame();
/// raster.submit_triangle(&v0, &v1, &v2, &mvp, &material)?;
/// let stats = raster.end_frame()?;
/// raster.color_buffer().save(Path::new("frame.png"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Rasterizer {
    config: RenderConfig,
    viewport: Mat4,
    working: FrameBuffer,
    /// Color published by the last `end_frame`
    presented: Vec<u32>,
    in_frame: bool,
    stats: FrameStats,
}

impl Rasterizer {
    /// Create an unconfigured (0x0) rasterizer.
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            viewport: Mat4::IDENTITY,
            working: FrameBuffer::new(0, 0, 0),
            presented: Vec::new(),
            in_frame: false,
            stats: FrameStats::default(),
        }
    }

    pub fn with_size(width: u32, height: u32, config: RenderConfig) -> RenderResult<Self> {
        let mut raster = Self::new(config);
        raster.configure(width, height)?;
        Ok(raster)
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Replace the configuration. A new background applies from the next
    /// `begin_frame`.
    pub fn set_config(&mut self, config: RenderConfig) {
        self.config = config;
    }

    pub fn width(&self) -> u32 {
        self.working.width()
    }

    pub fn height(&self) -> u32 {
        self.working.height()
    }

    pub fn viewport(&self) -> &Mat4 {
        &self.viewport
    }

    /// Resize the viewport and clear all buffers.
    ///
    /// On error the previous buffers and viewport are kept.
    pub fn configure(&mut self, width: u32, height: u32) -> RenderResult<()> {
        let invalid = RenderError::InvalidViewport { width, height };
        if width == 0 || height == 0 {
            return Err(invalid);
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .filter(|len| *len <= isize::MAX as usize / std::mem::size_of::<u32>())
            .ok_or(invalid)?;

        let background = self.config.background_pixel();
        self.working = FrameBuffer::new(width, height, background);
        self.presented = vec![background; len];
        self.viewport = viewport_matrix(width, height);
        if self.in_frame {
            log::warn!("configure() called inside a frame; the frame was discarded");
        }
        self.in_frame = false;
        self.stats = FrameStats::default();

        log::info!("Rasterizer configured for {}x{}", width, height);
        Ok(())
    }

    /// Clear the working buffers and open a frame.
    pub fn begin_frame(&mut self) {
        self.working.clear(self.config.background_pixel());
        self.stats = FrameStats::default();
        self.in_frame = true;
    }

    /// Close the frame and publish its color buffer.
    pub fn end_frame(&mut self) -> RenderResult<FrameStats> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        self.in_frame = false;
        self.working.swap_color(&mut self.presented);

        log::debug!(
            "Frame done: {} triangles, {} culled, {} clipped, {} pixels written",
            self.stats.submitted,
            self.stats.culled,
            self.stats.clipped,
            self.stats.pixels_written
        );
        Ok(self.stats)
    }

    /// Whether a frame is open.
    pub fn in_frame(&self) -> bool {
        self.in_frame
    }

    /// Statistics of the open (or last) frame.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    /// Color buffer published by the most recent `end_frame`.
    pub fn color_buffer(&self) -> ColorBuffer<'_> {
        ColorBuffer::new(self.working.width(), self.working.height(), &self.presented)
    }

    /// Depth buffer of the frame being drawn (or last drawn).
    pub fn depth_buffer(&self) -> DepthBuffer<'_> {
        self.working.depth_buffer()
    }

    /// Draw one triangle given in object space.
    pub fn submit_triangle(
        &mut self,
        v0: &Vertex,
        v1: &Vertex,
        v2: &Vertex,
        mvp: &Mat4,
        material: &Material,
    ) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        check_material(material)?;

        let transform = self.viewport * *mvp;
        let mut prepared = Vec::with_capacity(2);
        self.prepare([*v0, *v1, *v2], &transform, material, &mut prepared);
        self.rasterize_sequential(&prepared);
        Ok(())
    }

    /// Draw indexed vertex data with the combined model-view-projection
    /// matrix `mvp`.
    pub fn draw_vertex_data(
        &mut self,
        data: &VertexData,
        mvp: &Mat4,
        material: &Material,
        name: &str,
    ) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        check_drawable(data, material, name)?;

        let transform = self.viewport * *mvp;
        let mut prepared = Vec::with_capacity(data.triangle_count());
        self.prepare_vertex_data(data, &transform, material, &mut prepared);
        self.rasterize_sequential(&prepared);
        Ok(())
    }

    /// Draw raw flat arrays: positions with stride 3, optional colors with
    /// stride 3, and triangle indices.
    pub fn draw_flat(
        &mut self,
        positions: &[f32],
        colors: Option<&[f32]>,
        indices: Vec<u32>,
        mvp: &Mat4,
        material: &Material,
    ) -> RenderResult<()> {
        let mut data = VertexData::from_flat(positions, indices)?;
        if let Some(colors) = colors {
            data = data.with_flat_colors(colors)?;
        }
        self.draw_vertex_data(&data, mvp, material, "flat")
    }

    /// Draw a scene item with the camera's `view_projection` matrix.
    pub fn draw_item(&mut self, item: &RenderItem, view_projection: &Mat4) -> RenderResult<()> {
        let mvp = *view_projection * item.world;
        let shape = &item.shape;
        self.draw_vertex_data(&shape.vertex_data, &mvp, &shape.material, &shape.name)
    }

    /// Draw items in order, sequentially or tiled depending on
    /// `RenderConfig::parallel`.
    pub fn draw_items(&mut self, items: &[RenderItem], view_projection: &Mat4) -> RenderResult<()> {
        if self.config.parallel {
            return self.draw_items_parallel(items, view_projection);
        }
        for item in items {
            self.draw_item(item, view_projection)?;
        }
        Ok(())
    }

    /// Draw items with the tiled rayon path.
    ///
    /// All items are validated before any pixel is written. The result is
    /// identical to drawing them one by one with [`Rasterizer::draw_item`].
    pub fn draw_items_parallel(
        &mut self,
        items: &[RenderItem],
        view_projection: &Mat4,
    ) -> RenderResult<()> {
        if !self.in_frame {
            return Err(RenderError::FrameNotStarted);
        }
        for item in items {
            check_drawable(&item.shape.vertex_data, &item.shape.material, &item.shape.name)?;
        }

        let mut prepared = Vec::new();
        for item in items {
            let transform = self.viewport * *view_projection * item.world;
            self.prepare_vertex_data(
                &item.shape.vertex_data,
                &transform,
                &item.shape.material,
                &mut prepared,
            );
        }

        let written = render_buckets(&prepared, &mut self.working, self.config.bucket_size);
        self.stats.pixels_written += written;
        Ok(())
    }

    /// Render one complete frame of `scene`.
    pub fn render_scene(&mut self, scene: &dyn SceneManager) -> RenderResult<FrameStats> {
        let flat = scene.flatten()?;
        let view_projection = scene.view_projection();

        self.begin_frame();
        if let Err(err) = self.draw_items(&flat.items, &view_projection) {
            self.in_frame = false;
            return Err(err);
        }
        self.end_frame()
    }

    fn rasterize_sequential(&mut self, prepared: &[PreparedTriangle<'_>]) {
        for tri in prepared {
            self.stats.pixels_written += tri.rasterize(tri.bounds, &mut self.working, 0, 0);
        }
    }

    fn prepare_vertex_data<'a>(
        &mut self,
        data: &VertexData,
        transform: &Mat4,
        material: &'a Material,
        out: &mut Vec<PreparedTriangle<'a>>,
    ) {
        let positions = data.positions();
        let colors = data.colors();
        let uvs = data.tex_coords();
        let vertex = |i: usize| Vertex {
            position: positions[i],
            color: colors.map_or(material.diffuse_color, |c| c[i]),
            uv: uvs.map_or(Vec2::ZERO, |t| t[i]),
        };

        for [a, b, c] in data.triangles() {
            self.prepare([vertex(a), vertex(b), vertex(c)], transform, material, out);
        }
    }

    /// Transform, clip and set up one triangle, appending every visible
    /// piece to `out`.
    fn prepare<'a>(
        &mut self,
        vertices: [Vertex; 3],
        transform: &Mat4,
        material: &'a Material,
        out: &mut Vec<PreparedTriangle<'a>>,
    ) {
        self.stats.submitted += 1;
        let clip: [ClipVertex; 3] = vertices.map(|v| v.transform(transform));

        let pieces = if in_front(&clip, NEAR_W_EPSILON) {
            vec![clip]
        } else {
            self.stats.clipped += 1;
            clip_near(&clip, NEAR_W_EPSILON)
        };
        if pieces.is_empty() {
            self.stats.culled += 1;
            return;
        }

        let (width, height) = (self.working.width(), self.working.height());
        for [a, b, c] in pieces {
            let triangle = Triangle::setup(a.xyw(), b.xyw(), c.xyw(), self.config.cull_back_faces);
            if triangle.is_degenerate() {
                self.stats.culled += 1;
                continue;
            }
            let Some(bounds) = triangle.pixel_bounds(width, height) else {
                continue;
            };

            let fill = match (material.shading, material.texture.as_deref()) {
                (Shading::Textured, Some(texture)) => Fill::Textured {
                    planes: [
                        triangle.plane([a.uv.x, b.uv.x, c.uv.x]),
                        triangle.plane([a.uv.y, b.uv.y, c.uv.y]),
                    ],
                    texture,
                    filter: material.filter,
                },
                _ => Fill::VertexColor {
                    planes: [
                        triangle.plane([a.color.x, b.color.x, c.color.x]),
                        triangle.plane([a.color.y, b.color.y, c.color.y]),
                        triangle.plane([a.color.z, b.color.z, c.color.z]),
                    ],
                },
            };
            out.push(PreparedTriangle {
                triangle,
                bounds,
                fill,
            });
        }
    }
}

fn check_material(material: &Material) -> RenderResult<()> {
    if material.is_textured() && material.texture.is_none() {
        return Err(RenderError::MissingTexture {
            material: material.name.clone(),
        });
    }
    Ok(())
}

fn check_drawable(data: &VertexData, material: &Material, name: &str) -> RenderResult<()> {
    check_material(material)?;
    if material.is_textured() && !data.has_tex_coords() {
        return Err(RenderError::MissingTexCoords {
            shape: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use jrtr_core::{Shape, SimpleSceneManager};

    const RED: Vec3 = Vec3::new(1.0, 0.0, 0.0);
    const BLUE: Vec3 = Vec3::new(0.0, 0.0, 1.0);

    fn no_cull() -> RenderConfig {
        RenderConfig {
            cull_back_faces: false,
            ..Default::default()
        }
    }

    fn colored(p: Vec3, color: Vec3) -> Vertex {
        Vertex::new(p, color, Vec2::ZERO)
    }

    /// NDC triangle covering the lower-left half of the viewport at depth z.
    fn half_screen(z: f32, color: Vec3) -> [Vertex; 3] {
        [
            colored(Vec3::new(-1.0, -1.0, z), color),
            colored(Vec3::new(1.0, -1.0, z), color),
            colored(Vec3::new(-1.0, 1.0, z), color),
        ]
    }

    fn draw(raster: &mut Rasterizer, tri: &[Vertex; 3], mvp: &Mat4) {
        raster
            .submit_triangle(&tri[0], &tri[1], &tri[2], mvp, &Material::default())
            .unwrap();
    }

    /// Projection that sets w = `w` for every point.
    fn with_w(w: f32) -> Mat4 {
        Mat4::from_diagonal(jrtr_math::Vec4::new(w, w, 1.0, w))
    }

    #[test]
    fn test_configure_and_begin_frame_clear() {
        let config = RenderConfig {
            background: [0.0, 0.0, 1.0],
            ..Default::default()
        };
        let mut raster = Rasterizer::with_size(8, 6, config).unwrap();
        assert_eq!(raster.color_buffer().as_slice().len(), 48);
        assert!(raster.color_buffer().as_slice().iter().all(|&c| c == 0x0000FF));

        raster.begin_frame();
        assert!(raster.depth_buffer().as_slice().iter().all(|d| *d == f32::INFINITY));
        raster.end_frame().unwrap();
        assert!(raster.color_buffer().as_slice().iter().all(|&c| c == 0x0000FF));
    }

    #[test]
    fn test_configure_rejects_invalid_viewport() {
        let mut raster = Rasterizer::with_size(4, 4, RenderConfig::default()).unwrap();
        assert_eq!(
            raster.configure(0, 10),
            Err(RenderError::InvalidViewport {
                width: 0,
                height: 10
            })
        );
        assert_eq!(raster.width(), 4);
        assert_eq!(raster.color_buffer().as_slice().len(), 16);
    }

    #[test]
    fn test_submit_outside_frame() {
        let mut raster = Rasterizer::with_size(4, 4, RenderConfig::default()).unwrap();
        let tri = half_screen(0.0, RED);
        let err = raster
            .submit_triangle(&tri[0], &tri[1], &tri[2], &Mat4::IDENTITY, &Material::default())
            .unwrap_err();
        assert_eq!(err, RenderError::FrameNotStarted);
        assert_eq!(raster.end_frame().unwrap_err(), RenderError::FrameNotStarted);
    }

    #[test]
    fn test_missing_texture_writes_nothing() {
        let mut raster = Rasterizer::with_size(8, 8, RenderConfig::default()).unwrap();
        let material = Material {
            shading: Shading::Textured,
            ..Default::default()
        };
        raster.begin_frame();
        let tri = half_screen(0.0, RED);
        let err = raster
            .submit_triangle(&tri[0], &tri[1], &tri[2], &Mat4::IDENTITY, &material)
            .unwrap_err();
        assert!(matches!(err, RenderError::MissingTexture { .. }));
        assert_eq!(raster.stats().pixels_written, 0);
    }

    #[test]
    fn test_missing_tex_coords() {
        let mut raster = Rasterizer::with_size(8, 8, RenderConfig::default()).unwrap();
        let texture = Arc::new(Texture::solid_color([255, 255, 255]));
        let material = Material::textured("tex", texture, TextureFilter::Nearest);
        let data = VertexData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]).unwrap();

        raster.begin_frame();
        let err = raster
            .draw_vertex_data(&data, &Mat4::IDENTITY, &material, "bare")
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::MissingTexCoords {
                shape: "bare".into()
            }
        );
    }

    #[test]
    fn test_draw_flat_reports_vertex_data_errors() {
        let mut raster = Rasterizer::with_size(8, 8, RenderConfig::default()).unwrap();
        raster.begin_frame();
        let err = raster
            .draw_flat(&[0.0; 9], None, vec![0, 1, 5], &Mat4::IDENTITY, &Material::default())
            .unwrap_err();
        assert!(matches!(err, RenderError::VertexData(_)));
    }

    #[test]
    fn test_single_triangle_fills_lower_left() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        raster.begin_frame();
        draw(&mut raster, &half_screen(0.0, RED), &Mat4::IDENTITY);
        let stats = raster.end_frame().unwrap();

        let colors = raster.color_buffer();
        assert_eq!(colors.pixel(2, 2), Some(0xFF0000));
        assert_eq!(colors.pixel(14, 14), Some(0));
        assert_eq!(stats.submitted, 1);
        assert!(stats.pixels_written > 0);
    }

    #[test]
    fn test_depth_test_idempotent() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        let tri = half_screen(0.0, RED);

        raster.begin_frame();
        draw(&mut raster, &tri, &Mat4::IDENTITY);
        let first_pass = raster.stats().pixels_written;
        let depth_before = raster.depth_buffer().as_slice().to_vec();
        draw(&mut raster, &tri, &Mat4::IDENTITY);
        let stats = raster.end_frame().unwrap();

        assert_eq!(stats.pixels_written, first_pass);
        assert_eq!(raster.depth_buffer().as_slice(), depth_before.as_slice());
    }

    #[test]
    fn test_occlusion_is_order_independent() {
        let near = half_screen(0.0, RED);
        let far = half_screen(0.0, BLUE);
        let near_mvp = with_w(1.0);
        let far_mvp = with_w(2.0);

        let mut a = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        a.begin_frame();
        draw(&mut a, &near, &near_mvp);
        draw(&mut a, &far, &far_mvp);
        a.end_frame().unwrap();

        let mut b = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        b.begin_frame();
        draw(&mut b, &far, &far_mvp);
        draw(&mut b, &near, &near_mvp);
        b.end_frame().unwrap();

        assert_eq!(a.color_buffer().as_slice(), b.color_buffer().as_slice());
        assert_eq!(a.color_buffer().pixel(3, 3), Some(0xFF0000));
    }

    #[test]
    fn test_ties_keep_first_triangle() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        raster.begin_frame();
        draw(&mut raster, &half_screen(0.0, RED), &Mat4::IDENTITY);
        draw(&mut raster, &half_screen(0.0, BLUE), &Mat4::IDENTITY);
        raster.end_frame().unwrap();
        assert_eq!(raster.color_buffer().pixel(3, 3), Some(0xFF0000));
    }

    #[test]
    fn test_back_face_culling() {
        let mut raster = Rasterizer::with_size(16, 16, RenderConfig::default()).unwrap();
        let [a, b, c] = half_screen(0.0, RED);
        raster.begin_frame();
        raster
            .submit_triangle(&a, &c, &b, &Mat4::IDENTITY, &Material::default())
            .unwrap();
        let stats = raster.end_frame().unwrap();
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.pixels_written, 0);
    }

    #[test]
    fn test_off_screen_triangles_are_safe() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        let partly = [
            colored(Vec3::new(-3.0, -3.0, 0.0), RED),
            colored(Vec3::new(3.0, -3.0, 0.0), RED),
            colored(Vec3::new(-3.0, 3.0, 0.0), RED),
        ];
        let fully = [
            colored(Vec3::new(5.0, 5.0, 0.0), RED),
            colored(Vec3::new(9.0, 5.0, 0.0), RED),
            colored(Vec3::new(5.0, 9.0, 0.0), RED),
        ];

        raster.begin_frame();
        draw(&mut raster, &partly, &Mat4::IDENTITY);
        let written = raster.stats().pixels_written;
        draw(&mut raster, &fully, &Mat4::IDENTITY);
        let stats = raster.end_frame().unwrap();

        assert!(written > 0);
        assert_eq!(stats.pixels_written, written);
        assert_eq!(raster.color_buffer().pixel(0, 0), Some(0xFF0000));
    }

    #[test]
    fn test_far_offscreen_vertex() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        let tri = [
            colored(Vec3::new(-1e19, -1.0, 0.0), RED),
            colored(Vec3::new(1.0, -1.0, 0.0), RED),
            colored(Vec3::new(1.0, 1.0, 0.0), RED),
        ];

        raster.begin_frame();
        draw(&mut raster, &tri, &Mat4::IDENTITY);
        let stats = raster.end_frame().unwrap();

        assert!(stats.pixels_written > 0);
        assert_eq!(raster.color_buffer().pixel(14, 12), Some(0xFF0000));
    }

    #[test]
    fn test_triangle_straddling_camera_is_clipped() {
        let mut raster = Rasterizer::with_size(32, 32, no_cull()).unwrap();
        let frustum = jrtr_math::Frustum::default();
        let mvp = frustum.projection_matrix();
        // One vertex behind the eye at z = +1
        let tri = [
            colored(Vec3::new(-1.0, -1.0, -5.0), RED),
            colored(Vec3::new(1.0, -1.0, -5.0), RED),
            colored(Vec3::new(0.0, 1.0, 1.0), RED),
        ];

        raster.begin_frame();
        draw(&mut raster, &tri, &mvp);
        let stats = raster.end_frame().unwrap();

        assert_eq!(stats.clipped, 1);
        assert!(stats.pixels_written > 0);
        assert!(raster
            .depth_buffer()
            .as_slice()
            .iter()
            .all(|d| *d == f32::INFINITY || (*d > 0.0 && d.is_finite())));
    }

    #[test]
    fn test_triangle_behind_camera_is_dropped() {
        let mut raster = Rasterizer::with_size(32, 32, no_cull()).unwrap();
        let mvp = jrtr_math::Frustum::default().projection_matrix();
        let tri = [
            colored(Vec3::new(-1.0, -1.0, 5.0), RED),
            colored(Vec3::new(1.0, -1.0, 5.0), RED),
            colored(Vec3::new(0.0, 1.0, 5.0), RED),
        ];
        raster.begin_frame();
        draw(&mut raster, &tri, &mvp);
        let stats = raster.end_frame().unwrap();
        assert_eq!(stats.culled, 1);
        assert_eq!(stats.pixels_written, 0);
    }

    #[test]
    fn test_textured_triangle_samples_texture() {
        let mut raster = Rasterizer::with_size(16, 16, no_cull()).unwrap();
        let texture = Arc::new(Texture::solid_color([0, 255, 0]));
        let material = Material::textured("green", texture, TextureFilter::Bilinear);
        let [a, b, c] = half_screen(0.0, RED);

        raster.begin_frame();
        raster
            .submit_triangle(&a, &b, &c, &Mat4::IDENTITY, &material)
            .unwrap();
        raster.end_frame().unwrap();
        assert_eq!(raster.color_buffer().pixel(2, 2), Some(0x00FF00));
    }

    #[test]
    fn test_color_buffer_is_double_buffered() {
        let mut raster = Rasterizer::with_size(8, 8, no_cull()).unwrap();
        raster.begin_frame();
        draw(&mut raster, &half_screen(0.0, RED), &Mat4::IDENTITY);
        // Not published until end_frame
        assert_eq!(raster.color_buffer().pixel(1, 1), Some(0));
        raster.end_frame().unwrap();
        assert_eq!(raster.color_buffer().pixel(1, 1), Some(0xFF0000));

        // The next frame starts clean while the old one stays visible
        raster.begin_frame();
        assert_eq!(raster.color_buffer().pixel(1, 1), Some(0xFF0000));
        raster.end_frame().unwrap();
        assert_eq!(raster.color_buffer().pixel(1, 1), Some(0));
    }

    fn cube_scene() -> SimpleSceneManager {
        let mut scene = SimpleSceneManager::new();
        let cube = Arc::new(Shape::new(
            "cube",
            jrtr_core::shapes::cube(1.0).unwrap(),
            Material::default(),
        ));
        scene.add_shape(
            cube.clone(),
            Mat4::from_rotation_y(0.6) * Mat4::from_rotation_x(0.3),
        );
        scene.add_shape(cube, Mat4::from_translation(Vec3::new(1.5, 0.5, -2.0)));
        scene.camera.set_center_of_projection(Vec3::new(0.0, 0.0, 6.0));
        scene
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let scene = cube_scene();

        let mut sequential = Rasterizer::with_size(97, 61, RenderConfig::default()).unwrap();
        let seq_stats = sequential.render_scene(&scene).unwrap();

        let config = RenderConfig {
            parallel: true,
            bucket_size: 16,
            ..Default::default()
        };
        let mut tiled = Rasterizer::with_size(97, 61, config).unwrap();
        let tiled_stats = tiled.render_scene(&scene).unwrap();

        assert!(seq_stats.pixels_written > 0);
        assert_eq!(seq_stats, tiled_stats);
        assert_eq!(
            sequential.color_buffer().as_slice(),
            tiled.color_buffer().as_slice()
        );
        assert_eq!(
            sequential.depth_buffer().as_slice(),
            tiled.depth_buffer().as_slice()
        );
    }

    #[test]
    fn test_render_config_json_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{ "parallel": true }"#).unwrap();
        assert!(config.parallel);
        assert!(config.cull_back_faces);
        assert_eq!(config.bucket_size, DEFAULT_BUCKET_SIZE);
    }
}
