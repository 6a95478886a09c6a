//! Texture loading and caching for materials.
//!
//! Textures are immutable RGB8 grids. The cache loads images from disk once
//! and hands out `Arc`s, so triangles only ever borrow texel data.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during texture loading.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image decoding error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Texture must be at least 1x1, got {width}x{height}")]
    Empty { width: u32, height: u32 },

    #[error("Texel count {actual} does not match {width}x{height}")]
    SizeMismatch { width: u32, height: u32, actual: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// A 2D grid of RGB samples.
///
/// Texel (0, 0) is the first stored row, which corresponds to v = 0.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Row-major RGB texels
    texels: Vec<[u8; 3]>,
}

impl Texture {
    /// Create a new texture from texel data.
    pub fn new(width: u32, height: u32, texels: Vec<[u8; 3]>) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if texels.len() != width as usize * height as usize {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Build a texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn(
        width: u32,
        height: u32,
        mut f: impl FnMut(u32, u32) -> [u8; 3],
    ) -> TextureResult<Self> {
        let mut texels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                texels.push(f(x, y));
            }
        }
        Self::new(width, height, texels)
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: [u8; 3]) -> Self {
        Self {
            width: 1,
            height: 1,
            texels: vec![color],
        }
    }

    /// Create a checkerboard with square cells of `cell` texels.
    pub fn checkerboard(
        width: u32,
        height: u32,
        cell: u32,
        a: [u8; 3],
        b: [u8; 3],
    ) -> TextureResult<Self> {
        let cell = cell.max(1);
        Self::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                a
            } else {
                b
            }
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the texel at integer coordinates, clamping out-of-range indices
    /// to the nearest edge.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 3] {
        let x = x.clamp(0, self.width as i64 - 1) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        self.texels[y * self.width as usize + x]
    }

    /// Get total size in bytes (approximate).
    pub fn size_bytes(&self) -> usize {
        self.texels.len() * std::mem::size_of::<[u8; 3]>()
    }
}

/// Load a texture from an image file on disk.
pub fn load_texture_file(path: &Path) -> TextureResult<Texture> {
    let img = image::open(path)?.to_rgb8();
    let (width, height) = img.dimensions();
    let texels = img.pixels().map(|p| p.0).collect();
    Texture::new(width, height, texels)
}

/// Cache for loaded textures.
///
/// Textures are loaded on-demand and cached for reuse.
#[derive(Default)]
pub struct TextureCache {
    /// Cached textures by file path
    textures: HashMap<String, Arc<Texture>>,

    /// Base directory for resolving relative paths
    base_dir: Option<PathBuf>,
}

impl TextureCache {
    /// Create a new empty texture cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a texture cache with a base directory for relative paths.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            textures: HashMap::new(),
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load a texture from file, using cache if available.
    pub fn load(&mut self, path: &str) -> TextureResult<Arc<Texture>> {
        if let Some(texture) = self.textures.get(path) {
            return Ok(texture.clone());
        }

        let full_path = self.resolve_path(path);
        let texture = Arc::new(load_texture_file(&full_path)?);
        self.textures.insert(path.to_string(), texture.clone());

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path,
            texture.width(),
            texture.height(),
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    /// Register an already built texture under `name`.
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(name.into(), texture.clone());
        texture
    }

    /// Get a cached texture without loading.
    pub fn get(&self, path: &str) -> Option<Arc<Texture>> {
        self.textures.get(path).cloned()
    }

    /// Number of cached textures.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_texture_new_rejects_empty() {
        assert!(matches!(
            Texture::new(0, 4, vec![]),
            Err(TextureError::Empty { width: 0, height: 4 })
        ));
    }

    #[test]
    fn test_texture_new_rejects_size_mismatch() {
        assert!(matches!(
            Texture::new(2, 2, vec![[0, 0, 0]; 3]),
            Err(TextureError::SizeMismatch { actual: 3, .. })
        ));
    }

    #[test]
    fn test_texel_clamps() {
        let tex = Texture::from_fn(2, 2, |x, y| [x as u8, y as u8, 0]).unwrap();
        assert_eq!(tex.texel(-5, 0), [0, 0, 0]);
        assert_eq!(tex.texel(7, 9), [1, 1, 0]);
        assert_eq!(tex.texel(1, 0), [1, 0, 0]);
    }

    #[test]
    fn test_checkerboard() {
        let tex = Texture::checkerboard(4, 4, 2, [255, 255, 255], [0, 0, 0]).unwrap();
        assert_eq!(tex.texel(0, 0), [255, 255, 255]);
        assert_eq!(tex.texel(2, 0), [0, 0, 0]);
        assert_eq!(tex.texel(2, 2), [255, 255, 255]);
    }

    #[test]
    fn test_cache_insert_and_get() {
        let mut cache = TextureCache::new();
        assert!(cache.is_empty());
        let tex = cache.insert("white", Texture::solid_color([255, 255, 255]));
        assert_eq!(cache.len(), 1);
        assert!(Arc::ptr_eq(&tex, &cache.get("white").unwrap()));
        assert!(cache.get("missing").is_none());
    }

    #[test]
    fn test_cache_missing_file_is_error() {
        let mut cache = TextureCache::with_base_dir("/nonexistent-dir");
        assert!(cache.load("nope.png").is_err());
    }

    #[test]
    fn test_load_roundtrip_through_png() {
        let dir = std::env::temp_dir().join("jrtr_texture_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("grad.png");
        let img =
            image::RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8 * 10, y as u8 * 20, 7]));
        img.save(&path).unwrap();

        let tex = load_texture_file(&path).unwrap();
        assert_eq!((tex.width(), tex.height()), (3, 2));
        assert_eq!(tex.texel(2, 1), [20, 20, 7]);
    }
}
