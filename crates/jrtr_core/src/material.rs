//! Material bindings for drawables.
//!
//! A material decides how the rasterizer colors a fragment: from
//! interpolated vertex colors, or from a bound texture.

use std::sync::Arc;

use jrtr_math::Vec3;
use serde::{Deserialize, Serialize};

use crate::texture::Texture;

/// Texture reconstruction filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFilter {
    Nearest,
    #[default]
    Bilinear,
}

/// How fragments of a drawable are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Perspective-correct interpolation of per-vertex colors
    #[default]
    VertexColor,
    /// Perspective-correct texture lookup
    Textured,
}

#[derive(Clone, Debug)]
pub struct Material {
    /// Material name (for diagnostics)
    pub name: String,

    /// Color used for vertices without a color attribute (RGB, 0-1)
    pub diffuse_color: Vec3,

    pub shading: Shading,

    /// Bound texture; required when `shading` is `Textured`
    pub texture: Option<Arc<Texture>>,

    pub filter: TextureFilter,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            diffuse_color: Vec3::ONE,
            shading: Shading::VertexColor,
            texture: None,
            filter: TextureFilter::default(),
        }
    }
}

impl Material {
    /// Create a vertex-colored material with a fallback diffuse color.
    pub fn new(name: impl Into<String>, diffuse_color: Vec3) -> Self {
        Self {
            name: name.into(),
            diffuse_color,
            ..Default::default()
        }
    }

    /// Create a textured material.
    pub fn textured(name: impl Into<String>, texture: Arc<Texture>, filter: TextureFilter) -> Self {
        Self {
            name: name.into(),
            shading: Shading::Textured,
            texture: Some(texture),
            filter,
            ..Default::default()
        }
    }

    /// Check if fragments are colored from a texture.
    pub fn is_textured(&self) -> bool {
        self.shading == Shading::Textured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_material_is_vertex_colored() {
        let m = Material::default();
        assert!(!m.is_textured());
        assert!(m.texture.is_none());
        assert_eq!(m.diffuse_color, Vec3::ONE);
    }

    #[test]
    fn test_textured_material() {
        let tex = Arc::new(Texture::solid_color([1, 2, 3]));
        let m = Material::textured("brick", tex, TextureFilter::Nearest);
        assert!(m.is_textured());
        assert_eq!(m.filter, TextureFilter::Nearest);
    }

    #[test]
    fn test_filter_serde_names() {
        let json = serde_json::to_string(&TextureFilter::Nearest).unwrap();
        assert_eq!(json, "\"nearest\"");
        let parsed: Shading = serde_json::from_str("\"textured\"").unwrap();
        assert_eq!(parsed, Shading::Textured);
    }
}
