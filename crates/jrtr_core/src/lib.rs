//! jrtr core - scene description for the software rasterizer.
//!
//! This crate provides:
//!
//! - **Geometry**: `VertexData` attribute streams and procedural `shapes`
//! - **Appearance**: `Material`, `Texture` and the `TextureCache`
//! - **Scene graph**: groups, shape leaves and lights, flattened into
//!   `RenderItem`s by a `SceneManager`
//!
//! # Example
//!
//! ```ignore
//! use jrtr_core::{shapes, Material, Shape, SimpleSceneManager};
//!
//! let cube = Shape::new("cube", shapes::cube(1.0)?, Material::default());
//! let mut scene = SimpleSceneManager::new();
//! scene.add_shape(std::sync::Arc::new(cube), jrtr_math::Mat4::IDENTITY);
//! ```

pub mod light;
pub mod manager;
pub mod material;
pub mod scene;
pub mod shapes;
pub mod texture;
pub mod vertex_data;

// Re-export commonly used types
pub use light::{Light, LightKind};
pub use manager::{GraphSceneManager, SceneManager, SimpleSceneManager};
pub use material::{Material, Shading, TextureFilter};
pub use scene::{
    FlatScene, Node, NodeId, NodeKind, RenderItem, SceneError, SceneGraph, SceneResult, Shape,
};
pub use shapes::{ShapeError, ShapeResult};
pub use texture::{load_texture_file, Texture, TextureCache, TextureError, TextureResult};
pub use vertex_data::{VertexData, VertexDataError, VertexDataResult};
