//! Scene managers: the per-frame source of render items for a renderer.

use std::sync::Arc;

use jrtr_math::{Camera, Frustum, Mat4};

use crate::light::Light;
use crate::scene::{FlatScene, NodeId, RenderItem, SceneError, SceneGraph, SceneResult, Shape};

/// Anything that can hand a renderer a camera, a frustum and a flat list
/// of drawables each frame.
pub trait SceneManager {
    fn camera(&self) -> &Camera;

    fn frustum(&self) -> &Frustum;

    /// Flatten the scene into render items and world-space lights.
    fn flatten(&self) -> SceneResult<FlatScene>;

    /// Combined projection * camera matrix.
    fn view_projection(&self) -> Mat4 {
        self.frustum().projection_matrix() * self.camera().camera_matrix()
    }
}

/// A flat list of shapes, each with its own world transform.
#[derive(Clone, Debug, Default)]
pub struct SimpleSceneManager {
    pub camera: Camera,
    pub frustum: Frustum,
    shapes: Vec<RenderItem>,
    lights: Vec<Light>,
}

impl SimpleSceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a shape and return its index.
    pub fn add_shape(&mut self, shape: Arc<Shape>, world: Mat4) -> usize {
        self.shapes.push(RenderItem { world, shape });
        self.shapes.len() - 1
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Replace the world transform of the shape at `index`.
    pub fn set_transform(&mut self, index: usize, world: Mat4) -> bool {
        match self.shapes.get_mut(index) {
            Some(item) => {
                item.world = world;
                true
            }
            None => false,
        }
    }

    pub fn transform(&self, index: usize) -> Option<Mat4> {
        self.shapes.get(index).map(|item| item.world)
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }
}

impl SceneManager for SimpleSceneManager {
    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    fn flatten(&self) -> SceneResult<FlatScene> {
        Ok(FlatScene {
            items: self.shapes.clone(),
            lights: self.lights.clone(),
        })
    }
}

/// A scene graph with a designated root node.
#[derive(Clone, Debug, Default)]
pub struct GraphSceneManager {
    pub camera: Camera,
    pub frustum: Frustum,
    pub graph: SceneGraph,
    root: Option<NodeId>,
}

impl GraphSceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_root(&mut self, root: NodeId) -> SceneResult<()> {
        self.graph.node(root)?;
        self.root = Some(root);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }
}

impl SceneManager for GraphSceneManager {
    fn camera(&self) -> &Camera {
        &self.camera
    }

    fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    fn flatten(&self) -> SceneResult<FlatScene> {
        let root = self.root.ok_or(SceneError::NoRoot)?;
        self.graph.flatten(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::vertex_data::VertexData;
    use jrtr_math::Vec3;

    fn shape() -> Arc<Shape> {
        let data = VertexData::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]).unwrap();
        Arc::new(Shape::new("tri", data, Material::default()))
    }

    #[test]
    fn test_simple_manager_items() {
        let mut manager = SimpleSceneManager::new();
        let idx = manager.add_shape(shape(), Mat4::IDENTITY);
        manager.add_light(Light::point(Vec3::Y));

        assert!(manager.set_transform(idx, Mat4::from_translation(Vec3::X)));
        assert!(!manager.set_transform(5, Mat4::IDENTITY));

        let flat = manager.flatten().unwrap();
        assert_eq!(flat.items.len(), 1);
        assert_eq!(flat.lights.len(), 1);
        assert_eq!(flat.items[0].world, Mat4::from_translation(Vec3::X));
    }

    #[test]
    fn test_graph_manager_requires_root() {
        let manager = GraphSceneManager::new();
        assert_eq!(manager.flatten().unwrap_err(), SceneError::NoRoot);
    }

    #[test]
    fn test_graph_manager_flatten() {
        let mut manager = GraphSceneManager::new();
        let root = manager.graph.add_group("root", Mat4::IDENTITY);
        let leaf = manager.graph.add_shape("leaf", Mat4::IDENTITY, shape());
        manager.graph.add_child(root, leaf).unwrap();
        manager.set_root(root).unwrap();

        assert_eq!(manager.flatten().unwrap().items.len(), 1);
    }

    #[test]
    fn test_view_projection_composition() {
        let manager = SimpleSceneManager::new();
        let expected = manager.frustum.projection_matrix() * manager.camera.camera_matrix();
        assert_eq!(manager.view_projection(), expected);
    }
}
