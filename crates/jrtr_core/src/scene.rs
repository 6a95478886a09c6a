//! Scene graph types for jrtr.
//!
//! Nodes live in an arena and reference their children by index. Each node
//! stores an immutable local transform; world transforms are computed during
//! flattening into a separate list and never written back into the graph,
//! so flattening can run any number of times with the same result.

use std::fmt;
use std::sync::Arc;

use jrtr_math::Mat4;
use thiserror::Error;

use crate::light::Light;
use crate::material::Material;
use crate::vertex_data::VertexData;

/// Handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from scene graph manipulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    #[error("node {0} is a leaf and cannot have children")]
    NotAGroup(NodeId),

    #[error("adding {child} under {parent} would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },

    #[error("scene has no root node")]
    NoRoot,
}

pub type SceneResult<T> = Result<T, SceneError>;

/// A drawable: vertex data plus the material it is rendered with.
#[derive(Clone, Debug)]
pub struct Shape {
    pub name: String,
    pub vertex_data: Arc<VertexData>,
    pub material: Arc<Material>,
}

impl Shape {
    pub fn new(name: impl Into<String>, vertex_data: VertexData, material: Material) -> Self {
        Self {
            name: name.into(),
            vertex_data: Arc::new(vertex_data),
            material: Arc::new(material),
        }
    }

    /// Return a copy of this shape bound to another material.
    pub fn with_material(&self, material: Material) -> Self {
        Self {
            name: self.name.clone(),
            vertex_data: self.vertex_data.clone(),
            material: Arc::new(material),
        }
    }
}

/// What a node is: an interior group or one of the two leaf kinds.
#[derive(Clone, Debug)]
pub enum NodeKind {
    Group { children: Vec<NodeId> },
    Shape(Arc<Shape>),
    Light(Light),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    local: Mat4,
    kind: NodeKind,
}

impl Node {
    /// Transform relative to the parent node.
    pub fn local_transform(&self) -> Mat4 {
        self.local
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn children(&self) -> &[NodeId] {
        match &self.kind {
            NodeKind::Group { children } => children,
            _ => &[],
        }
    }
}

/// A shape paired with its accumulated world transform.
#[derive(Clone, Debug)]
pub struct RenderItem {
    pub world: Mat4,
    pub shape: Arc<Shape>,
}

/// Output of [`SceneGraph::flatten`].
#[derive(Clone, Debug, Default)]
pub struct FlatScene {
    /// Shapes in depth-first order
    pub items: Vec<RenderItem>,

    /// Lights with world-space position and direction
    pub lights: Vec<Light>,
}

/// Arena-backed scene graph.
#[derive(Clone, Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: impl Into<String>, local: Mat4, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            name: name.into(),
            local,
            kind,
        });
        id
    }

    /// Add an interior node with no children yet.
    pub fn add_group(&mut self, name: impl Into<String>, local: Mat4) -> NodeId {
        self.push(name, local, NodeKind::Group { children: Vec::new() })
    }

    /// Add a shape leaf.
    pub fn add_shape(&mut self, name: impl Into<String>, local: Mat4, shape: Arc<Shape>) -> NodeId {
        self.push(name, local, NodeKind::Shape(shape))
    }

    /// Add a light leaf.
    pub fn add_light(&mut self, name: impl Into<String>, local: Mat4, light: Light) -> NodeId {
        self.push(name, local, NodeKind::Light(light))
    }

    /// Attach `child` under `parent`.
    ///
    /// A node may appear under several parents (it is then drawn once per
    /// path), but never under itself or one of its descendants.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<()> {
        self.node(child)?;
        if !matches!(self.node(parent)?.kind, NodeKind::Group { .. }) {
            return Err(SceneError::NotAGroup(parent));
        }
        if self.is_reachable(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }
        if let NodeKind::Group { children } = &mut self.nodes[parent.0].kind {
            children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. Returns whether it was attached.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> SceneResult<bool> {
        self.node(parent)?;
        match &mut self.nodes[parent.0].kind {
            NodeKind::Group { children } => {
                let before = children.len();
                children.retain(|&c| c != child);
                Ok(children.len() != before)
            }
            _ => Err(SceneError::NotAGroup(parent)),
        }
    }

    pub fn node(&self, id: NodeId) -> SceneResult<&Node> {
        self.nodes.get(id.0).ok_or(SceneError::UnknownNode(id))
    }

    /// Replace the local transform of a node (e.g. to animate it).
    pub fn set_local_transform(&mut self, id: NodeId, local: Mat4) -> SceneResult<()> {
        let node = self.nodes.get_mut(id.0).ok_or(SceneError::UnknownNode(id))?;
        node.local = local;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `target` is `from` or one of its descendants.
    fn is_reachable(&self, from: NodeId, target: NodeId) -> bool {
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if id == target {
                return true;
            }
            stack.extend_from_slice(self.nodes[id.0].children());
        }
        false
    }

    /// Flatten the subtree under `root` into render items and lights.
    ///
    /// World transforms compose as `parent_world * local`.
    pub fn flatten(&self, root: NodeId) -> SceneResult<FlatScene> {
        self.node(root)?;
        let mut flat = FlatScene::default();
        let mut stack = vec![(root, Mat4::IDENTITY)];

        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            let world = parent_world * node.local;
            match &node.kind {
                NodeKind::Group { children } => {
                    // Reverse so children are visited in insertion order
                    for &child in children.iter().rev() {
                        stack.push((child, world));
                    }
                }
                NodeKind::Shape(shape) => flat.items.push(RenderItem {
                    world,
                    shape: shape.clone(),
                }),
                NodeKind::Light(light) => flat.lights.push(light.transformed(&world)),
            }
        }

        Ok(flat)
    }
}
