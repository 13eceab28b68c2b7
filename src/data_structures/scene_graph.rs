//! Scene graph and hierarchical scene organization.
//!
//! Nodes live in a generational arena ([`slotmap`]) and are addressed through
//! [`NodeId`] handles. A handle to a removed node stays invalid forever, so a
//! model that was unloaded cannot be mutated by accident later on.

use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};
use slotmap::{SlotMap, new_key_type};

use crate::{
    data_structures::{mesh::MeshData, texture::TextureHandle, transform::Transform},
    environment::{Light, SkyDome, WaterSurface},
    error::SceneError,
    shapes::Geometry,
};

new_key_type! {
    /// Handle to a node placed in a [`SceneGraph`].
    pub struct NodeId;
}

/// Surface description attached to drawable nodes.
#[derive(Clone, Debug, PartialEq)]
pub enum Material {
    /// Uniformly shaded material with an optional colour map.
    Standard {
        color: u32,
        roughness: f32,
        map: Option<TextureHandle>,
    },
    /// Material authored inside a scene-graph model file.
    Embedded { index: Option<usize> },
}

impl Material {
    pub fn standard(color: u32) -> Self {
        Material::Standard {
            color,
            roughness: 1.0,
            map: None,
        }
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Pure transform node (e.g. the root of a multi-mesh model).
    Group,
    /// Mesh loaded from a model file.
    Mesh {
        mesh: Arc<MeshData>,
        material: Material,
    },
    /// Procedural geometry built by the shape factory.
    Shape {
        geometry: Geometry,
        material: Material,
    },
    Light(Light),
    Water {
        geometry: Geometry,
        surface: WaterSurface,
    },
    Sky(SkyDome),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub transform: Transform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
    /// Draws a debug helper (bounding box) around the node.
    pub helper: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            name: None,
            kind,
            transform: Transform::default(),
            cast_shadow: false,
            receive_shadow: false,
            helper: false,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_mesh(&self) -> bool {
        matches!(self.kind, NodeKind::Mesh { .. } | NodeKind::Shape { .. })
    }

    /// Replaces the material of mesh-like nodes; other nodes are left alone.
    pub fn set_material(&mut self, new_material: Material) {
        match &mut self.kind {
            NodeKind::Mesh { material, .. } | NodeKind::Shape { material, .. } => {
                *material = new_material
            }
            _ => (),
        }
    }
}

#[derive(Default)]
pub struct SceneGraph {
    nodes: SlotMap<NodeId, Node>,
    roots: Vec<NodeId>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a top-level node. It is visible from the next render on.
    pub fn add(&mut self, node: Node) -> NodeId {
        let mut node = node;
        node.parent = None;
        node.children.clear();
        let id = self.nodes.insert(node);
        self.roots.push(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: Node) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        let mut node = node;
        node.parent = Some(parent);
        node.children.clear();
        let id = self.nodes.insert(node);
        if let Some(parent) = self.nodes.get_mut(parent) {
            parent.children.push(id);
        }
        Ok(id)
    }

    /// Removes a node together with its whole subtree and returns the node itself.
    pub fn remove(&mut self, id: NodeId) -> Result<Node, SceneError> {
        let descendants = self.descendants(id)?;
        let node = self.nodes.remove(id).ok_or(SceneError::UnknownNode(id))?;
        // descendants[0] is `id` itself
        for child in descendants.into_iter().skip(1) {
            self.nodes.remove(child);
        }
        match node.parent.and_then(|parent| self.nodes.get_mut(parent)) {
            Some(parent) => parent.children.retain(|&child| child != id),
            None => self.roots.retain(|&root| root != id),
        }
        Ok(node)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Sets the rotation of the axes that are `Some`; `None` axes stay untouched.
    pub fn rotate(&mut self, id: NodeId, axes: [Option<f32>; 3]) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(id).ok_or(SceneError::UnknownNode(id))?;
        node.transform.set_rotation_axes(axes);
        Ok(())
    }

    /// `id` followed by all of its descendants in depth-first order.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, SceneError> {
        if !self.nodes.contains_key(id) {
            return Err(SceneError::UnknownNode(id));
        }
        let mut visited = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            visited.push(current);
            if let Some(node) = self.nodes.get(current) {
                stack.extend(node.children.iter().rev());
            }
        }
        Ok(visited)
    }

    /// Calls `visit` for `id` and every node below it.
    pub fn traverse_mut(
        &mut self,
        id: NodeId,
        mut visit: impl FnMut(&mut Node),
    ) -> Result<(), SceneError> {
        for node_id in self.descendants(id)? {
            if let Some(node) = self.nodes.get_mut(node_id) {
                visit(node);
            }
        }
        Ok(())
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, node)| node.name.as_deref() == Some(name))
            .map(|(id, _)| id)
    }

    /// Model matrix of a node, including all of its ancestors.
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut matrix = Matrix4::identity();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.nodes.get(node_id)?;
            matrix = node.transform.to_matrix() * matrix;
            current = node.parent;
        }
        Some(matrix)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
