//! Turning model descriptors into placed scene nodes.

use std::{collections::HashMap, rc::Rc, sync::Arc};

use anyhow::Context;

use crate::{
    animation::{AnimationClip, Channel},
    config::{ModelDescriptor, ModelFormat},
    coordinator::Progress,
    data_structures::{
        scene_graph::{Material, Node, NodeId, NodeKind, SceneGraph},
        texture::TextureHandle,
    },
    error::{ModelLoadError, SceneError},
    resources::{
        AssetNode, AssetSource, LoadedAsset, LoaderStrategy, gltf_loader::GltfStrategy,
        obj_loader::ObjStrategy,
    },
    state::SharedState,
};

/// A model placed in the scene together with the clips it brought along.
#[derive(Clone, Debug)]
pub struct Model {
    pub path: String,
    pub node: NodeId,
    pub animations: Vec<Arc<AnimationClip>>,
}

/// Loads models through the strategy matching their declared format.
#[derive(Clone)]
pub struct ModelLoader {
    state: SharedState,
    source: Rc<dyn AssetSource>,
    scene_graph: Rc<dyn LoaderStrategy>,
    plain_object: Rc<dyn LoaderStrategy>,
    /// Colour map for every plain-object model.
    object_map: Option<TextureHandle>,
    shadows: bool,
}

impl ModelLoader {
    pub fn new(
        state: SharedState,
        source: Rc<dyn AssetSource>,
        object_map: Option<TextureHandle>,
        shadows: bool,
    ) -> Self {
        Self {
            state,
            source,
            scene_graph: Rc::new(GltfStrategy),
            plain_object: Rc::new(ObjStrategy),
            object_map,
            shadows,
        }
    }

    /// Replaces the strategy used for `format`.
    pub fn with_strategy(mut self, format: ModelFormat, strategy: Rc<dyn LoaderStrategy>) -> Self {
        match format {
            ModelFormat::SceneGraph => self.scene_graph = strategy,
            ModelFormat::PlainObject => self.plain_object = strategy,
        }
        self
    }

    pub async fn load(
        &self,
        descriptor: &ModelDescriptor,
        progress: &Progress,
    ) -> Result<Model, ModelLoadError> {
        let fail = |source| ModelLoadError {
            path: descriptor.path.clone(),
            source,
        };
        let strategy = match descriptor.format {
            ModelFormat::SceneGraph => &self.scene_graph,
            ModelFormat::PlainObject => &self.plain_object,
        };
        let asset = strategy
            .parse(&descriptor.path, self.source.as_ref(), progress)
            .await
            .map_err(fail)?;

        let mut state = self.state.borrow_mut();
        self.instantiate(&mut state.graph, asset, descriptor)
            .map_err(fail)
    }

    /// Removes a previously loaded model with all of its nodes.
    pub fn unload(&self, model: &Model) -> Result<(), SceneError> {
        self.state.borrow_mut().graph.remove(model.node)?;
        log::info!("unloaded {}", model.path);
        Ok(())
    }

    fn instantiate(
        &self,
        scene: &mut SceneGraph,
        asset: LoadedAsset,
        descriptor: &ModelDescriptor,
    ) -> anyhow::Result<Model> {
        let LoadedAsset {
            nodes,
            roots,
            clips,
        } = asset;
        if roots.is_empty() {
            anyhow::bail!("no root nodes");
        }
        let mut nodes: Vec<Option<AssetNode>> = nodes.into_iter().map(Some).collect();
        let mut ids = HashMap::new();

        let group = (roots.len() > 1)
            .then(|| scene.add(Node::group().with_name(Some(descriptor.path.clone()))));
        let placed = roots.iter().try_for_each(|&index| {
            self.insert(scene, &mut nodes, index, group, descriptor.format, &mut ids)
                .map(|_| ())
        });
        let top = group.or_else(|| ids.get(&roots[0]).copied());
        if let Err(err) = placed {
            // A half-built hierarchy must not stay in the scene.
            if let Some(top) = top {
                let _ = scene.remove(top);
            }
            return Err(err);
        }
        let root = top.context("root node was not placed")?;

        if let Some(node) = scene.get_mut(root) {
            node.transform.multiply_scalar(descriptor.scale);
            if let Some(position) = descriptor.position {
                node.transform.position = position.into();
            }
            if let Some(rotation) = descriptor.rotation {
                node.transform.set_rotation(rotation);
            }
        }

        let animations = match descriptor.format {
            ModelFormat::PlainObject => Vec::new(),
            ModelFormat::SceneGraph => clips
                .into_iter()
                .map(|clip| {
                    let channels = clip
                        .channels
                        .into_iter()
                        .filter_map(|channel| match ids.get(&channel.target) {
                            Some(&target) => Some(Channel {
                                target,
                                timestamps: channel.timestamps,
                                keyframes: channel.keyframes,
                                interpolation: channel.interpolation,
                            }),
                            None => {
                                log::warn!(
                                    "{}: clip `{}` targets node {} outside the scene",
                                    descriptor.path,
                                    clip.name,
                                    channel.target
                                );
                                None
                            }
                        })
                        .collect();
                    Arc::new(AnimationClip::new(clip.name, channels))
                })
                .collect(),
        };

        Ok(Model {
            path: descriptor.path.clone(),
            node: root,
            animations,
        })
    }

    fn insert(
        &self,
        scene: &mut SceneGraph,
        nodes: &mut [Option<AssetNode>],
        index: usize,
        parent: Option<NodeId>,
        format: ModelFormat,
        ids: &mut HashMap<usize, NodeId>,
    ) -> anyhow::Result<NodeId> {
        let asset_node = nodes
            .get_mut(index)
            .and_then(Option::take)
            .with_context(|| format!("node {index} is missing or referenced twice"))?;

        let mut node = match asset_node.mesh {
            Some(mesh) => {
                let material = match format {
                    ModelFormat::PlainObject => Material::Standard {
                        color: 0xffffff,
                        roughness: 1.0,
                        map: self.object_map.clone(),
                    },
                    ModelFormat::SceneGraph => Material::Embedded {
                        index: mesh.primitives.first().and_then(|p| p.material),
                    },
                };
                Node::new(NodeKind::Mesh {
                    mesh: Arc::new(mesh),
                    material,
                })
            }
            None => Node::group(),
        }
        .with_name(asset_node.name)
        .with_transform(asset_node.transform);
        if format == ModelFormat::PlainObject && node.is_mesh() {
            node.cast_shadow = self.shadows;
            node.receive_shadow = self.shadows;
        }

        let id = match parent {
            Some(parent) => scene.add_child(parent, node)?,
            None => scene.add(node),
        };
        ids.insert(index, id);
        for child in asset_node.children {
            self.insert(scene, nodes, child, Some(id), format, ids)?;
        }
        Ok(id)
    }
}
