//! Scene-graph format strategy (glTF 2.0, `.gltf` and `.glb`).

use anyhow::{Context, bail};
use base64::Engine;
use cgmath::Quaternion;
use futures::{FutureExt, future::LocalBoxFuture};

use crate::{
    coordinator::Progress,
    data_structures::{
        mesh::{MeshData, Primitive},
        transform::Transform,
    },
    resources::{
        AssetNode, AssetSource, LoadedAsset, LoaderStrategy, animation::read_clips,
        resolve_relative,
    },
};

#[derive(Clone, Copy, Debug, Default)]
pub struct GltfStrategy;

impl LoaderStrategy for GltfStrategy {
    fn parse<'a>(
        &'a self,
        path: &'a str,
        source: &'a dyn AssetSource,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<LoadedAsset>> {
        load_gltf(path, source, progress).boxed_local()
    }
}

async fn load_gltf(
    file_name: &str,
    source: &dyn AssetSource,
    progress: &Progress,
) -> anyhow::Result<LoadedAsset> {
    let bytes = source.fetch(file_name, progress).await?;
    let gltf = gltf::Gltf::from_slice(&bytes)
        .with_context(|| format!("`{file_name}` is not a valid glTF file"))?;

    // Load buffers
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        let data = match buffer.source() {
            gltf::buffer::Source::Bin => gltf
                .blob
                .as_deref()
                .map(<[u8]>::to_vec)
                .context("binary chunk referenced but missing")?,
            gltf::buffer::Source::Uri(uri) if uri.starts_with("data:") => decode_data_uri(uri)?,
            gltf::buffer::Source::Uri(uri) => {
                source.fetch(&resolve_relative(file_name, uri), progress).await?
            }
        };
        if data.len() < buffer.length() {
            bail!(
                "buffer {} is {} bytes, expected at least {}",
                buffer.index(),
                data.len(),
                buffer.length()
            );
        }
        buffer_data.push(data);
    }

    let mut nodes = Vec::new();
    for node in gltf.nodes() {
        let (translation, rotation, scale) = node.transform().decomposed();
        let mut transform = Transform::from_position(translation);
        let [x, y, z, w] = rotation;
        transform.set_quaternion(Quaternion::new(w, x, y, z));
        transform.scale = scale.into();
        let mesh = node
            .mesh()
            .map(|mesh| read_mesh(&mesh, &buffer_data))
            .transpose()?;
        nodes.push(AssetNode {
            name: node.name().map(str::to_string),
            transform,
            mesh,
            children: node.children().map(|child| child.index()).collect(),
        });
    }

    let roots: Vec<usize> = match gltf.default_scene().or_else(|| gltf.scenes().next()) {
        Some(scene) => scene.nodes().map(|node| node.index()).collect(),
        None => (0..nodes.len())
            .filter(|index| !nodes.iter().any(|node| node.children.contains(index)))
            .collect(),
    };
    let clips = read_clips(&gltf, &buffer_data)?;
    log::debug!(
        "{file_name}: {} nodes, {} roots, {} clips",
        nodes.len(),
        roots.len(),
        clips.len()
    );

    Ok(LoadedAsset {
        nodes,
        roots,
        clips,
    })
}

fn read_mesh(mesh: &gltf::Mesh, buffers: &[Vec<u8>]) -> anyhow::Result<MeshData> {
    let name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh {}", mesh.index()));
    let mut primitives = Vec::new();
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(Vec::as_slice));
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .with_context(|| format!("a primitive of `{name}` has no positions"))?
            .collect();
        let normals = reader
            .read_normals()
            .map(|normals| normals.collect())
            .unwrap_or_default();
        let tex_coords = reader
            .read_tex_coords(0)
            .map(|coords| coords.into_f32().collect())
            .unwrap_or_default();
        let indices = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        primitives.push(Primitive {
            positions,
            normals,
            tex_coords,
            indices,
            material: primitive.material().index(),
        });
    }
    Ok(MeshData { name, primitives })
}

fn decode_data_uri(uri: &str) -> anyhow::Result<Vec<u8>> {
    let (_, payload) = uri
        .split_once(";base64,")
        .context("only base64 data URIs are supported")?;
    base64::engine::general_purpose::STANDARD
        .decode(payload)
        .context("data URI is not valid base64")
}
