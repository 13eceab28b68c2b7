//! Plain-object format strategy (Wavefront OBJ).
//!
//! Only geometry is read. Plain objects are shaded with a uniform material by
//! the model loader, so material libraries referenced by the file are skipped.

use std::io::{BufReader, Cursor};

use anyhow::{Context, bail};
use futures::{FutureExt, future::LocalBoxFuture};

use crate::{
    coordinator::Progress,
    data_structures::{
        mesh::{MeshData, Primitive},
        transform::Transform,
    },
    resources::{AssetNode, AssetSource, LoadedAsset, LoaderStrategy},
};

#[derive(Clone, Copy, Debug, Default)]
pub struct ObjStrategy;

impl LoaderStrategy for ObjStrategy {
    fn parse<'a>(
        &'a self,
        path: &'a str,
        source: &'a dyn AssetSource,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<LoadedAsset>> {
        load_obj(path, source, progress).boxed_local()
    }
}

async fn load_obj(
    file_name: &str,
    source: &dyn AssetSource,
    progress: &Progress,
) -> anyhow::Result<LoadedAsset> {
    let obj_bytes = source.fetch(file_name, progress).await?;
    let mut obj_reader = BufReader::new(Cursor::new(obj_bytes));

    let (models, _) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| async move {
            log::debug!("{file_name}: skipping material library {p}");
            tobj::load_mtl_buf(&mut Cursor::new(Vec::<u8>::new()))
        },
    )
    .await
    .with_context(|| format!("`{file_name}` is not a valid OBJ file"))?;

    if models.is_empty() {
        bail!("`{file_name}` contains no geometry");
    }

    let nodes: Vec<AssetNode> = models
        .into_iter()
        .map(|m| {
            let mesh = &m.mesh;
            let primitive = Primitive {
                positions: mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| [p[0], p[1], p[2]])
                    .collect(),
                normals: mesh
                    .normals
                    .chunks_exact(3)
                    .map(|n| [n[0], n[1], n[2]])
                    .collect(),
                // OBJ has v pointing up, textures are sampled top-down
                tex_coords: mesh
                    .texcoords
                    .chunks_exact(2)
                    .map(|t| [t[0], 1.0 - t[1]])
                    .collect(),
                indices: mesh.indices.clone(),
                material: mesh.material_id,
            };
            AssetNode {
                name: Some(m.name.clone()),
                transform: Transform::new(),
                mesh: Some(MeshData {
                    name: m.name,
                    primitives: vec![primitive],
                }),
                children: Vec::new(),
            }
        })
        .collect();

    Ok(LoadedAsset {
        roots: (0..nodes.len()).collect(),
        nodes,
        clips: Vec::new(),
    })
}
