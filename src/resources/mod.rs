use futures::future::LocalBoxFuture;

use crate::{
    coordinator::Progress,
    data_structures::{mesh::MeshData, transform::Transform},
    resources::animation::ClipData,
};

/**
 * This module contains all logic for loading meshes, textures, fonts and clips
 * from external files.
 */
pub mod animation;
pub mod font;
pub mod gltf_loader;
pub mod model;
pub mod obj_loader;
pub mod texture;

/// Where asset bytes come from.
pub trait AssetSource {
    /// Fetches the file at `path` (relative to the asset root).
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<Vec<u8>>>;
}

/// Parses one model file into a format-neutral node list.
pub trait LoaderStrategy {
    fn parse<'a>(
        &'a self,
        path: &'a str,
        source: &'a dyn AssetSource,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<LoadedAsset>>;
}

/// A parsed node. `children` index into [`LoadedAsset::nodes`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AssetNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub mesh: Option<MeshData>,
    pub children: Vec<usize>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadedAsset {
    pub nodes: Vec<AssetNode>,
    /// Top-level nodes of the asset.
    pub roots: Vec<usize>,
    pub clips: Vec<ClipData>,
}

/// Loads assets from the `assets` directory next to the binary, or from
/// `<origin>/assets` when running in the browser.
pub struct FileSource {
    root: String,
}

impl FileSource {
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    #[cfg(target_arch = "wasm32")]
    fn format_url(&self, file_name: &str) -> anyhow::Result<reqwest::Url> {
        use anyhow::Context;

        let window = web_sys::window().context("no browser window")?;
        let origin = window
            .location()
            .origin()
            .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
        let base = reqwest::Url::parse(&format!("{origin}/{}/", self.root.trim_matches('/')))?;
        Ok(base.join(file_name)?)
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::new("assets")
    }
}

impl AssetSource for FileSource {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<Vec<u8>>> {
        Box::pin(async move {
            #[cfg(target_arch = "wasm32")]
            let data = {
                let url = self.format_url(path)?;
                let response = reqwest::get(url).await?.error_for_status()?;
                let total = response.content_length();
                let bytes = response.bytes().await?.to_vec();
                progress.report(bytes.len() as u64, total);
                bytes
            };
            #[cfg(not(target_arch = "wasm32"))]
            let data = {
                use anyhow::Context;

                let path = std::path::Path::new("./").join(&self.root).join(path);
                let bytes = tokio::fs::read(&path)
                    .await
                    .with_context(|| format!("could not read {}", path.display()))?;
                let len = bytes.len() as u64;
                progress.report(len, Some(len));
                bytes
            };
            Ok(data)
        })
    }
}

/// Joins a directory and a file name with exactly one `/` between them.
pub fn join_path(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else if dir.ends_with('/') {
        format!("{dir}{file}")
    } else {
        format!("{dir}/{file}")
    }
}

/// Resolves `uri` against the directory `base` lives in.
pub fn resolve_relative(base: &str, uri: &str) -> String {
    match base.rfind('/') {
        Some(slash) => format!("{}{}", &base[..=slash], uri),
        None => uri.to_string(),
    }
}
