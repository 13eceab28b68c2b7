use std::collections::{HashMap, HashSet};

use futures::future::join_all;

use crate::{
    config::TextureManifest,
    coordinator::Progress,
    data_structures::texture::{Texture, TextureHandle},
    error::{ConfigError, FatalInitError},
    resources::{AssetSource, join_path},
};

/// Decoded textures by manifest name.
#[derive(Clone, Debug, Default)]
pub struct TextureSet {
    textures: HashMap<String, TextureHandle>,
}

impl TextureSet {
    pub fn get(&self, name: &str) -> Option<&TextureHandle> {
        self.textures.get(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.textures.keys().map(String::as_str)
    }
}

pub struct TextureBatch;

impl TextureBatch {
    /// Fetches and decodes every image of the manifest concurrently.
    ///
    /// All or nothing: the set is only returned when every image decoded. Each
    /// image is requested once and never retried.
    pub async fn load(
        source: &dyn AssetSource,
        manifest: &TextureManifest,
    ) -> Result<TextureSet, FatalInitError> {
        let mut names = HashSet::new();
        for descriptor in &manifest.images {
            if !names.insert(descriptor.name.as_str()) {
                return Err(ConfigError::DuplicateTexture(descriptor.name.clone()).into());
            }
        }

        let loads = manifest.images.iter().map(|descriptor| async move {
            let path = join_path(&manifest.path, &descriptor.image);
            let progress = Progress::detached();
            let result = match source.fetch(&path, &progress).await {
                Ok(bytes) => Texture::from_bytes(&bytes, &descriptor.name),
                Err(err) => Err(err),
            };
            (descriptor.name.clone(), result)
        });

        let mut textures = HashMap::new();
        let mut first_failure = None;
        for (name, result) in join_all(loads).await {
            match result {
                Ok(texture) => {
                    textures.insert(name, texture.into_handle());
                }
                Err(err) => {
                    log::error!("texture `{name}` failed to load: {err:#}");
                    first_failure.get_or_insert((name, err));
                }
            }
        }
        if let Some((name, source)) = first_failure {
            return Err(FatalInitError::Textures { name, source });
        }

        log::info!("loaded {} textures", textures.len());
        Ok(TextureSet { textures })
    }
}
