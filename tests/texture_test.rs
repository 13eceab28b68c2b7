use flow_scene::{
    config::{TextureDescriptor, TextureManifest},
    error::{ConfigError, FatalInitError},
    resources::texture::TextureBatch,
};
use futures::executor::block_on;

mod common;
use crate::common::test_utils::{MemorySource, png_bytes};

fn manifest(images: &[(&str, &str)]) -> TextureManifest {
    TextureManifest {
        path: "textures/".to_string(),
        images: images
            .iter()
            .map(|(name, image)| TextureDescriptor {
                name: name.to_string(),
                image: image.to_string(),
            })
            .collect(),
    }
}

#[test]
fn every_image_is_decoded_once() {
    let source = MemorySource::new()
        .with("textures/uv.png", png_bytes(4, 2))
        .with("textures/water.png", png_bytes(1, 1));

    let textures = block_on(TextureBatch::load(
        &source,
        &manifest(&[("UV", "uv.png"), ("Water", "water.png")]),
    ))
    .unwrap();

    assert_eq!(textures.len(), 2);
    let uv = textures.get("UV").unwrap();
    assert_eq!((uv.width, uv.height), (4, 2));
    assert_eq!(uv.pixels.len(), 4 * 2 * 4);
    assert_eq!(source.requested("textures/uv.png"), 1);
    assert_eq!(source.requested("textures/water.png"), 1);
}

#[test]
fn one_failure_fails_the_batch() {
    let source = MemorySource::new()
        .with("textures/uv.png", png_bytes(4, 2))
        .with("textures/broken.png", b"not an image".to_vec());

    let err = block_on(TextureBatch::load(
        &source,
        &manifest(&[("UV", "uv.png"), ("Broken", "broken.png"), ("Gone", "gone.png")]),
    ))
    .unwrap_err();

    match err {
        FatalInitError::Textures { name, .. } => assert_eq!(name, "Broken"),
        other => panic!("unexpected error: {other}"),
    }
    // no retries
    assert_eq!(source.requests().len(), 3);
}

#[test]
fn duplicate_names_are_rejected_before_fetching() {
    let source = MemorySource::new();

    let err = block_on(TextureBatch::load(
        &source,
        &manifest(&[("UV", "a.png"), ("UV", "b.png")]),
    ))
    .unwrap_err();

    assert!(matches!(
        err,
        FatalInitError::Config(ConfigError::DuplicateTexture(name)) if name == "UV"
    ));
    assert!(source.requests().is_empty());
}

#[test]
fn an_empty_manifest_loads_nothing() {
    let textures = block_on(TextureBatch::load(&MemorySource::new(), &manifest(&[]))).unwrap();
    assert!(textures.is_empty());
}
