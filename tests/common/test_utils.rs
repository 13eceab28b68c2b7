#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    collections::HashMap,
    io::Cursor,
    rc::Rc,
};

use anyhow::anyhow;
use flow_scene::{
    camera::Camera,
    coordinator::Progress,
    data_structures::scene_graph::{NodeId, SceneGraph},
    frame::RefreshSignal,
    pipeline::LoadingIndicator,
    render::Renderer,
    resources::AssetSource,
};
use futures::future::LocalBoxFuture;
use serde_json::json;

/// Asset source backed by a map. Every request is recorded.
#[derive(Default)]
pub struct MemorySource {
    files: HashMap<String, Vec<u8>>,
    requests: RefCell<Vec<String>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.files.insert(path.to_string(), bytes.into());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub fn requested(&self, path: &str) -> usize {
        self.requests.borrow().iter().filter(|p| *p == path).count()
    }
}

impl AssetSource for MemorySource {
    fn fetch<'a>(
        &'a self,
        path: &'a str,
        progress: &'a Progress,
    ) -> LocalBoxFuture<'a, anyhow::Result<Vec<u8>>> {
        Box::pin(async move {
            self.requests.borrow_mut().push(path.to_string());
            let bytes = self
                .files
                .get(path)
                .cloned()
                .ok_or_else(|| anyhow!("{path} not found"))?;
            progress.report(bytes.len() as u64, Some(bytes.len() as u64));
            Ok(bytes)
        })
    }
}

/// Counts how often the loading indicator was hidden.
#[derive(Clone, Default)]
pub struct CountingIndicator(pub Rc<Cell<usize>>);

impl CountingIndicator {
    pub fn hidden(&self) -> usize {
        self.0.get()
    }
}

impl LoadingIndicator for CountingIndicator {
    fn hide(&self) {
        self.0.set(self.0.get() + 1);
    }
}

#[derive(Clone, Default)]
pub struct CountingSignal(pub Rc<Cell<usize>>);

impl CountingSignal {
    pub fn requests(&self) -> usize {
        self.0.get()
    }
}

impl RefreshSignal for CountingSignal {
    fn request_frame(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// Records the x rotation of `watched` as seen by each rendered frame.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub watched: Option<NodeId>,
    pub seen: Rc<RefCell<Vec<f32>>>,
    pub calls: Rc<Cell<usize>>,
    pub fail: bool,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, scene: &SceneGraph, _camera: &Camera) -> anyhow::Result<()> {
        self.calls.set(self.calls.get() + 1);
        if let Some(node) = self.watched.and_then(|id| scene.get(id)) {
            self.seen.borrow_mut().push(node.transform.rotation.x.0);
        }
        if self.fail {
            return Err(anyhow!("device lost"));
        }
        Ok(())
    }
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, image::ImageFormat::Png)
        .expect("png encoding");
    bytes.into_inner()
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// A single triangle node named "triangle" under a "root" node, with a
/// two second clip moving the triangle from x = 0 to x = 2.
///
/// Returns the glTF JSON and the binary buffer it references as `buffer_uri`.
pub fn triangle_gltf(buffer_uri: &str) -> (String, Vec<u8>) {
    let mut bin = f32_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    bin.extend(f32_bytes(&[0.0, 2.0]));
    bin.extend(f32_bytes(&[0.0, 0.0, 0.0, 2.0, 0.0, 0.0]));
    let gltf = json!({
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "nodes": [0] }],
        "nodes": [
            { "name": "root", "children": [1], "scale": [2.0, 2.0, 2.0] },
            { "name": "triangle", "mesh": 0 }
        ],
        "meshes": [{
            "name": "triangle",
            "primitives": [{ "attributes": { "POSITION": 0 } }]
        }],
        "animations": [{
            "name": "slide",
            "channels": [{ "sampler": 0, "target": { "node": 1, "path": "translation" } }],
            "samplers": [{ "input": 1, "output": 2, "interpolation": "LINEAR" }]
        }],
        "buffers": [{ "uri": buffer_uri, "byteLength": bin.len() }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 8 },
            { "buffer": 0, "byteOffset": 44, "byteLength": 24 }
        ],
        "accessors": [
            {
                "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]
            },
            {
                "bufferView": 1, "componentType": 5126, "count": 2, "type": "SCALAR",
                "min": [0.0], "max": [2.0]
            },
            { "bufferView": 2, "componentType": 5126, "count": 2, "type": "VEC3" }
        ]
    });
    (gltf.to_string(), bin)
}

/// The same triangle with its buffer embedded as a base64 data URI.
pub fn embedded_triangle_gltf() -> String {
    use base64::Engine;

    let (_, bin) = triangle_gltf("unused.bin");
    let uri = format!(
        "data:application/octet-stream;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(&bin)
    );
    triangle_gltf(&uri).0
}

pub const TRIANGLE_OBJ: &str = "\
o Triangle
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.0 1.0
vn 0.0 0.0 1.0
f 1/1/1 2/2/1 3/3/1
";

/// A typeface font that has glyphs for exactly `chars`.
pub fn font_json(chars: &str) -> Vec<u8> {
    let glyphs: serde_json::Map<String, serde_json::Value> = chars
        .chars()
        .map(|c| (c.to_string(), json!({ "ha": 500, "o": "m 0 0 l 10 0" })))
        .collect();
    json!({ "familyName": "Test Sans", "resolution": 1000, "glyphs": glyphs })
        .to_string()
        .into_bytes()
}
