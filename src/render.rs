//! The rendering seam.
//!
//! The frame loop only knows about [`Renderer`]: it hands over the scene graph
//! and the camera once per frame. [`crate::context::SurfaceRenderer`] is the
//! wgpu implementation; tests plug in recording renderers.

use crate::{camera::Camera, data_structures::scene_graph::SceneGraph};

pub trait Renderer {
    /// Draws one frame. An error skips the frame but keeps the loop running.
    fn render(&mut self, scene: &SceneGraph, camera: &Camera) -> anyhow::Result<()>;

    fn resize(&mut self, _width: u32, _height: u32) {}
}

/// Converts a `0xRRGGBB` colour into linear wgpu components.
pub fn to_wgpu_color(color: u32) -> wgpu::Color {
    let channel = |shift: u32| {
        let srgb = ((color >> shift) & 0xff) as f64 / 255.0;
        if srgb <= 0.04045 {
            srgb / 12.92
        } else {
            ((srgb + 0.055) / 1.055).powf(2.4)
        }
    };
    wgpu::Color {
        r: channel(16),
        g: channel(8),
        b: channel(0),
        a: 1.0,
    }
}
