use std::sync::Arc;

use anyhow::{Context as _, anyhow};
use winit::window::Window;

use crate::{
    camera::Camera,
    data_structures::scene_graph::SceneGraph,
    render::{Renderer, to_wgpu_color},
};

/// GPU device, queue and window surface.
///
/// Draws nothing but the background colour: every frame is cleared and
/// presented, the scene graph is not rasterized. Meshes, shapes, water and
/// sky only become visible with a renderer that uploads and draws them.
pub struct SurfaceRenderer {
    pub(crate) window: Arc<Window>,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    background: wgpu::Color,
}

impl SurfaceRenderer {
    pub async fn new(window: Arc<Window>, background: u32) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window.clone())
            .context("could not create a surface for the window")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("no suitable GPU adapter: {e}"))?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await?;

        let config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .context("surface is not supported by the adapter")?;
        surface.configure(&device, &config);

        Ok(Self {
            window,
            surface,
            device,
            queue,
            config,
            background: to_wgpu_color(background),
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

/// What a frame does with the outcome of acquiring the next surface texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Acquire {
    Draw,
    ReconfigureAndDraw,
    ReconfigureAndSkip,
    Skip,
    Fail,
}

impl Acquire {
    pub fn of(status: &wgpu::CurrentSurfaceTexture) -> Self {
        match status {
            wgpu::CurrentSurfaceTexture::Success(_) => Acquire::Draw,
            wgpu::CurrentSurfaceTexture::Suboptimal(_) => Acquire::ReconfigureAndDraw,
            wgpu::CurrentSurfaceTexture::Outdated | wgpu::CurrentSurfaceTexture::Lost => {
                Acquire::ReconfigureAndSkip
            }
            wgpu::CurrentSurfaceTexture::Timeout | wgpu::CurrentSurfaceTexture::Occluded => {
                Acquire::Skip
            }
            wgpu::CurrentSurfaceTexture::Validation => Acquire::Fail,
        }
    }

    pub fn reconfigures(self) -> bool {
        matches!(self, Acquire::ReconfigureAndDraw | Acquire::ReconfigureAndSkip)
    }
}

impl Renderer for SurfaceRenderer {
    fn render(&mut self, scene: &SceneGraph, _camera: &Camera) -> anyhow::Result<()> {
        let status = self.surface.get_current_texture();
        let acquire = Acquire::of(&status);
        if acquire == Acquire::ReconfigureAndSkip {
            self.surface.configure(&self.device, &self.config);
        }
        let output = match status {
            wgpu::CurrentSurfaceTexture::Success(output)
            | wgpu::CurrentSurfaceTexture::Suboptimal(output) => output,
            _ if acquire == Acquire::Fail => {
                return Err(anyhow!("could not acquire the next frame: validation error"));
            }
            _ => {
                log::trace!("frame skipped: {acquire:?}");
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let _pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });
        }
        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        if acquire == Acquire::ReconfigureAndDraw {
            self.surface.configure(&self.device, &self.config);
        }
        log::trace!("presented {} nodes", scene.len());
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }
}
