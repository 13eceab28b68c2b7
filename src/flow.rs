//! Application event loop.
//!
//! [`run`] opens a window, builds the [`SurfaceRenderer`] and a
//! [`FrameScheduler`] around it and starts the [`ScenePipeline`] in the
//! background. The scene is rendered from the very first frame; models pop in
//! as they finish loading.
//!
//! Natively the pipeline runs on a `LocalPool` that is pumped before every
//! frame inside the tokio runtime (file IO goes through `tokio::fs`). In the
//! browser futures are handed to `wasm_bindgen_futures::spawn_local`.

use std::{rc::Rc, sync::Arc};

use instant::Instant;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalPosition,
    event::{ElementState, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    window::{Window, WindowId},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

use crate::{
    config::SceneConfig,
    context::SurfaceRenderer,
    error::FatalInitError,
    frame::{FrameScheduler, RefreshSignal, StopHandle},
    pipeline::{LoadingIndicator, ReadyReport, ScenePipeline},
    resources::FileSource,
    state::{SceneState, SharedState},
};

/// Requests redraws from the window the scene is drawn into.
pub struct WindowRefresh(pub Arc<Window>);

impl RefreshSignal for WindowRefresh {
    fn request_frame(&self) {
        self.0.request_redraw();
    }
}

#[cfg(not(target_arch = "wasm32"))]
struct LogIndicator;

#[cfg(not(target_arch = "wasm32"))]
impl LoadingIndicator for LogIndicator {
    fn hide(&self) {
        log::info!("loading finished");
    }
}

/// Hides the `#loading` overlay of the hosting page.
#[cfg(target_arch = "wasm32")]
struct DomIndicator {
    element_id: &'static str,
}

#[cfg(target_arch = "wasm32")]
impl LoadingIndicator for DomIndicator {
    fn hide(&self) {
        let element = web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.get_element_by_id(self.element_id));
        match element {
            Some(element) => {
                if element.set_attribute("style", "display: none").is_err() {
                    log::warn!("could not hide #{}", self.element_id);
                }
            }
            None => log::warn!("no #{} element on the page", self.element_id),
        }
    }
}

/// Spawns futures on the browser's microtask queue.
#[cfg(target_arch = "wasm32")]
struct WebSpawner;

#[cfg(target_arch = "wasm32")]
impl futures::task::LocalSpawn for WebSpawner {
    fn spawn_local_obj(
        &self,
        future: futures::future::LocalFutureObj<'static, ()>,
    ) -> Result<(), futures::task::SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

pub(crate) enum FlowEvent {
    #[allow(dead_code)]
    Initialized(SurfaceRenderer),
}

pub(crate) struct App {
    config: Rc<SceneConfig>,
    state: SharedState,
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    #[cfg(not(target_arch = "wasm32"))]
    pool: futures::executor::LocalPool,
    #[allow(dead_code)]
    proxy: EventLoopProxy<FlowEvent>,
    scheduler: Option<FrameScheduler<SurfaceRenderer>>,
    stop: Option<StopHandle>,
    pipeline_started: bool,
    dragging: bool,
    cursor: Option<PhysicalPosition<f64>>,
}

impl App {
    fn new(event_loop: &EventLoop<FlowEvent>, config: SceneConfig) -> anyhow::Result<Self> {
        Ok(Self {
            config: Rc::new(config),
            state: SceneState::shared(),
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime: tokio::runtime::Runtime::new()?,
            #[cfg(not(target_arch = "wasm32"))]
            pool: futures::executor::LocalPool::new(),
            proxy: event_loop.create_proxy(),
            scheduler: None,
            stop: None,
            pipeline_started: false,
            dragging: false,
            cursor: None,
        })
    }

    fn install(&mut self, renderer: SurfaceRenderer) {
        let window = Arc::clone(renderer.window());
        let size = window.inner_size();
        let aspect = size.width.max(1) as f32 / size.height.max(1) as f32;
        let mut scheduler = FrameScheduler::new(
            renderer,
            Rc::clone(&self.state),
            Box::new(WindowRefresh(window)),
            &self.config,
            aspect,
        );
        self.stop = Some(scheduler.start());
        self.scheduler = Some(scheduler);
        self.start_pipeline();
    }

    fn start_pipeline(&mut self) {
        if self.pipeline_started {
            return;
        }
        self.pipeline_started = true;

        #[cfg(not(target_arch = "wasm32"))]
        let indicator = Box::new(LogIndicator);
        #[cfg(target_arch = "wasm32")]
        let indicator = Box::new(DomIndicator {
            element_id: "loading",
        });
        let pipeline = ScenePipeline::new(
            Rc::clone(&self.config),
            Rc::new(FileSource::default()),
            Rc::clone(&self.state),
            indicator,
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            use futures::task::LocalSpawnExt;

            let spawner = self.pool.spawner();
            let task_spawner = spawner.clone();
            let spawned = spawner.spawn_local(async move {
                report(pipeline.start(&task_spawner).await);
            });
            if let Err(e) = spawned {
                log::error!("could not start the scene pipeline: {e}");
            }
        }

        #[cfg(target_arch = "wasm32")]
        wasm_bindgen_futures::spawn_local(async move {
            report(pipeline.start(&WebSpawner).await);
        });
    }

    /// Drives pending loads as far as they go without blocking.
    fn pump(&mut self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            let _guard = self.async_runtime.enter();
            self.pool.run_until_stalled();
        }
    }
}

fn report(result: Result<ReadyReport, FatalInitError>) {
    match result {
        Ok(report) => log::info!(
            "{} of {} models placed",
            report.models_loaded,
            report.models_loaded + report.models_failed
        ),
        Err(e) => log::error!("scene initialization failed: {e}"),
    }
}

impl ApplicationHandler<FlowEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.scheduler.is_some() {
            return;
        }
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes().with_title("flow-scene");

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            const CANVAS_ID: &str = "canvas";

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| document.get_element_by_id(CANVAS_ID));
            match canvas {
                Some(canvas) => {
                    window_attributes =
                        window_attributes.with_canvas(Some(canvas.unchecked_into()));
                }
                None => log::warn!("no #{CANVAS_ID} element, winit creates its own canvas"),
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create a window: {e}");
                event_loop.exit();
                return;
            }
        };
        let background = self.config.background;

        #[cfg(not(target_arch = "wasm32"))]
        match self
            .async_runtime
            .block_on(SurfaceRenderer::new(window, background))
        {
            Ok(renderer) => self.install(renderer),
            Err(e) => {
                log::error!("{e:#}");
                event_loop.exit();
            }
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match SurfaceRenderer::new(window, background).await {
                    Ok(renderer) => {
                        if proxy.send_event(FlowEvent::Initialized(renderer)).is_err() {
                            log::error!("event loop closed before the renderer was ready");
                        }
                    }
                    Err(e) => log::error!("{e:#}"),
                }
            });
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, event: FlowEvent) {
        match event {
            FlowEvent::Initialized(renderer) => {
                // This is the message from our wasm `spawn_local`
                let size = renderer.window().inner_size();
                self.install(renderer);
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.resize(size.width, size.height);
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Some(scheduler) = &mut self.scheduler else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                if let Some(stop) = &self.stop {
                    stop.stop();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => scheduler.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => self.dragging = state == ElementState::Pressed,
            WindowEvent::CursorMoved { position, .. } => {
                if let (true, Some(last)) = (self.dragging, self.cursor) {
                    let height = scheduler.renderer().config.height as f32;
                    scheduler.controls_mut().drag(
                        (position.x - last.x) as f32,
                        (position.y - last.y) as f32,
                        height,
                    );
                }
                self.cursor = Some(position);
            }
            WindowEvent::RedrawRequested => {
                self.pump();
                if let Some(scheduler) = &mut self.scheduler {
                    scheduler.frame(Instant::now());
                }
            }
            _ => {}
        }
    }
}

/// Opens the scene window and blocks until it is closed.
pub fn run(config: SceneConfig) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Could not initialize logger: {e}").into());
        }
    }

    let event_loop: EventLoop<FlowEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, config)?;
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    run(SceneConfig::default()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
