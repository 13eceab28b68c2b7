//! The per-frame driver.
//!
//! Every frame runs the same fixed sequence: render, tweens, camera controls,
//! spin, animation, reschedule. Spin and animation are no-ops until the
//! pipeline has registered something for them.

use std::{cell::Cell, rc::Rc, time::Duration};

use cgmath::{EuclideanSpace, Point3};
use instant::Instant;

use crate::{
    camera::{Camera, OrbitControls},
    config::SceneConfig,
    render::Renderer,
    state::SharedState,
    tween::{Easing, Tween},
};

/// "Call me back before the next frame."
pub trait RefreshSignal {
    fn request_frame(&self);
}

/// Stops the loop from rescheduling itself.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}

pub struct FrameScheduler<R: Renderer> {
    renderer: R,
    state: SharedState,
    signal: Box<dyn RefreshSignal>,
    camera: Camera,
    controls: OrbitControls,
    camera_tween: Option<Tween>,
    tween_duration: Duration,
    started_at: Instant,
    last_frame: Option<Instant>,
    stop: StopHandle,
}

impl<R: Renderer> FrameScheduler<R> {
    pub fn new(
        renderer: R,
        state: SharedState,
        signal: Box<dyn RefreshSignal>,
        config: &SceneConfig,
        aspect: f32,
    ) -> Self {
        let camera = Camera::new(&config.camera, config.controls.target, aspect);
        let controls = OrbitControls::new(&config.controls, &camera);
        Self {
            renderer,
            state,
            signal,
            camera,
            controls,
            camera_tween: None,
            tween_duration: Duration::from_millis(config.tween.duration_millis),
            started_at: Instant::now(),
            last_frame: None,
            stop: StopHandle::default(),
        }
    }

    /// Starts the clock and asks for the first frame.
    pub fn start(&mut self) -> StopHandle {
        self.started_at = Instant::now();
        self.last_frame = None;
        self.signal.request_frame();
        self.stop.clone()
    }

    pub fn frame(&mut self, now: Instant) {
        let dt = match self.last_frame {
            Some(last) if now > last => now - last,
            _ => Duration::ZERO,
        };
        self.last_frame = Some(now);
        let elapsed = if now > self.started_at {
            now - self.started_at
        } else {
            Duration::ZERO
        };

        {
            let state = self.state.borrow();
            if let Err(e) = self.renderer.render(&state.graph, &self.camera) {
                log::error!("frame skipped: {e:#}");
            }
        }

        if let Some(tween) = &mut self.camera_tween {
            self.camera.target = Point3::from_vec(tween.advance(dt));
            if tween.is_finished() {
                self.camera_tween = None;
            }
        }

        self.controls.update(&mut self.camera, dt.as_secs_f32());

        {
            let mut state = self.state.borrow_mut();
            let state = &mut *state;
            state.spin.tick(&mut state.graph, elapsed.as_secs_f32());
            state.mixer.advance_all(dt, &mut state.graph);
        }

        if !self.stop.is_stopped() {
            self.signal.request_frame();
        }
    }

    /// Moves the orbit target to `target` with the configured tween.
    pub fn focus(&mut self, target: [f32; 3]) {
        self.camera_tween = Some(Tween::new(
            self.camera.target.to_vec(),
            target.into(),
            self.tween_duration,
            Easing::QuadraticInOut,
        ));
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera.resize(width, height);
        self.renderer.resize(width, height);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn is_animating(&self) -> bool {
        self.camera_tween.is_some()
    }
}
