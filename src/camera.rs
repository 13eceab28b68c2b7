use std::f32::consts::PI;

use cgmath::{Deg, InnerSpace, Matrix4, Point3, Vector2, Vector3, perspective};

use crate::config::{CameraConfig, ControlsConfig};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub fovy: Deg<f32>,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
}

impl Camera {
    pub fn new(config: &CameraConfig, target: [f32; 3], aspect: f32) -> Self {
        Self {
            position: config.position.into(),
            target: target.into(),
            fovy: Deg(config.fov),
            near: config.near,
            far: config.far,
            aspect,
        }
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, Vector3::unit_y())
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

/// Orbits the camera around a target on a sphere.
///
/// `theta` is the azimuth around y, `phi` the polar angle from +y.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub auto_rotate: bool,
    /// Full turns per minute, like a turntable.
    pub auto_rotate_speed: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,

    theta: f32,
    phi: f32,
    radius: f32,
    rotate_delta: Vector2<f32>,
}

impl OrbitControls {
    /// Starts from wherever `camera` currently is.
    pub fn new(config: &ControlsConfig, camera: &Camera) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude().max(f32::EPSILON);
        Self {
            rotate_speed: config.rotate_speed,
            enable_damping: config.enable_damping,
            damping_factor: config.damping_factor,
            auto_rotate: config.auto_rotate,
            auto_rotate_speed: config.auto_rotate_speed,
            min_polar_angle: config.min_polar_angle,
            max_polar_angle: config.max_polar_angle.unwrap_or(PI),
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            radius,
            rotate_delta: Vector2::new(0.0, 0.0),
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.rotate_delta.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.rotate_delta.y -= angle;
    }

    /// Turns a pointer drag (in pixels) into a rotation.
    pub fn drag(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        let per_pixel = 2.0 * PI / viewport_height.max(1.0) * self.rotate_speed;
        self.rotate_left(dx * per_pixel);
        self.rotate_up(dy * per_pixel);
    }

    pub fn polar_angle(&self) -> f32 {
        self.phi
    }

    pub fn azimuth(&self) -> f32 {
        self.theta
    }

    pub fn update(&mut self, camera: &mut Camera, dt: f32) {
        if self.auto_rotate {
            self.rotate_left(2.0 * PI / 60.0 * self.auto_rotate_speed * dt);
        }

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let delta_apply = self.rotate_delta * (1.0 - retention);
            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vector2::new(0.0, 0.0);
        }

        const EPS: f32 = 0.0001;
        let max = self.max_polar_angle.min(PI - EPS);
        let min = self.min_polar_angle.max(EPS).min(max);
        self.phi = self.phi.clamp(min, max);

        let offset = Vector3::new(
            self.radius * self.phi.sin() * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * self.phi.sin() * self.theta.cos(),
        );
        camera.position = camera.target + offset;
    }
}
