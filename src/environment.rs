//! Environment props: water, sky dome and lights.
//!
//! These are plain descriptions the renderer interprets. The placement helpers
//! put them into the scene graph with the values from [`SceneConfig`].

use std::f32::consts::PI;

use cgmath::Vector3;

use crate::{
    config::{AmbientLightConfig, SkyConfig, WaterConfig},
    data_structures::{
        scene_graph::{Node, NodeId, NodeKind, SceneGraph},
        texture::TextureHandle,
        transform::Transform,
    },
    error::ShapeError,
    shapes::{PlaneParams, Shape, ShapeFactory},
};

#[derive(Clone, Debug, PartialEq)]
pub struct WaterSurface {
    pub normals: Option<TextureHandle>,
    pub texture_size: u32,
    pub water_color: u32,
    pub sun_color: u32,
    pub distortion_scale: f32,
    pub alpha: f32,
    pub sun_direction: Vector3<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SkyDome {
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub sun_position: Vector3<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    Ambient,
    Directional { intensity: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: u32,
}

/// Unit vector pointing at the sun.
///
/// `inclination` and `azimuth` are in `[0, 1]`; 0.5 inclination puts the sun
/// on the horizon.
pub fn sun_direction(inclination: f32, azimuth: f32) -> Vector3<f32> {
    let theta = PI * (inclination - 0.5);
    let phi = 2.0 * PI * (azimuth - 0.5);
    Vector3::new(phi.cos(), phi.sin() * theta.sin(), phi.sin() * theta.cos())
}

pub fn place_sky(scene: &mut SceneGraph, config: &SkyConfig) -> NodeId {
    let dome = SkyDome {
        turbidity: config.turbidity,
        rayleigh: config.rayleigh,
        mie_coefficient: config.mie_coefficient,
        mie_directional_g: config.mie_directional_g,
        sun_position: sun_direction(config.inclination, config.azimuth),
    };
    let mut transform = Transform::new();
    transform.multiply_scalar(config.scale);
    scene.add(
        Node::new(NodeKind::Sky(dome))
            .with_name(Some("sky".to_string()))
            .with_transform(transform),
    )
}

/// Places the water plane flat on the xz plane.
pub fn place_water(
    scene: &mut SceneGraph,
    shapes: &ShapeFactory,
    config: &WaterConfig,
    sky: &SkyConfig,
    normals: Option<TextureHandle>,
) -> Result<NodeId, ShapeError> {
    let geometry = shapes.build(Shape::Plane(PlaneParams::new(config.size, config.size)))?;
    let surface = WaterSurface {
        normals,
        texture_size: config.texture_size,
        water_color: config.water_color,
        sun_color: config.sun_color,
        distortion_scale: config.distortion_scale,
        alpha: config.alpha,
        sun_direction: sun_direction(sky.inclination, sky.azimuth),
    };
    let mut transform = Transform::new();
    transform.set_rotation_axes([Some(-PI / 2.0), None, None]);
    Ok(scene.add(
        Node::new(NodeKind::Water { geometry, surface })
            .with_name(Some("water".to_string()))
            .with_transform(transform),
    ))
}

pub fn place_ambient_light(scene: &mut SceneGraph, config: &AmbientLightConfig) -> NodeId {
    scene.add(
        Node::new(NodeKind::Light(Light {
            kind: LightKind::Ambient,
            color: config.color,
        }))
        .with_name(Some("ambient light".to_string())),
    )
}
