//! Procedural shapes.
//!
//! A [`Shape`] names one of the supported geometry kinds together with its
//! typed parameters. [`ShapeFactory::build`] validates it into a [`Geometry`]
//! and [`ShapeFactory::place`] inserts a shaded instance into the scene.
//! Tessellation is left to the renderer.

use std::{str::FromStr, sync::Arc};

use serde::Deserialize;

use crate::{
    config::SceneConfig,
    data_structures::{
        scene_graph::{Material, Node, NodeId, NodeKind, SceneGraph},
        transform::Transform,
    },
    error::ShapeError,
    resources::font::Font,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    Plane,
    Sphere,
    Tetrahedron,
    Box,
    Octahedron,
    Dodecahedron,
    Icosahedron,
    Text,
}

impl FromStr for ShapeKind {
    type Err = ShapeError;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "plane" => Ok(ShapeKind::Plane),
            "sphere" => Ok(ShapeKind::Sphere),
            "tetrahedron" => Ok(ShapeKind::Tetrahedron),
            "box" => Ok(ShapeKind::Box),
            "octahedron" => Ok(ShapeKind::Octahedron),
            "dodecahedron" => Ok(ShapeKind::Dodecahedron),
            "icosahedron" => Ok(ShapeKind::Icosahedron),
            "text" => Ok(ShapeKind::Text),
            other => Err(ShapeError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaneParams {
    pub width: f32,
    pub height: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl PlaneParams {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            width_segments: 1,
            height_segments: 1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl SphereParams {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            width_segments: 32,
            height_segments: 32,
        }
    }
}

/// Parameters shared by the four platonic solids other than the box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolyhedronParams {
    pub radius: f32,
    /// Number of subdivisions; 0 yields the plain solid.
    pub detail: u32,
}

impl Default for PolyhedronParams {
    fn default() -> Self {
        Self {
            radius: 5.0,
            detail: 0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxParams {
    /// Edge length of the cube.
    pub radius: f32,
    pub width_segments: u32,
    pub height_segments: u32,
}

impl Default for BoxParams {
    fn default() -> Self {
        Self {
            radius: 7.0,
            width_segments: 7,
            height_segments: 7,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextParams {
    pub text: String,
    pub font: Arc<Font>,
    pub size: f32,
    /// Extrusion depth.
    pub height: f32,
    pub curve_segments: u32,
}

impl TextParams {
    pub fn new(text: impl Into<String>, font: Arc<Font>) -> Self {
        Self {
            text: text.into(),
            font,
            size: 40.0,
            height: 5.0,
            curve_segments: 12,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Plane(PlaneParams),
    Sphere(SphereParams),
    Tetrahedron(PolyhedronParams),
    Box(BoxParams),
    Octahedron(PolyhedronParams),
    Dodecahedron(PolyhedronParams),
    Icosahedron(PolyhedronParams),
    Text(TextParams),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Plane(_) => ShapeKind::Plane,
            Shape::Sphere(_) => ShapeKind::Sphere,
            Shape::Tetrahedron(_) => ShapeKind::Tetrahedron,
            Shape::Box(_) => ShapeKind::Box,
            Shape::Octahedron(_) => ShapeKind::Octahedron,
            Shape::Dodecahedron(_) => ShapeKind::Dodecahedron,
            Shape::Icosahedron(_) => ShapeKind::Icosahedron,
            Shape::Text(_) => ShapeKind::Text,
        }
    }

    /// The shape with all parameters defaulted.
    ///
    /// Planes, spheres and text have required parameters and are rejected.
    pub fn with_defaults(kind: ShapeKind) -> Result<Self, ShapeError> {
        match kind {
            ShapeKind::Tetrahedron => Ok(Shape::Tetrahedron(PolyhedronParams::default())),
            ShapeKind::Box => Ok(Shape::Box(BoxParams::default())),
            ShapeKind::Octahedron => Ok(Shape::Octahedron(PolyhedronParams::default())),
            ShapeKind::Dodecahedron => Ok(Shape::Dodecahedron(PolyhedronParams::default())),
            ShapeKind::Icosahedron => Ok(Shape::Icosahedron(PolyhedronParams::default())),
            ShapeKind::Plane | ShapeKind::Sphere | ShapeKind::Text => {
                Err(ShapeError::MissingParameters(kind))
            }
        }
    }
}

/// A validated shape, ready to be placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    shape: Shape,
    bounding_radius: f32,
}

impl Geometry {
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }

    /// Radius of a sphere around the origin that encloses the shape.
    pub fn bounding_radius(&self) -> f32 {
        self.bounding_radius
    }
}

/// Where and how a geometry instance is placed.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub position: Option<[f32; 3]>,
    /// Per-axis rotation; `None` axes keep the default of zero.
    pub rotation: Option<[Option<f32>; 3]>,
    pub color: u32,
    pub name: Option<String>,
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: None,
            rotation: None,
            color: 0xeeeeee,
            name: None,
        }
    }
}

pub struct ShapeFactory {
    receive_shadows: bool,
}

impl ShapeFactory {
    pub fn new(config: &SceneConfig) -> Self {
        Self::with_shadows(config.shadows.enabled)
    }

    pub fn with_shadows(receive_shadows: bool) -> Self {
        Self { receive_shadows }
    }

    pub fn build(&self, shape: Shape) -> Result<Geometry, ShapeError> {
        let bounding_radius = match &shape {
            Shape::Plane(p) => {
                positive("width", p.width)?;
                positive("height", p.height)?;
                segments("width_segments", p.width_segments)?;
                segments("height_segments", p.height_segments)?;
                p.width.hypot(p.height) / 2.0
            }
            Shape::Sphere(p) => {
                positive("radius", p.radius)?;
                segments("width_segments", p.width_segments)?;
                segments("height_segments", p.height_segments)?;
                p.radius
            }
            Shape::Tetrahedron(p)
            | Shape::Octahedron(p)
            | Shape::Dodecahedron(p)
            | Shape::Icosahedron(p) => positive("radius", p.radius)?,
            Shape::Box(p) => {
                positive("radius", p.radius)?;
                segments("width_segments", p.width_segments)?;
                segments("height_segments", p.height_segments)?;
                // half the space diagonal of a cube
                p.radius * 3f32.sqrt() / 2.0
            }
            Shape::Text(p) => {
                positive("size", p.size)?;
                positive("height", p.height)?;
                segments("curve_segments", p.curve_segments)?;
                if p.text.trim().is_empty() {
                    return Err(ShapeError::EmptyText);
                }
                let missing = p.font.missing_glyphs(&p.text);
                if !missing.is_empty() {
                    return Err(ShapeError::MissingGlyphs(missing));
                }
                let width = p.size * p.text.chars().count() as f32;
                width.hypot(p.size) / 2.0
            }
        };
        Ok(Geometry {
            shape,
            bounding_radius,
        })
    }

    /// Creates one new node for `geometry`; every call places a fresh instance.
    pub fn place(&self, scene: &mut SceneGraph, geometry: Geometry, placement: Placement) -> NodeId {
        let material = Material::Standard {
            color: placement.color,
            roughness: 0.0,
            map: None,
        };
        let mut transform = Transform::new();
        if let Some(position) = placement.position {
            transform.position = position.into();
        }
        if let Some(rotation) = placement.rotation {
            transform.set_rotation_axes(rotation);
        }
        let mut node = Node::new(NodeKind::Shape { geometry, material })
            .with_name(placement.name)
            .with_transform(transform);
        node.receive_shadow = self.receive_shadows;
        scene.add(node)
    }
}

fn positive(name: &'static str, value: f32) -> Result<f32, ShapeError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidDimension { name, value })
    }
}

fn segments(name: &'static str, value: u32) -> Result<u32, ShapeError> {
    if value >= 1 {
        Ok(value)
    } else {
        Err(ShapeError::InvalidSegments { name })
    }
}
