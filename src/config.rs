//! Immutable scene configuration.
//!
//! A [`SceneConfig`] is built once at startup (either [`Default`] or
//! [`SceneConfig::from_json`]) and handed by reference to every component that
//! needs it. Nothing mutates it afterwards.

use std::{collections::HashSet, f32::consts::PI};

use serde::Deserialize;

use crate::{error::ConfigError, spin::Sign};

/// A named image declared in the texture manifest.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct TextureDescriptor {
    pub name: String,
    pub image: String,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TextureManifest {
    /// Directory (relative to the asset root) the images live in.
    pub path: String,
    pub images: Vec<TextureDescriptor>,
}

impl Default for TextureManifest {
    fn default() -> Self {
        Self {
            path: "textures/".to_string(),
            images: vec![
                TextureDescriptor {
                    name: "UV".to_string(),
                    image: "UV_Grid_Sm.jpg".to_string(),
                },
                TextureDescriptor {
                    name: "Water".to_string(),
                    image: "waternormals.jpg".to_string(),
                },
            ],
        }
    }
}

/// Which loader strategy parses a model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModelFormat {
    /// A bundled scene with node hierarchy, materials and clips (glTF).
    #[serde(alias = "gltf")]
    SceneGraph,
    /// Bare geometry that gets a uniform textured material (Wavefront OBJ).
    #[serde(alias = "object", alias = "obj")]
    PlainObject,
}

/// A y-axis spin applied to a model once it has loaded.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ModelSpin {
    pub coefficient: f32,
    pub sign: Sign,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    pub path: String,
    pub format: ModelFormat,
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    #[serde(default)]
    pub spin: Option<ModelSpin>,
}

fn unit_scale() -> f32 {
    1.0
}

impl ModelDescriptor {
    pub fn new(path: impl Into<String>, format: ModelFormat, scale: f32) -> Self {
        Self {
            path: path.into(),
            format,
            scale,
            position: None,
            rotation: None,
            spin: None,
        }
    }
}

/// One of the spinning solids placed at scene setup.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct PlatonicDescriptor {
    pub kind: crate::shapes::ShapeKind,
    pub position: [f32; 3],
    pub color: u32,
    pub sign: Sign,
    #[serde(default)]
    pub name: Option<String>,
}

/// A text label placed once the font has loaded.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LabelDescriptor {
    pub text: String,
    pub size: f32,
    pub height: f32,
    pub curve_segments: u32,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub color: u32,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    pub enabled: bool,
    pub map_size: u32,
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            map_size: 2048,
            bias: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub position: [f32; 3],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov: 55.0,
            near: 1.0,
            far: 20000.0,
            position: [30.0, 30.0, 100.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    pub auto_rotate: bool,
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_polar_angle: f32,
    /// `None` leaves the polar angle unbounded (up to straight down).
    pub max_polar_angle: Option<f32>,
    pub target: [f32; 3],
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            auto_rotate: false,
            auto_rotate_speed: -0.5,
            rotate_speed: 0.5,
            enable_damping: true,
            damping_factor: 0.5,
            min_polar_angle: PI / 5.0,
            max_polar_angle: None,
            target: [0.0, 10.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    pub duration_millis: u64,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            duration_millis: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaterConfig {
    pub enabled: bool,
    pub size: f32,
    pub texture_size: u32,
    pub water_color: u32,
    pub sun_color: u32,
    pub distortion_scale: f32,
    pub alpha: f32,
    /// Name of the normal map in the texture manifest.
    pub normals: String,
}

impl Default for WaterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 10000.0,
            texture_size: 512,
            water_color: 0x9cd3db,
            sun_color: 0xffffff,
            distortion_scale: 3.7,
            alpha: 1.0,
            normals: "Water".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    pub enabled: bool,
    pub scale: f32,
    pub turbidity: f32,
    pub rayleigh: f32,
    pub mie_coefficient: f32,
    pub mie_directional_g: f32,
    pub inclination: f32,
    pub azimuth: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 10000.0,
            turbidity: 10.0,
            rayleigh: 1.2,
            mie_coefficient: 0.005,
            mie_directional_g: 0.5,
            inclination: 0.4875,
            azimuth: 0.205,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AmbientLightConfig {
    pub enabled: bool,
    pub color: u32,
    /// Where the light is moved once every model has loaded.
    pub loaded_position: [f32; 3],
}

impl Default for AmbientLightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            color: 0x141414,
            loaded_position: [15.0, 2.0, 70.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Enables the debug affordances once the scene is ready.
    pub debug: bool,
    pub show_stats: bool,
    pub background: u32,
    pub shadows: ShadowConfig,
    pub textures: TextureManifest,
    /// Texture mapped onto every plain-object model.
    pub plain_object_texture: String,
    pub models: Vec<ModelDescriptor>,
    /// Index into `models` whose first clip is played once loaded.
    pub animated_model: Option<usize>,
    pub font: Option<String>,
    pub labels: Vec<LabelDescriptor>,
    pub platonics: Vec<PlatonicDescriptor>,
    pub camera: CameraConfig,
    pub controls: ControlsConfig,
    pub tween: TweenConfig,
    pub water: WaterConfig,
    pub sky: SkyConfig,
    pub ambient_light: AmbientLightConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        use crate::shapes::ShapeKind;

        let mailbox = ModelDescriptor {
            position: Some([-4.0, 2.0, 28.0]),
            rotation: Some([0.0, -PI, 0.0]),
            ..ModelDescriptor::new("models/mailbox/scene.gltf", ModelFormat::SceneGraph, 0.04)
        };
        let teapot = ModelDescriptor {
            spin: Some(ModelSpin {
                coefficient: 0.2,
                sign: Sign::Negative,
            }),
            ..ModelDescriptor::new("models/teapot.obj", ModelFormat::PlainObject, 20.0)
        };
        let platonic = |kind, position, color, sign, name: Option<&str>| PlatonicDescriptor {
            kind,
            position,
            color,
            sign,
            name: name.map(str::to_string),
        };
        let label = |text: &str, size, position, rotation, name: Option<&str>| LabelDescriptor {
            text: text.to_string(),
            size,
            height: 0.3,
            curve_segments: 12,
            position,
            rotation,
            color: 0x000000,
            name: name.map(str::to_string),
        };

        Self {
            debug: false,
            show_stats: false,
            background: 0xffffff,
            shadows: ShadowConfig::default(),
            textures: TextureManifest::default(),
            plain_object_texture: "UV".to_string(),
            models: vec![
                ModelDescriptor::new("models/duck.gltf", ModelFormat::SceneGraph, 20.0),
                teapot,
                mailbox,
            ],
            animated_model: Some(2),
            font: Some("fonts/helvetiker_regular.typeface.json".to_string()),
            labels: vec![
                label("Contact Me", 2.0, [-21.0, 16.0, 30.0], [0.0, 0.1, 0.0], Some("Contact Me")),
                label(" My Resume", 2.0, [24.3, 17.0, 24.0], [0.0, -0.1, 0.0], None),
                label("Visit Portfolio", 1.2, [3.0, 1.2, 63.0], [0.0, 0.9, 0.0], None),
            ],
            platonics: vec![
                platonic(ShapeKind::Tetrahedron, [-60.0, 20.0, -20.0], 0xA0150D, Sign::Positive, Some("tetrahedron")),
                platonic(ShapeKind::Box, [-30.0, 20.0, -30.0], 0x04AC03, Sign::Positive, None),
                platonic(ShapeKind::Octahedron, [0.0, 20.0, -40.0], 0xF9E82E, Sign::Positive, None),
                platonic(ShapeKind::Dodecahedron, [30.0, 20.0, -30.0], 0x957006, Sign::Negative, None),
                platonic(ShapeKind::Icosahedron, [60.0, 20.0, -20.0], 0x1B63BA, Sign::Negative, None),
            ],
            camera: CameraConfig::default(),
            controls: ControlsConfig::default(),
            tween: TweenConfig::default(),
            water: WaterConfig::default(),
            sky: SkyConfig::default(),
            ambient_light: AmbientLightConfig::default(),
        }
    }
}

impl SceneConfig {
    /// Parses a configuration; missing fields fall back to [`SceneConfig::default`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.models.is_empty() {
            return Err(ConfigError::NoModels);
        }
        let mut names = HashSet::new();
        for texture in &self.textures.images {
            if !names.insert(texture.name.as_str()) {
                return Err(ConfigError::DuplicateTexture(texture.name.clone()));
            }
        }
        for model in &self.models {
            if !(model.scale > 0.0) {
                return Err(ConfigError::InvalidScale {
                    path: model.path.clone(),
                    scale: model.scale,
                });
            }
        }
        let needs_map = self
            .models
            .iter()
            .any(|model| model.format == ModelFormat::PlainObject);
        if needs_map && !names.contains(self.plain_object_texture.as_str()) {
            return Err(ConfigError::MissingTexture(self.plain_object_texture.clone()));
        }
        if let Some(index) = self.animated_model {
            if index >= self.models.len() {
                return Err(ConfigError::AnimatedModelOutOfRange {
                    index,
                    len: self.models.len(),
                });
            }
        }
        Ok(())
    }
}
