//! The scene-readiness pipeline.
//!
//! [`ScenePipeline::start`] sets up the static scene, waits for the texture
//! batch, places the environment and then loads every configured model through
//! a [`LoadCoordinator`]. When all models have settled the post-load setup runs
//! once: spins and clips are bound, the ambient light moves, the scene is
//! flagged ready and the loading indicator is hidden.

use std::{rc::Rc, sync::Arc};

use futures::task::{LocalSpawn, LocalSpawnExt};

use crate::{
    config::{LabelDescriptor, ModelFormat, SceneConfig},
    coordinator::{LoadCoordinator, TaskOutcome},
    data_structures::scene_graph::NodeId,
    environment::{place_ambient_light, place_sky, place_water},
    error::{FatalInitError, ModelLoadError},
    resources::{
        AssetSource, LoaderStrategy,
        font::Font,
        model::{Model, ModelLoader},
        texture::TextureBatch,
    },
    shapes::{Placement, Shape, ShapeFactory, TextParams},
    spin::SpinProfile,
    state::SharedState,
};

/// Whatever tells the user that the scene is still loading.
pub trait LoadingIndicator {
    fn hide(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReadyReport {
    pub textures: usize,
    pub models_loaded: usize,
    pub models_failed: usize,
}

pub struct ScenePipeline {
    config: Rc<SceneConfig>,
    source: Rc<dyn AssetSource>,
    state: SharedState,
    indicator: Box<dyn LoadingIndicator>,
    strategies: Vec<(ModelFormat, Rc<dyn LoaderStrategy>)>,
}

impl ScenePipeline {
    pub fn new(
        config: Rc<SceneConfig>,
        source: Rc<dyn AssetSource>,
        state: SharedState,
        indicator: Box<dyn LoadingIndicator>,
    ) -> Self {
        Self {
            config,
            source,
            state,
            indicator,
            strategies: Vec::new(),
        }
    }

    /// Overrides the loader strategy used for `format`.
    pub fn with_strategy(mut self, format: ModelFormat, strategy: Rc<dyn LoaderStrategy>) -> Self {
        self.strategies.push((format, strategy));
        self
    }

    /// Runs the pipeline to completion.
    ///
    /// Text labels are loaded on a separate task spawned on `spawner` and do not
    /// hold back readiness. A texture failure aborts before any model load is
    /// requested and leaves the loading indicator visible.
    pub async fn start(self, spawner: &dyn LocalSpawn) -> Result<ReadyReport, FatalInitError> {
        let Self {
            config,
            source,
            state,
            indicator,
            strategies,
        } = self;
        config.validate()?;

        let shapes = ShapeFactory::new(&config);
        let ambient_light = setup_scene(&state, &config, &shapes);

        let textures = match TextureBatch::load(source.as_ref(), &config.textures).await {
            Ok(textures) => textures,
            Err(err) => {
                log::error!("scene initialization aborted: {err}");
                return Err(err);
            }
        };

        if config.water.enabled {
            let normals = textures.get(&config.water.normals).cloned();
            if normals.is_none() {
                log::warn!("water normal map `{}` is not loaded", config.water.normals);
            }
            let placed = place_water(
                &mut state.borrow_mut().graph,
                &shapes,
                &config.water,
                &config.sky,
                normals,
            );
            if let Err(err) = placed {
                log::warn!("water skipped: {err}");
            }
        }

        spawn_labels(spawner, &config, &source, &state);

        let mut loader = ModelLoader::new(
            Rc::clone(&state),
            Rc::clone(&source),
            textures.get(&config.plain_object_texture).cloned(),
            config.shadows.enabled,
        );
        for (format, strategy) in strategies {
            loader = loader.with_strategy(format, strategy);
        }

        let mut coordinator: LoadCoordinator<Model, ModelLoadError> = LoadCoordinator::new();
        for descriptor in &config.models {
            let loader = loader.clone();
            let descriptor = descriptor.clone();
            let state = Rc::clone(&state);
            coordinator.register(descriptor.path.clone(), move |progress| async move {
                let model = loader.load(&descriptor, &progress).await?;
                if let Some(spin) = descriptor.spin {
                    state.borrow_mut().spin.register(
                        model.node,
                        spin.sign,
                        SpinProfile::about_y(spin.coefficient),
                    );
                }
                Ok(model)
            });
        }

        coordinator.on_all_complete({
            let state = Rc::clone(&state);
            let config = Rc::clone(&config);
            move |outcomes| {
                finish_loading(&state, &config, ambient_light, &outcomes);
                indicator.hide();
            }
        });

        let summary = coordinator.run().await;
        let report = ReadyReport {
            textures: textures.len(),
            models_loaded: summary.map_or(0, |s| s.succeeded),
            models_failed: summary.map_or(0, |s| s.failed),
        };
        log::info!(
            "scene ready: {} textures, {} models loaded, {} failed",
            report.textures,
            report.models_loaded,
            report.models_failed
        );
        Ok(report)
    }
}

/// Places the spinning solids, the ambient light and the sky.
fn setup_scene(state: &SharedState, config: &SceneConfig, shapes: &ShapeFactory) -> Option<NodeId> {
    let mut state = state.borrow_mut();
    let state = &mut *state;
    for platonic in &config.platonics {
        let geometry = match Shape::with_defaults(platonic.kind).and_then(|shape| shapes.build(shape)) {
            Ok(geometry) => geometry,
            Err(err) => {
                log::warn!("{:?} skipped: {err}", platonic.kind);
                continue;
            }
        };
        let node = shapes.place(
            &mut state.graph,
            geometry,
            Placement {
                position: Some(platonic.position),
                color: platonic.color,
                name: platonic.name.clone(),
                ..Default::default()
            },
        );
        state.spin.register(node, platonic.sign, SpinProfile::platonic());
    }

    let ambient_light = config
        .ambient_light
        .enabled
        .then(|| place_ambient_light(&mut state.graph, &config.ambient_light));
    if config.sky.enabled {
        place_sky(&mut state.graph, &config.sky);
    }
    log::info!("scene set up with {} nodes", state.graph.len());
    ambient_light
}

/// One-time post-load setup. `outcomes` are in model registration order.
fn finish_loading(
    state: &SharedState,
    config: &SceneConfig,
    ambient_light: Option<NodeId>,
    outcomes: &[TaskOutcome<Model, ModelLoadError>],
) {
    let mut state = state.borrow_mut();
    let state = &mut *state;

    if let Some(index) = config.animated_model {
        match outcomes.get(index).map(|outcome| &outcome.result) {
            Some(Ok(model)) => match model.animations.first() {
                Some(clip) => {
                    state.mixer.bind(model.node, Arc::clone(clip));
                }
                None => log::warn!("{} has no animations to play", model.path),
            },
            _ => log::warn!("animated model {index} did not load, nothing to play"),
        }
    }

    if let Some(light) = ambient_light.and_then(|id| state.graph.get_mut(id)) {
        light.transform.position = config.ambient_light.loaded_position.into();
    }

    if config.debug {
        let animated = config
            .animated_model
            .and_then(|index| outcomes.get(index))
            .and_then(|outcome| outcome.result.as_ref().ok());
        if let Some(node) = animated.and_then(|model| state.graph.get_mut(model.node)) {
            node.helper = true;
        }
    }

    state.ready = true;
}

fn spawn_labels(
    spawner: &dyn LocalSpawn,
    config: &SceneConfig,
    source: &Rc<dyn AssetSource>,
    state: &SharedState,
) {
    let Some(font_path) = config.font.clone() else {
        return;
    };
    if config.labels.is_empty() {
        return;
    }
    let labels = config.labels.clone();
    let shapes = ShapeFactory::new(config);
    let source = Rc::clone(source);
    let state = Rc::clone(state);
    let task = async move {
        match Font::load(source.as_ref(), &font_path).await {
            Ok(font) => place_labels(&state, &shapes, Arc::new(font), &labels),
            Err(err) => log::error!("labels skipped, font did not load: {err:#}"),
        }
    };
    if let Err(err) = spawner.spawn_local(task) {
        log::error!("could not spawn the label task: {err}");
    }
}

fn place_labels(state: &SharedState, shapes: &ShapeFactory, font: Arc<Font>, labels: &[LabelDescriptor]) {
    let mut state = state.borrow_mut();
    for label in labels {
        let params = TextParams {
            size: label.size,
            height: label.height,
            curve_segments: label.curve_segments,
            ..TextParams::new(label.text.clone(), Arc::clone(&font))
        };
        match shapes.build(Shape::Text(params)) {
            Ok(geometry) => {
                shapes.place(
                    &mut state.graph,
                    geometry,
                    Placement {
                        position: Some(label.position),
                        rotation: Some(label.rotation.map(Some)),
                        color: label.color,
                        name: label.name.clone(),
                    },
                );
            }
            Err(err) => log::warn!("label {:?} skipped: {err}", label.text),
        }
    }
}

