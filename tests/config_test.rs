use flow_scene::{
    SceneConfig,
    config::ModelFormat,
    error::ConfigError,
    shapes::ShapeKind,
    spin::Sign,
};

#[test]
fn defaults_describe_a_complete_scene() {
    let config = SceneConfig::default();
    config.validate().unwrap();

    assert_eq!(config.models.len(), 3);
    assert_eq!(config.models[1].format, ModelFormat::PlainObject);
    assert_eq!(config.animated_model, Some(2));
    assert_eq!(config.platonics.len(), 5);
    assert_eq!(config.platonics[1].kind, ShapeKind::Box);
    assert_eq!(config.platonics[4].sign, Sign::Negative);
    assert_eq!(config.ambient_light.loaded_position, [15.0, 2.0, 70.0]);
}

#[test]
fn json_overrides_fall_back_to_defaults() {
    let config = SceneConfig::from_json(
        r#"{
            "debug": true,
            "models": [
                { "path": "models/duck.gltf", "format": "gltf", "scale": 20 },
                { "path": "models/teapot.obj", "format": "plain-object",
                  "spin": { "coefficient": 0.2, "sign": "negative" } }
            ],
            "animated_model": 0,
            "sky": { "enabled": false }
        }"#,
    )
    .unwrap();

    assert!(config.debug);
    assert_eq!(config.models[0].format, ModelFormat::SceneGraph);
    assert_eq!(config.models[1].scale, 1.0);
    assert_eq!(config.models[1].spin.unwrap().sign, Sign::Negative);
    assert!(!config.sky.enabled);
    assert_eq!(config.sky.turbidity, 10.0);
    assert_eq!(config.textures.images.len(), 2);
}

#[test]
fn an_empty_model_list_is_rejected() {
    assert!(matches!(
        SceneConfig::from_json(r#"{ "models": [] }"#),
        Err(ConfigError::NoModels)
    ));
}

#[test]
fn invalid_models_are_rejected() {
    let mut config = SceneConfig::default();
    config.models[0].scale = 0.0;
    assert!(matches!(config.validate(), Err(ConfigError::InvalidScale { .. })));

    let mut config = SceneConfig::default();
    config.animated_model = Some(3);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::AnimatedModelOutOfRange { index: 3, len: 3 })
    ));

    let mut config = SceneConfig::default();
    config.plain_object_texture = "Brick".to_string();
    assert!(matches!(config.validate(), Err(ConfigError::MissingTexture(_))));
}

#[test]
fn duplicate_texture_names_are_rejected() {
    let mut config = SceneConfig::default();
    let duplicate = config.textures.images[0].clone();
    config.textures.images.push(duplicate);

    assert!(matches!(config.validate(), Err(ConfigError::DuplicateTexture(name)) if name == "UV"));
}

#[test]
fn malformed_json_is_a_parse_error() {
    assert!(matches!(
        SceneConfig::from_json("{ models"),
        Err(ConfigError::Parse(_))
    ));
}
