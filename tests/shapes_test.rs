use std::sync::Arc;

use flow_scene::{
    data_structures::scene_graph::{Material, NodeKind, SceneGraph},
    error::ShapeError,
    resources::font::Font,
    shapes::{
        BoxParams, PlaneParams, Placement, Shape, ShapeFactory, ShapeKind, SphereParams, TextParams,
    },
};

mod common;
use crate::common::test_utils::font_json;

#[test]
fn box_defaults() {
    let shape = Shape::with_defaults(ShapeKind::Box).unwrap();
    assert_eq!(
        shape,
        Shape::Box(BoxParams {
            radius: 7.0,
            width_segments: 7,
            height_segments: 7,
        })
    );
}

#[test]
fn kinds_with_required_parameters_have_no_defaults() {
    for kind in [ShapeKind::Plane, ShapeKind::Sphere, ShapeKind::Text] {
        assert_eq!(
            Shape::with_defaults(kind),
            Err(ShapeError::MissingParameters(kind))
        );
    }
    assert!(Shape::with_defaults(ShapeKind::Icosahedron).is_ok());
}

#[test]
fn kinds_parse_from_lowercase_names() {
    assert_eq!("dodecahedron".parse::<ShapeKind>(), Ok(ShapeKind::Dodecahedron));
    assert_eq!(
        "torus".parse::<ShapeKind>(),
        Err(ShapeError::UnknownKind("torus".to_string()))
    );
}

#[test]
fn invalid_dimensions_are_rejected() {
    let factory = ShapeFactory::with_shadows(false);

    assert_eq!(
        factory.build(Shape::Sphere(SphereParams::new(-1.0))),
        Err(ShapeError::InvalidDimension {
            name: "radius",
            value: -1.0
        })
    );
    let mut plane = PlaneParams::new(100.0, 100.0);
    plane.height_segments = 0;
    assert_eq!(
        factory.build(Shape::Plane(plane)),
        Err(ShapeError::InvalidSegments {
            name: "height_segments"
        })
    );
}

#[test]
fn text_needs_glyphs_for_every_character() {
    let font = Arc::new(Font::from_json(&font_json("Helo")).unwrap());
    let factory = ShapeFactory::with_shadows(false);

    assert!(factory
        .build(Shape::Text(TextParams::new("Hello", Arc::clone(&font))))
        .is_ok());
    assert_eq!(
        factory.build(Shape::Text(TextParams::new("Hello World", Arc::clone(&font)))),
        Err(ShapeError::MissingGlyphs(vec!['W', 'r', 'd']))
    );
    assert_eq!(
        factory.build(Shape::Text(TextParams::new("  ", font))),
        Err(ShapeError::EmptyText)
    );
}

#[test]
fn every_placement_creates_a_new_node() {
    let mut scene = SceneGraph::new();
    let factory = ShapeFactory::with_shadows(true);
    let geometry = factory
        .build(Shape::with_defaults(ShapeKind::Octahedron).unwrap())
        .unwrap();

    let first = factory.place(&mut scene, geometry.clone(), Placement::default());
    let second = factory.place(
        &mut scene,
        geometry,
        Placement {
            position: Some([1.0, 2.0, 3.0]),
            rotation: Some([None, Some(0.5), None]),
            color: 0xff0000,
            name: Some("red".into()),
        },
    );

    assert_ne!(first, second);
    assert_eq!(scene.len(), 2);
    let node = scene.get(second).unwrap();
    assert_eq!(node.name.as_deref(), Some("red"));
    assert_eq!(node.transform.position.z, 3.0);
    assert_eq!(node.transform.rotation.y.0, 0.5);
    assert!(node.receive_shadow);
    let NodeKind::Shape { geometry, material } = &node.kind else {
        panic!("expected a shape node");
    };
    assert_eq!(geometry.bounding_radius(), 5.0);
    assert_eq!(
        material,
        &Material::Standard {
            color: 0xff0000,
            roughness: 0.0,
            map: None
        }
    );
}
