use cgmath::Rad;
use flow_scene::{
    data_structures::{
        scene_graph::{NodeId, Node, SceneGraph},
        transform::Transform,
    },
    spin::{Sign, SpinProfile, SpinScheduler},
};

fn rotation(scene: &SceneGraph, id: NodeId) -> [f32; 3] {
    let rotation = scene.get(id).unwrap().transform.rotation;
    [rotation.x.0, rotation.y.0, rotation.z.0]
}

#[test]
fn platonic_rotation_is_derived_from_time() {
    let mut scene = SceneGraph::new();
    let mut transform = Transform::new();
    transform.set_rotation([0.0, 0.25, 0.0]);
    let positive = scene.add(Node::group().with_transform(transform));
    let negative = scene.add(Node::group());
    let mut spin = SpinScheduler::new();
    spin.register(positive, Sign::Positive, SpinProfile::platonic());
    spin.register(negative, Sign::Negative, SpinProfile::platonic());

    spin.tick(&mut scene, 5.0);

    assert_eq!(rotation(&scene, positive), [2.5, 0.25, 5.0 * 0.51]);
    assert_eq!(rotation(&scene, negative), [-2.5, 0.0, 5.0 * 0.51]);
}

#[test]
fn ticking_twice_at_the_same_time_is_idempotent() {
    let mut scene = SceneGraph::new();
    let id = scene.add(Node::group());
    let mut spin = SpinScheduler::new();
    spin.register(id, Sign::Negative, SpinProfile::about_y(0.3));

    spin.tick(&mut scene, 5.0);
    let once = rotation(&scene, id);
    spin.tick(&mut scene, 5.0);

    assert_eq!(rotation(&scene, id), once);
    assert_eq!(once, [0.0, -(5.0f32 * 0.3), 0.0]);
}

#[test]
fn disabled_registrations_are_skipped() {
    let mut scene = SceneGraph::new();
    let id = scene.add(Node::group());
    let mut spin = SpinScheduler::new();
    let index = spin.register(id, Sign::Positive, SpinProfile::platonic());

    assert!(spin.set_enabled(index, false));
    assert!(!spin.set_enabled(index + 1, false));
    spin.tick(&mut scene, 3.0);

    assert_eq!(scene.get(id).unwrap().transform.rotation.x, Rad(0.0));
}

#[test]
fn removed_nodes_are_ignored() {
    let mut scene = SceneGraph::new();
    let gone = scene.add(Node::group());
    let kept = scene.add(Node::group());
    let mut spin = SpinScheduler::new();
    spin.register(gone, Sign::Positive, SpinProfile::platonic());
    spin.register(kept, Sign::Positive, SpinProfile::platonic());
    scene.remove(gone).unwrap();

    spin.tick(&mut scene, 2.0);

    assert_eq!(rotation(&scene, kept)[0], 1.0);
    assert_eq!(spin.len(), 2);
}
