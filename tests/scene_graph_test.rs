use cgmath::Rad;
use flow_scene::{
    data_structures::{
        scene_graph::{Node, SceneGraph},
        transform::Transform,
    },
    error::SceneError,
};

#[test]
fn absent_axes_keep_their_rotation() {
    let mut scene = SceneGraph::new();
    let mut transform = Transform::new();
    transform.set_rotation([0.1, 0.7, 0.3]);
    let id = scene.add(Node::group().with_transform(transform));

    scene.rotate(id, [Some(1.0), None, Some(2.0)]).unwrap();

    let rotation = scene.get(id).unwrap().transform.rotation;
    assert_eq!(rotation.x, Rad(1.0));
    assert_eq!(rotation.y, Rad(0.7));
    assert_eq!(rotation.z, Rad(2.0));
}

#[test]
fn removing_a_node_removes_its_subtree() {
    let mut scene = SceneGraph::new();
    let root = scene.add(Node::group().with_name(Some("model".into())));
    let child = scene.add_child(root, Node::group()).unwrap();
    let grandchild = scene.add_child(child, Node::group()).unwrap();
    let other = scene.add(Node::group());

    assert_eq!(scene.descendants(root).unwrap(), vec![root, child, grandchild]);

    let removed = scene.remove(root).unwrap();
    assert_eq!(removed.name.as_deref(), Some("model"));
    assert!(!scene.contains(child));
    assert!(!scene.contains(grandchild));
    assert_eq!(scene.roots(), &[other]);
    assert_eq!(scene.len(), 1);
}

#[test]
fn removing_a_child_detaches_it_from_its_parent() {
    let mut scene = SceneGraph::new();
    let root = scene.add(Node::group());
    let first = scene.add_child(root, Node::group()).unwrap();
    let second = scene.add_child(root, Node::group()).unwrap();

    scene.remove(first).unwrap();

    assert_eq!(scene.get(root).unwrap().children(), &[second]);
    assert_eq!(scene.get(second).unwrap().parent(), Some(root));
}

#[test]
fn stale_handles_are_rejected() {
    let mut scene = SceneGraph::new();
    let id = scene.add(Node::group());
    scene.remove(id).unwrap();

    assert_eq!(scene.remove(id).unwrap_err(), SceneError::UnknownNode(id));
    assert_eq!(
        scene.rotate(id, [Some(1.0), None, None]),
        Err(SceneError::UnknownNode(id))
    );
    assert!(scene.add_child(id, Node::group()).is_err());
    assert!(scene.world_matrix(id).is_none());
}

#[test]
fn world_matrix_includes_ancestors() {
    let mut scene = SceneGraph::new();
    let mut scaled = Transform::from_position([10.0, 0.0, 0.0]);
    scaled.multiply_scalar(2.0);
    let root = scene.add(Node::group().with_transform(scaled));
    let child = scene
        .add_child(root, Node::group().with_transform(Transform::from_position([1.0, 0.0, 0.0])))
        .unwrap();

    let matrix = scene.world_matrix(child).unwrap();
    // child origin: 10 + 2 * 1
    assert_eq!(matrix.w.x, 12.0);
    assert_eq!(scene.find_by_name("missing"), None);
}
