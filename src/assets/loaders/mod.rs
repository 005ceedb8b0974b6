//! glTF-based loaders for avatars and motion files.

pub mod motion;
pub mod vrm;

pub use motion::{MotionAsset, MotionLoader};
pub use vrm::VrmLoader;

use glam::{Quat, Vec3};

use crate::animation::sanitize_node_name;
use crate::scene::{NodeHandle, Scene, Transform};

/// Name used for a glTF node, falling back to `Node_<index>` when unnamed.
pub(crate) fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("Node_{}", node.index()), ToString::to_string)
}

/// Same as [`node_name`] but usable as the node part of a track identifier.
pub(crate) fn sanitized_node_name(node: &gltf::Node) -> String {
    sanitize_node_name(&node_name(node))
}

pub(crate) fn node_transform(node: &gltf::Node) -> Transform {
    let (t, r, s) = node.transform().decomposed();
    Transform::from_trs(Vec3::from_array(t), Quat::from_array(r), Vec3::from_array(s))
}

/// Parent index of every node, from the children lists.
pub(crate) fn parent_indices(document: &gltf::Document) -> Vec<Option<usize>> {
    let mut parents = vec![None; document.nodes().count()];
    for node in document.nodes() {
        for child in node.children() {
            parents[child.index()] = Some(node.index());
        }
    }
    parents
}

/// Builds every glTF node into `scene` under a new root named `root_name`.
///
/// Returns the root and the glTF node index to handle mapping.
pub(crate) fn build_node_hierarchy(
    document: &gltf::Document,
    scene: &mut Scene,
    root_name: &str,
) -> (NodeHandle, Vec<NodeHandle>) {
    // 1. Create all nodes
    let node_mapping: Vec<NodeHandle> = document
        .nodes()
        .map(|node| scene.add_named(&node_name(&node), node_transform(&node), None))
        .collect();

    // 2. Hierarchy; attach() takes children off the root list
    for node in document.nodes() {
        let parent_handle = node_mapping[node.index()];
        for child in node.children() {
            scene.attach(node_mapping[child.index()], parent_handle);
        }
    }

    // 3. Scene roots go under a single loader root
    let root = scene.add_named(root_name, Transform::new(), None);
    let scene_roots: Vec<usize> = match document.default_scene().or_else(|| document.scenes().next()) {
        Some(default_scene) => default_scene.nodes().map(|n| n.index()).collect(),
        None => {
            let parents = parent_indices(document);
            (0..parents.len()).filter(|&i| parents[i].is_none()).collect()
        }
    };
    for index in scene_roots {
        scene.attach(node_mapping[index], root);
    }

    (root, node_mapping)
}
