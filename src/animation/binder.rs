use rustc_hash::FxHashMap;

use crate::animation::binding::{PropertyBinding, TargetPath, TrackValue};
use crate::animation::clip::{AnimationClip, TrackData};
use crate::scene::{NodeHandle, Scene};

pub struct Binder;

impl Binder {
    /// Resolves each track of `clip` to a node under `root` by name.
    ///
    /// Tracks with no matching node, or whose data type does not fit the
    /// target property, get no binding. The node's current property value
    /// is captured as the binding's original value.
    #[must_use]
    pub fn bind(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
        let mut by_name: FxHashMap<&str, NodeHandle> = FxHashMap::default();
        for handle in scene.collect_subtree(root) {
            if let Some(name) = scene.get_name(handle) {
                by_name.entry(name).or_insert(handle);
            }
        }

        let mut bindings = Vec::with_capacity(clip.tracks.len());

        for (track_index, track) in clip.tracks.iter().enumerate() {
            let Some(&node_handle) = by_name.get(track.meta.node_name.as_str()) else {
                log::trace!("No node for track '{}'", track.name());
                continue;
            };
            let Some(node) = scene.get_node(node_handle) else {
                continue;
            };

            let transform = &node.transform;
            let original = match (&track.data, track.meta.target) {
                (TrackData::Vector3(_), TargetPath::Translation) => TrackValue::Vector3(transform.position),
                (TrackData::Vector3(_), TargetPath::Scale) => TrackValue::Vector3(transform.scale),
                (TrackData::Quaternion(_), TargetPath::Rotation) => {
                    TrackValue::Quaternion(transform.rotation)
                }
                _ => {
                    log::warn!("Track '{}' has data that does not fit its property", track.name());
                    continue;
                }
            };

            bindings.push(PropertyBinding {
                track_index,
                node_handle,
                target: track.meta.target,
                original,
            });
        }

        bindings
    }
}
