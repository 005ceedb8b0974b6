use std::sync::Arc;

use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};

use crate::animation::action::AnimationAction;
use crate::animation::binder::Binder;
use crate::animation::binding::{TargetPath, TrackValue};
use crate::animation::clip::AnimationClip;
use crate::animation::values::Interpolatable;
use crate::scene::{NodeHandle, Scene};

new_key_type! {
    pub struct ActionHandle;
}

/// Weighted running blend of one animated property.
struct Accumulator {
    weight: f32,
    value: TrackValue,
    original: TrackValue,
}

fn blend(a: TrackValue, b: TrackValue, t: f32) -> TrackValue {
    match (a, b) {
        (TrackValue::Vector3(a), TrackValue::Vector3(b)) => {
            TrackValue::Vector3(Interpolatable::interpolate_linear(&a, &b, t))
        }
        (TrackValue::Quaternion(a), TrackValue::Quaternion(b)) => {
            TrackValue::Quaternion(Interpolatable::interpolate_linear(&a, &b, t))
        }
        // Mismatched kinds never share a property
        (_, b) => b,
    }
}

/// Plays actions against the subtree under one root node.
pub struct AnimationMixer {
    root: NodeHandle,
    actions: SlotMap<ActionHandle, AnimationAction>,
}

impl AnimationMixer {
    #[must_use]
    pub fn new(root: NodeHandle) -> Self {
        Self {
            root,
            actions: SlotMap::with_key(),
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    /// Returns the action for `clip`, creating and binding it on first use.
    pub fn clip_action(&mut self, clip: Arc<AnimationClip>, scene: &Scene) -> ActionHandle {
        if let Some((handle, _)) = self
            .actions
            .iter()
            .find(|(_, action)| Arc::ptr_eq(action.clip(), &clip))
        {
            return handle;
        }

        let bindings = Binder::bind(scene, self.root, &clip);
        let mut action = AnimationAction::new(clip);
        action.bindings = bindings;
        action.enabled = false;
        self.actions.insert(action)
    }

    #[must_use]
    pub fn action(&self, handle: ActionHandle) -> Option<&AnimationAction> {
        self.actions.get(handle)
    }

    pub fn action_mut(&mut self, handle: ActionHandle) -> Option<&mut AnimationAction> {
        self.actions.get_mut(handle)
    }

    pub fn actions(&self) -> impl Iterator<Item = (ActionHandle, &AnimationAction)> {
        self.actions.iter()
    }

    /// Fades `from` out and `to` in over `duration` seconds.
    /// Returns `false` if either handle is stale or both are the same action.
    pub fn cross_fade(&mut self, from: ActionHandle, to: ActionHandle, duration: f32) -> bool {
        let Some([previous, next]) = self.actions.get_disjoint_mut([from, to]) else {
            return false;
        };
        next.cross_fade_from(previous, duration);
        true
    }

    pub fn uncache_action(&mut self, handle: ActionHandle) -> Option<AnimationAction> {
        self.actions.remove(handle)
    }

    pub fn stop_all_action(&mut self) {
        for action in self.actions.values_mut() {
            action.stop();
        }
    }

    /// Advances every action by `dt` and writes the blended pose into `scene`.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in self.actions.values_mut() {
            action.update(dt);
        }

        let mut accumulators: FxHashMap<(NodeHandle, TargetPath), Accumulator> = FxHashMap::default();

        for action in self.actions.values_mut() {
            let weight = action.effective_weight();
            if weight <= 0.0 {
                continue;
            }

            for i in 0..action.bindings.len() {
                let binding = &action.bindings[i];
                let (track_index, key, original) =
                    (binding.track_index, (binding.node_handle, binding.target), binding.original);
                let Some(value) = action.sample_track(track_index) else {
                    continue;
                };

                accumulators
                    .entry(key)
                    .and_modify(|acc| {
                        let t = weight / (acc.weight + weight);
                        acc.value = blend(acc.value, value, t);
                        acc.weight += weight;
                    })
                    .or_insert(Accumulator {
                        weight,
                        value,
                        original,
                    });
            }
        }

        for ((node_handle, target), acc) in accumulators {
            let Some(node) = scene.get_node_mut(node_handle) else {
                continue;
            };

            let value = if acc.weight < 1.0 {
                blend(acc.original, acc.value, acc.weight)
            } else {
                acc.value
            };

            match (target, value) {
                (TargetPath::Translation, TrackValue::Vector3(v)) => node.transform.position = v,
                (TargetPath::Scale, TrackValue::Vector3(v)) => node.transform.scale = v,
                (TargetPath::Rotation, TrackValue::Quaternion(q)) => node.transform.rotation = q,
                _ => continue,
            }
            node.transform.mark_dirty();
        }
    }
}
