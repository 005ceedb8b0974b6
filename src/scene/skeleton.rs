use glam::{Affine3A, Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::scene::{NodeHandle, Scene};

/// One joint of a [`Skeleton`] in its rest (bind) pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Bone {
    pub name: String,
    /// Index of the parent bone in [`Skeleton::bones`]
    pub parent: Option<usize>,
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Bone {
    #[must_use]
    pub fn new(name: impl Into<String>, parent: Option<usize>) -> Self {
        Self {
            name: name.into(),
            parent,
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Read-only rest-pose snapshot of a bone hierarchy.
///
/// Motion files are decoded into a `Skeleton`; the retargeter only reads
/// rest-pose world rotations and the hips height from it.
#[derive(Debug, Clone, Default)]
pub struct Skeleton {
    pub name: String,
    bones: Vec<Bone>,
    // First bone with a given name wins
    by_name: FxHashMap<String, usize>,
}

impl Skeleton {
    /// Builds a skeleton from bones whose `parent` indices refer into `bones`.
    /// Out-of-range parents are treated as roots.
    #[must_use]
    pub fn new(name: &str, mut bones: Vec<Bone>) -> Self {
        let count = bones.len();
        let mut by_name = FxHashMap::default();

        for (i, bone) in bones.iter_mut().enumerate() {
            if bone.parent.is_some_and(|p| p >= count || p == i) {
                log::warn!("Bone '{}' has an invalid parent index, treating it as a root", bone.name);
                bone.parent = None;
            }
            by_name.entry(bone.name.clone()).or_insert(i);
        }

        Self {
            name: name.to_string(),
            bones,
            by_name,
        }
    }

    /// Snapshots the subtree under `root` (inclusive) in depth-first order,
    /// using each node's current local transform as its rest pose.
    #[must_use]
    pub fn from_scene(scene: &Scene, root: NodeHandle) -> Self {
        let handles = scene.collect_subtree(root);
        let index_of: FxHashMap<NodeHandle, usize> =
            handles.iter().enumerate().map(|(i, &h)| (h, i)).collect();

        let bones = handles
            .iter()
            .filter_map(|&h| {
                let node = scene.get_node(h)?;
                let parent = node.parent().and_then(|p| index_of.get(&p).copied());
                Some(Bone {
                    name: scene.get_name(h).unwrap_or_default().to_string(),
                    parent,
                    position: node.transform.position,
                    rotation: node.transform.rotation,
                    scale: node.transform.scale,
                })
            })
            .collect();

        let name = scene.get_name(root).unwrap_or("Skeleton");
        Self::new(name, bones)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    #[must_use]
    pub fn find_bone(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[must_use]
    pub fn bone_by_name(&self, name: &str) -> Option<&Bone> {
        self.find_bone(name).and_then(|i| self.bone(i))
    }

    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.bones.get(index)?.parent
    }

    pub fn root_bones(&self) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .filter(|(_, b)| b.parent.is_none())
            .map(|(i, _)| i)
    }

    /// Rest-pose world matrix of a bone.
    #[must_use]
    pub fn world_matrix(&self, index: usize) -> Option<Affine3A> {
        let mut bone = self.bones.get(index)?;
        let mut world = bone.local_matrix();
        // Bounded walk guards against parent cycles
        for _ in 0..self.bones.len() {
            let Some(parent) = bone.parent.and_then(|p| self.bones.get(p)) else {
                break;
            };
            world = parent.local_matrix() * world;
            bone = parent;
        }
        Some(world)
    }

    /// Rest-pose world rotation of a bone.
    #[must_use]
    pub fn world_rotation(&self, index: usize) -> Option<Quat> {
        self.world_matrix(index)
            .map(|m| m.to_scale_rotation_translation().1)
    }
}
