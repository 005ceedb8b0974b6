use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::avatar::{ExpressionManager, HumanoidBone, HumanoidRig, MetaVersion};
use crate::scene::{NodeHandle, Scene};

/// A VRM avatar: its node hierarchy, humanoid bone assignment and expressions.
#[derive(Debug, Clone)]
pub struct VrmAvatar {
    scene: Scene,
    root: NodeHandle,
    humanoid: FxHashMap<HumanoidBone, NodeHandle>,
    rest_positions: FxHashMap<HumanoidBone, Vec3>,
    meta_version: MetaVersion,
    expressions: ExpressionManager,
    /// Where the avatar was loaded from, if it came from a file
    pub source_url: Option<String>,
}

impl VrmAvatar {
    /// Wraps a scene as an avatar. Bones whose node is not in `scene` are
    /// dropped. Current world positions of the humanoid bones become their
    /// rest positions.
    #[must_use]
    pub fn new(
        mut scene: Scene,
        root: NodeHandle,
        humanoid: FxHashMap<HumanoidBone, NodeHandle>,
        meta_version: MetaVersion,
        expressions: ExpressionManager,
    ) -> Self {
        let humanoid: FxHashMap<_, _> = humanoid
            .into_iter()
            .filter(|(bone, node)| {
                let present = scene.get_node(*node).is_some();
                if !present {
                    log::warn!("Humanoid bone '{bone}' points at a missing node, ignoring it");
                }
                present
            })
            .collect();

        let rest_positions = humanoid
            .iter()
            .filter_map(|(&bone, &node)| Some((bone, scene.world_position(node)?)))
            .collect();

        scene.update_matrix_world();

        Self {
            scene,
            root,
            humanoid,
            rest_positions,
            meta_version,
            expressions,
            source_url: None,
        }
    }

    #[must_use]
    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    #[inline]
    #[must_use]
    pub fn expressions(&self) -> &ExpressionManager {
        &self.expressions
    }

    #[inline]
    pub fn expressions_mut(&mut self) -> &mut ExpressionManager {
        &mut self.expressions
    }

    /// Humanoid bones this avatar defines.
    pub fn humanoid_bones(&self) -> impl Iterator<Item = (HumanoidBone, NodeHandle)> + '_ {
        self.humanoid.iter().map(|(&bone, &node)| (bone, node))
    }
}

impl HumanoidRig for VrmAvatar {
    fn bone_node(&self, bone: HumanoidBone) -> Option<NodeHandle> {
        self.humanoid.get(&bone).copied()
    }

    fn bone_node_name(&self, bone: HumanoidBone) -> Option<&str> {
        self.bone_node(bone).and_then(|h| self.scene.get_name(h))
    }

    fn rest_position(&self, bone: HumanoidBone) -> Option<Vec3> {
        self.rest_positions.get(&bone).copied()
    }

    fn meta_version(&self) -> MetaVersion {
        self.meta_version
    }

    fn expression_names(&self) -> Vec<String> {
        self.expressions.names()
    }

    fn set_expression_value(&mut self, name: &str, value: f32) -> bool {
        self.expressions.set_value(name, value)
    }
}
