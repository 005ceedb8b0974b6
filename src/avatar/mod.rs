//! Avatar layer
//!
//! The retargeter and the character session see an avatar only through
//! [`HumanoidRig`]. [`VrmAvatar`] is the scene-backed implementation the
//! VRM loader produces.

pub mod expression;
pub mod humanoid;
pub mod vrm;

pub use expression::{Expression, ExpressionManager};
pub use humanoid::{HumanoidBone, UnknownBone};
pub use vrm::VrmAvatar;

use glam::Vec3;

use crate::scene::NodeHandle;

/// Which revision of the VRM format an avatar was authored in.
///
/// The two revisions disagree on axis handedness, so motion retargeted onto
/// a `V0` avatar gets a fixed sign correction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MetaVersion {
    /// VRM 0.x (`VRM` glTF extension)
    V0,
    /// VRM 1.0 (`VRMC_vrm` glTF extension)
    #[default]
    V1,
}

impl MetaVersion {
    #[inline]
    #[must_use]
    pub fn is_legacy(self) -> bool {
        self == MetaVersion::V0
    }
}

/// Adapter boundary between the character layer and a loaded avatar.
pub trait HumanoidRig {
    /// Scene node driven by a humanoid bone.
    fn bone_node(&self, bone: HumanoidBone) -> Option<NodeHandle>;

    /// Name of the node driven by a humanoid bone; retargeted tracks are
    /// addressed by this name.
    fn bone_node_name(&self, bone: HumanoidBone) -> Option<&str>;

    /// Rest-pose position of a humanoid bone in avatar space.
    fn rest_position(&self, bone: HumanoidBone) -> Option<Vec3>;

    fn meta_version(&self) -> MetaVersion;

    fn expression_names(&self) -> Vec<String>;

    /// Returns `false` if the avatar has no expression with this name.
    fn set_expression_value(&mut self, name: &str, value: f32) -> bool;
}
