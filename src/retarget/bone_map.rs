use rustc_hash::FxHashMap;

use crate::avatar::HumanoidBone;

use HumanoidBone as B;

/// Mixamo joint names (without the `mixamorig` prefix) and their humanoid bone.
const MIXAMO_BONES: &[(&str, HumanoidBone)] = &[
    ("Hips", B::Hips),
    ("Spine", B::Spine),
    ("Spine1", B::Chest),
    ("Spine2", B::UpperChest),
    ("Neck", B::Neck),
    ("Head", B::Head),
    ("LeftShoulder", B::LeftShoulder),
    ("LeftArm", B::LeftUpperArm),
    ("LeftForeArm", B::LeftLowerArm),
    ("LeftHand", B::LeftHand),
    ("LeftHandThumb1", B::LeftThumbMetacarpal),
    ("LeftHandThumb2", B::LeftThumbProximal),
    ("LeftHandThumb3", B::LeftThumbDistal),
    ("LeftHandIndex1", B::LeftIndexProximal),
    ("LeftHandIndex2", B::LeftIndexIntermediate),
    ("LeftHandIndex3", B::LeftIndexDistal),
    ("LeftHandMiddle1", B::LeftMiddleProximal),
    ("LeftHandMiddle2", B::LeftMiddleIntermediate),
    ("LeftHandMiddle3", B::LeftMiddleDistal),
    ("LeftHandRing1", B::LeftRingProximal),
    ("LeftHandRing2", B::LeftRingIntermediate),
    ("LeftHandRing3", B::LeftRingDistal),
    ("LeftHandPinky1", B::LeftLittleProximal),
    ("LeftHandPinky2", B::LeftLittleIntermediate),
    ("LeftHandPinky3", B::LeftLittleDistal),
    ("RightShoulder", B::RightShoulder),
    ("RightArm", B::RightUpperArm),
    ("RightForeArm", B::RightLowerArm),
    ("RightHand", B::RightHand),
    ("RightHandThumb1", B::RightThumbMetacarpal),
    ("RightHandThumb2", B::RightThumbProximal),
    ("RightHandThumb3", B::RightThumbDistal),
    ("RightHandIndex1", B::RightIndexProximal),
    ("RightHandIndex2", B::RightIndexIntermediate),
    ("RightHandIndex3", B::RightIndexDistal),
    ("RightHandMiddle1", B::RightMiddleProximal),
    ("RightHandMiddle2", B::RightMiddleIntermediate),
    ("RightHandMiddle3", B::RightMiddleDistal),
    ("RightHandRing1", B::RightRingProximal),
    ("RightHandRing2", B::RightRingIntermediate),
    ("RightHandRing3", B::RightRingDistal),
    ("RightHandPinky1", B::RightLittleProximal),
    ("RightHandPinky2", B::RightLittleIntermediate),
    ("RightHandPinky3", B::RightLittleDistal),
    ("LeftUpLeg", B::LeftUpperLeg),
    ("LeftLeg", B::LeftLowerLeg),
    ("LeftFoot", B::LeftFoot),
    ("LeftToeBase", B::LeftToes),
    ("RightUpLeg", B::RightUpperLeg),
    ("RightLeg", B::RightLowerLeg),
    ("RightFoot", B::RightFoot),
    ("RightToeBase", B::RightToes),
];

/// Prefix Mixamo puts in front of every joint in its default export.
pub const MIXAMO_PREFIX: &str = "mixamorig";

/// Source rig bone name to humanoid bone.
#[derive(Debug, Clone, Default)]
pub struct BoneNameMap {
    map: FxHashMap<String, HumanoidBone>,
}

impl BoneNameMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The Mixamo table under both naming conventions: `mixamorigLeftArm`
    /// and bare `LeftArm`. The bare convention also maps `Neck1` to the neck.
    #[must_use]
    pub fn mixamo() -> Self {
        let mut map = Self::new();
        for &(joint, bone) in MIXAMO_BONES {
            map.insert(format!("{MIXAMO_PREFIX}{joint}"), bone);
            map.insert(joint, bone);
        }
        map.insert("Neck1", B::Neck);
        map
    }

    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, HumanoidBone)>,
        S: Into<String>,
    {
        let mut map = Self::new();
        for (name, bone) in pairs {
            map.insert(name, bone);
        }
        map
    }

    pub fn insert(&mut self, source_name: impl Into<String>, bone: HumanoidBone) {
        self.map.insert(source_name.into(), bone);
    }

    #[must_use]
    pub fn get(&self, source_name: &str) -> Option<HumanoidBone> {
        self.map.get(source_name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
