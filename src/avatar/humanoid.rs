//! Canonical VRM humanoid bone identifiers.

use std::fmt;
use std::str::FromStr;

macro_rules! humanoid_bones {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A bone of the VRM 1.0 humanoid rig.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum HumanoidBone {
            $($variant),+
        }

        impl HumanoidBone {
            /// Every humanoid bone, in VRM declaration order.
            pub const ALL: &'static [HumanoidBone] = &[$(HumanoidBone::$variant),+];

            /// The VRM 1.0 identifier (`"leftUpperArm"`).
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(HumanoidBone::$variant => $name),+
                }
            }
        }

        impl FromStr for HumanoidBone {
            type Err = UnknownBone;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(HumanoidBone::$variant),)+
                    other => Err(UnknownBone(other.to_string())),
                }
            }
        }
    };
}

humanoid_bones! {
    Hips => "hips",
    Spine => "spine",
    Chest => "chest",
    UpperChest => "upperChest",
    Neck => "neck",
    Head => "head",
    LeftEye => "leftEye",
    RightEye => "rightEye",
    Jaw => "jaw",
    LeftUpperLeg => "leftUpperLeg",
    LeftLowerLeg => "leftLowerLeg",
    LeftFoot => "leftFoot",
    LeftToes => "leftToes",
    RightUpperLeg => "rightUpperLeg",
    RightLowerLeg => "rightLowerLeg",
    RightFoot => "rightFoot",
    RightToes => "rightToes",
    LeftShoulder => "leftShoulder",
    LeftUpperArm => "leftUpperArm",
    LeftLowerArm => "leftLowerArm",
    LeftHand => "leftHand",
    RightShoulder => "rightShoulder",
    RightUpperArm => "rightUpperArm",
    RightLowerArm => "rightLowerArm",
    RightHand => "rightHand",
    LeftThumbMetacarpal => "leftThumbMetacarpal",
    LeftThumbProximal => "leftThumbProximal",
    LeftThumbDistal => "leftThumbDistal",
    LeftIndexProximal => "leftIndexProximal",
    LeftIndexIntermediate => "leftIndexIntermediate",
    LeftIndexDistal => "leftIndexDistal",
    LeftMiddleProximal => "leftMiddleProximal",
    LeftMiddleIntermediate => "leftMiddleIntermediate",
    LeftMiddleDistal => "leftMiddleDistal",
    LeftRingProximal => "leftRingProximal",
    LeftRingIntermediate => "leftRingIntermediate",
    LeftRingDistal => "leftRingDistal",
    LeftLittleProximal => "leftLittleProximal",
    LeftLittleIntermediate => "leftLittleIntermediate",
    LeftLittleDistal => "leftLittleDistal",
    RightThumbMetacarpal => "rightThumbMetacarpal",
    RightThumbProximal => "rightThumbProximal",
    RightThumbDistal => "rightThumbDistal",
    RightIndexProximal => "rightIndexProximal",
    RightIndexIntermediate => "rightIndexIntermediate",
    RightIndexDistal => "rightIndexDistal",
    RightMiddleProximal => "rightMiddleProximal",
    RightMiddleIntermediate => "rightMiddleIntermediate",
    RightMiddleDistal => "rightMiddleDistal",
    RightRingProximal => "rightRingProximal",
    RightRingIntermediate => "rightRingIntermediate",
    RightRingDistal => "rightRingDistal",
    RightLittleProximal => "rightLittleProximal",
    RightLittleIntermediate => "rightLittleIntermediate",
    RightLittleDistal => "rightLittleDistal",
}

impl HumanoidBone {
    /// Parses a VRM 0.x bone name.
    ///
    /// 0.x names the thumb joints proximal/intermediate/distal where 1.0 uses
    /// metacarpal/proximal/distal; every other name is shared.
    pub fn from_vrm0_name(name: &str) -> Result<Self, UnknownBone> {
        match name {
            "leftThumbProximal" => Ok(HumanoidBone::LeftThumbMetacarpal),
            "leftThumbIntermediate" => Ok(HumanoidBone::LeftThumbProximal),
            "rightThumbProximal" => Ok(HumanoidBone::RightThumbMetacarpal),
            "rightThumbIntermediate" => Ok(HumanoidBone::RightThumbProximal),
            other => other.parse(),
        }
    }
}

impl fmt::Display for HumanoidBone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bone name that is not part of the humanoid rig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownBone(pub String);

impl fmt::Display for UnknownBone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown humanoid bone '{}'", self.0)
    }
}

impl std::error::Error for UnknownBone {}
