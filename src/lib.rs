#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

//! Desktop-pet character core: VRM avatars driven by retargeted Mixamo motion.
//!
//! - [`retarget`] turns a Mixamo clip into a clip for a VRM humanoid.
//! - [`animation`] samples and blends clips onto a [`scene::Scene`].
//! - [`character::CharacterController`] ties an avatar, its mixer and its
//!   expressions into one session.

pub mod animation;
pub mod assets;
pub mod avatar;
pub mod character;
pub mod errors;
pub mod retarget;
pub mod scene;
pub mod settings;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, Binder, LoopMode};
pub use assets::{MotionAsset, MotionLoader, VrmLoader};
pub use avatar::{HumanoidBone, HumanoidRig, MetaVersion, VrmAvatar};
pub use character::{CameraPose, CharacterCommand, CharacterController, CharacterState};
pub use errors::{PetError, Result};
pub use retarget::{BoneNameMap, retarget};
pub use scene::{Node, NodeHandle, Scene, Skeleton};
pub use settings::PetSettings;
