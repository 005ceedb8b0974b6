//! Asset loading: VRM avatars and glTF motion files.

pub mod loaders;

pub use loaders::motion::MIXAMO_CLIP_NAME;
pub use loaders::{MotionAsset, MotionLoader, VrmLoader};
