//! Scene graph module
//!
//! Holds the node hierarchies the character layer works on:
//! - Node: scene node (parent/child links and a transform)
//! - Transform: TRS component with cached matrices
//! - Scene: node container with name lookup
//! - Skeleton: flat rest-pose snapshot of a bone hierarchy
//! - transform_system: world matrix propagation, decoupled from Scene

pub mod node;
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use node::Node;
pub use scene::Scene;
pub use skeleton::{Bone, Skeleton};
pub use transform::Transform;

use slotmap::new_key_type;

new_key_type! {
    pub struct NodeHandle;
}
