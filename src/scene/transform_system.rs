//! Transform System
//!
//! Propagates world matrices down the hierarchy. Decoupled from [`Scene`]
//! so it only borrows the node storage and the root list.
//!
//! [`Scene`]: crate::scene::Scene

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::NodeHandle;
use crate::scene::node::Node;

/// Updates world matrices for every subtree under `roots`.
///
/// Uses an explicit stack instead of recursion so deep rigs cannot overflow.
/// A node's world matrix is only recomputed when its local matrix or an
/// ancestor changed.
pub fn update_hierarchy_iterative(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // Work stack: (node, parent world matrix, parent changed)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = Vec::with_capacity(64);

    for &root_handle in roots.iter().rev() {
        stack.push((root_handle, Affine3A::IDENTITY, false));
    }

    while let Some((node_handle, parent_world_matrix, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(node_handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let world_needs_update = local_changed || parent_changed;

        if world_needs_update {
            let new_world = parent_world_matrix * *node.transform.local_matrix();
            node.transform.set_world_matrix(new_world);
        }

        let current_world = node.transform.world_matrix;

        // Reverse order keeps children processed in declaration order
        for &child_handle in node.children.iter().rev() {
            stack.push((child_handle, current_world, world_needs_update));
        }
    }
}

/// Computes a node's world matrix from the local TRS fields of its ancestor
/// chain, without touching the caches.
#[must_use]
pub fn compute_world_matrix(nodes: &SlotMap<NodeHandle, Node>, handle: NodeHandle) -> Option<Affine3A> {
    let mut node = nodes.get(handle)?;
    let mut world = node.transform.compose();

    while let Some(parent_handle) = node.parent {
        let Some(parent) = nodes.get(parent_handle) else {
            break;
        };
        world = parent.transform.compose() * world;
        node = parent;
    }

    Some(world)
}
