use glam::{Affine3A, Quat, Vec3};
use slotmap::{SecondaryMap, SlotMap};

use crate::scene::NodeHandle;
use crate::scene::node::Node;
use crate::scene::transform::Transform;
use crate::scene::transform_system;

/// Scene graph container.
///
/// Pure data: node storage, names and the list of root nodes. Avatars and
/// motion skeletons each live in their own `Scene`.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub names: SecondaryMap<NodeHandle, String>,
    pub root_nodes: Vec<NodeHandle>,
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Node creation & hierarchy
    // ========================================================================

    /// Creates a detached node (not in `root_nodes`, no parent).
    pub fn create_node(&mut self) -> NodeHandle {
        self.nodes.insert(Node::new())
    }

    pub fn create_node_with_name(&mut self, name: &str) -> NodeHandle {
        let handle = self.create_node();
        self.names.insert(handle, name.to_string());
        handle
    }

    /// Inserts a node as a new scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Creates a named node with the given local transform under `parent`
    /// (or as a root when `parent` is `None`).
    pub fn add_named(&mut self, name: &str, transform: Transform, parent: Option<NodeHandle>) -> NodeHandle {
        let handle = self.create_node_with_name(name);
        if let Some(node) = self.nodes.get_mut(handle) {
            node.transform = transform;
        }
        match parent {
            Some(parent) => self.attach(handle, parent),
            None => self.root_nodes.push(handle),
        }
        handle
    }

    /// Makes `child` a child of `parent`, detaching it from any previous
    /// parent or from the root list. Attaching a node under its own
    /// descendant is refused.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent || !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            return;
        }
        if self.is_ancestor(child, parent) {
            log::warn!("Refusing to attach node {child:?} under its own descendant {parent:?}");
            return;
        }

        self.detach(child);

        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(child);
        }
        if let Some(child_node) = self.nodes.get_mut(child) {
            child_node.parent = Some(parent);
            child_node.transform.mark_dirty();
        }
    }

    /// Unlinks a node from its parent and from the root list.
    fn detach(&mut self, handle: NodeHandle) {
        let old_parent = self.nodes.get(handle).and_then(|n| n.parent);
        if let Some(old_parent) = old_parent
            && let Some(parent_node) = self.nodes.get_mut(old_parent)
        {
            parent_node.children.retain(|&c| c != handle);
        }
        self.root_nodes.retain(|&r| r != handle);
        if let Some(node) = self.nodes.get_mut(handle) {
            node.parent = None;
        }
    }

    /// Whether `ancestor` is on the parent chain of `handle`.
    fn is_ancestor(&self, ancestor: NodeHandle, handle: NodeHandle) -> bool {
        let mut current = self.nodes.get(handle).and_then(|n| n.parent);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.nodes.get(h).and_then(|n| n.parent);
        }
        false
    }

    /// Removes a node and its whole subtree.
    pub fn remove_node(&mut self, handle: NodeHandle) {
        if !self.nodes.contains_key(handle) {
            return;
        }
        self.detach(handle);

        for h in self.collect_subtree(handle) {
            self.nodes.remove(h);
            self.names.remove(h);
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    #[must_use]
    pub fn get_name(&self, handle: NodeHandle) -> Option<&str> {
        self.names.get(handle).map(String::as_str)
    }

    pub fn set_name(&mut self, handle: NodeHandle, name: &str) {
        if self.nodes.contains_key(handle) {
            self.names.insert(handle, name.to_string());
        }
    }

    /// Depth-first pre-order list of `root` and its descendants.
    #[must_use]
    pub fn collect_subtree(&self, root: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            out.push(h);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// First node named `name` in a depth-first walk from `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        self.collect_subtree(root)
            .into_iter()
            .find(|&h| self.get_name(h) == Some(name))
    }

    /// First node named `name` under any root.
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeHandle> {
        self.root_nodes
            .iter()
            .find_map(|&root| self.find_node_by_name(root, name))
    }

    // ========================================================================
    // Transforms
    // ========================================================================

    /// Propagates world matrices from every root.
    pub fn update_matrix_world(&mut self) {
        transform_system::update_hierarchy_iterative(&mut self.nodes, &self.root_nodes);
    }

    /// World matrix derived from the current local transforms of the node's
    /// ancestor chain. Does not need `update_matrix_world` to have run.
    #[must_use]
    pub fn world_transform(&self, handle: NodeHandle) -> Option<Affine3A> {
        transform_system::compute_world_matrix(&self.nodes, handle)
    }

    #[must_use]
    pub fn world_rotation(&self, handle: NodeHandle) -> Option<Quat> {
        self.world_transform(handle)
            .map(|m| m.to_scale_rotation_translation().1)
    }

    #[must_use]
    pub fn world_position(&self, handle: NodeHandle) -> Option<Vec3> {
        self.world_transform(handle).map(|m| Vec3::from(m.translation))
    }
}
