//! Description Tree - the ephemeral per-pass output of a describe routine.
//!
//! Nodes live in a flat arena (`Vec<DescNode>`) addressed by `DescId`.
//! Allocation is a push, and the whole tree is freed at once when the
//! `DescTree` is dropped or handed back to `Builder::recycle`. A tree never
//! outlives the reconciliation pass that consumes it.

use tracing::error;

use crate::engine::ComponentId;
use crate::style::Style;
use crate::types::NodeKind;

/// Index of a node inside its `DescTree`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescId(pub(crate) u32);

impl DescId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node of a Description Tree.
#[derive(Debug, Clone)]
pub struct DescNode {
    pub kind: NodeKind,
    pub style: Style,
    pub children: Vec<DescId>,
    /// Another component whose retained root is grafted in here by reference.
    pub component: Option<ComponentId>,
}

impl DescNode {
    pub fn new(kind: NodeKind, style: Style) -> Self {
        Self {
            kind,
            style,
            children: Vec::new(),
            component: None,
        }
    }
}

/// Arena holding one pass's Description Tree.
#[derive(Debug, Default)]
pub struct DescTree {
    nodes: Vec<DescNode>,
    root: Option<DescId>,
}

impl DescTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a detached node.
    pub fn alloc(&mut self, node: DescNode) -> DescId {
        let id = DescId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`.
    ///
    /// Returns false (and logs) when `parent` is a leaf; the tree is unchanged.
    pub fn push_child(&mut self, parent: DescId, child: DescId) -> bool {
        let parent_node = &mut self.nodes[parent.index()];
        if parent_node.kind.is_leaf() {
            error!(
                parent = parent.0,
                kind = ?parent_node.kind,
                "cannot add a child to a leaf description node"
            );
            return false;
        }
        parent_node.children.push(child);
        true
    }

    pub fn set_root(&mut self, root: DescId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<DescId> {
        self.root
    }

    #[inline]
    pub fn get(&self, id: DescId) -> &DescNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn children(&self, id: DescId) -> &[DescId] {
        &self.nodes[id.index()].children
    }

    /// Total number of nodes allocated in this pass.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node but keep the allocation for the next pass.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
