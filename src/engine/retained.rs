//! Retained Tree - the persistent node graph.
//!
//! Nodes live in a generation-checked `SlotMap`, so a `NodeId` that outlived
//! its node resolves to `None` instead of aliasing a recycled slot. Each node
//! holds its current style, its resolved `Rect`, an opaque drawable binding
//! and an ordered list of `Child` entries.
//!
//! # Ownership
//!
//! A `Child` either owns a node outright or borrows another component's
//! retained root. Destruction only ever recurses through `Child::Owned`;
//! borrowed roots belong to their component and are torn down with it.
//!
//! ```text
//! root (component A)
//! ├── Owned(text)
//! └── Borrowed(B) ──► root (component B)   // never freed through A
//! ```

use std::fmt;

use slotmap::{new_key_type, SecondaryMap, SlotMap};
use tracing::{error, trace, warn};

use crate::error::{CoreError, Result};
use crate::style::{HoverCallback, Style};
use crate::types::{NodeKind, Rect};
use super::description::{DescId, DescTree};

new_key_type! {
    /// Handle to a node in a `RetainedTree`.
    pub struct NodeId;

    /// Handle to a mounted component.
    pub struct ComponentId;
}

// =============================================================================
// Drawable Binding
// =============================================================================

/// Opaque handle issued by the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableId(pub u64);

/// The rendering collaborator.
///
/// Drawables are created and destroyed alongside retained nodes. The core
/// never inspects them.
pub trait DrawableBackend {
    fn create(&mut self, kind: NodeKind, style: &Style) -> DrawableId;

    /// A reused node's visual style changed in place.
    fn update(&mut self, drawable: DrawableId, style: &Style);

    fn destroy(&mut self, drawable: DrawableId);
}

/// Backend that only hands out sequential ids.
#[derive(Debug, Default)]
pub struct NullBackend {
    next: u64,
}

impl DrawableBackend for NullBackend {
    fn create(&mut self, _kind: NodeKind, _style: &Style) -> DrawableId {
        let id = DrawableId(self.next);
        self.next += 1;
        id
    }

    fn update(&mut self, _drawable: DrawableId, _style: &Style) {}

    fn destroy(&mut self, _drawable: DrawableId) {}
}

// =============================================================================
// Nodes
// =============================================================================

/// A child slot of a retained container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    /// The node is owned by its parent and freed with it.
    Owned(NodeId),
    /// Another component's retained root, referenced but not owned.
    Borrowed(ComponentId),
}

/// A persistent node.
#[derive(Debug)]
pub struct RetainedNode {
    pub kind: NodeKind,
    pub style: Style,
    pub rect: Rect,
    pub drawable: DrawableId,
    pub children: Vec<Child>,
}

/// Allocation counters, used to verify node identity across passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TreeStats {
    pub created: u64,
    pub destroyed: u64,
}

impl TreeStats {
    /// Nodes currently alive.
    pub fn live(&self) -> u64 {
        self.created - self.destroyed
    }
}

// =============================================================================
// Retained Tree
// =============================================================================

/// Arena of retained nodes for every component on one UI thread.
pub struct RetainedTree {
    nodes: SlotMap<NodeId, RetainedNode>,
    component_roots: SecondaryMap<ComponentId, NodeId>,
    backend: Box<dyn DrawableBackend>,
    stats: TreeStats,
}

impl fmt::Debug for RetainedTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RetainedTree")
            .field("nodes", &self.nodes.len())
            .field("components", &self.component_roots.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Default for RetainedTree {
    fn default() -> Self {
        Self::new(NullBackend::default())
    }
}

impl RetainedTree {
    pub fn new(backend: impl DrawableBackend + 'static) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            component_roots: SecondaryMap::new(),
            backend: Box::new(backend),
            stats: TreeStats::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Lookups
    // -------------------------------------------------------------------------

    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&RetainedNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut RetainedNode> {
        self.nodes.get_mut(id)
    }

    /// Like `node`, but a missing node is an invariant violation.
    pub fn expect_node(&self, id: NodeId) -> Result<&RetainedNode> {
        self.nodes.get(id).ok_or(CoreError::StaleNode(id))
    }

    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Children of `id`, or an empty slice if it is gone.
    pub fn children(&self, id: NodeId) -> &[Child] {
        self.nodes.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Resolved rect of `id` (zero if it is gone).
    pub fn rect(&self, id: NodeId) -> Rect {
        self.nodes.get(id).map(|n| n.rect).unwrap_or_default()
    }

    /// The node a child slot currently points at.
    ///
    /// A borrowed root whose component was unmounted resolves to `None`.
    pub fn resolve(&self, child: Child) -> Option<NodeId> {
        match child {
            Child::Owned(id) => self.nodes.contains_key(id).then_some(id),
            Child::Borrowed(component) => self
                .component_roots
                .get(component)
                .copied()
                .filter(|id| self.nodes.contains_key(*id)),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    // -------------------------------------------------------------------------
    // Component Roots
    // -------------------------------------------------------------------------

    pub fn register_component_root(&mut self, component: ComponentId, root: NodeId) {
        self.component_roots.insert(component, root);
    }

    pub fn unregister_component_root(&mut self, component: ComponentId) -> Option<NodeId> {
        self.component_roots.remove(component)
    }

    pub fn component_root(&self, component: ComponentId) -> Option<NodeId> {
        self.component_roots.get(component).copied()
    }

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Allocate a childless node.
    pub fn create_node(&mut self, kind: NodeKind, style: Style) -> NodeId {
        let drawable = self.backend.create(kind, &style);
        self.stats.created += 1;
        self.nodes.insert(RetainedNode {
            kind,
            style,
            rect: Rect::default(),
            drawable,
            children: Vec::new(),
        })
    }

    /// Append a child slot to `parent`.
    ///
    /// Returns `Ok(false)` (logged, tree unchanged) when `parent` is a leaf.
    pub fn append_child(&mut self, parent: NodeId, child: Child) -> Result<bool> {
        let node = self.nodes.get_mut(parent).ok_or(CoreError::StaleNode(parent))?;
        if node.kind.is_leaf() {
            error!(?parent, kind = ?node.kind, "cannot add a child to a leaf node");
            return Ok(false);
        }
        node.children.push(child);
        Ok(true)
    }

    /// Build a brand-new subtree from a description node.
    pub fn build_from_description(&mut self, desc: &DescTree, desc_id: DescId) -> NodeId {
        let d = desc.get(desc_id);
        let id = self.create_node(d.kind, d.style.clone());
        self.build_children(id, desc, desc_id);
        id
    }

    /// Append freshly built children for every child of `desc_id`.
    pub(crate) fn build_children(&mut self, parent: NodeId, desc: &DescTree, desc_id: DescId) {
        for &child in desc.children(desc_id) {
            let slot = match desc.get(child).component {
                Some(component) => Child::Borrowed(component),
                None => Child::Owned(self.build_from_description(desc, child)),
            };
            if let Some(node) = self.nodes.get_mut(parent) {
                node.children.push(slot);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Updates
    // -------------------------------------------------------------------------

    /// Replace a node's style in place.
    ///
    /// Returns true if anything visual changed. Callback-only differences are
    /// stored but not reported.
    pub fn refresh_style(&mut self, id: NodeId, style: &Style) -> Result<bool> {
        let node = self.nodes.get_mut(id).ok_or(CoreError::StaleNode(id))?;
        let changed = !node.style.visual_eq(style);
        node.style = style.clone();
        if changed {
            self.backend.update(node.drawable, &node.style);
        }
        Ok(changed)
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.rect = rect;
        }
    }

    // -------------------------------------------------------------------------
    // Destruction
    // -------------------------------------------------------------------------

    /// Free a node and every node it owns.
    pub fn destroy_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.remove(id) else {
            warn!(?id, "destroying a node that is already gone");
            return;
        };
        self.backend.destroy(node.drawable);
        self.stats.destroyed += 1;
        for child in node.children {
            if let Child::Owned(owned) = child {
                self.destroy_node(owned);
            }
        }
    }

    /// Free every owned child of `id` and clear its child list.
    pub fn destroy_children(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let children = std::mem::take(&mut node.children);
        trace!(?id, count = children.len(), "destroying children");
        for child in children {
            if let Child::Owned(owned) = child {
                self.destroy_node(owned);
            }
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Preorder search for the first node whose style id equals `id`.
    ///
    /// Follows borrowed roots as well as owned children.
    pub fn find_by_id(&self, root: NodeId, id: &str) -> Option<NodeId> {
        let mut visited: SecondaryMap<NodeId, ()> = SecondaryMap::new();
        let mut stack = vec![root];
        while let Some(current) = stack.pop() {
            if visited.insert(current, ()).is_some() {
                continue;
            }
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            if node.style.id.as_deref() == Some(id) {
                return Some(current);
            }
            // Push in reverse so the first child is visited first.
            for &child in node.children.iter().rev() {
                if let Some(resolved) = self.resolve(child) {
                    stack.push(resolved);
                }
            }
        }
        None
    }

    /// Path from `root` down to the deepest node containing the point.
    ///
    /// Later siblings win over earlier ones, matching paint order.
    pub fn hit_path(&self, root: NodeId, x: i32, y: i32) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = root;
        loop {
            let Some(node) = self.nodes.get(current) else {
                break;
            };
            if !node.rect.contains(x, y) {
                break;
            }
            path.push(current);
            let next = node
                .children
                .iter()
                .rev()
                .filter_map(|&c| self.resolve(c))
                .find(|&c| self.rect(c).contains(x, y));
            match next {
                Some(next) if !path.contains(&next) => current = next,
                _ => break,
            }
        }
        path
    }

    /// Deepest node containing the point.
    pub fn hit_test(&self, root: NodeId, x: i32, y: i32) -> Option<NodeId> {
        self.hit_path(root, x, y).last().copied()
    }

    /// Invoke the innermost `on_click` under the point.
    ///
    /// Returns the node whose callback ran.
    pub fn dispatch_click(&self, root: NodeId, x: i32, y: i32) -> Option<NodeId> {
        let path = self.hit_path(root, x, y);
        let (id, callback) = path.iter().rev().find_map(|&id| {
            let node = self.nodes.get(id)?;
            node.style.on_click.clone().map(|cb| (id, cb))
        })?;
        callback();
        Some(id)
    }

    /// Track hover transitions for the innermost node with an `on_hover`.
    ///
    /// `hovered` holds the previous target and is updated in place. Leave
    /// fires before enter.
    pub fn dispatch_hover(
        &self,
        root: NodeId,
        x: i32,
        y: i32,
        hovered: &mut Option<HoverTarget>,
    ) {
        let path = self.hit_path(root, x, y);
        let target = path.iter().rev().find_map(|&id| {
            let on_hover = self.nodes.get(id)?.style.on_hover.clone()?;
            Some(HoverTarget { node: id, on_hover })
        });

        let same = target.as_ref().map(|t| t.node) == hovered.as_ref().map(|t| t.node);
        if !same {
            if let Some(prev) = hovered.take() {
                prev.leave();
            }
            if let Some(next) = &target {
                (next.on_hover)(true);
            }
        }
        *hovered = target;
    }
}

/// The node under the pointer and the callback that saw it enter.
///
/// Holding the callback lets leave fire even after the node is destroyed.
#[derive(Clone)]
pub struct HoverTarget {
    pub node: NodeId,
    on_hover: HoverCallback,
}

impl HoverTarget {
    pub fn leave(self) {
        (self.on_hover)(false);
    }
}

impl fmt::Debug for HoverTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HoverTarget").field("node", &self.node).finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
