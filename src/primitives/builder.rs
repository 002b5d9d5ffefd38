//! Declarative Builder - the stack-based surface describe routines call.
//!
//! Entering a container pushes a description node and makes it the append
//! target, leaving pops it, and leaves are appended to whatever container is
//! on top. The builder is a plain value passed by `&mut`, so independent
//! trees never share state.
//!
//! # Example
//!
//! ```ignore
//! use spark_core::primitives::Builder;
//! use spark_core::{Style, Edges};
//!
//! let mut ui = Builder::new();
//! ui.container(Style::column().fill().padding(Edges::all(8)), |ui| {
//!     ui.text("Title", Style::default().font(24, 0));
//!     ui.container(Style::row().fill_width(), |ui| {
//!         ui.rect(Style::default().fixed(16, 16));
//!         ui.text("Body", Style::default().fill_width());
//!     });
//! });
//! let tree = ui.finish();
//! ```
//!
//! # Misuse
//!
//! Nothing here panics. A `leave` with nothing open, a second top-level
//! node, or a `finish` with an empty tree is logged with `tracing::error!`
//! and ignored.

use std::rc::Rc;

use tracing::{error, warn};

use crate::engine::{ComponentId, DescId, DescNode, DescTree};
use crate::style::Style;
use crate::types::NodeKind;

/// Explicit context object for building one Description Tree.
#[derive(Debug, Default)]
pub struct Builder {
    tree: DescTree,
    stack: Vec<DescId>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Hand a consumed tree back so its storage is reused next pass.
    pub fn recycle(&mut self, mut tree: DescTree) {
        if self.tree.is_empty() && self.stack.is_empty() {
            tree.clear();
            self.tree = tree;
        }
    }

    // -------------------------------------------------------------------------
    // Core operations
    // -------------------------------------------------------------------------

    /// Open a container. Its children are everything added until `leave`.
    pub fn enter(&mut self, style: Style) -> DescId {
        let id = self.tree.alloc(DescNode::new(NodeKind::Container, style));
        self.attach(id);
        self.stack.push(id);
        id
    }

    /// Close the innermost open container.
    pub fn leave(&mut self) {
        if self.stack.pop().is_none() {
            error!("leave() called with no open container");
        }
    }

    /// Append a childless node to the open container.
    ///
    /// With nothing open, the leaf becomes the root if there is none yet.
    pub fn leaf(&mut self, kind: NodeKind, style: Style) -> DescId {
        let id = self.tree.alloc(DescNode::new(kind, style));
        self.attach(id);
        id
    }

    /// Graft another component's retained root in at this position.
    pub fn embed(&mut self, component: ComponentId) -> Option<DescId> {
        let Some(&parent) = self.stack.last() else {
            error!(?component, "embed() needs an open container");
            return None;
        };
        let mut node = DescNode::new(NodeKind::Container, Style::default());
        node.component = Some(component);
        let id = self.tree.alloc(node);
        self.tree.push_child(parent, id);
        Some(id)
    }

    /// Take the finished tree, leaving the builder empty.
    pub fn finish(&mut self) -> Option<DescTree> {
        if !self.stack.is_empty() {
            warn!(open = self.stack.len(), "finish() with unclosed containers");
            self.stack.clear();
        }
        if self.tree.root().is_none() {
            error!("finish() called before any node was built");
            self.tree.clear();
            return None;
        }
        Some(std::mem::take(&mut self.tree))
    }

    fn attach(&mut self, id: DescId) {
        match self.stack.last() {
            Some(&parent) => {
                self.tree.push_child(parent, id);
            }
            None if self.tree.root().is_none() => self.tree.set_root(id),
            None => error!(node = id.index(), "a tree may only have one top-level node"),
        }
    }

    // -------------------------------------------------------------------------
    // Convenience
    // -------------------------------------------------------------------------

    /// `enter`, run `children`, `leave`.
    pub fn container(&mut self, style: Style, children: impl FnOnce(&mut Builder)) -> DescId {
        let id = self.enter(style);
        children(self);
        self.leave();
        id
    }

    pub fn text(&mut self, content: impl Into<Rc<str>>, style: Style) -> DescId {
        self.leaf(NodeKind::Text, style.text(content))
    }

    pub fn rect(&mut self, style: Style) -> DescId {
        self.leaf(NodeKind::Rect, style)
    }

    pub fn image(&mut self, path: impl Into<Rc<str>>, style: Style) -> DescId {
        self.leaf(NodeKind::Image, style.image(path))
    }
}

// =============================================================================
// Tests
// =============================================================================
