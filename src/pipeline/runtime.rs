//! Runtime - owns the retained tree and drives describe → reconcile → layout.
//!
//! Everything here runs on the thread that created the `Runtime`. Other
//! threads reach it only through `StaleHandle`.
//!
//! # Example
//!
//! ```ignore
//! use spark_core::pipeline::{Component, Runtime, RuntimeConfig};
//!
//! let mut rt = Runtime::new(RuntimeConfig::default());
//! let app = rt.mount(App::default());
//! rt.set_root(app)?;
//!
//! loop {
//!     rt.update()?;
//!     rt.wait(Duration::from_millis(16));
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use slotmap::SlotMap;
use tracing::{debug, error, trace};

use crate::engine::{
    reconcile_root, ComponentId, DrawableBackend, HoverTarget, NodeId, NullBackend, RetainedTree,
};
use crate::error::{CoreError, Result};
use crate::layout::{layout_root, MonospaceMeasure, TextMeasure};
use crate::primitives::Builder;
use crate::types::Rect;
use super::wake::{StaleHandle, WakeFlag};

// =============================================================================
// Component
// =============================================================================

/// A unit of UI that can describe itself.
///
/// `describe` is called on every rebuild and must emit exactly one
/// top-level node.
pub trait Component {
    fn describe(&self, ui: &mut Builder);
}

impl<F: Fn(&mut Builder)> Component for F {
    fn describe(&self, ui: &mut Builder) {
        self(ui)
    }
}

// =============================================================================
// Config
// =============================================================================

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Rect the root component is laid out against.
    pub viewport: Rect,
    /// Monospace cell advance as a percentage of font size.
    pub advance_percent: i32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            viewport: Rect::new(0, 0, 800, 600),
            advance_percent: 60,
        }
    }
}

// =============================================================================
// Runtime
// =============================================================================

struct Mounted {
    component: Box<dyn Component>,
    root: Option<NodeId>,
    stale: Arc<AtomicBool>,
}

pub struct Runtime {
    viewport: Rect,
    tree: RetainedTree,
    builder: Builder,
    components: SlotMap<ComponentId, Mounted>,
    root: Option<ComponentId>,
    measure: Box<dyn TextMeasure>,
    wake: Arc<WakeFlag>,
    hovered: Option<HoverTarget>,
    needs_layout: bool,
}

impl Runtime {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_backend(config, NullBackend::default())
    }

    pub fn with_backend(config: RuntimeConfig, backend: impl DrawableBackend + 'static) -> Self {
        Self {
            viewport: config.viewport,
            tree: RetainedTree::new(backend),
            builder: Builder::new(),
            components: SlotMap::with_key(),
            root: None,
            measure: Box::new(MonospaceMeasure::new(config.advance_percent)),
            wake: WakeFlag::current(),
            hovered: None,
            needs_layout: true,
        }
    }

    /// Replace the text measurer.
    pub fn set_measure(&mut self, measure: impl TextMeasure + 'static) {
        self.measure = Box::new(measure);
        self.needs_layout = true;
    }

    pub fn tree(&self) -> &RetainedTree {
        &self.tree
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        if viewport != self.viewport {
            self.viewport = viewport;
            self.needs_layout = true;
        }
    }

    // -------------------------------------------------------------------------
    // Components
    // -------------------------------------------------------------------------

    /// Register a component. It is built on the next `update`.
    pub fn mount(&mut self, component: impl Component + 'static) -> ComponentId {
        let id = self.components.insert(Mounted {
            component: Box::new(component),
            root: None,
            stale: Arc::new(AtomicBool::new(true)),
        });
        debug!(?id, "component mounted");
        id
    }

    /// Tear a component down along with every node it owns.
    pub fn unmount(&mut self, id: ComponentId) -> Result<()> {
        let mounted = self.components.remove(id).ok_or(CoreError::UnknownComponent(id))?;
        self.tree.unregister_component_root(id);
        if let Some(root) = mounted.root {
            self.tree.destroy_node(root);
        }
        self.release_destroyed_hover();
        if self.root == Some(id) {
            self.root = None;
        }
        self.needs_layout = true;
        debug!(?id, "component unmounted");
        Ok(())
    }

    /// Choose the component laid out against the viewport.
    pub fn set_root(&mut self, id: ComponentId) -> Result<()> {
        if !self.components.contains_key(id) {
            return Err(CoreError::UnknownComponent(id));
        }
        self.root = Some(id);
        self.needs_layout = true;
        Ok(())
    }

    /// Retained root node of a component, once built.
    pub fn component_root(&self, id: ComponentId) -> Option<NodeId> {
        self.components.get(id).and_then(|m| m.root)
    }

    pub fn stale_handle(&self, id: ComponentId) -> Result<StaleHandle> {
        let mounted = self.components.get(id).ok_or(CoreError::UnknownComponent(id))?;
        Ok(StaleHandle::new(id, mounted.stale.clone(), self.wake.clone()))
    }

    /// Mark a component for rebuild from the UI thread.
    pub fn mark_stale(&mut self, id: ComponentId) -> Result<()> {
        let mounted = self.components.get(id).ok_or(CoreError::UnknownComponent(id))?;
        mounted.stale.store(true, Ordering::Release);
        Ok(())
    }

    pub fn is_stale(&self, id: ComponentId) -> bool {
        self.components
            .get(id)
            .is_some_and(|m| m.stale.load(Ordering::Acquire))
    }

    // -------------------------------------------------------------------------
    // Update cycle
    // -------------------------------------------------------------------------

    /// Park until a `StaleHandle` fires or `timeout` elapses.
    ///
    /// Returns true if woken by a stale mark.
    pub fn wait(&self, timeout: Duration) -> bool {
        self.wake.wait(timeout)
    }

    /// Rebuild every stale component, then lay out the root.
    ///
    /// Returns true if anything visible changed. An invariant violation
    /// aborts the cycle; the tree is not rolled back.
    pub fn update(&mut self) -> Result<bool> {
        let stale: Vec<ComponentId> = self
            .components
            .iter()
            .filter(|(_, m)| m.stale.swap(false, Ordering::AcqRel))
            .map(|(id, _)| id)
            .collect();

        let mut changed = false;
        for id in stale {
            changed |= self.rebuild(id)?;
        }
        self.release_destroyed_hover();

        if changed || self.needs_layout {
            self.layout()?;
        }
        Ok(changed)
    }

    /// Lay out the root component against the viewport.
    pub fn layout(&mut self) -> Result<()> {
        let Some(root) = self.root else {
            trace!("no root component, skipping layout");
            return Ok(());
        };
        let node = self
            .component_root(root)
            .ok_or(CoreError::MissingRoot("root component has no retained tree"))?;
        layout_root(&mut self.tree, node, self.viewport, &*self.measure)?;
        self.needs_layout = false;
        Ok(())
    }

    fn rebuild(&mut self, id: ComponentId) -> Result<bool> {
        let mounted = self.components.get(id).ok_or(CoreError::UnknownComponent(id))?;
        mounted.component.describe(&mut self.builder);

        let Some(desc) = self.builder.finish() else {
            error!(?id, "component described nothing, keeping previous tree");
            return Ok(false);
        };
        let Some(desc_root) = desc.root() else {
            return Ok(false);
        };

        let result = match mounted.root {
            Some(root) => reconcile_root(&mut self.tree, root, &desc, desc_root),
            None => Ok((self.tree.build_from_description(&desc, desc_root), true)),
        };
        self.builder.recycle(desc);
        let (root, changed) = result?;

        self.tree.register_component_root(id, root);
        if let Some(m) = self.components.get_mut(id) {
            m.root = Some(root);
        }
        debug!(?id, changed, nodes = self.tree.len(), "component rebuilt");
        Ok(changed)
    }

    // -------------------------------------------------------------------------
    // Queries and pointer input
    // -------------------------------------------------------------------------

    fn root_node(&self) -> Option<NodeId> {
        self.root.and_then(|id| self.component_root(id))
    }

    /// Search the root component's tree by style id.
    pub fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(self.root_node()?, id)
    }

    /// Deliver a click. Returns the node whose callback ran.
    pub fn click(&self, x: i32, y: i32) -> Option<NodeId> {
        self.tree.dispatch_click(self.root_node()?, x, y)
    }

    /// Deliver a pointer move, firing hover enter/leave.
    pub fn hover(&mut self, x: i32, y: i32) {
        if let Some(root) = self.root_node() {
            self.tree.dispatch_hover(root, x, y, &mut self.hovered);
        }
    }

    /// Node currently under the pointer, if it has an `on_hover`.
    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered.as_ref().map(|t| t.node)
    }

    /// Fire leave for a hover target that no longer exists.
    fn release_destroyed_hover(&mut self) {
        let gone = self
            .hovered
            .as_ref()
            .is_some_and(|t| !self.tree.contains(t.node));
        if let Some(target) = self.hovered.take_if(|_| gone) {
            trace!(node = ?target.node, "hovered node destroyed");
            target.leave();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
