//! Measurement - minimum extents, bottom-up.
//!
//! | Node                 | Min along an axis                                  |
//! |----------------------|----------------------------------------------------|
//! | `Fixed` on that axis | explicit size, clamped                             |
//! | Text                 | unwrapped extent (height wraps at a Fixed width)   |
//! | Rect / Image         | explicit min                                       |
//! | Container            | Σ (main) or max (cross) of child min + margins,    |
//! |                      | plus own padding, clamped                          |
//!
//! Results depend only on styles, never on previously resolved rects, so a
//! cache stays valid for a whole layout call even while rects are written.
//! Distribution also parks width-dependent heights here, keyed by the width
//! they were measured at.

use rustc_hash::FxHashMap;
use slotmap::SecondaryMap;

use crate::engine::{NodeId, RetainedNode, RetainedTree};
use crate::types::{Axis, NodeKind, Sizing};
use super::text_measure::{FontMetrics, TextMeasure};

#[derive(Debug, Clone, Copy, Default)]
struct MinSize {
    width: Option<i32>,
    height: Option<i32>,
}

/// Memoizing min-size measurer, valid for one layout call.
pub(crate) struct Measurer<'a> {
    text: &'a dyn TextMeasure,
    cache: SecondaryMap<NodeId, MinSize>,
    heights: FxHashMap<(NodeId, i32), i32>,
}

impl<'a> Measurer<'a> {
    pub(crate) fn new(text: &'a dyn TextMeasure) -> Self {
        Self {
            text,
            cache: SecondaryMap::new(),
            heights: FxHashMap::default(),
        }
    }

    pub(crate) fn text(&self) -> &'a dyn TextMeasure {
        self.text
    }

    pub(crate) fn height_at(&self, id: NodeId, width: i32) -> Option<i32> {
        self.heights.get(&(id, width)).copied()
    }

    pub(crate) fn store_height_at(&mut self, id: NodeId, width: i32, height: i32) {
        self.heights.insert((id, width), height);
    }

    /// Minimum extent of `id` along `axis` (0 if the node is gone).
    pub(crate) fn min(&mut self, tree: &RetainedTree, id: NodeId, axis: Axis) -> i32 {
        if let Some(hit) = self.cache.get(id).and_then(|m| slot(m, axis)) {
            return hit;
        }
        let Some(node) = tree.node(id) else {
            return 0;
        };

        let value = match node.style.sizing(axis) {
            Sizing::Fixed => node.style.clamp(axis, node.style.explicit(axis)),
            _ => self.content_min(tree, node, axis),
        };

        let entry = self.cache.entry(id).map(|e| e.or_default());
        if let Some(entry) = entry {
            match axis {
                Axis::Horizontal => entry.width = Some(value),
                Axis::Vertical => entry.height = Some(value),
            }
        }
        value
    }

    fn content_min(&mut self, tree: &RetainedTree, node: &RetainedNode, axis: Axis) -> i32 {
        let style = &node.style;
        match node.kind {
            NodeKind::Text => {
                let content = style.text.as_deref().unwrap_or("");
                let wrap_at = (axis == Axis::Vertical
                    && style.wrap
                    && style.width_sizing == Sizing::Fixed)
                    .then(|| style.clamp(Axis::Horizontal, style.width));
                let extent = self.text.measure(content, wrap_at, FontMetrics::of(style));
                let raw = match axis {
                    Axis::Horizontal => extent.width,
                    Axis::Vertical => extent.height,
                };
                style.clamp(axis, raw)
            }
            NodeKind::Rect | NodeKind::Image => style.clamp(axis, style.min(axis)),
            NodeKind::Container => {
                let main = style.flow.axis();
                let mut total = 0;
                for &child in &node.children {
                    let Some(child_id) = tree.resolve(child) else {
                        continue;
                    };
                    let margin = tree
                        .node(child_id)
                        .map_or(0, |n| n.style.margin.sum(axis));
                    let extent = self.min(tree, child_id, axis) + margin;
                    if axis == main {
                        total += extent;
                    } else {
                        total = total.max(extent);
                    }
                }
                style.clamp(axis, total + style.padding.sum(axis))
            }
        }
    }
}

fn slot(m: &MinSize, axis: Axis) -> Option<i32> {
    match axis {
        Axis::Horizontal => m.width,
        Axis::Vertical => m.height,
    }
}

/// Minimum width of `node`.
pub fn min_width(tree: &RetainedTree, node: NodeId, measure: &dyn TextMeasure) -> i32 {
    Measurer::new(measure).min(tree, node, Axis::Horizontal)
}

/// Minimum height of `node`.
pub fn min_height(tree: &RetainedTree, node: NodeId, measure: &dyn TextMeasure) -> i32 {
    Measurer::new(measure).min(tree, node, Axis::Vertical)
}

// =============================================================================
// Tests
// =============================================================================
