//! Reconciler - mutate a retained subtree to match a fresh description.
//!
//! Applied level by level:
//!
//! 1. Child counts differ: every child is destroyed and the list is rebuilt
//!    from the description.
//! 2. Counts match but any positional pair hashes differently: same thing,
//!    the whole sibling group is rebuilt (not just the mismatching slot).
//! 3. Every pair matches: recurse into each owned pair.
//!
//! The node being reconciled keeps its identity in every case. Its style is
//! refreshed in place, and a visual difference counts as a change.
//!
//! A failed pass is not rolled back. If an invariant violation surfaces
//! half-way through a rebuild, the old children are already gone.

use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use super::description::{DescId, DescTree};
use super::hash::{child_hash, desc_hash, structural_hash};
use super::retained::{Child, NodeId, RetainedTree};

/// Reconcile `node` against `desc_id`. Returns true if anything visible changed.
pub fn reconcile(
    tree: &mut RetainedTree,
    node: NodeId,
    desc: &DescTree,
    desc_id: DescId,
) -> Result<bool> {
    let d = desc.get(desc_id);
    let mut changed = tree.refresh_style(node, &d.style)?;

    let retained_count = tree.expect_node(node)?.children.len();
    if retained_count != d.children.len() {
        debug!(
            ?node,
            old = retained_count,
            new = d.children.len(),
            "child count changed, rebuilding children"
        );
        rebuild_children(tree, node, desc, desc_id);
        return Ok(true);
    }

    for (i, &dc) in d.children.iter().enumerate() {
        let rc = tree.children(node)[i];
        if child_hash(tree, rc)? != desc_hash(desc, dc) {
            debug!(?node, index = i, "child hash mismatch, rebuilding children");
            rebuild_children(tree, node, desc, desc_id);
            return Ok(true);
        }
    }

    for (i, &dc) in d.children.iter().enumerate() {
        let slot = tree.children(node)[i];
        match slot {
            Child::Owned(child) => changed |= reconcile(tree, child, desc, dc)?,
            // The embedded component reconciles its own root.
            Child::Borrowed(_) => {}
        }
    }

    if !changed {
        trace!(?node, "subtree reused unchanged");
    }
    Ok(changed)
}

/// Reconcile a component root, replacing the root node itself if its own
/// hash no longer matches.
///
/// Returns the (possibly new) root handle and whether anything changed.
pub fn reconcile_root(
    tree: &mut RetainedTree,
    root: NodeId,
    desc: &DescTree,
    desc_id: DescId,
) -> Result<(NodeId, bool)> {
    let node = tree.node(root).ok_or(CoreError::StaleNode(root))?;
    if structural_hash(node.kind, &node.style) != desc_hash(desc, desc_id) {
        // A different root shape cannot be patched in place.
        debug!(?root, "root hash mismatch, rebuilding root");
        let fresh = tree.build_from_description(desc, desc_id);
        tree.destroy_node(root);
        return Ok((fresh, true));
    }
    let changed = reconcile(tree, root, desc, desc_id)?;
    Ok((root, changed))
}

fn rebuild_children(tree: &mut RetainedTree, node: NodeId, desc: &DescTree, desc_id: DescId) {
    tree.destroy_children(node);
    tree.build_children(node, desc, desc_id);
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::description::DescNode;
    use crate::style::Style;
    use crate::types::{NodeKind, Rgba};

    /// column [ text "a", text "b" (color), row [ rect ] ]
    fn describe(color: Rgba, extra: bool) -> DescTree {
        let mut desc = DescTree::new();
        let root = desc.alloc(DescNode::new(NodeKind::Container, Style::column()));
        let a = desc.alloc(DescNode::new(NodeKind::Text, Style::default().text("a")));
        let b = desc.alloc(DescNode::new(
            NodeKind::Text,
            Style::default().text("b").text_color(color),
        ));
        let row = desc.alloc(DescNode::new(NodeKind::Container, Style::row()));
        let rect = desc.alloc(DescNode::new(NodeKind::Rect, Style::default().fixed(4, 4)));
        desc.push_child(root, a);
        desc.push_child(root, b);
        desc.push_child(root, row);
        desc.push_child(row, rect);
        if extra {
            let more = desc.alloc(DescNode::new(NodeKind::Rect, Style::default()));
            desc.push_child(row, more);
        }
        desc.set_root(root);
        desc
    }

    fn setup(desc: &DescTree) -> (RetainedTree, NodeId) {
        let mut tree = RetainedTree::default();
        let root = tree.build_from_description(desc, desc.root().unwrap());
        (tree, root)
    }

    fn owned(tree: &RetainedTree, node: NodeId) -> Vec<NodeId> {
        tree.children(node)
            .iter()
            .filter_map(|c| match c {
                Child::Owned(id) => Some(*id),
                Child::Borrowed(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_identical_description_is_noop() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);
        let before = owned(&tree, root);
        let stats = tree.stats();

        let second = describe(Rgba::RED, false);
        let changed = reconcile(&mut tree, root, &second, second.root().unwrap()).unwrap();

        assert!(!changed);
        assert_eq!(owned(&tree, root), before);
        assert_eq!(tree.stats(), stats);
    }

    /// Same channel sum, so the hash holds and the text is refreshed in place.
    /// Only equal-sum recolors are guaranteed to stay in place.
    #[test]
    fn test_recolor_updates_in_place() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);
        let before = owned(&tree, root);

        let second = describe(Rgba::BLUE, false);
        let changed = reconcile(&mut tree, root, &second, second.root().unwrap()).unwrap();

        assert!(changed);
        assert_eq!(owned(&tree, root), before);
        assert_eq!(tree.node(before[1]).unwrap().style.text_color, Rgba::BLUE);
    }

    #[test]
    fn test_recolor_with_different_sum_rebuilds_siblings() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);
        let before = owned(&tree, root);

        let second = describe(Rgba::WHITE, false);
        assert!(reconcile(&mut tree, root, &second, second.root().unwrap()).unwrap());

        let after = owned(&tree, root);
        assert_eq!(after.len(), 3);
        assert!(after.iter().all(|id| !before.contains(id)));
    }

    #[test]
    fn test_extra_child_rebuilds_only_that_level() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);
        let before = owned(&tree, root);
        let row = before[2];
        let old_rect = owned(&tree, row)[0];

        let second = describe(Rgba::RED, true);
        assert!(reconcile(&mut tree, root, &second, second.root().unwrap()).unwrap());

        assert_eq!(owned(&tree, root), before);
        let row_children = owned(&tree, row);
        assert_eq!(row_children.len(), 2);
        assert!(!tree.contains(old_rect));
        assert_eq!(tree.stats().destroyed, 1);
    }

    #[test]
    fn test_callback_only_change_is_silent() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);

        let mut second = DescTree::new();
        let r = second.alloc(DescNode::new(NodeKind::Container, Style::column().on_click(|| {})));
        let a = second.alloc(DescNode::new(NodeKind::Text, Style::default().text("a")));
        let b = second.alloc(DescNode::new(
            NodeKind::Text,
            Style::default().text("b").text_color(Rgba::RED),
        ));
        let row = second.alloc(DescNode::new(NodeKind::Container, Style::row()));
        let rect = second.alloc(DescNode::new(NodeKind::Rect, Style::default().fixed(4, 4)));
        second.push_child(r, a);
        second.push_child(r, b);
        second.push_child(r, row);
        second.push_child(row, rect);

        assert!(!reconcile(&mut tree, root, &second, r).unwrap());
        assert!(tree.node(root).unwrap().style.on_click.is_some());
    }

    #[test]
    fn test_stale_root_is_error() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);
        tree.destroy_node(root);

        let err = reconcile(&mut tree, root, &first, first.root().unwrap()).unwrap_err();
        assert_eq!(err, CoreError::StaleNode(root));
    }

    #[test]
    fn test_reconcile_root_replaces_mismatched_root() {
        let first = describe(Rgba::RED, false);
        let (mut tree, root) = setup(&first);

        let mut second = DescTree::new();
        let r = second.alloc(DescNode::new(NodeKind::Container, Style::row()));
        second.set_root(r);

        let (new_root, changed) = reconcile_root(&mut tree, root, &second, r).unwrap();
        assert!(changed);
        assert_ne!(new_root, root);
        assert!(!tree.contains(root));
        assert_eq!(tree.len(), 1);
    }
}
