//! Structural Hash - the reconciler's cheap equality proxy.
//!
//! Two nodes with the same kind, payload and layout-relevant style fields hash
//! equal. Deliberately lossy:
//!
//! - callbacks and ids are not hashed at all
//! - text color enters as the sum of its channels
//! - border, radius, wrap and justification are left out
//!
//! Whatever the hash misses is picked up by the in-place style refresh when the
//! reconciler recurses into a matching pair.

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;

use crate::error::{CoreError, Result};
use crate::style::Style;
use crate::types::NodeKind;
use super::description::{DescId, DescTree};
use super::retained::{Child, ComponentId, RetainedTree};

const ELEMENT_TAG: u8 = 0;
const BORROWED_TAG: u8 = 1;

/// Hash a string payload.
#[inline]
pub fn content_hash(content: &str) -> u64 {
    let mut hasher = FxHasher::default();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Hash an element node (anything that is not an embedded component root).
pub fn structural_hash(kind: NodeKind, style: &Style) -> u64 {
    let mut h = FxHasher::default();
    ELEMENT_TAG.hash(&mut h);
    (kind as u8).hash(&mut h);

    style.text.as_deref().map(content_hash).hash(&mut h);
    style.image.as_deref().map(content_hash).hash(&mut h);

    (style.width_sizing as u8).hash(&mut h);
    (style.height_sizing as u8).hash(&mut h);
    style.width.hash(&mut h);
    style.height.hash(&mut h);
    style.min_width.hash(&mut h);
    style.min_height.hash(&mut h);
    style.max_width.hash(&mut h);
    style.max_height.hash(&mut h);
    style.margin.hash(&mut h);
    style.padding.hash(&mut h);

    style.font_size.hash(&mut h);
    style.line_height.hash(&mut h);
    style.text_color.channel_sum().hash(&mut h);
    (style.flow as u8).hash(&mut h);
    style.background.packed().hash(&mut h);

    h.finish()
}

/// Hash a slot that borrows another component's root.
pub fn borrowed_hash(component: ComponentId) -> u64 {
    let mut h = FxHasher::default();
    BORROWED_TAG.hash(&mut h);
    component.hash(&mut h);
    h.finish()
}

/// Hash of a description node as the reconciler sees it.
pub fn desc_hash(desc: &DescTree, id: DescId) -> u64 {
    let node = desc.get(id);
    match node.component {
        Some(component) => borrowed_hash(component),
        None => structural_hash(node.kind, &node.style),
    }
}

/// Hash of a retained child slot.
///
/// An owned handle that no longer resolves is an invariant violation.
pub fn child_hash(tree: &RetainedTree, child: Child) -> Result<u64> {
    match child {
        Child::Owned(id) => {
            let node = tree.node(id).ok_or(CoreError::StaleNode(id))?;
            Ok(structural_hash(node.kind, &node.style))
        }
        Child::Borrowed(component) => Ok(borrowed_hash(component)),
    }
}

// =============================================================================
// Tests
// =============================================================================
