//! Engine - description arena, retained tree and reconciler.
//!
//! Two trees live side by side:
//!
//! - **Description Tree**: rebuilt from scratch every pass by a component's
//!   describe routine, then thrown away.
//! - **Retained Tree**: persistent nodes that survive across passes and carry
//!   the resolved `Rect` of every element.
//!
//! The reconciler walks both level by level and decides, per sibling group,
//! whether the retained children can be reused or must be rebuilt.
//!
//! ```text
//! describe() ──► DescTree ──reconcile()──► RetainedTree ──layout──► Rects
//!                 (per pass)                (persistent)
//! ```

mod description;
mod hash;
mod reconcile;
mod retained;

pub use description::*;
pub use hash::*;
pub use reconcile::*;
pub use retained::*;
