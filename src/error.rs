//! Error types.
//!
//! Only invariant violations are errors. Usage misuse (adding a child to a
//! leaf, leaving a container that was never entered) is logged and ignored,
//! and degenerate numeric input is clamped by the layout engine.

use crate::engine::{ComponentId, NodeId};

/// A programmer-contract violation. Aborts the current update pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A node handle that was freed (or never belonged to this tree).
    #[error("stale node handle {0:?}")]
    StaleNode(NodeId),

    /// An operation that needs a root ran before one exists.
    #[error("no root: {0}")]
    MissingRoot(&'static str),

    /// A component handle that is not mounted in this runtime.
    #[error("unknown component {0:?}")]
    UnknownComponent(ComponentId),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CoreError>;
