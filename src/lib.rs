//! # spark-core
//!
//! Retained tree, reconciler and constraint layout core for Spark UIs.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive state that can trigger rebuilds.
//!
//! ## Architecture
//!
//! Components describe themselves every pass into a throwaway Description
//! Tree. The reconciler folds that description into a persistent Retained
//! Tree, reusing nodes wherever the structure still matches, and the layout
//! engine assigns every retained node an integer-pixel `Rect`.
//!
//! ```text
//! Component::describe → DescTree → reconcile → RetainedTree → layout → Rects
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Core types (Rgba, Sizing, Edges, Rect, NodeKind, etc.)
//! - [`style`] - The per-node style descriptor
//! - [`engine`] - Description arena, retained tree, structural hash, reconciler
//! - [`layout`] - Measurement and distribution
//! - [`primitives`] - The declarative builder
//! - [`pipeline`] - Component runtime, stale handles, background tasks

pub mod engine;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod primitives;
pub mod style;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use error::{CoreError, Result};
pub use style::{ClickCallback, HoverCallback, Style};

pub use engine::{
    reconcile, reconcile_root, structural_hash, Child, ComponentId, DescId, DescNode, DescTree,
    DrawableBackend, DrawableId, HoverTarget, NodeId, NullBackend, RetainedNode, RetainedTree,
    TreeStats,
};

pub use layout::{
    layout_children, layout_root, min_height, min_width, FontMetrics, MonospaceMeasure,
    TextExtent, TextMeasure,
};

pub use primitives::Builder;

pub use pipeline::{
    spawn_task, watch, CancelToken, Cleanup, Component, Runtime, RuntimeConfig, StaleHandle,
    TaskHandle,
};
