//! Layout - integer-pixel constraint layout over the retained tree.
//!
//! Two phases per container:
//!
//! 1. **Measurement** (bottom-up, memoized per call): the minimum extent of
//!    every node along each axis.
//! 2. **Distribution** (top-down): Fixed and FitContent children take their
//!    size, FillRemaining children share the rest exactly, then a cursor
//!    places everything in flow order.
//!
//! # Example
//!
//! ```ignore
//! use spark_core::layout::{layout_root, MonospaceMeasure};
//!
//! let measure = MonospaceMeasure::default();
//! layout_root(&mut tree, root, Rect::new(0, 0, 800, 600), &measure)?;
//! let rect = tree.rect(root);
//! ```

mod distribute;
mod measure;
mod text_measure;

pub use distribute::{layout_children, layout_root};
pub use measure::{min_height, min_width};
pub use text_measure::*;
