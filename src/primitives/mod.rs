//! Primitives - the declarative building surface.
//!
//! - [`Builder`] - explicit context object with enter/leave/leaf
//!
//! Describe routines never touch tree objects directly. They call the
//! builder, and the runtime hands the finished Description Tree to the
//! reconciler.

mod builder;

pub use builder::Builder;
