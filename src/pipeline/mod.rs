//! Pipeline - component runtime and cross-thread wake plumbing.
//!
//! # Update Cycle
//!
//! ```text
//! StaleHandle::mark_stale ──unpark──► Runtime::wait returns
//!                                         │
//!                                         ▼
//!          describe(&mut Builder) → reconcile → layout_root
//! ```
//!
//! ## Key Design Principles
//!
//! - **One thread owns the tree**: the `Runtime` never shares its retained
//!   tree. Workers, timers and signal watchers only flip a stale flag.
//! - **Rebuild by component**: only components marked stale run `describe`.
//!   Everyone else's retained nodes are untouched.
//! - **Advisory cancellation**: a cancelled task simply never marks stale.

mod runtime;
mod task;
mod wake;
mod watch;

pub use runtime::{Component, Runtime, RuntimeConfig};
pub use task::{spawn_task, CancelToken, TaskHandle};
pub use wake::StaleHandle;
pub use watch::{watch, Cleanup};
