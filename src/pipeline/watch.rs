//! Signal watching - rebuild a component when reactive state changes.
//!
//! Bridges spark-signals into the stale/wake pipeline: an effect reads the
//! signal (creating the dependency) and marks the component stale on every
//! change after the first run.

use std::cell::Cell;

use spark_signals::{effect, Signal};

use super::wake::StaleHandle;

/// Cleanup function returned by `watch`.
pub type Cleanup = Box<dyn FnOnce()>;

/// Mark `handle`'s component stale whenever `signal` changes.
///
/// Call the returned cleanup to stop watching.
pub fn watch<T>(signal: &Signal<T>, handle: StaleHandle) -> Cleanup
where
    T: Clone + PartialEq + 'static,
{
    let signal = signal.clone();
    let primed = Cell::new(false);

    let stop = effect(move || {
        let _ = signal.get();
        // The effect runs once on creation; that is not a change.
        if primed.replace(true) {
            handle.mark_stale();
        }
    });

    Box::new(stop)
}
