//! Wake - cross-thread "this component is stale" signaling.
//!
//! Uses `std::thread::park/unpark` so an idle UI thread burns no CPU:
//!
//! 1. UI thread calls `Runtime::wait()`, which parks until woken
//! 2. A worker calls `StaleHandle::mark_stale()`: flag store, then `unpark()`
//! 3. UI thread wakes, runs `Runtime::update()`, parks again
//!
//! Workers only ever flip atomics and unpark. The retained tree is never
//! touched off the UI thread.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, Thread};
use std::time::Duration;

use tracing::trace;

use crate::engine::ComponentId;

// =============================================================================
// Wake Flag
// =============================================================================

/// Shared "something is stale" flag plus the thread to unpark.
#[derive(Debug)]
pub(crate) struct WakeFlag {
    pending: AtomicBool,
    thread: Thread,
}

impl WakeFlag {
    /// Bind to the calling thread.
    pub(crate) fn current() -> Arc<Self> {
        Arc::new(Self {
            pending: AtomicBool::new(false),
            thread: thread::current(),
        })
    }

    pub(crate) fn wake(&self) {
        self.pending.store(true, Ordering::Release);
        self.thread.unpark();
    }

    /// Consume a pending wake, parking up to `timeout` if there is none.
    ///
    /// Returns true if a wake was consumed. Spurious unparks return false.
    pub(crate) fn wait(&self, timeout: Duration) -> bool {
        // May have been set before we parked.
        if self.pending.swap(false, Ordering::AcqRel) {
            return true;
        }
        thread::park_timeout(timeout);
        self.pending.swap(false, Ordering::AcqRel)
    }
}

// =============================================================================
// Stale Handle
// =============================================================================

/// Thread-safe handle that marks one component for rebuild.
///
/// Cheap to clone and `Send + Sync`; hand it to worker threads, timers or
/// signal watchers.
#[derive(Debug, Clone)]
pub struct StaleHandle {
    component: ComponentId,
    stale: Arc<AtomicBool>,
    wake: Arc<WakeFlag>,
}

impl StaleHandle {
    pub(crate) fn new(component: ComponentId, stale: Arc<AtomicBool>, wake: Arc<WakeFlag>) -> Self {
        Self {
            component,
            stale,
            wake,
        }
    }

    /// Flag the component and wake the UI thread.
    pub fn mark_stale(&self) {
        trace!(component = ?self.component, "marked stale");
        self.stale.store(true, Ordering::Release);
        self.wake.wake();
    }

    pub fn is_stale(&self) -> bool {
        self.stale.load(Ordering::Acquire)
    }

    pub fn component(&self) -> ComponentId {
        self.component
    }
}
