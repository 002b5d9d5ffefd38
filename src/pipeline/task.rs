//! Background tasks with advisory cancellation.
//!
//! A task runs on its own named thread and marks its component stale when
//! it returns. Cancellation is cooperative: the job polls its `CancelToken`,
//! and a cancelled task never marks anything stale.
//!
//! # Example
//!
//! ```ignore
//! let handle = runtime.stale_handle(weather)?;
//! let task = spawn_task("fetch-weather", handle, move |cancel| {
//!     let report = fetch();
//!     if !cancel.is_cancelled() {
//!         *shared.lock().unwrap() = report;
//!     }
//! })?;
//! ```

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::debug;

use super::wake::StaleHandle;

/// Read side of a task's cancelled flag.
#[derive(Debug, Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Owner side of a spawned task.
///
/// Dropping the handle detaches the thread; it is not cancelled.
#[derive(Debug)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl TaskHandle {
    /// Ask the task to stop. It will not mark its component stale.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Block until the task thread exits.
    pub fn join(mut self) -> thread::Result<()> {
        match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        }
    }
}

/// Run `job` on a worker thread named `name`.
pub fn spawn_task<F>(name: impl Into<String>, stale: StaleHandle, job: F) -> io::Result<TaskHandle>
where
    F: FnOnce(&CancelToken) + Send + 'static,
{
    let name = name.into();
    let cancelled = Arc::new(AtomicBool::new(false));
    let token = CancelToken(cancelled.clone());

    let handle = thread::Builder::new().name(name.clone()).spawn(move || {
        job(&token);
        if token.is_cancelled() {
            debug!(task = %name, "task cancelled, not marking stale");
        } else {
            stale.mark_stale();
        }
    })?;

    Ok(TaskHandle {
        cancelled,
        handle: Some(handle),
    })
}
