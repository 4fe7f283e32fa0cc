//! Keyed task manager with latest-wins replacement
//!
//! Spawning under a key cancels whatever is already running under that key.
//! Cancellation is delivered first as a message (the task's
//! [`CancellationToken`]) so the task can abandon its work cleanly; the tokio
//! abort handle is the backstop for tasks that never look at the token.
//!
//! ```ignore
//! let mut tasks = TaskManager::new();
//!
//! // A second press while the first prompt is open replaces it
//! tasks.spawn("location", move |token| async move {
//!     tokio::select! {
//!         _ = token.cancelled() => {}
//!         _ = controller.request_location() => {}
//!     }
//! });
//!
//! // Screen teardown
//! tasks.cancel_all();
//! ```

use std::collections::HashMap;
use std::future::Future;

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Identifies a task for cancellation and replacement.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TaskKey(String);

impl TaskKey {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for TaskKey {
    fn from(s: &'static str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TaskKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

struct RunningTask {
    token: CancellationToken,
    abort: AbortHandle,
}

impl RunningTask {
    fn stop(self) {
        self.token.cancel();
        self.abort.abort();
    }
}

/// Registry of running tasks by key.
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<TaskKey, RunningTask>,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a task, cancelling any existing task with the same key.
    ///
    /// `task` receives the token that will be cancelled when the task is
    /// replaced or cancelled.
    pub fn spawn<F, Fut>(&mut self, key: impl Into<TaskKey>, task: F) -> &mut Self
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let key = key.into();
        self.cancel(&key);

        let token = CancellationToken::new();
        let future = task(token.clone());
        let handle = tokio::spawn(future);

        debug!(task = key.name(), "spawned");
        self.tasks.insert(
            key,
            RunningTask {
                token,
                abort: handle.abort_handle(),
            },
        );
        self
    }

    /// Cancel a task by key. No-op if nothing runs under `key`.
    pub fn cancel(&mut self, key: &TaskKey) {
        if let Some(task) = self.tasks.remove(key) {
            debug!(task = key.name(), "cancelled");
            task.stop();
        }
    }

    /// Cancel all running tasks.
    pub fn cancel_all(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.stop();
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
