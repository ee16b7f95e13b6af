use std::future::Future;
use tokio::task::JoinHandle;

/// Handle for a registered change listener
///
/// Owns the task forwarding changes to the listener. Dropping the handle
/// cancels the subscription as well.
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    pub(crate) fn spawn<F>(forward: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        Self {
            task: tokio::spawn(forward),
        }
    }

    /// Stops delivery; no final event is synthesized
    pub fn cancel(self) {
        self.task.abort();
    }

    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
