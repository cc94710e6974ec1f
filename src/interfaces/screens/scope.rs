//! Task scope bound to a screen's lifetime

use std::future::Future;

use tokio::task::JoinSet;
use tracing::{debug, warn};

use super::ScreenId;

/// Owns the background tasks started by one screen.
///
/// Dropping the scope aborts whatever is still running, so no task outlives
/// the screen that started it.
pub struct ScreenScope<T: 'static> {
    screen: ScreenId,
    tasks: JoinSet<T>,
}

impl<T: Send + 'static> ScreenScope<T> {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            tasks: JoinSet::new(),
        }
    }

    pub fn screen(&self) -> ScreenId {
        self.screen
    }

    pub fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.tasks.spawn(task);
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Next finished task output; `None` once the scope is empty
    pub async fn next(&mut self) -> Option<T> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(value) => return Some(value),
                Err(e) if e.is_cancelled() => debug!("{:?} task cancelled", self.screen),
                Err(e) => warn!("{:?} task failed: {}", self.screen, e),
            }
        }
        None
    }

    /// Wait for every task and collect the outputs in completion order
    pub async fn join_all(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.tasks.len());
        while let Some(value) = self.next().await {
            out.push(value);
        }
        out
    }

    /// Abort every running task
    pub fn cancel(&mut self) {
        if !self.tasks.is_empty() {
            debug!("Cancelling {} task(s) of {:?}", self.tasks.len(), self.screen);
        }
        self.tasks.abort_all();
    }
}

impl<T: 'static> Drop for ScreenScope<T> {
    fn drop(&mut self) {
        self.tasks.abort_all();
    }
}
