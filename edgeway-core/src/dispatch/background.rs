use std::future::Future;
use std::sync::{Mutex, PoisonError};
use tokio::task::JoinHandle;

/// Request-scoped registry of work that must outlive the response.
///
/// Each deferred future is spawned immediately onto the runtime, so it keeps
/// running even if this registry (or the request that owns it) is dropped.
/// `drain` lets the owner wait for completion once the response is out.
#[derive(Debug, Default)]
pub struct BackgroundWork {
    tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl BackgroundWork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defer<F>(&self, work: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(work);
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(handle);
    }

    /// Number of deferred tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|h| !h.is_finished())
            .count()
    }

    /// Wait for every deferred task registered so far.
    pub async fn drain(&self) {
        let handles = {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            std::mem::take(&mut *tasks)
        };

        for handle in handles {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "background task did not complete");
            }
        }
    }
}
