//! Bounded blocking pool for CPU-bound inference.
//!
//! Model invocation is synchronous. Running it on the async executor would
//! stall request intake, so handlers submit jobs here instead: a semaphore caps
//! how many run at once and each job executes on tokio's blocking threads.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Errors from submitting a job to the pool.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("inference pool is shut down")]
    Closed,

    #[error("inference task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Handle to the shared inference pool. Cheap to clone.
#[derive(Debug, Clone)]
pub struct BlockingPool {
    permits: Arc<Semaphore>,
}

impl BlockingPool {
    /// Create a pool running at most `capacity` jobs at once (minimum 1).
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Run `job` on a blocking thread once a slot is free.
    ///
    /// # Errors
    /// Returns `PoolError::Closed` if the pool was shut down while waiting,
    /// `PoolError::Join` if the job panicked.
    pub async fn run<F, T>(&self, job: F) -> Result<T, PoolError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| PoolError::Closed)?;

        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job()
        });
        Ok(handle.await?)
    }

    /// Stop accepting new jobs; waiting submissions fail with `Closed`.
    pub fn close(&self) {
        self.permits.close();
    }
}
