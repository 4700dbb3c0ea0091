use std::sync::Arc;

use crate::application::{ArtifactsHandle, BlockingPool, InferenceService};

/// Shared state handed to every request handler.
pub struct AppState {
    pub service: Arc<InferenceService>,
    pub pool: BlockingPool,
}

impl AppState {
    pub fn new(artifacts: ArtifactsHandle, max_inflight: usize) -> Self {
        Self {
            service: Arc::new(InferenceService::new(artifacts)),
            pool: BlockingPool::new(max_inflight),
        }
    }
}
