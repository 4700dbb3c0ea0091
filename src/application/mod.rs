//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement the
//! prediction use cases, and runs them off the async executor.

mod inference;
mod worker;

pub use inference::{ArtifactsHandle, InferenceError, InferenceService, Readiness};
pub use worker::{BlockingPool, PoolError};
