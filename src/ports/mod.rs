//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundary between
//! the inference pipeline and the loaded model artifacts.

mod model;

pub use model::{FeatureScaler, ModelError, RiskEstimator};
