//! # Liver Risk
//!
//! HTTP risk scoring for a pre-trained liver disease classifier.
//!
//! This crate provides:
//! - Deterministic encoding of clinical/lifestyle attributes into model features
//! - Scaling and inference against exported model artifacts
//! - A JSON API for single and batch predictions
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Request, feature and response types
//! - `ports`: Trait definitions for scaler and model
//! - `adapters`: Artifact loading, linear models, log sanitization
//! - `application`: Inference use cases and the blocking pool
//! - `api`: axum router and handlers

pub mod adapters;
pub mod api;
pub mod app_state;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

pub use app_state::AppState;
pub use config::{ConfigError, ServiceConfig};
pub use domain::{PredictionInput, PredictionResponse, RiskLevel};

/// Result type for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Top-level error for running the service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
