use serde::{Deserialize, Serialize};

use crate::application::Readiness;
use crate::domain::BatchOutcome;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub feature_count: usize,
    pub ready_for_predictions: bool,
}

impl From<Readiness> for HealthResponse {
    fn from(readiness: Readiness) -> Self {
        Self {
            status: "healthy".to_string(),
            model_loaded: readiness.model_loaded,
            scaler_loaded: readiness.scaler_loaded,
            feature_count: readiness.feature_count,
            ready_for_predictions: readiness.ready_for_predictions(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub predictions: Vec<BatchOutcome>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
