use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::models::{BatchResponse, HealthResponse, MessageResponse};
use crate::app_state::AppState;
use crate::domain::{PredictionInput, PredictionResponse};

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse::new("Liver Disease Prediction API is running"))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(state.service.readiness().into())
}

pub async fn ping() -> Json<MessageResponse> {
    Json(MessageResponse::new("pong"))
}

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictionInput>, JsonRejection>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let Json(input) = payload?;

    let service = Arc::clone(&state.service);
    let response = state.pool.run(move || service.predict(&input)).await??;
    Ok(Json(response))
}

pub async fn batch_predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<serde_json::Value>>, JsonRejection>,
) -> Result<Json<BatchResponse>, ApiError> {
    let Json(items) = payload?;
    tracing::info!(items = items.len(), "Batch prediction request");

    let service = Arc::clone(&state.service);
    let predictions = state.pool.run(move || service.predict_batch(items)).await?;
    Ok(Json(BatchResponse { predictions }))
}
