//! Inference service: runs the request pipeline against loaded artifacts.
//!
//! For each request:
//! 1. Encode categorical fields into the fixed-order feature vector
//! 2. Apply the fitted scaler
//! 3. Invoke the model
//! 4. Shape the estimate into a bounded response
//!
//! Artifacts are held in an immutable [`ArtifactsHandle`] built once at
//! startup; the service never mutates them, so concurrent requests need no
//! locking.

use std::sync::Arc;

use crate::adapters::artifacts::load_feature_columns;
use crate::adapters::{ArtifactLocator, Predictor, StandardScaler};
use crate::domain::{BatchOutcome, Estimate, FeatureVector, PredictionInput, PredictionResponse};
use crate::ports::{FeatureScaler, ModelError, RiskEstimator};

/// Per-request pipeline failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("ML model not loaded. Please ensure model file is available and restart the service.")]
    ModelUnavailable,

    #[error("Standard scaler not loaded. Please ensure scaler file is available and restart the service.")]
    ScalerUnavailable,

    #[error("Prediction error: {0}")]
    Prediction(#[from] ModelError),
}

/// Immutable bundle of the artifacts a service predicts with.
///
/// Either artifact may be absent, in which case the service reports itself
/// unready and rejects predictions.
pub struct ArtifactsHandle<E = Predictor, S = StandardScaler> {
    model: Option<Arc<E>>,
    scaler: Option<Arc<S>>,
    feature_columns: Arc<[String]>,
}

impl<E, S> Clone for ArtifactsHandle<E, S> {
    fn clone(&self) -> Self {
        Self {
            model: self.model.clone(),
            scaler: self.scaler.clone(),
            feature_columns: Arc::clone(&self.feature_columns),
        }
    }
}

impl<E, S> ArtifactsHandle<E, S> {
    #[must_use]
    pub fn new(model: Option<E>, scaler: Option<S>, feature_columns: Vec<String>) -> Self {
        Self {
            model: model.map(Arc::new),
            scaler: scaler.map(Arc::new),
            feature_columns: feature_columns.into(),
        }
    }

    /// A handle with nothing loaded.
    #[must_use]
    pub fn unloaded() -> Self {
        Self::new(None, None, Vec::new())
    }

    #[must_use]
    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    #[must_use]
    pub fn scaler_loaded(&self) -> bool {
        self.scaler.is_some()
    }

    #[must_use]
    pub fn feature_columns(&self) -> &[String] {
        &self.feature_columns
    }
}

impl ArtifactsHandle {
    /// Load artifacts from disk, keeping whatever loads successfully.
    ///
    /// Load failures are logged, not returned: the service starts either way
    /// and reports readiness through `/health`. The model and scaler are loaded
    /// independently, so a broken scaler still leaves the model published.
    /// Feature names are only attached when both load.
    #[must_use]
    pub fn load_or_unready(locator: &ArtifactLocator) -> Self {
        let model = locator
            .load_model()
            .map_err(|e| tracing::error!("{e}"))
            .ok();
        let scaler = locator
            .load_scaler()
            .map_err(|e| tracing::error!("{e}"))
            .ok();

        let feature_columns = match (&model, &scaler) {
            (Some((_, model_path)), Some(_)) => load_feature_columns(model_path),
            _ => {
                tracing::error!(
                    "Service will start without predictions; place artifacts under {:?} and restart",
                    locator.base_dir()
                );
                Vec::new()
            }
        };

        Self::new(
            model.map(|(model, _)| model),
            scaler.map(|(scaler, _)| scaler),
            feature_columns,
        )
    }
}

/// Snapshot of what the service has loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub model_loaded: bool,
    pub scaler_loaded: bool,
    pub feature_count: usize,
}

impl Readiness {
    #[must_use]
    pub fn ready_for_predictions(&self) -> bool {
        self.model_loaded && self.scaler_loaded
    }
}

/// Service for running risk predictions.
pub struct InferenceService<E = Predictor, S = StandardScaler> {
    artifacts: ArtifactsHandle<E, S>,
}

impl<E, S> InferenceService<E, S>
where
    E: RiskEstimator,
    S: FeatureScaler,
{
    /// Create a new inference service over the given artifacts.
    pub fn new(artifacts: ArtifactsHandle<E, S>) -> Self {
        Self { artifacts }
    }

    #[must_use]
    pub fn readiness(&self) -> Readiness {
        Readiness {
            model_loaded: self.artifacts.model_loaded(),
            scaler_loaded: self.artifacts.scaler_loaded(),
            feature_count: self.artifacts.feature_columns().len(),
        }
    }

    /// Apply the fitted scaler to an encoded vector.
    ///
    /// # Errors
    /// Returns `ScalerUnavailable` if no scaler is loaded, `Prediction` if the
    /// transform rejects the vector.
    pub fn scale(&self, features: &FeatureVector) -> Result<Vec<f64>, InferenceError> {
        let scaler = self
            .artifacts
            .scaler
            .as_deref()
            .ok_or(InferenceError::ScalerUnavailable)?;
        Ok(scaler.transform(features)?)
    }

    /// Invoke the model on a scaled vector.
    ///
    /// # Errors
    /// Returns `ModelUnavailable` if no model is loaded, `Prediction` if the
    /// model rejects the input.
    pub fn estimate(&self, scaled: &[f64]) -> Result<Estimate, InferenceError> {
        let model = self
            .artifacts
            .model
            .as_deref()
            .ok_or(InferenceError::ModelUnavailable)?;
        Ok(model.estimate(scaled)?)
    }

    /// Run the full pipeline on one input.
    ///
    /// Availability is checked up front, model first, so an unready service
    /// fails the same way regardless of the input.
    ///
    /// # Errors
    /// Returns `ModelUnavailable`, `ScalerUnavailable` or `Prediction`.
    pub fn predict(&self, input: &PredictionInput) -> Result<PredictionResponse, InferenceError> {
        if !self.artifacts.model_loaded() {
            return Err(InferenceError::ModelUnavailable);
        }
        if !self.artifacts.scaler_loaded() {
            return Err(InferenceError::ScalerUnavailable);
        }

        let features = input.encode();
        let scaled = self.scale(&features)?;
        let estimate = self.estimate(&scaled)?;
        let response = PredictionResponse::from(estimate);

        tracing::debug!(
            risk_level = %response.risk_level,
            probability = response.probability,
            confidence = response.confidence,
            "Prediction complete"
        );
        Ok(response)
    }

    /// Run the pipeline independently on each raw JSON item, in order.
    ///
    /// An item that fails to decode or predict becomes an error record in its
    /// slot; later items are still processed.
    pub fn predict_batch(&self, items: Vec<serde_json::Value>) -> Vec<BatchOutcome> {
        let total = items.len();
        let outcomes: Vec<BatchOutcome> = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let outcome = serde_json::from_value::<PredictionInput>(item)
                    .map_err(|e| format!("Invalid input: {e}"))
                    .and_then(|input| self.predict(&input).map_err(|e| e.to_string()));
                match outcome {
                    Ok(response) => BatchOutcome::Prediction(response),
                    Err(error) => {
                        tracing::warn!(index, "Batch item failed: {error}");
                        BatchOutcome::Error { error }
                    }
                }
            })
            .collect();

        let failed = outcomes.iter().filter(|o| o.is_error()).count();
        tracing::info!(total, failed, "Batch prediction complete");
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::linear::LogisticRegression;
    use crate::domain::{RiskLevel, DEFAULT_FEATURE_COLUMNS, FEATURE_COUNT};
    use serde_json::json;

    /// Returns the same estimate for every input of the right width.
    struct FixedEstimator(Estimate);

    impl RiskEstimator for FixedEstimator {
        fn n_features(&self) -> usize {
            FEATURE_COUNT
        }

        fn estimate(&self, scaled: &[f64]) -> Result<Estimate, ModelError> {
            if scaled.len() != FEATURE_COUNT {
                return Err(ModelError::DimensionMismatch {
                    component: "FixedEstimator",
                    expected: FEATURE_COUNT,
                    got: scaled.len(),
                });
            }
            Ok(self.0)
        }
    }

    /// Passes features through, or rejects everything when `width` is wrong.
    struct PassthroughScaler {
        width: usize,
    }

    impl FeatureScaler for PassthroughScaler {
        fn n_features(&self) -> usize {
            self.width
        }

        fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
            if features.as_slice().len() != self.width {
                return Err(ModelError::DimensionMismatch {
                    component: "PassthroughScaler",
                    expected: self.width,
                    got: features.as_slice().len(),
                });
            }
            Ok(features.as_slice().to_vec())
        }
    }

    fn columns() -> Vec<String> {
        DEFAULT_FEATURE_COLUMNS.iter().map(|s| (*s).to_string()).collect()
    }

    fn create_test_service(
        probability: f64,
    ) -> InferenceService<FixedEstimator, PassthroughScaler> {
        let estimate = Estimate::from_class_probabilities(&[1.0 - probability, probability])
            .expect("non-empty");
        InferenceService::new(ArtifactsHandle::new(
            Some(FixedEstimator(estimate)),
            Some(PassthroughScaler { width: FEATURE_COUNT }),
            columns(),
        ))
    }

    fn sample_input() -> PredictionInput {
        PredictionInput {
            age: 45,
            gender: "male".into(),
            bmi: 28.5,
            alcohol_consumption: 10.0,
            smoking: "yes".into(),
            genetic_risk: "medium".into(),
            physical_activity: 3.0,
            diabetes: "no".into(),
            hypertension: "yes".into(),
            liver_function_score: 65.0,
        }
    }

    fn sample_json() -> serde_json::Value {
        serde_json::to_value(sample_input()).expect("serialize")
    }

    #[test]
    fn test_predict_pipeline() {
        let service = create_test_service(0.45);
        let response = service.predict(&sample_input()).expect("Should predict");

        assert!((response.risk_score - 45.0).abs() < 1e-9);
        assert_eq!(response.risk_level, RiskLevel::Medium);
        assert!((response.confidence - 0.55).abs() < 1e-9);
    }

    #[test]
    fn test_readiness_reflects_artifacts() {
        let service = create_test_service(0.1);
        let readiness = service.readiness();
        assert!(readiness.ready_for_predictions());
        assert_eq!(readiness.feature_count, FEATURE_COUNT);

        let unloaded: InferenceService<FixedEstimator, PassthroughScaler> =
            InferenceService::new(ArtifactsHandle::unloaded());
        let readiness = unloaded.readiness();
        assert!(!readiness.model_loaded);
        assert!(!readiness.scaler_loaded);
        assert_eq!(readiness.feature_count, 0);
        assert!(!readiness.ready_for_predictions());
    }

    #[test]
    fn test_model_checked_before_scaler() {
        let service: InferenceService<FixedEstimator, PassthroughScaler> =
            InferenceService::new(ArtifactsHandle::unloaded());
        assert_eq!(service.predict(&sample_input()), Err(InferenceError::ModelUnavailable));
    }

    #[test]
    fn test_missing_scaler() {
        let estimate = Estimate::from_scalar(0.5);
        let service: InferenceService<FixedEstimator, PassthroughScaler> = InferenceService::new(
            ArtifactsHandle::new(Some(FixedEstimator(estimate)), None, columns()),
        );
        assert!(!service.readiness().ready_for_predictions());
        assert_eq!(service.predict(&sample_input()), Err(InferenceError::ScalerUnavailable));
        assert_eq!(
            service.scale(&sample_input().encode()),
            Err(InferenceError::ScalerUnavailable)
        );
    }

    #[test]
    fn test_scaler_failure_is_prediction_error() {
        let estimate = Estimate::from_scalar(0.5);
        let service = InferenceService::new(ArtifactsHandle::new(
            Some(FixedEstimator(estimate)),
            Some(PassthroughScaler { width: 3 }),
            columns(),
        ));
        let err = service.predict(&sample_input()).unwrap_err();
        assert!(matches!(err, InferenceError::Prediction(_)));
        assert!(err.to_string().starts_with("Prediction error: "));
    }

    #[test]
    fn test_predict_with_linear_artifacts() {
        let service: InferenceService = InferenceService::new(ArtifactsHandle::new(
            Some(Predictor::Probabilistic(LogisticRegression {
                coefficients: vec![vec![0.0; FEATURE_COUNT]],
                intercepts: vec![0.0],
            })),
            Some(StandardScaler {
                mean: vec![0.0; FEATURE_COUNT],
                scale: vec![1.0; FEATURE_COUNT],
            }),
            columns(),
        ));
        let response = service.predict(&sample_input()).expect("Should predict");
        assert_eq!(response.probability, 0.5);
        assert_eq!(response.risk_level, RiskLevel::Medium);
        assert_eq!(response.risk_score, 50.0);
    }

    #[test]
    fn test_batch_isolates_failures() {
        let service = create_test_service(0.8);
        let mut malformed = sample_json();
        malformed["age"] = json!("forty-five");

        let outcomes = service.predict_batch(vec![sample_json(), malformed, sample_json()]);
        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0], BatchOutcome::Prediction(_)));
        match &outcomes[1] {
            BatchOutcome::Error { error } => assert!(error.starts_with("Invalid input: ")),
            other => panic!("expected error record, got {other:?}"),
        }
        assert!(matches!(outcomes[2], BatchOutcome::Prediction(_)));
    }

    #[test]
    fn test_batch_when_unloaded_reports_each_item() {
        let service: InferenceService<FixedEstimator, PassthroughScaler> =
            InferenceService::new(ArtifactsHandle::unloaded());
        let outcomes = service.predict_batch(vec![sample_json(), sample_json()]);
        assert_eq!(outcomes.len(), 2);
        for outcome in outcomes {
            assert_eq!(
                outcome,
                BatchOutcome::Error {
                    error: InferenceError::ModelUnavailable.to_string()
                }
            );
        }
    }

    #[test]
    fn test_empty_batch() {
        assert!(create_test_service(0.5).predict_batch(Vec::new()).is_empty());
    }

    #[test]
    fn test_load_or_unready_without_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let handle = ArtifactsHandle::load_or_unready(&ArtifactLocator::new(temp.path()));
        assert!(!handle.model_loaded());
        assert!(!handle.scaler_loaded());
        assert!(handle.feature_columns().is_empty());
    }

    #[test]
    fn test_load_or_unready_keeps_model_when_scaler_is_corrupt() {
        let temp = tempfile::tempdir().expect("tempdir");
        let model = Predictor::Probabilistic(LogisticRegression {
            coefficients: vec![vec![0.0; FEATURE_COUNT]],
            intercepts: vec![0.0],
        });
        std::fs::write(
            temp.path().join("liver_disease_model.json"),
            serde_json::to_vec(&model).expect("serialize"),
        )
        .expect("write model");
        std::fs::write(temp.path().join("standard_scaler.json"), b"not json").expect("write");

        let handle = ArtifactsHandle::load_or_unready(&ArtifactLocator::new(temp.path()));
        assert!(handle.model_loaded());
        assert!(!handle.scaler_loaded());
        assert!(handle.feature_columns().is_empty());

        let service = InferenceService::new(handle);
        assert_eq!(service.predict(&sample_input()), Err(InferenceError::ScalerUnavailable));
    }
}
