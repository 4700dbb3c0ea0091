//! Model ports: traits for the fitted scaler and the risk estimator.
//!
//! These abstract the exported estimator format from the inference pipeline.

use crate::domain::{Estimate, FeatureVector};

/// Numeric failures raised by a scaler or estimator at request time.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("X has {got} features, but {component} is expecting {expected} features as input")]
    DimensionMismatch {
        component: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} returned an empty probability vector")]
    EmptyOutput(&'static str),
}

/// A fitted feature transform (e.g. standardization).
pub trait FeatureScaler: Send + Sync {
    /// Width of the feature space the transform was fitted on.
    fn n_features(&self) -> usize;

    /// Transform an encoded feature vector.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` if the vector width differs
    /// from the fitted width.
    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;
}

/// A predictor that yields a probability and a confidence.
pub trait RiskEstimator: Send + Sync {
    /// Width of the feature space the model was fitted on.
    fn n_features(&self) -> usize;

    /// Estimate the positive-class probability for a scaled feature vector.
    ///
    /// # Errors
    /// Returns `ModelError` if the input width is wrong or the model output is unusable.
    fn estimate(&self, scaled: &[f64]) -> Result<Estimate, ModelError>;
}
