//! Linear model adapter: `FeatureScaler` and `RiskEstimator` over JSON-exported
//! scikit-learn estimators.
//!
//! The training pipeline exports fitted parameters instead of pickles:
//!
//! - `StandardScaler` → `{"mean": [...], "scale": [...]}`
//! - `LogisticRegression` → `{"kind": "logistic_regression", "coefficients": [[...]], "intercepts": [...]}`
//! - `LinearRegression` → `{"kind": "linear_regression", "coefficients": [...], "intercept": ...}`
//!
//! Which variant a model file holds is decided once at load time; the
//! pipeline never probes the model for capabilities per request.

use serde::{Deserialize, Serialize};

use crate::domain::{Estimate, FeatureVector};
use crate::ports::{FeatureScaler, ModelError, RiskEstimator};

fn check_width(component: &'static str, expected: usize, got: usize) -> Result<(), ModelError> {
    if expected == got {
        Ok(())
    } else {
        Err(ModelError::DimensionMismatch {
            component,
            expected,
            got,
        })
    }
}

fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

fn dot(weights: &[f64], x: &[f64]) -> f64 {
    weights.iter().zip(x).map(|(w, v)| w * v).sum()
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Fitted standardization: `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Check structural consistency of the exported parameters.
    ///
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.mean.is_empty() {
            return Err("scaler has no features".into());
        }
        if self.mean.len() != self.scale.len() {
            return Err(format!(
                "mean has {} entries but scale has {}",
                self.mean.len(),
                self.scale.len()
            ));
        }
        if !all_finite(&self.mean) || !all_finite(&self.scale) {
            return Err("scaler parameters must be finite".into());
        }
        Ok(())
    }
}

impl FeatureScaler for StandardScaler {
    fn n_features(&self) -> usize {
        self.mean.len()
    }

    fn transform(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        let x = features.as_slice();
        check_width("StandardScaler", self.mean.len(), x.len())?;

        Ok(x.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(value, (mean, scale))| {
                // Constant features were fitted with a zero scale.
                let scale = if *scale == 0.0 { 1.0 } else { *scale };
                (value - mean) / scale
            })
            .collect())
    }
}

/// Logistic regression with one coefficient row per class.
///
/// A single row is the binary case and yields `[1 - p, p]`; several rows
/// yield a softmax over the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl LogisticRegression {
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let Some(first) = self.coefficients.first() else {
            return Err("logistic regression has no coefficient rows".into());
        };
        if first.is_empty() {
            return Err("logistic regression has no features".into());
        }
        if self.coefficients.iter().any(|row| row.len() != first.len()) {
            return Err("coefficient rows have different lengths".into());
        }
        if self.intercepts.len() != self.coefficients.len() {
            return Err(format!(
                "{} coefficient rows but {} intercepts",
                self.coefficients.len(),
                self.intercepts.len()
            ));
        }
        if !self.coefficients.iter().all(|row| all_finite(row)) || !all_finite(&self.intercepts) {
            return Err("model parameters must be finite".into());
        }
        Ok(())
    }

    #[must_use]
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// Class-probability vector for one scaled sample.
    ///
    /// # Errors
    /// Returns `ModelError::DimensionMismatch` on a width mismatch.
    pub fn predict_proba(&self, x: &[f64]) -> Result<Vec<f64>, ModelError> {
        check_width("LogisticRegression", self.n_features(), x.len())?;

        let scores: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, intercept)| dot(row, x) + intercept)
            .collect();

        if let [z] = scores.as_slice() {
            let p = sigmoid(*z);
            return Ok(vec![1.0 - p, p]);
        }

        // Shift by the max score for numerical stability.
        let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let exps: Vec<f64> = scores.iter().map(|z| (z - max).exp()).collect();
        let total: f64 = exps.iter().sum();
        Ok(exps.into_iter().map(|e| e / total).collect())
    }
}

/// Ordinary least squares regression; its output is used directly as a probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    pub coefficients: Vec<f64>,
    pub intercept: f64,
}

impl LinearRegression {
    /// # Errors
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.coefficients.is_empty() {
            return Err("linear regression has no features".into());
        }
        if !all_finite(&self.coefficients) || !self.intercept.is_finite() {
            return Err("model parameters must be finite".into());
        }
        Ok(())
    }

    /// # Errors
    /// Returns `ModelError::DimensionMismatch` on a width mismatch.
    pub fn predict(&self, x: &[f64]) -> Result<f64, ModelError> {
        check_width("LinearRegression", self.coefficients.len(), x.len())?;
        Ok(dot(&self.coefficients, x) + self.intercept)
    }
}

/// A loaded model, tagged by whether it can estimate class probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Predictor {
    #[serde(rename = "logistic_regression")]
    Probabilistic(LogisticRegression),

    #[serde(rename = "linear_regression")]
    Scalar(LinearRegression),
}

impl Predictor {
    /// # Errors
    /// Returns a description of the first structural problem found.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Probabilistic(model) => model.validate(),
            Self::Scalar(model) => model.validate(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Probabilistic(_) => "logistic_regression",
            Self::Scalar(_) => "linear_regression",
        }
    }
}

impl RiskEstimator for Predictor {
    fn n_features(&self) -> usize {
        match self {
            Self::Probabilistic(model) => model.n_features(),
            Self::Scalar(model) => model.coefficients.len(),
        }
    }

    fn estimate(&self, scaled: &[f64]) -> Result<Estimate, ModelError> {
        match self {
            Self::Probabilistic(model) => {
                let probabilities = model.predict_proba(scaled)?;
                Estimate::from_class_probabilities(&probabilities)
                    .ok_or(ModelError::EmptyOutput("LogisticRegression"))
            }
            Self::Scalar(model) => Ok(Estimate::from_scalar(model.predict(scaled)?)),
        }
    }
}
