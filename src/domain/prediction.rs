//! Prediction result types.
//!
//! Turns a model estimate into the bounded response returned to clients.

use serde::{Deserialize, Serialize};

/// Probability below which risk is `low`.
pub const LOW_RISK_UPPER: f64 = 0.30;

/// Probability below which risk is `medium`; at or above it is `high`.
pub const MEDIUM_RISK_UPPER: f64 = 0.60;

/// Confidence reported for models that only expose a scalar prediction.
pub const SCALAR_MODEL_CONFIDENCE: f64 = 0.85;

/// Risk level classification for liver disease.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a probability: `[0, 0.3)` low, `[0.3, 0.6)` medium, otherwise high.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability < LOW_RISK_UPPER {
            Self::Low
        } else if probability < MEDIUM_RISK_UPPER {
            Self::Medium
        } else {
            Self::High
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw model output before it is shaped into a response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Probability of the positive ("has disease") class
    pub probability: f64,

    /// Distance from the decision boundary, in `[0.5, 1]` for probabilistic models
    pub confidence: f64,
}

impl Estimate {
    /// Build an estimate from a class-probability vector.
    ///
    /// The positive class is index 1 when at least two classes are reported,
    /// otherwise index 0. Returns `None` for an empty vector.
    #[must_use]
    pub fn from_class_probabilities(probabilities: &[f64]) -> Option<Self> {
        let probability = match probabilities {
            [] => return None,
            [only] => *only,
            [_, positive, ..] => *positive,
        };

        let max = probabilities.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let confidence = if max > 0.5 { max } else { 1.0 - max };

        Some(Self {
            probability,
            confidence,
        })
    }

    /// Use a scalar model output directly as the probability.
    ///
    /// Confidence is a fixed approximation, not a calibrated value.
    #[must_use]
    pub fn from_scalar(prediction: f64) -> Self {
        Self {
            probability: prediction,
            confidence: SCALAR_MODEL_CONFIDENCE,
        }
    }
}

/// Response body of a successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    /// `probability * 100`, clamped to `[0, 100]`
    pub risk_score: f64,

    pub risk_level: RiskLevel,

    /// Passed through from the model unclamped
    pub probability: f64,

    /// Passed through from the model unclamped
    pub confidence: f64,
}

impl PredictionResponse {
    #[must_use]
    pub fn new(probability: f64, confidence: f64) -> Self {
        Self {
            risk_score: (probability * 100.0).clamp(0.0, 100.0),
            risk_level: RiskLevel::from_probability(probability),
            probability,
            confidence,
        }
    }
}

impl From<Estimate> for PredictionResponse {
    fn from(estimate: Estimate) -> Self {
        Self::new(estimate.probability, estimate.confidence)
    }
}

/// One slot of a batch response: a prediction or the reason it failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum BatchOutcome {
    Prediction(PredictionResponse),
    Error { error: String },
}

impl BatchOutcome {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}
