//! Domain layer: request, feature and response types.
//!
//! Pure types and rules with no I/O. Encoding and risk bucketing live here so
//! they can be tested without loaded artifacts.

mod patient;
mod prediction;

pub use patient::{
    BinaryAnswer, FeatureVector, Gender, GeneticRisk, PredictionInput, DEFAULT_FEATURE_COLUMNS,
    FEATURE_COUNT,
};
pub use prediction::{
    BatchOutcome, Estimate, PredictionResponse, RiskLevel, LOW_RISK_UPPER, MEDIUM_RISK_UPPER,
    SCALAR_MODEL_CONFIDENCE,
};
