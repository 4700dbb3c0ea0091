//! Patient attributes for liver disease risk scoring.
//!
//! Request fields keep the camelCase names used by the public API. Categorical
//! answers are matched case-insensitively; anything unrecognized falls back to
//! a documented default code and emits a `warn` event instead of failing.

use serde::{Deserialize, Serialize};

/// Number of features the scaler and model are fitted on.
pub const FEATURE_COUNT: usize = 10;

/// Encoded feature names, in vector order.
///
/// Used for diagnostics when no feature-name list ships with the model.
pub const DEFAULT_FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "age",
    "gender_encoded",
    "bmi",
    "alcohol_consumption",
    "smoking_encoded",
    "genetic_risk_encoded",
    "physical_activity",
    "diabetes_encoded",
    "hypertension_encoded",
    "liver_function_score",
];

/// Raw prediction request as submitted by a client.
///
/// No numeric range checks are applied; values are passed to the scaler as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionInput {
    /// Age in years
    pub age: i64,

    /// `male` or `female`
    pub gender: String,

    /// Body mass index
    pub bmi: f64,

    /// Alcohol units per week
    pub alcohol_consumption: f64,

    /// `yes` or `no`
    pub smoking: String,

    /// `low`, `medium` or `high`
    pub genetic_risk: String,

    /// Hours of physical activity per week
    pub physical_activity: f64,

    /// `yes` or `no`
    pub diabetes: String,

    /// `yes` or `no`
    pub hypertension: String,

    /// Liver function test score
    pub liver_function_score: f64,
}

/// Sex as encoded for the model (`male` = 1, `female` = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("male") {
            Some(Self::Male)
        } else if raw.eq_ignore_ascii_case("female") {
            Some(Self::Female)
        } else {
            None
        }
    }

    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Female => 0.0,
            Self::Male => 1.0,
        }
    }
}

/// Yes/no answer (`yes` = 1, `no` = 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryAnswer {
    No,
    Yes,
}

impl BinaryAnswer {
    fn parse(raw: &str) -> Option<Self> {
        if raw.eq_ignore_ascii_case("yes") {
            Some(Self::Yes)
        } else if raw.eq_ignore_ascii_case("no") {
            Some(Self::No)
        } else {
            None
        }
    }

    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::No => 0.0,
            Self::Yes => 1.0,
        }
    }
}

/// Family/genetic predisposition (`low` = 0, `medium` = 1, `high` = 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneticRisk {
    Low,
    Medium,
    High,
}

impl GeneticRisk {
    fn parse(raw: &str) -> Option<Self> {
        [Self::Low, Self::Medium, Self::High]
            .into_iter()
            .find(|level| raw.eq_ignore_ascii_case(level.label()))
    }

    fn label(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    #[must_use]
    pub fn code(self) -> f64 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 1.0,
            Self::High => 2.0,
        }
    }
}

/// Fall back to `default` for an unrecognized categorical answer, leaving a trace.
///
/// Only the length of the raw value is logged, never its content.
fn or_default<T>(field: &'static str, raw: &str, parsed: Option<T>, default: T) -> T
where
    T: Copy + std::fmt::Debug,
{
    parsed.unwrap_or_else(|| {
        tracing::warn!(
            field,
            value_len = raw.len(),
            fallback = ?default,
            "Unrecognized categorical value, using default encoding"
        );
        default
    })
}

/// Fixed-order numeric encoding of a [`PredictionInput`].
///
/// Order: age, gender, bmi, alcoholConsumption, smoking, geneticRisk,
/// physicalActivity, diabetes, hypertension, liverFunctionScore.
/// The scaler and model artifacts are fitted on exactly this order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl PredictionInput {
    /// Encode the request into the model's feature vector.
    ///
    /// Total: unrecognized categorical strings resolve to their default code
    /// (`female`/`no` = 0, genetic risk `medium` = 1).
    #[must_use]
    pub fn encode(&self) -> FeatureVector {
        let gender = or_default(
            "gender",
            &self.gender,
            Gender::parse(&self.gender),
            Gender::Female,
        );
        let smoking = or_default(
            "smoking",
            &self.smoking,
            BinaryAnswer::parse(&self.smoking),
            BinaryAnswer::No,
        );
        let genetic_risk = or_default(
            "geneticRisk",
            &self.genetic_risk,
            GeneticRisk::parse(&self.genetic_risk),
            GeneticRisk::Medium,
        );
        let diabetes = or_default(
            "diabetes",
            &self.diabetes,
            BinaryAnswer::parse(&self.diabetes),
            BinaryAnswer::No,
        );
        let hypertension = or_default(
            "hypertension",
            &self.hypertension,
            BinaryAnswer::parse(&self.hypertension),
            BinaryAnswer::No,
        );

        FeatureVector([
            self.age as f64,
            gender.code(),
            self.bmi,
            self.alcohol_consumption,
            smoking.code(),
            genetic_risk.code(),
            self.physical_activity,
            diabetes.code(),
            hypertension.code(),
            self.liver_function_score,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

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

    #[test]
    fn test_encode_order() {
        let v = sample_input().encode();
        assert_eq!(
            v.as_slice(),
            &[45.0, 1.0, 28.5, 10.0, 1.0, 1.0, 3.0, 0.0, 1.0, 65.0]
        );
    }

    #[test]
    fn test_binary_answers_case_insensitive() {
        for (raw, code) in [("YES", 1.0), ("yes", 1.0), ("Yes", 1.0), ("No", 0.0), ("no", 0.0)] {
            let mut input = sample_input();
            input.smoking = raw.into();
            input.diabetes = raw.into();
            input.hypertension = raw.into();
            let v = input.encode();
            assert_eq!(v.as_slice()[4], code, "smoking={raw}");
            assert_eq!(v.as_slice()[7], code, "diabetes={raw}");
            assert_eq!(v.as_slice()[8], code, "hypertension={raw}");
        }
    }

    #[test]
    fn test_unrecognized_binary_defaults_to_no() {
        let mut input = sample_input();
        input.smoking = "maybe".into();
        input.diabetes = "".into();
        input.hypertension = " yes".into();
        let v = input.encode();
        assert_eq!(v.as_slice()[4], 0.0);
        assert_eq!(v.as_slice()[7], 0.0);
        assert_eq!(v.as_slice()[8], 0.0);
    }

    #[test]
    fn test_gender_codes() {
        let mut input = sample_input();
        input.gender = "FEMALE".into();
        assert_eq!(input.encode().as_slice()[1], 0.0);
        input.gender = "Male".into();
        assert_eq!(input.encode().as_slice()[1], 1.0);
        input.gender = "other".into();
        assert_eq!(input.encode().as_slice()[1], 0.0);
    }

    #[test]
    fn test_genetic_risk_codes() {
        let mut input = sample_input();
        for (raw, code) in [("low", 0.0), ("MEDIUM", 1.0), ("High", 2.0), ("unknown", 1.0)] {
            input.genetic_risk = raw.into();
            assert_eq!(input.encode().as_slice()[5], code, "geneticRisk={raw}");
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let a = sample_input();
        let mut b = sample_input();
        b.genetic_risk = "unknown".into();

        let first = a.encode();
        let _ = b.encode();
        assert_eq!(a.encode(), first);
        assert_eq!(b.encode(), b.encode());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "age": 45, "gender": "male", "bmi": 28.5, "alcoholConsumption": 10,
            "smoking": "yes", "geneticRisk": "medium", "physicalActivity": 3,
            "diabetes": "no", "hypertension": "yes", "liverFunctionScore": 65
        }"#;
        let input: PredictionInput = serde_json::from_str(json).expect("Should parse");
        assert_eq!(input, sample_input());
    }

    #[test]
    fn test_deserialize_rejects_wrong_type() {
        let json = r#"{
            "age": "forty", "gender": "male", "bmi": 28.5, "alcoholConsumption": 10,
            "smoking": "yes", "geneticRisk": "medium", "physicalActivity": 3,
            "diabetes": "no", "hypertension": "yes", "liverFunctionScore": 65
        }"#;
        assert!(serde_json::from_str::<PredictionInput>(json).is_err());
    }

    #[test]
    fn test_default_feature_columns_match_vector_width() {
        assert_eq!(DEFAULT_FEATURE_COLUMNS.len(), FEATURE_COUNT);
        assert_eq!(sample_input().encode().as_slice().len(), FEATURE_COUNT);
    }

    #[derive(Clone, Default)]
    struct LogSink(Arc<Mutex<Vec<u8>>>);

    impl Write for LogSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_default_warning_omits_raw_value() {
        let sink = LogSink::default();
        let writer = sink.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mut input = sample_input();
        input.gender = "patient-secret-answer".into();
        let encoded = tracing::subscriber::with_default(subscriber, || input.encode());
        assert_eq!(encoded.as_slice()[1], 0.0);

        let logs = String::from_utf8(sink.0.lock().expect("lock").clone()).expect("utf8");
        assert!(logs.contains("Unrecognized categorical value"));
        assert!(logs.contains("value_len=21"));
        assert!(!logs.contains("patient-secret-answer"));
    }
}
