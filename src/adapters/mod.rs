//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: locating and decoding exported model/scaler files
//! - `linear`: linear models and the standard scaler
//! - `sanitize`: PII filtering for logs

pub mod artifacts;
pub mod linear;
pub mod sanitize;

pub use artifacts::{ArtifactError, ArtifactKind, ArtifactLocator};
pub use linear::{LinearRegression, LogisticRegression, Predictor, StandardScaler};
