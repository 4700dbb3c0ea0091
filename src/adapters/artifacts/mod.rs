//! Artifact loader: locates and deserializes the exported model and scaler.
//!
//! Each artifact is searched for in a fixed, ordered list of candidate paths
//! relative to the artifact directory; the first existing file wins. The
//! feature-name list is optional and only used for diagnostics.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::adapters::linear::{Predictor, StandardScaler};
use crate::domain::{DEFAULT_FEATURE_COLUMNS, FEATURE_COUNT};
use crate::ports::{FeatureScaler, RiskEstimator};

/// Model file candidates, in search order.
pub const MODEL_CANDIDATES: [&str; 4] = [
    "liver_disease_model.json",
    "model.json",
    "ml_service/liver_disease_model.json",
    "ml_service/model.json",
];

/// Scaler file candidates, in search order.
pub const SCALER_CANDIDATES: [&str; 6] = [
    "standard_scaler.json",
    "scaler.json",
    "ml_service/standard_scaler.json",
    "ml_service/scaler.json",
    "liver_disease_scaler.json",
    "ml_service/liver_disease_scaler.json",
];

/// Suffix appended to the model file stem to find its feature-name list.
const FEATURE_COLUMNS_SUFFIX: &str = "_features.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
    FeatureColumns,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Scaler => write!(f, "scaler"),
            Self::FeatureColumns => write!(f, "feature columns"),
        }
    }
}

/// Error type for artifact loading.
///
/// Neither variant is fatal to the service: it starts unready instead.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("No {kind} file found (searched: {})", display_paths(.searched))]
    NotFound {
        kind: ArtifactKind,
        searched: Vec<PathBuf>,
    },

    #[error("Failed to load {kind} from {path:?}: {reason}")]
    Corrupt {
        kind: ArtifactKind,
        path: PathBuf,
        reason: String,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Resolves candidate artifact paths against a base directory.
#[derive(Debug, Clone)]
pub struct ArtifactLocator {
    base_dir: PathBuf,
}

impl ArtifactLocator {
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn model_candidates(&self) -> Vec<PathBuf> {
        self.candidates(&MODEL_CANDIDATES)
    }

    #[must_use]
    pub fn scaler_candidates(&self) -> Vec<PathBuf> {
        self.candidates(&SCALER_CANDIDATES)
    }

    fn candidates(&self, names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(|name| self.base_dir.join(name)).collect()
    }

    fn find(kind: ArtifactKind, candidates: Vec<PathBuf>) -> Result<PathBuf, ArtifactError> {
        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Ok(path.clone()),
            None => Err(ArtifactError::NotFound {
                kind,
                searched: candidates,
            }),
        }
    }

    /// Locate and load the model on its own.
    ///
    /// # Errors
    /// Returns `ArtifactError::NotFound` or `ArtifactError::Corrupt`.
    pub fn load_model(&self) -> Result<(Predictor, PathBuf), ArtifactError> {
        let path = Self::find(ArtifactKind::Model, self.model_candidates())?;
        Ok((read_model(&path)?, path))
    }

    /// Locate and load the scaler on its own.
    ///
    /// # Errors
    /// Returns `ArtifactError::NotFound` or `ArtifactError::Corrupt`.
    pub fn load_scaler(&self) -> Result<(StandardScaler, PathBuf), ArtifactError> {
        let path = Self::find(ArtifactKind::Scaler, self.scaler_candidates())?;
        Ok((read_scaler(&path)?, path))
    }
}

fn read_model(path: &Path) -> Result<Predictor, ArtifactError> {
    let model: Predictor = read_json(ArtifactKind::Model, path)?;
    model.validate().map_err(|reason| ArtifactError::Corrupt {
        kind: ArtifactKind::Model,
        path: path.to_path_buf(),
        reason,
    })?;
    tracing::info!(
        "Model loaded from {:?} (kind={}, n_features={})",
        path,
        model.kind(),
        model.n_features()
    );
    warn_on_width(ArtifactKind::Model, model.n_features());
    Ok(model)
}

fn read_scaler(path: &Path) -> Result<StandardScaler, ArtifactError> {
    let scaler: StandardScaler = read_json(ArtifactKind::Scaler, path)?;
    scaler.validate().map_err(|reason| ArtifactError::Corrupt {
        kind: ArtifactKind::Scaler,
        path: path.to_path_buf(),
        reason,
    })?;
    tracing::info!(
        "Scaler loaded from {:?} (n_features={})",
        path,
        scaler.n_features()
    );
    warn_on_width(ArtifactKind::Scaler, scaler.n_features());
    Ok(scaler)
}

fn warn_on_width(kind: ArtifactKind, width: usize) {
    if width != FEATURE_COUNT {
        tracing::warn!(
            "{kind} was fitted on {width} features but requests encode {FEATURE_COUNT}; \
             predictions will fail"
        );
    }
}

/// Path of the feature-name list that accompanies a model file.
#[must_use]
pub fn feature_columns_path(model_path: &Path) -> PathBuf {
    let stem = model_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    model_path.with_file_name(format!("{stem}{FEATURE_COLUMNS_SUFFIX}"))
}

/// Read the feature-name list next to the model, or fall back to the defaults.
pub fn load_feature_columns(model_path: &Path) -> Vec<String> {
    let path = feature_columns_path(model_path);
    let defaults = || -> Vec<String> {
        DEFAULT_FEATURE_COLUMNS.iter().map(|s| (*s).to_string()).collect()
    };

    if !path.is_file() {
        tracing::info!("Using default feature columns");
        return defaults();
    }

    match read_json::<Vec<String>>(ArtifactKind::FeatureColumns, &path) {
        Ok(columns) => {
            tracing::info!("Feature columns loaded from {:?} ({} names)", path, columns.len());
            columns
        }
        Err(e) => {
            tracing::warn!("{e}; using default feature columns");
            defaults()
        }
    }
}

fn read_json<T: DeserializeOwned>(kind: ArtifactKind, path: &Path) -> Result<T, ArtifactError> {
    let corrupt = |reason: String| ArtifactError::Corrupt {
        kind,
        path: path.to_path_buf(),
        reason,
    };
    let content = std::fs::read(path).map_err(|e| corrupt(e.to_string()))?;
    serde_json::from_slice(&content).map_err(|e| corrupt(e.to_string()))
}
