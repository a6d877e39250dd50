use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::error::{ArtifactError, ScoreError};
use crate::model::{AnomalyModel, IsolationForest};
use crate::scaler::{FeatureScaler, StandardScaler};

/// Which artifact a load failure refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

impl ArtifactKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Scaler => "scaler",
        }
    }
}

/// Startup load failure, carrying which artifact broke. Fatal: the service
/// must not transition to ready after seeing one of these.
#[derive(Debug)]
pub struct ArtifactLoadError {
    pub artifact: ArtifactKind,
    pub source: ArtifactError,
}

impl fmt::Display for ArtifactLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to load {} artifact: {}",
            self.artifact.as_str(),
            self.source
        )
    }
}

impl std::error::Error for ArtifactLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Per-artifact load flags reported to the health probe. Pure introspection;
/// never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Readiness {
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

impl Readiness {
    pub fn is_ready(self) -> bool {
        self.model_loaded && self.scaler_loaded
    }
}

/// Holds the two externally trained artifacts for the lifetime of the
/// process. Loaded once at startup, immutable and shared read-only across
/// all concurrent scoring calls afterwards; there is no reload path.
pub struct ArtifactStore {
    model: Option<Box<dyn AnomalyModel>>,
    scaler: Option<Box<dyn FeatureScaler>>,
}

impl ArtifactStore {
    /// The explicit not-ready state: scoring against it always fails with
    /// `ScoreError::NotReady`, never computes a score.
    pub fn empty() -> Self {
        Self {
            model: None,
            scaler: None,
        }
    }

    /// Build a store from pre-loaded capabilities. Lets the collaborator
    /// supply artifacts it deserialized itself, and gives tests a seam for
    /// partial/stub stores.
    pub fn with_parts(
        model: Option<Box<dyn AnomalyModel>>,
        scaler: Option<Box<dyn FeatureScaler>>,
    ) -> Self {
        Self { model, scaler }
    }

    /// One-time startup load of both artifacts. All-or-nothing: any failure
    /// is returned and the service must stay not-ready.
    pub fn load(model_path: &Path, scaler_path: &Path) -> Result<Self, ArtifactLoadError> {
        let model = IsolationForest::from_file(model_path).map_err(|source| ArtifactLoadError {
            artifact: ArtifactKind::Model,
            source,
        })?;
        let scaler = StandardScaler::from_file(scaler_path).map_err(|source| ArtifactLoadError {
            artifact: ArtifactKind::Scaler,
            source,
        })?;
        Ok(Self {
            model: Some(Box::new(model)),
            scaler: Some(Box::new(scaler)),
        })
    }

    pub fn readiness(&self) -> Readiness {
        Readiness {
            model_loaded: self.model.is_some(),
            scaler_loaded: self.scaler.is_some(),
        }
    }

    /// Both capabilities, or `NotReady` carrying the per-artifact flags.
    pub(crate) fn parts(&self) -> Result<(&dyn FeatureScaler, &dyn AnomalyModel), ScoreError> {
        match (&self.scaler, &self.model) {
            (Some(scaler), Some(model)) => Ok((scaler.as_ref(), model.as_ref())),
            _ => Err(ScoreError::NotReady {
                model_loaded: self.model.is_some(),
                scaler_loaded: self.scaler.is_some(),
            }),
        }
    }
}
