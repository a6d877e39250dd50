use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::FEATURE_COUNT;
use crate::error::ArtifactError;

/// Capability contract for the feature-normalization artifact.
///
/// Dimensionality is enforced by the array type; implementations must be
/// pure and must map finite inputs to finite outputs.
pub trait FeatureScaler: Send + Sync {
    fn normalize(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT];
}

/// Standardization scaler: per-feature `(x - mean) / scale`.
///
/// Exported by the offline training pipeline as JSON. Validated at load:
/// both vectors must have exactly `FEATURE_COUNT` finite entries and every
/// scale must be strictly positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    pub fn validate(&self) -> Result<(), ArtifactError> {
        if self.mean.len() != FEATURE_COUNT {
            return Err(ArtifactError::DimensionMismatch {
                what: "scaler mean",
                expected: FEATURE_COUNT,
                got: self.mean.len(),
            });
        }
        if self.scale.len() != FEATURE_COUNT {
            return Err(ArtifactError::DimensionMismatch {
                what: "scaler scale",
                expected: FEATURE_COUNT,
                got: self.scale.len(),
            });
        }
        for (i, &m) in self.mean.iter().enumerate() {
            if !m.is_finite() {
                return Err(ArtifactError::NonFiniteParameter {
                    what: "scaler mean",
                    index: i,
                    value: m,
                });
            }
        }
        for (i, &s) in self.scale.iter().enumerate() {
            if !s.is_finite() {
                return Err(ArtifactError::NonFiniteParameter {
                    what: "scaler scale",
                    index: i,
                    value: s,
                });
            }
            if s <= 0.0 {
                return Err(ArtifactError::NonPositiveScale { index: i, value: s });
            }
        }
        Ok(())
    }

    /// Load and validate from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ArtifactError> {
        let scaler: Self = serde_json::from_str(json).map_err(ArtifactError::ParseJson)?;
        scaler.validate()?;
        Ok(scaler)
    }

    /// Load and validate from a JSON file path.
    pub fn from_file(path: &Path) -> Result<Self, ArtifactError> {
        let content = std::fs::read_to_string(path).map_err(ArtifactError::Io)?;
        Self::from_json(&content)
    }

    /// The identity transform: zero mean, unit scale. Useful when the
    /// upstream aggregator already emits normalized features.
    pub fn identity() -> Self {
        Self {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![1.0; FEATURE_COUNT],
        }
    }
}

impl FeatureScaler for StandardScaler {
    fn normalize(&self, features: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = [0.0f64; FEATURE_COUNT];
        for i in 0..FEATURE_COUNT {
            out[i] = (features[i] - self.mean[i]) / self.scale[i];
        }
        out
    }
}
