use serde::Serialize;

use crate::artifacts::ArtifactStore;
use crate::constants::DEFAULT_ALPHA;
use crate::error::{InternalFault, ScoreError};
use crate::features::FeatureVector;
use crate::math::{decision_to_fatigue, round2};
use crate::severity::Severity;

/// Result of scoring one feature window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Assessment {
    /// Calibrated fatigue score in [0, 100], rounded to 2 decimals.
    pub fatigue_score: f64,
    pub severity: Severity,
}

/// The scoring pipeline: normalize → decision value → sigmoid mapping →
/// severity bucket. Stateless and side-effect free; safe to run from any
/// number of concurrent calls against a shared store.
#[derive(Debug, Clone, Copy)]
pub struct ScoringEngine {
    alpha: f64,
}

impl ScoringEngine {
    /// `alpha` sharpens the transition between normal and anomalous decision
    /// values around d = 0 (convention: alpha > 0). It is the single
    /// calibration knob; changing it never requires retraining the model.
    pub fn new(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn score(
        &self,
        store: &ArtifactStore,
        features: &FeatureVector,
    ) -> Result<Assessment, ScoreError> {
        let (scaler, model) = store.parts()?;

        let normalized = scaler.normalize(features.values());
        if let Some((index, value)) = normalized
            .iter()
            .copied()
            .enumerate()
            .find(|(_, v)| !v.is_finite())
        {
            return Err(ScoreError::Internal(InternalFault::NonFiniteNormalized {
                index,
                value,
            }));
        }

        let decision_value = model.decision_value(&normalized);
        if !decision_value.is_finite() {
            return Err(ScoreError::Internal(InternalFault::NonFiniteDecision {
                value: decision_value,
            }));
        }

        let fatigue_score = round2(decision_to_fatigue(decision_value, self.alpha));
        // Bucket the rounded score so the reported label always agrees with
        // the reported number.
        let severity = Severity::from_score(fatigue_score);

        Ok(Assessment {
            fatigue_score,
            severity,
        })
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
