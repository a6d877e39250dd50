//! Fatigue scoring core
//!
//! Deterministic pipeline from a usage-window feature vector to a calibrated
//! fatigue score and severity label:
//!
//! ```text
//! [x₁..x₁₄] ─→ scaler.normalize ─→ model.decision_value ─→ σ(-d·α)·100 ─→ bucket
//! ```
//!
//! The two artifacts (feature scaler, anomaly model) are trained offline and
//! deserialized once at startup; the pipeline itself is a pure function of
//! the loaded artifacts and the `alpha` steepness constant. Decision-value
//! convention: `d > 0` inlier (normal window), `d < 0` outlier — negating
//! `d` inside the sigmoid turns "more anomalous" into "more fatigued".

mod artifacts;
mod constants;
mod engine;
mod error;
mod features;
mod math;
mod model;
mod scaler;
mod severity;

pub use artifacts::{ArtifactKind, ArtifactLoadError, ArtifactStore, Readiness};
pub use constants::{DEFAULT_ALPHA, FEATURE_COUNT, FEATURE_NAMES};
pub use engine::{Assessment, ScoringEngine};
pub use error::{ArtifactError, InternalFault, InvalidInput, ScoreError};
pub use features::FeatureVector;
pub use math::{decision_to_fatigue, sigmoid};
pub use model::{AnomalyModel, IsolationForest, IsolationTree, TreeNode};
pub use scaler::{FeatureScaler, StandardScaler};
pub use severity::Severity;

#[cfg(test)]
mod tests;
