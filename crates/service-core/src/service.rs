use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use fatigue_scoring::{
    ArtifactLoadError, ArtifactStore, FeatureVector, ScoreError, ScoringEngine, Severity,
};

use crate::config::ServiceConfig;

/// One scoring request from the external collaborator.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub features: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResponse {
    pub fatigue_score: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub scaler_loaded: bool,
}

/// Wire error object with a stable machine-readable kind:
/// `not_ready` | `invalid_input` | `internal`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub kind: &'static str,
    pub message: String,
}

impl ErrorResponse {
    fn from_score_error(err: &ScoreError) -> Self {
        let kind = match err {
            ScoreError::NotReady { .. } => "not_ready",
            ScoreError::Input(_) => "invalid_input",
            ScoreError::Internal(_) => "internal",
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// One loaded service instance: the engine plus the artifact store, shared
/// read-only across requests.
pub struct ScoringService {
    engine: ScoringEngine,
    store: ArtifactStore,
}

impl ScoringService {
    /// One-time startup load of both artifacts. A failure here must abort
    /// startup; the service never transitions to ready without it.
    pub fn initialize(config: &ServiceConfig) -> Result<Self, ArtifactLoadError> {
        let store = ArtifactStore::load(&config.model_path, &config.scaler_path)?;
        Ok(Self {
            engine: ScoringEngine::new(config.alpha),
            store,
        })
    }

    /// A service with no artifacts: every score call answers not-ready.
    /// Models the window before load completes (or after a failed load).
    pub fn not_ready(alpha: f64) -> Self {
        Self {
            engine: ScoringEngine::new(alpha),
            store: ArtifactStore::empty(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_store(alpha: f64, store: ArtifactStore) -> Self {
        Self {
            engine: ScoringEngine::new(alpha),
            store,
        }
    }

    /// Readiness probe. Always succeeds.
    pub fn health(&self) -> HealthResponse {
        let readiness = self.store.readiness();
        HealthResponse {
            status: "ok",
            model_loaded: readiness.model_loaded,
            scaler_loaded: readiness.scaler_loaded,
        }
    }

    /// Score one feature window. Input validation runs before any artifact
    /// call; no partial results.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreResponse, ScoreError> {
        let features = FeatureVector::new(&request.features).map_err(ScoreError::Input)?;
        let assessment = self.engine.score(&self.store, &features)?;
        Ok(ScoreResponse {
            fatigue_score: assessment.fatigue_score,
            severity: assessment.severity,
        })
    }

    /// Handle one line of the stdio transport: parse, score, serialize.
    /// Errors are answered on the wire and logged, never propagated.
    pub fn handle_line(&self, line: &str) -> String {
        let request: ScoreRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "unparseable score request");
                return to_json(&ErrorResponse {
                    kind: "invalid_input",
                    message: format!("malformed request: {err}"),
                });
            }
        };

        match self.score(&request) {
            Ok(response) => to_json(&response),
            Err(err) => {
                match &err {
                    ScoreError::Internal(fault) => {
                        error!(fault = %fault, "internal scoring fault");
                    }
                    ScoreError::NotReady { .. } | ScoreError::Input(_) => {
                        warn!(error = %err, "score request rejected");
                    }
                }
                to_json(&ErrorResponse::from_score_error(&err))
            }
        }
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|err| {
        error!(error = %err, "response serialization failed");
        String::from("{\"kind\":\"internal\",\"message\":\"response serialization failed\"}")
    })
}
