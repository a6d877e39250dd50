use std::fmt;

/// Structural failures while deserializing or validating an artifact.
/// Any of these at startup is fatal: the service must not become ready.
#[derive(Debug)]
pub enum ArtifactError {
    Io(std::io::Error),
    ParseJson(serde_json::Error),
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    NonFiniteParameter {
        what: &'static str,
        index: usize,
        value: f64,
    },
    NonPositiveScale {
        index: usize,
        value: f64,
    },
    EmptyForest,
    MalformedTree {
        tree: usize,
        node: usize,
        detail: &'static str,
    },
    InvalidSampleCount(usize),
    InvalidOffset(f64),
}

impl fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "artifact file IO error: {e}"),
            Self::ParseJson(e) => write!(f, "artifact JSON parse error: {e}"),
            Self::DimensionMismatch {
                what,
                expected,
                got,
            } => {
                write!(f, "{what} dimension mismatch: expected {expected}, got {got}")
            }
            Self::NonFiniteParameter { what, index, value } => {
                write!(f, "non-finite {what} at index {index}: {value}")
            }
            Self::NonPositiveScale { index, value } => {
                write!(f, "scale at index {index} must be positive, got {value}")
            }
            Self::EmptyForest => write!(f, "isolation forest has no trees"),
            Self::MalformedTree { tree, node, detail } => {
                write!(f, "malformed tree {tree} at node {node}: {detail}")
            }
            Self::InvalidSampleCount(n) => {
                write!(f, "max_samples must be at least 2, got {n}")
            }
            Self::InvalidOffset(v) => write!(f, "non-finite decision offset: {v}"),
        }
    }
}

impl std::error::Error for ArtifactError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::ParseJson(e) => Some(e),
            Self::DimensionMismatch { .. }
            | Self::NonFiniteParameter { .. }
            | Self::NonPositiveScale { .. }
            | Self::EmptyForest
            | Self::MalformedTree { .. }
            | Self::InvalidSampleCount(_)
            | Self::InvalidOffset(_) => None,
        }
    }
}

/// A feature vector that fails the scaler's input contract.
/// Recoverable per request; never crashes the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidInput {
    WrongLength { expected: usize, got: usize },
    NonFinite { index: usize, name: &'static str },
}

impl fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, got } => {
                write!(f, "expected {expected} features, got {got}")
            }
            Self::NonFinite { index, name } => {
                write!(f, "non-finite value at index {index} ({name})")
            }
        }
    }
}

impl std::error::Error for InvalidInput {}

/// A non-finite value produced inside the pipeline given already-validated
/// input. Signals a broken artifact, not bad client data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InternalFault {
    NonFiniteNormalized { index: usize, value: f64 },
    NonFiniteDecision { value: f64 },
}

impl fmt::Display for InternalFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFiniteNormalized { index, value } => {
                write!(f, "scaler produced non-finite value at index {index}: {value}")
            }
            Self::NonFiniteDecision { value } => {
                write!(f, "model produced non-finite decision value: {value}")
            }
        }
    }
}

impl std::error::Error for InternalFault {}

/// Everything a single scoring call can fail with. The three kinds stay
/// distinguishable so callers can tell "retry later" from "fix the request"
/// from "broken service".
#[derive(Debug)]
pub enum ScoreError {
    NotReady {
        model_loaded: bool,
        scaler_loaded: bool,
    },
    Input(InvalidInput),
    Internal(InternalFault),
}

impl fmt::Display for ScoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotReady {
                model_loaded,
                scaler_loaded,
            } => {
                write!(
                    f,
                    "artifacts not loaded (model: {model_loaded}, scaler: {scaler_loaded})"
                )
            }
            Self::Input(e) => write!(f, "invalid input: {e}"),
            Self::Internal(e) => write!(f, "internal scoring fault: {e}"),
        }
    }
}

impl std::error::Error for ScoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotReady { .. } => None,
            Self::Input(e) => Some(e),
            Self::Internal(e) => Some(e),
        }
    }
}

impl From<InvalidInput> for ScoreError {
    fn from(err: InvalidInput) -> Self {
        Self::Input(err)
    }
}
