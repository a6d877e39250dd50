use serde::{Deserialize, Serialize};

/// Discretized fatigue score. Buckets are lower-inclusive:
/// [0, 25) Healthy, [25, 50) Mild, [50, 75) High, [75, 100] Severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Healthy,
    Mild,
    High,
    Severe,
}

impl Severity {
    /// Bucket a (rounded) fatigue score. Scores at a boundary resolve to
    /// the higher bucket.
    pub fn from_score(score: f64) -> Self {
        if score < 25.0 {
            Self::Healthy
        } else if score < 50.0 {
            Self::Mild
        } else if score < 75.0 {
            Self::High
        } else {
            Self::Severe
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Mild => "Mild",
            Self::High => "High",
            Self::Severe => "Severe",
        }
    }

    /// Numeric severity level for ordering (0=Healthy, 3=Severe).
    pub fn numeric(&self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Mild => 1,
            Self::High => 2,
            Self::Severe => 3,
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.numeric().cmp(&other.numeric())
    }
}
