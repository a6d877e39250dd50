use std::path::PathBuf;

use fatigue_scoring::DEFAULT_ALPHA;

const DEFAULT_MODEL_PATH: &str = "models/fatigue_model.json";
const DEFAULT_SCALER_PATH: &str = "models/scaler.json";

/// Process-wide configuration: read once at startup, immutable afterwards.
/// No other runtime knob affects core scoring behavior.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub model_path: PathBuf,
    pub scaler_path: PathBuf,
    /// Steepness of the decision-value → fatigue transition. The single
    /// calibration knob if a future model family rescales its decision
    /// values; recalibrating it never requires retraining.
    pub alpha: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            scaler_path: PathBuf::from(DEFAULT_SCALER_PATH),
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ServiceConfig {
    /// Defaults overridden by environment variables.
    pub fn load() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Unparseable or non-finite overrides keep the default.
    fn apply_overrides(&mut self, get: impl Fn(&str) -> Option<String>) {
        if let Some(v) = get("FATIGUE_MODEL_PATH").filter(|v| !v.trim().is_empty()) {
            self.model_path = PathBuf::from(v);
        }
        if let Some(v) = get("FATIGUE_SCALER_PATH").filter(|v| !v.trim().is_empty()) {
            self.scaler_path = PathBuf::from(v);
        }
        if let Some(v) = get("FATIGUE_SCORE_ALPHA").filter(|v| !v.trim().is_empty()) {
            if let Ok(parsed) = v.parse::<f64>() {
                if parsed.is_finite() {
                    self.alpha = parsed;
                }
            }
        }
    }
}
