/// Number of features in a usage-window vector.
pub const FEATURE_COUNT: usize = 14;

/// Canonical feature order produced by the upstream window aggregator.
/// Used for diagnostics; the pipeline itself treats the vector as opaque.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "total_active_minutes",
    "longest_continuous_session",
    "avg_session_length",
    "app_switch_count",
    "tab_switch_count",
    "context_switch_rate",
    "unique_apps",
    "unique_websites",
    "late_night_usage_ratio",
    "early_morning_usage_ratio",
    "idle_minutes",
    "idle_ratio",
    "break_count",
    "avg_break_length",
];

/// Default steepness of the decision-value → fatigue transition around d = 0.
pub const DEFAULT_ALPHA: f64 = 5.0;
