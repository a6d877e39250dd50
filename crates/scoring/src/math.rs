/// Numerically stable logistic sigmoid.
///
/// Two-branch form: for `x < 0` the naive `1/(1+e^-x)` would overflow
/// `e^-x`, so that branch is rewritten in terms of `e^x`.
pub fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let ex = x.exp();
        ex / (1.0 + ex)
    }
}

/// Map an anomaly decision value into a 0–100 fatigue score.
///
/// The decision-function convention is `d > 0` for inliers and `d < 0` for
/// outliers, so `d` is negated to make higher output mean more fatigue.
/// `alpha` controls how sharply the score responds around `d = 0`. The
/// sigmoid bounds the result in [0, 100] by construction; no clamping.
pub fn decision_to_fatigue(decision_value: f64, alpha: f64) -> f64 {
    sigmoid(-decision_value * alpha) * 100.0
}

/// Round to the service's boundary precision of 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
