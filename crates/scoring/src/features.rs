use crate::constants::{FEATURE_COUNT, FEATURE_NAMES};
use crate::error::InvalidInput;

/// A validated usage-window feature vector.
///
/// Construction is the only validation point: once built, the vector is a
/// fixed-size array of finite values and downstream code cannot observe a
/// wrong shape. Built per request, discarded after scoring.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn new(values: &[f64]) -> Result<Self, InvalidInput> {
        if values.len() != FEATURE_COUNT {
            return Err(InvalidInput::WrongLength {
                expected: FEATURE_COUNT,
                got: values.len(),
            });
        }

        let mut out = [0.0f64; FEATURE_COUNT];
        for (i, &v) in values.iter().enumerate() {
            if !v.is_finite() {
                return Err(InvalidInput::NonFinite {
                    index: i,
                    name: FEATURE_NAMES[i],
                });
            }
            out[i] = v;
        }

        Ok(Self { values: out })
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = InvalidInput;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&values)
    }
}
