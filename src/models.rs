use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How values that sit exactly between two integers are rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Banker's rounding, the behaviour numpy gives the model pipeline: `0.5 -> 0`, `1.5 -> 2`.
    #[default]
    HalfToEven,
    /// `0.5 -> 1`, `-0.5 -> -1`.
    HalfAwayFromZero,
}

impl RoundingMode {
    pub fn round(self, value: f64) -> f64 {
        match self {
            RoundingMode::HalfToEven => value.round_ties_even(),
            RoundingMode::HalfAwayFromZero => value.round(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    /// The inference payload exactly as it was parsed.
    pub original: Value,
    pub prediction: Vec<i64>,
}
