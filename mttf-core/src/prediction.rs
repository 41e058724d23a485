use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNIT_LABEL: &str = "Hours";

/// Predicted mean time to failure. No plausibility bounds are applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub hours: f64,
}

impl Prediction {
    pub fn new(hours: f64) -> Self {
        Self { hours }
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.hours, UNIT_LABEL)
    }
}
