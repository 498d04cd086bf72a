use crate::enums::TailMode;
use serde::{Deserialize, Serialize};

/// The inputs of a one-sample Z-test for a proportion.
///
/// This is a transient value: it is built for a single calculation and never stored.
/// Domain checks happen in the analytics engine, not on construction, so that every
/// violated rule can be reported back to the user as its own message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestInput {
    /// The proportion observed in the sample (p̂), expected in [0, 1].
    pub observed_proportion: f64,
    /// The proportion under the null hypothesis (p₀), expected in [0, 1].
    pub expected_proportion: f64,
    /// Number of observations in the sample, expected to be positive.
    pub sample_size: u64,
    /// The significance level (α), expected in the open interval (0, 1).
    pub significance_level: f64,
    #[serde(default)]
    pub tail_mode: TailMode,
}

impl ZTestInput {
    pub fn new(
        observed_proportion: f64,
        expected_proportion: f64,
        sample_size: u64,
        significance_level: f64,
        tail_mode: TailMode,
    ) -> Self {
        Self {
            observed_proportion,
            expected_proportion,
            sample_size,
            significance_level,
            tail_mode,
        }
    }
}
