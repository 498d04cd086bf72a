use core_types::ZTestInput;
use serde::{Deserialize, Serialize};

/// The outcome of a single Z-test calculation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestResult {
    /// How many standard errors the observed proportion lies from the expected one.
    pub z_value: f64,
    /// Tail probability under the standard normal, per the input's tail mode.
    pub p_value: f64,
    /// `p_value < significance_level`, strictly.
    pub is_significant: bool,
    /// The standard error `sqrt(p0 * (1 - p0) / n)` used to standardize the difference.
    pub standard_error: f64,
}

/// The rejection region of the null hypothesis on the z axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CriticalRegion {
    /// z <= lower or z >= upper, with lower = -upper.
    TwoSided { lower: f64, upper: f64 },
    /// z >= boundary
    Upper { boundary: f64 },
    /// z <= boundary
    Lower { boundary: f64 },
}

impl CriticalRegion {
    /// The critical value as a single number: the positive magnitude for a two-sided
    /// region, the boundary itself otherwise.
    pub fn critical_value(&self) -> f64 {
        match *self {
            CriticalRegion::TwoSided { upper, .. } => upper,
            CriticalRegion::Upper { boundary } | CriticalRegion::Lower { boundary } => boundary,
        }
    }

    /// Every boundary of the region, in ascending order.
    pub fn boundaries(&self) -> Vec<f64> {
        match *self {
            CriticalRegion::TwoSided { lower, upper } => vec![lower, upper],
            CriticalRegion::Upper { boundary } | CriticalRegion::Lower { boundary } => {
                vec![boundary]
            }
        }
    }

    pub fn contains(&self, z: f64) -> bool {
        match *self {
            CriticalRegion::TwoSided { lower, upper } => z <= lower || z >= upper,
            CriticalRegion::Upper { boundary } => z >= boundary,
            CriticalRegion::Lower { boundary } => z <= boundary,
        }
    }

    /// e.g. `±1.96` or `-1.64`
    pub fn label(&self) -> String {
        match *self {
            CriticalRegion::TwoSided { upper, .. } => format!("±{upper:.2}"),
            CriticalRegion::Upper { boundary } | CriticalRegion::Lower { boundary } => {
                format!("{boundary:.2}")
            }
        }
    }
}

/// Everything a presentation layer needs to display one calculation.
///
/// Bundles the input that was tested, the numeric result, the rejection region for the
/// chart, and the human-readable conclusion and interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZTestReport {
    pub input: ZTestInput,
    pub result: ZTestResult,
    pub critical_region: CriticalRegion,
    pub conclusion: String,
    pub interpretation: Vec<String>,
}

impl ZTestReport {
    pub fn new(input: ZTestInput, result: ZTestResult, critical_region: CriticalRegion) -> Self {
        let conclusion = conclusion(&input, &result);
        let interpretation = interpretation(&input, &result);
        Self {
            input,
            result,
            critical_region,
            conclusion,
            interpretation,
        }
    }

    /// A short verdict line, e.g. "Statistically SIGNIFICANT".
    pub fn verdict(&self) -> &'static str {
        if self.result.is_significant {
            "Statistically SIGNIFICANT"
        } else {
            "NOT statistically significant"
        }
    }
}

fn conclusion(input: &ZTestInput, result: &ZTestResult) -> String {
    if result.is_significant {
        format!(
            "Reject the null hypothesis (H0: p = {})",
            input.expected_proportion
        )
    } else {
        format!(
            "Fail to reject the null hypothesis (H0: p = {})",
            input.expected_proportion
        )
    }
}

fn interpretation(input: &ZTestInput, result: &ZTestResult) -> Vec<String> {
    let (comparison, decision) = if result.is_significant {
        ("<", "H0 is rejected")
    } else {
        ("≥", "H0 is not rejected")
    };
    vec![
        format!(
            "z value = {}: the number of standard errors between the observed proportion and the expected proportion.",
            result.z_value
        ),
        format!(
            "p-value = {}: the probability of a result at least this extreme, assuming H0 is true.",
            result.p_value
        ),
        format!(
            "Decision rule: since p-value {comparison} α ({}), {decision}.",
            input.significance_level
        ),
    ]
}
