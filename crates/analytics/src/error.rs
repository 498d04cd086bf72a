use thiserror::Error;

/// A violated input domain. Each rule gets its own variant so the presentation layer can
/// show a specific message per mistake.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("The observed proportion must be between 0 and 1 (got {0})")]
    ObservedProportionOutOfRange(f64),

    #[error("The expected proportion must be between 0 and 1 (got {0})")]
    ExpectedProportionOutOfRange(f64),

    #[error("The sample size must be positive (got {0})")]
    NonPositiveSampleSize(i64),

    #[error("The significance level must be strictly between 0 and 1 (got {0})")]
    SignificanceLevelOutOfRange(f64),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(
        "Degenerate input: an expected proportion of {0} gives a standard error of zero, so the Z statistic is undefined"
    )]
    DegenerateInput(f64),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
