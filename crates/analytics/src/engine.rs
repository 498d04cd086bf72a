use crate::distribution;
use crate::error::{AnalyticsError, ValidationError};
use crate::report::{CriticalRegion, ZTestReport, ZTestResult};
use core_types::{TailMode, ZTestInput};

/// A stateless calculator for the one-sample Z-test for a proportion.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProportionZTest {}

impl ProportionZTest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks every input against its domain, reporting the first rule that is violated.
    ///
    /// Rules are checked in a fixed order: observed proportion, expected proportion,
    /// sample size, significance level. NaN fails every check.
    pub fn validate(&self, input: &ZTestInput) -> Result<(), ValidationError> {
        if !(0.0..=1.0).contains(&input.observed_proportion) {
            return Err(ValidationError::ObservedProportionOutOfRange(
                input.observed_proportion,
            ));
        }
        if !(0.0..=1.0).contains(&input.expected_proportion) {
            return Err(ValidationError::ExpectedProportionOutOfRange(
                input.expected_proportion,
            ));
        }
        if input.sample_size == 0 {
            return Err(ValidationError::NonPositiveSampleSize(0));
        }
        validate_significance_level(input.significance_level)
    }

    /// The main entry point: computes the Z statistic, the p-value and the verdict.
    ///
    /// # Errors
    ///
    /// * `AnalyticsError::Validation` if any input is outside its domain.
    /// * `AnalyticsError::DegenerateInput` if the expected proportion is exactly 0 or 1,
    ///   since the standard error is then zero.
    pub fn compute(&self, input: &ZTestInput) -> Result<ZTestResult, AnalyticsError> {
        self.validate(input)?;

        let standard_error = self.standard_error(input)?;
        let z_value = (input.observed_proportion - input.expected_proportion) / standard_error;
        if !z_value.is_finite() {
            return Err(AnalyticsError::Calculation(format!(
                "z value is not finite ({z_value})"
            )));
        }

        let p_value = self.p_value(z_value, input.tail_mode);
        let is_significant = p_value < input.significance_level;

        tracing::debug!(
            standard_error,
            z_value,
            p_value,
            is_significant,
            tail_mode = %input.tail_mode,
            "Computed proportion Z-test."
        );

        Ok(ZTestResult {
            z_value,
            p_value,
            is_significant,
            standard_error,
        })
    }

    /// Computes the result together with its critical region and the readable conclusion.
    pub fn report(&self, input: &ZTestInput) -> Result<ZTestReport, AnalyticsError> {
        let result = self.compute(input)?;
        let region = self.critical_region(input.significance_level, input.tail_mode)?;
        Ok(ZTestReport::new(*input, result, region))
    }

    /// The z boundary beyond which the null hypothesis is rejected.
    ///
    /// For a two-tailed test this is the positive magnitude `c`; the region is `|z| >= c`.
    pub fn critical_value(
        &self,
        significance_level: f64,
        tail_mode: TailMode,
    ) -> Result<f64, AnalyticsError> {
        Ok(self
            .critical_region(significance_level, tail_mode)?
            .critical_value())
    }

    /// The full rejection region for the given significance level and tail mode.
    pub fn critical_region(
        &self,
        significance_level: f64,
        tail_mode: TailMode,
    ) -> Result<CriticalRegion, AnalyticsError> {
        validate_significance_level(significance_level)?;

        let region = match tail_mode {
            TailMode::TwoTailed => {
                let upper = distribution::quantile(1.0 - significance_level / 2.0);
                CriticalRegion::TwoSided {
                    lower: -upper,
                    upper,
                }
            }
            TailMode::RightTailed => CriticalRegion::Upper {
                boundary: distribution::quantile(1.0 - significance_level),
            },
            TailMode::LeftTailed => CriticalRegion::Lower {
                boundary: distribution::quantile(significance_level),
            },
        };
        Ok(region)
    }

    fn standard_error(&self, input: &ZTestInput) -> Result<f64, AnalyticsError> {
        let p0 = input.expected_proportion;
        if p0 == 0.0 || p0 == 1.0 {
            return Err(AnalyticsError::DegenerateInput(p0));
        }
        Ok((p0 * (1.0 - p0) / input.sample_size as f64).sqrt())
    }

    fn p_value(&self, z_value: f64, tail_mode: TailMode) -> f64 {
        match tail_mode {
            TailMode::TwoTailed => (2.0 * distribution::sf(z_value.abs())).min(1.0),
            TailMode::RightTailed => distribution::sf(z_value),
            TailMode::LeftTailed => distribution::cdf(z_value),
        }
    }
}

fn validate_significance_level(significance_level: f64) -> Result<(), ValidationError> {
    if significance_level > 0.0 && significance_level < 1.0 {
        Ok(())
    } else {
        Err(ValidationError::SignificanceLevelOutOfRange(
            significance_level,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> ProportionZTest {
        ProportionZTest::new()
    }

    #[test]
    fn test_scenario_two_tailed_significant() {
        let input = ZTestInput::new(0.5, 0.4, 100, 0.05, TailMode::TwoTailed);
        let result = engine().compute(&input).unwrap();

        assert!((result.standard_error - 0.04899).abs() < 1e-5);
        assert!((result.z_value - 2.0412).abs() < 1e-4);
        assert!((result.p_value - 0.0412).abs() < 1e-4);
        assert!(result.is_significant);
    }

    #[test]
    fn test_scenario_no_difference() {
        let input = ZTestInput::new(0.4, 0.4, 100, 0.05, TailMode::TwoTailed);
        let result = engine().compute(&input).unwrap();

        assert_eq!(result.z_value, 0.0);
        assert!((result.p_value - 1.0).abs() < 1e-12);
        assert!(!result.is_significant);
    }

    #[test]
    fn test_scenario_right_tailed_not_significant() {
        let input = ZTestInput::new(0.45, 0.4, 200, 0.01, TailMode::RightTailed);
        let result = engine().compute(&input).unwrap();

        assert!((result.standard_error - 0.03464).abs() < 1e-5);
        assert!((result.z_value - 1.4434).abs() < 1e-4);
        assert!((result.p_value - 0.0745).abs() < 1e-4);
        assert!(!result.is_significant);
    }

    #[test]
    fn test_left_tailed_uses_lower_tail() {
        let input = ZTestInput::new(0.3, 0.4, 100, 0.05, TailMode::LeftTailed);
        let result = engine().compute(&input).unwrap();

        assert!(result.z_value < 0.0);
        assert!((result.p_value - distribution::cdf(result.z_value)).abs() < 1e-12);
        assert!(result.is_significant);
    }

    #[test]
    fn test_p_value_equal_to_alpha_is_not_significant() {
        let mut input = ZTestInput::new(0.5, 0.4, 100, 0.05, TailMode::TwoTailed);
        let first = engine().compute(&input).unwrap();

        input.significance_level = first.p_value;
        let second = engine().compute(&input).unwrap();
        assert_eq!(second.p_value, input.significance_level);
        assert!(!second.is_significant);
    }

    #[test]
    fn test_validation_rejects_each_rule() {
        let e = engine();
        let base = ZTestInput::new(0.5, 0.4, 100, 0.05, TailMode::TwoTailed);

        let observed = ZTestInput {
            observed_proportion: 1.5,
            ..base
        };
        assert_eq!(
            e.compute(&observed),
            Err(ValidationError::ObservedProportionOutOfRange(1.5).into())
        );

        let expected = ZTestInput {
            expected_proportion: -0.1,
            ..base
        };
        assert_eq!(
            e.compute(&expected),
            Err(ValidationError::ExpectedProportionOutOfRange(-0.1).into())
        );

        let empty = ZTestInput {
            sample_size: 0,
            ..base
        };
        assert_eq!(
            e.compute(&empty),
            Err(ValidationError::NonPositiveSampleSize(0).into())
        );

        let alpha = ZTestInput {
            significance_level: 1.0,
            ..base
        };
        assert_eq!(
            e.compute(&alpha),
            Err(ValidationError::SignificanceLevelOutOfRange(1.0).into())
        );
    }

    #[test]
    fn test_validation_rejects_nan() {
        let input = ZTestInput::new(f64::NAN, 0.4, 100, 0.05, TailMode::TwoTailed);
        assert!(matches!(
            engine().compute(&input),
            Err(AnalyticsError::Validation(
                ValidationError::ObservedProportionOutOfRange(_)
            ))
        ));
    }

    #[test]
    fn test_degenerate_expected_proportion() {
        let zero = ZTestInput::new(0.2, 0.0, 50, 0.05, TailMode::TwoTailed);
        assert_eq!(
            engine().compute(&zero),
            Err(AnalyticsError::DegenerateInput(0.0))
        );

        let one = ZTestInput::new(1.0, 1.0, 50, 0.05, TailMode::RightTailed);
        assert_eq!(
            engine().compute(&one),
            Err(AnalyticsError::DegenerateInput(1.0))
        );
    }

    #[test]
    fn test_critical_values() {
        let e = engine();
        let two = e.critical_value(0.05, TailMode::TwoTailed).unwrap();
        let right = e.critical_value(0.05, TailMode::RightTailed).unwrap();
        let left = e.critical_value(0.05, TailMode::LeftTailed).unwrap();

        assert!((two - 1.959964).abs() < 1e-6);
        assert!((right - 1.644854).abs() < 1e-6);
        assert!((left + 1.644854).abs() < 1e-6);
    }

    #[test]
    fn test_critical_value_rejects_invalid_alpha() {
        assert_eq!(
            engine().critical_value(0.0, TailMode::TwoTailed),
            Err(ValidationError::SignificanceLevelOutOfRange(0.0).into())
        );
    }

    #[test]
    fn test_report_carries_region_and_conclusion() {
        let input = ZTestInput::new(0.5, 0.4, 100, 0.05, TailMode::TwoTailed);
        let report = engine().report(&input).unwrap();

        assert!(report.critical_region.contains(report.result.z_value));
        assert_eq!(report.conclusion, "Reject the null hypothesis (H0: p = 0.4)");
        assert_eq!(report.interpretation.len(), 3);
    }
}
