use analytics::{ProportionZTest, ValidationError};
use configuration::FormDefaults;
use core_types::{TailMode, ZTestInput};
use serde::{Deserialize, Serialize};

/// The raw fields of the calculator, as submitted by the HTML form or an API client.
///
/// The sample size is signed so a negative entry reaches validation and gets the
/// sample-size message rather than a decoding error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZTestForm {
    pub observed_proportion: f64,
    pub expected_proportion: f64,
    pub sample_size: i64,
    pub significance_level: f64,
    #[serde(default)]
    pub tail_mode: TailMode,
}

impl ZTestForm {
    /// Converts the form into a `ZTestInput`, reporting the first violated rule.
    pub fn validated_input(&self, engine: &ProportionZTest) -> Result<ZTestInput, ValidationError> {
        let input = ZTestInput::new(
            self.observed_proportion,
            self.expected_proportion,
            u64::try_from(self.sample_size).unwrap_or(0),
            self.significance_level,
            self.tail_mode,
        );
        engine.validate(&input).map_err(|e| match e {
            ValidationError::NonPositiveSampleSize(_) => {
                ValidationError::NonPositiveSampleSize(self.sample_size)
            }
            other => other,
        })?;
        Ok(input)
    }
}

impl From<&FormDefaults> for ZTestForm {
    fn from(defaults: &FormDefaults) -> Self {
        Self {
            observed_proportion: defaults.observed_proportion,
            expected_proportion: defaults.expected_proportion,
            sample_size: i64::try_from(defaults.sample_size).unwrap_or(i64::MAX),
            significance_level: defaults.significance_level,
            tail_mode: defaults.tail_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(sample_size: i64) -> ZTestForm {
        ZTestForm {
            observed_proportion: 0.5,
            expected_proportion: 0.4,
            sample_size,
            significance_level: 0.05,
            tail_mode: TailMode::TwoTailed,
        }
    }

    #[test]
    fn test_negative_sample_size_keeps_its_value() {
        let err = form(-5).validated_input(&ProportionZTest::new()).unwrap_err();
        assert_eq!(err, ValidationError::NonPositiveSampleSize(-5));
    }

    #[test]
    fn test_earlier_rules_win_over_sample_size() {
        let mut bad = form(-5);
        bad.observed_proportion = 2.0;
        let err = bad.validated_input(&ProportionZTest::new()).unwrap_err();
        assert_eq!(err, ValidationError::ObservedProportionOutOfRange(2.0));
    }

    #[test]
    fn test_valid_form_converts() {
        let input = form(100).validated_input(&ProportionZTest::new()).unwrap();
        assert_eq!(input.sample_size, 100);
        assert_eq!(input.tail_mode, TailMode::TwoTailed);
    }
}
