use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The alternative hypothesis of the test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "kebab-case")]
pub enum TailMode {
    /// H1: p != p0
    #[default]
    TwoTailed,
    /// H1: p > p0
    RightTailed,
    /// H1: p < p0
    LeftTailed,
}

impl TailMode {
    pub const ALL: [TailMode; 3] = [
        TailMode::TwoTailed,
        TailMode::RightTailed,
        TailMode::LeftTailed,
    ];

    /// The kebab-case identifier used in config files, query strings and form values.
    pub fn as_str(&self) -> &'static str {
        match self {
            TailMode::TwoTailed => "two-tailed",
            TailMode::RightTailed => "right-tailed",
            TailMode::LeftTailed => "left-tailed",
        }
    }

    /// A human-readable label for result displays.
    pub fn label(&self) -> &'static str {
        match self {
            TailMode::TwoTailed => "Two-tailed",
            TailMode::RightTailed => "One-tailed (right)",
            TailMode::LeftTailed => "One-tailed (left)",
        }
    }
}

impl fmt::Display for TailMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TailMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "two-tailed" | "two" | "both" => Ok(TailMode::TwoTailed),
            "right-tailed" | "right" | "greater" => Ok(TailMode::RightTailed),
            "left-tailed" | "left" | "less" => Ok(TailMode::LeftTailed),
            other => Err(CoreError::InvalidInput(
                "tail mode".to_string(),
                format!("'{other}' (expected two-tailed, right-tailed or left-tailed)"),
            )),
        }
    }
}
