use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Aggregation window shown on the dashboard.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFilter {
    /// Per day.
    Daily,
    /// Per week; the dashboard default.
    #[default]
    Weekly,
    /// Per month.
    Monthly,
}

impl fmt::Display for TimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeFilter::Daily => write!(f, "daily"),
            TimeFilter::Weekly => write!(f, "weekly"),
            TimeFilter::Monthly => write!(f, "monthly"),
        }
    }
}

/// Error returned when parsing an invalid time filter.
#[derive(Debug)]
pub struct TimeFilterParseError {
    /// The invalid string value that could not be parsed.
    pub invalid_value: String,
}

impl fmt::Display for TimeFilterParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown time filter: {}", self.invalid_value)
    }
}

impl std::error::Error for TimeFilterParseError {}

impl FromStr for TimeFilter {
    type Err = TimeFilterParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(TimeFilter::Daily),
            "weekly" => Ok(TimeFilter::Weekly),
            "monthly" => Ok(TimeFilter::Monthly),
            _ => Err(TimeFilterParseError {
                invalid_value: s.to_string(),
            }),
        }
    }
}
