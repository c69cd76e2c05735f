use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::error::{Error, Result};

/// Inclusive calendar range selected on the dashboard.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First day, inclusive.
    pub start: Date,
    /// Last day, inclusive.
    pub end: Date,
}

impl DateRange {
    /// Creates a range, rejecting one that ends before it starts.
    pub fn new(start: Date, end: Date) -> Result<Self> {
        if start > end {
            return Err(Error::validation(
                format!("date range starts after it ends ({start} > {end})"),
                Some("date_range".to_string()),
            ));
        }
        Ok(Self { start, end })
    }

    /// The seven days before `today` through `today`.
    pub fn last_week(today: Date) -> Self {
        Self {
            start: today.saturating_sub(Duration::days(7)),
            end: today,
        }
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn last_week_spans_eight_days() {
        let range = DateRange::last_week(date!(2024 - 03 - 08));
        assert_eq!(range.start, date!(2024 - 03 - 01));
        assert_eq!(range.days(), 8);
    }

    #[test]
    fn inverted_range_rejected() {
        let err = DateRange::new(date!(2024 - 03 - 08), date!(2024 - 03 - 01)).unwrap_err();
        assert!(err.is_validation());
        assert!(DateRange::new(date!(2024 - 03 - 01), date!(2024 - 03 - 01)).is_ok());
    }
}
