//! Time-based day/night classification.
//!
//! This module decides whether a given wall-clock moment counts as day or
//! night for profile selection. The boundary is a fixed heuristic — daytime
//! runs from `DAY_START_HOUR` to `NIGHT_START_HOUR` local time — rather than
//! an astronomical sunrise/sunset calculation.

use chrono::{DateTime, Local, Timelike};

use crate::constants::{DAY_START_HOUR, NIGHT_START_HOUR};

/// Represents the sun-relative period of the day.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum TimePeriod {
    Day,   // Natural color temperatures, weather-driven
    Night, // Warm color temperatures
}

impl TimePeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimePeriod::Day => "Day",
            TimePeriod::Night => "Night",
        }
    }
}

/// Classify a local timestamp as day or night.
///
/// Hours in `[DAY_START_HOUR, NIGHT_START_HOUR)` are day; everything else,
/// including the hours spanning midnight, is night.
pub fn time_period(now: &DateTime<Local>) -> TimePeriod {
    period_for_hour(now.hour())
}

/// Classify a bare hour-of-day (0-23) as day or night.
pub fn period_for_hour(hour: u32) -> TimePeriod {
    if (DAY_START_HOUR..NIGHT_START_HOUR).contains(&hour) {
        TimePeriod::Day
    } else {
        TimePeriod::Night
    }
}

/// Classify the current moment.
pub fn current_period() -> TimePeriod {
    time_period(&Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_hours() {
        assert_eq!(period_for_hour(5), TimePeriod::Night);
        assert_eq!(period_for_hour(6), TimePeriod::Day);
        assert_eq!(period_for_hour(19), TimePeriod::Day);
        assert_eq!(period_for_hour(20), TimePeriod::Night);
    }

    #[test]
    fn test_midnight_hours_are_night() {
        assert_eq!(period_for_hour(0), TimePeriod::Night);
        assert_eq!(period_for_hour(2), TimePeriod::Night);
        assert_eq!(period_for_hour(23), TimePeriod::Night);
    }

    #[test]
    fn test_midday_is_day() {
        assert_eq!(period_for_hour(12), TimePeriod::Day);
        assert_eq!(period_for_hour(14), TimePeriod::Day);
    }
}
