//! The fixed temperature profile table and the selection decision logic.
//!
//! This is the core of hyprlight: a pure function from wall-clock time and
//! (optionally) current weather to one of seven fixed Kelvin profiles.
//! Weather being unavailable is a supported input, not an error — selection
//! then degrades to time-of-day-only profiles, so network failures can
//! never block a display update.
//!
//! Manual mode bypasses this module entirely; the mode controller hands out
//! the two manual profiles directly.

use chrono::{DateTime, Local};

use crate::constants::{
    COLD_NIGHT_THRESHOLD_CELSIUS, DAY_CLEAR_TEMP, DAY_CLOUDY_TEMP, DAY_RAINY_TEMP,
    MANUAL_OFF_TEMP, MANUAL_ON_TEMP, NIGHT_COLD_TEMP, NIGHT_DEFAULT_TEMP,
};
use crate::time_state::{self, TimePeriod};
use crate::weather::{WeatherCondition, WeatherInfo};

/// A named Kelvin temperature setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    DayClear,
    DayCloudy,
    DayRainy,
    NightDefault,
    NightCold,
    ManualOn,
    ManualOff,
}

impl Profile {
    /// The Kelvin value this profile applies.
    pub fn kelvin(self) -> u32 {
        match self {
            Profile::DayClear => DAY_CLEAR_TEMP,
            Profile::DayCloudy => DAY_CLOUDY_TEMP,
            Profile::DayRainy => DAY_RAINY_TEMP,
            Profile::NightDefault => NIGHT_DEFAULT_TEMP,
            Profile::NightCold => NIGHT_COLD_TEMP,
            Profile::ManualOn => MANUAL_ON_TEMP,
            Profile::ManualOff => MANUAL_OFF_TEMP,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Profile::DayClear => "day-clear",
            Profile::DayCloudy => "day-cloudy",
            Profile::DayRainy => "day-rainy",
            Profile::NightDefault => "night-default",
            Profile::NightCold => "night-cold",
            Profile::ManualOn => "manual-on",
            Profile::ManualOff => "manual-off",
        }
    }
}

/// Select the automatic profile for a moment in time and, when available,
/// the current weather.
pub fn select_profile(now: &DateTime<Local>, weather: Option<&WeatherInfo>) -> Profile {
    select_for_period(time_state::time_period(now), weather)
}

/// Period-level selection, split out so both halves of the day can be
/// exercised directly.
pub fn select_for_period(period: TimePeriod, weather: Option<&WeatherInfo>) -> Profile {
    match (period, weather) {
        // No weather data at all: time-of-day-only selection
        (TimePeriod::Day, None) => Profile::DayClear,
        (TimePeriod::Night, None) => Profile::NightDefault,

        (TimePeriod::Day, Some(weather)) => match weather.condition {
            WeatherCondition::Clear => Profile::DayClear,
            WeatherCondition::Clouds => Profile::DayCloudy,
            WeatherCondition::Rain => Profile::DayRainy,
            // Unrecognized condition data: safe default
            WeatherCondition::Unknown => Profile::DayClear,
        },

        (TimePeriod::Night, Some(weather)) => {
            // Rainy nights get the cold profile regardless of temperature
            if weather.condition == WeatherCondition::Rain
                || weather.ambient_celsius < COLD_NIGHT_THRESHOLD_CELSIUS
            {
                Profile::NightCold
            } else {
                Profile::NightDefault
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn weather(condition: WeatherCondition, ambient_celsius: f64) -> WeatherInfo {
        WeatherInfo {
            condition,
            description: "test conditions".to_string(),
            ambient_celsius,
            fetched_at: Utc::now(),
        }
    }

    fn local_at_hour(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 6, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_day_branch_table() {
        let cases = [
            (WeatherCondition::Clear, Profile::DayClear),
            (WeatherCondition::Clouds, Profile::DayCloudy),
            (WeatherCondition::Rain, Profile::DayRainy),
            (WeatherCondition::Unknown, Profile::DayClear),
        ];

        for (condition, expected) in cases {
            let w = weather(condition, 18.0);
            assert_eq!(
                select_for_period(TimePeriod::Day, Some(&w)),
                expected,
                "condition {:?}",
                condition
            );
        }
    }

    #[test]
    fn test_night_cold_threshold() {
        let below = weather(WeatherCondition::Clear, 4.9);
        let at = weather(WeatherCondition::Clear, 5.0);
        let above = weather(WeatherCondition::Clear, 11.0);

        assert_eq!(
            select_for_period(TimePeriod::Night, Some(&below)),
            Profile::NightCold
        );
        assert_eq!(
            select_for_period(TimePeriod::Night, Some(&at)),
            Profile::NightDefault
        );
        assert_eq!(
            select_for_period(TimePeriod::Night, Some(&above)),
            Profile::NightDefault
        );
    }

    #[test]
    fn test_rainy_night_is_cold_even_when_warm() {
        let w = weather(WeatherCondition::Rain, 15.0);
        assert_eq!(
            select_for_period(TimePeriod::Night, Some(&w)),
            Profile::NightCold
        );
    }

    #[test]
    fn test_missing_weather_falls_back_to_time_of_day() {
        assert_eq!(select_for_period(TimePeriod::Day, None), Profile::DayClear);
        assert_eq!(
            select_for_period(TimePeriod::Night, None),
            Profile::NightDefault
        );
    }

    #[test]
    fn test_freezing_night_selects_cold_profile() {
        // 02:00 local with -2°C ambient
        let w = weather(WeatherCondition::Clear, -2.0);
        let selected = select_profile(&local_at_hour(2), Some(&w));

        assert_eq!(selected, Profile::NightCold);
        assert_eq!(selected.kelvin(), NIGHT_COLD_TEMP);
    }

    #[test]
    fn test_clear_afternoon_selects_day_clear() {
        // 14:00 local, clear skies
        let w = weather(WeatherCondition::Clear, 22.0);
        let selected = select_profile(&local_at_hour(14), Some(&w));

        assert_eq!(selected, Profile::DayClear);
        assert_eq!(selected.kelvin(), 6500);
    }

    #[test]
    fn test_afternoon_with_failed_resolver_selects_day_clear() {
        // 14:00 local, weather resolver failed
        let selected = select_profile(&local_at_hour(14), None);

        assert_eq!(selected, Profile::DayClear);
        assert_eq!(selected.kelvin(), 6500);
    }

    #[test]
    fn test_profile_kelvin_table() {
        assert_eq!(Profile::DayClear.kelvin(), 6500);
        assert_eq!(Profile::DayCloudy.kelvin(), 5800);
        assert_eq!(Profile::DayRainy.kelvin(), 5200);
        assert_eq!(Profile::NightDefault.kelvin(), 4200);
        assert_eq!(Profile::NightCold.kelvin(), 3800);
        assert_eq!(Profile::ManualOn.kelvin(), 5000);
        assert_eq!(Profile::ManualOff.kelvin(), 6500);
    }
}
