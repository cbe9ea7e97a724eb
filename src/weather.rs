//! Weather resolution with a TTL-gated disk cache.
//!
//! The resolver maps OpenWeatherMap's condition groups onto the coarse
//! [`WeatherCondition`] classification that drives profile selection. A
//! fetched result is cached to disk and reused until it is older than
//! `WEATHER_CACHE_TTL_SECS`, keeping the daemon from hammering the API on
//! every cycle. All failure modes degrade: a failed fetch serves the stale
//! cache when one exists, and otherwise reports "no data" so the selector
//! can fall back to time-of-day-only profiles.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::constants::{
    OPENWEATHER_API_URL, WEATHER_CACHE_TTL_SECS, WEATHER_REQUEST_TIMEOUT_SECS,
};
use crate::geo::LocationInfo;
use crate::logger::Log;
use crate::utils::{read_json, write_json_atomic};

/// Coarse weather classification driving profile selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherCondition {
    Clear,
    Clouds,
    Rain,
    /// Data present but the condition group is not one we recognize.
    Unknown,
}

impl WeatherCondition {
    /// Classify an OpenWeatherMap condition group (the `weather[0].main`
    /// field). Any precipitation counts as rain; the remaining known groups
    /// all dim the sky and count as clouds.
    pub fn classify(group: &str) -> Self {
        match group {
            "Clear" => WeatherCondition::Clear,
            "Rain" | "Drizzle" | "Thunderstorm" => WeatherCondition::Rain,
            "Clouds" | "Snow" | "Mist" | "Smoke" | "Haze" | "Dust" | "Fog" | "Sand" | "Ash"
            | "Squall" | "Tornado" => WeatherCondition::Clouds,
            _ => WeatherCondition::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherCondition::Clear => "Clear",
            WeatherCondition::Clouds => "Clouds",
            WeatherCondition::Rain => "Rain",
            WeatherCondition::Unknown => "Unknown",
        }
    }
}

/// A weather observation, as cached on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherInfo {
    pub condition: WeatherCondition,
    pub description: String,
    pub ambient_celsius: f64,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherInfo {
    /// Whether this observation is old enough to warrant a refetch.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        (now - self.fetched_at).num_seconds() >= WEATHER_CACHE_TTL_SECS
    }
}

// OpenWeatherMap response fragments, limited to the fields we consume
#[derive(Debug, Deserialize)]
struct OwmWeather {
    main: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwmResponse {
    weather: Vec<OwmWeather>,
    main: OwmMain,
}

/// Resolver for current weather at a location.
pub struct WeatherResolver {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    cache_path: PathBuf,
}

impl WeatherResolver {
    pub fn new(config: &Config, cache_dir: &Path) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(WEATHER_REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for weather lookups")?;

        Ok(Self {
            http,
            api_key: config.openweather_api_key.clone(),
            cache_path: cache_dir.join("weather.json"),
        })
    }

    /// Resolve the current weather, preferring a fresh cache entry.
    ///
    /// Returns `None` when no usable data exists at all; never errors. This
    /// is the graceful-degradation contract the selector depends on.
    pub fn current(&self, location: &LocationInfo) -> Option<WeatherInfo> {
        let cached = self.read_cache();

        if let Some(info) = &cached {
            if !info.is_stale(Utc::now()) {
                return cached;
            }
        }

        let Some(api_key) = self.api_key.as_deref() else {
            if cached.is_none() {
                Log::log_warning("OpenWeather API key not configured");
            }
            return cached;
        };

        match self.fetch(location, api_key) {
            Ok(info) => {
                if let Err(e) = write_json_atomic(&self.cache_path, &info) {
                    Log::log_warning(&format!("Failed to cache weather data: {}", e));
                }
                Some(info)
            }
            Err(e) => {
                Log::log_warning(&format!("Weather lookup failed: {}", e));
                if cached.is_some() {
                    Log::log_decorated("Falling back to cached weather data");
                }
                cached
            }
        }
    }

    fn fetch(&self, location: &LocationInfo, api_key: &str) -> Result<WeatherInfo> {
        let query = [
            ("lat", location.latitude.to_string()),
            ("lon", location.longitude.to_string()),
            ("appid", api_key.to_string()),
            ("units", "metric".to_string()),
        ];

        let response = self
            .http
            .get(OPENWEATHER_API_URL)
            .query(&query)
            .send()
            .context("Failed to send request to OpenWeather")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read OpenWeather response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather request failed with status {}",
                status
            ));
        }

        let parsed: OwmResponse =
            serde_json::from_str(&body).context("Failed to parse OpenWeather JSON")?;

        let (condition, description) = parsed
            .weather
            .first()
            .map(|w| (WeatherCondition::classify(&w.main), w.description.clone()))
            .unwrap_or((WeatherCondition::Unknown, "unknown".to_string()));

        Ok(WeatherInfo {
            condition,
            description,
            ambient_celsius: parsed.main.temp,
            fetched_at: Utc::now(),
        })
    }

    fn read_cache(&self) -> Option<WeatherInfo> {
        if !self.cache_path.exists() {
            return None;
        }

        match read_json(&self.cache_path) {
            Ok(info) => Some(info),
            Err(e) => {
                Log::log_warning(&format!("Ignoring unreadable weather cache: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use tempfile::tempdir;

    fn observation(condition: WeatherCondition, age_secs: i64) -> WeatherInfo {
        WeatherInfo {
            condition,
            description: "test".to_string(),
            ambient_celsius: 12.0,
            fetched_at: Utc::now() - ChronoDuration::seconds(age_secs),
        }
    }

    #[test]
    fn test_condition_classification() {
        assert_eq!(WeatherCondition::classify("Clear"), WeatherCondition::Clear);
        assert_eq!(WeatherCondition::classify("Rain"), WeatherCondition::Rain);
        assert_eq!(
            WeatherCondition::classify("Drizzle"),
            WeatherCondition::Rain
        );
        assert_eq!(
            WeatherCondition::classify("Thunderstorm"),
            WeatherCondition::Rain
        );
        assert_eq!(
            WeatherCondition::classify("Clouds"),
            WeatherCondition::Clouds
        );
        assert_eq!(WeatherCondition::classify("Mist"), WeatherCondition::Clouds);
        assert_eq!(WeatherCondition::classify("Snow"), WeatherCondition::Clouds);
        assert_eq!(
            WeatherCondition::classify("Plasma Storm"),
            WeatherCondition::Unknown
        );
    }

    #[test]
    fn test_staleness_boundary() {
        let now = Utc::now();
        let at_age = |age_secs: i64| WeatherInfo {
            condition: WeatherCondition::Clear,
            description: "test".to_string(),
            ambient_celsius: 12.0,
            fetched_at: now - ChronoDuration::seconds(age_secs),
        };

        assert!(!at_age(WEATHER_CACHE_TTL_SECS - 5).is_stale(now));
        assert!(at_age(WEATHER_CACHE_TTL_SECS).is_stale(now));
        assert!(at_age(WEATHER_CACHE_TTL_SECS + 5).is_stale(now));
    }

    #[test]
    fn test_fresh_cache_is_served_without_fetching() {
        let dir = tempdir().unwrap();
        let cached = observation(WeatherCondition::Rain, 30);
        write_json_atomic(&dir.path().join("weather.json"), &cached).unwrap();

        // No API key configured, so any cache miss would return None
        let resolver = WeatherResolver::new(&Config::default(), dir.path()).unwrap();
        let resolved = resolver.current(&LocationInfo::fallback()).unwrap();

        assert_eq!(resolved.condition, WeatherCondition::Rain);
    }

    #[test]
    fn test_stale_cache_without_key_is_still_served() {
        let dir = tempdir().unwrap();
        let cached = observation(WeatherCondition::Clouds, WEATHER_CACHE_TTL_SECS * 3);
        write_json_atomic(&dir.path().join("weather.json"), &cached).unwrap();

        let resolver = WeatherResolver::new(&Config::default(), dir.path()).unwrap();
        let resolved = resolver.current(&LocationInfo::fallback()).unwrap();

        assert_eq!(resolved.condition, WeatherCondition::Clouds);
    }

    #[test]
    fn test_no_cache_and_no_key_yields_none() {
        let dir = tempdir().unwrap();
        let resolver = WeatherResolver::new(&Config::default(), dir.path()).unwrap();

        assert!(resolver.current(&LocationInfo::fallback()).is_none());
    }

    #[test]
    fn test_weather_info_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("weather.json");
        let info = observation(WeatherCondition::Clear, 0);

        write_json_atomic(&path, &info).unwrap();
        let back: WeatherInfo = read_json(&path).unwrap();

        assert_eq!(back, info);
    }
}
