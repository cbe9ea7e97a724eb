//! IP-based location resolution with disk caching.
//!
//! The location drives the weather lookup. It is fetched once from the
//! ipgeolocation.io API and cached to disk indefinitely; a new lookup only
//! happens when no cache exists or the user runs `refresh-location`.
//! When neither the API nor the cache is usable, fixed fallback coordinates
//! keep the rest of the pipeline working.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::Config;
use crate::constants::{
    FALLBACK_CITY, FALLBACK_COUNTRY, FALLBACK_LATITUDE, FALLBACK_LONGITUDE,
    GEO_REQUEST_TIMEOUT_SECS, IPGEO_API_URL,
};
use crate::logger::Log;
use crate::utils::{read_json, write_json_atomic};

/// A resolved geographic location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub resolved_at: DateTime<Utc>,
}

impl LocationInfo {
    /// Fixed fallback coordinates used when no better data is available.
    pub fn fallback() -> Self {
        Self {
            city: FALLBACK_CITY.to_string(),
            country: FALLBACK_COUNTRY.to_string(),
            latitude: FALLBACK_LATITUDE,
            longitude: FALLBACK_LONGITUDE,
            resolved_at: Utc::now(),
        }
    }

    /// "City, Country" display form.
    pub fn summary(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

// ipgeolocation.io returns coordinates as JSON strings
#[derive(Debug, Deserialize)]
struct IpGeoResponse {
    latitude: String,
    longitude: String,
    city: Option<String>,
    country_name: Option<String>,
}

/// Resolver for the machine's location via the IP geolocation API.
pub struct LocationResolver {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    cache_path: PathBuf,
}

impl LocationResolver {
    pub fn new(config: &Config, cache_dir: &Path) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(GEO_REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for location lookups")?;

        Ok(Self {
            http,
            api_key: config.ipgeolocation_api_key.clone(),
            cache_path: cache_dir.join("location.json"),
        })
    }

    /// Resolve the current location.
    ///
    /// Order: disk cache, then the geolocation API (cached on success), then
    /// the fixed fallback. Never errors; failures are logged and degrade.
    pub fn resolve(&self) -> LocationInfo {
        if let Some(cached) = self.read_cache() {
            return cached;
        }

        match self.fetch() {
            Ok(info) => {
                if let Err(e) = write_json_atomic(&self.cache_path, &info) {
                    Log::log_warning(&format!("Failed to cache location data: {}", e));
                }
                info
            }
            Err(e) => {
                Log::log_warning(&format!("Location lookup failed: {}", e));
                Log::log_decorated(&format!(
                    "Using fallback coordinates ({})",
                    LocationInfo::fallback().summary()
                ));
                LocationInfo::fallback()
            }
        }
    }

    /// Force a fresh lookup, overwriting the cache wholesale.
    ///
    /// Unlike [`resolve`](Self::resolve) this propagates failures so the
    /// `refresh-location` command can report them.
    pub fn refresh(&self) -> Result<LocationInfo> {
        let info = self.fetch()?;

        if let Err(e) = write_json_atomic(&self.cache_path, &info) {
            Log::log_warning(&format!("Failed to cache location data: {}", e));
        }

        Ok(info)
    }

    fn fetch(&self) -> Result<LocationInfo> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| anyhow!("IP geolocation API key not configured"))?;

        let response = self
            .http
            .get(IPGEO_API_URL)
            .query(&[
                ("apiKey", api_key),
                ("fields", "latitude,longitude,city,country_name"),
            ])
            .send()
            .context("Failed to send request to the IP geolocation API")?;

        let status = response.status();
        let body = response
            .text()
            .context("Failed to read the IP geolocation response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "IP geolocation request failed with status {}",
                status
            ));
        }

        let parsed: IpGeoResponse =
            serde_json::from_str(&body).context("Failed to parse IP geolocation JSON")?;

        let latitude = parsed
            .latitude
            .parse::<f64>()
            .context("Geolocation response contained a non-numeric latitude")?;
        let longitude = parsed
            .longitude
            .parse::<f64>()
            .context("Geolocation response contained a non-numeric longitude")?;

        Ok(LocationInfo {
            city: parsed.city.unwrap_or_else(|| "Unknown".to_string()),
            country: parsed.country_name.unwrap_or_else(|| "Unknown".to_string()),
            latitude,
            longitude,
            resolved_at: Utc::now(),
        })
    }

    fn read_cache(&self) -> Option<LocationInfo> {
        if !self.cache_path.exists() {
            return None;
        }

        match read_json(&self.cache_path) {
            Ok(info) => Some(info),
            Err(e) => {
                Log::log_warning(&format!("Ignoring unreadable location cache: {}", e));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn resolver_without_key(cache_dir: &Path) -> LocationResolver {
        LocationResolver::new(&Config::default(), cache_dir).unwrap()
    }

    #[test]
    fn test_fallback_coordinates() {
        let info = LocationInfo::fallback();
        assert_eq!(info.summary(), "London, United Kingdom");
        assert!((info.latitude - 51.5074).abs() < f64::EPSILON);
        assert!((info.longitude - -0.1278).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resolve_without_key_or_cache_falls_back() {
        let dir = tempdir().unwrap();
        let resolver = resolver_without_key(dir.path());

        let info = resolver.resolve();
        assert_eq!(info.city, FALLBACK_CITY);
    }

    #[test]
    fn test_resolve_prefers_cached_location() {
        let dir = tempdir().unwrap();
        let cached = LocationInfo {
            city: "Oslo".to_string(),
            country: "Norway".to_string(),
            latitude: 59.9139,
            longitude: 10.7522,
            resolved_at: Utc::now(),
        };
        write_json_atomic(&dir.path().join("location.json"), &cached).unwrap();

        let resolver = resolver_without_key(dir.path());
        assert_eq!(resolver.resolve(), cached);
    }

    #[test]
    fn test_corrupt_cache_is_ignored() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("location.json"), "{ not json").unwrap();

        let resolver = resolver_without_key(dir.path());
        // Corrupt cache plus no API key leaves only the fallback
        assert_eq!(resolver.resolve().city, FALLBACK_CITY);
    }

    #[test]
    fn test_refresh_without_key_errors() {
        let dir = tempdir().unwrap();
        let resolver = resolver_without_key(dir.path());

        let err = resolver.refresh().unwrap_err();
        assert!(err.to_string().contains("not configured"));
    }
}
