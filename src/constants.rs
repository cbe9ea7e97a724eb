//! Application constants and default values for hyprlight.
//!
//! This module contains the fixed temperature profile table, the day/night
//! boundary heuristic, API endpoints, and the operational constants used
//! throughout the application.

// ═══ Temperature Profiles (Kelvin) ═══
// The fixed profile table driving automatic and manual selection

pub const DAY_CLEAR_TEMP: u32 = 6500; // Close to natural sunlight
pub const DAY_CLOUDY_TEMP: u32 = 5800;
pub const DAY_RAINY_TEMP: u32 = 5200;
pub const NIGHT_DEFAULT_TEMP: u32 = 4200;
pub const NIGHT_COLD_TEMP: u32 = 3800; // Extra-warm for cold or rainy nights
pub const MANUAL_ON_TEMP: u32 = 5000; // Manual blue light filter engaged
pub const MANUAL_OFF_TEMP: u32 = 6500; // Neutral

/// Seed value for `last_applied_kelvin` when no state file exists yet.
pub const INITIAL_LAST_APPLIED_TEMP: u32 = 4500;

// ═══ Day/Night Boundary ═══
// Fixed heuristic hours, evaluated against local time. No solar calculation
// is performed.

pub const DAY_START_HOUR: u32 = 6; // 06:00 local
pub const NIGHT_START_HOUR: u32 = 20; // 20:00 local

/// Ambient temperature below which nights get the extra-warm profile.
pub const COLD_NIGHT_THRESHOLD_CELSIUS: f64 = 5.0;

// ═══ Validation Limits ═══
// Kelvin bounds accepted by the `test` command and the applier

pub const MINIMUM_TEMP: u32 = 1000; // Very warm candlelight-like
pub const MAXIMUM_TEMP: u32 = 20000; // Very cool blue light

// ═══ API Endpoints ═══

pub const IPGEO_API_URL: &str = "https://api.ipgeolocation.io/ipgeo";
pub const OPENWEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

// ═══ Fallback Location ═══
// Used when neither the geolocation API nor the disk cache is available

pub const FALLBACK_CITY: &str = "London";
pub const FALLBACK_COUNTRY: &str = "United Kingdom";
pub const FALLBACK_LATITUDE: f64 = 51.5074;
pub const FALLBACK_LONGITUDE: f64 = -0.1278;

// ═══ Operational Timing Constants ═══

pub const POLL_INTERVAL_SECS: u64 = 300; // Daemon evaluation cadence (5 minutes)
pub const ERROR_RETRY_SECS: u64 = 60; // Shortened sleep after a failed cycle
pub const CHECK_INTERVAL_SECS: u64 = 1; // How often to check the running flag during sleep
pub const WEATHER_CACHE_TTL_SECS: i64 = 600; // Minimum interval between weather refetches
pub const GEO_REQUEST_TIMEOUT_SECS: u64 = 10; // Outbound timeout, geolocation API
pub const WEATHER_REQUEST_TIMEOUT_SECS: u64 = 15; // Outbound timeout, weather API

// ═══ Exit Codes ═══

pub const EXIT_FAILURE: i32 = 1; // General failure
