//! One-shot command handlers and the shared apply path.
//!
//! Each CLI subcommand gets a `handle_*` function. The daemon reuses
//! [`update_automatic_temperature`], so one-shot mode switches and the
//! continuous loop apply temperatures through exactly the same path.

use anyhow::{Context, Result};
use chrono::Local;

use crate::config::{self, Config};
use crate::geo::LocationResolver;
use crate::hyprsunset;
use crate::logger::Log;
use crate::profile::{self, Profile};
use crate::state::{Mode, ModeController, StateStore};
use crate::time_state;
use crate::weather::WeatherResolver;

/// Everything the one-shot commands and the daemon share: resolvers plus
/// the persisted mode state.
pub struct App {
    pub controller: ModeController,
    pub location: LocationResolver,
    pub weather: WeatherResolver,
}

impl App {
    /// Load configuration and state, and build the resolvers.
    pub fn init() -> Result<Self> {
        let config = Config::load()?;
        let cache_dir = config::cache_dir()?;

        Ok(Self {
            controller: ModeController::load(StateStore::new(config::state_file_path()?)),
            location: LocationResolver::new(&config, &cache_dir)?,
            weather: WeatherResolver::new(&config, &cache_dir)?,
        })
    }
}

/// Apply a profile through the backend, skipping redundant invocations.
///
/// When the profile's Kelvin value matches `last_applied_kelvin` the
/// external command is skipped; the display already shows that value.
pub fn apply_profile(app: &mut App, profile: Profile) -> Result<()> {
    let kelvin = profile.kelvin();

    if app.controller.current_state().last_applied_kelvin == kelvin {
        Log::log_decorated(&format!(
            "Temperature unchanged at {}K ({})",
            kelvin,
            profile.label()
        ));
        return Ok(());
    }

    hyprsunset::apply_temperature(kelvin)?;
    app.controller.record_applied(kelvin);
    Log::log_decorated(&format!(
        "Screen temperature set to {}K ({})",
        kelvin,
        profile.label()
    ));

    Ok(())
}

/// Run one automatic-mode evaluation: resolve weather, select, apply.
///
/// A no-op in manual mode. Resolver failures degrade inside the resolvers;
/// the only error that escapes is a failed backend invocation, which the
/// daemon retries on its next cycle.
pub fn update_automatic_temperature(app: &mut App) -> Result<()> {
    if app.controller.current_state().mode != Mode::Automatic {
        return Ok(());
    }

    let location = app.location.resolve();
    let weather = app.weather.current(&location);
    if weather.is_none() {
        Log::log_decorated("Weather unavailable, selecting by time of day only");
    }

    let selected = profile::select_profile(&Local::now(), weather.as_ref());
    Log::log_debug(&format!(
        "Selected {} ({}K), current {}K",
        selected.label(),
        selected.kelvin(),
        app.controller.current_state().last_applied_kelvin
    ));

    apply_profile(app, selected)
}

/// Handle the `status` command: print location, weather, and mode state.
pub fn handle_status() -> Result<()> {
    Log::log_version();
    let app = App::init()?;

    let location = app.location.resolve();
    let weather = app.weather.current(&location);
    let state = app.controller.current_state();

    Log::log_block_start("Location & Weather");
    Log::log_indented(&format!("Location: {}", location.summary()));
    match &weather {
        Some(w) => {
            Log::log_indented(&format!("Weather: {} ({})", w.condition.as_str(), w.description));
            Log::log_indented(&format!("Temperature: {:.1}°C", w.ambient_celsius));
        }
        None => Log::log_indented("Weather: unavailable"),
    }
    Log::log_indented(&format!(
        "Time period: {}",
        time_state::current_period().as_str()
    ));

    Log::log_block_start("Screen Settings");
    Log::log_indented(&format!(
        "Screen temperature: {}K",
        state.last_applied_kelvin
    ));
    Log::log_indented(&format!("Mode: {}", state.mode.as_str()));
    Log::log_indented(&format!(
        "Blue light filter: {}",
        if state.manual_filter_on { "ON" } else { "OFF" }
    ));

    Log::log_block_start("Files");
    Log::log_indented(&format!("Config: {}", config::config_file_path()?.display()));
    Log::log_indented(&format!("State: {}", app.controller.store_path().display()));
    Log::log_end();

    Ok(())
}

/// Handle the `manual` command: toggle between manual and automatic modes.
pub fn handle_toggle_mode() -> Result<()> {
    Log::log_version();
    let mut app = App::init()?;

    match app.controller.toggle_mode() {
        Mode::Manual => {
            Log::log_block_start("Switched to manual mode");
            apply_profile(&mut app, Profile::ManualOff)?;
        }
        Mode::Automatic => {
            Log::log_block_start("Switched to automatic mode");
            update_automatic_temperature(&mut app)?;
        }
    }

    Log::log_end();
    Ok(())
}

/// Handle the `auto` command: switch to automatic mode.
pub fn handle_force_auto() -> Result<()> {
    Log::log_version();
    let mut app = App::init()?;

    if app.controller.force_auto() {
        Log::log_block_start("Switched to automatic mode");
        update_automatic_temperature(&mut app)?;
    } else {
        Log::log_block_start("Already in automatic mode");
    }

    Log::log_end();
    Ok(())
}

/// Handle the `force-manual` command: switch to manual mode.
pub fn handle_force_manual() -> Result<()> {
    Log::log_version();
    let mut app = App::init()?;

    if app.controller.force_manual() {
        Log::log_block_start("Switched to manual mode");
        apply_profile(&mut app, Profile::ManualOff)?;
    } else {
        Log::log_block_start("Already in manual mode");
    }

    Log::log_end();
    Ok(())
}

/// Handle the `toggle` command: flip the manual blue light filter.
pub fn handle_toggle_filter() -> Result<()> {
    Log::log_version();
    let mut app = App::init()?;

    match app.controller.toggle_filter() {
        Some(selected) => {
            apply_profile(&mut app, selected)?;
            let status = match selected {
                Profile::ManualOn => "ON",
                _ => "OFF",
            };
            Log::log_block_start(&format!(
                "Blue light filter toggled {} ({}K)",
                status,
                selected.kelvin()
            ));
        }
        None => {
            Log::log_warning(
                "The blue light filter has no effect in automatic mode. Switch to manual mode first.",
            );
        }
    }

    Log::log_end();
    Ok(())
}

/// Handle the `refresh-location` command: force a fresh geolocation lookup.
pub fn handle_refresh_location() -> Result<()> {
    Log::log_version();
    let config = Config::load()?;
    let resolver = LocationResolver::new(&config, &config::cache_dir()?)?;

    let info = resolver
        .refresh()
        .context("Failed to refresh location data")?;

    Log::log_block_start(&format!(
        "Location refreshed: {} ({:.4}, {:.4})",
        info.summary(),
        info.latitude,
        info.longitude
    ));
    Log::log_end();

    Ok(())
}

/// Handle the `test <kelvin>` command: apply a temperature unconditionally.
pub fn handle_test(kelvin: u32) -> Result<()> {
    Log::log_version();
    hyprsunset::validate_temperature(kelvin)?;

    let mut app = App::init()?;
    hyprsunset::apply_temperature(kelvin)?;
    app.controller.record_applied(kelvin);

    Log::log_block_start(&format!("Applied test temperature: {}K", kelvin));
    Log::log_end();

    Ok(())
}
