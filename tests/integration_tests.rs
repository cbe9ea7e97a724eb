use serial_test::serial;
use std::fs;
use tempfile::tempdir;

use hyprlight::profile::select_for_period;
use hyprlight::time_state::period_for_hour;
use hyprlight::{
    Config, LocationResolver, Mode, ModeController, ModeState, Profile, StateStore,
    WeatherResolver,
};

fn create_test_config_file(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("hyprlight").join("config.toml");

    // Create directory structure
    fs::create_dir_all(config_path.parent().unwrap()).unwrap();
    fs::write(&config_path, content).unwrap();

    (temp_dir, config_path)
}

#[test]
#[serial]
fn test_integration_config_with_both_keys() {
    let config_content = r#"
openweather_api_key = "owm-test-key"
ipgeolocation_api_key = "geo-test-key"
"#;

    let (_temp_dir, config_path) = create_test_config_file(config_content);
    let config = Config::load_from_path(&config_path).unwrap();

    assert_eq!(config.openweather_api_key.as_deref(), Some("owm-test-key"));
    assert_eq!(
        config.ipgeolocation_api_key.as_deref(),
        Some("geo-test-key")
    );
}

#[test]
#[serial]
fn test_integration_state_survives_process_boundaries() {
    let temp_dir = tempdir().unwrap();
    let state_path = temp_dir.path().join("state.json");

    // First "process": switch to manual and record an applied value
    {
        let mut controller = ModeController::load(StateStore::new(state_path.clone()));
        controller.force_manual();
        controller.record_applied(5000);
    }

    // Second "process": the committed state is what loads
    {
        let controller = ModeController::load(StateStore::new(state_path.clone()));
        assert_eq!(controller.current_state().mode, Mode::Manual);
        assert_eq!(controller.current_state().last_applied_kelvin, 5000);
    }

    // Third "process": toggling back lands in automatic mode
    {
        let mut controller = ModeController::load(StateStore::new(state_path));
        assert_eq!(controller.toggle_mode(), Mode::Automatic);
    }
}

#[test]
#[serial]
fn test_integration_fully_offline_pipeline_still_selects() {
    // No API keys, no caches: resolvers degrade and selection still works
    let temp_dir = tempdir().unwrap();
    let config = Config::default();

    let location_resolver = LocationResolver::new(&config, temp_dir.path()).unwrap();
    let weather_resolver = WeatherResolver::new(&config, temp_dir.path()).unwrap();

    let location = location_resolver.resolve();
    assert_eq!(location.city, "London");

    let weather = weather_resolver.current(&location);
    assert!(weather.is_none());

    for hour in 0..24 {
        let profile = select_for_period(period_for_hour(hour), weather.as_ref());
        assert!(matches!(
            profile,
            Profile::DayClear | Profile::NightDefault
        ));
    }
}

#[test]
#[serial]
fn test_integration_state_file_is_valid_json() {
    let temp_dir = tempdir().unwrap();
    let state_path = temp_dir.path().join("state.json");

    let store = StateStore::new(state_path.clone());
    store.save(&ModeState::default()).unwrap();

    let raw = fs::read_to_string(&state_path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["mode"], "automatic");
    assert_eq!(value["manual_filter_on"], false);
    assert_eq!(value["last_applied_kelvin"], 4500);
}

#[test]
#[serial]
fn test_integration_reload_picks_up_external_mutation() {
    let temp_dir = tempdir().unwrap();
    let state_path = temp_dir.path().join("state.json");

    let mut daemon_side = ModeController::load(StateStore::new(state_path.clone()));
    assert_eq!(daemon_side.current_state().mode, Mode::Automatic);

    // A one-shot command in "another process" switches to manual
    {
        let mut command_side = ModeController::load(StateStore::new(state_path));
        command_side.force_manual();
    }

    daemon_side.reload();
    assert_eq!(daemon_side.current_state().mode, Mode::Manual);
}
