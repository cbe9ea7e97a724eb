//! Main application entry point and the daemon loop.
//!
//! After argument parsing, one-shot subcommands are dispatched to the
//! `commands` module and return immediately. Without a subcommand the
//! process becomes the daemon: a single-threaded loop that re-evaluates the
//! automatic profile on a fixed cadence, guarded by an exclusive lock file
//! so only one instance runs, and terminated only by SIGINT/SIGTERM.

use anyhow::Result;
use fs2::FileExt;
use signal_hook::{
    consts::signal::{SIGINT, SIGTERM},
    iterator::Signals,
};
use std::{
    fs::File,
    sync::Arc,
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

mod args;
mod commands;
mod config;
mod constants;
mod geo;
mod hyprsunset;
mod logger;
mod profile;
mod state;
mod time_state;
mod utils;
mod weather;

use args::{CliAction, ParsedArgs, display_help, display_version_info};
use commands::App;
use constants::*;
use logger::Log;

const POLL_INTERVAL: Duration = Duration::from_secs(POLL_INTERVAL_SECS);
const ERROR_RETRY: Duration = Duration::from_secs(ERROR_RETRY_SECS);
const CHECK_INTERVAL: Duration = Duration::from_secs(CHECK_INTERVAL_SECS);

fn main() -> Result<()> {
    let parsed = ParsedArgs::from_env();

    match parsed.action {
        CliAction::ShowHelp => {
            display_help();
            Ok(())
        }
        CliAction::ShowVersion => {
            display_version_info();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::ShowStatus => commands::handle_status(),
        CliAction::ToggleFilter => commands::handle_toggle_filter(),
        CliAction::ToggleMode => commands::handle_toggle_mode(),
        CliAction::ForceAuto => commands::handle_force_auto(),
        CliAction::ForceManual => commands::handle_force_manual(),
        CliAction::RefreshLocation => commands::handle_refresh_location(),
        CliAction::Test { kelvin } => commands::handle_test(kelvin),
        CliAction::RunDaemon => run_daemon(),
    }
}

/// Run the continuous daemon loop until a shutdown signal arrives.
fn run_daemon() -> Result<()> {
    Log::log_version();

    // Courtesy check only; a missing backend is retried every cycle
    hyprsunset::verify_backend_available();

    // Set up signal handling
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    let mut signals = Signals::new([SIGTERM, SIGINT])?;
    thread::spawn(move || {
        for signal in signals.forever() {
            Log::log_pipe();
            Log::log_info(&format!("Shutdown signal received: {:?}", signal));
            r.store(false, Ordering::SeqCst);
        }
    });

    // Create and acquire the lock file
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    let lock_path = format!("{}/hyprlight.lock", runtime_dir);
    let lock_file = File::create(&lock_path)?;

    if lock_file.try_lock_exclusive().is_err() {
        Log::log_error(
            "Another instance of hyprlight is already running.\n\
            • Kill hyprlight before restarting.",
        );
        std::process::exit(EXIT_FAILURE);
    }

    Log::log_decorated("Lock acquired, starting hyprlight...");

    let mut app = App::init()?;
    {
        let state = app.controller.current_state();
        Log::log_decorated(&format!("Mode: {}", state.mode.as_str()));
        Log::log_decorated(&format!(
            "Last applied temperature: {}K",
            state.last_applied_kelvin
        ));
    }

    // Apply an initial temperature before entering the cadenced loop
    if running.load(Ordering::SeqCst) {
        if let Err(e) = commands::update_automatic_temperature(&mut app) {
            Log::log_warning(&format!("Failed to apply initial temperature: {}", e));
            Log::log_decorated("Continuing anyway - will retry during operation...");
        }
    }

    while running.load(Ordering::SeqCst) {
        // One-shot commands may have mutated the state file since last cycle
        app.controller.reload();

        let sleep_duration = match commands::update_automatic_temperature(&mut app) {
            Ok(()) => POLL_INTERVAL,
            Err(e) => {
                Log::log_warning(&format!("Update cycle failed: {}", e));
                Log::log_decorated("Will retry on next cycle...");
                ERROR_RETRY
            }
        };

        // Sleep in small chunks so shutdown signals are picked up promptly
        let mut slept = Duration::from_secs(0);
        while slept < sleep_duration && running.load(Ordering::SeqCst) {
            let chunk = CHECK_INTERVAL.min(sleep_duration - slept);
            thread::sleep(chunk);
            slept += chunk;
        }
    }

    // Ensure proper cleanup on shutdown
    Log::log_block_start("Shutting down hyprlight...");
    cleanup(lock_file, &lock_path);
    Log::log_end();

    Ok(())
}

/// Release and remove the lock file on the way out.
fn cleanup(lock_file: File, lock_path: &str) {
    // Drop the lock file handle to release the lock
    drop(lock_file);

    if let Err(e) = std::fs::remove_file(lock_path) {
        Log::log_decorated(&format!("Warning: Failed to remove lock file: {}", e));
    }
}
