//! Command-line argument parsing and processing.
//!
//! This module resolves the argument list into a tagged [`CliAction`] once
//! at entry, so the rest of the application dispatches on an enum instead
//! of raw strings. Running with no arguments starts the daemon; everything
//! else is a one-shot subcommand.

use crate::logger::Log;

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Run the continuous daemon loop
    RunDaemon,
    /// Print location, weather, and mode state
    ShowStatus,
    /// Toggle the manual blue light filter
    ToggleFilter,
    /// Toggle between manual and automatic modes
    ToggleMode,
    /// Switch to automatic mode
    ForceAuto,
    /// Switch to manual mode
    ForceManual,
    /// Discard the location cache and fetch fresh coordinates
    RefreshLocation,
    /// Apply a specific temperature once
    Test { kelvin: u32 },
    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let Some(first) = args_vec.first() else {
            return ParsedArgs {
                action: CliAction::RunDaemon,
            };
        };

        let action = match first.as_str() {
            "--help" | "-h" | "help" => CliAction::ShowHelp,
            "--version" | "-V" | "-v" | "version" => CliAction::ShowVersion,
            "status" => CliAction::ShowStatus,
            "toggle" => CliAction::ToggleFilter,
            "manual" => CliAction::ToggleMode,
            "auto" => CliAction::ForceAuto,
            "force-manual" => CliAction::ForceManual,
            "refresh-location" => CliAction::RefreshLocation,
            "test" => match args_vec.get(1) {
                Some(value) => match value.parse::<u32>() {
                    Ok(kelvin) => CliAction::Test { kelvin },
                    Err(_) => {
                        Log::log_warning(&format!("Invalid temperature value: {}", value));
                        CliAction::ShowHelpDueToError
                    }
                },
                None => {
                    Log::log_warning("Missing argument for test. Usage: hyprlight test <kelvin>");
                    CliAction::ShowHelpDueToError
                }
            },
            other => {
                Log::log_warning(&format!("Unknown command: {}", other));
                CliAction::ShowHelpDueToError
            }
        };

        ParsedArgs { action }
    }

    /// Convenience method to parse from std::env::args()
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    Log::log_version();
    Log::log_pipe();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    Log::log_version();
    Log::log_block_start(env!("CARGO_PKG_DESCRIPTION"));
    Log::log_block_start("Usage: hyprlight [COMMAND]");
    Log::log_block_start("Running without a command starts the daemon.");
    Log::log_block_start("Commands:");
    Log::log_indented("status             Show location, weather, and mode state");
    Log::log_indented("toggle             Toggle the blue light filter (manual mode)");
    Log::log_indented("manual             Toggle between manual and automatic modes");
    Log::log_indented("auto               Switch to automatic mode");
    Log::log_indented("force-manual       Switch to manual mode");
    Log::log_indented("refresh-location   Fetch fresh coordinates, replacing the cache");
    Log::log_indented("test <kelvin>      Apply a specific temperature once");
    Log::log_block_start("Options:");
    Log::log_indented("-h, --help         Print help information");
    Log::log_indented("-V, --version      Print version information");
    Log::log_end();
}
