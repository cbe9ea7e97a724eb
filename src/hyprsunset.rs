//! Applier for the external hyprsunset backend.
//!
//! hyprlight changes the display temperature through exactly one external
//! command: `hyprctl hyprsunset temperature <kelvin>`. Each apply is a
//! single short-lived invocation whose exit code reports success. A missing
//! or failing tool is a per-cycle, recoverable condition; the daemon logs
//! it and retries on the next cycle.

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

use crate::constants::{MAXIMUM_TEMP, MINIMUM_TEMP};
use crate::logger::Log;

/// Validate a Kelvin value against the supported range.
pub fn validate_temperature(kelvin: u32) -> Result<()> {
    if kelvin < MINIMUM_TEMP {
        anyhow::bail!(
            "Temperature {} is too low (minimum: {}K)",
            kelvin,
            MINIMUM_TEMP
        );
    }

    if kelvin > MAXIMUM_TEMP {
        anyhow::bail!(
            "Temperature {} is too high (maximum: {}K)",
            kelvin,
            MAXIMUM_TEMP
        );
    }

    Ok(())
}

/// Invoke the backend tool once to set the display temperature.
pub fn apply_temperature(kelvin: u32) -> Result<()> {
    validate_temperature(kelvin)?;

    let status = Command::new("hyprctl")
        .args(["hyprsunset", "temperature"])
        .arg(kelvin.to_string())
        .stdout(Stdio::null()) // Suppress output to keep hyprlight's display clean
        .stderr(Stdio::null())
        .status()
        .context("Failed to run hyprctl (is Hyprland running?)")?;

    if !status.success() {
        anyhow::bail!("hyprctl hyprsunset exited with {}", status);
    }

    Ok(())
}

/// Check whether the backend tool looks available, warning when it does not.
///
/// This is a startup courtesy only; a missing tool is reported again on
/// every failed apply and never stops the daemon.
pub fn verify_backend_available() -> bool {
    match Command::new("hyprctl")
        .arg("version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) if status.success() => true,
        _ => {
            // hyprctl failed or refused - check if it's installed at all
            match Command::new("which")
                .arg("hyprctl")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                Ok(which_status) if which_status.success() => {
                    Log::log_warning(
                        "hyprctl found but not responding; temperature changes may fail",
                    );
                    true
                }
                _ => {
                    Log::log_warning(
                        "hyprctl is not installed; temperature changes will fail until it is available",
                    );
                    false
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_range_validation() {
        assert!(validate_temperature(MINIMUM_TEMP).is_ok());
        assert!(validate_temperature(6500).is_ok());
        assert!(validate_temperature(MAXIMUM_TEMP).is_ok());

        assert!(validate_temperature(MINIMUM_TEMP - 1).is_err());
        assert!(validate_temperature(MAXIMUM_TEMP + 1).is_err());
        assert!(validate_temperature(0).is_err());
    }

    #[test]
    fn test_validation_errors_name_the_bound() {
        let low = validate_temperature(500).unwrap_err();
        assert!(low.to_string().contains("too low"));

        let high = validate_temperature(50_000).unwrap_err();
        assert!(high.to_string().contains("too high"));
    }
}
