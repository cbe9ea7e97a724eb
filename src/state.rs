//! Persisted manual/automatic mode state and its controller.
//!
//! `ModeState` is the sole source of truth across process invocations: the
//! daemon and every one-shot command read it at startup, and every mutation
//! is written back to `state.json` before the mutating call returns. Writes
//! go through the atomic replace helper so an interrupted process can never
//! leave a corrupt state file. An unreadable or missing file falls back to
//! the documented default (automatic mode, filter off).

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::INITIAL_LAST_APPLIED_TEMP;
use crate::logger::Log;
use crate::profile::Profile;
use crate::utils::{read_json, write_json_atomic};

/// Who decides the applied temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// The profile selector drives the temperature.
    Automatic,
    /// The user toggles between the two fixed manual profiles.
    Manual,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Automatic => "Automatic",
            Mode::Manual => "Manual",
        }
    }
}

/// The full persisted state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModeState {
    pub mode: Mode,
    /// Manual blue light filter flag. Only meaningful in manual mode.
    pub manual_filter_on: bool,
    /// The last Kelvin value actually sent to the backend tool. Used to
    /// skip redundant applies.
    pub last_applied_kelvin: u32,
    pub updated_at: DateTime<Utc>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self {
            mode: Mode::Automatic,
            manual_filter_on: false,
            last_applied_kelvin: INITIAL_LAST_APPLIED_TEMP,
            updated_at: Utc::now(),
        }
    }
}

/// On-disk store for [`ModeState`].
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the state file. Errors on a missing or unparseable file.
    pub fn try_load(&self) -> Result<ModeState> {
        read_json(&self.path)
    }

    /// Read the state file, falling back to the default state when it is
    /// missing or unreadable.
    pub fn load_or_default(&self) -> ModeState {
        if !self.path.exists() {
            return ModeState::default();
        }

        match self.try_load() {
            Ok(state) => state,
            Err(e) => {
                Log::log_warning(&format!("State file unreadable, using defaults: {}", e));
                ModeState::default()
            }
        }
    }

    /// Atomically persist the state.
    pub fn save(&self, state: &ModeState) -> Result<()> {
        write_json_atomic(&self.path, state)
    }
}

/// Tracks manual-vs-automatic mode and the manual filter flag.
///
/// Every mutator persists the full state before returning. A failed write
/// is logged and the in-memory state stays authoritative until the next
/// successful write; mutators never fail outward over persistence.
pub struct ModeController {
    store: StateStore,
    state: ModeState,
}

impl ModeController {
    pub fn load(store: StateStore) -> Self {
        let state = store.load_or_default();
        Self { store, state }
    }

    pub fn current_state(&self) -> &ModeState {
        &self.state
    }

    pub fn store_path(&self) -> &Path {
        self.store.path()
    }

    /// Re-read the state file, picking up mutations made by other
    /// invocations. Keeps the in-memory state when the file is unreadable.
    pub fn reload(&mut self) {
        match self.store.try_load() {
            Ok(state) => self.state = state,
            Err(e) => {
                Log::log_warning(&format!(
                    "Could not re-read state file, keeping in-memory state: {}",
                    e
                ));
            }
        }
    }

    /// Flip automatic↔manual. Entering either mode clears the filter flag.
    /// Returns the new mode.
    pub fn toggle_mode(&mut self) -> Mode {
        self.state.mode = match self.state.mode {
            Mode::Automatic => Mode::Manual,
            Mode::Manual => Mode::Automatic,
        };
        self.state.manual_filter_on = false;
        self.persist();
        self.state.mode
    }

    /// Switch to automatic mode. Returns false when already automatic.
    pub fn force_auto(&mut self) -> bool {
        if self.state.mode == Mode::Automatic {
            return false;
        }
        self.state.mode = Mode::Automatic;
        self.state.manual_filter_on = false;
        self.persist();
        true
    }

    /// Switch to manual mode. Returns false when already manual.
    pub fn force_manual(&mut self) -> bool {
        if self.state.mode == Mode::Manual {
            return false;
        }
        self.state.mode = Mode::Manual;
        self.state.manual_filter_on = false;
        self.persist();
        true
    }

    /// Toggle the manual blue light filter.
    ///
    /// In manual mode this flips the flag and returns the profile to apply.
    /// In automatic mode the flag is left untouched and `None` is returned;
    /// the state is still persisted (harmlessly) and the caller should warn
    /// that the filter has no effect there.
    pub fn toggle_filter(&mut self) -> Option<Profile> {
        if self.state.mode != Mode::Manual {
            self.persist();
            return None;
        }

        self.state.manual_filter_on = !self.state.manual_filter_on;
        self.persist();

        Some(if self.state.manual_filter_on {
            Profile::ManualOn
        } else {
            Profile::ManualOff
        })
    }

    /// Record a Kelvin value that was actually sent to the backend.
    pub fn record_applied(&mut self, kelvin: u32) {
        self.state.last_applied_kelvin = kelvin;
        self.persist();
    }

    fn persist(&mut self) {
        self.state.updated_at = Utc::now();
        if let Err(e) = self.store.save(&self.state) {
            Log::log_warning(&format!("Failed to persist state: {}", e));
        }
    }
}
