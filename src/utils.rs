//! Utility functions shared across the codebase.
//!
//! This module provides the atomic JSON persistence helpers used by the
//! state file and the resolver caches.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Serialize a value as pretty JSON and atomically replace `path` with it.
///
/// The data is written to a temporary file in the destination directory and
/// then renamed over the target, so an interrupted write can never leave a
/// truncated file behind. Parent directories are created as needed.
///
/// # Arguments
/// * `path` - Final destination of the JSON document
/// * `value` - Any serializable value
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("Path has no parent directory: {}", path.display()))?;

    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let json = serde_json::to_string_pretty(value).context("Failed to serialize value to JSON")?;

    let mut tmp = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;
    tmp.write_all(json.as_bytes())
        .context("Failed to write temporary file")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace {}", path.display()))?;

    Ok(())
}

/// Read and deserialize a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))
}
