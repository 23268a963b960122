//! # Msctl Filesystem I/O Operations
//!
//! File: cli/src/common/fs/io.rs
//!
//! ## Overview
//!
//! Thin wrappers around `std::fs` used for every artifact msctl owns: the
//! primary env file, the example env file and the persisted enabled-module
//! state. Failures here are the fatal class of error (see `core::error`), so
//! every function attaches the offending path as context before propagating.
//!
//! ## Architecture
//!
//! - **`ensure_dir_exists`**: `mkdir -p`, refusing paths that exist as files.
//! - **`read_optional_file`**: reads a file that may legitimately be absent
//!   (first run: no state file, no primary file yet). Absence is `Ok(None)`;
//!   any other I/O failure is an error.
//! - **`write_string_to_file`**: creates the parent directory and overwrites
//!   the file.
//!
//! ```rust
//! use crate::common::fs::io;
//!
//! let previous = io::read_optional_file(&state_path)?.unwrap_or_default();
//! io::write_string_to_file(&env_path, "ENVIRONMENT=development")?;
//! ```
//!
use crate::core::error::{MsctlError, Result};
use anyhow::Context;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info};

/// Ensures that a directory exists at `path`, creating parents as needed.
///
/// # Errors
///
/// Returns an `Err` if the path exists but is not a directory, or if
/// creating it fails.
pub fn ensure_dir_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {:?}", path))?;
        info!("Created directory: {:?}", path);
    } else if !path.is_dir() {
        anyhow::bail!(MsctlError::FileSystem(format!(
            "Path exists but is not a directory: {:?}",
            path
        )));
    } else {
        debug!("Directory already exists: {:?}", path);
    }
    Ok(())
}

/// Reads a file that is allowed to be missing.
///
/// # Returns
///
/// * `Ok(Some(content))` if the file exists and was read.
/// * `Ok(None)` if nothing exists at `path`.
///
/// # Errors
///
/// Any I/O failure other than "not found" (permissions, `path` is a
/// directory, invalid UTF-8).
pub fn read_optional_file(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No file at {:?}, treating as empty", path);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to read file {:?}", path)),
    }
}

/// Writes `content` to `path`, creating the parent directory first and
/// overwriting any existing file.
pub fn write_string_to_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir_exists(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write to file {:?}", path))?;
    info!("Wrote {} bytes to {:?}", content.len(), path);
    Ok(())
}
