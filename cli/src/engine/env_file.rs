//! # Primary Env File
//!
//! File: cli/src/engine/env_file.rs
//!
//! ## Overview
//!
//! Reads and writes the primary runtime env file (`.env` by default). The
//! format is plain `KEY=VALUE`, one entry per line, with no quoting or
//! escaping.
//!
//! - **Reading** seeds the canonical mapping at the start of a run, so values
//!   the user edited by hand survive reconciliation. Blank lines and `#`
//!   comments are skipped, lines without `=` are ignored, the key is trimmed
//!   and the value is kept byte-for-byte. A key repeated further down the file
//!   keeps its first value.
//! - **Writing** emits the mapping in iteration order joined by `\n`, with no
//!   header or trailing metadata. An empty mapping leaves the file untouched.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use crate::engine::env_map::EnvMap;
use anyhow::Context;
use std::path::Path;
use tracing::{debug, info};

/// Parses env file content into a mapping.
pub fn parse_env_file(content: &str) -> EnvMap {
    let mut map = EnvMap::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            debug!("Ignoring line {} without '=': {:?}", index + 1, line);
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            debug!("Ignoring line {} with an empty key", index + 1);
            continue;
        }
        if !map.insert_if_absent(key, value) {
            debug!("Duplicate key {} on line {}, keeping first value", key, index + 1);
        }
    }
    map
}

/// Serialises the mapping as newline-joined `KEY=VALUE` lines.
pub fn render_env_file(map: &EnvMap) -> String {
    map.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Loads the primary file, or an empty mapping if it does not exist yet.
///
/// # Errors
///
/// Returns an `Err` if the file exists but cannot be read.
pub fn read_primary(path: &Path) -> Result<EnvMap> {
    let content = io::read_optional_file(path)
        .with_context(|| format!("Failed to read primary env file {}", path.display()))?;
    let map = content.as_deref().map(parse_env_file).unwrap_or_default();
    debug!("Seeded {} variable(s) from {}", map.len(), path.display());
    Ok(map)
}

/// Writes the mapping to the primary file.
///
/// # Returns
///
/// * `Ok(true)` if the file was written.
/// * `Ok(false)` if the mapping is empty; the file is left untouched.
///
/// # Errors
///
/// Returns an `Err` if the file or its parent directory cannot be written.
pub fn write_primary(path: &Path, map: &EnvMap) -> Result<bool> {
    if map.is_empty() {
        info!(
            "Mapping is empty, leaving {} untouched",
            path.display()
        );
        return Ok(false);
    }
    io::write_string_to_file(path, &render_env_file(map))
        .with_context(|| format!("Failed to write primary env file {}", path.display()))?;
    Ok(true)
}
