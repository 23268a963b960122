//! # Enabled-Set Tracker
//!
//! File: cli/src/engine/state.rs
//!
//! ## Overview
//!
//! Persists the ordered list of enabled modules between runs and computes the
//! delta between that list and a newly requested one. The persisted list is
//! the only thing that tells an addition apart from a removal.
//!
//! ## State file
//!
//! ```json
//! {
//!   "enabled": ["auth", "mailer"]
//! }
//! ```
//!
//! A missing state file means a first run (nothing enabled). A state file
//! that exists but cannot be parsed is a fatal configuration error: without
//! it the delta cannot be computed safely.
//!
//! ## Ordering
//!
//! The requested state is persisted *before* any env file is touched. If the
//! process dies part-way through reconciliation the intended state is already
//! on disk, and re-running (`msctl sync`) converges to the same files.
//!
use crate::common::fs::io;
use crate::core::error::{MsctlError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Serialize, Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct StateFile {
    #[serde(default)]
    enabled: Vec<String>,
}

/// Modules to add and remove, in application order. The two lists are disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Delta {
    /// In the order of the requested list.
    pub added: Vec<String>,
    /// In the order of the previous list.
    pub removed: Vec<String>,
}

impl Delta {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Loads and persists the enabled-module list.
#[derive(Debug, Clone)]
pub struct EnabledSetTracker {
    path: PathBuf,
}

impl EnabledSetTracker {
    /// Tracker backed by the JSON state file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The persisted list, or an empty list on first run.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if the state file exists but cannot be read, or
    /// (`MsctlError::Config`) if it is not valid state JSON.
    pub fn load(&self) -> Result<Vec<String>> {
        let Some(content) = io::read_optional_file(&self.path)
            .context("Failed to read enabled-module state")?
        else {
            debug!("No state file at {}, first run", self.path.display());
            return Ok(Vec::new());
        };
        let state: StateFile = serde_json::from_str(&content).map_err(|e| {
            MsctlError::Config(format!(
                "State file {} is not valid: {}",
                self.path.display(),
                e
            ))
        })?;
        debug!("Previously enabled modules: {:?}", state.enabled);
        Ok(state.enabled)
    }

    /// Overwrites the stored list with `requested`.
    ///
    /// Called once per run, before either env file is written, and never in
    /// a dry run.
    pub fn persist(&self, requested: &[String]) -> Result<()> {
        let state = StateFile {
            enabled: requested.to_vec(),
        };
        let mut content = serde_json::to_string_pretty(&state)
            .context("Failed to serialise enabled-module state")?;
        content.push('\n');
        io::write_string_to_file(&self.path, &content)
            .context("Failed to persist enabled-module state")?;
        info!("Persisted enabled modules: {:?}", requested);
        Ok(())
    }
}

/// Drops repeated names, keeping the first occurrence of each.
pub fn dedup_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for name in names {
        let name = name.into();
        if !out.contains(&name) {
            out.push(name);
        }
    }
    out
}

/// `added = requested - previous`, `removed = previous - requested`.
pub fn compute_delta(previous: &[String], requested: &[String]) -> Delta {
    let added = dedup_names(requested.iter().filter(|m| !previous.contains(*m)).cloned());
    let removed = dedup_names(previous.iter().filter(|m| !requested.contains(*m)).cloned());
    Delta { added, removed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_delta_preserves_source_order() {
        let previous = names(&["mailer", "auth", "cache"]);
        let requested = names(&["queue", "auth", "billing"]);
        let delta = compute_delta(&previous, &requested);
        assert_eq!(delta.added, names(&["queue", "billing"]));
        assert_eq!(delta.removed, names(&["mailer", "cache"]));
    }

    #[test]
    fn test_delta_from_first_run_and_to_empty() {
        let delta = compute_delta(&[], &names(&["auth"]));
        assert_eq!(delta.added, names(&["auth"]));
        assert!(delta.removed.is_empty());

        let delta = compute_delta(&names(&["auth"]), &[]);
        assert!(delta.added.is_empty());
        assert_eq!(delta.removed, names(&["auth"]));
    }

    #[test]
    fn test_delta_same_set_is_empty() {
        let set = names(&["auth", "mailer"]);
        assert!(compute_delta(&set, &set).is_empty());
        // Reordering alone is not a change.
        assert!(compute_delta(&set, &names(&["mailer", "auth"])).is_empty());
    }

    #[test]
    fn test_delta_sides_are_disjoint_with_duplicates() {
        let delta = compute_delta(&names(&["a", "a", "b"]), &names(&["c", "c", "b"]));
        assert_eq!(delta.added, names(&["c"]));
        assert_eq!(delta.removed, names(&["a"]));
        assert!(delta.added.iter().all(|m| !delta.removed.contains(m)));
    }

    #[test]
    fn test_dedup_names_keeps_first() {
        assert_eq!(
            dedup_names(["b", "a", "b", "c", "a"]),
            names(&["b", "a", "c"])
        );
    }

    #[test]
    fn test_load_first_run_is_empty() -> Result<()> {
        let dir = tempdir()?;
        let tracker = EnabledSetTracker::new(dir.path().join(".msctl/enabled.json"));
        assert!(tracker.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_persist_then_load() -> Result<()> {
        let dir = tempdir()?;
        let tracker = EnabledSetTracker::new(dir.path().join(".msctl/enabled.json"));
        tracker.persist(&names(&["mailer", "auth"]))?;
        assert_eq!(tracker.load()?, names(&["mailer", "auth"]));
        tracker.persist(&[])?;
        assert!(tracker.load()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_load_malformed_state_is_config_error() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("enabled.json");
        std::fs::write(&path, "[\"auth\"]")?;
        let err = EnabledSetTracker::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MsctlError>(),
            Some(MsctlError::Config(_))
        ));
        Ok(())
    }
}
