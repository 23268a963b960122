//! # Reconciliation Orchestrator
//!
//! File: cli/src/engine/pipeline.rs
//!
//! ## Overview
//!
//! Runs one reconciliation as a fixed, linear pipeline:
//!
//! 1. Load the previously enabled modules.
//! 2. Resolve the request against them and compute the delta.
//! 3. Persist the requested set (before any env file is touched).
//! 4. Seed the canonical mapping from the primary env file.
//! 5. Merge the base layer (framework descriptor).
//! 6. Merge additions.
//! 7. Merge removals.
//! 8. Write the primary env file, unless the mapping is empty.
//! 9. Regenerate the example env file.
//!
//! Per-module descriptor problems never stop the pipeline; they are collected
//! in `ReconcileReport::skipped`. Only failing to read or write the state,
//! primary or example file aborts a run. Because the state is persisted
//! first and every step is deterministic, re-running after a crash converges
//! to the same files.
//!
use crate::core::error::{MsctlError, Result};
use crate::engine::descriptor::{DescriptorReader, FileSource};
use crate::engine::merge::{merge_additions, merge_base_layer, merge_removals, StepOutcome};
use crate::engine::registry::Registry;
use crate::engine::state::{compute_delta, dedup_names, Delta, EnabledSetTracker};
use crate::engine::{env_file, example};
use std::path::PathBuf;
use tracing::info;

/// Resolved locations of every file a run reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub env_file: PathBuf,
    pub example_file: PathBuf,
    pub state_file: PathBuf,
    pub base_descriptor: PathBuf,
}

/// A project ready to be reconciled.
#[derive(Debug, Clone)]
pub struct Project {
    pub layout: ProjectLayout,
    pub registry: Registry,
}

impl Project {
    /// Tracker for this project's state file.
    pub fn tracker(&self) -> EnabledSetTracker {
        EnabledSetTracker::new(&self.layout.state_file)
    }

    /// Descriptor reader over this project's registry, reading through `files`.
    pub fn reader<'a>(&'a self, files: &'a dyn FileSource) -> DescriptorReader<'a> {
        DescriptorReader::new(&self.registry, &self.layout.base_descriptor, files)
    }
}

/// How the requested module set relates to the persisted one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    /// Exactly these modules.
    Exactly(Vec<String>),
    /// The persisted set plus these, appended in order.
    Enable(Vec<String>),
    /// The persisted set minus these.
    Disable(Vec<String>),
    /// The persisted set unchanged.
    Current,
}

impl Request {
    /// The requested set, de-duplicated.
    pub fn resolve(&self, previous: &[String]) -> Vec<String> {
        match self {
            Request::Exactly(names) => dedup_names(names.iter().cloned()),
            Request::Enable(names) => dedup_names(previous.iter().chain(names.iter()).cloned()),
            Request::Disable(names) => {
                dedup_names(previous.iter().filter(|m| !names.contains(*m)).cloned())
            }
            Request::Current => dedup_names(previous.iter().cloned()),
        }
    }
}

/// Where the project stands and where the request would take it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub previous: Vec<String>,
    pub requested: Vec<String>,
    pub delta: Delta,
}

/// What a completed run did.
#[derive(Debug)]
pub struct ReconcileReport {
    pub plan: Plan,
    /// Layers whose variables were left out, with the reason.
    pub skipped: Vec<MsctlError>,
    /// False when the mapping was empty and the primary file was left alone.
    pub primary_written: bool,
    /// Number of variables in the canonical mapping after the run.
    pub variables: usize,
}

/// Loads the persisted state and computes the delta, without side effects.
pub fn plan(project: &Project, request: &Request) -> Result<Plan> {
    let previous = project.tracker().load()?;
    let requested = request.resolve(&previous);
    let delta = compute_delta(&previous, &requested);
    info!(
        "Delta: added {:?}, removed {:?}",
        delta.added, delta.removed
    );
    Ok(Plan {
        previous,
        requested,
        delta,
    })
}

/// Runs the full reconciliation pipeline.
///
/// # Arguments
///
/// * `project` - Layout and registry of the project.
/// * `files` - Where descriptors are read from (`DiskFiles` outside tests).
/// * `request` - The module set to reconcile to, relative to persisted state.
///
/// # Returns
///
/// A `ReconcileReport` with the plan, the layers that were skipped and why,
/// and whether the primary file was written.
///
/// # Errors
///
/// Only state, primary or example file I/O aborts a run. Descriptor problems
/// end up in `ReconcileReport::skipped`.
pub fn reconcile(project: &Project, files: &dyn FileSource, request: &Request) -> Result<ReconcileReport> {
    // 1-3. Delta, then record the intended state before touching env files.
    let plan = plan(project, request)?;
    project.tracker().persist(&plan.requested)?;

    let reader = project.reader(files);
    let layout = &project.layout;
    let mut skipped = Vec::new();

    // 4-7. Seed from the primary file, then base, additions, removals.
    let seeded = env_file::read_primary(&layout.env_file)?;
    let StepOutcome { map, skipped: s } = merge_base_layer(seeded, &reader);
    skipped.extend(s);
    let StepOutcome { map, skipped: s } = merge_additions(map, &reader, &plan.delta.added);
    skipped.extend(s);
    let StepOutcome { map, skipped: s } = merge_removals(map, &reader, &plan.delta.removed);
    skipped.extend(s);

    // 8-9. Write both artifacts.
    let primary_written = env_file::write_primary(&layout.env_file, &map)?;
    example::write_example(&layout.example_file, &reader, &plan.requested, &layout.root)?;

    info!(
        "Reconciled {} variable(s); {} layer(s) skipped",
        map.len(),
        skipped.len()
    );
    Ok(ReconcileReport {
        plan,
        skipped,
        primary_written,
        variables: map.len(),
    })
}
