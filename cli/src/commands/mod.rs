//! # Msctl Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the msctl CLI and the helpers
//! they share. Each subcommand lives in its own file with a `clap` arguments
//! struct and an async `handle_*` function called from `main.rs`.
//!
//! ## Commands
//!
//! - `apply`: reconcile to exactly the given module set
//! - `enable` / `disable` (`toggle`): add to or remove from the persisted set
//! - `sync`: re-run reconciliation with the persisted set
//! - `list`: show the module registry and what is enabled
//! - `check`: validate every descriptor the registry points at
//!
//! The three reconciling commands differ only in the `Request` they build, so
//! they all go through `run_request`, which loads the project, runs either a
//! dry-run plan or the full pipeline, and prints the outcome.
//!
use crate::core::config;
use crate::core::error::Result;
use crate::engine::descriptor::DiskFiles;
use crate::engine::pipeline::{self, Plan, Project, ReconcileReport, Request};
use anyhow::Context;
use std::path::Path;
use tracing::info;

/// Validates every descriptor referenced by the project.
pub mod check;
/// Lists registry modules and their enabled state.
pub mod list;
/// Re-runs reconciliation with the persisted module set.
pub mod sync;
/// `apply`, `enable` and `disable`.
pub mod toggle;

/// Loads the project and either plans (`dry_run`) or reconciles `request`.
pub(crate) fn run_request(project_dir: Option<&Path>, request: Request, dry_run: bool) -> Result<()> {
    let project = config::load_project(project_dir).context("Failed to load msctl configuration")?;
    info!("Project root: {}", project.layout.root.display());

    if dry_run {
        let plan = pipeline::plan(&project, &request)?;
        print_plan(&project, &plan);
        println!("Dry run: nothing was written.");
        return Ok(());
    }

    let report = pipeline::reconcile(&project, &DiskFiles, &request)?;
    print_report(&project, &report);
    Ok(())
}

fn join_or_none(names: &[String]) -> String {
    if names.is_empty() {
        "(none)".to_string()
    } else {
        names.join(", ")
    }
}

/// Path relative to the project root, for display.
pub(crate) fn display_path(project: &Project, path: &Path) -> String {
    path.strip_prefix(&project.layout.root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn print_plan(project: &Project, plan: &Plan) {
    println!("Project: {}", project.layout.root.display());
    println!("  Enabled now: {}", join_or_none(&plan.previous));
    println!("  Requested:   {}", join_or_none(&plan.requested));
    if plan.delta.is_empty() {
        println!("  Nothing to add or remove; a run would only refresh the env files.");
        return;
    }
    println!("  + add:       {}", join_or_none(&plan.delta.added));
    println!("  - remove:    {}", join_or_none(&plan.delta.removed));
}

fn print_report(project: &Project, report: &ReconcileReport) {
    let layout = &project.layout;
    if report.primary_written {
        println!(
            "✅ Reconciled {} variable(s) into {}",
            report.variables,
            display_path(project, &layout.env_file)
        );
    } else {
        println!(
            "⚠️  No variables to write; {} left untouched.",
            display_path(project, &layout.env_file)
        );
    }
    if report.plan.delta.is_empty() {
        println!("  Enabled modules unchanged: {}", join_or_none(&report.plan.requested));
    } else {
        println!("  + added:   {}", join_or_none(&report.plan.delta.added));
        println!("  - removed: {}", join_or_none(&report.plan.delta.removed));
    }
    for error in &report.skipped {
        println!(
            "  ! skipped '{}': {}",
            error.module().unwrap_or_default(),
            error
        );
    }
    println!(
        "  Example file regenerated: {}",
        display_path(project, &layout.example_file)
    );
}
