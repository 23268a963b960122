//! # Msctl Sync Command
//!
//! File: cli/src/commands/sync.rs
//!
//! ## Overview
//!
//! `msctl sync` re-runs the reconciliation pipeline with the module set that
//! is already persisted. The delta is empty, so no module is added or
//! removed, but the base layer is merged again and both env files are
//! rewritten. Use it after an interrupted run, after editing a descriptor, or
//! to restore framework variables that a removal deleted.
//!
use crate::commands::run_request;
use crate::core::error::Result;
use crate::engine::pipeline::Request;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// Arguments for `msctl sync`.
#[derive(Parser, Debug)]
pub struct SyncArgs {}

pub async fn handle_sync(_args: SyncArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling sync command...");
    run_request(project_dir, Request::Current, false)
}
