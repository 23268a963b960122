//! # Msctl Apply / Enable / Disable Commands
//!
//! File: cli/src/commands/toggle.rs
//!
//! ## Overview
//!
//! The three commands that change which modules are enabled:
//!
//! ```bash
//! # Exactly these modules (anything else gets disabled)
//! msctl apply auth mailer
//!
//! # Disable everything
//! msctl apply
//!
//! # Add to / remove from what is currently enabled
//! msctl enable queue
//! msctl disable mailer
//!
//! # Show the delta without writing anything
//! msctl enable queue --dry-run
//! ```
//!
//! Each builds a `Request` and hands it to `commands::run_request`.
//!
use crate::commands::run_request;
use crate::core::error::Result;
use crate::engine::pipeline::Request;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// Arguments for `msctl apply`.
#[derive(Parser, Debug)]
pub struct ApplyArgs {
    /// Modules that should be enabled after the run. Omit to disable all.
    modules: Vec<String>,

    /// Print the delta without persisting state or writing env files.
    #[arg(long)]
    dry_run: bool,
}

/// Arguments shared by `msctl enable` and `msctl disable`.
#[derive(Parser, Debug)]
pub struct ToggleArgs {
    /// Modules to toggle.
    #[arg(required = true)]
    modules: Vec<String>,

    /// Print the delta without persisting state or writing env files.
    #[arg(long)]
    dry_run: bool,
}

pub async fn handle_apply(args: ApplyArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling apply command for {:?}", args.modules);
    run_request(project_dir, Request::Exactly(args.modules), args.dry_run)
}

pub async fn handle_enable(args: ToggleArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling enable command for {:?}", args.modules);
    run_request(project_dir, Request::Enable(args.modules), args.dry_run)
}

pub async fn handle_disable(args: ToggleArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling disable command for {:?}", args.modules);
    run_request(project_dir, Request::Disable(args.modules), args.dry_run)
}
