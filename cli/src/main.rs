//! # Msctl Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point for the msctl CLI, which keeps a project's `.env` and
//! `.env.example` in step with the set of enabled microservice modules.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Architecture
//!
//! - Each subcommand is a variant of `Commands` mapped to a handler in `commands::*`
//! - The reconciliation engine lives in `engine::*` and is synchronous
//! - `core::*` holds configuration and error types, `common::*` filesystem helpers
//! - All errors propagate to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Enable exactly auth and mailer
//! msctl apply auth mailer
//!
//! # Enable one more module, showing engine decisions
//! msctl -v enable queue
//!
//! # Operate on a project elsewhere
//! msctl --project ../shop sync
//! ```
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (apply, enable, sync, ...)
mod common; // Shared filesystem helpers
mod core; // Configuration and error types
mod engine; // Reconciliation engine

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "msctl",
    about = "Keep .env files in step with the enabled microservice modules",
    long_about = "Reconciles a project's primary env file and its example file with the set of\n\
                  enabled modules. Variables declared by newly enabled modules are added,\n\
                  variables of disabled modules are removed, and manual edits are kept.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Project directory (defaults to searching upward from the current directory).
    #[arg(short = 'p', long, global = true, env = "MSCTL_PROJECT_DIR")]
    project: Option<PathBuf>,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Reconcile to exactly the given modules.
    #[command(alias = "a")]
    Apply(commands::toggle::ApplyArgs),
    /// Enable modules in addition to the current ones.
    #[command(alias = "e")]
    Enable(commands::toggle::ToggleArgs),
    /// Disable some of the current modules.
    #[command(alias = "d")]
    Disable(commands::toggle::ToggleArgs),
    /// Re-run reconciliation with the current modules.
    #[command(alias = "s")]
    Sync(commands::sync::SyncArgs),
    /// Show registered modules and which are enabled.
    #[command(alias = "ls")]
    List(commands::list::ListArgs),
    /// Validate every descriptor file.
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let project = cli.project.as_deref();
    let command_result = match cli.command {
        Commands::Apply(args) => commands::toggle::handle_apply(args, project).await,
        Commands::Enable(args) => commands::toggle::handle_enable(args, project).await,
        Commands::Disable(args) => commands::toggle::handle_disable(args, project).await,
        Commands::Sync(args) => commands::sync::handle_sync(args, project).await,
        Commands::List(args) => commands::list::handle_list(args, project).await,
        Commands::Check(args) => commands::check::handle_check(args, project).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
