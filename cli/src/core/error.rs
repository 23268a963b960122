//! # Msctl Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types shared across msctl. There are two
//! classes of failure, and they are handled very differently:
//!
//! - **Per-module failures** (`ModuleNotFound`, `MissingDescriptor`,
//!   `MalformedDescriptor`): local to one module. The engine logs a single-line
//!   diagnostic, skips that module's step and carries on with the others.
//! - **Fatal failures**: everything else aborts the run and surfaces to
//!   `main`. The project configuration or state file is unusable (`Config`),
//!   a path msctl must create as a directory is a file (`FileSystem`), or
//!   reading or writing the primary, example or state file fails. Those I/O
//!   failures stay as the underlying `std::io::Error` with the offending path
//!   attached as `anyhow` context.
//!
//! ## Architecture
//!
//! - `MsctlError`: a `thiserror` enum covering both classes.
//! - `Result<T>`: an alias for `anyhow::Result<T>` used by application code so
//!   context can be attached with `.context()`.
//! - `MsctlError::module`: the module a per-module failure refers to, used when
//!   reporting skipped modules.
//!
//! ## Examples
//!
//! ```rust
//! // Fatal: surface with context.
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//!
//! // Per-module: log and continue.
//! match reader.load_module("auth") {
//!     Ok(vars) => { /* merge */ }
//!     Err(e) => warn!("{} Skipping '{}'.", e, e.module().unwrap_or_default()),
//! }
//! ```
//!
use std::path::PathBuf;
use thiserror::Error;

/// Custom error type for msctl.
#[derive(Error, Debug)]
pub enum MsctlError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Module '{name}' not found in the module registry.")]
    ModuleNotFound { name: String },

    #[error("Module '{module}': descriptor file {} is missing.", .path.display())]
    MissingDescriptor { module: String, path: PathBuf },

    #[error("Module '{module}': descriptor file {} is malformed: {reason}", .path.display())]
    MalformedDescriptor {
        module: String,
        path: PathBuf,
        reason: String,
    },
}

impl MsctlError {
    /// Name of the module the error refers to, if any.
    pub fn module(&self) -> Option<&str> {
        match self {
            MsctlError::ModuleNotFound { name } => Some(name),
            MsctlError::MissingDescriptor { module, .. }
            | MsctlError::MalformedDescriptor { module, .. } => Some(module),
            _ => None,
        }
    }
}

/// Type alias for Result using anyhow::Error, so context can be added freely.
pub type Result<T> = anyhow::Result<T>;
