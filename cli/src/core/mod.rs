//! # Msctl Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by every command:
//! - `config`: locating and loading `msctl.toml`, merging it with the user
//!   configuration and validating the result
//! - `error`: the `MsctlError` enum and the crate-wide `Result` alias
//!
//! ```rust
//! use crate::core::config; // For loading the project
//! use crate::core::error::{MsctlError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
