//! # Msctl Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared helpers that are not specific to reconciliation. Currently only
//! filesystem I/O, used by the env file writers and the state tracker.
//!

/// Filesystem helpers (reading optional files, writing with parent creation).
pub mod fs;
