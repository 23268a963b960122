//! # Msctl Reconciliation Engine
//!
//! File: cli/src/engine/mod.rs
//!
//! ## Overview
//!
//! This module holds the logic that turns "which modules should be enabled"
//! into the project's env files. Everything outside this module (commands,
//! config loading) only prepares a `Project` and a `Request` and then calls
//! `pipeline::reconcile` or `pipeline::plan`.
//!
//! ## Architecture
//!
//! Leaf-first:
//!
//! - **`env_map`**: `EnvMap`, the insertion-ordered variable mapping.
//! - **`registry`**: the read-only table of known modules.
//! - **`descriptor`**: loads a layer's declared variables from JSON, through
//!   the injectable `FileSource`.
//! - **`state`**: persists the enabled-module list and computes the delta.
//! - **`merge`**: base layer, additions and removals applied to an owned map.
//! - **`env_file`**: reads and writes the primary `KEY=VALUE` file.
//! - **`example`**: regenerates the documented example file.
//! - **`pipeline`**: sequences all of the above for one run.
//!
pub mod descriptor;
pub mod env_file;
pub mod env_map;
pub mod example;
pub mod merge;
pub mod pipeline;
pub mod registry;
pub mod state;
