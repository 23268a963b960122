//! # Msctl Filesystem Utilities (`common::fs`)
//!
//! File: cli/src/common/fs/mod.rs
//!
//! ## Overview
//!
//! Filesystem operations used across msctl. Callers import the submodule
//! directly, e.g. `use crate::common::fs::io::write_string_to_file;`.
//!

/// Basic file I/O (`ensure_dir_exists`, `read_optional_file`, `write_string_to_file`).
pub mod io;
