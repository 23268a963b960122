//! # Module Registry
//!
//! File: cli/src/engine/registry.rs
//!
//! ## Overview
//!
//! The registry is the read-only lookup table of every module the project
//! knows about, as declared by the `[[modules]]` entries of `msctl.toml`.
//! Each entry gives the module's `name` (what users type), its `key` (the
//! directory under `modules_dir` holding the module's source) and an optional
//! `settings_file` naming the JSON descriptor inside that directory.
//!
//! ```toml
//! [[modules]]
//! name = "auth"
//! key = "auth-service"
//! settings_file = "settings.json"
//! ```
//!
//! resolves to the descriptor path `<modules_dir>/auth-service/settings.json`.
//!
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// A single module entry from the registry.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ModuleDescriptor {
    /// Name used on the command line and in the persisted state.
    pub name: String,
    /// Directory (namespace) of the module under the modules directory.
    pub key: String,
    /// Descriptor file name inside the module directory, if the module
    /// declares any environment variables at all.
    #[serde(default)]
    pub settings_file: Option<String>,
}

/// Lookup table of known modules, rooted at the modules directory.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    modules_dir: PathBuf,
    modules: Vec<ModuleDescriptor>,
}

impl Registry {
    /// Creates a registry.
    ///
    /// # Arguments
    ///
    /// * `modules_dir` - Directory holding one sub-directory per module `key`.
    /// * `modules` - Entries in declaration order. Names are assumed unique
    ///   (`core::config` validates this before building the registry).
    pub fn new(modules_dir: impl Into<PathBuf>, modules: Vec<ModuleDescriptor>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            modules,
        }
    }

    pub fn modules_dir(&self) -> &Path {
        &self.modules_dir
    }

    /// Looks a module up by its `name`.
    pub fn get(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.modules.iter().find(|m| m.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Modules in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &ModuleDescriptor> {
        self.modules.iter()
    }

    /// Path of the module's descriptor, or `None` if it declares no settings file.
    pub fn descriptor_path(&self, module: &ModuleDescriptor) -> Option<PathBuf> {
        module
            .settings_file
            .as_ref()
            .map(|file| self.modules_dir.join(&module.key).join(file))
    }
}
