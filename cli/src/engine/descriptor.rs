//! # Descriptor Reader
//!
//! File: cli/src/engine/descriptor.rs
//!
//! ## Overview
//!
//! Loads the environment variables a layer declares. A layer is either the
//! framework's **base layer** (a fixed descriptor that is always merged first
//! and never removed) or a registry module. Both use the same JSON shape:
//!
//! ```json
//! { "env": { "JWT_SECRET": "changeme", "JWT_TTL": "3600" } }
//! ```
//!
//! Other top-level fields are ignored, and a descriptor with no `env` field
//! declares no variables.
//!
//! ## Outcomes for a module
//!
//! | Situation                                | Result                      |
//! |------------------------------------------|-----------------------------|
//! | name not in the registry                 | `Err(ModuleNotFound)`       |
//! | no `settings_file` declared              | `Ok(empty)`                 |
//! | declared file absent                     | `Err(MissingDescriptor)`    |
//! | invalid JSON / `env` not string → string | `Err(MalformedDescriptor)`  |
//! | otherwise                                | `Ok(env)` in declared order |
//!
//! File access goes through the `FileSource` trait, so the reader can be
//! exercised against an in-memory file set in tests.
//!
use crate::core::error::MsctlError;
use crate::engine::env_map::EnvMap;
use crate::engine::registry::Registry;
use serde_json::Value;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name reported for the base layer in diagnostics.
pub const BASE_LAYER_NAME: &str = "framework";

/// Read access to descriptor files.
pub trait FileSource {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// `FileSource` backed by the real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskFiles;

impl FileSource for DiskFiles {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

/// A source of declared variables in the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer<'a> {
    /// The framework descriptor. Merged first, never removed.
    Base,
    /// A registry module, by name.
    Module(&'a str),
}

impl Layer<'_> {
    /// Name used in diagnostics: the module name, or `framework`.
    pub fn name(&self) -> &str {
        match self {
            Layer::Base => BASE_LAYER_NAME,
            Layer::Module(name) => name,
        }
    }
}

/// Resolves layers to descriptor paths and parses them.
pub struct DescriptorReader<'a> {
    registry: &'a Registry,
    base_descriptor: &'a Path,
    files: &'a dyn FileSource,
}

impl<'a> DescriptorReader<'a> {
    pub fn new(registry: &'a Registry, base_descriptor: &'a Path, files: &'a dyn FileSource) -> Self {
        Self {
            registry,
            base_descriptor,
            files,
        }
    }

    /// Path of the layer's descriptor.
    ///
    /// `Ok(None)` means the module exists but declares no settings file.
    pub fn descriptor_path(&self, layer: Layer<'_>) -> Result<Option<PathBuf>, MsctlError> {
        match layer {
            Layer::Base => Ok(Some(self.base_descriptor.to_path_buf())),
            Layer::Module(name) => {
                let module = self
                    .registry
                    .get(name)
                    .ok_or_else(|| MsctlError::ModuleNotFound {
                        name: name.to_string(),
                    })?;
                Ok(self.registry.descriptor_path(module))
            }
        }
    }

    /// Loads the variables declared by `layer`.
    ///
    /// # Returns
    ///
    /// The descriptor's `env` mapping in declared order, or an empty mapping
    /// for a module that declares no settings file.
    ///
    /// # Errors
    ///
    /// Every failure is per-layer: `ModuleNotFound`, `MissingDescriptor` or
    /// `MalformedDescriptor`. Callers log it and move on.
    pub fn load(&self, layer: Layer<'_>) -> Result<EnvMap, MsctlError> {
        let Some(path) = self.descriptor_path(layer)? else {
            debug!("Module '{}' declares no settings file", layer.name());
            return Ok(EnvMap::new());
        };
        let content = self.files.read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MsctlError::MissingDescriptor {
                module: layer.name().to_string(),
                path: path.clone(),
            },
            _ => MsctlError::MalformedDescriptor {
                module: layer.name().to_string(),
                path: path.clone(),
                reason: format!("unreadable: {}", e),
            },
        })?;
        let vars = parse_descriptor(layer.name(), &path, &content)?;
        debug!(
            "Loaded {} variable(s) for '{}' from {}",
            vars.len(),
            layer.name(),
            path.display()
        );
        Ok(vars)
    }

    pub fn load_base(&self) -> Result<EnvMap, MsctlError> {
        self.load(Layer::Base)
    }

    pub fn load_module(&self, name: &str) -> Result<EnvMap, MsctlError> {
        self.load(Layer::Module(name))
    }
}

/// Parses descriptor JSON into its `env` mapping.
///
/// # Arguments
///
/// * `module` - Layer name, used in the error.
/// * `path` - Descriptor path, used in the error.
/// * `content` - Raw file content.
///
/// # Errors
///
/// `MalformedDescriptor` if the content is not a JSON object, `env` is not
/// an object of strings, or an entry cannot be written as a single
/// `KEY=VALUE` line of the primary file.
pub fn parse_descriptor(module: &str, path: &Path, content: &str) -> Result<EnvMap, MsctlError> {
    let malformed = |reason: String| MsctlError::MalformedDescriptor {
        module: module.to_string(),
        path: path.to_path_buf(),
        reason,
    };

    let root: Value =
        serde_json::from_str(content).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;
    let Value::Object(root) = root else {
        return Err(malformed("top level must be a JSON object".to_string()));
    };

    match root.get("env") {
        None | Some(Value::Null) => Ok(EnvMap::new()),
        Some(Value::Object(env)) => {
            let mut vars = EnvMap::new();
            for (key, value) in env {
                let Value::String(value) = value else {
                    return Err(malformed(format!(
                        "value of `{}` must be a string, found {}",
                        key,
                        json_type_name(value)
                    )));
                };
                if let Some(problem) = unrepresentable_entry(key, value) {
                    return Err(malformed(problem));
                }
                vars.insert_if_absent(key.as_str(), value.as_str());
            }
            Ok(vars)
        }
        Some(other) => Err(malformed(format!(
            "`env` must be an object, found {}",
            json_type_name(other)
        ))),
    }
}

/// Why `key=value` cannot be written as one line of the primary env file
/// and read back as the same entry, if it cannot.
///
/// The primary file has no quoting, so a line break in either half, an `=`
/// in the key, whitespace the reader would trim, or a leading `#` would make
/// the next run seed different keys than the ones declared here.
fn unrepresentable_entry(key: &str, value: &str) -> Option<String> {
    if key.is_empty() {
        return Some("variable names cannot be empty".to_string());
    }
    if key.contains(['=', '\n', '\r']) {
        return Some(format!(
            "variable name {:?} cannot contain `=` or line breaks",
            key
        ));
    }
    if key.trim() != key {
        return Some(format!(
            "variable name {:?} cannot have surrounding whitespace",
            key
        ));
    }
    if key.starts_with('#') {
        return Some(format!("variable name {:?} cannot start with `#`", key));
    }
    if value.contains(['\n', '\r']) {
        return Some(format!("value of `{}` cannot contain line breaks", key));
    }
    None
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
