//! # Example File Generator
//!
//! File: cli/src/engine/example.rs
//!
//! ## Overview
//!
//! Rebuilds the example env file (`.env.example` by default) from scratch on
//! every run. It is derived from the descriptors of the framework and of the
//! currently enabled modules, never from the canonical mapping or the
//! previous example file, so a disabled module's section disappears
//! entirely.
//!
//! ## Layout
//!
//! ```text
//! # ==============================================================
//! #  Example environment variables
//! #  ...banner...
//! # ==============================================================
//!
//! # --- Framework (settings.json) ---
//! ENVIRONMENT=development
//!
//! # --- Module: auth (microservices/auth/settings.json) ---
//! JWT_SECRET=changeme
//! ```
//!
//! Sections appear in the enabled-list order. A section is emitted only if
//! its layer declares at least one variable. Layers that cannot be loaded
//! (unknown module, no settings file, missing or malformed descriptor) are
//! left out silently: this is a read-only derivation, and merge has already
//! reported those problems.
//!
use crate::common::fs::io;
use crate::core::error::Result;
use crate::engine::descriptor::{DescriptorReader, Layer};
use crate::engine::env_map::EnvMap;
use anyhow::Context;
use std::path::Path;
use tracing::debug;

const BANNER: &str = "\
# ==============================================================
#  Example environment variables
#  Generated by msctl from the framework and the enabled modules.
#  Do not edit this file: it is rewritten on every run.
#  Copy it to your env file and adjust the values.
# ==============================================================";

/// Renders the example file for `enabled`.
///
/// Descriptor paths in section headers are shown relative to `project_root`
/// when they live inside it.
pub fn render_example(reader: &DescriptorReader<'_>, enabled: &[String], project_root: &Path) -> String {
    let mut blocks = vec![BANNER.to_string()];

    if let Some(section) = render_section(reader, Layer::Base, project_root) {
        blocks.push(section);
    }
    for name in enabled {
        if let Some(section) = render_section(reader, Layer::Module(name), project_root) {
            blocks.push(section);
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    out
}

/// Renders and writes the example file.
///
/// # Arguments
///
/// * `path` - The example file to overwrite.
/// * `reader` - Source of the framework and module descriptors.
/// * `enabled` - Enabled modules after this run, in tracker order.
/// * `project_root` - Prefix stripped from paths in section headers.
///
/// # Errors
///
/// Only the write itself can fail. Layers that cannot be loaded are left
/// out of the file.
pub fn write_example(
    path: &Path,
    reader: &DescriptorReader<'_>,
    enabled: &[String],
    project_root: &Path,
) -> Result<()> {
    let content = render_example(reader, enabled, project_root);
    io::write_string_to_file(path, &content)
        .with_context(|| format!("Failed to write example env file {}", path.display()))
}

fn render_section(reader: &DescriptorReader<'_>, layer: Layer<'_>, project_root: &Path) -> Option<String> {
    let path = match reader.descriptor_path(layer) {
        Ok(Some(path)) => path,
        Ok(None) => return None,
        Err(e) => {
            debug!("No example section for '{}': {}", layer.name(), e);
            return None;
        }
    };
    let vars = match reader.load(layer) {
        Ok(vars) if !vars.is_empty() => vars,
        Ok(_) => return None,
        Err(e) => {
            debug!("No example section for '{}': {}", layer.name(), e);
            return None;
        }
    };

    let shown = path.strip_prefix(project_root).unwrap_or(&path);
    let header = match layer {
        Layer::Base => format!("# --- Framework ({}) ---", shown.display()),
        Layer::Module(name) => format!("# --- Module: {} ({}) ---", name, shown.display()),
    };
    Some(format!("{}\n{}", header, render_vars(&vars)))
}

fn render_vars(vars: &EnvMap) -> String {
    vars.iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::descriptor::tests::{module, MemoryFiles};
    use crate::engine::registry::Registry;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn registry() -> Registry {
        Registry::new(
            "/p/microservices",
            vec![
                module("auth", Some("settings.json")),
                module("mailer", Some("settings.json")),
                module("health", None),
                module("empty", Some("settings.json")),
                module("ghost", Some("settings.json")),
            ],
        )
    }

    fn files() -> MemoryFiles {
        MemoryFiles::default()
            .with("/p/settings.json", r#"{"env":{"ENVIRONMENT":"development"}}"#)
            .with(
                "/p/microservices/auth/settings.json",
                r#"{"env":{"JWT_SECRET":"changeme"}}"#,
            )
            .with(
                "/p/microservices/mailer/settings.json",
                r#"{"env":{"SMTP_HOST":"localhost","SMTP_PORT":"25"}}"#,
            )
            .with("/p/microservices/empty/settings.json", r#"{"env":{}}"#)
    }

    #[test]
    fn test_sections_follow_enabled_order() {
        let registry = registry();
        let files = files();
        let reader = DescriptorReader::new(&registry, Path::new("/p/settings.json"), &files);
        let out = render_example(&reader, &names(&["mailer", "auth"]), Path::new("/p"));
        let expected = format!(
            "{}\n\n\
             # --- Framework (settings.json) ---\nENVIRONMENT=development\n\n\
             # --- Module: mailer (microservices/mailer/settings.json) ---\nSMTP_HOST=localhost\nSMTP_PORT=25\n\n\
             # --- Module: auth (microservices/auth/settings.json) ---\nJWT_SECRET=changeme\n",
            BANNER
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_modules_without_variables_are_left_out_silently() {
        let registry = registry();
        let files = files();
        let reader = DescriptorReader::new(&registry, Path::new("/p/settings.json"), &files);
        let out = render_example(
            &reader,
            &names(&["health", "empty", "ghost", "unknown"]),
            Path::new("/p"),
        );
        assert!(!out.contains("Module:"));
        assert!(out.contains("# --- Framework (settings.json) ---"));
    }

    #[test]
    fn test_empty_framework_has_no_section() {
        let registry = registry();
        let files = MemoryFiles::default().with(
            "/p/microservices/auth/settings.json",
            r#"{"env":{"JWT_SECRET":"changeme"}}"#,
        );
        let reader = DescriptorReader::new(&registry, Path::new("/p/settings.json"), &files);
        let out = render_example(&reader, &names(&["auth"]), Path::new("/p"));
        assert!(!out.contains("Framework"));
        assert!(out.ends_with("JWT_SECRET=changeme\n"));
    }

    #[test]
    fn test_nothing_enabled_is_banner_only() {
        let registry = registry();
        let files = MemoryFiles::default();
        let reader = DescriptorReader::new(&registry, Path::new("/p/settings.json"), &files);
        assert_eq!(
            render_example(&reader, &[], Path::new("/p")),
            format!("{}\n", BANNER)
        );
    }
}
