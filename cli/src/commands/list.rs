//! # Msctl List Command
//!
//! File: cli/src/commands/list.rs
//!
//! ## Overview
//!
//! Prints the module registry as a table, marking the modules that are
//! currently enabled according to the persisted state:
//!
//! ```text
//! Modules in /work/app (directory: microservices):
//!
//!   Enabled | Name    | Key     | Descriptor
//!   --------+---------+---------+-----------------------------------
//!   yes     | auth    | auth    | microservices/auth/settings.json
//!           | health  | health  | -
//!
//! 1 of 2 module(s) enabled.
//! ```
//!
//! Enabled names that the registry does not know are reported after the
//! table, since reconciliation skips them.
//!
use crate::commands::display_path;
use crate::core::config;
use crate::core::error::Result;
use crate::engine::pipeline::Project;
use anyhow::Context;
use clap::Parser;
use std::path::Path;
use tracing::info;

/// Arguments for `msctl list`.
#[derive(Parser, Debug)]
pub struct ListArgs {}

/// One table row: enabled marker, name, key, descriptor.
type Row = [String; 4];

pub async fn handle_list(_args: ListArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling list command...");
    let project = config::load_project(project_dir).context("Failed to load msctl configuration")?;
    let enabled = project.tracker().load()?;

    let rows = build_rows(&project, &enabled);
    println!(
        "Modules in {} (directory: {}):\n",
        project.layout.root.display(),
        display_path(&project, project.registry.modules_dir())
    );
    if rows.is_empty() {
        println!("  No modules declared. Add [[modules]] entries to msctl.toml.");
    } else {
        print_table(&rows);
    }

    let unknown: Vec<&str> = enabled
        .iter()
        .filter(|name| !project.registry.contains(name))
        .map(String::as_str)
        .collect();
    println!(
        "\n{} of {} module(s) enabled.",
        enabled.len() - unknown.len(),
        rows.len()
    );
    if !unknown.is_empty() {
        println!("Enabled but not in the registry: {}", unknown.join(", "));
    }
    Ok(())
}

fn build_rows(project: &Project, enabled: &[String]) -> Vec<Row> {
    project
        .registry
        .iter()
        .map(|module| {
            let marker = if enabled.contains(&module.name) { "yes" } else { "" };
            let descriptor = project
                .registry
                .descriptor_path(module)
                .map(|p| display_path(project, &p))
                .unwrap_or_else(|| "-".to_string());
            [
                marker.to_string(),
                module.name.clone(),
                module.key.clone(),
                descriptor,
            ]
        })
        .collect()
}

fn print_table(rows: &[Row]) {
    let headers = ["Enabled", "Name", "Key", "Descriptor"];
    let mut widths = headers.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: [&str; 4]| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
    };
    println!("  {}", format_row(headers).trim_end());
    println!(
        "  {}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in rows {
        let cells = [
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ];
        println!("  {}", format_row(cells).trim_end());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::pipeline::ProjectLayout;
    use crate::engine::registry::{ModuleDescriptor, Registry};
    use std::path::PathBuf;

    #[test]
    fn test_build_rows_marks_enabled_and_descriptor() {
        let root = PathBuf::from("/work/app");
        let project = Project {
            layout: ProjectLayout {
                root: root.clone(),
                env_file: root.join(".env"),
                example_file: root.join(".env.example"),
                state_file: root.join(".msctl/enabled.json"),
                base_descriptor: root.join("settings.json"),
            },
            registry: Registry::new(
                root.join("microservices"),
                vec![
                    ModuleDescriptor {
                        name: "auth".into(),
                        key: "auth".into(),
                        settings_file: Some("settings.json".into()),
                    },
                    ModuleDescriptor {
                        name: "health".into(),
                        key: "health".into(),
                        settings_file: None,
                    },
                ],
            ),
        };
        let rows = build_rows(&project, &["auth".to_string()]);
        assert_eq!(rows[0], ["yes", "auth", "auth", "microservices/auth/settings.json"]);
        assert_eq!(rows[1], ["", "health", "health", "-"]);
    }
}
