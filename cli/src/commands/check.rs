//! # Msctl Check Command
//!
//! File: cli/src/commands/check.rs
//!
//! ## Overview
//!
//! Loads the framework descriptor and the descriptor of every registry
//! module, enabled or not, and reports each one. Reconciliation tolerates a
//! broken descriptor by skipping it; `check` surfaces the problem up front
//! and exits non-zero so it can gate CI.
//!
use crate::commands::display_path;
use crate::core::config;
use crate::core::error::Result;
use crate::engine::descriptor::{DescriptorReader, DiskFiles, Layer};
use anyhow::{bail, Context};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};

/// Arguments for `msctl check`.
#[derive(Parser, Debug)]
pub struct CheckArgs {}

/// Result of loading one layer.
#[derive(Debug, PartialEq, Eq)]
enum LayerStatus {
    Ok(usize),
    NoDescriptor,
    Failed(String),
}

fn check_layer(reader: &DescriptorReader<'_>, layer: Layer<'_>) -> LayerStatus {
    match reader.descriptor_path(layer) {
        Ok(None) => LayerStatus::NoDescriptor,
        Err(e) => LayerStatus::Failed(e.to_string()),
        Ok(Some(_)) => {
            let loaded = match layer {
                Layer::Base => reader.load_base(),
                Layer::Module(name) => reader.load_module(name),
            };
            match loaded {
                Ok(vars) => LayerStatus::Ok(vars.len()),
                Err(e) => LayerStatus::Failed(e.to_string()),
            }
        }
    }
}

pub async fn handle_check(_args: CheckArgs, project_dir: Option<&Path>) -> Result<()> {
    info!("Handling check command...");
    let project = config::load_project(project_dir).context("Failed to load msctl configuration")?;
    let reader = project.reader(&DiskFiles);

    let mut layers = vec![Layer::Base];
    layers.extend(project.registry.iter().map(|m| Layer::Module(m.name.as_str())));

    let mut problems = 0;
    println!("Checking descriptors in {}:\n", project.layout.root.display());
    for layer in layers {
        let location = match reader.descriptor_path(layer) {
            Ok(Some(path)) => display_path(&project, &path),
            _ => "-".to_string(),
        };
        match check_layer(&reader, layer) {
            LayerStatus::Ok(count) => {
                println!("  ✅ {} ({}): {} variable(s)", layer.name(), location, count)
            }
            LayerStatus::NoDescriptor => {
                println!("  ✅ {}: no settings file declared", layer.name())
            }
            LayerStatus::Failed(reason) => {
                warn!("Descriptor check failed for '{}'", layer.name());
                println!("  ❌ {}", reason);
                problems += 1;
            }
        }
    }

    if problems > 0 {
        bail!("{} descriptor(s) failed to load", problems);
    }
    println!("\nAll descriptors are valid.");
    Ok(())
}
