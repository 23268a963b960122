//! # Variable Merger
//!
//! File: cli/src/engine/merge.rs
//!
//! ## Overview
//!
//! Applies layers of declared variables to the canonical mapping. The mapping
//! is an owned `EnvMap` passed into each step and handed back in the step's
//! `StepOutcome`, so the orchestrator decides the order and nothing else can
//! touch it mid-run.
//!
//! ## Rules
//!
//! - **Base layer** (framework descriptor): insert each key only if absent.
//!   Values already in the mapping (seeded from the primary file, possibly
//!   edited by hand) are never overwritten.
//! - **Additions**: for each added module, in order, insert each key only if
//!   absent. Whoever set a key first in the run keeps it, so the framework
//!   always beats a module declaring the same name.
//! - **Removals**: for each removed module, in order, delete each declared key
//!   if present, regardless of whose value occupies it. If two modules
//!   declare the same key and only one is disabled, the key is still deleted.
//!   The remaining module gets it back only when it is re-added.
//!
//! A module whose descriptor cannot be loaded is logged at `warn`, recorded
//! in `StepOutcome::skipped`, and left out of the step. Merging always carries
//! on with the remaining modules.
//!
use crate::core::error::MsctlError;
use crate::engine::descriptor::{DescriptorReader, Layer};
use crate::engine::env_map::EnvMap;
use tracing::{debug, warn};

/// Direction of a module merge step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOp {
    Add,
    Remove,
}

/// Result of one merge step.
#[derive(Debug, Default)]
pub struct StepOutcome {
    pub map: EnvMap,
    /// Layers left out of the step, with the reason.
    pub skipped: Vec<MsctlError>,
}

/// Applies one layer's variables to `map`.
///
/// `Add` inserts each variable only if its name is absent; `Remove` deletes
/// every declared name regardless of the value it holds.
pub fn apply_vars(mut map: EnvMap, vars: &EnvMap, op: MergeOp) -> EnvMap {
    match op {
        MergeOp::Add => {
            for (key, value) in vars.iter() {
                // Existing values always win.
                if map.get(key).is_some_and(|existing| existing != value) {
                    debug!("Keeping existing value for {}, ignoring declared default", key);
                }
                map.insert_if_absent(key, value);
            }
        }
        MergeOp::Remove => {
            for key in vars.keys() {
                if map.remove(key).is_some() {
                    debug!("Removed {}", key);
                }
            }
        }
    }
    map
}

/// Merges the framework descriptor into `map` without overwriting anything.
pub fn merge_base_layer(map: EnvMap, reader: &DescriptorReader<'_>) -> StepOutcome {
    merge_layers(map, reader, std::iter::once(Layer::Base), MergeOp::Add)
}

/// Merges each added module, in order, with insert-if-absent semantics.
pub fn merge_additions(map: EnvMap, reader: &DescriptorReader<'_>, added: &[String]) -> StepOutcome {
    merge_layers(
        map,
        reader,
        added.iter().map(|name| Layer::Module(name)),
        MergeOp::Add,
    )
}

/// Deletes every key declared by each removed module, in order.
pub fn merge_removals(
    map: EnvMap,
    reader: &DescriptorReader<'_>,
    removed: &[String],
) -> StepOutcome {
    merge_layers(
        map,
        reader,
        removed.iter().map(|name| Layer::Module(name)),
        MergeOp::Remove,
    )
}

fn merge_layers<'n>(
    mut map: EnvMap,
    reader: &DescriptorReader<'_>,
    layers: impl Iterator<Item = Layer<'n>>,
    op: MergeOp,
) -> StepOutcome {
    let mut skipped = Vec::new();
    for layer in layers {
        match reader.load(layer) {
            Ok(vars) => {
                debug!(
                    "{:?} {} variable(s) for '{}'",
                    op,
                    vars.len(),
                    layer.name()
                );
                map = apply_vars(map, &vars, op);
            }
            Err(e) => {
                warn!("{} Skipping '{}'.", e, layer.name());
                skipped.push(e);
            }
        }
    }
    StepOutcome { map, skipped }
}
