//! Combining the catalogs and tables of several registries.
//!
//! Merging resolves name clashes in favour of the **first** registry that
//! declares a name. This is the opposite tie-break of re-registration inside a
//! single registry, where the last registration wins.

use std::collections::HashSet;

use tracing::debug;

use crate::call::ToolSpec;
use crate::error::MergeError;
use crate::registry::ToolRegistry;

/// Concatenates the catalogs of `registries` in order, keeping only the first
/// declaration of each tool name.
#[must_use]
pub fn merge_tools(registries: &[&ToolRegistry]) -> Vec<ToolSpec> {
    let mut seen = HashSet::new();
    registries
        .iter()
        .flat_map(|registry| registry.generate_tools())
        .filter(|spec| seen.insert(spec.name().to_owned()))
        .collect()
}

/// Builds a callable registry holding the tools of every input, first
/// registry wins on name clashes.
///
/// The merged registry uses the settings of the first input and shares the
/// tool handlers with the inputs, which are left untouched.
///
/// # Errors
///
/// Returns [`MergeError::Empty`] when `registries` is empty.
pub fn merge_registries(registries: &[&ToolRegistry]) -> Result<ToolRegistry, MergeError> {
    let (first, _) = registries.split_first().ok_or(MergeError::Empty)?;
    let merged = ToolRegistry::with_config(first.config().clone());

    for registry in registries {
        for entry in registry.entries() {
            let name = entry.name().to_owned();
            if !merged.insert_if_absent(entry) {
                debug!(tool = %name, "dropping duplicate tool while merging");
            }
        }
    }

    Ok(merged)
}
