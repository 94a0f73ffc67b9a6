use std::collections::{BTreeMap, BTreeSet};

use super::model::{MetadataValue, SpectralCollection};

// ---------------------------------------------------------------------------
// Filter predicate: which unique values are selected per parameter
// ---------------------------------------------------------------------------

/// Per-parameter selection state: maps parameter name → set of selected
/// values. If a parameter is absent, it means "no filter" (show all).
pub type FilterState = BTreeMap<String, BTreeSet<MetadataValue>>;

/// Initialise a [`FilterState`] with all values selected (i.e., keep everything).
pub fn init_filter_state(collection: &SpectralCollection) -> FilterState {
    collection
        .unique_values
        .iter()
        .map(|(name, vals)| (name.clone(), vals.clone()))
        .collect()
}

/// Return indices of documents that pass all active filters.
///
/// A document passes a parameter filter when:
/// * The parameter is not present in `filters` → passes (no constraint)
/// * The filter set for that parameter is empty → nothing selected → fails
/// * The document's value for that parameter is in the selected set → passes
pub fn filtered_indices(collection: &SpectralCollection, filters: &FilterState) -> Vec<usize> {
    collection
        .entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| {
            for (name, selected) in filters {
                if selected.is_empty() {
                    // Nothing selected for this parameter → hide everything
                    return false;
                }
                // Check all unique values are selected → no effective filter
                if let Some(all_vals) = collection.unique_values.get(name) {
                    if selected.len() == all_vals.len() {
                        continue; // everything selected, no filtering needed
                    }
                }
                match entry.document.param(name) {
                    Some(param) => {
                        if !selected.contains(&param.value) {
                            return false;
                        }
                    }
                    None => {
                        // document doesn't carry this parameter → include only
                        // if Null is selected
                        if !selected.contains(&MetadataValue::Null) {
                            return false;
                        }
                    }
                }
            }
            true
        })
        .map(|(i, _)| i)
        .collect()
}
