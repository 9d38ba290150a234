// YearScope - core/filter.rs
//
// Composable filter engine for evaluation records.
// Active groups are AND-combined; the values selected within one group are
// OR-combined across every attribute that group maps.
// Core layer: pure logic, no I/O.

use crate::core::catalog::{FilterCatalog, FilterGroup};
use crate::core::model::{Attribute, EvaluationRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Active filter selections, keyed by filter-group id.
///
/// A group with no selected values is never stored, so an empty map means
/// no filtering at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSelection {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of `set`.
    pub fn with_group<I, S>(mut self, group_id: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(group_id, values);
        self
    }

    /// Returns true if no filters are active.
    pub fn is_empty(&self) -> bool {
        self.groups.values().all(BTreeSet::is_empty)
    }

    /// Replace the selection for one group. An empty `values` removes it.
    pub fn set<I, S>(&mut self, group_id: &str, values: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            self.groups.remove(group_id);
        } else {
            self.groups.insert(group_id.to_string(), values);
        }
    }

    pub fn clear_group(&mut self, group_id: &str) {
        self.groups.remove(group_id);
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }

    pub fn get(&self, group_id: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(group_id)
    }

    /// Iterate `(group_id, selected_values)` in group-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.groups.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Total number of selected values across all groups.
    pub fn active_count(&self) -> usize {
        self.groups.values().map(BTreeSet::len).sum()
    }
}

/// Apply filters to a slice of records, returning indices of matching records.
///
/// Returns a Vec of indices into the original slice, in input order. Groups
/// that the catalog does not know contribute no constraint.
pub fn apply_filters(
    records: &[EvaluationRecord],
    selection: &FilterSelection,
    catalog: &FilterCatalog,
) -> Vec<usize> {
    if selection.is_empty() {
        return (0..records.len()).collect();
    }

    let active = active_groups(selection, catalog);

    records
        .iter()
        .enumerate()
        .filter(|(_, record)| matches_all(record, &active))
        .map(|(idx, _)| idx)
        .collect()
}

/// Same as `apply_filters`, returning borrowed records instead of indices.
pub fn filter_records<'a>(
    records: &'a [EvaluationRecord],
    selection: &FilterSelection,
    catalog: &FilterCatalog,
) -> Vec<&'a EvaluationRecord> {
    apply_filters(records, selection, catalog)
        .into_iter()
        .map(|idx| &records[idx])
        .collect()
}

/// Resolve selected group ids against the catalog, dropping unknown ones.
fn active_groups<'a>(
    selection: &'a FilterSelection,
    catalog: &'a FilterCatalog,
) -> Vec<(&'a FilterGroup, &'a BTreeSet<String>)> {
    selection
        .iter()
        .filter(|(_, values)| !values.is_empty())
        .filter_map(|(group_id, values)| match catalog.group(group_id) {
            Some(group) => Some((group, values)),
            None => {
                tracing::debug!(group = group_id, "Ignoring selection for unknown filter group");
                None
            }
        })
        .collect()
}

/// Check if a single record matches every active group.
fn matches_all(record: &EvaluationRecord, active: &[(&FilterGroup, &BTreeSet<String>)]) -> bool {
    active
        .iter()
        .all(|(group, values)| group.matches(record, values))
}

/// Number of records carrying one option value of a group's attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub attribute: Attribute,
    pub value: String,
    pub count: usize,
}

/// Count, for every option a group offers, how many records carry it.
///
/// Used by the sidebar to label options; options with zero records are
/// included so the list always mirrors the catalog.
pub fn option_counts(records: &[EvaluationRecord], group: &FilterGroup) -> Vec<OptionCount> {
    group
        .filters
        .iter()
        .flat_map(|f| {
            f.options.iter().map(move |value| OptionCount {
                attribute: f.attribute,
                value: value.clone(),
                count: records
                    .iter()
                    .filter(|r| f.attribute.value_of(r) == value.as_str())
                    .count(),
            })
        })
        .collect()
}
