// YearScope - app/state.rs
//
// Dashboard state snapshot and the named actions that produce new
// snapshots. Reduction is pure: it validates the action against the
// catalog and registry and returns the next state, never touching data.

use crate::core::catalog::FilterCatalog;
use crate::core::filter::FilterSelection;
use crate::core::model::Continent;
use crate::core::registry::ModelRegistry;
use crate::util::constants;
use crate::util::error::{DatasetError, FilterError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A user intent, applied with `DashboardState::reduce`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Replace one group's selected values. Empty `values` removes the group.
    ApplyFilter { group: String, values: Vec<String> },
    /// Clear one group, or every group when `group` is None.
    ResetFilters { group: Option<String> },
    SelectModel(String),
    ToggleComparisonMode,
    SetComparisonModels(Vec<String>),
    /// Select an event by its index in the filtered view.
    SelectEvent(Option<usize>),
    NextEvent,
    PreviousEvent,
    SetMapRegion(Option<Continent>),
    /// Expand or collapse a filter group in the sidebar.
    ToggleFilterGroup(String),
}

/// Everything the user has chosen, independent of loaded data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardState {
    pub selected_model: String,
    pub filter: FilterSelection,
    pub expanded_groups: BTreeSet<String>,

    /// Index into the filtered view of the selected model.
    pub selected_event: Option<usize>,

    pub map_region: Option<Continent>,
    pub comparison_mode: bool,
    pub comparison_models: Vec<String>,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self::new(
            constants::DEFAULT_MODEL_ID,
            constants::DEFAULT_COMPARISON_MODELS,
        )
    }
}

impl DashboardState {
    /// Initial state: no filters, first catalog group expanded.
    pub fn new<S: AsRef<str>>(selected_model: &str, comparison_models: &[S]) -> Self {
        let mut expanded_groups = BTreeSet::new();
        expanded_groups.insert("geographic".to_string());
        Self {
            selected_model: selected_model.to_string(),
            filter: FilterSelection::new(),
            expanded_groups,
            selected_event: None,
            map_region: None,
            comparison_mode: false,
            comparison_models: dedup(comparison_models),
        }
    }

    /// Apply `action`, returning the next state.
    ///
    /// Rejected actions leave `self` unchanged and return the error.
    pub fn reduce(
        &self,
        action: Action,
        catalog: &FilterCatalog,
        registry: &ModelRegistry,
    ) -> Result<DashboardState> {
        let mut next = self.clone();
        match action {
            Action::ApplyFilter { group, values } => {
                let filter_group =
                    catalog
                        .group(&group)
                        .ok_or_else(|| FilterError::UnknownGroup {
                            group_id: group.clone(),
                        })?;
                if let Some(bad) = values.iter().find(|v| !filter_group.offers(v)) {
                    return Err(FilterError::UnknownOption {
                        group_id: group,
                        value: bad.clone(),
                    }
                    .into());
                }
                next.filter.set(&group, values);
                next.selected_event = None;
            }
            Action::ResetFilters { group: Some(group) } => {
                if catalog.group(&group).is_none() {
                    return Err(FilterError::UnknownGroup { group_id: group }.into());
                }
                next.filter.clear_group(&group);
                next.selected_event = None;
            }
            Action::ResetFilters { group: None } => {
                next.filter.clear();
                next.selected_event = None;
            }
            Action::SelectModel(model_id) => {
                require_model(registry, &model_id)?;
                if model_id != next.selected_model {
                    next.selected_event = None;
                }
                next.selected_model = model_id;
            }
            Action::ToggleComparisonMode => {
                next.comparison_mode = !next.comparison_mode;
            }
            Action::SetComparisonModels(ids) => {
                for id in &ids {
                    require_model(registry, id)?;
                }
                next.comparison_models = dedup(&ids);
            }
            Action::SelectEvent(index) => {
                next.selected_event = index;
            }
            Action::NextEvent => {
                next.selected_event = Some(next.selected_event.map_or(0, |i| i.saturating_add(1)));
            }
            Action::PreviousEvent => {
                next.selected_event = next.selected_event.map(|i| i.saturating_sub(1));
            }
            Action::SetMapRegion(region) => {
                next.map_region = region;
            }
            Action::ToggleFilterGroup(group) => {
                if catalog.group(&group).is_none() {
                    return Err(FilterError::UnknownGroup { group_id: group }.into());
                }
                if !next.expanded_groups.remove(&group) {
                    next.expanded_groups.insert(group);
                }
            }
        }
        Ok(next)
    }

    /// Keep the selected event inside a filtered view of `visible` records.
    ///
    /// An index past the end moves to the last record; with nothing visible
    /// the selection is cleared.
    pub fn clamp_selection(&mut self, visible: usize) {
        if let Some(idx) = self.selected_event {
            if idx >= visible {
                self.selected_event = visible.checked_sub(1);
            }
        }
    }

    /// Models whose datasets the current view needs.
    pub fn required_models(&self) -> Vec<String> {
        let mut models = vec![self.selected_model.clone()];
        if self.comparison_mode {
            for id in &self.comparison_models {
                if !models.contains(id) {
                    models.push(id.clone());
                }
            }
        }
        models
    }
}

fn require_model(registry: &ModelRegistry, model_id: &str) -> Result<()> {
    if registry.contains(model_id) {
        Ok(())
    } else {
        Err(DatasetError::UnsupportedModel {
            model_id: model_id.to_string(),
        }
        .into())
    }
}

/// Keep the first occurrence of each id.
fn dedup<S: AsRef<str>>(ids: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.as_ref();
        if !out.iter().any(|existing| existing == id) {
            out.push(id.to_string());
        }
    }
    out
}
