// YearScope - app/dashboard.rs
//
// The dashboard container: owns the catalog, the registry, the dataset
// store and the current state snapshot, and keeps the derived view in step
// with them. Every mutating entry point ends with a synchronous recompute,
// so the view a host reads is never stale.

use crate::app::loader;
use crate::app::state::{Action, DashboardState};
use crate::core::aggregate::{aggregate, AggregateResult, RegionStats};
use crate::core::catalog::FilterCatalog;
use crate::core::compare::{compare, ComparisonResult};
use crate::core::dataset::{decode_dataset, DecodedDataset};
use crate::core::export::{self, ExportFormat, ExportPayload};
use crate::core::filter::{apply_filters, option_counts, OptionCount};
use crate::core::insights::{derive_insights, Insights};
use crate::core::model::EvaluationRecord;
use crate::core::registry::ModelRegistry;
use crate::core::store::{DatasetStore, LoadState};
use crate::platform::config::AppConfig;
use crate::util::constants;
use crate::util::error::{DatasetError, FilterError, Result};
use serde::Serialize;
use std::path::Path;

/// A dataset the host should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub model_id: String,
    pub url: String,
}

/// Everything the rendering layer draws, derived from store and state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedView {
    pub model_id: String,
    /// Indices into the selected model's records that pass the filters.
    pub filtered: Vec<usize>,
    pub aggregate: AggregateResult,
    pub insights: Insights,
    /// Stats for the region highlighted on the map, when it has records.
    pub map_region: Option<RegionStats>,
    /// Present only in comparison mode.
    pub comparison: Option<ComparisonResult>,
}

/// Recompute the view for `state`. Pure: same inputs, same view.
pub fn derive_view(
    store: &DatasetStore,
    state: &DashboardState,
    catalog: &FilterCatalog,
) -> DerivedView {
    let records = store.records(&state.selected_model);
    let filtered = apply_filters(records, &state.filter, catalog);
    let aggregate = aggregate(filtered.iter().map(|&idx| &records[idx]));
    let insights = derive_insights(&aggregate);

    let map_region = state.map_region.and_then(|region| {
        aggregate
            .by_region
            .iter()
            .find(|r| r.region == region)
            .cloned()
    });

    let comparison = state
        .comparison_mode
        .then(|| compare(&state.comparison_models, store, &state.filter, catalog));

    tracing::debug!(
        model = %state.selected_model,
        total = records.len(),
        visible = filtered.len(),
        comparison = state.comparison_mode,
        "View recomputed"
    );

    DerivedView {
        model_id: state.selected_model.clone(),
        filtered,
        aggregate,
        insights,
        map_region,
        comparison,
    }
}

/// Dashboard container.
#[derive(Debug)]
pub struct Dashboard {
    catalog: FilterCatalog,
    registry: ModelRegistry,
    store: DatasetStore,
    state: DashboardState,
    view: DerivedView,
    export_stem: String,
}

impl Dashboard {
    pub fn new(catalog: FilterCatalog, registry: ModelRegistry, state: DashboardState) -> Self {
        let store = DatasetStore::new();
        let view = derive_view(&store, &state, &catalog);
        Self {
            catalog,
            registry,
            store,
            state,
            view,
            export_stem: constants::DEFAULT_EXPORT_FILE_STEM.to_string(),
        }
    }

    /// Build a dashboard from validated configuration.
    ///
    /// Returns the dashboard and non-fatal warnings (rejected catalog file,
    /// unregistered model ids). Only a broken built-in catalog is fatal.
    pub fn from_config(config: &AppConfig) -> Result<(Self, Vec<String>)> {
        let (catalog, catalog_errors) = loader::resolve_catalog(config.catalog_file.as_deref())?;
        let (registry, mut warnings) = loader::build_registry(&config.models);
        warnings.extend(catalog_errors.iter().map(|e| e.to_string()));

        let default_model = if registry.contains(&config.default_model) {
            config.default_model.as_str()
        } else {
            warnings.push(format!(
                "Default model '{}' is not registered; using '{}'",
                config.default_model,
                constants::DEFAULT_MODEL_ID
            ));
            constants::DEFAULT_MODEL_ID
        };

        let mut comparison_models = Vec::new();
        for id in &config.comparison_models {
            if registry.contains(id) {
                comparison_models.push(id.as_str());
            } else {
                warnings.push(format!(
                    "Comparison model '{id}' is not registered; ignoring"
                ));
            }
        }

        let state = DashboardState::new(default_model, &comparison_models);
        let mut dashboard = Self::new(catalog, registry, state);
        dashboard.export_stem = config.export_file_stem.clone();

        for warning in &warnings {
            tracing::warn!("{}", warning);
        }
        Ok((dashboard, warnings))
    }

    pub fn catalog(&self) -> &FilterCatalog {
        &self.catalog
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn store(&self) -> &DatasetStore {
        &self.store
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn view(&self) -> &DerivedView {
        &self.view
    }

    /// Apply an action and recompute. A rejected action changes nothing.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, "Dispatching action");
        self.state = self.state.reduce(action, &self.catalog, &self.registry)?;
        self.recompute();
        Ok(())
    }

    /// Rebuild the derived view and keep the event selection in range.
    pub fn recompute(&mut self) {
        self.view = derive_view(&self.store, &self.state, &self.catalog);
        self.state.clamp_selection(self.view.filtered.len());
    }

    /// Datasets the current view needs that are neither loaded nor in flight.
    pub fn pending_loads(&self) -> Vec<PendingLoad> {
        self.state
            .required_models()
            .into_iter()
            .filter(|id| self.store.needs_load(id))
            .filter_map(|id| {
                let url = self.registry.get(&id)?.url.clone();
                Some(PendingLoad { model_id: id, url })
            })
            .collect()
    }

    /// Record that the host started fetching a model's dataset.
    pub fn mark_loading(&mut self, model_id: &str) -> Result<()> {
        self.require_registered(model_id)?;
        self.store.mark_loading(model_id);
        self.recompute();
        Ok(())
    }

    /// Accept a fetched JSON document for `model_id`.
    ///
    /// A document that does not decode marks the model failed, and the
    /// error is returned as well. Returns the number of records stored.
    pub fn on_dataset_loaded(&mut self, model_id: &str, json: &str) -> Result<usize> {
        self.require_registered(model_id)?;
        match decode_dataset(model_id, json) {
            Ok(decoded) => Ok(self.insert_dataset(model_id, decoded)),
            Err(e) => {
                self.store.mark_failed(model_id, e.to_string());
                self.recompute();
                Err(e.into())
            }
        }
    }

    /// Record a failed fetch reported by the host.
    pub fn on_dataset_failed(&mut self, model_id: &str, message: &str) {
        let error = DatasetError::LoadFailed {
            model_id: model_id.to_string(),
            reason: message.to_string(),
        };
        self.store.mark_failed(model_id, error.to_string());
        self.recompute();
    }

    /// Load a model's dataset from a local JSON file.
    pub fn load_dataset_file(&mut self, model_id: &str, path: &Path) -> Result<usize> {
        self.require_registered(model_id)?;
        match loader::load_dataset_file(path, model_id) {
            Ok(decoded) => Ok(self.insert_dataset(model_id, decoded)),
            Err(e) => {
                self.store.mark_failed(model_id, e.to_string());
                self.recompute();
                Err(e.into())
            }
        }
    }

    fn insert_dataset(&mut self, model_id: &str, decoded: DecodedDataset) -> usize {
        let count = decoded.records.len();
        self.store.insert_loaded(model_id, decoded);
        self.recompute();
        count
    }

    fn require_registered(&self, model_id: &str) -> Result<()> {
        if self.registry.contains(model_id) {
            Ok(())
        } else {
            Err(DatasetError::UnsupportedModel {
                model_id: model_id.to_string(),
            }
            .into())
        }
    }

    /// Load state of the selected model.
    pub fn selected_load_state(&self) -> &LoadState {
        self.store.state(&self.state.selected_model)
    }

    /// The selected model's records that pass the filters, in order.
    pub fn filtered_records(&self) -> Vec<&EvaluationRecord> {
        let records = self.store.records(&self.state.selected_model);
        self.view
            .filtered
            .iter()
            .filter_map(|&idx| records.get(idx))
            .collect()
    }

    /// The record behind the selected event index, if any.
    pub fn selected_record(&self) -> Option<&EvaluationRecord> {
        let records = self.store.records(&self.state.selected_model);
        self.state
            .selected_event
            .and_then(|idx| self.view.filtered.get(idx))
            .and_then(|&record_idx| records.get(record_idx))
    }

    /// Per-option record counts for a group over the selected model's data.
    pub fn option_counts(&self, group_id: &str) -> Result<Vec<OptionCount>> {
        let group = self
            .catalog
            .group(group_id)
            .ok_or_else(|| FilterError::UnknownGroup {
                group_id: group_id.to_string(),
            })?;
        Ok(option_counts(
            self.store.records(&self.state.selected_model),
            group,
        ))
    }

    /// Encode the current filtered view for download.
    pub fn export(&self, format: ExportFormat) -> Result<ExportPayload> {
        let records = self.filtered_records();
        Ok(export::encode(&records, format, &self.export_stem)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::fixtures::record;
    use crate::core::model::{Continent, PrimaryCategory};
    use crate::util::error::YearScopeError;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            FilterCatalog::builtin().unwrap(),
            ModelRegistry::builtin(),
            DashboardState::default(),
        )
    }

    fn json(records: &[EvaluationRecord]) -> String {
        serde_json::to_string(records).unwrap()
    }

    fn scenario() -> Vec<EvaluationRecord> {
        vec![
            record(PrimaryCategory::MilitaryWarfare, true, 0.9),
            record(PrimaryCategory::MilitaryWarfare, false, 0.3),
            record(PrimaryCategory::ArtsCulture, true, 0.6),
        ]
    }

    #[test]
    fn test_initial_view_is_zero_state() {
        let dash = dashboard();
        assert!(dash.view().filtered.is_empty());
        assert_eq!(dash.view().aggregate.overall.total_events, 0);
        assert!(dash.view().comparison.is_none());
        assert_eq!(dash.selected_load_state(), &LoadState::NotLoaded);
    }

    #[test]
    fn test_pending_loads_lifecycle() {
        let mut dash = dashboard();
        let pending = dash.pending_loads();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].model_id, "gemma3:1b");
        assert!(pending[0].url.ends_with("results_gemma3_1b.json"));

        dash.mark_loading("gemma3:1b").unwrap();
        assert!(dash.pending_loads().is_empty());

        dash.dispatch(Action::ToggleComparisonMode).unwrap();
        let ids: Vec<_> = dash.pending_loads().into_iter().map(|p| p.model_id).collect();
        assert_eq!(ids, vec!["gemma3:4b"]);
    }

    #[test]
    fn test_loaded_dataset_recomputes_view() {
        let mut dash = dashboard();
        let count = dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        assert_eq!(count, 3);
        let overall = dash.view().aggregate.overall;
        assert_eq!(overall.total_events, 3);
        assert!((overall.accuracy - 2.0 / 3.0).abs() < 1e-9);
        assert!((overall.avg_confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_apply_filter_then_recompute() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::ApplyFilter {
            group: "event_characteristics".to_string(),
            values: vec!["Arts & Culture".to_string()],
        })
        .unwrap();
        assert_eq!(dash.view().filtered, vec![2]);
        assert_eq!(dash.view().aggregate.overall.accuracy, 1.0);
        assert_eq!(dash.filtered_records().len(), 1);
    }

    #[test]
    fn test_rejected_action_changes_nothing() {
        let mut dash = dashboard();
        let before = dash.state().clone();
        let err = dash
            .dispatch(Action::SelectModel("gpt-x".to_string()))
            .unwrap_err();
        assert!(matches!(err, YearScopeError::Dataset(_)));
        assert_eq!(dash.state(), &before);
    }

    #[test]
    fn test_failed_load_is_visible_and_isolated() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.on_dataset_failed("gemma3:4b", "404 Not Found");

        let state = dash.store().state("gemma3:4b");
        assert!(state.error().unwrap().contains("404 Not Found"));
        assert_eq!(dash.store().records("gemma3:1b").len(), 3);
        assert_eq!(dash.view().aggregate.overall.total_events, 3);
    }

    #[test]
    fn test_invalid_document_marks_failed() {
        let mut dash = dashboard();
        assert!(dash.on_dataset_loaded("gemma3:1b", "{oops").is_err());
        assert!(dash.selected_load_state().error().is_some());
        assert_eq!(dash.view().aggregate.overall.total_events, 0);
    }

    #[test]
    fn test_unregistered_model_data_is_rejected() {
        let mut dash = dashboard();
        let err = dash.on_dataset_loaded("gpt-x", "[]").unwrap_err();
        assert!(matches!(
            err,
            YearScopeError::Dataset(DatasetError::UnsupportedModel { .. })
        ));
        assert!(dash.store().iter().next().is_none());
    }

    #[test]
    fn test_selection_follows_filtered_view() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::SelectEvent(Some(2))).unwrap();
        assert_eq!(
            dash.selected_record().map(|r| r.event.primary_category),
            Some(PrimaryCategory::ArtsCulture)
        );

        dash.dispatch(Action::NextEvent).unwrap();
        assert_eq!(dash.state().selected_event, Some(2), "clamped at the end");

        dash.dispatch(Action::ApplyFilter {
            group: "geographic".to_string(),
            values: vec!["Asia".to_string()],
        })
        .unwrap();
        assert!(dash.view().filtered.is_empty());
        assert!(dash.selected_record().is_none());
    }

    #[test]
    fn test_comparison_in_view() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::ToggleComparisonMode).unwrap();
        let comparison = dash.view().comparison.as_ref().unwrap();
        assert_eq!(comparison.models.len(), 2);
        assert!(comparison.models[0].available);
        assert!(!comparison.models[1].available);
        assert_eq!(comparison.best_accuracy.as_deref(), Some("gemma3:1b"));
    }

    #[test]
    fn test_map_region_stats() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::SetMapRegion(Some(Continent::Europe))).unwrap();
        assert_eq!(dash.view().map_region.as_ref().map(|r| r.count), Some(3));
        dash.dispatch(Action::SetMapRegion(Some(Continent::Oceania))).unwrap();
        assert!(dash.view().map_region.is_none());
    }

    #[test]
    fn test_export_uses_filtered_view() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::ApplyFilter {
            group: "event_characteristics".to_string(),
            values: vec!["Military & Warfare".to_string()],
        })
        .unwrap();
        let payload = dash.export(ExportFormat::Csv).unwrap();
        assert_eq!(payload.file_name, "gemma-analysis.csv");
        assert_eq!(payload.content.lines().count(), 3);

        let payload = dash.export(ExportFormat::Json).unwrap();
        let back: Vec<EvaluationRecord> = serde_json::from_str(&payload.content).unwrap();
        assert_eq!(back.len(), 2);
    }

    #[test]
    fn test_refresh_keeps_view_and_export_usable() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario()[..1])).unwrap();

        dash.mark_loading("gemma3:1b").unwrap();
        assert_eq!(dash.view().filtered, vec![0]);
        assert_eq!(dash.filtered_records().len(), 1);
        let payload = dash.export(ExportFormat::Csv).unwrap();
        assert_eq!(payload.content.lines().count(), 2);

        dash.on_dataset_failed("gemma3:1b", "timeout");
        assert!(dash.selected_load_state().is_loaded());
        assert_eq!(dash.store().records("gemma3:1b").len(), 1);
        assert_eq!(dash.view().aggregate.overall.total_events, 1);
    }

    #[test]
    fn test_refresh_with_new_document_replaces_view() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        dash.dispatch(Action::SelectEvent(Some(2))).unwrap();

        dash.mark_loading("gemma3:1b").unwrap();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario()[..1])).unwrap();
        assert_eq!(dash.view().filtered, vec![0]);
        assert_eq!(dash.state().selected_event, Some(0));
        assert!(dash.selected_record().is_some());
    }

    #[test]
    fn test_mark_loading_recomputes_view() {
        let mut dash = dashboard();
        dash.on_dataset_failed("gemma3:1b", "HTTP 500");
        assert!(dash.selected_load_state().error().is_some());

        dash.mark_loading("gemma3:1b").unwrap();
        assert!(dash.selected_load_state().is_loading());
        assert!(dash.view().filtered.is_empty());
        assert!(dash.filtered_records().is_empty());
        assert!(dash.export(ExportFormat::Json).is_ok());
    }

    #[test]
    fn test_option_counts_for_sidebar() {
        let mut dash = dashboard();
        dash.on_dataset_loaded("gemma3:1b", &json(&scenario())).unwrap();
        let counts = dash.option_counts("event_characteristics").unwrap();
        let military = counts
            .iter()
            .find(|c| c.value == "Military & Warfare")
            .unwrap();
        assert_eq!(military.count, 2);
        assert!(dash.option_counts("astrology").is_err());
    }

    #[test]
    fn test_from_config_falls_back_for_unknown_models() {
        let config = AppConfig {
            default_model: "mystery".to_string(),
            comparison_models: vec!["gemma3:27b".to_string(), "ghost".to_string()],
            export_file_stem: "run".to_string(),
            ..AppConfig::default()
        };
        let (dash, warnings) = Dashboard::from_config(&config).unwrap();
        assert_eq!(warnings.len(), 2);
        assert_eq!(dash.state().selected_model, "gemma3:1b");
        assert_eq!(dash.state().comparison_models, vec!["gemma3:27b"]);
        let payload = dash.export(ExportFormat::Json).unwrap();
        assert_eq!(payload.file_name, "run.json");
    }
}
