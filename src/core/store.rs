// YearScope - core/store.rs
//
// Per-model dataset store. Holds each model's raw records together with its
// load state. Populated only through the explicit `insert_loaded`,
// `mark_loading` and `mark_failed` entry points; every mutation touches a
// single model's slot. Loaded records are only ever replaced by a newer
// dataset or dropped by `evict`.

use crate::core::dataset::DecodedDataset;
use crate::core::model::EvaluationRecord;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Load state of one model's dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    NotLoaded,
    Loading {
        since: DateTime<Utc>,
    },
    Loaded {
        records: Vec<EvaluationRecord>,
        loaded_at: DateTime<Utc>,
        /// Malformed records dropped during decoding.
        skipped: usize,
        warnings: Vec<String>,
    },
    Failed {
        error: String,
        at: DateTime<Utc>,
    },
}

impl LoadState {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    /// The error message of a failed load.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// Short label for status lines.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotLoaded => "not loaded",
            Self::Loading { .. } => "loading",
            Self::Loaded { .. } => "loaded",
            Self::Failed { .. } => "failed",
        }
    }
}

static NOT_LOADED: LoadState = LoadState::NotLoaded;

/// Raw datasets keyed by model id.
#[derive(Debug, Clone, Default)]
pub struct DatasetStore {
    slots: BTreeMap<String, LoadState>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load state for a model; `NotLoaded` if the store has never seen it.
    pub fn state(&self, model_id: &str) -> &LoadState {
        self.slots.get(model_id).unwrap_or(&NOT_LOADED)
    }

    /// Records for a model. Empty unless the model is loaded.
    pub fn records(&self, model_id: &str) -> &[EvaluationRecord] {
        match self.slots.get(model_id) {
            Some(LoadState::Loaded { records, .. }) => records,
            _ => &[],
        }
    }

    pub fn is_loaded(&self, model_id: &str) -> bool {
        self.state(model_id).is_loaded()
    }

    /// True when the model needs fetching: never requested, or failed.
    ///
    /// A failed model is retried when it is selected again.
    pub fn needs_load(&self, model_id: &str) -> bool {
        matches!(
            self.state(model_id),
            LoadState::NotLoaded | LoadState::Failed { .. }
        )
    }

    /// Record that a fetch started.
    ///
    /// A loaded slot stays loaded while it is refreshed, so its records
    /// remain readable until a new dataset replaces them.
    pub fn mark_loading(&mut self, model_id: &str) {
        if self.is_loaded(model_id) {
            tracing::debug!(model = model_id, "Dataset refresh started");
            return;
        }
        tracing::debug!(model = model_id, "Dataset load started");
        self.slots.insert(
            model_id.to_string(),
            LoadState::Loading { since: Utc::now() },
        );
    }

    /// Store a decoded dataset, replacing whatever the slot held before.
    pub fn insert_loaded(&mut self, model_id: &str, dataset: DecodedDataset) {
        tracing::info!(
            model = model_id,
            records = dataset.records.len(),
            skipped = dataset.skipped,
            "Dataset stored"
        );
        self.slots.insert(
            model_id.to_string(),
            LoadState::Loaded {
                records: dataset.records,
                loaded_at: Utc::now(),
                skipped: dataset.skipped,
                warnings: dataset.warnings,
            },
        );
    }

    /// Record a failed load. Other models' slots are untouched.
    ///
    /// A model that already has a loaded dataset keeps it: a failed refresh
    /// does not throw away good data.
    pub fn mark_failed(&mut self, model_id: &str, error: impl Into<String>) {
        let error = error.into();
        if self.is_loaded(model_id) {
            tracing::warn!(model = model_id, error = %error, "Dataset refresh failed; keeping previous records");
            return;
        }
        tracing::warn!(model = model_id, error = %error, "Dataset load failed");
        self.slots.insert(
            model_id.to_string(),
            LoadState::Failed {
                error,
                at: Utc::now(),
            },
        );
    }

    /// Drop a model's dataset and return its slot to `NotLoaded`.
    pub fn evict(&mut self, model_id: &str) {
        self.slots.remove(model_id);
    }

    /// Iterate `(model_id, state)` for every model the store has seen.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LoadState)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), v))
    }
}
