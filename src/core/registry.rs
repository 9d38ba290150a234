// YearScope - core/registry.rs
//
// Registry of known model identifiers and where their result files live.
// The filter, aggregation and comparison engines never consult it; only
// the load boundary and the action layer do, so adding a model is a
// configuration change.

use crate::util::constants;
use serde::{Deserialize, Serialize};

/// One registered model result source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSource {
    /// Identifier as it appears in `model_name` (e.g. "gemma3:4b").
    pub id: String,

    /// Human-readable name for legends and cards.
    pub label: String,

    /// Where the loading collaborator fetches the JSON document.
    pub url: String,
}

/// Ordered set of model sources, unique by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    sources: Vec<ModelSource>,
}

impl ModelRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// The three models of the reference deployment.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (id, label, url) in constants::BUILTIN_MODELS {
            registry.register(ModelSource {
                id: (*id).to_string(),
                label: (*label).to_string(),
                url: (*url).to_string(),
            });
        }
        registry
    }

    /// Add a source, replacing any existing source with the same id.
    ///
    /// Returns false (and registers nothing) when the registry is full.
    pub fn register(&mut self, source: ModelSource) -> bool {
        if let Some(pos) = self.sources.iter().position(|s| s.id == source.id) {
            tracing::info!(model = %source.id, "Model source overridden");
            self.sources[pos] = source;
            return true;
        }
        if self.sources.len() >= constants::MAX_REGISTERED_MODELS {
            tracing::warn!(
                model = %source.id,
                max = constants::MAX_REGISTERED_MODELS,
                "Model registry full; source ignored"
            );
            return false;
        }
        tracing::debug!(model = %source.id, url = %source.url, "Model source registered");
        self.sources.push(source);
        true
    }

    pub fn get(&self, id: &str) -> Option<&ModelSource> {
        self.sources.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Display label for a model, falling back to the id itself.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map_or(id, |s| s.label.as_str())
    }

    pub fn sources(&self) -> &[ModelSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
