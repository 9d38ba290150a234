// YearScope - core/compare.rs
//
// Cross-model comparison: the shared filter selection is applied to each
// requested model's dataset independently and the results are aggregated
// side by side.

use crate::core::aggregate::{aggregate, AggregateResult};
use crate::core::catalog::FilterCatalog;
use crate::core::filter::{filter_records, FilterSelection};
use crate::core::insights::argmax_by;
use crate::core::model::PrimaryCategory;
use crate::core::store::DatasetStore;
use serde::Serialize;

/// One model's column in the comparison.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelComparison {
    pub model_id: String,
    /// False when the model has no loaded dataset; the aggregate is then
    /// the zero state.
    pub available: bool,
    pub aggregate: AggregateResult,
}

/// Per-category accuracy across models.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryComparisonRow {
    pub category: PrimaryCategory,
    /// One accuracy per compared model, in `ComparisonResult::models` order.
    pub accuracies: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub models: Vec<ModelComparison>,
    /// Model with the highest accuracy.
    pub best_accuracy: Option<String>,
    /// Model with the highest mean confidence.
    pub most_confident: Option<String>,
    pub category_matrix: Vec<CategoryComparisonRow>,
}

impl ComparisonResult {
    pub fn model(&self, model_id: &str) -> Option<&ModelComparison> {
        self.models.iter().find(|m| m.model_id == model_id)
    }
}

/// Compare models under a shared filter selection.
///
/// Duplicate ids are collapsed (first occurrence wins). Models without a
/// loaded dataset contribute a zero aggregate rather than an error.
pub fn compare<S: AsRef<str>>(
    model_ids: &[S],
    store: &DatasetStore,
    selection: &FilterSelection,
    catalog: &FilterCatalog,
) -> ComparisonResult {
    let mut models: Vec<ModelComparison> = Vec::with_capacity(model_ids.len());

    for id in model_ids {
        let id = id.as_ref();
        if models.iter().any(|m| m.model_id == id) {
            continue;
        }
        let available = store.is_loaded(id);
        let filtered = filter_records(store.records(id), selection, catalog);
        models.push(ModelComparison {
            model_id: id.to_string(),
            available,
            aggregate: aggregate(filtered),
        });
    }

    let best_accuracy = argmax_by(&models, |m| m.aggregate.overall.accuracy)
        .map(|m| m.model_id.clone());
    let most_confident = argmax_by(&models, |m| m.aggregate.overall.avg_confidence)
        .map(|m| m.model_id.clone());
    let category_matrix = category_matrix(&models);

    tracing::debug!(
        models = models.len(),
        best = best_accuracy.as_deref().unwrap_or("-"),
        "Comparison computed"
    );

    ComparisonResult {
        models,
        best_accuracy,
        most_confident,
        category_matrix,
    }
}

/// Union of categories across models, first-encountered in request order.
fn category_matrix(models: &[ModelComparison]) -> Vec<CategoryComparisonRow> {
    let mut categories: Vec<PrimaryCategory> = Vec::new();
    for model in models {
        for stats in &model.aggregate.by_category {
            if !categories.contains(&stats.category) {
                categories.push(stats.category);
            }
        }
    }

    categories
        .into_iter()
        .map(|category| CategoryComparisonRow {
            category,
            accuracies: models
                .iter()
                .map(|m| {
                    m.aggregate
                        .by_category
                        .iter()
                        .find(|c| c.category == category)
                        .map_or(0.0, |c| c.accuracy)
                })
                .collect(),
        })
        .collect()
}
