// YearScope - tests/e2e_pipeline.rs
//
// End-to-end tests for the dashboard pipeline.
//
// These tests load real dataset files from tests/fixtures/, drive the
// dashboard through named actions, and check the derived view, the
// comparison and the exports. Nothing is mocked: decoding, filtering,
// aggregation and encoding all run as a host would run them.

use std::path::PathBuf;
use yearscope::app::dashboard::Dashboard;
use yearscope::app::state::{Action, DashboardState};
use yearscope::core::catalog::FilterCatalog;
use yearscope::core::export::ExportFormat;
use yearscope::core::insights::{AccuracyBand, AccuracyTrend};
use yearscope::core::model::{Continent, EvaluationRecord, PrimaryCategory};
use yearscope::core::registry::ModelRegistry;
use yearscope::platform::config::load_config;

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_text(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).unwrap()
}

/// A dashboard with both fixture datasets delivered through the host
/// entry points.
fn loaded_dashboard() -> Dashboard {
    let mut dash = Dashboard::new(
        FilterCatalog::builtin().unwrap(),
        ModelRegistry::builtin(),
        DashboardState::default(),
    );
    for pending in dash.pending_loads() {
        dash.mark_loading(&pending.model_id).unwrap();
    }
    dash.on_dataset_loaded("gemma3:1b", &fixture_text("results_gemma3_1b.json"))
        .unwrap();
    dash.load_dataset_file("gemma3:4b", &fixture("results_gemma3_4b.json"))
        .unwrap();
    dash
}

fn filter(dash: &mut Dashboard, group: &str, values: &[&str]) {
    dash.dispatch(Action::ApplyFilter {
        group: group.to_string(),
        values: values.iter().map(|v| v.to_string()).collect(),
    })
    .unwrap();
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn e2e_loads_fixture_datasets() {
    let dash = loaded_dashboard();
    assert_eq!(dash.store().records("gemma3:1b").len(), 6);
    assert_eq!(dash.store().records("gemma3:4b").len(), 6);
    assert!(dash.pending_loads().is_empty());
}

#[test]
fn e2e_malformed_records_are_skipped_and_reported() {
    let dash = loaded_dashboard();
    match dash.store().state("gemma3:4b") {
        yearscope::core::store::LoadState::Loaded {
            skipped, warnings, ..
        } => {
            assert_eq!(*skipped, 2);
            assert_eq!(warnings.len(), 2);
            assert!(warnings.iter().any(|w| w.contains("confidence_score")));
            assert!(warnings.iter().any(|w| w.contains("historical_period")));
        }
        other => panic!("expected loaded state, got {other:?}"),
    }
}

// =============================================================================
// Aggregation through the view
// =============================================================================

#[test]
fn e2e_unfiltered_view_statistics() {
    let dash = loaded_dashboard();
    let agg = &dash.view().aggregate;

    assert_eq!(agg.overall.total_events, 6);
    assert_eq!(agg.overall.correct_events, 3);
    assert!((agg.overall.accuracy - 0.5).abs() < 1e-9);
    assert!((agg.overall.avg_confidence - 3.35 / 6.0).abs() < 1e-9);

    let counts: Vec<usize> = agg.by_confidence_bucket.iter().map(|b| b.count).collect();
    assert_eq!(counts, vec![1, 1, 1, 1, 2]);
    let pct: f64 = agg.by_confidence_bucket.iter().map(|b| b.percentage).sum();
    assert!((pct - 100.0).abs() < 1e-9);

    let first_category = &agg.by_category[0];
    assert_eq!(first_category.category, PrimaryCategory::MilitaryWarfare);
    assert_eq!(first_category.count, 2);
    assert_eq!(agg.by_region.len(), 5);

    let insights = &dash.view().insights;
    assert_eq!(insights.trend, AccuracyTrend::Down);
    let europe = insights
        .region_bands
        .iter()
        .find(|b| b.region == Continent::Europe)
        .unwrap();
    assert_eq!(europe.band, AccuracyBand::High);
}

#[test]
fn e2e_or_within_group_and_across_groups() {
    let mut dash = loaded_dashboard();

    filter(&mut dash, "geographic", &["developed"]);
    assert_eq!(dash.view().filtered, vec![0, 2, 3, 5]);
    assert!((dash.view().aggregate.overall.accuracy - 0.75).abs() < 1e-9);

    filter(&mut dash, "temporal", &["Contemporary"]);
    assert_eq!(dash.view().filtered, vec![3, 5]);

    dash.dispatch(Action::ResetFilters { group: None }).unwrap();
    filter(&mut dash, "geographic", &["Asia"]);
    filter(&mut dash, "event_characteristics", &["Military & Warfare"]);
    assert_eq!(dash.view().filtered, vec![1]);

    dash.dispatch(Action::ResetFilters { group: None }).unwrap();
    filter(&mut dash, "societal_context", &["colonial"]);
    assert_eq!(dash.view().filtered, vec![4]);
}

#[test]
fn e2e_switching_model_keeps_filters() {
    let mut dash = loaded_dashboard();
    filter(&mut dash, "geographic", &["developed"]);
    dash.dispatch(Action::SelectModel("gemma3:4b".to_string()))
        .unwrap();
    assert_eq!(dash.view().model_id, "gemma3:4b");
    assert_eq!(dash.view().filtered.len(), 4);
    assert!((dash.view().aggregate.overall.accuracy - 1.0).abs() < 1e-9);
}

// =============================================================================
// Comparison
// =============================================================================

#[test]
fn e2e_comparison_under_shared_filters() {
    let mut dash = loaded_dashboard();
    dash.dispatch(Action::SetComparisonModels(vec![
        "gemma3:1b".to_string(),
        "gemma3:4b".to_string(),
        "gemma3:27b".to_string(),
    ]))
    .unwrap();
    dash.dispatch(Action::ToggleComparisonMode).unwrap();

    let pending = dash.pending_loads();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].model_id, "gemma3:27b");

    let comparison = dash.view().comparison.clone().unwrap();
    assert_eq!(comparison.models.len(), 3);
    assert_eq!(comparison.best_accuracy.as_deref(), Some("gemma3:4b"));
    assert_eq!(comparison.most_confident.as_deref(), Some("gemma3:4b"));

    let big = comparison.model("gemma3:27b").unwrap();
    assert!(!big.available);
    assert_eq!(big.aggregate.overall.total_events, 0);

    filter(&mut dash, "event_characteristics", &["Military & Warfare"]);
    let comparison = dash.view().comparison.clone().unwrap();
    assert_eq!(comparison.models[0].aggregate.overall.total_events, 2);
    assert_eq!(comparison.models[1].aggregate.overall.total_events, 2);
    assert_eq!(comparison.category_matrix.len(), 1);
    assert_eq!(comparison.category_matrix[0].accuracies, vec![0.5, 1.0, 0.0]);
}

#[test]
fn e2e_failed_comparison_load_leaves_others_intact() {
    let mut dash = loaded_dashboard();
    dash.dispatch(Action::SetComparisonModels(vec![
        "gemma3:1b".to_string(),
        "gemma3:27b".to_string(),
    ]))
    .unwrap();
    dash.dispatch(Action::ToggleComparisonMode).unwrap();
    dash.mark_loading("gemma3:27b").unwrap();
    dash.on_dataset_failed("gemma3:27b", "503 Service Unavailable");

    assert!(dash.store().state("gemma3:27b").error().is_some());
    assert_eq!(dash.store().records("gemma3:1b").len(), 6);
    let comparison = dash.view().comparison.as_ref().unwrap();
    assert_eq!(comparison.best_accuracy.as_deref(), Some("gemma3:1b"));
    assert_eq!(dash.pending_loads().len(), 1, "failed loads are offered again");
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_csv_export_of_filtered_view() {
    let mut dash = loaded_dashboard();
    filter(&mut dash, "geographic", &["developed"]);
    let payload = dash.export(ExportFormat::Csv).unwrap();

    assert_eq!(payload.file_name, "gemma-analysis.csv");
    assert_eq!(payload.mime_type, "text/csv");

    let mut reader = csv::Reader::from_reader(payload.content.as_bytes());
    let headers: Vec<String> = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    assert_eq!(
        headers,
        vec![
            "Model",
            "Event Text",
            "Ground Truth Year",
            "Model Response",
            "Is Correct",
            "Confidence",
            "Category",
            "Region"
        ]
    );
    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[3][1], r#"The "Black Saturday" bushfires sweep Victoria"#);
    assert_eq!(&rows[3][4], "false");
    assert_eq!(&rows[3][7], "Oceania");
}

#[test]
fn e2e_json_export_round_trips() {
    let mut dash = loaded_dashboard();
    filter(&mut dash, "temporal", &["Contemporary"]);
    let payload = dash.export(ExportFormat::Json).unwrap();
    assert_eq!(payload.file_name, "gemma-analysis.json");
    assert_eq!(payload.mime_type, "application/json");

    let back: Vec<EvaluationRecord> = serde_json::from_str(&payload.content).unwrap();
    let expected: Vec<EvaluationRecord> = dash.filtered_records().into_iter().cloned().collect();
    assert_eq!(back, expected);
    assert_eq!(back.len(), 2);
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn e2e_dashboard_from_config_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("groups.toml"),
        r#"
        [[group]]
        id = "region"
        title = "Region"

        [[group.filter]]
        attribute = "continental"
        options = []
        "#,
    )
    .unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        format!(
            r#"
            [dashboard]
            default_model = "local"

            [[models]]
            id = "local"
            label = "Local run"
            url = "{}"

            [filters]
            catalog_file = "groups.toml"

            [export]
            file_stem = "local-eval"
            "#,
            fixture("results_gemma3_1b.json").display().to_string().replace('\\', "/")
        ),
    )
    .unwrap();

    let (config, warnings) = load_config(dir.path());
    assert!(warnings.is_empty(), "{warnings:?}");
    let (mut dash, warnings) = Dashboard::from_config(&config).unwrap();
    assert!(warnings.is_empty(), "{warnings:?}");
    assert_eq!(dash.catalog().groups().len(), 1);
    assert_eq!(dash.registry().label("local"), "Local run");

    let pending = dash.pending_loads();
    assert_eq!(pending[0].model_id, "local");
    let path = PathBuf::from(&pending[0].url);
    dash.load_dataset_file("local", &path).unwrap();

    filter(&mut dash, "region", &["Asia"]);
    assert_eq!(dash.view().filtered, vec![1, 2]);
    assert_eq!(
        dash.export(ExportFormat::Csv).unwrap().file_name,
        "local-eval.csv"
    );
}
