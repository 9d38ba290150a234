// YearScope - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "YearScope";

/// Application identifier used for config directories.
pub const APP_ID: &str = "YearScope";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Model registry
// =============================================================================

/// Built-in model sources as `(id, label, url)`.
///
/// These are the three result sets published alongside the reference
/// deployment. Additional models are registered through `[[models]]` in
/// config.toml.
pub const BUILTIN_MODELS: &[(&str, &str, &str)] = &[
    (
        "gemma3:1b",
        "Gemma 1B",
        "https://raw.githubusercontent.com/sergeicu/hierarchical_reasoning_model_vs_wikipedia/main/demo_gemma/output/results_gemma3_1b.json",
    ),
    (
        "gemma3:4b",
        "Gemma 4B",
        "https://raw.githubusercontent.com/sergeicu/hierarchical_reasoning_model_vs_wikipedia/main/demo_gemma/output/results_gemma3_4b.json",
    ),
    (
        "gemma3:27b",
        "Gemma 27B",
        "https://raw.githubusercontent.com/sergeicu/hierarchical_reasoning_model_vs_wikipedia/main/demo_gemma/output/results_gemma3_27b.json",
    ),
];

/// Model selected when the dashboard first opens.
pub const DEFAULT_MODEL_ID: &str = "gemma3:1b";

/// Models pre-selected for comparison mode.
pub const DEFAULT_COMPARISON_MODELS: &[&str] = &["gemma3:1b", "gemma3:4b"];

/// Maximum number of models the registry will hold (built-in + configured).
pub const MAX_REGISTERED_MODELS: usize = 32;

// =============================================================================
// Dataset limits
// =============================================================================

/// Maximum size of a single dataset JSON file read from disk.
pub const MAX_DATASET_FILE_SIZE: u64 = 64 * 1024 * 1024; // 64 MB

/// Hard upper bound on records accepted from one dataset document.
/// Reference datasets hold low thousands of records.
pub const MAX_RECORDS_PER_DATASET: usize = 250_000;

/// Maximum number of per-record warnings kept for one dataset load.
/// Further malformed records are still skipped and counted.
pub const MAX_LOAD_WARNINGS: usize = 100;

/// Maximum size of a user filter catalog TOML file.
pub const MAX_CATALOG_FILE_SIZE: u64 = 64 * 1024; // 64 KB

// =============================================================================
// Aggregation
// =============================================================================

/// Edges of the confidence histogram. Five buckets; every bucket is
/// half-open except the last, which is closed so 1.0 is counted.
pub const CONFIDENCE_BUCKET_EDGES: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Number of confidence buckets.
pub const CONFIDENCE_BUCKET_COUNT: usize = CONFIDENCE_BUCKET_EDGES.len() - 1;

/// Accuracy above which the headline trend reads "up".
pub const TREND_UP_THRESHOLD: f64 = 0.7;

/// Accuracy above which the headline trend reads "neutral".
pub const TREND_NEUTRAL_THRESHOLD: f64 = 0.5;

/// Region accuracy at or above which the map shows the "high" band.
pub const MAP_HIGH_ACCURACY: f64 = 0.8;

/// Region accuracy at or above which the map shows the "medium" band.
pub const MAP_MEDIUM_ACCURACY: f64 = 0.5;

// =============================================================================
// Decades
// =============================================================================

/// First decade in the dataset's decade enumeration.
pub const FIRST_DECADE: u16 = 1500;

/// Last decade in the dataset's decade enumeration.
pub const LAST_DECADE: u16 = 2020;

// =============================================================================
// Export
// =============================================================================

/// Default file stem for exported results (`<stem>.csv`, `<stem>.json`).
pub const DEFAULT_EXPORT_FILE_STEM: &str = "gemma-analysis";

/// Maximum length of a configured export file stem.
pub const MAX_EXPORT_FILE_STEM_LEN: usize = 128;

/// Maximum number of records that can be exported in a single operation.
pub const MAX_EXPORT_RECORDS: usize = 1_000_000;

/// MIME type handed to the download collaborator for CSV exports.
pub const CSV_MIME_TYPE: &str = "text/csv";

/// MIME type handed to the download collaborator for JSON exports.
pub const JSON_MIME_TYPE: &str = "application/json";

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
