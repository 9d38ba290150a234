// YearScope - app/loader.rs
//
// Loads the pieces a dashboard is built from: dataset files for offline
// hosts and tests, the filter catalog (built-in or user-supplied), and the
// model registry merged with `[[models]]` config entries.
// A bad user catalog is reported and the built-in one is used instead.

use crate::core::catalog::{self, FilterCatalog};
use crate::core::dataset::{decode_dataset, DecodedDataset};
use crate::core::registry::{ModelRegistry, ModelSource};
use crate::platform::config::ModelEntry;
use crate::platform::fs::{read_to_string_limited, LimitedReadError};
use crate::util::constants;
use crate::util::error::{CatalogError, DatasetError};
use std::path::Path;

/// Read and decode one model's dataset from a JSON file.
pub fn load_dataset_file(path: &Path, model_id: &str) -> Result<DecodedDataset, DatasetError> {
    let content =
        read_to_string_limited(path, constants::MAX_DATASET_FILE_SIZE).map_err(|e| match e {
            LimitedReadError::TooLarge { size, max_size } => DatasetError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max_size,
            },
            LimitedReadError::Io(source) => DatasetError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    tracing::info!(model = model_id, path = %path.display(), "Loading dataset file");
    decode_dataset(model_id, &content)
}

/// Read, parse and validate a catalog file.
pub fn load_catalog_file(path: &Path) -> Result<FilterCatalog, CatalogError> {
    let content =
        read_to_string_limited(path, constants::MAX_CATALOG_FILE_SIZE).map_err(|e| match e {
            LimitedReadError::TooLarge { size, max_size } => CatalogError::FileTooLarge {
                path: path.to_path_buf(),
                size,
                max_size,
            },
            LimitedReadError::Io(source) => CatalogError::Io {
                path: path.to_path_buf(),
                source,
            },
        })?;

    let source_name = path.display().to_string();
    let def = catalog::parse_catalog_toml(&content, &source_name)?;
    catalog::validate_and_build(def, &source_name)
}

/// Resolve the catalog: the user file when given and valid, else built-in.
///
/// Returns the catalog and any non-fatal errors from the user file. Only a
/// broken built-in catalog is fatal.
pub fn resolve_catalog(
    user_catalog: Option<&Path>,
) -> Result<(FilterCatalog, Vec<CatalogError>), CatalogError> {
    let mut errors = Vec::new();

    if let Some(path) = user_catalog {
        match load_catalog_file(path) {
            Ok(user) => {
                tracing::info!(
                    path = %path.display(),
                    groups = user.groups().len(),
                    "User filter catalog loaded"
                );
                return Ok((user, errors));
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "User filter catalog rejected; using built-in"
                );
                errors.push(e);
            }
        }
    }

    let builtin = FilterCatalog::builtin()?;
    tracing::info!(groups = builtin.groups().len(), "Loaded built-in filter catalog");
    Ok((builtin, errors))
}

/// Built-in registry with config entries added or overriding by id.
///
/// Returns the registry and a warning for each entry that did not fit.
pub fn build_registry(entries: &[ModelEntry]) -> (ModelRegistry, Vec<String>) {
    let mut registry = ModelRegistry::builtin();
    let mut warnings = Vec::new();

    for entry in entries {
        let source = ModelSource {
            id: entry.id.clone(),
            label: entry.label.clone().unwrap_or_else(|| entry.id.clone()),
            url: entry.url.clone(),
        };
        if !registry.register(source) {
            warnings.push(format!(
                "Model '{}' not registered: registry holds at most {} models",
                entry.id,
                constants::MAX_REGISTERED_MODELS
            ));
        }
    }

    tracing::info!(total = registry.len(), "Model registry ready");
    (registry, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const DATASET: &str = r#"[
      {
        "model_name": "gemma3:4b",
        "event": {
          "text": "Apollo 11 lands on the Moon",
          "year": 1969,
          "date": "1969-07-20",
          "primary_category": "Science & Technology",
          "violence_level": "peaceful",
          "scale": "global",
          "human_impact": "mass population",
          "continental": "North America",
          "cultural_region": "Western",
          "development_status": "developed",
          "colonial_status": "independent",
          "century": "1900-1999",
          "decade": "1960s",
          "seasonal": "Summer",
          "historical_period": "Contemporary"
        },
        "question": "In what year did this happen?",
        "model_response": "1969",
        "extracted_year": 1969,
        "is_correct": true,
        "confidence_score": 0.95
      }
    ]"#;

    fn temp_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_dataset_file() {
        let file = temp_file(DATASET);
        let decoded = load_dataset_file(file.path(), "gemma3:4b").unwrap();
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].event.year, 1969);
    }

    #[test]
    fn test_missing_dataset_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_dataset_file(&dir.path().join("none.json"), "gemma3:4b");
        assert!(matches!(result, Err(DatasetError::Io { .. })));
    }

    #[test]
    fn test_user_catalog_replaces_builtin() {
        let file = temp_file(
            r#"
            [[group]]
            id = "era"
            title = "Era"
            description = "Historical period only"

            [[group.filter]]
            attribute = "historical_period"
            options = ["Ancient", "Modern"]
            "#,
        );
        let (catalog, errors) = resolve_catalog(Some(file.path())).unwrap();
        assert!(errors.is_empty());
        assert_eq!(catalog.groups().len(), 1);
        assert!(catalog.group("era").unwrap().offers("Modern"));
    }

    #[test]
    fn test_invalid_user_catalog_falls_back() {
        let file = temp_file(
            r#"
            [[group]]
            id = "bad"
            title = "Bad"

            [[group.filter]]
            attribute = "favourite_colour"
            options = []
            "#,
        );
        let (catalog, errors) = resolve_catalog(Some(file.path())).unwrap();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], CatalogError::UnknownAttribute { .. }));
        assert!(catalog.group("geographic").is_some());
    }

    #[test]
    fn test_oversized_catalog_is_rejected() {
        let file = temp_file(&"#".repeat(constants::MAX_CATALOG_FILE_SIZE as usize + 1));
        let result = load_catalog_file(file.path());
        assert!(matches!(result, Err(CatalogError::FileTooLarge { .. })));
    }

    #[test]
    fn test_build_registry_merges_entries() {
        let entries = vec![
            ModelEntry {
                id: "llama3:8b".to_string(),
                label: None,
                url: "file:///data/llama.json".to_string(),
            },
            ModelEntry {
                id: "gemma3:1b".to_string(),
                label: Some("Tiny".to_string()),
                url: "file:///data/1b.json".to_string(),
            },
        ];
        let (registry, warnings) = build_registry(&entries);
        assert!(warnings.is_empty());
        assert_eq!(registry.len(), 4);
        assert_eq!(registry.label("llama3:8b"), "llama3:8b");
        assert_eq!(registry.label("gemma3:1b"), "Tiny");
    }
}
