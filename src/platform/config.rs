// YearScope - platform/config.rs
//
// Configuration directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for YearScope configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/yearscope/ or %APPDATA%\YearScope\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }

    /// Full path of `config.toml`.
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(constants::CONFIG_FILE_NAME)
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so an older build can read a newer
/// config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[dashboard]` section.
    pub dashboard: DashboardSection,
    /// `[[models]]` entries.
    pub models: Vec<ModelEntry>,
    /// `[filters]` section.
    pub filters: FiltersSection,
    /// `[export]` section.
    pub export: ExportSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[dashboard]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct DashboardSection {
    /// Model selected at startup.
    pub default_model: Option<String>,
    /// Models pre-selected for comparison mode.
    pub comparison_models: Option<Vec<String>>,
}

/// One `[[models]]` entry: adds a model source or overrides a built-in one.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct ModelEntry {
    pub id: String,
    /// Display label; the id is used when absent.
    pub label: Option<String>,
    pub url: String,
}

/// `[filters]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct FiltersSection {
    /// TOML catalog replacing the built-in filter groups.
    pub catalog_file: Option<String>,
}

/// `[export]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ExportSection {
    /// Download file name without extension.
    pub file_stem: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    // -- Dashboard --
    pub default_model: String,
    pub comparison_models: Vec<String>,

    // -- Models --
    /// Validated `[[models]]` entries, in file order.
    pub models: Vec<ModelEntry>,

    // -- Filters --
    /// Replacement catalog file, resolved against the config directory.
    pub catalog_file: Option<PathBuf>,

    // -- Export --
    pub export_file_stem: String,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    /// Log file path.
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_model: constants::DEFAULT_MODEL_ID.to_string(),
            comparison_models: constants::DEFAULT_COMPARISON_MODELS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            models: Vec::new(),
            catalog_file: None,
            export_file_stem: constants::DEFAULT_EXPORT_FILE_STEM.to_string(),
            log_level: None,
            log_file: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults and a warning, so the host still
/// starts but the user is told.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<String>) {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!(path = %config_path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&config_path) {
        Ok(c) => c,
        Err(e) => {
            let err = ConfigError::Io {
                path: config_path.clone(),
                source: e,
            };
            let msg = format!("{err}. Using defaults.");
            tracing::warn!("{}", msg);
            return (AppConfig::default(), vec![msg]);
        }
    };

    match load_config_str(&content, &config_path) {
        Ok((config, warnings)) => {
            tracing::info!(path = %config_path.display(), "Loaded config.toml");
            (config, warnings)
        }
        Err(err) => {
            let msg = format!(
                "{err}. Using defaults. See config.example.toml for the expected format."
            );
            tracing::warn!("{}", msg);
            (AppConfig::default(), vec![msg])
        }
    }
}

/// Parse and validate config text.
///
/// `config_path` locates relative `catalog_file` paths and names the file
/// in errors. A parse failure is an error; every out-of-range value is a
/// warning and keeps its default.
pub fn load_config_str(
    content: &str,
    config_path: &Path,
) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let raw: RawConfig = toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: config_path.to_path_buf(),
        source: e,
    })?;

    let mut config = AppConfig::default();
    let mut warnings: Vec<String> = Vec::new();
    let mut reject = |field: &str, value: &str, expected: &str| {
        let err = ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        };
        warnings.push(format!("{err}. Using default."));
    };

    // -- Dashboard: default_model --
    if let Some(model) = raw.dashboard.default_model {
        let model = model.trim();
        if model.is_empty() {
            reject("dashboard.default_model", model, "a model id");
        } else {
            config.default_model = model.to_string();
        }
    }

    // -- Dashboard: comparison_models --
    if let Some(models) = raw.dashboard.comparison_models {
        let mut ids: Vec<String> = Vec::new();
        for id in models.iter().map(|m| m.trim()) {
            if id.is_empty() {
                reject("dashboard.comparison_models", id, "non-empty model ids");
            } else if !ids.iter().any(|existing| existing == id) {
                ids.push(id.to_string());
            }
        }
        config.comparison_models = ids;
    }

    // -- Models --
    for entry in raw.models {
        let id = entry.id.trim().to_string();
        let url = entry.url.trim().to_string();
        if id.is_empty() || url.is_empty() {
            reject(
                "models",
                &format!("id = \"{id}\", url = \"{url}\""),
                "both id and url",
            );
            continue;
        }
        if config.models.len() >= constants::MAX_REGISTERED_MODELS {
            reject(
                "models",
                &id,
                &format!("at most {} entries", constants::MAX_REGISTERED_MODELS),
            );
            continue;
        }
        let label = entry
            .label
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        config.models.push(ModelEntry { id, label, url });
    }

    // -- Filters: catalog_file --
    if let Some(file) = raw.filters.catalog_file {
        if !file.trim().is_empty() {
            let path = PathBuf::from(file.trim());
            config.catalog_file = Some(if path.is_relative() {
                config_path.parent().unwrap_or(Path::new(".")).join(path)
            } else {
                path
            });
        }
    }

    // -- Export: file_stem --
    if let Some(stem) = raw.export.file_stem {
        if is_valid_file_stem(&stem) {
            config.export_file_stem = stem;
        } else {
            reject(
                "export.file_stem",
                &stem,
                &format!(
                    "1-{} characters without path separators",
                    constants::MAX_EXPORT_FILE_STEM_LEN
                ),
            );
        }
    }

    // -- Logging: level --
    if let Some(level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level);
        } else {
            reject("logging.level", &level, "error, warn, info, debug, trace");
        }
    }

    // -- Logging: file --
    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "Config validation produced warnings");
    }

    Ok((config, warnings))
}

fn is_valid_file_stem(stem: &str) -> bool {
    const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];
    !stem.trim().is_empty()
        && stem.len() <= constants::MAX_EXPORT_FILE_STEM_LEN
        && !stem.contains(FORBIDDEN)
        && !stem.chars().any(char::is_control)
}
