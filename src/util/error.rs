// YearScope - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation; every error keeps its cause
// available through `source()` for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all YearScope operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum YearScopeError {
    /// Filter catalog loading or validation failed.
    Catalog(CatalogError),

    /// Dataset loading or decoding failed.
    Dataset(DatasetError),

    /// Filter action was rejected.
    Filter(FilterError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for YearScopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Catalog(e) => write!(f, "Filter catalog error: {e}"),
            Self::Dataset(e) => write!(f, "Dataset error: {e}"),
            Self::Filter(e) => write!(f, "Filter error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for YearScopeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Catalog(e) => Some(e),
            Self::Dataset(e) => Some(e),
            Self::Filter(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog errors
// ---------------------------------------------------------------------------

/// Errors related to loading and validating the filter-group catalog.
#[derive(Debug)]
pub enum CatalogError {
    /// TOML could not be parsed.
    TomlParse {
        source_name: String,
        source: toml::de::Error,
    },

    /// Catalog file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// A group is missing a required field.
    MissingField {
        group_id: String,
        field: &'static str,
    },

    /// A group references an attribute name the data model does not have.
    UnknownAttribute { group_id: String, attribute: String },

    /// A group offers an option value outside the attribute's enumeration.
    InvalidOption {
        group_id: String,
        attribute: String,
        value: String,
    },

    /// Two groups share the same identifier.
    DuplicateGroup { group_id: String },

    /// The catalog defines no groups at all.
    Empty { source_name: String },

    /// I/O error reading a catalog file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse {
                source_name,
                source,
            } => write!(f, "Failed to parse catalog '{source_name}': {source}"),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Catalog '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::MissingField { group_id, field } => {
                write!(f, "Group '{group_id}': missing required field '{field}'")
            }
            Self::UnknownAttribute {
                group_id,
                attribute,
            } => write!(
                f,
                "Group '{group_id}': '{attribute}' is not a known event attribute"
            ),
            Self::InvalidOption {
                group_id,
                attribute,
                value,
            } => write!(
                f,
                "Group '{group_id}': '{value}' is not a valid value for '{attribute}'"
            ),
            Self::DuplicateGroup { group_id } => {
                write!(f, "Duplicate filter group id '{group_id}'")
            }
            Self::Empty { source_name } => {
                write!(f, "Catalog '{source_name}' defines no filter groups")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading catalog '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CatalogError> for YearScopeError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

// ---------------------------------------------------------------------------
// Dataset errors
// ---------------------------------------------------------------------------

/// Errors related to loading a model's evaluation dataset.
#[derive(Debug)]
pub enum DatasetError {
    /// The model identifier is not registered.
    UnsupportedModel { model_id: String },

    /// The document is not a JSON array of objects.
    Json {
        model_id: String,
        source: serde_json::Error,
    },

    /// The document holds more records than the configured limit.
    TooManyRecords {
        model_id: String,
        count: usize,
        max: usize,
    },

    /// Dataset file exceeds the maximum allowed size.
    FileTooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// The loading collaborator reported a failure (network, HTTP status).
    LoadFailed { model_id: String, reason: String },

    /// I/O error reading a dataset file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for DatasetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedModel { model_id } => {
                write!(f, "Model '{model_id}' is not supported")
            }
            Self::Json { model_id, source } => {
                write!(f, "Dataset for '{model_id}' is not valid JSON: {source}")
            }
            Self::TooManyRecords {
                model_id,
                count,
                max,
            } => write!(
                f,
                "Dataset for '{model_id}' has {count} records, exceeds maximum of {max}"
            ),
            Self::FileTooLarge {
                path,
                size,
                max_size,
            } => write!(
                f,
                "Dataset '{}' is {size} bytes, exceeds maximum of {max_size} bytes",
                path.display()
            ),
            Self::LoadFailed { model_id, reason } => {
                write!(f, "Failed to load data for '{model_id}': {reason}")
            }
            Self::Io { path, source } => {
                write!(f, "I/O error reading dataset '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<DatasetError> for YearScopeError {
    fn from(e: DatasetError) -> Self {
        Self::Dataset(e)
    }
}

// ---------------------------------------------------------------------------
// Filter errors
// ---------------------------------------------------------------------------

/// Errors raised when a filter action is rejected.
#[derive(Debug)]
pub enum FilterError {
    /// The action names a group that is not in the catalog.
    UnknownGroup { group_id: String },

    /// The action selects a value the group does not offer.
    UnknownOption { group_id: String, value: String },
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownGroup { group_id } => {
                write!(f, "Unknown filter group '{group_id}'")
            }
            Self::UnknownOption { group_id, value } => {
                write!(f, "Filter group '{group_id}' has no option '{value}'")
            }
        }
    }
}

impl std::error::Error for FilterError {}

impl From<FilterError> for YearScopeError {
    fn from(e: FilterError) -> Self {
        Self::Filter(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },

    /// The encoded bytes were not valid UTF-8.
    Encoding { source: std::string::FromUtf8Error },

    /// Export would exceed maximum record count.
    TooManyRecords { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "Export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
            Self::Encoding { source } => write!(f, "Export encoding error: {source}"),
            Self::TooManyRecords { count, max } => write!(
                f,
                "Export of {count} records exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
            Self::Encoding { source } => Some(source),
            Self::TooManyRecords { .. } => None,
        }
    }
}

impl From<ExportError> for YearScopeError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for YearScopeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for YearScope results.
pub type Result<T> = std::result::Result<T, YearScopeError>;
