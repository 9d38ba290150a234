// YearScope - core/catalog.rs
//
// Filter-group catalog loading and validation.
// Core layer: accepts TOML strings, never touches the filesystem.
// File I/O for user catalogs is handled by app::loader which feeds
// content here.
//
// Every group maps to an explicit list of `Attribute`s. Unknown attribute
// names and option values outside an attribute's enumeration are rejected
// here, at load time, so the filter engine never sees them.

use crate::core::model::{Attribute, EvaluationRecord};
use crate::util::error::CatalogError;
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};

// =============================================================================
// TOML deserialization structures (raw input)
// =============================================================================

/// Raw catalog document as deserialized from TOML.
#[derive(Debug, Deserialize)]
pub struct CatalogDefinition {
    #[serde(default, rename = "group")]
    pub groups: Vec<GroupDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct GroupDefinition {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "filter")]
    pub filters: Vec<FilterDefinition>,
}

#[derive(Debug, Deserialize)]
pub struct FilterDefinition {
    pub attribute: String,
    /// Empty = every value in the attribute's enumeration.
    #[serde(default)]
    pub options: Vec<String>,
}

// =============================================================================
// Runtime catalog
// =============================================================================

/// One attribute offered by a filter group, with its selectable values.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeOptions {
    pub attribute: Attribute,
    pub options: Vec<String>,
}

/// A named cluster of related attributes offered as one filterable dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterGroup {
    pub id: String,
    pub title: String,
    pub description: String,
    pub filters: Vec<AttributeOptions>,
}

impl FilterGroup {
    /// The attributes this group tests, in catalog order.
    pub fn attributes(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.filters.iter().map(|f| f.attribute)
    }

    /// Whether `value` is selectable in this group.
    pub fn offers(&self, value: &str) -> bool {
        self.filters
            .iter()
            .any(|f| f.options.iter().any(|o| o == value))
    }

    /// OR-within-group test: true if any selected value equals any of the
    /// group's attributes on the record. An empty selection passes.
    pub fn matches(&self, record: &EvaluationRecord, selected: &BTreeSet<String>) -> bool {
        if selected.is_empty() {
            return true;
        }
        self.attributes().any(|attribute| {
            let value = attribute.value_of(record);
            selected.contains(value)
        })
    }
}

/// Ordered, validated list of filter groups. Read-only during a session.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCatalog {
    groups: Vec<FilterGroup>,
}

impl FilterCatalog {
    /// Load the catalog embedded in the binary.
    pub fn builtin() -> Result<Self, CatalogError> {
        let def = parse_catalog_toml(BUILTIN_CATALOG, BUILTIN_CATALOG_NAME)?;
        validate_and_build(def, BUILTIN_CATALOG_NAME)
    }

    pub fn groups(&self) -> &[FilterGroup] {
        &self.groups
    }

    pub fn group(&self, id: &str) -> Option<&FilterGroup> {
        self.groups.iter().find(|g| g.id == id)
    }
}

// =============================================================================
// Parsing and validation
// =============================================================================

/// Name used in error messages for the embedded catalog.
pub const BUILTIN_CATALOG_NAME: &str = "builtin:filter_groups.toml";

/// Embedded TOML content for the built-in catalog.
const BUILTIN_CATALOG: &str = include_str!("../../catalog/filter_groups.toml");

/// Parse a TOML string into a `CatalogDefinition`.
///
/// `source_name` is used for error messages only.
pub fn parse_catalog_toml(
    toml_content: &str,
    source_name: &str,
) -> Result<CatalogDefinition, CatalogError> {
    toml::from_str(toml_content).map_err(|e| CatalogError::TomlParse {
        source_name: source_name.to_string(),
        source: e,
    })
}

/// Validate a `CatalogDefinition` and build the runtime `FilterCatalog`.
///
/// Validates:
/// - at least one group, unique non-empty group ids, non-empty titles
/// - every group names at least one attribute
/// - every attribute name is a known event field
/// - every option value belongs to its attribute's enumeration
pub fn validate_and_build(
    def: CatalogDefinition,
    source_name: &str,
) -> Result<FilterCatalog, CatalogError> {
    if def.groups.is_empty() {
        return Err(CatalogError::Empty {
            source_name: source_name.to_string(),
        });
    }

    let mut seen = HashSet::new();
    let mut groups = Vec::with_capacity(def.groups.len());

    for group_def in def.groups {
        let id = group_def.id;
        if id.is_empty() {
            return Err(CatalogError::MissingField {
                group_id: "(empty)".to_string(),
                field: "group.id",
            });
        }
        if group_def.title.is_empty() {
            return Err(CatalogError::MissingField {
                group_id: id,
                field: "group.title",
            });
        }
        if group_def.filters.is_empty() {
            return Err(CatalogError::MissingField {
                group_id: id,
                field: "group.filter",
            });
        }
        if !seen.insert(id.clone()) {
            return Err(CatalogError::DuplicateGroup { group_id: id });
        }

        let mut filters = Vec::with_capacity(group_def.filters.len());
        for filter_def in group_def.filters {
            let attribute = Attribute::from_key(&filter_def.attribute).ok_or_else(|| {
                CatalogError::UnknownAttribute {
                    group_id: id.clone(),
                    attribute: filter_def.attribute.clone(),
                }
            })?;

            if let Some(bad) = filter_def.options.iter().find(|o| !attribute.accepts(o)) {
                return Err(CatalogError::InvalidOption {
                    group_id: id.clone(),
                    attribute: filter_def.attribute.clone(),
                    value: bad.clone(),
                });
            }

            let options = if filter_def.options.is_empty() {
                attribute.values()
            } else {
                filter_def.options
            };
            filters.push(AttributeOptions { attribute, options });
        }

        groups.push(FilterGroup {
            id,
            title: group_def.title,
            description: group_def.description,
            filters,
        });
    }

    tracing::debug!(
        source = source_name,
        groups = groups.len(),
        "Filter catalog validated"
    );

    Ok(FilterCatalog { groups })
}
