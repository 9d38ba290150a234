// YearScope - core/mod.rs
//
// Core analytical layer: data model, filter catalog, filtering,
// aggregation, comparison and export encoding.
// Dependencies: serde, serde_json, toml, csv, chrono, tracing.
// Must NOT depend on: app, platform, or any file/network I/O.

pub mod aggregate;
pub mod catalog;
pub mod compare;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod insights;
pub mod model;
pub mod registry;
pub mod store;
