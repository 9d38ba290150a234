// YearScope - app/mod.rs
//
// Application layer: dashboard state, action sequencing, loading of
// datasets, catalog and registry.
// Dependencies: core layer, platform layer.

pub mod dashboard;
pub mod loader;
pub mod state;
