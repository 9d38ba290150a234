// YearScope - platform/mod.rs
//
// Platform abstraction layer: config directory, config.toml, file reads.
// Dependencies: standard library, directories, toml, serde.
// Must NOT depend on: core, app.

pub mod config;
pub mod fs;
