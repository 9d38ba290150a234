// YearScope - lib.rs
//
// Library entry point. The crate has no binary: a host (UI shell, WASM
// bridge, integration tests) builds a `Dashboard`, feeds it datasets and
// actions, and renders the derived view.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
