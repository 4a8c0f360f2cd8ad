// Library root. Exposes internal modules for integration tests in `tests/`.
// Entry points are `src/main.rs` (HTTP service) and `src/bin/clean_swagger.rs`.

pub mod alerting;
pub mod api;
pub mod error;
pub mod metrics;
pub mod store;
pub mod swagger;

// Shared by the binaries.
pub mod cli;
pub mod config;
pub mod logging;
