//! Infrastructure layer - Adapters for the application ports
//!
//! This layer contains:
//! - Config: environment-driven engine configuration
//! - Storage: in-memory and file-backed key-value stores
//! - Catalog: in-memory catalog over bundled reference data
//! - Telemetry: tracing subscriber setup

pub mod catalog;
pub mod config;
pub mod storage;
pub mod telemetry;
