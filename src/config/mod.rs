//! Baseline loading
//!
//! Reads a flat baseline configuration from a file with the `config` crate,
//! optionally followed by an environment overlay:
//! - TOML, YAML or JSON, chosen by file extension
//! - serde deserialization into the caller's type
//! - overlay through the regular engine

pub mod facade;
pub mod sources;

pub use facade::ConfigLoader;
