//! Core types shared across the overlay pipeline.

use std::collections::BTreeMap;

/// EnvSnapshot: materialized environment, variable name to value
pub type EnvSnapshot = BTreeMap<String, String>;

/// OverrideMap: translated camel-case field name to raw string value
pub type OverrideMap = BTreeMap<String, String>;

/// Read the process environment into a snapshot.
///
/// Variables whose name or value is not valid unicode are skipped.
pub fn process_env() -> EnvSnapshot {
    std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .collect()
}
