//! Required-override validation.

use crate::error::OverlayError;
use crate::field::FieldRegistry;
use std::collections::BTreeSet;

/// Required fields of `registry` that are not in `touched`, in declaration
/// order.
pub fn missing_required<'r, T>(
    registry: &'r FieldRegistry<T>,
    touched: &BTreeSet<&str>,
) -> Vec<&'r str> {
    registry
        .required_names()
        .filter(|name| !touched.contains(name))
        .collect()
}

/// Fail with the complete missing set when any required field was not
/// overridden.
pub fn validate_overrides<T>(
    registry: &FieldRegistry<T>,
    touched: &BTreeSet<&str>,
) -> Result<(), OverlayError> {
    let missing = missing_required(registry, touched);
    if missing.is_empty() {
        return Ok(());
    }

    Err(OverlayError::MissingRequiredOverride {
        missing: missing.into_iter().map(str::to_string).collect(),
    })
}
