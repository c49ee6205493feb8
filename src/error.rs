//! Error types for the overlay core and its outer surfaces.

use std::fmt;
use thiserror::Error;

/// Fatal overlay errors. Any of these aborts the whole overlay call and no
/// partially overlaid value is returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    #[error("Environment prefix cannot be empty")]
    EmptyPrefix,

    #[error("Malformed environment key '{key}' for prefix '{prefix}': {reason}")]
    MalformedKey {
        prefix: String,
        key: String,
        reason: String,
    },

    #[error("Invalid override value '{value}' for field '{field}' (expected {expected}): {reason}")]
    InvalidOverrideValue {
        field: String,
        value: String,
        expected: String,
        reason: String,
    },

    #[error(
        "Missing required overridden properties: {}. If this is a dev environment, \
         you can disable validation with Overlay::require_all_marked(false)",
        .missing.join(", ")
    )]
    MissingRequiredOverride { missing: Vec<String> },

    #[error("Could not copy baseline configuration {type_name}: {reason}")]
    CloneFailure { type_name: String, reason: String },
}

impl OverlayError {
    pub(crate) fn malformed(prefix: &str, key: &str, reason: impl Into<String>) -> Self {
        OverlayError::MalformedKey {
            prefix: prefix.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal conditions collected during an overlay. They are logged and
/// reported, but never block completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayWarning {
    /// A matched key could not be translated into a field name.
    MalformedKey { key: String, reason: String },
    /// The translated field name does not exist on the target type.
    UnknownOverrideKey { key: String, field: String },
    /// Two keys translated to the same field; `ignored` lost to `kept`.
    ConflictingOverride {
        field: String,
        kept: String,
        ignored: String,
    },
}

impl OverlayWarning {
    /// Environment key the warning refers to.
    pub fn key(&self) -> &str {
        match self {
            OverlayWarning::MalformedKey { key, .. } => key,
            OverlayWarning::UnknownOverrideKey { key, .. } => key,
            OverlayWarning::ConflictingOverride { ignored, .. } => ignored,
        }
    }
}

impl fmt::Display for OverlayWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayWarning::MalformedKey { key, reason } => {
                write!(f, "Malformed environment key {}: {}", key, reason)
            }
            OverlayWarning::UnknownOverrideKey { key, field } => write!(
                f,
                "Environment override for property {} found ({}), but no matching property exists",
                field, key
            ),
            OverlayWarning::ConflictingOverride {
                field,
                kept,
                ignored,
            } => write!(
                f,
                "Environment keys {} and {} both override property {}; using {}",
                kept, ignored, field, kept
            ),
        }
    }
}

/// Errors raised by the outer surfaces: baseline loading, logging setup and
/// the command line tool.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error("Output error: {0}")]
    OutputError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
