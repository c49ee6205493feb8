//! Envlay: Environment Overlay for Configuration Objects
//!
//! Produces a new configuration object from an immutable baseline plus the
//! environment variables sharing a prefix. `MYAPP_RETRY_COUNT=5` overrides the
//! field `retryCount`; fields marked override-required must be supplied or
//! the overlay fails.
//!
//! The pipeline is matcher → name translator → overlay engine. Types opt in
//! through a field registry, usually generated with [`overlay_fields!`].

pub mod config;
pub mod error;
pub mod field;
pub mod logging;
pub mod matcher;
pub mod naming;
pub mod overlay;
pub mod tooling;
pub mod types;

pub use error::{ApiError, OverlayError, OverlayWarning};
pub use field::{Field, FieldKind, FieldRegistry, FieldType, FieldValue, OverlayTarget};
pub use matcher::find_matching_overrides;
pub use naming::{to_env_key, to_field_name};
pub use overlay::{
    overlay, AppliedOverride, Overlay, OverlayOptions, OverlayReport, WithEnvOverrides,
};
pub use types::{EnvSnapshot, OverrideMap};
