//! Overlay Engine
//!
//! Produces a new configuration object from a baseline plus the environment
//! entries carrying the configured prefix. The baseline is never mutated and
//! no partially overlaid value escapes a failed call.

pub mod extension;
pub mod translate;
pub mod validation;

pub use extension::WithEnvOverrides;
pub use translate::{translate_overrides, OverrideEntry, TranslatedOverrides};
pub use validation::{missing_required, validate_overrides};

use crate::error::{OverlayError, OverlayWarning};
use crate::field::OverlayTarget;
use crate::matcher::find_matching_overrides;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info, warn};

/// Per-call overlay switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Fail unless every override-required field was supplied
    pub require_all_marked: bool,
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            require_all_marked: true,
        }
    }
}

/// A field that was assigned from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedOverride {
    pub field: String,
    pub env_key: String,
}

/// Successful overlay: the new value plus what happened on the way.
#[derive(Debug, Clone)]
pub struct OverlayReport<T> {
    pub value: T,
    /// Touched fields, in environment key order
    pub applied: Vec<AppliedOverride>,
    pub warnings: Vec<OverlayWarning>,
}

impl<T> OverlayReport<T> {
    pub fn into_value(self) -> T {
        self.value
    }

    pub fn touched(&self) -> impl Iterator<Item = &str> {
        self.applied.iter().map(|applied| applied.field.as_str())
    }
}

/// Overlay configured for one prefix.
#[derive(Debug, Clone)]
pub struct Overlay {
    prefix: String,
    options: OverlayOptions,
}

impl Overlay {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            options: OverlayOptions::default(),
        }
    }

    /// Toggle required-field validation for this overlay.
    pub fn require_all_marked(mut self, enabled: bool) -> Self {
        self.options.require_all_marked = enabled;
        self
    }

    pub fn with_options(mut self, options: OverlayOptions) -> Self {
        self.options = options;
        self
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn options(&self) -> OverlayOptions {
        self.options
    }

    /// Match and translate `env` without touching any configuration.
    pub fn translate<I, K, V>(&self, env: I) -> Result<TranslatedOverrides, OverlayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let matched = find_matching_overrides(&self.prefix, env)?;
        translate_overrides(&self.prefix, &matched)
    }

    /// Overlay `env` onto a copy of `baseline`.
    pub fn apply<T, I, K, V>(&self, baseline: &T, env: I) -> Result<OverlayReport<T>, OverlayError>
    where
        T: OverlayTarget,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let matched = find_matching_overrides(&self.prefix, env)?;
        let mut value = baseline.structural_copy()?;
        let translated = translate_overrides(&self.prefix, &matched)?;

        let mut warnings = translated.warnings;
        for warning in &warnings {
            warn!(prefix = %self.prefix, key = %warning.key(), "{}", warning);
        }

        let registry = T::registry();
        let mut applied = Vec::with_capacity(translated.entries.len());
        for entry in translated.entries {
            let Some(field) = registry.get(&entry.field) else {
                let warning = OverlayWarning::UnknownOverrideKey {
                    key: entry.env_key,
                    field: entry.field,
                };
                warn!(prefix = %self.prefix, key = %warning.key(), "{}", warning);
                warnings.push(warning);
                continue;
            };

            field.apply(&mut value, &entry.value)?;
            debug!(field = %entry.field, env_key = %entry.env_key, "Applied environment override");
            applied.push(AppliedOverride {
                field: entry.field,
                env_key: entry.env_key,
            });
        }

        if self.options.require_all_marked {
            let touched: BTreeSet<&str> = applied.iter().map(|a| a.field.as_str()).collect();
            validate_overrides(registry, &touched)?;
        } else {
            info!(prefix = %self.prefix, "RequiresOverride validation disabled");
        }

        Ok(OverlayReport {
            value,
            applied,
            warnings,
        })
    }
}

/// Overlay `env` onto a copy of `baseline` and return the new value.
///
/// Only entries whose key starts with `prefix` are considered. Unknown and
/// malformed keys are logged and skipped. With `require_all_marked`, every
/// override-required field must be supplied.
pub fn overlay<T, I, K, V>(
    baseline: &T,
    prefix: &str,
    env: I,
    require_all_marked: bool,
) -> Result<T, OverlayError>
where
    T: OverlayTarget,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Overlay::new(prefix)
        .require_all_marked(require_all_marked)
        .apply(baseline, env)
        .map(OverlayReport::into_value)
}
