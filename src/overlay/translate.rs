//! Translation of matched environment entries into field overrides.

use crate::error::{OverlayError, OverlayWarning};
use crate::naming;
use crate::types::{EnvSnapshot, OverrideMap};
use serde::Serialize;
use std::collections::BTreeMap;

/// One translated override: which key supplied which field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverrideEntry {
    pub field: String,
    pub env_key: String,
    #[serde(skip)]
    pub value: String,
}

/// Result of translating a matched snapshot.
#[derive(Debug, Clone, Default)]
pub struct TranslatedOverrides {
    /// Accepted overrides, ordered by environment key
    pub entries: Vec<OverrideEntry>,
    /// Malformed and conflicting keys
    pub warnings: Vec<OverlayWarning>,
}

impl TranslatedOverrides {
    /// Field name to raw value.
    pub fn override_map(&self) -> OverrideMap {
        self.entries
            .iter()
            .map(|entry| (entry.field.clone(), entry.value.clone()))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Translate every matched key into its field name.
///
/// Malformed keys are skipped with a warning. When two keys translate to the
/// same field, the lexicographically first key is kept and the other is
/// reported as a conflict.
pub fn translate_overrides(
    prefix: &str,
    matched: &EnvSnapshot,
) -> Result<TranslatedOverrides, OverlayError> {
    let mut translated = TranslatedOverrides::default();
    let mut owners: BTreeMap<String, String> = BTreeMap::new();

    for (key, value) in matched {
        let field = match naming::to_field_name(prefix, key) {
            Ok(field) => field,
            Err(OverlayError::MalformedKey { reason, .. }) => {
                translated.warnings.push(OverlayWarning::MalformedKey {
                    key: key.clone(),
                    reason,
                });
                continue;
            }
            Err(err) => return Err(err),
        };

        if let Some(kept) = owners.get(&field) {
            translated.warnings.push(OverlayWarning::ConflictingOverride {
                field,
                kept: kept.clone(),
                ignored: key.clone(),
            });
            continue;
        }

        owners.insert(field.clone(), key.clone());
        translated.entries.push(OverrideEntry {
            field,
            env_key: key.clone(),
            value: value.clone(),
        });
    }

    Ok(translated)
}
