//! Prefix matching over an environment snapshot.

use crate::error::OverlayError;
use crate::types::EnvSnapshot;

/// Select every entry whose key starts with `prefix`.
///
/// This is a plain prefix test; whether the key is well formed after the
/// prefix is decided later by name translation. Accepts any iterable of
/// string pairs, so `&HashMap<String, String>`, `&BTreeMap<..>` and arrays of
/// `(&str, &str)` all work.
pub fn find_matching_overrides<I, K, V>(prefix: &str, env: I) -> Result<EnvSnapshot, OverlayError>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    if prefix.is_empty() {
        return Err(OverlayError::EmptyPrefix);
    }

    Ok(env
        .into_iter()
        .filter(|(key, _)| key.as_ref().starts_with(prefix))
        .map(|(key, value)| (key.as_ref().to_string(), value.as_ref().to_string()))
        .collect())
}
