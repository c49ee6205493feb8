//! Name translation between environment keys and configuration field names.
//!
//! Environment keys are `PREFIX_` followed by the SCREAMING_SNAKE form of a
//! field name; field names are lowerCamel. The two directions are inverses
//! for every field name that starts with an ASCII lowercase letter and is
//! otherwise ASCII alphanumeric.

use crate::error::OverlayError;

/// Word separator used in environment keys.
pub const SEPARATOR: char = '_';

/// Translate an environment key into the field name it overrides.
///
/// Strips `prefix` and exactly one `_`, lower-cases the remainder and
/// camelizes it. A trailing separator is dropped and consecutive separators
/// collapse into a single word boundary. A separator at the very start of the
/// remainder is kept as a literal character.
pub fn to_field_name(prefix: &str, env_key: &str) -> Result<String, OverlayError> {
    if prefix.is_empty() {
        return Err(OverlayError::EmptyPrefix);
    }

    let rest = env_key
        .strip_prefix(prefix)
        .ok_or_else(|| OverlayError::malformed(prefix, env_key, "key does not start with prefix"))?;

    if rest.is_empty() {
        return Err(OverlayError::malformed(
            prefix,
            env_key,
            "nothing follows the prefix",
        ));
    }

    let remainder = rest.strip_prefix(SEPARATOR).ok_or_else(|| {
        OverlayError::malformed(
            prefix,
            env_key,
            format!("prefix must be followed by '{}'", SEPARATOR),
        )
    })?;

    if remainder.is_empty() {
        return Err(OverlayError::malformed(
            prefix,
            env_key,
            "nothing follows the separator",
        ));
    }

    Ok(camelize(&remainder.to_lowercase()))
}

/// Convert separator-delimited words into lowerCamel form without changing
/// the case of anything but word starts.
pub fn camelize(words: &str) -> String {
    let mut out = String::with_capacity(words.len());
    let mut boundary = false;

    for (index, c) in words.chars().enumerate() {
        if c == SEPARATOR && index > 0 {
            boundary = true;
            continue;
        }
        if boundary {
            out.extend(c.to_uppercase());
            boundary = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Build the environment key that overrides `field_name`.
///
/// `retryCount` with prefix `MYAPP` becomes `MYAPP_RETRY_COUNT`.
pub fn to_env_key(prefix: &str, field_name: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + 1 + field_name.len() * 2);
    key.push_str(prefix);
    key.push(SEPARATOR);

    for (index, c) in field_name.chars().enumerate() {
        if index > 0 && c.is_uppercase() {
            key.push(SEPARATOR);
        }
        key.extend(c.to_uppercase());
    }

    key
}
