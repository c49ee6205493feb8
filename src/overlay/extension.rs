//! Extension methods for applying environment overrides in place of a call
//! to [`overlay`](super::overlay).

use super::{overlay, Overlay, OverlayOptions, OverlayReport};
use crate::error::OverlayError;
use crate::field::OverlayTarget;
use crate::types::process_env;

/// `config.with_env_overrides("MYAPP")` style access to the overlay engine.
///
/// Required-field validation is on for every method except
/// [`with_env_overrides_opts`](WithEnvOverrides::with_env_overrides_opts).
pub trait WithEnvOverrides: OverlayTarget {
    /// Overlay the current process environment.
    fn with_env_overrides(&self, prefix: &str) -> Result<Self, OverlayError> {
        overlay(self, prefix, &process_env(), true)
    }

    /// Overlay a supplied environment snapshot.
    fn with_env_overrides_from<I, K, V>(&self, prefix: &str, env: I) -> Result<Self, OverlayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        overlay(self, prefix, env, true)
    }

    /// Apply `defaults` to a copy of `self` first, then overlay `env` on top.
    fn with_env_overrides_and_defaults<I, K, V, D>(
        &self,
        prefix: &str,
        env: I,
        defaults: D,
    ) -> Result<Self, OverlayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
        D: FnOnce(&mut Self),
    {
        let mut base = self.structural_copy()?;
        defaults(&mut base);
        overlay(&base, prefix, env, true)
    }

    /// Overlay with explicit options and keep the full report.
    fn with_env_overrides_opts<I, K, V>(
        &self,
        prefix: &str,
        env: I,
        options: OverlayOptions,
    ) -> Result<OverlayReport<Self>, OverlayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Overlay::new(prefix).with_options(options).apply(self, env)
    }
}

impl<T: OverlayTarget> WithEnvOverrides for T {}
