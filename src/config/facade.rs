//! ConfigLoader facade: file baseline plus environment overlay.

use super::sources::file;
use crate::error::ApiError;
use crate::field::OverlayTarget;
use crate::overlay::{Overlay, OverlayReport};
use config::Config;
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::debug;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a baseline from a specific file.
    pub fn load_from_file<T: DeserializeOwned>(path: &Path) -> Result<T, ApiError> {
        let builder = file::add_to_builder(Config::builder(), path)?;
        let config = builder.build()?;
        debug!(path = %path.display(), "Loaded baseline configuration");
        Ok(config.try_deserialize()?)
    }

    /// Load a baseline from `path`, then overlay `env` onto it.
    ///
    /// The loaded baseline is only an intermediate; a failed overlay returns
    /// the overlay error and nothing else.
    pub fn load_with_overlay<T, I, K, V>(
        path: &Path,
        overlay: &Overlay,
        env: I,
    ) -> Result<OverlayReport<T>, ApiError>
    where
        T: DeserializeOwned + OverlayTarget,
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let baseline: T = Self::load_from_file(path)?;
        Ok(overlay.apply(&baseline, env)?)
    }
}
