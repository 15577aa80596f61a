//! Settings-specific error type wrapping IO and JSON errors.

use std::path::PathBuf;

use endscripts_domain::error::EndScriptsError;

/// Errors originating from the JSON settings file.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Reading, writing or renaming the file failed.
    #[error("settings file error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be parsed or serialized.
    #[error("settings JSON error")]
    Json(#[from] serde_json::Error),
}

impl From<SettingsError> for EndScriptsError {
    fn from(err: SettingsError) -> Self {
        Self::Storage(Box::new(err))
    }
}
