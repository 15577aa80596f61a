//! JSON file implementation of [`ScriptSettings`].

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use endscripts_app::ports::ScriptSettings;
use endscripts_domain::error::EndScriptsError;
use endscripts_domain::script::Script;

use crate::error::SettingsError;

fn empty_list() -> Value {
    Value::Array(Vec::new())
}

/// On-disk layout: `{"scripts": [...]}` plus whatever else the file holds.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsDocument {
    #[serde(default = "empty_list")]
    scripts: Value,
    #[serde(flatten)]
    other: Map<String, Value>,
}

impl Default for SettingsDocument {
    fn default() -> Self {
        Self {
            scripts: empty_list(),
            other: Map::new(),
        }
    }
}

/// Script settings stored in a JSON file.
///
/// The document is held in memory; [`set`](ScriptSettings::set) stages a new
/// script list and [`save`](ScriptSettings::save) flushes the whole document.
pub struct JsonFileSettings {
    path: PathBuf,
    document: Mutex<SettingsDocument>,
}

impl JsonFileSettings {
    /// Load settings from `path`. A missing file yields an empty script list.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Io`] when the file exists but cannot be read
    /// and [`SettingsError::Json`] when it is not a JSON object.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, SettingsError> {
        let path = path.into();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "settings file not found, starting with no scripts");
                SettingsDocument::default()
            }
            Err(source) => return Err(SettingsError::Io { path, source }),
        };
        tracing::debug!(path = %path.display(), "settings loaded");

        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn document(&self) -> std::sync::MutexGuard<'_, SettingsDocument> {
        self.document
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

async fn write_atomically(path: PathBuf, temp: PathBuf, payload: Vec<u8>) -> Result<(), SettingsError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SettingsError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(&temp, payload)
        .await
        .map_err(|source| SettingsError::Io {
            path: temp.clone(),
            source,
        })?;
    tokio::fs::rename(&temp, &path)
        .await
        .map_err(|source| SettingsError::Io { path, source })
}

impl ScriptSettings for JsonFileSettings {
    fn get(&self) -> impl Future<Output = Result<Value, EndScriptsError>> + Send {
        let scripts = self.document().scripts.clone();
        async { Ok(scripts) }
    }

    fn set(&self, scripts: &[Script]) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        let result: Result<(), EndScriptsError> = serde_json::to_value(scripts)
            .map(|value| self.document().scripts = value)
            .map_err(|err| SettingsError::from(err).into());
        async { result }
    }

    fn save(&self) -> impl Future<Output = Result<(), EndScriptsError>> + Send {
        let payload = serde_json::to_vec_pretty(&*self.document());
        let path = self.path.clone();
        let temp = self.temp_path();
        async move {
            let payload = payload.map_err(SettingsError::from)?;
            write_atomically(path, temp, payload).await?;
            tracing::debug!("settings saved");
            Ok(())
        }
    }
}
