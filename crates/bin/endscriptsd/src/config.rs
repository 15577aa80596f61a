//! Daemon configuration.
//!
//! Read from `endscripts.toml` (or the file named by `ENDSCRIPTS_CONFIG`);
//! the file is optional. `ENDSCRIPTS_BIND`, `ENDSCRIPTS_SETTINGS` and
//! `RUST_LOG` override the matching file values.

use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CONFIG_FILE: &str = "endscripts.toml";

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// `host:port` the HTTP server listens on.
    pub bind: String,
    /// JSON document holding the script list.
    pub settings_path: PathBuf,
    /// Filter directive (`RUST_LOG` syntax).
    pub log_filter: String,
    /// Messages buffered per SSE subscriber before it starts lagging.
    pub notification_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5050".to_string(),
            settings_path: PathBuf::from("endscripts.json"),
            log_filter: "endscriptsd=info,endscripts=info,tower_http=debug".to_string(),
            notification_capacity: 64,
        }
    }
}

impl Config {
    /// Load the file, apply environment overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let lookup = |key: &str| std::env::var(key).ok();
        let path = lookup("ENDSCRIPTS_CONFIG").unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(bind) = lookup("ENDSCRIPTS_BIND") {
            self.bind = bind;
        }
        if let Some(path) = lookup("ENDSCRIPTS_SETTINGS") {
            self.settings_path = PathBuf::from(path);
        }
        if let Some(filter) = lookup("RUST_LOG") {
            self.log_filter = filter;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        match self.bind.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok_and(|p| p != 0) => {}
            _ => return Err(ConfigError::Validation(format!("bad bind address {:?}", self.bind))),
        }
        if self.notification_capacity == 0 {
            return Err(ConfigError::Validation(
                "notification capacity must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}
