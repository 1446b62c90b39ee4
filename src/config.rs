//! Process-wide AI settings with a JSON file behind them.
//!
//! The store guards a [`Settings`] value with a reader/writer lock. Updates
//! snapshot the new state and release the lock before touching the disk, so
//! readers are never blocked on file I/O; two concurrent writers race on the
//! file and the last one wins, while the in-memory value follows lock order.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const CONFIG_FILE_NAME: &str = "eaiser.config.json";

const DEFAULT_API_URL: &str = "https://api.xiaomimimo.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "mimo-v2-flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "apiKey", default)]
    pub api_key: String,
    #[serde(rename = "apiURL", default = "default_api_url")]
    pub api_url: String,
    #[serde(rename = "model", default = "default_model")]
    pub model: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: default_api_url(),
            model: default_model(),
        }
    }
}

/// Partial update; `None` and empty strings both mean "leave unchanged".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
    pub model: Option<String>,
}

pub struct ConfigStore {
    path: PathBuf,
    inner: RwLock<Settings>,
}

impl ConfigStore {
    /// Reads the config file at `path`. A missing file yields defaults and
    /// writes them out; an unreadable file yields defaults without touching
    /// the file.
    pub fn load(path: PathBuf) -> Self {
        let mut write_defaults = false;
        let settings = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Settings>(&raw) {
                Ok(mut settings) => {
                    // Blank fields in the file fall back to defaults; only the
                    // key is allowed to stay empty.
                    if settings.api_url.is_empty() {
                        settings.api_url = default_api_url();
                    }
                    if settings.model.is_empty() {
                        settings.model = default_model();
                    }
                    tracing::info!(path = %path.display(), "config loaded");
                    settings
                }
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "config file unreadable, using defaults");
                    Settings::default()
                }
            },
            Err(err) => {
                if err.kind() == ErrorKind::NotFound {
                    write_defaults = true;
                } else {
                    tracing::warn!(path = %path.display(), %err, "could not read config file, using defaults");
                }
                Settings::default()
            }
        };

        let store = Self {
            path,
            inner: RwLock::new(settings),
        };
        if write_defaults {
            if let Err(err) = store.persist(&store.get()) {
                tracing::warn!(%err, "failed to write default config");
            }
        }
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> Settings {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Applies the non-empty fields of `update`, then persists a full
    /// snapshot. The lock is released before the file write.
    pub fn set(&self, update: SettingsUpdate) -> Result<Settings> {
        let snapshot = {
            let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
            if let Some(api_key) = update.api_key.filter(|v| !v.is_empty()) {
                guard.api_key = api_key;
            }
            if let Some(api_url) = update.api_url.filter(|v| !v.is_empty()) {
                guard.api_url = api_url;
            }
            if let Some(model) = update.model.filter(|v| !v.is_empty()) {
                guard.model = model;
            }
            guard.clone()
        };

        self.persist(&snapshot)?;
        Ok(snapshot)
    }

    fn persist(&self, snapshot: &Settings) -> Result<()> {
        let data = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, data)?;
        tracing::debug!(path = %self.path.display(), "config persisted");
        Ok(())
    }
}
