use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, EngineResult};

/// Small per-user state that survives restarts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Set the first time the user interacts with the scene (click, key, scroll).
    /// Gates things like the audio prompt.
    pub has_interacted: bool,
}

/// Loads and saves `Preferences` as JSON.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    path: PathBuf,
    prefs: Preferences,
}

impl PreferenceStore {
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("studio-scene").join("preferences.json"))
    }

    /// Open the store. Missing or unreadable files fall back to defaults.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match std::fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|e| {
                log::warn!("ignoring corrupt preferences {}: {}", path.display(), e);
                Preferences::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Preferences::default(),
            Err(e) => {
                log::warn!("cannot read preferences {}: {}", path.display(), e);
                Preferences::default()
            }
        };
        Self { path, prefs }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    /// Record the first interaction. Writes at most once; returns true if it wrote.
    /// The flag only flips once the file is written, so a failed write is retried.
    pub fn mark_interacted(&mut self) -> EngineResult<bool> {
        if self.prefs.has_interacted {
            return Ok(false);
        }
        let next = Preferences {
            has_interacted: true,
            ..self.prefs.clone()
        };
        self.write(&next)?;
        self.prefs = next;
        Ok(true)
    }

    fn write(&self, prefs: &Preferences) -> EngineResult<()> {
        let io_err = |source| EngineError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(prefs).map_err(|source| EngineError::Json {
            path: self.path.clone(),
            source,
        })?;
        std::fs::write(&self.path, json).map_err(io_err)
    }
}
