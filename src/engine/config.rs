//! Application configuration.
//!
//! Loaded from JSON (`--config <file>` or the platform config directory),
//! then overridden by `STUDIO_*` environment variables. A missing file is
//! not an error: every section has defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::quality::QualitySettings;
use crate::engine::{EngineError, EngineResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scene: SceneSettings,
    pub quality: QualitySettings,
    pub services: ServiceSettings,
    pub assets: AssetSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub window_width: u32,
    pub window_height: u32,
    /// Scrollable page height below the fold, in logical pixels.
    pub page_height: f32,
    /// Deferral threshold; `None` means one viewport height.
    pub scroll_threshold: Option<f32>,
    /// Where users land when the 3D scene cannot run.
    pub fallback_url: String,
    pub force_fallback: bool,
    pub start_path: String,
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 800,
            page_height: 6000.0,
            scroll_threshold: None,
            fallback_url: "https://studio.example/lite".to_string(),
            force_fallback: false,
            start_path: "/".to_string(),
        }
    }
}

/// Endpoints and credentials for the hosted services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    pub cms_url: String,
    pub cms_token: Option<String>,
    pub email_url: String,
    pub email_token: Option<String>,
    pub contact_recipient: String,
    pub newsletter_url: String,
    pub newsletter_key: Option<String>,
    pub telemetry_url: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cms_url: "https://cms.studio.example/graphql".to_string(),
            cms_token: None,
            email_url: "https://api.resend.com/emails".to_string(),
            email_token: None,
            contact_recipient: "hello@studio.example".to_string(),
            newsletter_url: "https://newsletter.studio.example/lists/main/members".to_string(),
            newsletter_key: None,
            telemetry_url: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSettings {
    /// JSON asset manifest to stream at startup.
    pub manifest: Option<PathBuf>,
}

impl AppConfig {
    /// Default config location: `<config dir>/studio-scene/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("studio-scene").join("config.json"))
    }

    /// Load `path` (or the default location), then apply the environment.
    pub fn load(path: Option<&Path>) -> EngineResult<Self> {
        let explicit = path.is_some();
        let path = path.map(Path::to_path_buf).or_else(Self::default_path);

        let mut config = match path {
            Some(path) if path.exists() => Self::from_file(&path)?,
            Some(path) if explicit => {
                return Err(EngineError::Io {
                    path,
                    source: std::io::Error::from(std::io::ErrorKind::NotFound),
                });
            }
            _ => {
                log::debug!("no config file, using defaults");
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&text).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `STUDIO_*` overrides using `lookup` (the process environment in production).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let s = &mut self.services;
        if let Some(v) = lookup("STUDIO_CMS_URL") {
            s.cms_url = v;
        }
        if let Some(v) = lookup("STUDIO_CMS_TOKEN") {
            s.cms_token = Some(v);
        }
        if let Some(v) = lookup("STUDIO_EMAIL_URL") {
            s.email_url = v;
        }
        if let Some(v) = lookup("STUDIO_EMAIL_TOKEN") {
            s.email_token = Some(v);
        }
        if let Some(v) = lookup("STUDIO_NEWSLETTER_URL") {
            s.newsletter_url = v;
        }
        if let Some(v) = lookup("STUDIO_NEWSLETTER_KEY") {
            s.newsletter_key = Some(v);
        }
        if let Some(v) = lookup("STUDIO_TELEMETRY_URL") {
            s.telemetry_url = Some(v);
        }
        if let Some(v) = lookup("STUDIO_FORCE_FALLBACK") {
            self.scene.force_fallback = matches!(v.trim(), "1" | "true" | "yes");
        }
    }
}
