//! Asset streaming for the office scene.
//!
//! Each entry is loaded independently: a missing or undecodable file is
//! logged, reported to telemetry and recorded in the report, and the rest of
//! the batch carries on.

use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, EngineResult};
use crate::services::Telemetry;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    /// PNG/JPEG, decoded to RGBA8.
    Texture,
    /// DDS container holding BC7 blocks.
    CompressedTexture,
    /// Model file, kept as raw bytes for the renderer.
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub uri: String,
    pub kind: AssetKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub assets: Vec<AssetEntry>,
}

impl AssetManifest {
    pub fn from_file(path: &Path) -> EngineResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadedAsset {
    Texture { width: u32, height: u32, rgba: Vec<u8> },
    CompressedTexture { width: u32, height: u32, srgb: bool, bc7_blocks: Vec<u8> },
    Model { bytes: Vec<u8> },
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct AssetReport {
    pub total: usize,
    pub loaded: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl AssetReport {
    /// Fraction of entries that are settled (loaded or failed). 1.0 when empty.
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.loaded.len() + self.failed.len()) as f32 / self.total as f32
    }

    pub fn is_complete(&self) -> bool {
        self.loaded.len() + self.failed.len() == self.total
    }
}

/// Loads manifest entries, caching by uri.
#[derive(Debug)]
pub struct AssetStreamer {
    base_dirs: Vec<PathBuf>,
    telemetry: Telemetry,
    cache: HashMap<String, LoadedAsset>,
}

impl AssetStreamer {
    /// Relative uris are tried against the working directory, then the crate root.
    pub fn new(telemetry: Telemetry) -> Self {
        let mut base_dirs = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            base_dirs.push(cwd);
        }
        base_dirs.push(PathBuf::from(env!("CARGO_MANIFEST_DIR")));
        Self {
            base_dirs,
            telemetry,
            cache: HashMap::new(),
        }
    }

    pub fn with_base_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.base_dirs = dirs;
        self
    }

    pub fn get(&self, uri: &str) -> Option<&LoadedAsset> {
        self.cache.get(uri)
    }

    pub fn load_all(&mut self, manifest: &AssetManifest) -> AssetReport {
        let mut report = AssetReport {
            total: manifest.assets.len(),
            ..AssetReport::default()
        };

        for entry in &manifest.assets {
            match self.load(entry) {
                Ok(()) => report.loaded.push(entry.name.clone()),
                Err(e) => {
                    log::error!("[AssetStreamer] {e}");
                    self.telemetry.capture_exception("asset_load", e.to_string());
                    report.failed.push((entry.name.clone(), e.to_string()));
                }
            }
            log::debug!("[AssetStreamer] progress {:.0}%", report.progress() * 100.0);
        }

        log::info!(
            "[AssetStreamer] {} loaded, {} failed",
            report.loaded.len(),
            report.failed.len()
        );
        report
    }

    fn load(&mut self, entry: &AssetEntry) -> EngineResult<()> {
        if self.cache.contains_key(&entry.uri) {
            return Ok(());
        }

        let fail = |reason: String| EngineError::Asset {
            name: entry.name.clone(),
            reason,
        };

        let path = self.resolve(&entry.uri).map_err(|tried| {
            let tried: Vec<String> = tried.iter().map(|p| p.display().to_string()).collect();
            fail(format!("'{}' not found (tried {})", entry.uri, tried.join(", ")))
        })?;

        let bytes = std::fs::read(&path).map_err(|e| fail(format!("read {}: {e}", path.display())))?;

        let asset = match entry.kind {
            AssetKind::Texture => {
                let img = image::load_from_memory(&bytes).map_err(|e| fail(format!("decode: {e}")))?;
                let rgba = img.to_rgba8();
                let (width, height) = rgba.dimensions();
                LoadedAsset::Texture {
                    width,
                    height,
                    rgba: rgba.into_raw(),
                }
            }
            AssetKind::CompressedTexture => decode_dds_bc7(&bytes).map_err(fail)?,
            AssetKind::Model => {
                if bytes.is_empty() {
                    return Err(fail("model file is empty".to_string()));
                }
                LoadedAsset::Model { bytes }
            }
        };

        self.cache.insert(entry.uri.clone(), asset);
        Ok(())
    }

    /// Resolve a uri to an existing file, or return every path tried.
    fn resolve(&self, uri: &str) -> Result<PathBuf, Vec<PathBuf>> {
        let raw = Path::new(uri.strip_prefix("file://").unwrap_or(uri));

        let candidates: Vec<PathBuf> = if raw.is_absolute() {
            vec![raw.to_path_buf()]
        } else {
            self.base_dirs.iter().map(|d| d.join(raw)).collect()
        };

        candidates
            .iter()
            .find(|p| p.is_file())
            .cloned()
            .ok_or(candidates)
    }
}

fn decode_dds_bc7(bytes: &[u8]) -> Result<LoadedAsset, String> {
    let dds = ddsfile::Dds::read(&mut Cursor::new(bytes)).map_err(|e| format!("{e:?}"))?;

    let width = dds.get_width();
    let height = dds.get_height();
    if width == 0 || height == 0 {
        return Err("DDS has zero size".to_string());
    }

    let srgb = match dds.get_dxgi_format() {
        Some(ddsfile::DxgiFormat::BC7_UNorm) => false,
        Some(ddsfile::DxgiFormat::BC7_UNorm_sRGB) => true,
        Some(other) => return Err(format!("DDS is not BC7 (got {other:?})")),
        None => return Err("DDS missing DXGI format (need BC7 in DX10 header)".to_string()),
    };

    // Top mip only.
    let expected_len = width.div_ceil(4) as usize * height.div_ceil(4) as usize * 16;
    if dds.data.len() < expected_len {
        return Err(format!(
            "DDS data too small for BC7 level 0: got={}, need={}",
            dds.data.len(),
            expected_len
        ));
    }

    Ok(LoadedAsset::CompressedTexture {
        width,
        height,
        srgb,
        bc7_blocks: dds.data[..expected_len].to_vec(),
    })
}
