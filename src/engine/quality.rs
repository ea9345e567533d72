use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

impl QualityTier {
    fn lower(self) -> Option<Self> {
        match self {
            QualityTier::High => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::Low),
            QualityTier::Low => None,
        }
    }

    fn higher(self) -> Option<Self> {
        match self {
            QualityTier::Low => Some(QualityTier::Medium),
            QualityTier::Medium => Some(QualityTier::High),
            QualityTier::High => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct QualitySettings {
    /// Frames averaged before any decision.
    pub window: usize,
    pub downgrade_fps: f32,
    pub upgrade_fps: f32,
    pub low_pixel_ratio: f32,
    pub medium_pixel_ratio: f32,
    pub high_pixel_ratio: f32,
    pub start: QualityTier,
}

impl Default for QualitySettings {
    fn default() -> Self {
        Self {
            window: 60,
            downgrade_fps: 45.0,
            upgrade_fps: 58.0,
            low_pixel_ratio: 0.75,
            medium_pixel_ratio: 1.0,
            high_pixel_ratio: 1.5,
            start: QualityTier::High,
        }
    }
}

/// Steps render quality up or down from measured frame times.
///
/// Every tier change clears the sample window, so the next decision is
/// based entirely on frames rendered at the new tier.
#[derive(Debug, Clone)]
pub struct QualityScaler {
    settings: QualitySettings,
    tier: QualityTier,
    samples: VecDeque<f32>,
}

impl QualityScaler {
    pub fn new(settings: QualitySettings) -> Self {
        let window = settings.window.max(1);
        Self {
            tier: settings.start,
            samples: VecDeque::with_capacity(window),
            settings: QualitySettings { window, ..settings },
        }
    }

    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn pixel_ratio(&self) -> f32 {
        match self.tier {
            QualityTier::Low => self.settings.low_pixel_ratio,
            QualityTier::Medium => self.settings.medium_pixel_ratio,
            QualityTier::High => self.settings.high_pixel_ratio,
        }
    }

    /// Average fps over the current window, if any samples exist.
    pub fn average_fps(&self) -> Option<f32> {
        if self.samples.is_empty() {
            return None;
        }
        let total: f32 = self.samples.iter().sum();
        (total > 0.0).then(|| self.samples.len() as f32 / total)
    }

    /// Record one frame. Returns the new tier when it changed.
    pub fn record_frame(&mut self, dt_sec: f32) -> Option<QualityTier> {
        if !(dt_sec > 0.0) || !dt_sec.is_finite() {
            return None;
        }

        if self.samples.len() == self.settings.window {
            self.samples.pop_front();
        }
        self.samples.push_back(dt_sec);

        if self.samples.len() < self.settings.window {
            return None;
        }

        let fps = self.average_fps()?;
        let step = if fps < self.settings.downgrade_fps {
            self.tier.lower()
        } else if fps > self.settings.upgrade_fps {
            self.tier.higher()
        } else {
            None
        };
        let next = step?;

        log::info!(
            "quality {:?} -> {:?} (avg {:.1} fps)",
            self.tier,
            next,
            fps
        );
        self.tier = next;
        self.samples.clear();
        Some(next)
    }
}
