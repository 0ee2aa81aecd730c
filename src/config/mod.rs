use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::chart::{ChartPalette, SeriesLabels};
use crate::i18n::{LabelKey, Lang, Translate};
use crate::zones::Zone;

/// Analyser frame size used when none is configured (the Web Audio default)
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Capture sample rate used when none is configured
pub const DEFAULT_SAMPLE_RATE: u32 = 48_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneConfig {
    pub id: String,
    #[serde(default)]
    pub selected: bool,
    #[serde(default)]
    pub attenuation_db: f64,
    #[serde(default = "default_volume")]
    pub volume: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Language for KPI and legend labels
    #[serde(default)]
    pub lang: Lang,

    /// Whether the stream is currently playing
    #[serde(default)]
    pub playing: bool,

    /// Master volume fraction (0..1)
    #[serde(default = "default_volume")]
    pub volume: f64,

    /// Bytes per analyser frame when reading captures
    #[serde(default = "default_frame_size")]
    pub frame_size: usize,

    /// Sample rate of the captures, in Hz; places frames on the time axis
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,

    /// Legend names; translated defaults when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<SeriesLabels>,

    /// Series colors; built-in palette when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub palette: Option<ChartPalette>,

    #[serde(default)]
    pub zones: Vec<ZoneConfig>,
}

fn default_volume() -> f64 {
    1.0
}

fn default_frame_size() -> usize {
    DEFAULT_FRAME_SIZE
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            lang: Lang::default(),
            playing: false,
            volume: default_volume(),
            frame_size: DEFAULT_FRAME_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            series: None,
            palette: None,
            zones: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("zonemeter");

        if let Err(e) = std::fs::create_dir_all(&config_dir) {
            tracing::warn!("Could not create config directory: {}", e);
        }

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        let path = match Self::config_path() {
            Ok(p) => p,
            Err(_) => return Ok(DashboardConfig::default()),
        };

        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config: {}", e),
                },
                Err(e) => tracing::warn!("Failed to read config: {}", e),
            }
            return Ok(DashboardConfig::default());
        }

        let config = DashboardConfig::default();
        if let Err(e) = config.save_to(&path) {
            tracing::warn!("Could not write default config: {}", e);
        }
        Ok(config)
    }

    /// Load config from an explicit path; unlike `load`, errors are returned
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Clean up the config before saving
        let mut clean_config = self.clone();

        clean_config.zones.retain(|z| !z.id.trim().is_empty());
        clean_config.volume = clean_config.volume.clamp(0.0, 1.0);
        for zone in &mut clean_config.zones {
            zone.volume = zone.volume.clamp(0.0, 1.0);
        }

        let content = toml::to_string_pretty(&clean_config)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Split the zone table into the selection list and lookup maps
    pub fn zone_inputs(&self) -> (Vec<Zone>, HashMap<String, f64>, HashMap<String, f64>) {
        let zones = self
            .zones
            .iter()
            .map(|z| Zone::new(z.id.clone(), z.selected))
            .collect();
        let attenuation = self
            .zones
            .iter()
            .map(|z| (z.id.clone(), z.attenuation_db))
            .collect();
        let volume = self
            .zones
            .iter()
            .map(|z| (z.id.clone(), z.volume))
            .collect();

        (zones, attenuation, volume)
    }

    /// Legend names from config, or translated defaults
    pub fn series_labels<T: Translate + ?Sized>(&self, translator: &T) -> SeriesLabels {
        self.series.clone().unwrap_or_else(|| SeriesLabels {
            stream: translator.t(self.lang, LabelKey::SeriesStream).into_owned(),
            mic: translator.t(self.lang, LabelKey::SeriesMic).into_owned(),
        })
    }
}
