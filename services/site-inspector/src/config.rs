//! Inspector configuration.
//!
//! Loaded from an optional YAML file; every section has defaults so an empty
//! file (or no file) is a valid configuration. CLI flags are applied on top.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solar_common::{SolarError, MAX_ZOOM};
use tracing::debug;
use verifier::VerifyOptions;

pub const DEFAULT_ESRI_ENDPOINT: &str =
    "https://services.arcgisonline.com/arcgis/rest/services/World_Imagery/MapServer/export";

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorConfig {
    pub imagery: ImageryConfig,
    pub detector: DetectorConfig,
    pub verification: VerifyOptions,
    pub output: OutputConfig,
    /// Sites processed at once; 1 keeps the run sequential
    pub max_concurrent: usize,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            imagery: ImageryConfig::default(),
            detector: DetectorConfig::default(),
            verification: VerifyOptions::default(),
            output: OutputConfig::default(),
            max_concurrent: 1,
        }
    }
}

/// Where satellite images come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// MapTiler static maps centred on the site
    Maptiler {
        #[serde(default)]
        api_key: String,
        #[serde(default = "default_map_style")]
        map_style: String,
    },
    /// ArcGIS World Imagery export with a Web Mercator bbox
    EsriExport {
        #[serde(default = "default_esri_endpoint")]
        endpoint: String,
    },
    /// No network: every site uses an image from `fallback_dir`
    Local,
}

impl ProviderConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Maptiler { .. } => "maptiler",
            ProviderConfig::EsriExport { .. } => "esri_export",
            ProviderConfig::Local => "local",
        }
    }
}

fn default_map_style() -> String {
    "satellite".to_string()
}

fn default_esri_endpoint() -> String {
    DEFAULT_ESRI_ENDPOINT.to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::EsriExport {
            endpoint: default_esri_endpoint(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageryConfig {
    pub provider: ProviderConfig,
    pub zoom: u32,
    pub width: u32,
    pub height: u32,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Initial retry delay (doubles each retry)
    pub retry_delay_ms: u64,
    /// Responses smaller than this are treated as error pages
    pub min_image_bytes: usize,
    /// Local sample images used when the network fetch fails
    pub fallback_dir: Option<PathBuf>,
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            zoom: 18,
            width: 600,
            height: 600,
            timeout_secs: 15,
            max_retries: 2,
            retry_delay_ms: 1000,
            min_image_bytes: 1000,
            fallback_dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Directory of `{sample_id}.json` detector outputs
    pub json_dir: Option<PathBuf>,
    /// External detector: program and arguments, `{image}` and
    /// `{sample_id}` are substituted
    pub command: Option<Vec<String>>,
    /// Detections scored below this are dropped
    pub min_confidence: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            json_dir: None,
            command: None,
            min_confidence: 0.15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub report_file: String,
    pub overlays: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("output"),
            report_file: "submission.json".to_string(),
            overlays: true,
        }
    }
}

impl OutputConfig {
    pub fn report_path(&self) -> PathBuf {
        self.dir.join(&self.report_file)
    }
}

impl InspectorConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: InspectorConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded inspector config");
        Ok(config)
    }

    /// Check settings that would make every site fail.
    pub fn validate(&self) -> Result<()> {
        let imagery = &self.imagery;
        if imagery.zoom > MAX_ZOOM {
            bail!(SolarError::InvalidZoom(imagery.zoom));
        }
        if imagery.width == 0 || imagery.height == 0 {
            bail!(
                "image size must be non-zero, got {}x{}",
                imagery.width,
                imagery.height
            );
        }
        if let ProviderConfig::Maptiler { api_key, .. } = &imagery.provider {
            if api_key.trim().is_empty() {
                bail!("maptiler provider requires an api_key (or MAPTILER_KEY)");
            }
        }
        if imagery.provider == ProviderConfig::Local && imagery.fallback_dir.is_none() {
            bail!("local provider requires imagery.fallback_dir");
        }
        if self.max_concurrent == 0 {
            bail!("max_concurrent must be at least 1");
        }
        if !(0.0..=1.0).contains(&self.detector.min_confidence) {
            bail!(
                "min_confidence must be in [0, 1], got {}",
                self.detector.min_confidence
            );
        }
        if self.detector.json_dir.is_none() && self.detector.command.is_none() {
            bail!("no detector configured: set detector.json_dir or detector.command");
        }
        if let Some(command) = &self.detector.command {
            if command.is_empty() {
                bail!("detector.command must name a program");
            }
        }
        Ok(())
    }
}
