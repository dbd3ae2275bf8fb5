use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::detect::{DetectorConfig, DEFAULT_STEADY_THRESHOLD, DEFAULT_TIME_TO_TRIGGER};
use crate::ingest::{SourceConfig, DEFAULT_TARGET_FPS};

const DEFAULT_SOURCE_URL: &str = "stub://steady";
const DEFAULT_FRAME_WIDTH: u32 = 640;
const DEFAULT_FRAME_HEIGHT: u32 = 480;
const DEFAULT_CMS_DATASET: &str = "production";
const DEFAULT_CMS_API_VERSION: &str = "2023-05-03";
const DEFAULT_CMS_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_PRIMARY_LIMIT: usize = 3;
const DEFAULT_SECONDARY_LIMIT: usize = 2;
/// Project id that means "no CMS; use the built-in content".
pub const PLACEHOLDER_PROJECT_ID: &str = "mock_id";

#[derive(Debug, Deserialize, Default)]
struct HolohandConfigFile {
    source: Option<SourceConfigFile>,
    detector: Option<DetectorConfigFile>,
    cms: Option<CmsConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
struct SourceConfigFile {
    url: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Deserialize, Default)]
struct DetectorConfigFile {
    steady_threshold: Option<f32>,
    time_to_trigger_ms: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct CmsConfigFile {
    project_id: Option<String>,
    dataset: Option<String>,
    api_version: Option<String>,
    use_cdn: Option<bool>,
    token: Option<String>,
    timeout_ms: Option<u64>,
    primary_limit: Option<usize>,
    secondary_limit: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct HolohandConfig {
    pub source: SourceSettings,
    pub detector: DetectorConfig,
    pub cms: CmsSettings,
}

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub url: String,
    pub target_fps: u32,
    pub width: u32,
    pub height: u32,
}

impl SourceSettings {
    pub fn to_source_config(&self, duration: Option<Duration>, fingers: u8) -> SourceConfig {
        SourceConfig {
            url: self.url.clone(),
            target_fps: self.target_fps,
            width: self.width,
            height: self.height,
            duration,
            fingers,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmsSettings {
    /// `None` or the placeholder id selects the built-in content.
    pub project_id: Option<String>,
    pub dataset: String,
    pub api_version: String,
    pub use_cdn: bool,
    /// Optional read token, sent as a bearer token.
    pub token: Option<String>,
    pub timeout: Duration,
    pub primary_limit: usize,
    pub secondary_limit: usize,
}

impl Default for CmsSettings {
    fn default() -> Self {
        Self {
            project_id: None,
            dataset: DEFAULT_CMS_DATASET.to_string(),
            api_version: DEFAULT_CMS_API_VERSION.to_string(),
            use_cdn: true,
            token: None,
            timeout: Duration::from_millis(DEFAULT_CMS_TIMEOUT_MS),
            primary_limit: DEFAULT_PRIMARY_LIMIT,
            secondary_limit: DEFAULT_SECONDARY_LIMIT,
        }
    }
}

impl CmsSettings {
    /// True when real CMS credentials are present.
    pub fn is_configured(&self) -> bool {
        match self.project_id.as_deref().map(str::trim) {
            Some(id) => !id.is_empty() && id != PLACEHOLDER_PROJECT_ID,
            None => false,
        }
    }
}

impl HolohandConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("HOLOHAND_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) if !path.trim().is_empty() => Some(read_config_file(Path::new(path))?),
            _ => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: HolohandConfigFile) -> Self {
        let source_file = file.source.unwrap_or_default();
        let source = SourceSettings {
            url: source_file
                .url
                .unwrap_or_else(|| DEFAULT_SOURCE_URL.to_string()),
            target_fps: source_file.target_fps.unwrap_or(DEFAULT_TARGET_FPS),
            width: source_file.width.unwrap_or(DEFAULT_FRAME_WIDTH),
            height: source_file.height.unwrap_or(DEFAULT_FRAME_HEIGHT),
        };

        let detector_file = file.detector.unwrap_or_default();
        let detector = DetectorConfig {
            steady_threshold: detector_file
                .steady_threshold
                .unwrap_or(DEFAULT_STEADY_THRESHOLD),
            time_to_trigger: detector_file
                .time_to_trigger_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIME_TO_TRIGGER),
        };

        let cms_file = file.cms.unwrap_or_default();
        let defaults = CmsSettings::default();
        let cms = CmsSettings {
            project_id: cms_file.project_id,
            dataset: cms_file.dataset.unwrap_or(defaults.dataset),
            api_version: cms_file.api_version.unwrap_or(defaults.api_version),
            use_cdn: cms_file.use_cdn.unwrap_or(defaults.use_cdn),
            token: cms_file.token,
            timeout: cms_file
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            primary_limit: cms_file.primary_limit.unwrap_or(defaults.primary_limit),
            secondary_limit: cms_file.secondary_limit.unwrap_or(defaults.secondary_limit),
        };

        Self {
            source,
            detector,
            cms,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Some(url) = env_non_empty("HOLOHAND_SOURCE") {
            self.source.url = url;
        }
        if let Some(fps) = env_non_empty("HOLOHAND_TARGET_FPS") {
            self.source.target_fps = fps
                .parse()
                .map_err(|_| anyhow!("HOLOHAND_TARGET_FPS must be a whole number"))?;
        }
        if let Some(threshold) = env_non_empty("HOLOHAND_STEADY_THRESHOLD") {
            self.detector.steady_threshold = threshold
                .parse()
                .map_err(|_| anyhow!("HOLOHAND_STEADY_THRESHOLD must be a number"))?;
        }
        if let Some(ms) = env_non_empty("HOLOHAND_TIME_TO_TRIGGER_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                anyhow!("HOLOHAND_TIME_TO_TRIGGER_MS must be an integer number of milliseconds")
            })?;
            self.detector.time_to_trigger = Duration::from_millis(ms);
        }
        if let Some(project_id) = env_non_empty("HOLOHAND_CMS_PROJECT_ID") {
            self.cms.project_id = Some(project_id);
        }
        if let Some(dataset) = env_non_empty("HOLOHAND_CMS_DATASET") {
            self.cms.dataset = dataset;
        }
        if let Some(token) = env_non_empty("HOLOHAND_CMS_TOKEN") {
            self.cms.token = Some(token);
        }
        if let Some(use_cdn) = env_non_empty("HOLOHAND_CMS_USE_CDN") {
            self.cms.use_cdn = use_cdn
                .parse()
                .map_err(|_| anyhow!("HOLOHAND_CMS_USE_CDN must be true or false"))?;
        }
        if let Some(ms) = env_non_empty("HOLOHAND_CMS_TIMEOUT_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                anyhow!("HOLOHAND_CMS_TIMEOUT_MS must be an integer number of milliseconds")
            })?;
            self.cms.timeout = Duration::from_millis(ms);
        }
        Ok(())
    }

    fn validate(&mut self) -> Result<()> {
        self.detector.validate()?;
        if self.source.url.trim().is_empty() {
            return Err(anyhow!("source url must not be empty"));
        }
        if self.source.target_fps == 0 {
            return Err(anyhow!("target fps must be >= 1"));
        }
        if self.source.width == 0 || self.source.height == 0 {
            return Err(anyhow!("frame size must be non-zero"));
        }
        self.cms.dataset = self.cms.dataset.trim().to_string();
        if self.cms.dataset.is_empty() {
            return Err(anyhow!("cms dataset must not be empty"));
        }
        if self.cms.timeout.is_zero() {
            return Err(anyhow!("cms timeout must be greater than zero"));
        }
        if self.cms.primary_limit == 0 || self.cms.secondary_limit == 0 {
            return Err(anyhow!("cms item limits must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for HolohandConfig {
    fn default() -> Self {
        Self::from_file(HolohandConfigFile::default())
    }
}

fn read_config_file(path: &Path) -> Result<HolohandConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let cfg = if is_toml {
        toml::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    } else {
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?
    };
    Ok(cfg)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
