use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::engine::ALERT_INTERVAL_SECS;
use crate::ingest::CameraConfig;

const DEFAULT_DEVICE: &str = "/dev/video0";
const DEFAULT_FPS: u32 = 10;
const DEFAULT_WIDTH: u32 = 640;
const DEFAULT_HEIGHT: u32 = 480;
const DEFAULT_MIRROR: bool = true;
const DEFAULT_SCREENSHOT_DIR: &str = "screenshots";

#[derive(Debug, Deserialize, Default)]
struct MonitorConfigFile {
    camera: Option<CameraConfigFile>,
    alert: Option<AlertConfigFile>,
    models: Option<ModelConfigFile>,
    screenshot_dir: Option<String>,
    font_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct CameraConfigFile {
    device: Option<String>,
    target_fps: Option<u32>,
    width: Option<u32>,
    height: Option<u32>,
    mirror: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
struct AlertConfigFile {
    interval_secs: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct ModelConfigFile {
    person: Option<PathBuf>,
    hand: Option<PathBuf>,
}

/// Resolved daemon configuration: JSON file (via `HANDWATCH_CONFIG`) with
/// per-field defaults, then environment overrides, then validation.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub camera: CameraConfig,
    pub alert_interval_secs: f64,
    pub screenshot_dir: String,
    pub person_model: Option<PathBuf>,
    pub hand_model: Option<PathBuf>,
    pub font_path: Option<PathBuf>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig {
                device: DEFAULT_DEVICE.to_string(),
                target_fps: DEFAULT_FPS,
                width: DEFAULT_WIDTH,
                height: DEFAULT_HEIGHT,
                mirror: DEFAULT_MIRROR,
            },
            alert_interval_secs: ALERT_INTERVAL_SECS,
            screenshot_dir: DEFAULT_SCREENSHOT_DIR.to_string(),
            person_model: None,
            hand_model: None,
            font_path: None,
        }
    }
}

impl MonitorConfig {
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("HANDWATCH_CONFIG").ok();
        let file_cfg = match config_path.as_deref() {
            Some(path) => Some(read_config_file(Path::new(path))?),
            None => None,
        };
        let mut cfg = Self::from_file(file_cfg.unwrap_or_default());
        cfg.apply_env()?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn from_file(file: MonitorConfigFile) -> Self {
        let camera = CameraConfig {
            device: file
                .camera
                .as_ref()
                .and_then(|camera| camera.device.clone())
                .unwrap_or_else(|| DEFAULT_DEVICE.to_string()),
            target_fps: file
                .camera
                .as_ref()
                .and_then(|camera| camera.target_fps)
                .unwrap_or(DEFAULT_FPS),
            width: file
                .camera
                .as_ref()
                .and_then(|camera| camera.width)
                .unwrap_or(DEFAULT_WIDTH),
            height: file
                .camera
                .as_ref()
                .and_then(|camera| camera.height)
                .unwrap_or(DEFAULT_HEIGHT),
            mirror: file
                .camera
                .as_ref()
                .and_then(|camera| camera.mirror)
                .unwrap_or(DEFAULT_MIRROR),
        };
        Self {
            camera,
            alert_interval_secs: file
                .alert
                .and_then(|alert| alert.interval_secs)
                .unwrap_or(ALERT_INTERVAL_SECS),
            screenshot_dir: file
                .screenshot_dir
                .unwrap_or_else(|| DEFAULT_SCREENSHOT_DIR.to_string()),
            person_model: file.models.as_ref().and_then(|models| models.person.clone()),
            hand_model: file.models.and_then(|models| models.hand),
            font_path: file.font_path,
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(device) = std::env::var("HANDWATCH_DEVICE") {
            if !device.trim().is_empty() {
                self.camera.device = device;
            }
        }
        if let Ok(dir) = std::env::var("HANDWATCH_SCREENSHOT_DIR") {
            if !dir.trim().is_empty() {
                self.screenshot_dir = dir;
            }
        }
        if let Ok(interval) = std::env::var("HANDWATCH_ALERT_INTERVAL_SECS") {
            let secs: f64 = interval.parse().map_err(|_| {
                anyhow!("HANDWATCH_ALERT_INTERVAL_SECS must be a number of seconds")
            })?;
            self.alert_interval_secs = secs;
        }
        if let Ok(path) = std::env::var("HANDWATCH_PERSON_MODEL") {
            if !path.trim().is_empty() {
                self.person_model = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var("HANDWATCH_HAND_MODEL") {
            if !path.trim().is_empty() {
                self.hand_model = Some(PathBuf::from(path));
            }
        }
        if let Ok(path) = std::env::var("HANDWATCH_FONT") {
            if !path.trim().is_empty() {
                self.font_path = Some(PathBuf::from(path));
            }
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.camera.device.trim().is_empty() {
            return Err(anyhow!("camera device must not be empty"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(anyhow!("camera dimensions must be non-zero"));
        }
        if !self.alert_interval_secs.is_finite() || self.alert_interval_secs <= 0.0 {
            return Err(anyhow!("alert interval must be a positive number of seconds"));
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<MonitorConfigFile> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
    let cfg = serde_json::from_str(&raw)
        .map_err(|e| anyhow!("invalid config file {}: {}", path.display(), e))?;
    Ok(cfg)
}
