use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    pub fn load_toml(path: impl AsRef<Path>) -> CoreResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CoreError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        Ok(toml::from_str(text)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
    #[serde(default = "default_client_aspect")]
    pub client_aspect: f32,
}

fn default_title() -> String { "Third Person Locomotion".to_string() }
fn default_width() -> u32 { 1600 }
fn default_height() -> u32 { 800 }
fn default_client_aspect() -> f32 { 2.0 }

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
            client_aspect: default_client_aspect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Upper bound for the raw delta fed to the root clock.
    #[serde(default = "default_max_dt_ms")]
    pub max_dt_ms: u32,
    #[serde(default = "default_log_fps")]
    pub log_fps: bool,
    #[serde(default = "default_fps_period_ms")]
    pub fps_log_period_ms: u32,
}

fn default_max_dt_ms() -> u32 { 100 }
fn default_log_fps() -> bool { true }
fn default_fps_period_ms() -> u32 { 1000 }

impl FrameConfig {
    #[inline]
    pub fn max_dt_sec(&self) -> f32 {
        (self.max_dt_ms as f32 / 1000.0).max(0.001)
    }

    #[inline]
    pub fn fps_log_period_sec(&self) -> f32 {
        (self.fps_log_period_ms as f32 / 1000.0).max(0.25)
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_dt_ms: default_max_dt_ms(),
            log_fps: default_log_fps(),
            fps_log_period_ms: default_fps_period_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
}

fn default_fov() -> f32 { 60.0 }
fn default_near() -> f32 { 0.1 }
fn default_far() -> f32 { 100.0 }

impl Default for CameraConfig {
    fn default() -> Self {
        Self { fov_degrees: default_fov(), near: default_near(), far: default_far() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// "poll" or "wait"
    #[serde(default = "default_control_flow")]
    pub control_flow: String,
}

fn default_control_flow() -> String { "poll".to_string() }

impl RuntimeConfig {
    #[inline]
    pub fn is_poll(&self) -> bool {
        self.control_flow.trim().eq_ignore_ascii_case("poll")
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { control_flow: default_control_flow() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Any `log::LevelFilter` name ("off", "error", ... "trace").
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_true")]
    pub colors: bool,
    #[serde(default = "default_true")]
    pub include_module: bool,
}

fn default_level() -> String { "info".to_string() }
fn default_true() -> bool { true }

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: default_level(), colors: true, include_module: true }
    }
}
