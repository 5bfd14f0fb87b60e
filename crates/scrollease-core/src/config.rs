use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::easing::{EasingFn, EasingType};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Defaults applied when a scroll call leaves duration or easing out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Animation duration in frame-clock units (milliseconds in browsers)
    #[serde(default = "default_duration_ms")]
    pub duration_ms: f64,
    /// Easing curve
    #[serde(default)]
    pub easing: EasingType,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_duration_ms(),
            easing: EasingType::default(),
        }
    }
}

impl ScrollConfig {
    pub fn easing_fn(&self) -> EasingFn {
        self.easing.function()
    }
}

/// Surface and frame rate used by the simulator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Simulated display refresh rate
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,
    #[serde(default = "default_viewport_width")]
    pub document_width: f64,
    #[serde(default = "default_document_height")]
    pub document_height: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            document_width: default_viewport_width(),
            document_height: default_document_height(),
        }
    }
}

impl SimulationConfig {
    /// Milliseconds between simulated frames
    pub fn frame_interval_ms(&self) -> f64 {
        if self.fps == 0 {
            1000.0 / 60.0 // ~60fps fallback
        } else {
            1000.0 / self.fps as f64
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_duration_ms() -> f64 {
    300.0
}

fn default_fps() -> u32 {
    60
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    800.0
}

fn default_document_height() -> f64 {
    4000.0
}

impl AppConfig {
    /// Load configuration from file or return defaults
    pub fn load() -> crate::Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> crate::Result<String> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Get the configuration file path
    /// Always uses ~/.config/scrollease/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("scrollease")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.scroll.duration_ms, 300.0);
        assert_eq!(config.scroll.easing, EasingType::CubicInOut);
        assert_eq!(config.simulation.fps, 60);
        assert_eq!(config.general.log_level, "info");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml(
            r#"
            [scroll]
            easing = "linear"

            [simulation]
            fps = 120
            "#,
        )
        .unwrap();
        assert_eq!(config.scroll.easing, EasingType::Linear);
        assert_eq!(config.scroll.duration_ms, 300.0);
        assert_eq!(config.simulation.fps, 120);
        assert_eq!(config.simulation.document_height, 4000.0);
    }

    #[test]
    fn test_unknown_easing_is_config_error() {
        let err = AppConfig::from_toml("[scroll]\neasing = \"bounce\"\n").unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.scroll.duration_ms = 450.0;
        config.scroll.easing = EasingType::CubicOut;
        let parsed = AppConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.scroll, config.scroll);
    }

    #[test]
    fn test_frame_interval() {
        let mut sim = SimulationConfig::default();
        assert!((sim.frame_interval_ms() - 16.666).abs() < 0.01);
        sim.fps = 0;
        assert!((sim.frame_interval_ms() - 16.666).abs() < 0.01);
        sim.fps = 100;
        assert_eq!(sim.frame_interval_ms(), 10.0);
    }
}
