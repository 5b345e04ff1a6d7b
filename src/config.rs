use crate::graphics::OrthoVolume;
use crate::state::Motion;
use crate::vertex::Color;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Smallest accepted width or height of the view volume, in world units
const MIN_VIEW_EXTENT: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Size of the window the layout was designed for
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        WindowConfig {
            width: 800,
            height: 600,
        }
    }
}

/// Session settings consumed by the host loop
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub title: String,
    /// Timer period in milliseconds
    pub tick_ms: u64,
    pub background: Color,
    pub window: WindowConfig,
    pub view: OrthoVolume,
    pub motion: Motion,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            title: "Doraemon".to_owned(),
            tick_ms: 80,
            background: Color::rgb(1.0, 1.0, 0.8),
            window: WindowConfig::default(),
            view: OrthoVolume::default(),
            motion: Motion::default(),
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: SessionConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".into()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(
                "window width and height must be positive".into(),
            ));
        }
        let v = &self.view;
        let (width, height) = (v.right - v.left, v.top - v.bottom);
        let usable = |extent: f64| extent.is_finite() && extent >= MIN_VIEW_EXTENT;
        if !(usable(width) && usable(height)) {
            return Err(ConfigError::Invalid(format!(
                "view planes must be finite and satisfy left < right and bottom < top \
                 by at least {MIN_VIEW_EXTENT} (got {}, {}, {}, {})",
                v.left, v.right, v.bottom, v.top
            )));
        }
        let m = &self.motion;
        if m.leg_min > m.leg_max {
            return Err(ConfigError::Invalid(format!(
                "motion.leg_min ({}) exceeds motion.leg_max ({})",
                m.leg_min, m.leg_max
            )));
        }
        for (name, value) in [
            ("motion.scale_speed", m.scale_speed),
            ("motion.scale_ceiling", m.scale_ceiling),
            ("motion.sway_step", m.sway_step),
            ("motion.sway_limit", m.sway_limit),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!("{name} must be positive")));
            }
        }
        if !m.angular_speed.is_finite() || !m.gait_frequency.is_finite() {
            return Err(ConfigError::Invalid(
                "motion.angular_speed and motion.gait_frequency must be finite".into(),
            ));
        }
        Ok(())
    }
}
