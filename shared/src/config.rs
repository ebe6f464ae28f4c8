use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub const DEFAULT_PANEL_WIDTH: f64 = 350.0;
pub const DEFAULT_PANEL_HEIGHT: f64 = 220.0;
pub const DEFAULT_SNAP_MINUTES: f64 = 5.0;
pub const DEFAULT_HANDLE_DIAMETER: f64 = 20.0;
pub const DEFAULT_TRACK_HEIGHT: f64 = 8.0;
pub const DEFAULT_MAJOR_TICK_EVERY: u8 = 6;
pub const DEFAULT_MAJOR_TICK_HEIGHT: f64 = 12.0;
pub const DEFAULT_MINOR_TICK_HEIGHT: f64 = 6.0;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("snap step must be positive and finite, got {0}")]
    InvalidSnap(f64),
    #[error("panel size must be positive, got {width}x{height}")]
    InvalidPanel { width: f64, height: f64 },
    #[error("handle diameter must be non-negative, got {0}")]
    InvalidHandle(f64),
    #[error("major tick interval must be non-zero")]
    ZeroTickInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    Blue,
    Orange,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneConfig {
    /// Abbreviation or IANA id tried first.
    pub name: String,
    /// IANA id used when `name` does not resolve.
    pub fallback: String,
    pub label: String,
    pub accent: Accent,
}

impl ZoneConfig {
    #[must_use]
    pub fn eastern() -> Self {
        Self {
            name: "EST".into(),
            fallback: "America/New_York".into(),
            label: "EST".into(),
            accent: Accent::Blue,
        }
    }

    #[must_use]
    pub fn india() -> Self {
        Self {
            name: "Asia/Kolkata".into(),
            fallback: "Asia/Kolkata".into(),
            label: "IST".into(),
            accent: Accent::Orange,
        }
    }
}

/// A zone entry as written in config: any field left out keeps the value
/// of the side's default zone.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ZoneOverrides {
    name: Option<String>,
    fallback: Option<String>,
    label: Option<String>,
    accent: Option<Accent>,
}

impl ZoneOverrides {
    fn over(self, base: ZoneConfig) -> ZoneConfig {
        ZoneConfig {
            name: self.name.unwrap_or(base.name),
            fallback: self.fallback.unwrap_or(base.fallback),
            label: self.label.unwrap_or(base.label),
            accent: self.accent.unwrap_or(base.accent),
        }
    }
}

fn source_zone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ZoneConfig, D::Error> {
    ZoneOverrides::deserialize(deserializer).map(|o| o.over(ZoneConfig::eastern()))
}

fn target_zone<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ZoneConfig, D::Error> {
    ZoneOverrides::deserialize(deserializer).map(|o| o.over(ZoneConfig::india()))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    pub snap_minutes: f64,
    pub handle_diameter: f64,
    pub track_height: f64,
    pub major_tick_every: u8,
    pub major_tick_height: f64,
    pub minor_tick_height: f64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            snap_minutes: DEFAULT_SNAP_MINUTES,
            handle_diameter: DEFAULT_HANDLE_DIAMETER,
            track_height: DEFAULT_TRACK_HEIGHT,
            major_tick_every: DEFAULT_MAJOR_TICK_EVERY,
            major_tick_height: DEFAULT_MAJOR_TICK_HEIGHT,
            minor_tick_height: DEFAULT_MINOR_TICK_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub width: f64,
    pub height: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_PANEL_WIDTH,
            height: DEFAULT_PANEL_HEIGHT,
        }
    }
}

/// Everything the core needs to know up front. The shell supplies nothing;
/// the defaults describe the Eastern/India pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(deserialize_with = "source_zone")]
    pub source: ZoneConfig,
    #[serde(deserialize_with = "target_zone")]
    pub target: ZoneConfig,
    pub slider: SliderConfig,
    pub panel: PanelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: ZoneConfig::eastern(),
            target: ZoneConfig::india(),
            slider: SliderConfig::default(),
            panel: PanelConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let snap = self.slider.snap_minutes;
        if !snap.is_finite() || snap <= 0.0 {
            return Err(ConfigError::InvalidSnap(snap));
        }
        let handle = self.slider.handle_diameter;
        if !handle.is_finite() || handle < 0.0 {
            return Err(ConfigError::InvalidHandle(handle));
        }
        if self.slider.major_tick_every == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        let PanelConfig { width, height } = self.panel;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::InvalidPanel { width, height });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_eastern_and_india() {
        let config = AppConfig::default();
        assert_eq!(config.source.label, "EST");
        assert_eq!(config.target.label, "IST");
        assert_eq!(config.panel.width, 350.0);
        assert_eq!(config.panel.height, 220.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_snap() {
        let mut config = AppConfig::default();
        config.slider.snap_minutes = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidSnap(0.0)));
        config.slider.snap_minutes = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSnap(_))));
    }

    #[test]
    fn rejects_bad_panel_and_ticks() {
        let mut config = AppConfig::default();
        config.panel.height = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPanel { .. })
        ));

        let mut config = AppConfig::default();
        config.slider.major_tick_every = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroTickInterval));

        let mut config = AppConfig::default();
        config.slider.handle_diameter = -1.0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidHandle(-1.0)));
        config.slider.handle_diameter = f64::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHandle(_))
        ));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{ "panel": { "width": 400.0 } }"#).unwrap();
        assert_eq!(config.panel.width, 400.0);
        assert_eq!(config.panel.height, 220.0);
        assert_eq!(config.source, ZoneConfig::eastern());
    }

    #[test]
    fn partial_zone_entries_fill_from_their_side() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "source": { "label": "ET" }, "target": { "accent": "blue" } }"#,
        )
        .unwrap();
        assert_eq!(config.source.label, "ET");
        assert_eq!(config.source.name, "EST");
        assert_eq!(config.source.fallback, "America/New_York");
        assert_eq!(config.source.accent, Accent::Blue);

        assert_eq!(config.target.name, "Asia/Kolkata");
        assert_eq!(config.target.label, "IST");
        assert_eq!(config.target.accent, Accent::Blue);
    }

    #[test]
    fn full_config_survives_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
