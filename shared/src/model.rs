use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, ConfigError};
use crate::engine::{TimeSyncEngine, ZoneSide};
use crate::slider::DraggableSlider;

#[derive(Default, Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PanelState {
    #[default]
    Hidden,
    Shown,
}

impl PanelState {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    #[must_use]
    pub const fn is_shown(self) -> bool {
        matches!(self, Self::Shown)
    }
}

/// Lives exactly as long as the core instance; nothing is persisted.
#[derive(Debug, Clone)]
pub struct Model {
    pub config: AppConfig,
    pub engine: TimeSyncEngine,
    pub source_slider: DraggableSlider,
    pub target_slider: DraggableSlider,
    pub panel: PanelState,
}

impl Default for Model {
    fn default() -> Self {
        Self::from_valid_config(AppConfig::default())
    }
}

impl Model {
    pub fn with_config(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: AppConfig) -> Self {
        Self {
            engine: TimeSyncEngine::from_config(&config),
            source_slider: DraggableSlider::new(config.slider),
            target_slider: DraggableSlider::new(config.slider),
            panel: PanelState::Hidden,
            config,
        }
    }

    #[must_use]
    pub fn slider(&self, side: ZoneSide) -> &DraggableSlider {
        match side {
            ZoneSide::Source => &self.source_slider,
            ZoneSide::Target => &self.target_slider,
        }
    }

    pub fn slider_mut(&mut self, side: ZoneSide) -> &mut DraggableSlider {
        match side {
            ZoneSide::Source => &mut self.source_slider,
            ZoneSide::Target => &mut self.target_slider,
        }
    }
}
