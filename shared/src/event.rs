use serde::{Deserialize, Serialize};

use crate::capabilities::ClockResult;
use crate::engine::ZoneSide;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Mounted,
    PanelToggled,

    // Time
    NowPressed,

    // Slider input, x in track coordinates
    TrackResized { side: ZoneSide, width: f64 },
    SliderPressed { side: ZoneSide },
    SliderDragged { side: ZoneSide, x: f64 },
    SliderReleased { side: ZoneSide },

    // Capability responses
    #[serde(skip)]
    NowSampled(ClockResult),
    #[serde(skip)]
    AnchorSampled(ClockResult),
}

impl Event {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mounted => "mounted",
            Self::PanelToggled => "panel_toggled",
            Self::NowPressed => "now_pressed",
            Self::TrackResized { .. } => "track_resized",
            Self::SliderPressed { .. } => "slider_pressed",
            Self::SliderDragged { .. } => "slider_dragged",
            Self::SliderReleased { .. } => "slider_released",
            Self::NowSampled(_) => "now_sampled",
            Self::AnchorSampled(_) => "anchor_sampled",
        }
    }

    #[must_use]
    pub const fn is_user_initiated(&self) -> bool {
        matches!(
            self,
            Self::PanelToggled
                | Self::NowPressed
                | Self::SliderPressed { .. }
                | Self::SliderDragged { .. }
                | Self::SliderReleased { .. }
        )
    }
}
