// lib.rs - ZoneZwitch shared core

#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod capabilities;
pub mod config;
pub mod engine;
pub mod event;
pub mod model;
pub mod slider;
pub mod time;
pub mod zone;

use serde::{Deserialize, Serialize};

pub use app::App;
pub use capabilities::{Capabilities, Effect};
pub use config::{Accent, AppConfig};
pub use crux_core::App as CruxApp;
pub use engine::{SyncOutcome, SyncState, TimeSyncEngine, ZoneSide};
pub use event::Event;
pub use model::{Model, PanelState};
pub use slider::{DragOutcome, DraggableSlider, SliderLayout};
pub use time::{Clock, FixedClock, MinuteOfDay, SystemClock, UnixTimeMs};
pub use zone::Zone;

pub const NOW_BUTTON_LABEL: &str = "Now";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PanelView {
    pub visible: bool,
    pub width: f64,
    pub height: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ZoneRowView {
    pub label: String,
    pub time_text: String,
    pub minutes: f64,
    pub accent: Accent,
    pub is_dragging: bool,
    pub slider: Option<SliderLayout>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub panel: PanelView,
    pub source: ZoneRowView,
    pub target: ZoneRowView,
    pub now_button_label: String,
}

pub mod app {
    use super::*;
    use crate::capabilities::ClockResult;
    use crate::time::{read_clock, Instant};

    #[derive(Default)]
    pub struct App;

    impl App {
        /// Shell time if it answered sensibly, otherwise our own clock.
        fn instant_from(result: ClockResult) -> Instant {
            let reading = result.and_then(|output| {
                output
                    .now
                    .to_instant()
                    .ok_or(crate::time::ClockError::Unrepresentable(output.now.0))
            });
            match reading {
                Ok(instant) => instant,
                Err(e) => {
                    tracing::warn!(error = %e, "shell clock failed, reading system clock");
                    read_clock(&SystemClock)
                }
            }
        }

        fn apply_drag(
            model: &mut Model,
            side: ZoneSide,
            outcome: DragOutcome,
            caps: &Capabilities,
        ) {
            match outcome {
                DragOutcome::Unchanged => {}
                DragOutcome::Changed(value) => {
                    model.engine.set_minutes(side, value);
                    model.engine.sync_from(side);
                    tracing::debug!(
                        ?side,
                        to = ?side.opposite(),
                        minutes = value.value(),
                        "drag committed"
                    );
                    caps.render.render();
                }
                DragOutcome::Settled => {
                    model.engine.sync_from(side);
                    caps.render.render();
                }
            }
        }

        fn row(model: &Model, side: ZoneSide) -> ZoneRowView {
            let zone = model.engine.zone(side);
            let minutes = model.engine.minutes(side);
            let slider = model.slider(side);
            let zone_config = match side {
                ZoneSide::Source => &model.config.source,
                ZoneSide::Target => &model.config.target,
            };

            ZoneRowView {
                label: zone.label().to_string(),
                time_text: model.engine.time_text(side),
                minutes: minutes.value(),
                accent: zone_config.accent,
                is_dragging: slider.is_dragging(),
                slider: slider.layout(minutes),
            }
        }
    }

    impl crux_core::App for App {
        type Event = Event;
        type Model = Model;
        type ViewModel = ViewModel;
        type Capabilities = Capabilities;

        fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
            if event.is_user_initiated() {
                tracing::trace!(event = event.name(), "user action");
            }

            match event {
                Event::Mounted | Event::NowPressed => {
                    caps.clock.now(Event::NowSampled);
                }

                Event::NowSampled(result) => {
                    model.engine.resample_at(Self::instant_from(result));
                    caps.render.render();
                }

                Event::PanelToggled => {
                    model.panel = model.panel.toggled();
                    if model.panel.is_shown() {
                        caps.clock.now(Event::AnchorSampled);
                    }
                    caps.render.render();
                }

                Event::AnchorSampled(result) => {
                    model.engine.set_anchor(Self::instant_from(result));
                }

                Event::TrackResized { side, width } => {
                    model.slider_mut(side).set_track_width(width);
                    caps.render.render();
                }

                Event::SliderPressed { side } => {
                    let current = model.engine.minutes(side);
                    model.slider_mut(side).pointer_down(current);
                    // today may have rolled over while the panel sat open
                    caps.clock.now(Event::AnchorSampled);
                    caps.render.render();
                }

                Event::SliderDragged { side, x } => {
                    let current = model.engine.minutes(side);
                    let outcome = model.slider_mut(side).pointer_moved(x, current);
                    Self::apply_drag(model, side, outcome, caps);
                }

                Event::SliderReleased { side } => {
                    let current = model.engine.minutes(side);
                    let outcome = model.slider_mut(side).pointer_up(current);
                    Self::apply_drag(model, side, outcome, caps);
                    // is_dragging flipped either way
                    if outcome == DragOutcome::Unchanged {
                        caps.render.render();
                    }
                }
            }
        }

        fn view(&self, model: &Model) -> ViewModel {
            ViewModel {
                panel: PanelView {
                    visible: model.panel.is_shown(),
                    width: model.config.panel.width,
                    height: model.config.panel.height,
                },
                source: Self::row(model, ZoneSide::Source),
                target: Self::row(model, ZoneSide::Target),
                now_button_label: NOW_BUTTON_LABEL.to_string(),
            }
        }
    }
}
