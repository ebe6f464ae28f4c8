//! Horizontal minute-of-day slider: 0..=1440 across the track, hour ticks,
//! and a handle that snaps to whole steps.
//!
//! The slider never owns the value it edits. Every handler takes the current
//! bound value and returns a [`DragOutcome`]; the caller writes the value and
//! runs the cross-zone sync. Nothing here calls back into the caller, so a
//! change can never re-enter the same drag handler.

use serde::{Deserialize, Serialize};

use crate::config::SliderConfig;
use crate::time::{MinuteOfDay, MINUTES_PER_DAY};

pub const HOURS_ON_TRACK: u8 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging {
        last_committed: MinuteOfDay,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    Unchanged,
    /// Write this value and sync the other zone.
    Changed(MinuteOfDay),
    /// The drag ended away from where it started; sync once more.
    Settled,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    pub hour: u8,
    pub x: f64,
    pub height: f64,
    pub major: bool,
}

/// Geometry the shell draws from. Units are whatever the shell measured the
/// track in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SliderLayout {
    pub track_width: f64,
    pub track_height: f64,
    pub fill_width: f64,
    pub handle_diameter: f64,
    pub handle_offset: f64,
    pub ticks: Vec<Tick>,
}

/// Rounds `raw` to the nearest multiple of `step`; halves round away from zero.
#[must_use]
pub fn snap(raw: f64, step: f64) -> f64 {
    (raw / step).round() * step
}

#[derive(Debug, Clone, Default)]
pub struct DraggableSlider {
    config: SliderConfig,
    track_width: f64,
    phase: DragPhase,
}

impl DraggableSlider {
    #[must_use]
    pub fn new(config: SliderConfig) -> Self {
        Self {
            config,
            track_width: 0.0,
            phase: DragPhase::Idle,
        }
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging { .. })
    }

    #[must_use]
    pub fn track_width(&self) -> f64 {
        self.track_width
    }

    /// Negative or non-finite widths read as "not laid out yet".
    pub fn set_track_width(&mut self, width: f64) {
        self.track_width = if width.is_finite() && width > 0.0 {
            width
        } else {
            0.0
        };
    }

    pub fn pointer_down(&mut self, current: MinuteOfDay) {
        if let DragPhase::Idle = self.phase {
            self.phase = DragPhase::Dragging {
                last_committed: current,
            };
        }
    }

    /// `x` is the pointer position in track coordinates.
    pub fn pointer_moved(&mut self, x: f64, current: MinuteOfDay) -> DragOutcome {
        self.pointer_down(current);

        if self.track_width <= 0.0 || !x.is_finite() {
            return DragOutcome::Unchanged;
        }

        let raw = (x / self.track_width * MINUTES_PER_DAY).clamp(0.0, MINUTES_PER_DAY);
        let step = self.config.snap_minutes;
        let snapped = MinuteOfDay::clamped(snap(raw, step));
        tracing::trace!(x, raw, snapped = snapped.value(), "slider moved");

        if snapped.distance(current) >= step {
            DragOutcome::Changed(snapped)
        } else {
            DragOutcome::Unchanged
        }
    }

    pub fn pointer_up(&mut self, current: MinuteOfDay) -> DragOutcome {
        let DragPhase::Dragging { last_committed } = std::mem::take(&mut self.phase) else {
            return DragOutcome::Unchanged;
        };
        if current.distance(last_committed) >= self.config.snap_minutes {
            DragOutcome::Settled
        } else {
            DragOutcome::Unchanged
        }
    }

    /// `None` until the shell has reported a track width.
    #[must_use]
    pub fn layout(&self, value: MinuteOfDay) -> Option<SliderLayout> {
        if self.track_width <= 0.0 {
            return None;
        }
        let width = self.track_width;
        let fill_width = value.day_fraction() * width;
        let major_every = self.config.major_tick_every.max(1);

        let ticks = (0..=HOURS_ON_TRACK)
            .map(|hour| {
                let major = hour % major_every == 0;
                Tick {
                    hour,
                    x: f64::from(hour) * width / f64::from(HOURS_ON_TRACK),
                    height: if major {
                        self.config.major_tick_height
                    } else {
                        self.config.minor_tick_height
                    },
                    major,
                }
            })
            .collect();

        Some(SliderLayout {
            track_width: width,
            track_height: self.config.track_height,
            fill_width,
            handle_diameter: self.config.handle_diameter,
            handle_offset: fill_width - self.config.handle_diameter / 2.0,
            ticks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// One pixel per minute keeps pointer maths readable.
    fn minute_track() -> DraggableSlider {
        let mut slider = DraggableSlider::new(SliderConfig::default());
        slider.set_track_width(1440.0);
        slider
    }

    fn m(value: f64) -> MinuteOfDay {
        MinuteOfDay::new(value).unwrap()
    }

    #[test]
    fn snaps_to_nearest_five() {
        let mut slider = minute_track();
        assert_eq!(slider.pointer_moved(127.0, m(0.0)), DragOutcome::Changed(m(125.0)));
        assert_eq!(slider.pointer_moved(128.0, m(0.0)), DragOutcome::Changed(m(130.0)));
    }

    #[test]
    fn small_moves_are_suppressed() {
        let mut slider = minute_track();
        slider.pointer_down(m(100.0));
        assert_eq!(slider.pointer_moved(102.0, m(100.0)), DragOutcome::Unchanged);
        // Snaps to 105 from an off-grid 101: four minutes away.
        assert_eq!(slider.pointer_moved(104.0, m(101.0)), DragOutcome::Unchanged);
        assert_eq!(slider.pointer_moved(105.0, m(100.0)), DragOutcome::Changed(m(105.0)));
    }

    #[test]
    fn clamps_outside_track() {
        let mut slider = minute_track();
        assert_eq!(slider.pointer_moved(-50.0, m(600.0)), DragOutcome::Changed(m(0.0)));
        assert_eq!(
            slider.pointer_moved(9000.0, m(600.0)),
            DragOutcome::Changed(MinuteOfDay::END_OF_DAY)
        );
    }

    #[test]
    fn scales_with_track_width() {
        let mut slider = DraggableSlider::new(SliderConfig::default());
        slider.set_track_width(310.0);
        // Half the track is noon.
        assert_eq!(slider.pointer_moved(155.0, m(0.0)), DragOutcome::Changed(m(720.0)));
    }

    #[test]
    fn unmeasured_track_ignores_moves() {
        let mut slider = DraggableSlider::new(SliderConfig::default());
        assert_eq!(slider.pointer_moved(100.0, m(0.0)), DragOutcome::Unchanged);
        slider.set_track_width(f64::NAN);
        assert_eq!(slider.pointer_moved(100.0, m(0.0)), DragOutcome::Unchanged);
        assert!(slider.layout(m(0.0)).is_none());
    }

    #[test]
    fn drag_state_machine() {
        let mut slider = minute_track();
        assert_eq!(slider.phase(), DragPhase::Idle);

        slider.pointer_down(m(300.0));
        assert_eq!(
            slider.phase(),
            DragPhase::Dragging {
                last_committed: m(300.0)
            }
        );

        // A second press mid-drag keeps the original start.
        slider.pointer_down(m(500.0));
        assert_eq!(
            slider.phase(),
            DragPhase::Dragging {
                last_committed: m(300.0)
            }
        );

        assert_eq!(slider.pointer_up(m(310.0)), DragOutcome::Settled);
        assert_eq!(slider.phase(), DragPhase::Idle);
    }

    #[test]
    fn release_near_start_is_quiet() {
        let mut slider = minute_track();
        slider.pointer_down(m(300.0));
        assert_eq!(slider.pointer_up(m(303.0)), DragOutcome::Unchanged);
        assert_eq!(slider.pointer_up(m(900.0)), DragOutcome::Unchanged);
    }

    #[test]
    fn first_move_starts_a_drag() {
        let mut slider = minute_track();
        slider.pointer_moved(700.0, m(640.0));
        assert_eq!(
            slider.phase(),
            DragPhase::Dragging {
                last_committed: m(640.0)
            }
        );
    }

    #[test]
    fn layout_places_ticks_and_handle() {
        let mut slider = DraggableSlider::new(SliderConfig::default());
        slider.set_track_width(240.0);

        let layout = slider.layout(m(720.0)).unwrap();
        assert_eq!(layout.fill_width, 120.0);
        assert_eq!(layout.handle_offset, 110.0);
        assert_eq!(layout.ticks.len(), 25);
        assert_eq!(layout.ticks[1].x, 10.0);
        assert_eq!(layout.ticks[24].x, 240.0);

        let majors: Vec<u8> = layout.ticks.iter().filter(|t| t.major).map(|t| t.hour).collect();
        assert_eq!(majors, vec![0, 6, 12, 18, 24]);
        assert_eq!(layout.ticks[6].height, 12.0);
        assert_eq!(layout.ticks[7].height, 6.0);
    }

    #[test]
    fn handle_stays_centred_at_extremes() {
        let mut slider = DraggableSlider::new(SliderConfig::default());
        slider.set_track_width(300.0);
        assert_eq!(slider.layout(m(0.0)).unwrap().handle_offset, -10.0);
        assert_eq!(
            slider.layout(MinuteOfDay::END_OF_DAY).unwrap().handle_offset,
            290.0
        );
    }

    proptest! {
        #[test]
        fn committed_values_are_on_the_grid(x in -100.0f64..1600.0, current in 0.0f64..1440.0) {
            let mut slider = minute_track();
            if let DragOutcome::Changed(v) = slider.pointer_moved(x, m(current)) {
                prop_assert_eq!(v.value() % 5.0, 0.0);
                prop_assert!((0.0..=1440.0).contains(&v.value()));
                prop_assert!(v.distance(m(current)) >= 5.0);
            }
        }
    }
}
