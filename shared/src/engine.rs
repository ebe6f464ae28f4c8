//! Keeps the two zone rows pointing at the same instant.
//!
//! Each row stores only a minute of day. To move a value across zones the
//! engine pins the minute onto today's calendar in its own zone, takes the
//! resulting instant, and reads that instant back in the other zone. Offsets,
//! including half-hour ones and DST, come from the tz database and are never
//! added by hand.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::time::{read_clock, Clock, Instant, MinuteOfDay};
use crate::zone::{Zone, ZoneError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneSide {
    Source,
    Target,
}

impl ZoneSide {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Source => Self::Target,
            Self::Target => Self::Source,
        }
    }
}

/// Which cross-update, if any, is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Idle,
    SyncingFromSource,
    SyncingFromTarget,
}

impl SyncState {
    const fn from_side(side: ZoneSide) -> Self {
        match side {
            ZoneSide::Source => Self::SyncingFromSource,
            ZoneSide::Target => Self::SyncingFromTarget,
        }
    }
}

/// Holds a sync slot for its lifetime and hands it back on drop.
struct SyncGuard<'a> {
    state: &'a mut SyncState,
}

impl<'a> SyncGuard<'a> {
    fn enter(state: &'a mut SyncState, next: SyncState) -> Option<Self> {
        if *state != SyncState::Idle {
            return None;
        }
        *state = next;
        Some(Self { state })
    }
}

impl Drop for SyncGuard<'_> {
    fn drop(&mut self) {
        *self.state = SyncState::Idle;
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyncOutcome {
    /// The opposite side now holds this value.
    Applied(MinuteOfDay),
    /// Another sync was in flight; nothing changed.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("no calendar day follows {0}")]
    DateOutOfRange(NaiveDate),
    #[error("{hour}:{minute:02} is not a wall-clock time")]
    InvalidWallClock { hour: u32, minute: u32 },
    #[error(transparent)]
    Zone(#[from] ZoneError),
}

#[derive(Debug, Clone)]
pub struct TimeSyncEngine {
    source: Zone,
    target: Zone,
    source_minutes: MinuteOfDay,
    target_minutes: MinuteOfDay,
    /// Last sampled instant; its date in a zone is "today" for that zone.
    anchor: Instant,
    state: SyncState,
}

impl Default for TimeSyncEngine {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl TimeSyncEngine {
    /// Both rows start at the Unix epoch until the first resample.
    pub fn new(source: Zone, target: Zone) -> Self {
        let anchor = Instant::default();
        Self {
            source_minutes: source.minutes_at(anchor),
            target_minutes: target.minutes_at(anchor),
            source,
            target,
            anchor,
            state: SyncState::Idle,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let source = Zone::resolve(
            &config.source.name,
            &config.source.fallback,
            config.source.label.clone(),
        );
        let target = Zone::resolve(
            &config.target.name,
            &config.target.fallback,
            config.target.label.clone(),
        );
        Self::new(source, target)
    }

    pub fn zone(&self, side: ZoneSide) -> &Zone {
        match side {
            ZoneSide::Source => &self.source,
            ZoneSide::Target => &self.target,
        }
    }

    #[must_use]
    pub fn minutes(&self, side: ZoneSide) -> MinuteOfDay {
        match side {
            ZoneSide::Source => self.source_minutes,
            ZoneSide::Target => self.target_minutes,
        }
    }

    #[must_use]
    pub fn source_minutes(&self) -> MinuteOfDay {
        self.source_minutes
    }

    #[must_use]
    pub fn target_minutes(&self) -> MinuteOfDay {
        self.target_minutes
    }

    #[must_use]
    pub fn anchor(&self) -> Instant {
        self.anchor
    }

    #[must_use]
    pub fn state(&self) -> SyncState {
        self.state
    }

    /// Writes one side without touching the other. Pair with [`Self::sync_from`].
    pub fn set_minutes(&mut self, side: ZoneSide, minutes: MinuteOfDay) {
        match side {
            ZoneSide::Source => self.source_minutes = minutes,
            ZoneSide::Target => self.target_minutes = minutes,
        }
    }

    /// Moves "today" without disturbing either row.
    pub fn set_anchor(&mut self, anchor: Instant) {
        self.anchor = anchor;
    }

    pub fn resample_now(&mut self, clock: &dyn Clock) {
        self.resample_at(read_clock(clock));
    }

    /// Points both rows at `instant`.
    pub fn resample_at(&mut self, instant: Instant) {
        self.anchor = instant;
        self.source_minutes = self.source.minutes_at(instant);
        self.target_minutes = self.target.minutes_at(instant);
        tracing::debug!(
            %instant,
            source = self.source_minutes.value(),
            target = self.target_minutes.value(),
            "resampled"
        );
    }

    pub fn sync_target_from_source(&mut self) -> SyncOutcome {
        self.sync_from(ZoneSide::Source)
    }

    pub fn sync_source_from_target(&mut self) -> SyncOutcome {
        self.sync_from(ZoneSide::Target)
    }

    /// Recomputes the side opposite `from` so both name the same instant.
    pub fn sync_from(&mut self, from: ZoneSide) -> SyncOutcome {
        let Some(_guard) = SyncGuard::enter(&mut self.state, SyncState::from_side(from)) else {
            tracing::debug!(?from, "sync already in progress, skipping");
            return SyncOutcome::Skipped;
        };

        let (zone, minutes, other) = match from {
            ZoneSide::Source => (&self.source, self.source_minutes, &self.target),
            ZoneSide::Target => (&self.target, self.target_minutes, &self.source),
        };
        let instant = instant_for_minutes(minutes, zone, self.anchor);
        let projected = other.minutes_at(instant);

        match from {
            ZoneSide::Source => self.target_minutes = projected,
            ZoneSide::Target => self.source_minutes = projected,
        }
        tracing::debug!(
            ?from,
            from_minutes = minutes.value(),
            to_minutes = projected.value(),
            "synced"
        );
        SyncOutcome::Applied(projected)
    }

    #[must_use]
    pub fn source_time_text(&self) -> String {
        self.time_text(ZoneSide::Source)
    }

    #[must_use]
    pub fn target_time_text(&self) -> String {
        self.time_text(ZoneSide::Target)
    }

    #[must_use]
    pub fn time_text(&self, side: ZoneSide) -> String {
        let zone = self.zone(side);
        self.format_time(self.minutes(side), zone, zone.label())
    }

    /// `h:mm AM LABEL` for `minutes` as read on today's calendar in `zone`.
    #[must_use]
    pub fn format_time(&self, minutes: MinuteOfDay, zone: &Zone, label: &str) -> String {
        match compose_instant(minutes, zone, self.anchor) {
            Ok(instant) if zone.minutes_at(instant) == wall_reading(minutes) => {
                let local = instant.with_timezone(&zone.tz());
                format!("{} {label}", local.format("%-I:%M %p"))
            }
            _ => format_wall_clock(minutes, label),
        }
    }
}

/// Whole-minute reading of `minutes`, with 24:00 folded back to 00:00.
fn wall_reading(minutes: MinuteOfDay) -> MinuteOfDay {
    let (hour, minute) = minutes.hour_minute();
    MinuteOfDay::from_hour_minute(hour % 24, minute)
}

/// The instant at which `zone` reads `minutes` on the day `reference` falls
/// on there. Falls back to `reference` itself when no such instant exists.
pub fn instant_for_minutes(minutes: MinuteOfDay, zone: &Zone, reference: Instant) -> Instant {
    compose_instant(minutes, zone, reference).unwrap_or_else(|e| {
        tracing::warn!(
            error = %e,
            minutes = minutes.value(),
            "composition failed, keeping reference instant"
        );
        reference
    })
}

pub fn compose_instant(
    minutes: MinuteOfDay,
    zone: &Zone,
    reference: Instant,
) -> Result<Instant, ConversionError> {
    let today = reference.with_timezone(&zone.tz()).date_naive();
    let (hour, minute) = minutes.hour_minute();
    let (date, hour) = if hour >= 24 {
        let next = today
            .succ_opt()
            .ok_or(ConversionError::DateOutOfRange(today))?;
        (next, hour - 24)
    } else {
        (today, hour)
    };
    let time = NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or(ConversionError::InvalidWallClock { hour, minute })?;
    Ok(zone.resolve_local(date.and_time(time))?)
}

/// Renders `minutes` without consulting any calendar.
#[must_use]
pub fn format_wall_clock(minutes: MinuteOfDay, label: &str) -> String {
    let (hour, minute) = minutes.hour_minute();
    let hour = hour % 24;
    let period = if hour >= 12 { "PM" } else { "AM" };
    let display_hour = match hour {
        0 => 12,
        h if h > 12 => h - 12,
        h => h,
    };
    format!("{display_hour}:{minute:02} {period} {label}")
}
