use chrono::{Duration, LocalResult, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use thiserror::Error;

use crate::time::{Instant, MinuteOfDay};

/// Upper bound on how far a wall-clock time inside a DST gap is pushed
/// forward. Real transitions skip at most two hours.
pub const MAX_GAP_MINUTES: i64 = 180;

/// Abbreviations people actually type, mapped to the zone they mean.
/// Several of these are ambiguous worldwide; the US/India reading wins.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("EST", "America/New_York"),
    ("EDT", "America/New_York"),
    ("ET", "America/New_York"),
    ("CST", "America/Chicago"),
    ("CDT", "America/Chicago"),
    ("MST", "America/Denver"),
    ("MDT", "America/Denver"),
    ("PST", "America/Los_Angeles"),
    ("PDT", "America/Los_Angeles"),
    ("IST", "Asia/Kolkata"),
    ("GMT", "Etc/GMT"),
    ("BST", "Europe/London"),
    ("CET", "Europe/Paris"),
    ("JST", "Asia/Tokyo"),
    ("UTC", "UTC"),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ZoneError {
    #[error("unknown time zone: {0}")]
    Unknown(String),

    #[error("{local} does not exist in {zone} within {MAX_GAP_MINUTES} minutes")]
    NonexistentLocalTime { zone: Tz, local: NaiveDateTime },
}

/// A resolved time zone plus the label shown next to its times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    tz: Tz,
    label: String,
}

impl Zone {
    pub fn new(tz: Tz, label: impl Into<String>) -> Self {
        Self {
            tz,
            label: label.into(),
        }
    }

    /// Resolves `name` as an abbreviation or IANA id, then `fallback`, then UTC.
    pub fn resolve(name: &str, fallback: &str, label: impl Into<String>) -> Self {
        let tz = match lookup(name) {
            Ok(tz) => tz,
            Err(primary) => match lookup(fallback) {
                Ok(tz) => {
                    tracing::warn!(error = %primary, fallback, "using fallback zone");
                    tz
                }
                Err(secondary) => {
                    tracing::warn!(%primary, %secondary, "zone fallback failed, using UTC");
                    Tz::UTC
                }
            },
        };
        Self::new(tz, label)
    }

    #[must_use]
    pub fn tz(&self) -> Tz {
        self.tz
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Turns a wall-clock reading in this zone into an instant.
    ///
    /// Repeated local times (clocks falling back) take the earlier
    /// occurrence. Skipped local times (clocks springing forward) move to the
    /// first valid minute after the gap.
    pub fn resolve_local(&self, local: NaiveDateTime) -> Result<Instant, ZoneError> {
        let mut candidate = local;
        for _ in 0..=MAX_GAP_MINUTES {
            match self.tz.from_local_datetime(&candidate) {
                LocalResult::Single(dt) => return Ok(dt.with_timezone(&Utc)),
                LocalResult::Ambiguous(earlier, _) => return Ok(earlier.with_timezone(&Utc)),
                LocalResult::None => {
                    let Some(next) = candidate.checked_add_signed(Duration::minutes(1)) else {
                        break;
                    };
                    candidate = next;
                }
            }
        }
        Err(ZoneError::NonexistentLocalTime {
            zone: self.tz,
            local,
        })
    }

    /// Wall-clock minute of day of `instant` in this zone, seconds dropped.
    #[must_use]
    pub fn minutes_at(&self, instant: Instant) -> MinuteOfDay {
        let local = instant.with_timezone(&self.tz);
        MinuteOfDay::from_hour_minute(local.hour(), local.minute())
    }
}

/// Resolves an abbreviation (case-insensitive) or an IANA identifier.
pub fn lookup(name: &str) -> Result<Tz, ZoneError> {
    let trimmed = name.trim();
    let canonical = ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| abbr.eq_ignore_ascii_case(trimmed))
        .map_or(trimmed, |(_, iana)| *iana);
    canonical
        .parse::<Tz>()
        .map_err(|_| ZoneError::Unknown(name.to_string()))
}
