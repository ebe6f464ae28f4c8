use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_HOUR: f64 = 60.0;
pub const MINUTES_PER_DAY: f64 = 24.0 * 60.0;

/// Absolute point in time. Carries no zone of its own.
pub type Instant = DateTime<Utc>;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum MinuteError {
    #[error("minute of day is not finite")]
    NonFinite,
    #[error("minute of day {0} outside 0..=1440")]
    OutOfRange(f64),
}

/// Minutes since local midnight in some zone.
///
/// Wall-clock meaning only: the same value names a different instant in
/// every zone and on every date. `1440` is accepted because the slider's
/// clamped range includes its right edge; it denotes midnight of the
/// following day.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct MinuteOfDay(f64);

impl MinuteOfDay {
    pub const MIDNIGHT: Self = Self(0.0);
    pub const NOON: Self = Self(720.0);
    pub const END_OF_DAY: Self = Self(MINUTES_PER_DAY);

    pub fn new(value: f64) -> Result<Self, MinuteError> {
        if !value.is_finite() {
            return Err(MinuteError::NonFinite);
        }
        if !(0.0..=MINUTES_PER_DAY).contains(&value) {
            return Err(MinuteError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    /// Clamps into range; NaN collapses to midnight.
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIDNIGHT;
        }
        Self(value.clamp(0.0, MINUTES_PER_DAY))
    }

    #[must_use]
    pub fn from_hour_minute(hour: u32, minute: u32) -> Self {
        Self::clamped(f64::from(hour) * MINUTES_PER_HOUR + f64::from(minute))
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }

    /// Whole hour and minute, truncating any fraction.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hour_minute(self) -> (u32, u32) {
        let whole = self.0.floor() as u32;
        (whole / 60, whole % 60)
    }

    /// Fraction of the day covered, in `0.0..=1.0`.
    #[must_use]
    pub fn day_fraction(self) -> f64 {
        self.0 / MINUTES_PER_DAY
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.0 - other.0).abs()
    }
}

impl TryFrom<f64> for MinuteOfDay {
    type Error = MinuteError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MinuteOfDay> for f64 {
    fn from(m: MinuteOfDay) -> Self {
        m.0
    }
}

/// Explicit timestamp unit for crossing the shell boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnixTimeMs(pub i64);

impl UnixTimeMs {
    #[must_use]
    pub fn from_instant(instant: Instant) -> Self {
        Self(instant.timestamp_millis())
    }

    /// `None` when the value lies outside chrono's representable range.
    #[must_use]
    pub fn to_instant(self) -> Option<Instant> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ClockError {
    #[error("clock unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("timestamp {0} ms is not representable")]
    Unrepresentable(i64),
}

pub trait Clock {
    fn now(&self) -> Result<Instant, ClockError>;
}

/// The host's wall clock, at full chrono precision.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Instant, ClockError> {
        Ok(Utc::now())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Instant);

impl Clock for FixedClock {
    fn now(&self) -> Result<Instant, ClockError> {
        Ok(self.0)
    }
}

/// Reads `clock`, degrading to chrono's own wall-clock read on failure.
pub fn read_clock(clock: &dyn Clock) -> Instant {
    match clock.now() {
        Ok(instant) => instant,
        Err(e) => {
            tracing::warn!(error = %e, "clock read failed, using best-effort wall clock");
            Utc::now()
        }
    }
}
