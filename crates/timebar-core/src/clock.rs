//! Clock normalization and the in-process game clock.
//!
//! The seasons source reports hours and minutes as unpadded integers
//! (`4`, not `04`). [`ClockTime::normalize`] pads them into an `HH:MM`
//! string before parsing, and everything downstream (classification,
//! `{TIME}` formatting, bar progress) works from the parsed value.
//!
//! [`GameClock`] tracks elapsed game ticks for a world that has no external
//! calendar. Time of day, date, and season are derived from the tick
//! counter and never stored independently.

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Timelike};
use timebar_types::{CalendarDate, Season};

/// Game ticks in one in-game day.
pub const TICKS_PER_DAY: u64 = 24_000;

/// Real seconds in one 24-hour clock cycle.
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Game ticks in one in-game hour.
const TICKS_PER_HOUR: u64 = 1_000;

/// Tick 0 of every day is 06:00.
const DAY_START_HOUR: u64 = 6;

/// Ticks between the start of a game day and the following midnight.
const TICKS_TO_MIDNIGHT: u64 = 18_000;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// The padded time string still does not parse as a time of day.
    #[error("{raw:?} is not a valid HH:MM time of day")]
    InvalidTime {
        /// The normalized string that failed to parse.
        raw: String,
    },

    /// A raw clock field is outside its range.
    #[error("clock field {field} out of range: {value}")]
    OutOfRange {
        /// Field name (`seconds`).
        field: &'static str,
        /// The rejected value.
        value: i32,
    },

    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid clock configuration (e.g. an impossible start date).
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Zero-pad a single-digit upstream value to two characters.
pub fn pad_two(value: i32) -> String {
    let raw = value.to_string();
    if raw.len() == 1 { format!("0{raw}") } else { raw }
}

/// A normalized clock reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    time: NaiveTime,
    second: u32,
}

impl ClockTime {
    /// Normalize raw upstream hours, minutes, and seconds.
    ///
    /// Hours and minutes are zero-padded into an `HH:MM` string and parsed;
    /// seconds only feed the day-progress fraction.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidTime`] if the padded string is not a
    /// valid time, or [`ClockError::OutOfRange`] for seconds outside `0..60`.
    pub fn normalize(hours: i32, minutes: i32, seconds: i32) -> Result<Self, ClockError> {
        let raw = format!("{}:{}", pad_two(hours), pad_two(minutes));
        let time = NaiveTime::parse_from_str(&raw, "%H:%M")
            .map_err(|_err| ClockError::InvalidTime { raw })?;
        let second = u32::try_from(seconds)
            .ok()
            .filter(|s| *s < 60)
            .ok_or(ClockError::OutOfRange {
                field: "seconds",
                value: seconds,
            })?;
        Ok(Self { time, second })
    }

    /// Hour and minute as a time of day (seconds are not carried).
    pub const fn time(&self) -> NaiveTime {
        self.time
    }

    /// The `HH:MM` string, e.g. `04:05`.
    pub fn hhmm(&self) -> String {
        self.time.format("%H:%M").to_string()
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_of_day(&self) -> u32 {
        self.time
            .num_seconds_from_midnight()
            .saturating_add(self.second)
    }

    /// Fraction of the day elapsed, in `[0, 1]`.
    pub fn day_progress(&self) -> f32 {
        let fraction = f64::from(self.seconds_of_day()) / f64::from(SECONDS_PER_DAY);
        #[allow(clippy::cast_possible_truncation)]
        let progress = fraction.clamp(0.0, 1.0) as f32;
        progress
    }
}

/// Number of whole in-game days in a world's total elapsed time.
pub const fn day_count(full_time: u64) -> u64 {
    match full_time.checked_div(TICKS_PER_DAY) {
        Some(days) => days,
        None => 0,
    }
}

/// Game clock tracking elapsed world ticks from a calendar start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameClock {
    /// Total elapsed game ticks.
    tick: u64,

    /// Calendar date of tick 0.
    start: NaiveDate,
}

impl GameClock {
    /// Create a clock at tick 0 on the given start date.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the date does not exist.
    pub fn new(start: CalendarDate) -> Result<Self, ClockError> {
        Self::from_parts(0, start)
    }

    /// Create a clock from explicit parameters (useful for testing and
    /// state restoration).
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the date does not exist.
    pub fn from_parts(tick: u64, start: CalendarDate) -> Result<Self, ClockError> {
        let start = start.to_naive().ok_or_else(|| ClockError::InvalidConfig {
            reason: format!(
                "start date {}-{}-{} does not exist",
                start.year, start.month, start.day
            ),
        })?;
        Ok(Self { tick, start })
    }

    /// Advance the clock by `ticks`. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self, ticks: u64) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(ticks).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Total elapsed game ticks.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Ticks into the current game day.
    pub const fn tick_of_day(&self) -> u64 {
        match self.tick.checked_rem(TICKS_PER_DAY) {
            Some(tick) => tick,
            None => 0,
        }
    }

    /// Ticks into the current game hour.
    fn tick_of_hour(&self) -> u64 {
        self.tick_of_day().checked_rem(TICKS_PER_HOUR).unwrap_or(0)
    }

    /// Clock hour, 0-23.
    pub fn hours(&self) -> i32 {
        let hour = self
            .tick_of_day()
            .checked_div(TICKS_PER_HOUR)
            .unwrap_or(0)
            .saturating_add(DAY_START_HOUR)
            .checked_rem(24)
            .unwrap_or(0);
        i32::try_from(hour).unwrap_or(0)
    }

    /// Clock minute, 0-59.
    pub fn minutes(&self) -> i32 {
        let minute = self
            .tick_of_hour()
            .saturating_mul(60)
            .checked_div(TICKS_PER_HOUR)
            .unwrap_or(0);
        i32::try_from(minute).unwrap_or(0)
    }

    /// Clock second, 0-59. One tick is 3.6 game seconds.
    pub fn seconds(&self) -> i32 {
        let second = self
            .tick_of_hour()
            .saturating_mul(3_600)
            .checked_div(TICKS_PER_HOUR)
            .and_then(|s| s.checked_rem(60))
            .unwrap_or(0);
        i32::try_from(second).unwrap_or(0)
    }

    /// Current calendar date. The date rolls over at midnight, not at
    /// tick 0 of the game day.
    pub fn date(&self) -> Option<NaiveDate> {
        let elapsed_days = self
            .tick
            .checked_add(TICKS_PER_DAY.saturating_sub(TICKS_TO_MIDNIGHT))?
            .checked_div(TICKS_PER_DAY)?;
        self.start.checked_add_days(Days::new(elapsed_days))
    }

    /// Current calendar date as raw parts.
    pub fn calendar_date(&self) -> Option<CalendarDate> {
        self.date()
            .map(|date| CalendarDate::new(date.year(), date.month(), date.day()))
    }

    /// Season derived from the current month (three months per season).
    pub fn season(&self) -> Season {
        match self.date().map(|date| date.month()) {
            Some(3..=5) => Season::Spring,
            Some(6..=8) => Season::Summer,
            Some(9..=11) => Season::Fall,
            Some(_) => Season::Winter,
            None => Season::Disabled,
        }
    }

    /// English name of the current weekday, e.g. `Monday`.
    pub fn day_of_week(&self) -> Option<String> {
        self.date().map(|date| date.format("%A").to_string())
    }

    /// English name of the current month, e.g. `July`.
    pub fn month_name(&self) -> Option<String> {
        self.date().map(|date| date.format("%B").to_string())
    }
}
