//! Time-of-day classification against per-month boundary times.
//!
//! Each month section configures seven boundary times. A clock time is
//! tested against the half-open intervals they form, in this order:
//!
//! | Period    | Interval                 |
//! |-----------|--------------------------|
//! | midnight  | `[midnight, dawn)`       |
//! | dawn      | `[dawn, morning)`        |
//! | morning   | `[morning, noon)`        |
//! | noon      | `[noon, afternoon)`      |
//! | afternoon | `[afternoon, sunset)`    |
//! | sunset    | `[sunset, night)`        |
//! | night     | `[night, end of day]`    |
//!
//! The first matching interval wins. Ordering of the boundaries is a
//! configuration invariant that is not validated up front: a badly ordered
//! month simply leaves some times unmatched, which is reported as
//! [`ClassifyError::Unclassifiable`]. Times before the midnight boundary
//! are not wrapped into the night period.

use chrono::{Month, NaiveTime};
use timebar_types::TimeOfDay;

use crate::config::SeasonsConfig;

/// Order in which boundary keys are read, so the first missing key in this
/// order is the one reported.
const RESOLVE_ORDER: [TimeOfDay; 7] = [
    TimeOfDay::Dawn,
    TimeOfDay::Morning,
    TimeOfDay::Noon,
    TimeOfDay::Afternoon,
    TimeOfDay::Sunset,
    TimeOfDay::Night,
    TimeOfDay::Midnight,
];

/// Errors that can occur while classifying a time of day.
///
/// All variants are configuration problems; callers log them and display
/// the `INVALID` sentinel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClassifyError {
    /// No `month.<name>` section for the current month.
    #[error("section month.{month} does NOT EXIST")]
    MissingMonth {
        /// Lower-case month key.
        month: String,
    },

    /// A boundary key is missing from the month section.
    #[error("{key} is NOT SET")]
    MissingBoundary {
        /// Full dotted key, e.g. `month.july.sunset`.
        key: String,
    },

    /// A boundary value does not parse as a time of day.
    #[error("{key} = {value:?} is not a valid time")]
    InvalidBoundary {
        /// Full dotted key.
        key: String,
        /// The configured value.
        value: String,
    },

    /// The time fell into none of the configured intervals.
    #[error("unable to find a suitable time of day for {time}")]
    Unclassifiable {
        /// The time that matched nothing.
        time: NaiveTime,
    },
}

/// Lower-case configuration key for a 1-based month number, e.g. `july`.
pub fn month_key(month: u32) -> Option<String> {
    let number = u8::try_from(month).ok()?;
    Month::try_from(number)
        .ok()
        .map(|m| m.name().to_lowercase())
}

/// Parsed boundary times for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBoundaries {
    starts: [NaiveTime; 7],
}

impl MonthBoundaries {
    /// Read and parse the boundary times of `month.<month_key>`.
    ///
    /// # Errors
    ///
    /// Returns the first missing or unparseable boundary, or
    /// [`ClassifyError::MissingMonth`] if the section does not exist.
    pub fn resolve(month_key: &str, config: &SeasonsConfig) -> Result<Self, ClassifyError> {
        let section = config
            .month_section(month_key)
            .ok_or_else(|| ClassifyError::MissingMonth {
                month: month_key.to_owned(),
            })?;

        let mut starts = [NaiveTime::MIN; 7];
        for label in RESOLVE_ORDER {
            let key = format!("month.{month_key}.{}", label.key());
            let raw = section
                .boundary(label)
                .ok_or_else(|| ClassifyError::MissingBoundary { key: key.clone() })?;
            let time = parse_boundary(raw).ok_or_else(|| ClassifyError::InvalidBoundary {
                key,
                value: raw.to_owned(),
            })?;
            if let Some(slot) = starts.get_mut(label as usize) {
                *slot = time;
            }
        }
        Ok(Self::from_starts(starts))
    }

    /// Build boundaries directly from parsed times, in
    /// [`TimeOfDay::ALL`] order (midnight first).
    pub const fn from_starts(starts: [NaiveTime; 7]) -> Self {
        Self { starts }
    }

    /// Start time of the given period.
    pub fn start(&self, label: TimeOfDay) -> NaiveTime {
        self.starts
            .get(label as usize)
            .copied()
            .unwrap_or(NaiveTime::MIN)
    }

    /// Intervals in priority order: `(period, inclusive start, exclusive end)`.
    /// The night interval has no end.
    fn intervals(&self) -> [(TimeOfDay, NaiveTime, Option<NaiveTime>); 7] {
        let s = |label| self.start(label);
        [
            (TimeOfDay::Midnight, s(TimeOfDay::Midnight), Some(s(TimeOfDay::Dawn))),
            (TimeOfDay::Dawn, s(TimeOfDay::Dawn), Some(s(TimeOfDay::Morning))),
            (TimeOfDay::Morning, s(TimeOfDay::Morning), Some(s(TimeOfDay::Noon))),
            (TimeOfDay::Noon, s(TimeOfDay::Noon), Some(s(TimeOfDay::Afternoon))),
            (TimeOfDay::Afternoon, s(TimeOfDay::Afternoon), Some(s(TimeOfDay::Sunset))),
            (TimeOfDay::Sunset, s(TimeOfDay::Sunset), Some(s(TimeOfDay::Night))),
            (TimeOfDay::Night, s(TimeOfDay::Night), None),
        ]
    }

    /// First period whose interval contains `time`.
    pub fn classify(&self, time: NaiveTime) -> Option<TimeOfDay> {
        self.intervals()
            .into_iter()
            .find(|(_, lower, upper)| time >= *lower && upper.is_none_or(|end| time < end))
            .map(|(label, _, _)| label)
    }
}

/// Classify `time` using the boundaries configured for `month_key`.
///
/// # Errors
///
/// Returns a [`ClassifyError`] describing the missing or invalid
/// configuration, or [`ClassifyError::Unclassifiable`] if no interval
/// contains the time.
pub fn classify(
    month_key: &str,
    time: NaiveTime,
    config: &SeasonsConfig,
) -> Result<TimeOfDay, ClassifyError> {
    MonthBoundaries::resolve(month_key, config)?
        .classify(time)
        .ok_or(ClassifyError::Unclassifiable { time })
}

/// Parse a boundary as `HH:MM` or `HH:MM:SS`.
fn parse_boundary(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_err| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .ok()
}
