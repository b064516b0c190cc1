//! Calendar values reported by the seasons source.

use core::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A calendar date as reported by the seasons source.
///
/// Fields are kept raw; conversion to a [`NaiveDate`] fails for dates
/// the proleptic Gregorian calendar does not contain (e.g. month 13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CalendarDate {
    /// Calendar year.
    pub year: i32,
    /// Month of the year, 1-based.
    pub month: u32,
    /// Day of the month, 1-based.
    pub day: u32,
}

impl CalendarDate {
    /// Create a date from its raw parts.
    pub const fn new(year: i32, month: u32, day: u32) -> Self {
        Self { year, month, day }
    }

    /// Convert to a [`NaiveDate`], or `None` if the parts are out of range.
    pub const fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }
}

/// A day or month name from the seasons source, which reports the literal
/// `DISABLED` when the feature is switched off.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalendarName {
    /// The upstream name.
    Named(String),
    /// The upstream feature is disabled.
    Disabled,
}

impl CalendarName {
    /// Marker the upstream source uses for disabled names.
    pub const DISABLED: &'static str = "DISABLED";

    /// Interpret a raw upstream string, mapping the disabled marker.
    pub fn from_upstream(raw: &str) -> Self {
        if raw == Self::DISABLED {
            Self::Disabled
        } else {
            Self::Named(raw.to_owned())
        }
    }
}

impl fmt::Display for CalendarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Disabled => f.write_str(Self::DISABLED),
        }
    }
}
