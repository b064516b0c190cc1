//! Enumeration types shared across the `TimeBar` workspace.

use core::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Seasons
// ---------------------------------------------------------------------------

/// A season as reported by the calendar source.
///
/// The textual form (used for the `{SEASON}` token) is the upper-case
/// variant name, e.g. `SUMMER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Season {
    /// March through May in the default calendar.
    Spring,
    /// June through August.
    Summer,
    /// September through November.
    Fall,
    /// December through February.
    Winter,
    /// Seasons are switched off for the world.
    Disabled,
}

impl Season {
    /// Upper-case name used in rendered titles.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "SPRING",
            Self::Summer => "SUMMER",
            Self::Fall => "FALL",
            Self::Winter => "WINTER",
            Self::Disabled => "DISABLED",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Time of Day
// ---------------------------------------------------------------------------

/// One of the seven labelled periods that partition a day.
///
/// Variants are declared in classification priority order: each period
/// starts at its own boundary time and runs until the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    /// From the midnight boundary until dawn.
    Midnight,
    /// From dawn until morning.
    Dawn,
    /// From morning until noon.
    Morning,
    /// From noon until afternoon.
    Noon,
    /// From afternoon until sunset.
    Afternoon,
    /// From sunset until night.
    Sunset,
    /// From night until the end of the day.
    Night,
}

impl TimeOfDay {
    /// All periods in classification priority order.
    pub const ALL: [Self; 7] = [
        Self::Midnight,
        Self::Dawn,
        Self::Morning,
        Self::Noon,
        Self::Afternoon,
        Self::Sunset,
        Self::Night,
    ];

    /// Lower-case configuration key for this period (`times.<key>`,
    /// `month.<name>.<key>`).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Midnight => "midnight",
            Self::Dawn => "dawn",
            Self::Morning => "morning",
            Self::Noon => "noon",
            Self::Afternoon => "afternoon",
            Self::Sunset => "sunset",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Bar Colors
// ---------------------------------------------------------------------------

/// Color of a viewer's progress bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarColor {
    /// Pink bar.
    Pink,
    /// Blue bar.
    #[default]
    Blue,
    /// Red bar.
    Red,
    /// Green bar.
    Green,
    /// Yellow bar.
    Yellow,
    /// Purple bar.
    Purple,
    /// White bar.
    White,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_text_is_upper_case() {
        assert_eq!(Season::Summer.to_string(), "SUMMER");
        assert_eq!(Season::Fall.to_string(), "FALL");
    }

    #[test]
    fn time_of_day_keys_follow_priority_order() {
        let keys: Vec<&str> = TimeOfDay::ALL.iter().map(|t| t.key()).collect();
        assert_eq!(
            keys,
            ["midnight", "dawn", "morning", "noon", "afternoon", "sunset", "night"]
        );
    }

    #[test]
    fn bar_color_deserializes_lower_case() {
        let color: BarColor = serde_json::from_str("\"purple\"").unwrap_or_default();
        assert_eq!(color, BarColor::Purple);
    }
}
