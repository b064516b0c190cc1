//! Date patterns for the `{DATE}` token.
//!
//! Patterns use the familiar letter syntax (`M/dd/yyyy`, `EEEE d MMMM`).
//! A pattern is compiled once into segments: fixed literal text, `chrono`
//! strftime directives, and fields `chrono` has no directive for, which are
//! computed from the date directly. Supported letters:
//!
//! | Letter  | Width | Output                                          |
//! |---------|-------|-------------------------------------------------|
//! | `G`     | 1-5   | `AD` (1-3), `Anno Domini` (4), `A` (5)          |
//! | `y`     | 1-19  | year of era; `yy` is the two-digit year          |
//! | `u`     | 1-19  | signed year; `uu` is the two-digit year          |
//! | `Y`     | 1-19  | ISO week-based year; `YY` is two-digit           |
//! | `Q` `q` | 1-5   | `3`, `03`, `Q3`, `3rd quarter`, `3`              |
//! | `M` `L` | 1-5   | `7`, `07`, `Jul`, `July`, `J`                    |
//! | `w`     | 1-2   | ISO week of year                                |
//! | `W`     | 1     | ISO week of month (0 before the first full week) |
//! | `d`     | 1-2   | `5`, `05`                                       |
//! | `D`     | 1-3   | day of year, zero-padded to the width           |
//! | `F`     | 1     | aligned week of month, `1` for days 1-7          |
//! | `E`     | 1-5   | `Mon` (1-3), `Monday` (4), `M` (5)              |
//! | `e`     | 1-5   | `1` and `01` (Monday is 1), then as `E`         |
//! | `c`     | 1,3-5 | as `e`                                          |
//!
//! Weeks follow ISO-8601: they start on Monday and the first week of a
//! year or month is the one holding at least four of its days.
//!
//! Text in single quotes is literal, and `''` is a literal quote. `[` and
//! `]` bracket optional sections, which always print for a full date. Any
//! other ASCII letter is rejected (time letters such as `H` or `m` have no
//! value on a date), as are the reserved characters `#{}`.

use std::fmt::{self, Write as _};

use chrono::{Datelike, NaiveDate};
use tracing::warn;

use crate::config::DEFAULT_DATE_FORMAT;

/// Pattern used when the configured one cannot be compiled.
pub const FALLBACK_DATE_FORMAT: &str = "M/d/yyyy";

/// Widest zero-padded numeric field.
const MAX_NUMERIC_WIDTH: usize = 19;

/// Date every compiled pattern is tried on.
const SAMPLE_DATE: (i32, u32, u32) = (2024, 7, 15);

/// Errors that can occur while compiling a date pattern.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateFormatError {
    /// A letter with no date meaning, or a reserved character.
    #[error("unknown pattern letter '{letter}'")]
    UnknownLetter {
        /// The offending character.
        letter: char,
    },

    /// A known letter repeated an unsupported number of times.
    #[error("unsupported width {count} for pattern letter '{letter}'")]
    UnsupportedWidth {
        /// The pattern letter.
        letter: char,
        /// How many times it was repeated.
        count: usize,
    },

    /// A quoted literal was never closed.
    #[error("unterminated quoted literal")]
    UnterminatedQuote,

    /// A `]` with no open optional section.
    #[error("']' without a preceding '['")]
    UnmatchedSectionEnd,

    /// The compiled pattern failed to format a sample date.
    #[error("pattern {pattern:?} cannot format a date")]
    Unusable {
        /// The pattern as configured.
        pattern: String,
    },
}

/// Text width of a named value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextWidth {
    Short,
    Full,
    Narrow,
}

/// One date field of a compiled pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    /// A directive `chrono` formats itself.
    Strftime(&'static str),
    Era(TextWidth),
    YearOfEra { width: usize },
    ProlepticYear { width: usize },
    WeekBasedYear { width: usize },
    Quarter { count: usize },
    MonthNarrow,
    IsoWeek { width: usize },
    IsoWeekOfMonth,
    AlignedWeekOfMonth,
    DayOfYear { width: usize },
    DayOfWeekNumber { width: usize },
    WeekdayNarrow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// A compiled date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    pattern: String,
    segments: Vec<Segment>,
}

impl DatePattern {
    /// Compile a pattern, validating it by formatting a sample date.
    ///
    /// # Errors
    ///
    /// Returns a [`DateFormatError`] if the pattern cannot be used.
    pub fn compile(pattern: &str) -> Result<Self, DateFormatError> {
        let compiled = Self {
            pattern: pattern.to_owned(),
            segments: parse(pattern)?,
        };

        let (y, m, d) = SAMPLE_DATE;
        let mut sample = String::new();
        let usable = NaiveDate::from_ymd_opt(y, m, d)
            .is_some_and(|date| compiled.write_date(&mut sample, date).is_ok());
        if !usable {
            return Err(DateFormatError::Unusable {
                pattern: pattern.to_owned(),
            });
        }

        Ok(compiled)
    }

    /// Build the pattern from the configured `date-format` value.
    ///
    /// A missing value uses [`DEFAULT_DATE_FORMAT`]; a value that fails to
    /// compile uses [`FALLBACK_DATE_FORMAT`]. Both cases are logged and
    /// neither is an error.
    pub fn from_config(configured: Option<&str>) -> Self {
        match configured {
            None => {
                warn!(
                    default = DEFAULT_DATE_FORMAT,
                    "date-format is missing! Using default American English format."
                );
                Self::compile(DEFAULT_DATE_FORMAT).unwrap_or_else(|_err| Self::fallback())
            }
            Some(pattern) => Self::compile(pattern).unwrap_or_else(|e| {
                warn!(
                    pattern,
                    error = %e,
                    fallback = FALLBACK_DATE_FORMAT,
                    "date-format is NOT a valid format! Using default American English format."
                );
                Self::fallback()
            }),
        }
    }

    /// The `M/d/yyyy` fallback pattern.
    pub fn fallback() -> Self {
        Self {
            pattern: FALLBACK_DATE_FORMAT.to_owned(),
            segments: vec![
                Segment::Field(Field::Strftime("%-m")),
                Segment::Literal("/".to_owned()),
                Segment::Field(Field::Strftime("%-d")),
                Segment::Literal("/".to_owned()),
                Segment::Field(Field::YearOfEra { width: 4 }),
            ],
        }
    }

    /// The pattern as configured.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Format a date with this pattern.
    pub fn format(&self, date: NaiveDate) -> String {
        let mut out = String::new();
        if self.write_date(&mut out, date).is_err() {
            warn!(pattern = %self.pattern, %date, "date pattern failed to format, using ISO date");
            return date.to_string();
        }
        out
    }

    fn write_date(&self, out: &mut String, date: NaiveDate) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => write_field(out, *field, date)?,
            }
        }
        Ok(())
    }
}

/// Split a letter pattern into literal and field segments.
fn parse(pattern: &str) -> Result<Vec<Segment>, DateFormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut open_sections: usize = 0;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' => {
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    literal.push('\'');
                    continue;
                }
                let mut closed = false;
                while let Some(q) = chars.next() {
                    if q == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            literal.push('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    literal.push(q);
                }
                if !closed {
                    return Err(DateFormatError::UnterminatedQuote);
                }
            }
            '[' => open_sections = open_sections.saturating_add(1),
            ']' => {
                open_sections = open_sections
                    .checked_sub(1)
                    .ok_or(DateFormatError::UnmatchedSectionEnd)?;
            }
            '#' | '{' | '}' => {
                return Err(DateFormatError::UnknownLetter { letter: c });
            }
            letter if letter.is_ascii_alphabetic() => {
                let mut count: usize = 1;
                while chars.peek() == Some(&letter) {
                    chars.next();
                    count = count.saturating_add(1);
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field(field(letter, count)?));
            }
            other => literal.push(other),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

/// Field for a run of `count` copies of `letter`.
const fn field(letter: char, count: usize) -> Result<Field, DateFormatError> {
    let field = match (letter, count) {
        ('G', 1..=3) => Field::Era(TextWidth::Short),
        ('G', 4) => Field::Era(TextWidth::Full),
        ('G', 5) => Field::Era(TextWidth::Narrow),
        ('y', 1..=MAX_NUMERIC_WIDTH) => Field::YearOfEra { width: count },
        ('u', 1..=MAX_NUMERIC_WIDTH) => Field::ProlepticYear { width: count },
        ('Y', 1..=MAX_NUMERIC_WIDTH) => Field::WeekBasedYear { width: count },
        ('Q' | 'q', 1..=5) => Field::Quarter { count },
        ('M' | 'L', 1) => Field::Strftime("%-m"),
        ('M' | 'L', 2) => Field::Strftime("%m"),
        ('M' | 'L', 3) => Field::Strftime("%b"),
        ('M' | 'L', 4) => Field::Strftime("%B"),
        ('M' | 'L', 5) => Field::MonthNarrow,
        ('w', 1..=2) => Field::IsoWeek { width: count },
        ('W', 1) => Field::IsoWeekOfMonth,
        ('d', 1) => Field::Strftime("%-d"),
        ('d', 2) => Field::Strftime("%d"),
        ('D', 1..=3) => Field::DayOfYear { width: count },
        ('F', 1) => Field::AlignedWeekOfMonth,
        ('e' | 'c', 1) | ('e', 2) => Field::DayOfWeekNumber { width: count },
        ('E', 1..=3) | ('e' | 'c', 3) => Field::Strftime("%a"),
        ('E' | 'e' | 'c', 4) => Field::Strftime("%A"),
        ('E' | 'e' | 'c', 5) => Field::WeekdayNarrow,
        ('G' | 'y' | 'u' | 'Y' | 'Q' | 'q' | 'M' | 'L' | 'w' | 'W' | 'd' | 'D' | 'F' | 'E'
        | 'e' | 'c', _) => {
            return Err(DateFormatError::UnsupportedWidth { letter, count });
        }
        _ => return Err(DateFormatError::UnknownLetter { letter }),
    };
    Ok(field)
}

fn write_field(out: &mut String, field: Field, date: NaiveDate) -> fmt::Result {
    match field {
        Field::Strftime(directive) => write!(out, "{}", date.format(directive)),
        Field::Era(width) => {
            let (common_era, _) = date.year_ce();
            let name = match (width, common_era) {
                (TextWidth::Short, true) => "AD",
                (TextWidth::Short, false) => "BC",
                (TextWidth::Full, true) => "Anno Domini",
                (TextWidth::Full, false) => "Before Christ",
                (TextWidth::Narrow, true) => "A",
                (TextWidth::Narrow, false) => "B",
            };
            out.push_str(name);
            Ok(())
        }
        Field::YearOfEra { width } => {
            let (_, year) = date.year_ce();
            write_year(out, i64::from(year), width)
        }
        Field::ProlepticYear { width } => write_year(out, i64::from(date.year()), width),
        Field::WeekBasedYear { width } => {
            write_year(out, i64::from(date.iso_week().year()), width)
        }
        Field::Quarter { count } => {
            let quarter = date.month0().checked_div(3).unwrap_or(0).saturating_add(1);
            match count {
                2 => write!(out, "{quarter:02}"),
                3 => write!(out, "Q{quarter}"),
                4 => {
                    let suffix = match quarter {
                        1 => "st",
                        2 => "nd",
                        3 => "rd",
                        _ => "th",
                    };
                    write!(out, "{quarter}{suffix} quarter")
                }
                _ => write!(out, "{quarter}"),
            }
        }
        Field::MonthNarrow => write_initial(out, date, "%B"),
        Field::IsoWeek { width } => write!(out, "{:0width$}", date.iso_week().week()),
        Field::IsoWeekOfMonth => write!(out, "{}", iso_week_of_month(date)),
        Field::AlignedWeekOfMonth => {
            let week = date.day0().checked_div(7).unwrap_or(0).saturating_add(1);
            write!(out, "{week}")
        }
        Field::DayOfYear { width } => write!(out, "{:0width$}", date.ordinal()),
        Field::DayOfWeekNumber { width } => {
            write!(out, "{:0width$}", date.weekday().number_from_monday())
        }
        Field::WeekdayNarrow => write_initial(out, date, "%A"),
    }
}

/// Zero-pad a year to `width`; width 2 keeps only the last two digits.
fn write_year(out: &mut String, year: i64, width: usize) -> fmt::Result {
    if width == 2 {
        write!(out, "{:02}", year.rem_euclid(100))
    } else {
        write!(out, "{year:0width$}")
    }
}

/// First character of a named value.
fn write_initial(out: &mut String, date: NaiveDate, directive: &str) -> fmt::Result {
    let mut name = String::new();
    write!(name, "{}", date.format(directive))?;
    if let Some(initial) = name.chars().next() {
        out.push(initial);
    }
    Ok(())
}

/// Week of the month, weeks starting on Monday. Week 1 is the first one
/// holding at least four days of the month; days before it are week 0.
fn iso_week_of_month(date: NaiveDate) -> u32 {
    let first_weekday = date
        .with_day(1)
        .map_or(0, |first| first.weekday().num_days_from_monday());
    let full_weeks = date
        .day0()
        .saturating_add(first_weekday)
        .checked_div(7)
        .unwrap_or(0);
    full_weeks.saturating_add(u32::from(first_weekday <= 3))
}
