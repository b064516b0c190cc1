//! Title template rendering.
//!
//! A template is plain text with `{TOKEN}` placeholders. Rendering is a
//! single left-to-right pass: at each `{` the fixed token table is checked,
//! a match is replaced by its value, and anything else is copied through.
//! Substituted values are never rescanned, so a value that happens to
//! contain a token is shown as-is.
//!
//! | Token         | Value                                             |
//! |---------------|---------------------------------------------------|
//! | `{TIME}`      | world time, `hh:mm a` or `HH:mm`                   |
//! | `{TIME-WORD}` | display word of the current period                |
//! | `{DAYCOUNT}`  | whole in-game days elapsed                        |
//! | `{SEASON}`    | season name                                       |
//! | `{DATE}`      | calendar date in the configured pattern           |
//! | `{DAY}`       | weekday name, or `DISABLED`                       |
//! | `{MONTH}`     | configured month display name, `DISABLED`, or `INVALID` |

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use timebar_types::{CalendarName, Season};
use tracing::error;

use crate::config::{DEFAULT_TITLE, SeasonsConfig};
use crate::date_format::DatePattern;

/// Shown when the upstream source reports a name as disabled.
pub const DISABLED: &str = "DISABLED";

/// Shown when configuration needed for a value is missing or invalid.
pub const INVALID: &str = "INVALID";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Time,
    TimeWord,
    DayCount,
    Season,
    Date,
    Day,
    Month,
}

const TOKENS: [(&str, Token); 7] = [
    ("{TIME}", Token::Time),
    ("{TIME-WORD}", Token::TimeWord),
    ("{DAYCOUNT}", Token::DayCount),
    ("{SEASON}", Token::Season),
    ("{DATE}", Token::Date),
    ("{DAY}", Token::Day),
    ("{MONTH}", Token::Month),
];

/// Values available to a render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    /// Normalized world time.
    pub world_time: NaiveTime,
    /// Display word for the current period, or [`INVALID`].
    pub time_word: String,
    /// Whole in-game days elapsed.
    pub day_count: u64,
    /// Current season.
    pub season: Season,
    /// Current calendar date.
    pub date: NaiveDate,
    /// Weekday name from the source.
    pub day_name: CalendarName,
    /// Month name from the source.
    pub month_name: CalendarName,
}

/// Renders title templates with the configured formats.
#[derive(Debug, Clone)]
pub struct TitleRenderer {
    use_24h: bool,
    date_pattern: DatePattern,
    month_names: BTreeMap<String, String>,
}

impl TitleRenderer {
    /// Create a renderer from explicit settings. `month_names` maps
    /// lower-case upstream month names to display names.
    pub const fn new(
        use_24h: bool,
        date_pattern: DatePattern,
        month_names: BTreeMap<String, String>,
    ) -> Self {
        Self {
            use_24h,
            date_pattern,
            month_names,
        }
    }

    /// Create a renderer from the seasons configuration. An unusable
    /// date pattern falls back to the default and is logged.
    pub fn from_config(config: &SeasonsConfig) -> Self {
        let month_names = config
            .month
            .keys()
            .filter_map(|key| {
                config
                    .month_display_name(key)
                    .map(|name| (key.clone(), name.to_owned()))
            })
            .collect();
        Self::new(
            config.use_24h_format,
            DatePattern::from_config(config.date_format.as_deref()),
            month_names,
        )
    }

    /// The compiled date pattern.
    pub const fn date_pattern(&self) -> &DatePattern {
        &self.date_pattern
    }

    /// Format the world time, e.g. `04:30 PM` or `16:30`.
    pub fn format_time(&self, time: NaiveTime) -> String {
        if self.use_24h {
            time.format("%H:%M").to_string()
        } else {
            time.format("%I:%M %p").to_string()
        }
    }

    /// Display value for the `{MONTH}` token.
    pub fn month_display(&self, month_name: &CalendarName) -> String {
        match month_name {
            CalendarName::Disabled => DISABLED.to_owned(),
            CalendarName::Named(name) => {
                let key = name.to_lowercase();
                self.month_names.get(&key).cloned().unwrap_or_else(|| {
                    error!(key = %format!("month.{key}.name"), "month display name is NOT SET");
                    INVALID.to_owned()
                })
            }
        }
    }

    /// Render a template. Tokens absent from the template are never
    /// evaluated, and unknown `{...}` text is left untouched.
    pub fn render(&self, template: &str, ctx: &RenderContext) -> String {
        let mut out = String::with_capacity(template.len().saturating_add(32));
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            let (before, candidate) = rest.split_at(open);
            out.push_str(before);
            if let Some((text, token)) = TOKENS.iter().find(|(text, _)| candidate.starts_with(text)) {
                out.push_str(&self.value(*token, ctx));
                rest = candidate.get(text.len()..).unwrap_or_default();
            } else {
                out.push('{');
                rest = candidate.get(1..).unwrap_or_default();
            }
        }
        out.push_str(rest);
        out
    }

    fn value(&self, token: Token, ctx: &RenderContext) -> String {
        match token {
            Token::Time => self.format_time(ctx.world_time),
            Token::TimeWord => ctx.time_word.clone(),
            Token::DayCount => ctx.day_count.to_string(),
            Token::Season => ctx.season.to_string(),
            Token::Date => self.date_pattern.format(ctx.date),
            Token::Day => ctx.day_name.to_string(),
            Token::Month => self.month_display(&ctx.month_name),
        }
    }
}

/// The configured title template, or [`DEFAULT_TITLE`] (logged) when unset.
pub fn template_from_config(config: &SeasonsConfig) -> String {
    config.timebar_title.clone().unwrap_or_else(|| {
        error!(default = DEFAULT_TITLE, "timebar-title is not set! Using default.");
        DEFAULT_TITLE.to_owned()
    })
}
