//! Collaborator seams: the game host, the seasons calendar, and optional
//! placeholder expansion.
//!
//! The per-tick task never reaches for global state. Everything it reads
//! comes through these traits, which the engine (or a test) implements.

use std::collections::BTreeMap;

use timebar_types::{CalendarDate, CalendarName, Season, ViewerId, WorldId};

/// The game host: world lookup and raw world time.
pub trait WorldHost {
    /// Resolve a world by its configured name.
    fn world(&self, name: &str) -> Option<WorldId>;

    /// Whether a previously resolved world is still loaded.
    fn is_loaded(&self, world: WorldId) -> bool;

    /// Total game ticks elapsed in the world.
    fn full_time(&self, world: WorldId) -> u64;
}

/// The seasons calendar attached to a world.
///
/// Hours, minutes, and seconds are unpadded integers.
pub trait SeasonsApi {
    /// Current season.
    fn season(&self, world: WorldId) -> Season;

    /// Current date, or `None` until the calendar is set up for the world.
    fn date(&self, world: WorldId) -> Option<CalendarDate>;

    /// Clock hour.
    fn hours(&self, world: WorldId) -> i32;

    /// Clock minute.
    fn minutes(&self, world: WorldId) -> i32;

    /// Clock second.
    fn seconds(&self, world: WorldId) -> i32;

    /// Name of the current weekday.
    fn day_of_week(&self, world: WorldId) -> CalendarName;

    /// Name of the current month.
    fn current_month_name(&self, world: WorldId) -> CalendarName;
}

/// Third-party placeholder expansion applied to a rendered title before it
/// is shown to a viewer.
pub trait PlaceholderExpander {
    /// Expand placeholders in `text` for `viewer`.
    fn expand(&self, viewer: ViewerId, text: &str) -> String;
}

/// Expands `%key%` placeholders from a fixed table. `%viewer%` expands to
/// the viewer's ID.
#[derive(Debug, Clone, Default)]
pub struct StaticPlaceholders {
    values: BTreeMap<String, String>,
}

impl StaticPlaceholders {
    /// Create an expander from a key/value table.
    pub const fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl PlaceholderExpander for StaticPlaceholders {
    fn expand(&self, viewer: ViewerId, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(open) = rest.find('%') {
            let (before, from_open) = rest.split_at(open);
            out.push_str(before);
            let after_open = from_open.get(1..).unwrap_or_default();
            let Some(close) = after_open.find('%') else {
                out.push_str(from_open);
                rest = "";
                break;
            };
            let key = after_open.get(..close).unwrap_or_default();
            let replacement = if key == "viewer" {
                Some(viewer.to_string())
            } else {
                self.values.get(key).cloned()
            };
            if let Some(value) = replacement {
                out.push_str(&value);
                rest = after_open.get(close.saturating_add(1)..).unwrap_or_default();
            } else {
                // Unknown key: keep the opening '%' and resume at the closing one.
                out.push('%');
                rest = after_open;
            }
        }
        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expander() -> StaticPlaceholders {
        let mut values = BTreeMap::new();
        values.insert("server".to_owned(), "Lobby".to_owned());
        StaticPlaceholders::new(values)
    }

    #[test]
    fn expands_known_keys() {
        let viewer = ViewerId::new();
        let out = expander().expand(viewer, "%server% - %viewer%");
        assert_eq!(out, format!("Lobby - {viewer}"));
    }

    #[test]
    fn leaves_unknown_keys_and_lone_percent() {
        let viewer = ViewerId::new();
        assert_eq!(expander().expand(viewer, "100% %nope% ok"), "100% %nope% ok");
        assert_eq!(expander().expand(viewer, "50%"), "50%");
    }

    #[test]
    fn unknown_key_does_not_swallow_next_placeholder() {
        let viewer = ViewerId::new();
        assert_eq!(expander().expand(viewer, "5%%server%"), "5%Lobby");
    }
}
