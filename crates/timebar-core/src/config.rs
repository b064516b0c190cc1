//! Configuration loading and typed config structures for `TimeBar`.
//!
//! The canonical configuration lives in `timebar-config.yaml`. This module
//! defines strongly-typed structs that mirror the YAML structure and a
//! loader that reads the file.
//!
//! Within the `seasons` section, individual keys stay optional:
//! a missing boundary, display word, or month name is only detected when it
//! is needed, so it can be reported by its full dotted key and replaced by a
//! sentinel instead of failing the whole load.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use timebar_types::{BarColor, CalendarDate, TimeOfDay};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level `TimeBar` configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimebarConfig {
    /// Name of the world whose calendar is displayed.
    #[serde(default = "default_world_name")]
    pub world: String,

    /// Real-time milliseconds between task invocations.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Bar appearance.
    #[serde(default)]
    pub bar: BarConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Settings for the seasons calendar display.
    #[serde(default)]
    pub seasons: SeasonsConfig,

    /// Settings for the built-in simulated world used by the engine binary.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

impl Default for TimebarConfig {
    fn default() -> Self {
        Self {
            world: default_world_name(),
            tick_interval_ms: default_tick_interval_ms(),
            bar: BarConfig::default(),
            logging: LoggingConfig::default(),
            seasons: SeasonsConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }
}

impl TimebarConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// The `TIMEBAR_WORLD` environment variable overrides `world` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string.
    ///
    /// An empty document yields the shipped defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("TIMEBAR_WORLD") {
            self.world = val;
        }
    }
}

/// Bar appearance settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BarConfig {
    /// Color applied to every viewer's bar on each tick.
    #[serde(default)]
    pub color: BarColor,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// The `seasons` section: title template, formats, per-month
/// boundaries, and display words.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SeasonsConfig {
    /// Date pattern for the `{DATE}` token, e.g. `M/dd/yyyy`.
    #[serde(default)]
    pub date_format: Option<String>,

    /// Render `{TIME}` as `HH:mm` instead of `hh:mm a`.
    #[serde(default, rename = "use-24h-format")]
    pub use_24h_format: bool,

    /// Title template containing `{TOKEN}` placeholders.
    #[serde(default)]
    pub timebar_title: Option<String>,

    /// Per-month sections keyed by lower-case English month name.
    #[serde(default)]
    pub month: BTreeMap<String, MonthSection>,

    /// Display words for each time-of-day period.
    #[serde(default)]
    pub times: TimeWords,
}

impl Default for SeasonsConfig {
    fn default() -> Self {
        Self {
            date_format: Some(DEFAULT_DATE_FORMAT.to_owned()),
            use_24h_format: false,
            timebar_title: Some(DEFAULT_TITLE.to_owned()),
            month: default_months(),
            times: TimeWords::default(),
        }
    }
}

impl SeasonsConfig {
    /// Look up the section for a lower-case month key.
    pub fn month_section(&self, month_key: &str) -> Option<&MonthSection> {
        self.month.get(month_key)
    }

    /// Configured display name for a month (`month.<key>.name`).
    pub fn month_display_name(&self, month_key: &str) -> Option<&str> {
        self.month_section(month_key)
            .and_then(|section| section.name.as_deref())
    }

    /// Configured display word for a period (`times.<label>`).
    pub fn time_word(&self, label: TimeOfDay) -> Option<&str> {
        self.times.word(label)
    }
}

/// One `month.<name>` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct MonthSection {
    /// Display name used by the `{MONTH}` token.
    #[serde(default)]
    pub name: Option<String>,
    /// Start of the midnight period.
    #[serde(default)]
    pub midnight: Option<String>,
    /// Start of the dawn period.
    #[serde(default)]
    pub dawn: Option<String>,
    /// Start of the morning period.
    #[serde(default)]
    pub morning: Option<String>,
    /// Start of the noon period.
    #[serde(default)]
    pub noon: Option<String>,
    /// Start of the afternoon period.
    #[serde(default)]
    pub afternoon: Option<String>,
    /// Start of the sunset period.
    #[serde(default)]
    pub sunset: Option<String>,
    /// Start of the night period.
    #[serde(default)]
    pub night: Option<String>,
}

impl MonthSection {
    /// Raw boundary string for the given period.
    pub fn boundary(&self, label: TimeOfDay) -> Option<&str> {
        match label {
            TimeOfDay::Midnight => self.midnight.as_deref(),
            TimeOfDay::Dawn => self.dawn.as_deref(),
            TimeOfDay::Morning => self.morning.as_deref(),
            TimeOfDay::Noon => self.noon.as_deref(),
            TimeOfDay::Afternoon => self.afternoon.as_deref(),
            TimeOfDay::Sunset => self.sunset.as_deref(),
            TimeOfDay::Night => self.night.as_deref(),
        }
    }
}

/// The `times` section: one display word per period.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TimeWords {
    /// Word for [`TimeOfDay::Midnight`].
    #[serde(default)]
    pub midnight: Option<String>,
    /// Word for [`TimeOfDay::Dawn`].
    #[serde(default)]
    pub dawn: Option<String>,
    /// Word for [`TimeOfDay::Morning`].
    #[serde(default)]
    pub morning: Option<String>,
    /// Word for [`TimeOfDay::Noon`].
    #[serde(default)]
    pub noon: Option<String>,
    /// Word for [`TimeOfDay::Afternoon`].
    #[serde(default)]
    pub afternoon: Option<String>,
    /// Word for [`TimeOfDay::Sunset`].
    #[serde(default)]
    pub sunset: Option<String>,
    /// Word for [`TimeOfDay::Night`].
    #[serde(default)]
    pub night: Option<String>,
}

impl Default for TimeWords {
    fn default() -> Self {
        let word = |label: TimeOfDay| Some(label.key().to_owned());
        Self {
            midnight: word(TimeOfDay::Midnight),
            dawn: word(TimeOfDay::Dawn),
            morning: word(TimeOfDay::Morning),
            noon: word(TimeOfDay::Noon),
            afternoon: word(TimeOfDay::Afternoon),
            sunset: word(TimeOfDay::Sunset),
            night: word(TimeOfDay::Night),
        }
    }
}

impl TimeWords {
    /// Display word for the given period.
    pub fn word(&self, label: TimeOfDay) -> Option<&str> {
        match label {
            TimeOfDay::Midnight => self.midnight.as_deref(),
            TimeOfDay::Dawn => self.dawn.as_deref(),
            TimeOfDay::Morning => self.morning.as_deref(),
            TimeOfDay::Noon => self.noon.as_deref(),
            TimeOfDay::Afternoon => self.afternoon.as_deref(),
            TimeOfDay::Sunset => self.sunset.as_deref(),
            TimeOfDay::Night => self.night.as_deref(),
        }
    }
}

/// Settings for the in-process simulated world driven by the engine binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationConfig {
    /// Calendar date of game tick 0.
    #[serde(default = "default_start_date")]
    pub start_date: CalendarDate,

    /// Game ticks the simulated world advances per task invocation.
    #[serde(default = "default_ticks_per_update")]
    pub ticks_per_update: u64,

    /// Number of demo viewers attached at startup.
    #[serde(default = "default_viewers")]
    pub viewers: u32,

    /// Report day and month names as disabled.
    #[serde(default)]
    pub names_disabled: bool,

    /// Whether the simulated seasons calendar has been set up. When false
    /// the calendar reports no date.
    #[serde(default = "default_calendar_initialized")]
    pub calendar_initialized: bool,

    /// Static `%key%` placeholder values; empty disables expansion.
    #[serde(default)]
    pub placeholders: BTreeMap<String, String>,

    /// Stop after this many task invocations (0 = run until stopped).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            ticks_per_update: default_ticks_per_update(),
            viewers: default_viewers(),
            names_disabled: false,
            calendar_initialized: default_calendar_initialized(),
            placeholders: BTreeMap::new(),
            max_ticks: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

/// Date pattern used when `date-format` is not set.
pub const DEFAULT_DATE_FORMAT: &str = "M/dd/yyyy";

/// Title template used when `timebar-title` is not set.
pub const DEFAULT_TITLE: &str = "{TIME} - {TIME-WORD} ({DATE}) - {SEASON}";

/// Boundaries per month: name, midnight, dawn, morning, noon, afternoon,
/// sunset, night.
const MONTH_DEFAULTS: [[&str; 9]; 12] = [
    ["january", "January", "00:00", "07:00", "08:00", "12:00", "13:00", "16:30", "17:30"],
    ["february", "February", "00:00", "06:45", "07:45", "12:00", "13:00", "17:15", "18:15"],
    ["march", "March", "00:00", "06:00", "07:00", "12:00", "13:00", "18:00", "19:00"],
    ["april", "April", "00:00", "05:30", "06:30", "12:00", "13:00", "19:00", "20:00"],
    ["may", "May", "00:00", "05:00", "06:00", "12:00", "13:00", "20:00", "21:00"],
    ["june", "June", "00:00", "04:30", "05:30", "12:00", "13:00", "20:30", "21:30"],
    ["july", "July", "00:00", "04:45", "05:45", "12:00", "13:00", "20:30", "21:30"],
    ["august", "August", "00:00", "05:15", "06:15", "12:00", "13:00", "19:45", "20:45"],
    ["september", "September", "00:00", "06:00", "07:00", "12:00", "13:00", "18:45", "19:45"],
    ["october", "October", "00:00", "06:30", "07:30", "12:00", "13:00", "17:45", "18:45"],
    ["november", "November", "00:00", "07:00", "08:00", "12:00", "13:00", "16:45", "17:45"],
    ["december", "December", "00:00", "07:30", "08:30", "12:00", "13:00", "16:15", "17:15"],
];

fn default_months() -> BTreeMap<String, MonthSection> {
    MONTH_DEFAULTS
        .iter()
        .map(|[key, name, midnight, dawn, morning, noon, afternoon, sunset, night]| {
            let section = MonthSection {
                name: Some((*name).to_owned()),
                midnight: Some((*midnight).to_owned()),
                dawn: Some((*dawn).to_owned()),
                morning: Some((*morning).to_owned()),
                noon: Some((*noon).to_owned()),
                afternoon: Some((*afternoon).to_owned()),
                sunset: Some((*sunset).to_owned()),
                night: Some((*night).to_owned()),
            };
            ((*key).to_owned(), section)
        })
        .collect()
}

fn default_world_name() -> String {
    "world".to_owned()
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_start_date() -> CalendarDate {
    CalendarDate::new(2024, 3, 1)
}

const fn default_ticks_per_update() -> u64 {
    20
}

const fn default_viewers() -> u32 {
    2
}

const fn default_calendar_initialized() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_complete() {
        let config = TimebarConfig::default();
        assert_eq!(config.world, "world");
        assert_eq!(config.tick_interval_ms, 1_000);
        assert_eq!(config.seasons.month.len(), 12);
        assert_eq!(config.seasons.date_format.as_deref(), Some("M/dd/yyyy"));
        assert!(!config.seasons.use_24h_format);
        for label in TimeOfDay::ALL {
            assert_eq!(config.seasons.time_word(label), Some(label.key()));
        }
    }

    #[test]
    fn default_months_carry_every_boundary() {
        let seasons = SeasonsConfig::default();
        for section in seasons.month.values() {
            for label in TimeOfDay::ALL {
                assert!(section.boundary(label).is_some());
            }
        }
        assert_eq!(seasons.month_display_name("july"), Some("July"));
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world: "survival"
tick_interval_ms: 500
bar:
  color: purple
logging:
  level: "debug"
seasons:
  date-format: "dd.MM.yyyy"
  use-24h-format: true
  timebar-title: "{TIME} {MONTH}"
  month:
    july:
      name: "Heumond"
      midnight: "00:00"
      dawn: "05:00"
      morning: "06:00"
      noon: "12:00"
      afternoon: "13:00"
      sunset: "20:00"
      night: "21:00"
  times:
    midnight: "Mitternacht"
    night: "Nacht"
simulation:
  start_date: { year: 1200, month: 7, day: 1 }
  ticks_per_update: 100
  viewers: 3
"#;

        let config = TimebarConfig::parse(yaml);
        assert!(config.is_ok(), "parse failed: {config:?}");
        let config = config.ok().unwrap_or_default();

        assert_eq!(config.world, "survival");
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.bar.color, BarColor::Purple);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.seasons.date_format.as_deref(), Some("dd.MM.yyyy"));
        assert!(config.seasons.use_24h_format);
        assert_eq!(config.seasons.month_display_name("july"), Some("Heumond"));
        assert_eq!(config.seasons.time_word(TimeOfDay::Night), Some("Nacht"));
        // Words not listed in a present `times` section are missing.
        assert_eq!(config.seasons.time_word(TimeOfDay::Dawn), None);
        assert_eq!(config.simulation.start_date, CalendarDate::new(1200, 7, 1));
        assert_eq!(config.simulation.viewers, 3);
    }

    #[test]
    fn missing_keys_in_present_section_stay_missing() {
        let yaml = "seasons:\n  use-24h-format: true\n";
        let config = TimebarConfig::parse(yaml).ok().unwrap_or_default();
        assert!(config.seasons.date_format.is_none());
        assert!(config.seasons.timebar_title.is_none());
        assert!(config.seasons.month.is_empty());
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = TimebarConfig::parse("world: nether\n").ok().unwrap_or_default();
        assert_eq!(config.world, "nether");
        assert_eq!(config.seasons, SeasonsConfig::default());
        assert_eq!(config.simulation.ticks_per_update, 20);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TimebarConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let config = TimebarConfig::parse("world: [unterminated");
        assert!(matches!(config, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("timebar-config.yaml");
        if path.exists() {
            let config = TimebarConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
