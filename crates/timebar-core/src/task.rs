//! The seasons display task, run once per scheduler tick.
//!
//! Each run reads the season, date, and clock from the seasons calendar,
//! classifies the time of day, renders the title template, and pushes the
//! title, day progress, and bar color to every attached bar.
//!
//! Failures fall into three groups:
//!
//! - **Fatal for the task** -- the configured world is gone, or the calendar
//!   has never been set up for it. The task logs remediation steps and stays
//!   cancelled until it is rebuilt.
//! - **Configuration** -- missing boundaries, words, or month names. These
//!   never fail the tick; the affected value is shown as `INVALID`.
//! - **Transient** -- the calendar reported a clock or date that cannot be
//!   parsed. The tick is skipped and the next one starts fresh.

use serde::Serialize;
use timebar_types::{BarColor, TimeOfDay, WorldId};
use tracing::{debug, error, info, warn};

use crate::bar::BarRegistry;
use crate::clock::{self, ClockError, ClockTime};
use crate::config::{SeasonsConfig, TimebarConfig};
use crate::source::{PlaceholderExpander, SeasonsApi, WorldHost};
use crate::time_of_day::{self, ClassifyError};
use crate::title::{self, INVALID, RenderContext, TitleRenderer};

/// Errors that can occur while running one tick.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The configured world is not loaded.
    #[error("{world} is not a valid world")]
    InvalidWorld {
        /// Configured world name.
        world: String,
    },

    /// The calendar has no date for the world yet.
    #[error("cannot retrieve date for world {world}")]
    CalendarNotInitialized {
        /// Configured world name.
        world: String,
    },

    /// The calendar reported an unusable clock.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The calendar reported a date that does not exist.
    #[error("calendar date {year}-{month}-{day} does not exist")]
    InvalidDate {
        /// Reported year.
        year: i32,
        /// Reported month.
        month: u32,
        /// Reported day.
        day: u32,
    },
}

impl TickError {
    /// The cancel reason if this error permanently stops the task.
    pub fn cancel_reason(&self) -> Option<CancelReason> {
        match self {
            Self::InvalidWorld { world } => Some(CancelReason::InvalidWorld {
                world: world.clone(),
            }),
            Self::CalendarNotInitialized { world } => Some(CancelReason::CalendarNotInitialized {
                world: world.clone(),
            }),
            Self::Clock { .. } | Self::InvalidDate { .. } => None,
        }
    }
}

/// Why the task stopped itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CancelReason {
    /// The configured world does not exist or was unloaded.
    InvalidWorld {
        /// Configured world name.
        world: String,
    },
    /// The seasons calendar was never set up for the world.
    CalendarNotInitialized {
        /// Configured world name.
        world: String,
    },
}

/// What a rendered tick produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickReport {
    /// Rendered title before placeholder expansion.
    pub title: String,
    /// Day progress pushed to the bars.
    pub progress: f32,
    /// Classified period, or `None` if classification failed.
    pub time_of_day: Option<TimeOfDay>,
    /// Number of bars updated.
    pub bars_updated: usize,
}

/// Result of one task invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TickOutcome {
    /// Bars were updated.
    Rendered(TickReport),
    /// A transient failure; nothing was updated.
    Skipped,
    /// The task has stopped and must be rebuilt to run again.
    Cancelled(CancelReason),
}

/// Collaborators handed to the task for one invocation.
pub struct TickContext<'a> {
    /// The game host.
    pub host: &'a dyn WorldHost,
    /// The seasons calendar.
    pub seasons: &'a dyn SeasonsApi,
    /// Bars of all connected viewers.
    pub bars: &'a mut BarRegistry,
    /// Placeholder expansion, when the add-on is present.
    pub placeholders: Option<&'a dyn PlaceholderExpander>,
}

/// The seasons display task for one configured world.
#[derive(Debug, Clone)]
pub struct SeasonsTask {
    world_name: String,
    world: Option<WorldId>,
    config: SeasonsConfig,
    renderer: TitleRenderer,
    template: String,
    color: BarColor,
    cancelled: Option<CancelReason>,
}

impl SeasonsTask {
    /// Build the task, resolving the world and compiling the date pattern.
    ///
    /// A missing world is not an error here; the first run reports it and
    /// cancels the task.
    pub fn new(config: &TimebarConfig, host: &dyn WorldHost) -> Self {
        let world = host.world(&config.world);
        let renderer = TitleRenderer::from_config(&config.seasons);
        let template = title::template_from_config(&config.seasons);

        info!(
            world = %config.world,
            resolved = world.is_some(),
            date_format = renderer.date_pattern().pattern(),
            use_24h = config.seasons.use_24h_format,
            "Seasons task created"
        );

        Self {
            world_name: config.world.clone(),
            world,
            config: config.seasons.clone(),
            renderer,
            template,
            color: config.bar.color,
            cancelled: None,
        }
    }

    /// Whether the task has cancelled itself.
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled.is_some()
    }

    /// Run one tick.
    ///
    /// Once a run returns [`TickOutcome::Cancelled`], every later run returns
    /// the same outcome without touching any collaborator.
    pub fn run(&mut self, ctx: &mut TickContext<'_>) -> TickOutcome {
        if let Some(reason) = &self.cancelled {
            debug!(?reason, "Seasons task is cancelled, ignoring tick");
            return TickOutcome::Cancelled(reason.clone());
        }

        match self.render_tick(ctx) {
            Ok(report) => TickOutcome::Rendered(report),
            Err(e) => {
                if let Some(reason) = e.cancel_reason() {
                    log_cancellation(&e);
                    self.cancelled = Some(reason.clone());
                    TickOutcome::Cancelled(reason)
                } else {
                    warn!(error = %e, "Seasons tick skipped");
                    TickOutcome::Skipped
                }
            }
        }
    }

    fn render_tick(&self, ctx: &mut TickContext<'_>) -> Result<TickReport, TickError> {
        let world = self
            .world
            .filter(|world| ctx.host.is_loaded(*world))
            .ok_or_else(|| TickError::InvalidWorld {
                world: self.world_name.clone(),
            })?;

        let season = ctx.seasons.season(world);
        let date = ctx
            .seasons
            .date(world)
            .ok_or_else(|| TickError::CalendarNotInitialized {
                world: self.world_name.clone(),
            })?;
        let invalid_date = || TickError::InvalidDate {
            year: date.year,
            month: date.month,
            day: date.day,
        };
        let naive_date = date.to_naive().ok_or_else(invalid_date)?;
        let month_key = time_of_day::month_key(date.month).ok_or_else(invalid_date)?;

        let clock = ClockTime::normalize(
            ctx.seasons.hours(world),
            ctx.seasons.minutes(world),
            ctx.seasons.seconds(world),
        )?;

        let classified = time_of_day::classify(&month_key, clock.time(), &self.config);
        let time_word = self.time_word(&classified, clock.time());

        let render_ctx = RenderContext {
            world_time: clock.time(),
            time_word,
            day_count: clock::day_count(ctx.host.full_time(world)),
            season,
            date: naive_date,
            day_name: ctx.seasons.day_of_week(world),
            month_name: ctx.seasons.current_month_name(world),
        };
        let title = self.renderer.render(&self.template, &render_ctx);
        let progress = clock.day_progress();

        let mut bars_updated: usize = 0;
        for (viewer, bar) in ctx.bars.iter_mut() {
            let shown = match ctx.placeholders {
                Some(expander) => expander.expand(viewer, &title),
                None => title.clone(),
            };
            bar.set_title(shown);
            bar.set_progress(progress);
            bar.set_color(self.color);
            bars_updated = bars_updated.saturating_add(1);
        }

        debug!(
            %title,
            progress,
            time = %clock.hhmm(),
            bars_updated,
            "Seasons tick rendered"
        );

        Ok(TickReport {
            title,
            progress,
            time_of_day: classified.ok(),
            bars_updated,
        })
    }

    /// Display word for a classification result, or [`INVALID`] (logged).
    fn time_word(
        &self,
        classified: &Result<TimeOfDay, ClassifyError>,
        time: chrono::NaiveTime,
    ) -> String {
        match classified {
            Ok(label) => self.config.time_word(*label).map_or_else(
                || {
                    error!(key = %format!("times.{}", label.key()), "time-of-day word is NOT SET");
                    INVALID.to_owned()
                },
                ToOwned::to_owned,
            ),
            Err(e) => {
                error!(error = %e, %time, "Unable to classify time of day");
                INVALID.to_owned()
            }
        }
    }
}

fn log_cancellation(e: &TickError) {
    match e {
        TickError::InvalidWorld { world } => {
            error!(world = %world, "{world} is not a valid world! Stopping the seasons display.");
        }
        TickError::CalendarNotInitialized { world } => {
            error!("Cannot retrieve date from the seasons calendar!");
            error!(
                world = %world,
                "Most likely, the seasons calendar has not been set up in the defined world: {world}"
            );
            error!("Enter the world and set its season (e.g. '/rs set <season>') to set it up.");
            error!("After setting up the season, reload TimeBar to restart the display.");
        }
        TickError::Clock { .. } | TickError::InvalidDate { .. } => {}
    }
}
