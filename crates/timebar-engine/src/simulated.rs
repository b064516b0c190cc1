//! An in-process world whose seasons calendar follows a [`GameClock`].
//!
//! Stands in for a game host and its seasons add-on so the display task can
//! run without either. The calendar can be left uninitialized to exercise
//! the task's setup guidance.

use timebar_core::clock::{ClockError, GameClock};
use timebar_core::config::SimulationConfig;
use timebar_core::source::{SeasonsApi, WorldHost};
use timebar_types::{CalendarDate, CalendarName, Season, WorldId};

/// A single simulated world.
#[derive(Debug, Clone)]
pub struct SimulatedWorld {
    id: WorldId,
    name: String,
    clock: GameClock,
    names_disabled: bool,
    calendar_initialized: bool,
    loaded: bool,
}

impl SimulatedWorld {
    /// Create a loaded world at tick 0 of the configured start date.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if the start date does not exist.
    pub fn new(name: &str, sim: &SimulationConfig) -> Result<Self, ClockError> {
        Ok(Self {
            id: WorldId::new(),
            name: name.to_owned(),
            clock: GameClock::new(sim.start_date)?,
            names_disabled: sim.names_disabled,
            calendar_initialized: sim.calendar_initialized,
            loaded: true,
        })
    }

    /// The world's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The world's clock.
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Advance world time.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would overflow.
    pub fn advance(&mut self, ticks: u64) -> Result<u64, ClockError> {
        self.clock.advance(ticks)
    }

    /// Load or unload the world.
    #[cfg(test)]
    pub const fn set_loaded(&mut self, loaded: bool) {
        self.loaded = loaded;
    }

    /// Report a clock name the way the seasons add-on does: the raw name,
    /// or the literal disabled marker.
    fn calendar_name(&self, name: Option<String>) -> CalendarName {
        let raw = match name {
            Some(name) if !self.names_disabled => name,
            _ => CalendarName::DISABLED.to_owned(),
        };
        CalendarName::from_upstream(&raw)
    }
}

impl WorldHost for SimulatedWorld {
    fn world(&self, name: &str) -> Option<WorldId> {
        (self.loaded && name == self.name).then_some(self.id)
    }

    fn is_loaded(&self, world: WorldId) -> bool {
        self.loaded && world == self.id
    }

    fn full_time(&self, _world: WorldId) -> u64 {
        self.clock.tick()
    }
}

impl SeasonsApi for SimulatedWorld {
    fn season(&self, _world: WorldId) -> Season {
        if self.calendar_initialized {
            self.clock.season()
        } else {
            Season::Disabled
        }
    }

    fn date(&self, _world: WorldId) -> Option<CalendarDate> {
        self.calendar_initialized
            .then(|| self.clock.calendar_date())
            .flatten()
    }

    fn hours(&self, _world: WorldId) -> i32 {
        self.clock.hours()
    }

    fn minutes(&self, _world: WorldId) -> i32 {
        self.clock.minutes()
    }

    fn seconds(&self, _world: WorldId) -> i32 {
        self.clock.seconds()
    }

    fn day_of_week(&self, _world: WorldId) -> CalendarName {
        self.calendar_name(self.clock.day_of_week())
    }

    fn current_month_name(&self, _world: WorldId) -> CalendarName {
        self.calendar_name(self.clock.month_name())
    }
}
