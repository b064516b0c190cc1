//! Binds the seasons task to the simulated world for the scheduled loop.
//!
//! Every invocation first advances world time by the configured number of
//! game ticks, then runs the task against the world and the viewers' bars.

use timebar_core::bar::BarRegistry;
use timebar_core::runner::{TickObserver, Tickable};
use timebar_core::source::{PlaceholderExpander, StaticPlaceholders};
use timebar_core::task::{SeasonsTask, TickContext, TickOutcome};
use tracing::{debug, error, info};

use crate::simulated::SimulatedWorld;

/// The simulated world, its viewers' bars, and the task driving them.
pub struct Driver {
    world: SimulatedWorld,
    bars: BarRegistry,
    task: SeasonsTask,
    placeholders: Option<StaticPlaceholders>,
    ticks_per_update: u64,
}

impl Driver {
    /// Create a driver. `placeholders` is `None` when expansion is off.
    pub const fn new(
        world: SimulatedWorld,
        bars: BarRegistry,
        task: SeasonsTask,
        placeholders: Option<StaticPlaceholders>,
        ticks_per_update: u64,
    ) -> Self {
        Self {
            world,
            bars,
            task,
            placeholders,
            ticks_per_update,
        }
    }

    /// The viewers' bars.
    pub const fn bars(&self) -> &BarRegistry {
        &self.bars
    }

    /// The simulated world.
    pub const fn world(&self) -> &SimulatedWorld {
        &self.world
    }
}

impl Tickable for Driver {
    fn tick(&mut self) -> TickOutcome {
        if let Err(e) = self.world.advance(self.ticks_per_update) {
            error!(error = %e, "Simulated world clock cannot advance");
            return TickOutcome::Skipped;
        }

        let mut ctx = TickContext {
            host: &self.world,
            seasons: &self.world,
            bars: &mut self.bars,
            placeholders: self
                .placeholders
                .as_ref()
                .map(|p| p as &dyn PlaceholderExpander),
        };
        self.task.run(&mut ctx)
    }
}

/// Logs every rendered title as a JSON record.
pub struct TitleLogObserver;

impl TickObserver for TitleLogObserver {
    fn on_tick(&mut self, tick: u64, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Rendered(report) => match serde_json::to_string(report) {
                Ok(json) => info!(tick, report = %json, "Title rendered"),
                Err(e) => error!(tick, error = %e, "Failed to serialize tick report"),
            },
            TickOutcome::Skipped => debug!(tick, "Tick skipped"),
            TickOutcome::Cancelled(_) => {}
        }
    }
}
