//! Integration tests for the seasons display task.
//!
//! A [`GameClock`] stands in for the seasons calendar so whole runs can be
//! driven through the scheduled loop: configuration is parsed from YAML,
//! the clock advances between invocations, and the rendered titles are
//! checked on the viewers' bars.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeSet;
use std::sync::Arc;

use serde_json::Value;
use timebar_core::bar::BarRegistry;
use timebar_core::clock::GameClock;
use timebar_core::config::TimebarConfig;
use timebar_core::control::TaskControl;
use timebar_core::runner::{
    BoundTask, NoOpObserver, RunEndReason, TickObserver, Tickable, run_scheduled,
};
use timebar_core::source::{SeasonsApi, WorldHost};
use timebar_core::task::{CancelReason, SeasonsTask, TickContext, TickOutcome};
use timebar_types::{BarColor, CalendarDate, CalendarName, Season, TimeOfDay, ViewerId, WorldId};

/// A world whose calendar follows a [`GameClock`].
struct ClockWorld {
    id: WorldId,
    clock: GameClock,
    initialized: bool,
}

impl ClockWorld {
    fn new(start: CalendarDate) -> Self {
        Self {
            id: WorldId::new(),
            clock: GameClock::new(start).unwrap(),
            initialized: true,
        }
    }

    fn at(start: CalendarDate, tick: u64) -> Self {
        Self {
            clock: GameClock::from_parts(tick, start).unwrap(),
            ..Self::new(start)
        }
    }
}

impl WorldHost for ClockWorld {
    fn world(&self, name: &str) -> Option<WorldId> {
        (name == "world").then_some(self.id)
    }

    fn is_loaded(&self, world: WorldId) -> bool {
        world == self.id
    }

    fn full_time(&self, _world: WorldId) -> u64 {
        self.clock.tick()
    }
}

impl SeasonsApi for ClockWorld {
    fn season(&self, _world: WorldId) -> Season {
        self.clock.season()
    }

    fn date(&self, _world: WorldId) -> Option<CalendarDate> {
        if self.initialized {
            self.clock.calendar_date()
        } else {
            None
        }
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
        self.clock
            .day_of_week()
            .map_or(CalendarName::Disabled, |name| CalendarName::from_upstream(&name))
    }

    fn current_month_name(&self, _world: WorldId) -> CalendarName {
        self.clock
            .month_name()
            .map_or(CalendarName::Disabled, |name| CalendarName::from_upstream(&name))
    }
}

/// Advances the world clock by one game hour before every invocation.
struct HourlyDriver {
    world: ClockWorld,
    bars: BarRegistry,
    task: SeasonsTask,
}

impl Tickable for HourlyDriver {
    fn tick(&mut self) -> TickOutcome {
        let _ = self.world.clock.advance(1_000).unwrap();
        let mut ctx = TickContext {
            host: &self.world,
            seasons: &self.world,
            bars: &mut self.bars,
            placeholders: None,
        };
        self.task.run(&mut ctx)
    }
}

#[derive(Default)]
struct Periods {
    seen: BTreeSet<TimeOfDay>,
    titles: Vec<String>,
}

impl TickObserver for Periods {
    fn on_tick(&mut self, _tick: u64, outcome: &TickOutcome) {
        if let TickOutcome::Rendered(report) = outcome {
            self.seen.extend(report.time_of_day);
            self.titles.push(report.title.clone());
        }
    }
}

const GERMAN_CONFIG: &str = r#"
world: "world"
bar:
  color: green
seasons:
  date-format: "dd.MM.yyyy"
  use-24h-format: true
  timebar-title: "{TIME} {TIME-WORD} - {DAY}, {MONTH} {DATE} ({SEASON}, Tag {DAYCOUNT})"
  month:
    july:
      name: "Heumond"
      midnight: "00:00"
      dawn: "04:45"
      morning: "05:45"
      noon: "12:00"
      afternoon: "13:00"
      sunset: "20:30"
      night: "21:30"
  times:
    midnight: "Mitternacht"
    dawn: "Morgengrauen"
    morning: "Morgen"
    noon: "Mittag"
    afternoon: "Nachmittag"
    sunset: "Abend"
    night: "Nacht"
"#;

#[test]
fn yaml_config_drives_the_title() {
    let config = TimebarConfig::parse(GERMAN_CONFIG).unwrap();
    // 2024-07-15 is a Monday; tick 48_000 + 15_750 is 21:45 on the third day.
    let world = ClockWorld::at(CalendarDate::new(2024, 7, 13), 63_750);
    let mut task = SeasonsTask::new(&config, &world);
    let mut bars = BarRegistry::new();
    let viewer = ViewerId::new();
    bars.attach(viewer, BarColor::Blue);

    let mut ctx = TickContext {
        host: &world,
        seasons: &world,
        bars: &mut bars,
        placeholders: None,
    };
    let report = match task.run(&mut ctx) {
        TickOutcome::Rendered(report) => Some(report),
        TickOutcome::Skipped | TickOutcome::Cancelled(_) => None,
    }
    .unwrap();

    assert_eq!(
        report.title,
        "21:45 Nacht - Monday, Heumond 15.07.2024 (SUMMER, Tag 2)"
    );
    let bar = bars.get(viewer).unwrap();
    assert_eq!(bar.title(), report.title);
    assert_eq!(bar.color(), BarColor::Green);
    assert!((bar.progress() - 0.906_25).abs() < 1e-4);
}

#[tokio::test(start_paused = true)]
async fn a_full_day_visits_every_period() {
    let config = TimebarConfig::default();
    let world = ClockWorld::new(CalendarDate::new(2024, 3, 10));
    let task = SeasonsTask::new(&config, &world);
    let mut bars = BarRegistry::new();
    bars.attach(ViewerId::new(), BarColor::Blue);
    let mut driver = HourlyDriver { world, bars, task };

    let control = Arc::new(TaskControl::new(0, 24));
    let mut observer = Periods::default();
    let result = run_scheduled(&mut driver, &control, &mut observer).await;

    assert_eq!(result.end_reason, RunEndReason::MaxTicksReached);
    assert_eq!(result.total_ticks, 24);
    assert_eq!(result.skipped_ticks, 0);
    assert_eq!(observer.seen.len(), TimeOfDay::ALL.len());
    assert_eq!(
        observer.titles.first().map(String::as_str),
        Some("07:00 AM - morning (3/10/2024) - SPRING")
    );
    assert_eq!(
        observer.titles.last().map(String::as_str),
        Some("06:00 AM - dawn (3/11/2024) - SPRING")
    );
}

#[tokio::test(start_paused = true)]
async fn uninitialized_calendar_ends_the_run() {
    let config = TimebarConfig::default();
    let mut world = ClockWorld::new(CalendarDate::new(2024, 3, 10));
    world.initialized = false;
    let mut task = SeasonsTask::new(&config, &world);
    let mut bars = BarRegistry::new();

    let mut bound = BoundTask {
        task: &mut task,
        ctx: TickContext {
            host: &world,
            seasons: &world,
            bars: &mut bars,
            placeholders: None,
        },
    };
    let control = Arc::new(TaskControl::new(0, 10));
    let result = run_scheduled(&mut bound, &control, &mut NoOpObserver).await;

    assert_eq!(
        result.end_reason,
        RunEndReason::Cancelled(CancelReason::CalendarNotInitialized {
            world: "world".to_owned()
        })
    );
    assert_eq!(result.total_ticks, 1);
    assert!(task.is_cancelled());
}

#[test]
fn report_serializes_to_json() {
    let config = TimebarConfig::default();
    let world = ClockWorld::at(CalendarDate::new(2024, 7, 15), 6_000);
    let mut task = SeasonsTask::new(&config, &world);
    let mut bars = BarRegistry::new();
    let mut ctx = TickContext {
        host: &world,
        seasons: &world,
        bars: &mut bars,
        placeholders: None,
    };

    let outcome = task.run(&mut ctx);
    let json = serde_json::to_value(&outcome).unwrap();

    assert_eq!(
        json.pointer("/Rendered/title").and_then(Value::as_str),
        Some("12:00 PM - noon (7/15/2024) - SUMMER")
    );
    assert_eq!(
        json.pointer("/Rendered/bars_updated").and_then(Value::as_u64),
        Some(0)
    );
}
