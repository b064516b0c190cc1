//! Scheduled task loop.
//!
//! [`run_scheduled`] invokes a [`Tickable`] once per tick interval until
//! one of these happens:
//!
//! - a stop is requested through [`TaskControl`]
//! - the configured invocation limit is reached
//! - the task cancels itself
//!
//! Invocations never overlap: the next one starts only after the previous
//! one returned and the interval elapsed.

use std::sync::Arc;

use serde::Serialize;
use tokio::time::Duration;
use tracing::{debug, info, warn};

use crate::control::TaskControl;
use crate::task::{CancelReason, SeasonsTask, TickContext, TickOutcome, TickReport};

/// Something the loop can invoke once per tick.
pub trait Tickable {
    /// Run one invocation.
    fn tick(&mut self) -> TickOutcome;
}

/// A [`SeasonsTask`] bound to its collaborators for a whole run.
pub struct BoundTask<'a> {
    /// The task.
    pub task: &'a mut SeasonsTask,
    /// Collaborators handed to every invocation.
    pub ctx: TickContext<'a>,
}

impl Tickable for BoundTask<'_> {
    fn tick(&mut self) -> TickOutcome {
        self.task.run(&mut self.ctx)
    }
}

/// Why the loop ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RunEndReason {
    /// A stop was requested.
    Stopped,
    /// The invocation limit was reached.
    MaxTicksReached,
    /// The task cancelled itself.
    Cancelled(CancelReason),
}

/// Result of a scheduled run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunResult {
    /// Why the loop ended.
    pub end_reason: RunEndReason,
    /// Total invocations, including skipped and cancelling ones.
    pub total_ticks: u64,
    /// Invocations that were skipped.
    pub skipped_ticks: u64,
    /// The last rendered tick, if any.
    pub last_report: Option<TickReport>,
}

/// Callback invoked after every invocation.
pub trait TickObserver: Send {
    /// Called with the 1-based invocation number and its outcome.
    fn on_tick(&mut self, tick: u64, outcome: &TickOutcome);
}

/// A no-op observer.
pub struct NoOpObserver;

impl TickObserver for NoOpObserver {
    fn on_tick(&mut self, _tick: u64, _outcome: &TickOutcome) {}
}

/// Run `task` on the control's schedule until the loop ends.
pub async fn run_scheduled<T: Tickable + ?Sized>(
    task: &mut T,
    control: &Arc<TaskControl>,
    observer: &mut dyn TickObserver,
) -> RunResult {
    let mut total_ticks: u64 = 0;
    let mut skipped_ticks: u64 = 0;
    let mut last_report: Option<TickReport> = None;

    info!(
        tick_interval_ms = control.tick_interval_ms(),
        max_ticks = control.max_ticks(),
        "Scheduled task starting"
    );

    loop {
        if control.is_stop_requested() {
            info!("Stop requested");
            return RunResult {
                end_reason: RunEndReason::Stopped,
                total_ticks,
                skipped_ticks,
                last_report,
            };
        }

        let outcome = task.tick();
        total_ticks = total_ticks.saturating_add(1);
        observer.on_tick(total_ticks, &outcome);

        match outcome {
            TickOutcome::Rendered(report) => {
                debug!(tick = total_ticks, title = %report.title, "Tick complete");
                last_report = Some(report);
            }
            TickOutcome::Skipped => {
                skipped_ticks = skipped_ticks.saturating_add(1);
            }
            TickOutcome::Cancelled(reason) => {
                warn!(tick = total_ticks, ?reason, "Task cancelled itself");
                return RunResult {
                    end_reason: RunEndReason::Cancelled(reason),
                    total_ticks,
                    skipped_ticks,
                    last_report,
                };
            }
        }

        if control.tick_limit_reached(total_ticks) {
            info!(
                total_ticks,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            return RunResult {
                end_reason: RunEndReason::MaxTicksReached,
                total_ticks,
                skipped_ticks,
                last_report,
            };
        }

        tokio::select! {
            () = tokio::time::sleep(Duration::from_millis(control.tick_interval_ms())) => {}
            () = control.stopped() => {}
        }
    }
}

/// Log how a run ended.
pub fn log_run_end(result: &RunResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        skipped_ticks = result.skipped_ticks,
        "Scheduled task ended"
    );

    if let Some(ref report) = result.last_report {
        info!(
            title = %report.title,
            progress = report.progress,
            bars = report.bars_updated,
            "Last rendered title"
        );
    } else {
        warn!("Scheduled task ended without rendering a title");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;

    use super::*;

    /// Replays a fixed list of outcomes, then renders forever.
    struct Scripted {
        outcomes: VecDeque<TickOutcome>,
        calls: u64,
    }

    impl Scripted {
        fn new(outcomes: Vec<TickOutcome>) -> Self {
            Self {
                outcomes: outcomes.into(),
                calls: 0,
            }
        }
    }

    fn rendered(title: &str) -> TickOutcome {
        TickOutcome::Rendered(TickReport {
            title: title.to_owned(),
            progress: 0.5,
            time_of_day: None,
            bars_updated: 1,
        })
    }

    impl Tickable for Scripted {
        fn tick(&mut self) -> TickOutcome {
            self.calls = self.calls.saturating_add(1);
            self.outcomes
                .pop_front()
                .unwrap_or_else(|| rendered("steady"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_by_max_ticks() {
        let mut task = Scripted::new(Vec::new());
        let control = Arc::new(TaskControl::new(0, 5));

        let result = run_scheduled(&mut task, &control, &mut NoOpObserver).await;

        assert_eq!(result.end_reason, RunEndReason::MaxTicksReached);
        assert_eq!(result.total_ticks, 5);
        assert_eq!(task.calls, 5);
        assert_eq!(result.last_report.map(|r| r.title), Some("steady".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_still_waits_between_ticks() {
        let mut task = Scripted::new(Vec::new());
        let control = Arc::new(TaskControl::new(0, 3));
        let started = tokio::time::Instant::now();

        let result = run_scheduled(&mut task, &control, &mut NoOpObserver).await;

        assert_eq!(result.total_ticks, 3);
        // Two sleeps at the floor between three ticks.
        assert!(started.elapsed() >= Duration::from_millis(200));
    }

    #[tokio::test(start_paused = true)]
    async fn stop_before_first_tick() {
        let mut task = Scripted::new(Vec::new());
        let control = Arc::new(TaskControl::new(0, 0));
        control.request_stop();

        let result = run_scheduled(&mut task, &control, &mut NoOpObserver).await;

        assert_eq!(result.end_reason, RunEndReason::Stopped);
        assert_eq!(result.total_ticks, 0);
        assert_eq!(task.calls, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_ends_the_loop() {
        let reason = CancelReason::CalendarNotInitialized {
            world: "world".to_owned(),
        };
        let mut task = Scripted::new(vec![
            rendered("first"),
            TickOutcome::Skipped,
            TickOutcome::Cancelled(reason.clone()),
        ]);
        let control = Arc::new(TaskControl::new(0, 0));

        let result = run_scheduled(&mut task, &control, &mut NoOpObserver).await;

        assert_eq!(result.end_reason, RunEndReason::Cancelled(reason));
        assert_eq!(result.total_ticks, 3);
        assert_eq!(result.skipped_ticks, 1);
        assert_eq!(result.last_report.map(|r| r.title), Some("first".to_owned()));
    }

    #[tokio::test(start_paused = true)]
    async fn observer_sees_every_tick() {
        struct Counting {
            seen: Vec<u64>,
        }
        impl TickObserver for Counting {
            fn on_tick(&mut self, tick: u64, _outcome: &TickOutcome) {
                self.seen.push(tick);
            }
        }

        let mut task = Scripted::new(Vec::new());
        let control = Arc::new(TaskControl::new(0, 3));
        let mut observer = Counting { seen: Vec::new() };

        let _ = run_scheduled(&mut task, &control, &mut observer).await;

        assert_eq!(observer.seen, vec![1, 2, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_interrupts_the_sleep() {
        let control = Arc::new(TaskControl::new(60_000, 0));
        let stopper = {
            let control = Arc::clone(&control);
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(10)).await;
                control.request_stop();
            })
        };

        let mut task = Scripted::new(Vec::new());
        let result = run_scheduled(&mut task, &control, &mut NoOpObserver).await;
        stopper.await.unwrap();

        assert_eq!(result.end_reason, RunEndReason::Stopped);
        assert_eq!(result.total_ticks, 1);
    }
}
