//! Shared control state for the scheduled task loop.
//!
//! [`TaskControl`] is wrapped in an [`Arc`](std::sync::Arc) and shared
//! between the loop and whoever may stop it (a signal handler, a reload
//! command). The stop flag is an atomic so the loop never takes a lock.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tracing::warn;

/// Smallest accepted tick interval. Shorter configured intervals are
/// raised to this.
pub const MIN_TICK_INTERVAL_MS: u64 = 100;

/// Stop flag, tick interval, and bounds for one scheduled run.
#[derive(Debug)]
pub struct TaskControl {
    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Wakes the loop out of its sleep when a stop is requested.
    stop_notify: Notify,

    /// Tick interval in milliseconds, never below [`MIN_TICK_INTERVAL_MS`].
    tick_interval_ms: u64,

    /// Maximum number of invocations (0 = unlimited).
    max_ticks: u64,

    /// Wall-clock time the control was created.
    started_at: DateTime<Utc>,
}

impl TaskControl {
    /// Create control state for a run.
    ///
    /// An interval below [`MIN_TICK_INTERVAL_MS`] is raised to the floor
    /// and logged.
    pub fn new(tick_interval_ms: u64, max_ticks: u64) -> Self {
        if tick_interval_ms < MIN_TICK_INTERVAL_MS {
            warn!(
                configured = tick_interval_ms,
                floor = MIN_TICK_INTERVAL_MS,
                "tick_interval_ms is below the floor, using the floor"
            );
        }
        Self {
            stop_requested: AtomicBool::new(false),
            stop_notify: Notify::new(),
            tick_interval_ms: tick_interval_ms.max(MIN_TICK_INTERVAL_MS),
            max_ticks,
            started_at: Utc::now(),
        }
    }

    /// Request a clean stop. The loop exits before its next invocation.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.stop_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait until a stop is requested. Returns immediately if one already was.
    pub async fn stopped(&self) {
        while !self.is_stop_requested() {
            self.stop_notify.notified().await;
        }
    }

    /// Tick interval in milliseconds.
    pub const fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms
    }

    /// Configured invocation limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Whether `completed` invocations reach the limit.
    pub const fn tick_limit_reached(&self, completed: u64) -> bool {
        self.max_ticks > 0 && completed >= self.max_ticks
    }

    /// Seconds since the control was created.
    pub fn elapsed_seconds(&self) -> u64 {
        let elapsed = Utc::now()
            .signed_duration_since(self.started_at)
            .num_seconds();
        u64::try_from(elapsed.max(0)).unwrap_or(u64::MAX)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    #[test]
    fn stop_flag() {
        let control = TaskControl::new(1_000, 0);
        assert!(!control.is_stop_requested());
        control.request_stop();
        assert!(control.is_stop_requested());
    }

    #[test]
    fn tick_interval_has_a_floor() {
        assert!(TaskControl::new(0, 0).tick_interval_ms() >= MIN_TICK_INTERVAL_MS);
        assert_eq!(TaskControl::new(50, 0).tick_interval_ms(), MIN_TICK_INTERVAL_MS);
        assert_eq!(TaskControl::new(250, 0).tick_interval_ms(), 250);
    }

    #[test]
    fn tick_limit() {
        let unlimited = TaskControl::new(1_000, 0);
        assert!(!unlimited.tick_limit_reached(u64::MAX));

        let bounded = TaskControl::new(1_000, 3);
        assert!(!bounded.tick_limit_reached(2));
        assert!(bounded.tick_limit_reached(3));
    }

    #[tokio::test]
    async fn stopped_returns_after_request() {
        let control = Arc::new(TaskControl::new(1_000, 0));
        let waiter = {
            let control = Arc::clone(&control);
            tokio::spawn(async move { control.stopped().await })
        };
        control.request_stop();
        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(matches!(joined, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stopped_is_immediate_when_already_requested() {
        let control = TaskControl::new(1_000, 0);
        control.request_stop();
        control.stopped().await;
    }
}
