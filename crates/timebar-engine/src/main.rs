//! `TimeBar` engine binary.
//!
//! Runs the seasons display task against an in-process simulated world and
//! logs the title every viewer would see.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `timebar-config.yaml` (or `TIMEBAR_CONFIG`)
//! 2. Initialize structured logging (tracing)
//! 3. Create the simulated world and attach the demo viewers' bars
//! 4. Build the seasons task and the task control
//! 5. Run the scheduled loop until Ctrl-C, the tick limit, or cancellation
//! 6. Log the result

mod driver;
mod error;
mod simulated;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use timebar_core::bar::BarRegistry;
use timebar_core::config::TimebarConfig;
use timebar_core::control::TaskControl;
use timebar_core::runner;
use timebar_core::source::StaticPlaceholders;
use timebar_core::task::SeasonsTask;
use timebar_types::ViewerId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::driver::{Driver, TitleLogObserver};
use crate::error::EngineError;
use crate::simulated::SimulatedWorld;

/// Default configuration file, relative to the working directory.
const CONFIG_FILE: &str = "timebar-config.yaml";

/// Environment variable overriding the configuration file path.
const CONFIG_PATH_ENV: &str = "TIMEBAR_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load configuration. Logging is not up yet, so remember where it came from.
    let config_path = config_path();
    let (config, from_file) = load_config(&config_path).context("loading configuration")?;

    // 2. Initialize structured logging; RUST_LOG wins over the config level.
    init_tracing(&config.logging.level)?;
    info!("timebar-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Simulated world and viewers.
    let world = SimulatedWorld::new(&config.world, &config.simulation).map_err(EngineError::from)?;
    let mut bars = BarRegistry::new();
    for _ in 0..config.simulation.viewers {
        let viewer = ViewerId::new();
        bars.attach(viewer, config.bar.color);
        info!(viewer = %viewer, "Viewer connected");
    }
    info!(
        world = world.name(),
        start_date = ?config.simulation.start_date,
        calendar_initialized = config.simulation.calendar_initialized,
        viewers = bars.len(),
        ticks_per_update = config.simulation.ticks_per_update,
        "Simulated world created"
    );

    // 4. Task and control.
    let task = SeasonsTask::new(&config, &world);
    let placeholders = if config.simulation.placeholders.is_empty() {
        None
    } else {
        Some(StaticPlaceholders::new(config.simulation.placeholders.clone()))
    };
    let mut driver = Driver::new(
        world,
        bars,
        task,
        placeholders,
        config.simulation.ticks_per_update,
    );
    let control = Arc::new(TaskControl::new(
        config.tick_interval_ms,
        config.simulation.max_ticks,
    ));

    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 5. Run.
    let result = runner::run_scheduled(&mut driver, &control, &mut TitleLogObserver).await;

    // 6. Log results.
    runner::log_run_end(&result);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        world_tick = driver.world().clock().tick(),
        viewers = driver.bars().len(),
        elapsed_seconds = control.elapsed_seconds(),
        "timebar-engine shutdown complete"
    );
    for (viewer, bar) in driver.bars().iter() {
        info!(
            viewer = %viewer,
            title = bar.title(),
            progress = bar.progress(),
            color = ?bar.color(),
            "Final bar"
        );
    }

    Ok(())
}

fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV).map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from)
}

/// Load the configuration, falling back to defaults when the file is
/// absent. Returns whether the file was read.
fn load_config(path: &Path) -> Result<(TimebarConfig, bool), EngineError> {
    if path.exists() {
        Ok((TimebarConfig::from_file(path)?, true))
    } else {
        let mut config = TimebarConfig::default();
        config.apply_env_overrides();
        Ok((config, false))
    }
}

fn init_tracing(default_level: &str) -> Result<(), EngineError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_level).map_err(|e| EngineError::LogFilter {
            filter: default_level.to_owned(),
            message: e.to_string(),
        })?,
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
    Ok(())
}
