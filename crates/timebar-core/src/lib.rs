//! Time-of-day classification, title rendering, and the per-tick seasons
//! display task for `TimeBar`.
//!
//! Every tick the [`SeasonsTask`] reads the season, date, and clock of one
//! world from the seasons calendar, classifies the time into a period of
//! the day using per-month boundaries, renders the configured title
//! template, and pushes the title and day progress to every viewer's bar.
//!
//! # Modules
//!
//! - [`bar`] -- Per-viewer bars and the registry the host keeps them in.
//! - [`clock`] -- Clock normalization, day progress, and the game clock.
//! - [`config`] -- Configuration loading from `timebar-config.yaml` into
//!   strongly-typed structs.
//! - [`control`] -- Shared stop flag and tick interval for the loop.
//! - [`date_format`] -- Letter date patterns compiled to `chrono` formats.
//! - [`runner`] -- The scheduled loop driving a [`Tickable`].
//! - [`source`] -- [`WorldHost`], [`SeasonsApi`], and placeholder seams.
//! - [`task`] -- The per-tick seasons display task.
//! - [`time_of_day`] -- Boundary resolution and period classification.
//! - [`title`] -- Title template rendering.
//!
//! [`SeasonsTask`]: task::SeasonsTask
//! [`Tickable`]: runner::Tickable
//! [`WorldHost`]: source::WorldHost
//! [`SeasonsApi`]: source::SeasonsApi

pub mod bar;
pub mod clock;
pub mod config;
pub mod control;
pub mod date_format;
pub mod runner;
pub mod source;
pub mod task;
pub mod time_of_day;
pub mod title;
