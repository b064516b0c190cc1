//! Shared type definitions for the `TimeBar` seasons display.
//!
//! This crate holds the value types that flow between the calendar source,
//! the title renderer, and the per-viewer bars.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for viewers and worlds
//! - [`enums`] -- Seasons, time-of-day periods, and bar colors
//! - [`calendar`] -- Calendar dates and upstream calendar names

pub mod calendar;
pub mod enums;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use calendar::{CalendarDate, CalendarName};
pub use enums::{BarColor, Season, TimeOfDay};
pub use ids::{ViewerId, WorldId};
