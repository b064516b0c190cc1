//! Per-viewer progress bars.
//!
//! The host attaches a bar when a viewer connects and detaches it when they
//! leave. The seasons task never creates or removes bars; it only updates
//! the title, progress, and color of the bars that exist.

use std::collections::BTreeMap;

use serde::Serialize;
use timebar_types::{BarColor, ViewerId};

/// A single viewer's bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BossBar {
    title: String,
    progress: f32,
    color: BarColor,
}

impl Default for BossBar {
    fn default() -> Self {
        Self {
            title: String::new(),
            progress: 0.0,
            color: BarColor::default(),
        }
    }
}

impl BossBar {
    /// Create an empty bar with the given color.
    pub fn new(color: BarColor) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Current title markup.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current progress, in `[0, 1]`.
    pub const fn progress(&self) -> f32 {
        self.progress
    }

    /// Current color.
    pub const fn color(&self) -> BarColor {
        self.color
    }

    /// Replace the title markup.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Set the progress, clamped to `[0, 1]`. NaN becomes 0.
    pub const fn set_progress(&mut self, progress: f32) {
        self.progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
    }

    /// Set the color.
    pub const fn set_color(&mut self, color: BarColor) {
        self.color = color;
    }
}

/// Bars keyed by viewer.
#[derive(Debug, Clone, Default)]
pub struct BarRegistry {
    bars: BTreeMap<ViewerId, BossBar>,
}

impl BarRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            bars: BTreeMap::new(),
        }
    }

    /// Attach a bar for a newly connected viewer. An existing bar for the
    /// same viewer is kept.
    pub fn attach(&mut self, viewer: ViewerId, color: BarColor) -> &mut BossBar {
        self.bars.entry(viewer).or_insert_with(|| BossBar::new(color))
    }

    /// Remove a disconnected viewer's bar.
    pub fn detach(&mut self, viewer: ViewerId) -> Option<BossBar> {
        self.bars.remove(&viewer)
    }

    /// Look up a viewer's bar.
    pub fn get(&self, viewer: ViewerId) -> Option<&BossBar> {
        self.bars.get(&viewer)
    }

    /// Number of attached bars.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Whether no bars are attached.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Iterate over all bars.
    pub fn iter(&self) -> impl Iterator<Item = (ViewerId, &BossBar)> {
        self.bars.iter().map(|(id, bar)| (*id, bar))
    }

    /// Iterate mutably over all bars.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ViewerId, &mut BossBar)> {
        self.bars.iter_mut().map(|(id, bar)| (*id, bar))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped() {
        let mut bar = BossBar::default();
        bar.set_progress(1.5);
        assert!((bar.progress() - 1.0).abs() < f32::EPSILON);
        bar.set_progress(-0.25);
        assert!(bar.progress().abs() < f32::EPSILON);
        bar.set_progress(f32::NAN);
        assert!(bar.progress().abs() < f32::EPSILON);
    }

    #[test]
    fn attach_keeps_existing_bar() {
        let mut bars = BarRegistry::new();
        let viewer = ViewerId::new();
        bars.attach(viewer, BarColor::Red).set_title("first");
        bars.attach(viewer, BarColor::Green);
        assert_eq!(bars.len(), 1);
        let bar = bars.get(viewer);
        assert_eq!(bar.map(BossBar::title), Some("first"));
        assert_eq!(bar.map(BossBar::color), Some(BarColor::Red));
    }

    #[test]
    fn detach_removes_bar() {
        let mut bars = BarRegistry::new();
        let viewer = ViewerId::new();
        bars.attach(viewer, BarColor::Blue);
        assert!(bars.detach(viewer).is_some());
        assert!(bars.is_empty());
        assert!(bars.detach(viewer).is_none());
    }

    #[test]
    fn iter_visits_every_viewer() {
        let mut bars = BarRegistry::new();
        let first = ViewerId::new();
        let second = ViewerId::new();
        bars.attach(first, BarColor::Blue);
        bars.attach(second, BarColor::Pink);
        let mut seen: Vec<ViewerId> = bars.iter().map(|(viewer, _)| viewer).collect();
        seen.sort_unstable();
        let mut expected = vec![first, second];
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }
}
