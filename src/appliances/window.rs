//! Declared functioning windows and their per-day randomized realization.

use std::ops::Range;

use rand::rngs::StdRng;
use serde::Deserialize;
use tracing::debug;

use super::types::{MINUTES_PER_DAY, round_minutes, symmetric_jitter};
use crate::error::ConfigError;

/// A half-open time-of-day interval `[start, end)` during which an appliance
/// may draw power.
///
/// # Examples
///
/// ```
/// use demand_sim::appliances::Window;
///
/// let lamp = Window::new(420, 540).with_random_var(0.35);
/// assert_eq!(lamp.len(), 120);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Window {
    /// `[start, end)` in minutes of the day.
    pub span: [usize; 2],
    /// Fraction of the window length by which each bound may move, in `[0, 1]`.
    #[serde(default)]
    pub random_var: f64,
}

impl Window {
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            span: [start, end],
            random_var: 0.0,
        }
    }

    pub fn with_random_var(mut self, random_var: f64) -> Self {
        self.random_var = random_var;
        self
    }

    pub fn start(&self) -> usize {
        self.span[0]
    }

    pub fn end(&self) -> usize {
        self.span[1]
    }

    /// Length in minutes (zero for an inverted declaration).
    pub fn len(&self) -> usize {
        self.end().saturating_sub(self.start())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    pub fn contains(&self, minute: usize) -> bool {
        self.range().contains(&minute)
    }
}

/// Checks an ordered window list: 1-3 entries, each inside the day, ascending
/// and non-overlapping, with `random_var` in `[0, 1]`.
pub fn validate_windows(windows: &[Window], path: &str) -> Vec<ConfigError> {
    let mut errors = Vec::new();

    if windows.is_empty() || windows.len() > 3 {
        errors.push(ConfigError::new(
            format!("{path}.windows"),
            format!("must declare 1 to 3 windows, got {}", windows.len()),
        ));
    }

    for (i, w) in windows.iter().enumerate() {
        let field = format!("{path}.windows[{i}]");
        if w.start() >= w.end() {
            errors.push(ConfigError::new(
                &field,
                format!("start {} must be < end {}", w.start(), w.end()),
            ));
        }
        if w.end() > MINUTES_PER_DAY {
            errors.push(ConfigError::new(
                &field,
                format!("end {} must be <= {MINUTES_PER_DAY}", w.end()),
            ));
        }
        if !(0.0..=1.0).contains(&w.random_var) {
            errors.push(ConfigError::new(
                format!("{field}.random_var"),
                "must be in [0.0, 1.0]",
            ));
        }
    }

    for (i, pair) in windows.windows(2).enumerate() {
        if pair[1].start() < pair[0].end() {
            errors.push(ConfigError::new(
                format!("{path}.windows[{}]", i + 1),
                format!(
                    "overlaps or precedes windows[{i}] ({}..{} vs {}..{})",
                    pair[0].start(),
                    pair[0].end(),
                    pair[1].start(),
                    pair[1].end()
                ),
            ));
        }
    }

    errors
}

/// Turns declared windows into the windows actually used on one day.
///
/// Each bound moves by a uniform draw from `[-r·L/2, r·L/2]`, where `r` is
/// the window's `random_var` and `L` its declared length.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowSampler;

impl WindowSampler {
    /// Realizes one window. Returns `None` when the perturbed window collapses
    /// to zero length after clamping to the day.
    pub fn realize(&self, window: &Window, rng: &mut StdRng) -> Option<Range<usize>> {
        if window.random_var <= 0.0 {
            return (!window.is_empty()).then(|| window.range());
        }

        let half_width = window.random_var * window.len() as f64 / 2.0;
        let start = window.start() as f64 + symmetric_jitter(rng, half_width);
        let end = window.end() as f64 + symmetric_jitter(rng, half_width);
        let start = round_minutes(start, 0, MINUTES_PER_DAY);
        let end = round_minutes(end, 0, MINUTES_PER_DAY);

        if start >= end {
            debug!(
                declared_start = window.start(),
                declared_end = window.end(),
                "realized window collapsed, contributing no power"
            );
            return None;
        }
        Some(start..end)
    }

    /// Realizes every window in order.
    ///
    /// A realized window that reaches back into its predecessor is trimmed to
    /// start at the predecessor's end, so the result never overlaps.
    pub fn realize_all(&self, windows: &[Window], rng: &mut StdRng) -> Vec<Range<usize>> {
        let mut realized: Vec<Range<usize>> = Vec::with_capacity(windows.len());
        for window in windows {
            let Some(mut range) = self.realize(window, rng) else {
                continue;
            };
            if let Some(prev) = realized.last() {
                range.start = range.start.max(prev.end);
            }
            if range.start < range.end {
                realized.push(range);
            }
        }
        realized
    }
}
