//! Duty-cycle model: up to three repeating power patterns, each assigned to
//! regions of the appliance's functioning windows.

use std::ops::Range;

use rand::rngs::StdRng;
use serde::Deserialize;

use super::types::{MINUTES_PER_DAY, round_minutes, symmetric_jitter};
use super::window::Window;
use crate::error::ConfigError;

/// Maximum number of sub-cycles per appliance.
pub const MAX_CYCLES: usize = 3;
/// Maximum number of power segments per sub-cycle.
pub const MAX_SEGMENTS: usize = 2;

/// One power level held for a nominal number of minutes.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    pub power: f64,
    pub duration: usize,
}

/// A repeating pattern of one or two segments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubCycle {
    pub segments: Vec<Segment>,
    /// Fraction by which each segment duration may vary per day, in `[0, 1]`.
    #[serde(default)]
    pub random_var: f64,
}

impl SubCycle {
    /// A sub-cycle with a single segment.
    pub fn single(power: f64, duration: usize, random_var: f64) -> Self {
        Self {
            segments: vec![Segment { power, duration }],
            random_var,
        }
    }

    /// A sub-cycle alternating between two segments.
    pub fn double(p1: f64, t1: usize, p2: f64, t2: usize, random_var: f64) -> Self {
        Self {
            segments: vec![
                Segment {
                    power: p1,
                    duration: t1,
                },
                Segment {
                    power: p2,
                    duration: t2,
                },
            ],
            random_var,
        }
    }
}

/// Assigns a sub-cycle (1-based) to a span of the day.
///
/// Both bounds of `window` are inclusive, except that a last minute of
/// `1440` stands for the end of the day: `[0, 419]` governs minutes
/// `0..420` and `[1020, 1440]` governs `1020..1440`.
///
/// Appliance windows are half-open, so a cycle window must end one minute
/// before its appliance window does. `[420, 540]` over a `420..540`
/// appliance window is rejected for covering minute 540; `[420, 539]` fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CycleWindow {
    pub cycle: usize,
    pub window: [usize; 2],
}

impl CycleWindow {
    pub fn new(cycle: usize, first: usize, last: usize) -> Self {
        Self {
            cycle,
            window: [first, last],
        }
    }

    /// The half-open minute range this window governs.
    pub fn region(&self) -> Range<usize> {
        let [first, last] = self.window;
        first..(last + 1).min(MINUTES_PER_DAY)
    }
}

/// Declared duty-cycle behaviour of an appliance.
///
/// # Examples
///
/// ```
/// use demand_sim::appliances::{CycleWindow, DutyCycle, SubCycle};
///
/// let compressor = DutyCycle::new(vec![
///     SubCycle::double(39.8, 420, 39.8, 420, 0.1),
///     SubCycle::single(98.5, 120, 0.1),
///     SubCycle::single(60.0, 480, 0.1),
/// ])
/// .with_behaviour(vec![
///     CycleWindow::new(1, 0, 419),
///     CycleWindow::new(1, 1020, 1440),
///     CycleWindow::new(2, 420, 539),
///     CycleWindow::new(3, 540, 1019),
/// ]);
/// assert_eq!(compressor.plan().regions().len(), 4);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DutyCycle {
    pub cycles: Vec<SubCycle>,
    pub behaviour: Vec<CycleWindow>,
}

impl DutyCycle {
    pub fn new(cycles: Vec<SubCycle>) -> Self {
        Self {
            cycles,
            behaviour: Vec::new(),
        }
    }

    pub fn with_behaviour(mut self, behaviour: Vec<CycleWindow>) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Validates the declaration against the owning appliance.
    ///
    /// Besides per-field ranges this enforces that the cycle regions are
    /// pairwise disjoint and cover exactly the minutes of `windows`.
    pub fn validate(&self, appliance_power: f64, windows: &[Window], path: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let path = format!("{path}.duty_cycle");

        if self.cycles.is_empty() || self.cycles.len() > MAX_CYCLES {
            errors.push(ConfigError::new(
                format!("{path}.cycles"),
                format!("must declare 1 to {MAX_CYCLES} cycles, got {}", self.cycles.len()),
            ));
        }

        for (c, cycle) in self.cycles.iter().enumerate() {
            let field = format!("{path}.cycles[{c}]");
            if cycle.segments.is_empty() || cycle.segments.len() > MAX_SEGMENTS {
                errors.push(ConfigError::new(
                    format!("{field}.segments"),
                    format!(
                        "must declare 1 to {MAX_SEGMENTS} segments, got {}",
                        cycle.segments.len()
                    ),
                ));
            }
            if !(0.0..=1.0).contains(&cycle.random_var) {
                errors.push(ConfigError::new(
                    format!("{field}.random_var"),
                    "must be in [0.0, 1.0]",
                ));
            }
            for (s, segment) in cycle.segments.iter().enumerate() {
                let seg_field = format!("{field}.segments[{s}]");
                if !(segment.power >= 0.0 && segment.power <= appliance_power) {
                    errors.push(ConfigError::new(
                        format!("{seg_field}.power"),
                        format!("must be in [0.0, {appliance_power}] (the appliance power)"),
                    ));
                }
                if segment.duration == 0 || segment.duration > MINUTES_PER_DAY {
                    errors.push(ConfigError::new(
                        format!("{seg_field}.duration"),
                        format!("must be in 1..={MINUTES_PER_DAY} minutes"),
                    ));
                }
            }
        }

        if self.behaviour.is_empty() {
            errors.push(ConfigError::new(
                format!("{path}.behaviour"),
                "must assign at least one cycle window",
            ));
        }

        let mut claimed = vec![None::<usize>; MINUTES_PER_DAY];
        for (b, cw) in self.behaviour.iter().enumerate() {
            let field = format!("{path}.behaviour[{b}]");
            if cw.cycle == 0 || cw.cycle > self.cycles.len() {
                errors.push(ConfigError::new(
                    format!("{field}.cycle"),
                    format!("must name a declared cycle (1..={})", self.cycles.len()),
                ));
            }
            let [first, last] = cw.window;
            if first > last || first >= MINUTES_PER_DAY || last > MINUTES_PER_DAY {
                errors.push(ConfigError::new(
                    format!("{field}.window"),
                    format!("[{first}, {last}] is not a valid span of the day"),
                ));
                continue;
            }
            for minute in cw.region() {
                if let Some(other) = claimed[minute] {
                    errors.push(ConfigError::new(
                        &field,
                        format!("overlaps behaviour[{other}] at minute {minute}"),
                    ));
                    break;
                }
                claimed[minute] = Some(b);
            }
        }

        let mut active = vec![false; MINUTES_PER_DAY];
        for w in windows {
            for minute in w.start()..w.end().min(MINUTES_PER_DAY) {
                active[minute] = true;
            }
        }
        if let Some(minute) = (0..MINUTES_PER_DAY).find(|&m| active[m] && claimed[m].is_none()) {
            errors.push(ConfigError::new(
                format!("{path}.behaviour"),
                format!("does not cover functioning minute {minute}"),
            ));
        }
        if let Some(minute) = (0..MINUTES_PER_DAY).find(|&m| !active[m] && claimed[m].is_some()) {
            errors.push(ConfigError::new(
                format!("{path}.behaviour"),
                format!("covers minute {minute} outside the functioning windows"),
            ));
        }

        errors
    }

    /// Normalizes the declaration into sorted regions, ready for sampling.
    pub fn plan(&self) -> CyclePlan {
        let mut regions: Vec<CycleRegion> = self
            .behaviour
            .iter()
            .map(|cw| CycleRegion {
                cycle: cw.cycle.saturating_sub(1),
                span: cw.region(),
            })
            .filter(|r| !r.span.is_empty())
            .collect();
        regions.sort_by_key(|r| r.span.start);
        CyclePlan {
            cycles: self.cycles.clone(),
            regions,
        }
    }
}

/// A contiguous span of the day governed by one sub-cycle (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleRegion {
    pub cycle: usize,
    pub span: Range<usize>,
}

impl CycleRegion {
    fn distance(&self, minute: usize) -> usize {
        if minute < self.span.start {
            self.span.start - minute
        } else if minute >= self.span.end {
            minute + 1 - self.span.end
        } else {
            0
        }
    }
}

/// Validated, normalized duty cycle.
#[derive(Debug, Clone)]
pub struct CyclePlan {
    cycles: Vec<SubCycle>,
    regions: Vec<CycleRegion>,
}

impl CyclePlan {
    pub fn regions(&self) -> &[CycleRegion] {
        &self.regions
    }

    /// Draws this day's segment durations for every sub-cycle.
    ///
    /// Each duration `t` becomes `max(1, round(t + U(-r·t/2, r·t/2)))`,
    /// capped at one day since no region is longer.
    pub fn realize(&self, rng: &mut StdRng) -> CycleLayout<'_> {
        let patterns = self
            .cycles
            .iter()
            .map(|cycle| {
                cycle
                    .segments
                    .iter()
                    .map(|s| {
                        let half_width = cycle.random_var * s.duration as f64 / 2.0;
                        let duration = s.duration as f64 + symmetric_jitter(rng, half_width);
                        (s.power, round_minutes(duration, 1, MINUTES_PER_DAY))
                    })
                    .collect::<Vec<_>>()
            })
            .collect();
        CycleLayout {
            regions: &self.regions,
            patterns,
        }
    }
}

/// One day's realized duty cycle.
#[derive(Debug, Clone)]
pub struct CycleLayout<'a> {
    regions: &'a [CycleRegion],
    /// `(power, minutes)` per segment, per sub-cycle.
    patterns: Vec<Vec<(f64, usize)>>,
}

impl CycleLayout<'_> {
    /// Instantaneous power at `minute`.
    ///
    /// The governing sub-cycle pattern is laid out from its region's start,
    /// repeated, and truncated at the region's end. A minute outside every
    /// region (possible when a randomized window overshoots its declaration)
    /// follows the nearest region.
    pub fn power_at(&self, minute: usize) -> f64 {
        let Some(region) = self.regions.iter().min_by_key(|r| r.distance(minute)) else {
            return 0.0;
        };
        let Some(pattern) = self.patterns.get(region.cycle) else {
            return 0.0;
        };
        let period = pattern.iter().fold(0usize, |acc, &(_, t)| acc.saturating_add(t));
        if period == 0 {
            return 0.0;
        }

        let mut pos = minute.saturating_sub(region.span.start) % period;
        for &(power, duration) in pattern {
            if pos < duration {
                return power;
            }
            pos -= duration;
        }
        0.0
    }

    /// The per-segment durations drawn for sub-cycle `cycle` (0-based).
    pub fn durations(&self, cycle: usize) -> Vec<usize> {
        self.patterns
            .get(cycle)
            .map(|p| p.iter().map(|&(_, t)| t).collect())
            .unwrap_or_default()
    }
}
