//! On-time allocation: how many minutes a unit runs on a day, and where.

use std::ops::Range;

use rand::{Rng, rngs::StdRng};
use tracing::debug;

use super::appliance::PreparedAppliance;
use super::duty_cycle::CycleLayout;
use super::types::{round_minutes, symmetric_jitter};

/// Draws the number of active minutes for one unit on one day.
///
/// `clip(round(func_time · (1 + U(-v, v))), 0, available)`. No randomness is
/// consumed when `variability` is zero. A draw larger than `available` is
/// clipped; that reduced allocation is valid, not an error.
pub fn draw_active_minutes(
    func_time: usize,
    variability: f64,
    available: usize,
    rng: &mut StdRng,
) -> usize {
    let factor = 1.0 + symmetric_jitter(rng, variability);
    let requested = round_minutes(func_time as f64 * factor, 0, usize::MAX);
    if requested > available {
        debug!(requested, available, "active minutes clipped to realized windows");
        return available;
    }
    requested
}

/// Splits `active` minutes across `windows` proportionally to their lengths.
///
/// Uses largest-remainder rounding with ties going to the earlier window, so
/// the shares always sum to `active` (given `active` fits) and no share
/// exceeds its window.
pub fn split_across_windows(active: usize, windows: &[Range<usize>]) -> Vec<usize> {
    let total: usize = windows.iter().map(ExactSizeIterator::len).sum();
    if total == 0 {
        return vec![0; windows.len()];
    }
    let active = active.min(total);

    let mut shares: Vec<usize> = windows.iter().map(|w| active * w.len() / total).collect();
    let mut remainders: Vec<(usize, usize)> = windows
        .iter()
        .enumerate()
        .map(|(i, w)| (active * w.len() % total, i))
        .collect();
    // largest remainder first, earlier window on ties
    remainders.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

    let leftover = active - shares.iter().sum::<usize>();
    for &(_, i) in remainders.iter().take(leftover) {
        shares[i] += 1;
    }
    shares
}

/// Places one contiguous span of `share` minutes inside each window at a
/// uniformly drawn offset.
pub fn place_spans(
    windows: &[Range<usize>],
    shares: &[usize],
    rng: &mut StdRng,
) -> Vec<Range<usize>> {
    windows
        .iter()
        .zip(shares)
        .filter(|&(_, &share)| share > 0)
        .map(|(w, &share)| {
            let share = share.min(w.len());
            let slack = w.len() - share;
            let offset = if slack > 0 {
                rng.random_range(0..=slack)
            } else {
                0
            };
            let start = w.start + offset;
            start..start + share
        })
        .collect()
}

/// One unit's realized behaviour for a day.
#[derive(Debug, Clone)]
pub struct UnitDraw<'a> {
    /// Minutes during which the unit draws power.
    pub spans: Vec<Range<usize>>,
    layout: Option<CycleLayout<'a>>,
}

impl<'a> UnitDraw<'a> {
    /// Draws active minutes, their placement and the duty-cycle layout.
    pub fn sample(
        appliance: &'a PreparedAppliance,
        windows: &[Range<usize>],
        rng: &mut StdRng,
    ) -> Self {
        let available: usize = windows.iter().map(ExactSizeIterator::len).sum();
        let decl = appliance.declaration();
        let active = draw_active_minutes(
            decl.func_time,
            decl.time_fraction_random_variability,
            available,
            rng,
        );
        let shares = split_across_windows(active, windows);
        let spans = place_spans(windows, &shares, rng);
        let layout = appliance.cycle_plan().map(|plan| plan.realize(rng));
        Self { spans, layout }
    }

    /// Adds `units` copies of this draw into `profile`.
    pub fn render(&self, flat_power: f64, units: f64, profile: &mut [f64]) {
        for span in &self.spans {
            for minute in span.clone() {
                let power = match &self.layout {
                    Some(layout) => layout.power_at(minute),
                    None => flat_power,
                };
                profile[minute] += units * power;
            }
        }
    }
}

/// Strategy for distributing one appliance's units over a day.
pub trait Allocator {
    /// Adds the draw of every unit of `appliance` for one user member into
    /// `profile`, given that member's realized windows.
    fn allocate(
        &self,
        appliance: &PreparedAppliance,
        windows: &[Range<usize>],
        rng: &mut StdRng,
        profile: &mut [f64],
    );

    /// Returns a human-readable name of the strategy.
    fn name(&self) -> &'static str;
}

/// All units switch together: one draw, multiplied by the unit count.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SharedAllocation;

impl Allocator for SharedAllocation {
    fn allocate(
        &self,
        appliance: &PreparedAppliance,
        windows: &[Range<usize>],
        rng: &mut StdRng,
        profile: &mut [f64],
    ) {
        let draw = UnitDraw::sample(appliance, windows, rng);
        let decl = appliance.declaration();
        draw.render(decl.power, decl.number as f64, profile);
    }

    fn name(&self) -> &'static str {
        "shared"
    }
}

/// Every unit draws its own on-time, placement and duty-cycle layout.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IndependentAllocation;

impl Allocator for IndependentAllocation {
    fn allocate(
        &self,
        appliance: &PreparedAppliance,
        windows: &[Range<usize>],
        rng: &mut StdRng,
        profile: &mut [f64],
    ) {
        let decl = appliance.declaration();
        for _ in 0..decl.number {
            let draw = UnitDraw::sample(appliance, windows, rng);
            draw.render(decl.power, 1.0, profile);
        }
    }

    fn name(&self) -> &'static str {
        "independent"
    }
}

/// Allocation strategy chosen from the appliance's `fixed` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Allocation {
    Shared(SharedAllocation),
    Independent(IndependentAllocation),
}

impl Allocation {
    pub fn for_fixed(fixed: bool) -> Self {
        if fixed {
            Self::Shared(SharedAllocation)
        } else {
            Self::Independent(IndependentAllocation)
        }
    }
}

impl Allocator for Allocation {
    fn allocate(
        &self,
        appliance: &PreparedAppliance,
        windows: &[Range<usize>],
        rng: &mut StdRng,
        profile: &mut [f64],
    ) {
        match self {
            Self::Shared(a) => a.allocate(appliance, windows, rng, profile),
            Self::Independent(a) => a.allocate(appliance, windows, rng, profile),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Shared(a) => a.name(),
            Self::Independent(a) => a.name(),
        }
    }
}
