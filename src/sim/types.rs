//! Core simulation types: run configuration and the daily profile.

use chrono::NaiveDate;

use crate::appliances::MINUTES_PER_DAY;

/// Default number of simulated days.
pub const DEFAULT_DAYS: usize = 365;

/// Watt-minutes per kilowatt-hour.
pub const WATT_MINUTES_PER_KWH: f64 = 1000.0 * 60.0;

/// First simulated date when none is given.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default()
}

/// Centralized run configuration.
///
/// `parallel_processing` only changes the execution strategy; results are
/// identical either way.
///
/// # Examples
///
/// ```
/// use demand_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(365, Some(42));
/// assert_eq!(cfg.total_minutes(), 365 * 1440);
/// assert!(!cfg.parallel_processing);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimConfig {
    /// Number of days to simulate.
    pub days: usize,
    /// Master random seed. `None` draws a fresh seed at initialization.
    pub seed: Option<u64>,
    /// Generate days concurrently.
    pub parallel_processing: bool,
    /// Calendar date of day 0.
    pub start_date: NaiveDate,
}

impl SimConfig {
    /// Creates a new run configuration.
    ///
    /// # Arguments
    ///
    /// * `days` - Number of days to simulate (must be > 0)
    /// * `seed` - Master random seed, or `None` for a non-reproducible run
    ///
    /// # Panics
    ///
    /// Panics if `days` is zero.
    pub fn new(days: usize, seed: Option<u64>) -> Self {
        assert!(days > 0, "days must be > 0");
        Self {
            days,
            seed,
            parallel_processing: false,
            start_date: default_start_date(),
        }
    }

    pub fn with_parallel_processing(mut self, parallel: bool) -> Self {
        self.parallel_processing = parallel;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = start_date;
        self
    }

    /// Total number of minute samples across all days.
    pub fn total_minutes(&self) -> usize {
        self.days * MINUTES_PER_DAY
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DAYS, None)
    }
}

/// One simulated day of aggregate power, one sample per minute.
///
/// Always exactly [`MINUTES_PER_DAY`] non-negative samples. Profiles are
/// built once by the generator and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfile {
    day: usize,
    samples: Box<[f64]>,
}

impl DailyProfile {
    /// # Panics
    ///
    /// Panics if `samples` does not hold exactly one day of minutes.
    pub(crate) fn new(day: usize, samples: Vec<f64>) -> Self {
        assert_eq!(samples.len(), MINUTES_PER_DAY, "a daily profile holds one day of minutes");
        Self {
            day,
            samples: samples.into_boxed_slice(),
        }
    }

    /// Zero-based index of the simulated day.
    pub fn day(&self) -> usize {
        self.day
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Energy over the day in power-unit·minutes (W·min for W input).
    pub fn energy(&self) -> f64 {
        self.samples.iter().sum()
    }

    /// Energy over the day in kWh, assuming power in W.
    pub fn energy_kwh(&self) -> f64 {
        self.energy() / WATT_MINUTES_PER_KWH
    }

    pub fn peak(&self) -> f64 {
        self.samples.iter().copied().fold(0.0, f64::max)
    }

    /// Number of minutes with non-zero draw.
    pub fn active_minutes(&self) -> usize {
        self.samples.iter().filter(|&&p| p > 0.0).count()
    }
}

impl AsRef<[f64]> for DailyProfile {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}
