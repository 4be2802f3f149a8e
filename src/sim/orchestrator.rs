//! Drives the daily generator over many days.

use std::time::Instant;

use rayon::prelude::*;
use tracing::info;

use super::aggregate::LoadProfiles;
use super::generator::DailyProfileGenerator;
use super::types::{DailyProfile, SimConfig};

/// Runs a validated use case over its configured number of days.
///
/// Obtained from [`UseCase::initialize`](super::use_case::UseCase::initialize).
/// Days are independent draws: sequential and parallel runs return
/// identical profiles, in day order.
#[derive(Debug, Clone)]
pub struct Orchestrator {
    generator: DailyProfileGenerator,
    config: SimConfig,
    seed: u64,
}

impl Orchestrator {
    pub(crate) fn new(generator: DailyProfileGenerator, config: SimConfig, seed: u64) -> Self {
        Self {
            generator,
            config,
            seed,
        }
    }

    /// The master seed actually used, including one drawn at initialization.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Generates the single profile of day `day`.
    pub fn generate_day(&self, day: usize) -> DailyProfile {
        self.generator.generate(day)
    }

    /// Generates the configured number of days.
    pub fn generate_daily_load_profiles(&self) -> LoadProfiles {
        self.generate_days(self.config.days)
    }

    /// Generates days `0..n_days` in order.
    ///
    /// With `parallel_processing` the days are spread over the rayon pool;
    /// each task owns its output slot, so ordering and values match the
    /// sequential path exactly.
    pub fn generate_days(&self, n_days: usize) -> LoadProfiles {
        let started = Instant::now();
        let profiles: Vec<DailyProfile> = if self.config.parallel_processing {
            (0..n_days)
                .into_par_iter()
                .map(|day| self.generator.generate(day))
                .collect()
        } else {
            (0..n_days).map(|day| self.generator.generate(day)).collect()
        };

        info!(
            days = n_days,
            parallel = self.config.parallel_processing,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generated daily load profiles"
        );
        LoadProfiles::new(profiles, *self.generator.calendar())
    }
}
