//! Per-day profile generation for a validated use case.

use rand::Rng;

use crate::appliances::types::stream_rng;
use crate::appliances::{Allocator, MINUTES_PER_DAY, WindowSampler};

use super::calendar::Calendar;
use super::types::DailyProfile;
use super::user::PreparedUser;

/// Draws one aggregate profile per simulated day.
///
/// Holds only static, validated declarations. Every appliance of every user
/// member draws from its own stream keyed by `(seed, day, user, member,
/// appliance)`, so a day's profile depends on nothing but its index.
#[derive(Debug, Clone)]
pub struct DailyProfileGenerator {
    users: Vec<PreparedUser>,
    calendar: Calendar,
    seed: u64,
}

impl DailyProfileGenerator {
    pub fn new(users: Vec<PreparedUser>, calendar: Calendar, seed: u64) -> Self {
        Self {
            users,
            calendar,
            seed,
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    /// Generates the aggregate profile of day `day`.
    ///
    /// For every member of every user, each appliance is skipped on days
    /// that do not match its day type or when its occasional-use draw fails;
    /// otherwise its windows are realized once and its allocation strategy
    /// adds all of its units to the day's profile.
    pub fn generate(&self, day: usize) -> DailyProfile {
        let kind = self.calendar.kind(day);
        let mut profile = vec![0.0; MINUTES_PER_DAY];

        for (u, user) in self.users.iter().enumerate() {
            for member in 0..user.num_users {
                for (a, appliance) in user.appliances.iter().enumerate() {
                    let decl = appliance.declaration();
                    if !decl.day_type.matches(kind) {
                        continue;
                    }

                    let mut rng = stream_rng(
                        self.seed,
                        &[day as u64, u as u64, member as u64, a as u64],
                    );
                    if decl.occasional_use < 1.0 && !rng.random_bool(decl.occasional_use) {
                        continue;
                    }

                    let windows = WindowSampler.realize_all(&decl.windows, &mut rng);
                    appliance
                        .allocation()
                        .allocate(appliance, &windows, &mut rng, &mut profile);
                }
            }
        }

        DailyProfile::new(day, profile)
    }
}
