//! Post-hoc aggregation of generated daily profiles.

use std::fmt;

use chrono::NaiveDate;

use crate::appliances::MINUTES_PER_DAY;

use super::calendar::Calendar;
use super::types::{DailyProfile, WATT_MINUTES_PER_KWH};

/// Energy of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonthlyEnergy {
    pub year: i32,
    pub month: u32,
    pub kwh: f64,
}

/// Ordered daily profiles of one run, with the calendar they were drawn on.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfiles {
    profiles: Vec<DailyProfile>,
    calendar: Calendar,
}

impl LoadProfiles {
    pub fn new(profiles: Vec<DailyProfile>, calendar: Calendar) -> Self {
        Self { profiles, calendar }
    }

    pub fn profiles(&self) -> &[DailyProfile] {
        &self.profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn start_date(&self) -> NaiveDate {
        self.calendar.start()
    }

    /// Flat series of `days · 1440` samples in chronological minute order,
    /// starting at day 0 minute 0, in the input power unit.
    pub fn series(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.profiles.len() * MINUTES_PER_DAY);
        for p in &self.profiles {
            out.extend_from_slice(p.samples());
        }
        out
    }

    /// Total energy in kWh: `Σ samples / (1000 · 60)` for power in W.
    pub fn total_energy_kwh(&self) -> f64 {
        self.profiles.iter().map(DailyProfile::energy).sum::<f64>() / WATT_MINUTES_PER_KWH
    }

    pub fn daily_energy_kwh(&self) -> Vec<f64> {
        self.profiles.iter().map(DailyProfile::energy_kwh).collect()
    }

    /// Energy summed per calendar month, in month order.
    pub fn monthly_energy_kwh(&self) -> Vec<MonthlyEnergy> {
        let mut months: Vec<MonthlyEnergy> = Vec::new();
        for p in &self.profiles {
            let (year, month) = self.calendar.month(p.day());
            let energy = p.energy();
            match months.last_mut() {
                Some(m) if m.year == year && m.month == month => m.kwh += energy,
                _ => months.push(MonthlyEnergy {
                    year,
                    month,
                    kwh: energy,
                }),
            }
        }
        for m in &mut months {
            m.kwh /= WATT_MINUTES_PER_KWH;
        }
        months
    }

    /// Mean power per minute of day across all profiles.
    pub fn average_profile(&self) -> Vec<f64> {
        let mut avg = vec![0.0; MINUTES_PER_DAY];
        if self.profiles.is_empty() {
            return avg;
        }
        for p in &self.profiles {
            for (a, &s) in avg.iter_mut().zip(p.samples()) {
                *a += s;
            }
        }
        let n = self.profiles.len() as f64;
        for a in &mut avg {
            *a /= n;
        }
        avg
    }

    pub fn peak_power(&self) -> f64 {
        self.profiles.iter().map(DailyProfile::peak).fold(0.0, f64::max)
    }

    pub fn report(&self) -> EnergyReport {
        EnergyReport::from_profiles(self)
    }
}

/// Summary figures of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyReport {
    pub days: usize,
    pub total_kwh: f64,
    pub mean_daily_kwh: f64,
    pub peak_power: f64,
    pub monthly: Vec<MonthlyEnergy>,
}

impl EnergyReport {
    pub fn from_profiles(profiles: &LoadProfiles) -> Self {
        let days = profiles.len();
        let total_kwh = profiles.total_energy_kwh();
        Self {
            days,
            total_kwh,
            mean_daily_kwh: if days > 0 { total_kwh / days as f64 } else { 0.0 },
            peak_power: profiles.peak_power(),
            monthly: profiles.monthly_energy_kwh(),
        }
    }
}

impl fmt::Display for EnergyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Energy Report ---")?;
        writeln!(f, "Simulated days:        {}", self.days)?;
        writeln!(f, "Yearly consumption:    {:.2} kWh", self.total_kwh)?;
        writeln!(f, "Mean daily energy:     {:.3} kWh", self.mean_daily_kwh)?;
        write!(f, "Peak power:            {:.1} W", self.peak_power)?;
        if !self.monthly.is_empty() {
            write!(f, "\nMonthly consumption (kWh):")?;
            for m in &self.monthly {
                write!(f, "\n  {}-{:02}  {:>10.2}", m.year, m.month, m.kwh)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::default_start_date;

    fn flat_day(day: usize, watts: f64) -> DailyProfile {
        DailyProfile::new(day, vec![watts; MINUTES_PER_DAY])
    }

    fn flat_run(days: usize, watts: f64) -> LoadProfiles {
        LoadProfiles::new(
            (0..days).map(|d| flat_day(d, watts)).collect(),
            Calendar::new(default_start_date()),
        )
    }

    #[test]
    fn series_is_concatenated_in_order() {
        let run = LoadProfiles::new(
            vec![flat_day(0, 1.0), flat_day(1, 2.0)],
            Calendar::new(default_start_date()),
        );
        let s = run.series();
        assert_eq!(s.len(), 2 * MINUTES_PER_DAY);
        assert_eq!(s[0], 1.0);
        assert_eq!(s[MINUTES_PER_DAY - 1], 1.0);
        assert_eq!(s[MINUTES_PER_DAY], 2.0);
    }

    #[test]
    fn total_energy_of_constant_load() {
        // 1 kW for 365 days = 8760 kWh
        let run = flat_run(365, 1000.0);
        assert!((run.total_energy_kwh() - 8760.0).abs() < 1e-6);
    }

    #[test]
    fn daily_energy_is_one_entry_per_day() {
        let run = LoadProfiles::new(
            vec![flat_day(0, 1000.0), flat_day(1, 500.0)],
            Calendar::new(default_start_date()),
        );
        assert_eq!(run.daily_energy_kwh(), vec![24.0, 12.0]);
    }

    #[test]
    fn monthly_sums_follow_calendar() {
        let run = flat_run(365, 1000.0);
        let months = run.monthly_energy_kwh();
        assert_eq!(months.len(), 12);
        assert_eq!((months[0].year, months[0].month), (2025, 1));
        assert!((months[0].kwh - 31.0 * 24.0).abs() < 1e-6);
        assert!((months[1].kwh - 28.0 * 24.0).abs() < 1e-6);
        let sum: f64 = months.iter().map(|m| m.kwh).sum();
        assert!((sum - run.total_energy_kwh()).abs() < 1e-6);
    }

    #[test]
    fn average_profile_is_mean_per_minute() {
        let run = LoadProfiles::new(
            vec![flat_day(0, 100.0), flat_day(1, 300.0)],
            Calendar::new(default_start_date()),
        );
        assert!(run.average_profile().iter().all(|&w| w == 200.0));
        assert_eq!(run.peak_power(), 300.0);
    }

    #[test]
    fn empty_run() {
        let run = flat_run(0, 0.0);
        assert!(run.is_empty());
        assert_eq!(run.total_energy_kwh(), 0.0);
        assert!(run.monthly_energy_kwh().is_empty());
        assert_eq!(run.report().mean_daily_kwh, 0.0);
    }

    #[test]
    fn report_display_does_not_panic() {
        let text = flat_run(40, 50.0).report().to_string();
        assert!(text.contains("Yearly consumption"));
        assert!(text.contains("2025-02"));
    }
}
