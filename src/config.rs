//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::appliances::{Appliance, CycleWindow, DutyCycle, SubCycle, Window};
use crate::error::{ConfigError, SimError};
use crate::sim::calendar::DayType;
use crate::sim::types::{DEFAULT_DAYS, SimConfig, default_start_date};
use crate::sim::{UseCase, User};

/// Top-level scenario configuration parsed from TOML.
///
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or pick a built-in
/// preset with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Run length, seeding and execution strategy.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Declared users with their appliances.
    #[serde(default)]
    pub users: Vec<User>,
}

/// Run length, seeding and execution strategy.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Number of days to simulate (must be > 0).
    pub days: usize,
    /// Master random seed; omitted means a fresh seed per run.
    pub seed: Option<u64>,
    /// Generate days concurrently.
    pub parallel_processing: bool,
    /// Calendar date of the first simulated day (`"YYYY-MM-DD"`).
    pub start_date: NaiveDate,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            days: DEFAULT_DAYS,
            seed: None,
            parallel_processing: false,
            start_date: default_start_date(),
        }
    }
}

impl From<&SimulationConfig> for SimConfig {
    fn from(s: &SimulationConfig) -> Self {
        Self {
            days: s.days,
            seed: s.seed,
            parallel_processing: s.parallel_processing,
            start_date: s.start_date,
        }
    }
}

/// Load-pattern windows shared by the cold-storage compressor and fans.
fn cold_storage_behaviour() -> Vec<CycleWindow> {
    vec![
        CycleWindow::new(1, 0, 419),
        CycleWindow::new(1, 1020, 1440),
        CycleWindow::new(2, 420, 539),
        CycleWindow::new(3, 540, 1019),
    ]
}

impl ScenarioConfig {
    /// Solar-powered cold storage facility: two compressors and four fans on
    /// a three-stage duty cycle, plus four morning lamps.
    pub fn cold_storage() -> Self {
        let compressor = Appliance::new("Compressor", 1900.0, 1440)
            .with_number(2)
            .with_windows(vec![Window::new(0, 1440)])
            .with_fixed(true)
            .with_duty_cycle(
                DutyCycle::new(vec![
                    // low
                    SubCycle::double(79.69 / 2.0, 420, 79.69 / 2.0, 420, 0.1),
                    // intensive
                    SubCycle::single(197.03 / 2.0, 120, 0.1),
                    // intermediate
                    SubCycle::single(120.06 / 2.0, 480, 0.1),
                ])
                .with_behaviour(cold_storage_behaviour()),
            );

        let fan = Appliance::new("Fan", 138.0, 1440)
            .with_number(4)
            .with_windows(vec![Window::new(0, 1440)])
            .with_fixed(true)
            .with_duty_cycle(
                DutyCycle::new(vec![
                    SubCycle::double(27.75 / 4.0, 420, 12.0, 420, 0.1),
                    SubCycle::single(68.50 / 4.0, 120, 0.1),
                    SubCycle::single(41.74 / 4.0, 480, 0.1),
                ])
                .with_behaviour(cold_storage_behaviour()),
            );

        let lamp = Appliance::new("Lamp", 9.0, 120)
            .with_number(4)
            .with_windows(vec![Window::new(420, 540).with_random_var(0.35)])
            .with_variability(0.2);

        Self {
            simulation: SimulationConfig {
                seed: Some(42),
                ..SimulationConfig::default()
            },
            users: vec![
                User::new("Cold Storage Facility", 1)
                    .with_appliance(compressor)
                    .with_appliance(fan)
                    .with_appliance(lamp),
            ],
        }
    }

    /// Ten similar households with lighting, a television, a cycling fridge
    /// and an occasional weekend washing machine.
    pub fn household() -> Self {
        let lights = Appliance::new("Indoor Light", 7.0, 240)
            .with_number(3)
            .with_windows(vec![
                Window::new(360, 480).with_random_var(0.2),
                Window::new(1080, 1380).with_random_var(0.2),
            ])
            .with_variability(0.2);

        let tv = Appliance::new("Television", 60.0, 180)
            .with_windows(vec![Window::new(1140, 1380).with_random_var(0.1)])
            .with_variability(0.1);

        let fridge = Appliance::new("Fridge", 200.0, 1440)
            .with_windows(vec![Window::new(0, 1440)])
            .with_fixed(true)
            .with_duty_cycle(
                DutyCycle::new(vec![
                    SubCycle::double(200.0, 20, 5.0, 10, 0.1),
                    SubCycle::double(200.0, 15, 5.0, 15, 0.1),
                ])
                .with_behaviour(vec![
                    CycleWindow::new(1, 0, 479),
                    CycleWindow::new(2, 480, 1199),
                    CycleWindow::new(1, 1200, 1440),
                ]),
            );

        let washer = Appliance::new("Washing Machine", 500.0, 90)
            .with_windows(vec![Window::new(540, 1080).with_random_var(0.1)])
            .with_occasional_use(0.3)
            .with_day_type(DayType::Weekends);

        Self {
            simulation: SimulationConfig {
                seed: Some(42),
                ..SimulationConfig::default()
            },
            users: vec![
                User::new("Household", 10)
                    .with_appliance(lights)
                    .with_appliance(tv)
                    .with_appliance(fridge)
                    .with_appliance(washer),
            ],
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["cold_storage", "household"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::UnknownPreset`] if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, SimError> {
        match name {
            "cold_storage" => Ok(Self::cold_storage()),
            "household" => Ok(Self::household()),
            _ => Err(SimError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, SimError> {
        let content = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, SimError> {
        Ok(toml::from_str(s)?)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.to_use_case().validate()
    }

    pub fn to_use_case(&self) -> UseCase {
        UseCase::new(self.users.clone(), SimConfig::from(&self.simulation))
    }

    pub fn into_use_case(self) -> UseCase {
        let config = SimConfig::from(&self.simulation);
        UseCase::new(self.users, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLD_STORAGE_TOML: &str = r#"
[simulation]
days = 30
seed = 7
parallel_processing = true
start_date = "2025-06-01"

[[users]]
name = "Cold Storage Facility"
num_users = 1

[[users.appliances]]
name = "Compressor"
number = 2
power = 1900.0
func_time = 1440
fixed = true
windows = [{ span = [0, 1440] }]

[users.appliances.duty_cycle]
cycles = [
    { segments = [{ power = 39.845, duration = 420 }, { power = 39.845, duration = 420 }], random_var = 0.1 },
    { segments = [{ power = 98.515, duration = 120 }], random_var = 0.1 },
    { segments = [{ power = 60.03, duration = 480 }], random_var = 0.1 },
]
behaviour = [
    { cycle = 1, window = [0, 419] },
    { cycle = 1, window = [1020, 1440] },
    { cycle = 2, window = [420, 539] },
    { cycle = 3, window = [540, 1019] },
]

[[users.appliances]]
name = "Lamp"
number = 4
power = 9.0
func_time = 120
time_fraction_random_variability = 0.2
day_type = "weekdays"
windows = [{ span = [420, 540], random_var = 0.35 }]
"#;

    #[test]
    fn presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name).expect("listed preset should load");
            let errors = cfg.validate();
            assert!(errors.is_empty(), "preset \"{name}\" should be valid: {errors:?}");
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent").expect_err("unknown preset");
        assert!(matches!(err, SimError::UnknownPreset { .. }));
        let text = err.to_string();
        assert!(text.contains("cold_storage, household"));
    }

    #[test]
    fn valid_toml_parses() {
        let cfg = ScenarioConfig::from_toml_str(COLD_STORAGE_TOML).expect("valid TOML should parse");
        assert_eq!(cfg.simulation.days, 30);
        assert_eq!(cfg.simulation.seed, Some(7));
        assert_eq!(Some(cfg.simulation.start_date), NaiveDate::from_ymd_opt(2025, 6, 1));
        let apps = &cfg.users[0].appliances;
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[0].duty_cycle.as_ref().map(|d| d.cycles.len()), Some(3));
        assert_eq!(apps[1].day_type, DayType::Weekdays);
        assert_eq!(apps[1].windows[0].random_var, 0.35);
        let errors = cfg.validate();
        assert!(errors.is_empty(), "parsed scenario should be valid: {errors:?}");
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[simulation]
days = 10
bogus_field = true
"#;
        assert!(matches!(
            ScenarioConfig::from_toml_str(toml),
            Err(SimError::Toml(_))
        ));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[[users]]
name = "Home"

[[users.appliances]]
name = "Radio"
power = 7.0
func_time = 60
windows = [{ span = [1080, 1380] }]
"#;
        let cfg = ScenarioConfig::from_toml_str(toml).expect("partial TOML should parse");
        assert_eq!(cfg.simulation.days, 365);
        assert_eq!(cfg.simulation.seed, None);
        assert_eq!(cfg.users[0].num_users, 1);
    }

    #[test]
    fn validation_catches_zero_days() {
        let mut cfg = ScenarioConfig::cold_storage();
        cfg.simulation.days = 0;
        assert!(cfg.validate().iter().any(|e| e.field == "simulation.days"));
    }

    #[test]
    fn validation_catches_broken_cycle_coverage() {
        let mut cfg = ScenarioConfig::cold_storage();
        cfg.users[0].appliances[0]
            .duty_cycle
            .as_mut()
            .expect("compressor is duty-cycled")
            .behaviour
            .pop();
        let errors = cfg.validate();
        assert!(
            errors
                .iter()
                .any(|e| e.field == "users[0].appliances[0].duty_cycle.behaviour")
        );
    }

    #[test]
    fn missing_file_reports_path() {
        let err = ScenarioConfig::from_toml_file(Path::new("/nonexistent/scenario.toml"))
            .expect_err("missing file should fail");
        let text = err.to_string();
        assert!(text.contains("/nonexistent/scenario.toml"));
    }

    #[test]
    fn cold_storage_matches_declared_fleet() {
        let cfg = ScenarioConfig::cold_storage();
        let user = &cfg.users[0];
        let counts: Vec<(&str, usize)> = user
            .appliances
            .iter()
            .map(|a| (a.name.as_str(), a.number))
            .collect();
        assert_eq!(counts, vec![("Compressor", 2), ("Fan", 4), ("Lamp", 4)]);
    }
}
