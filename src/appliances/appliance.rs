use serde::Deserialize;
use tracing::warn;

use super::allocation::Allocation;
use super::duty_cycle::{CyclePlan, DutyCycle};
use super::types::MINUTES_PER_DAY;
use super::window::{Window, validate_windows};
use crate::error::ConfigError;
use crate::sim::calendar::DayType;

/// One class of identical electrical devices and its daily usage pattern.
///
/// Power values are unit-agnostic; callers keep them consistent (W by
/// convention, so the aggregates come out in W·min and kWh).
///
/// # Examples
///
/// ```
/// use demand_sim::appliances::{Appliance, Window};
///
/// let lamp = Appliance::new("Lamp", 9.0, 120)
///     .with_number(4)
///     .with_windows(vec![Window::new(420, 540).with_random_var(0.35)])
///     .with_variability(0.2);
/// assert!(lamp.validate("lamp").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Appliance {
    /// Name, unique within its user.
    pub name: String,

    /// Nominal power draw per unit.
    pub power: f64,

    /// Number of identical units per user member.
    #[serde(default = "default_number")]
    pub number: usize,

    /// Expected functioning minutes per day, in `0..=1440`.
    pub func_time: usize,

    /// Ordered, non-overlapping functioning windows (1 to 3).
    #[serde(default)]
    pub windows: Vec<Window>,

    /// When `true` all units switch on and off together.
    #[serde(default)]
    pub fixed: bool,

    /// Fraction by which the daily on-time may deviate from `func_time`.
    #[serde(default)]
    pub time_fraction_random_variability: f64,

    /// Optional power pattern while running; flat `power` when absent.
    #[serde(default)]
    pub duty_cycle: Option<DutyCycle>,

    /// Probability that the appliance is used at all on a given day.
    #[serde(default = "default_occasional_use")]
    pub occasional_use: f64,

    /// Days of the week on which the appliance is used.
    #[serde(default)]
    pub day_type: DayType,
}

fn default_number() -> usize {
    1
}

fn default_occasional_use() -> f64 {
    1.0
}

impl Appliance {
    /// Creates a single-unit appliance with no windows yet.
    pub fn new(name: impl Into<String>, power: f64, func_time: usize) -> Self {
        Self {
            name: name.into(),
            power,
            number: 1,
            func_time,
            windows: Vec::new(),
            fixed: false,
            time_fraction_random_variability: 0.0,
            duty_cycle: None,
            occasional_use: 1.0,
            day_type: DayType::All,
        }
    }

    pub fn with_number(mut self, number: usize) -> Self {
        self.number = number;
        self
    }

    pub fn with_windows(mut self, windows: Vec<Window>) -> Self {
        self.windows = windows;
        self
    }

    pub fn with_fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    pub fn with_variability(mut self, variability: f64) -> Self {
        self.time_fraction_random_variability = variability;
        self
    }

    pub fn with_duty_cycle(mut self, duty_cycle: DutyCycle) -> Self {
        self.duty_cycle = Some(duty_cycle);
        self
    }

    pub fn with_occasional_use(mut self, probability: f64) -> Self {
        self.occasional_use = probability;
        self
    }

    pub fn with_day_type(mut self, day_type: DayType) -> Self {
        self.day_type = day_type;
        self
    }

    /// Total declared window length in minutes.
    pub fn window_minutes(&self) -> usize {
        self.windows.iter().map(Window::len).sum()
    }

    /// Validates all fields; `path` prefixes every reported field.
    ///
    /// Returns an empty vector if the declaration is valid.
    pub fn validate(&self, path: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ConfigError::new(format!("{path}.name"), "must not be empty"));
        }
        if !(self.power.is_finite() && self.power > 0.0) {
            errors.push(ConfigError::new(format!("{path}.power"), "must be > 0"));
        }
        if self.number == 0 {
            errors.push(ConfigError::new(format!("{path}.number"), "must be >= 1"));
        }
        if self.func_time > MINUTES_PER_DAY {
            errors.push(ConfigError::new(
                format!("{path}.func_time"),
                format!("must be <= {MINUTES_PER_DAY}"),
            ));
        }
        if !(0.0..=1.0).contains(&self.time_fraction_random_variability) {
            errors.push(ConfigError::new(
                format!("{path}.time_fraction_random_variability"),
                "must be in [0.0, 1.0]",
            ));
        }
        if !(0.0..=1.0).contains(&self.occasional_use) {
            errors.push(ConfigError::new(
                format!("{path}.occasional_use"),
                "must be in [0.0, 1.0]",
            ));
        }

        let window_errors = validate_windows(&self.windows, path);
        let windows_ok = window_errors.is_empty();
        errors.extend(window_errors);

        // coverage is only meaningful against a well-formed window list
        if let (Some(duty_cycle), true) = (&self.duty_cycle, windows_ok) {
            errors.extend(duty_cycle.validate(self.power, &self.windows, path));
        }

        errors
    }
}

/// A validated appliance with its derived, day-independent values.
#[derive(Debug, Clone)]
pub struct PreparedAppliance {
    declaration: Appliance,
    allocation: Allocation,
    cycle_plan: Option<CyclePlan>,
    window_minutes: usize,
}

impl PreparedAppliance {
    /// Precomputes derived values. Expects a declaration that passed
    /// [`Appliance::validate`].
    pub fn new(declaration: Appliance) -> Self {
        let window_minutes = declaration.window_minutes();
        if declaration.func_time > window_minutes {
            warn!(
                appliance = %declaration.name,
                func_time = declaration.func_time,
                window_minutes,
                "func_time exceeds the declared windows, on-time will be clipped"
            );
        }
        Self {
            allocation: Allocation::for_fixed(declaration.fixed),
            cycle_plan: declaration.duty_cycle.as_ref().map(DutyCycle::plan),
            window_minutes,
            declaration,
        }
    }

    pub fn declaration(&self) -> &Appliance {
        &self.declaration
    }

    pub fn allocation(&self) -> Allocation {
        self.allocation
    }

    pub fn cycle_plan(&self) -> Option<&CyclePlan> {
        self.cycle_plan.as_ref()
    }

    /// Total declared window length in minutes.
    pub fn window_minutes(&self) -> usize {
        self.window_minutes
    }
}
