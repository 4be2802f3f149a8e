use rand::Rng;
use tracing::info;

use crate::error::{ConfigError, SimError};

use super::calendar::Calendar;
use super::generator::DailyProfileGenerator;
use super::orchestrator::Orchestrator;
use super::types::SimConfig;
use super::user::{PreparedUser, User};

/// All users of a simulated facility plus the run configuration.
///
/// Plain data: nothing is checked until [`UseCase::initialize`].
#[derive(Debug, Clone, PartialEq)]
pub struct UseCase {
    pub users: Vec<User>,
    pub config: SimConfig,
}

impl UseCase {
    pub fn new(users: Vec<User>, config: SimConfig) -> Self {
        Self { users, config }
    }

    /// Validates every declaration and returns all errors found.
    ///
    /// Returns an empty vector if the use case is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.config.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if self.users.is_empty() {
            errors.push(ConfigError::new("users", "must declare at least one user"));
        }
        for (i, user) in self.users.iter().enumerate() {
            errors.extend(user.validate(&format!("users[{i}]")));
        }

        errors
    }

    /// Validates the declarations once and prepares them for generation.
    ///
    /// Structural problems surface here, all at once, rather than on every
    /// simulated day. Without a configured seed a fresh one is drawn and
    /// logged so the run can be reproduced.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Configuration`] listing every invalid field.
    pub fn initialize(&self) -> Result<Orchestrator, SimError> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        let users: Vec<PreparedUser> = self.users.iter().map(PreparedUser::new).collect();

        info!(
            users = users.len(),
            units = users.iter().map(PreparedUser::unit_count).sum::<usize>(),
            days = self.config.days,
            seed,
            parallel = self.config.parallel_processing,
            "Initialized use case"
        );

        let generator =
            DailyProfileGenerator::new(users, Calendar::new(self.config.start_date), seed);
        Ok(Orchestrator::new(generator, self.config.clone(), seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appliances::{Appliance, Window};

    fn lamp_user() -> User {
        User::new("Home", 1).with_appliance(
            Appliance::new("Lamp", 9.0, 120).with_windows(vec![Window::new(420, 540)]),
        )
    }

    #[test]
    fn valid_use_case_initializes() {
        let uc = UseCase::new(vec![lamp_user()], SimConfig::new(3, Some(7)));
        let orchestrator = uc.initialize().expect("valid use case should initialize");
        assert_eq!(orchestrator.seed(), 7);
    }

    #[test]
    fn all_errors_are_reported_together() {
        let mut bad = lamp_user();
        bad.num_users = 0;
        bad.appliances[0].windows = vec![Window::new(600, 500)];
        let mut uc = UseCase::new(vec![bad], SimConfig::new(3, Some(7)));
        uc.config.days = 0;

        let err = uc.initialize().expect_err("invalid use case should be rejected");
        let fields: Vec<String> = err
            .config_errors()
            .expect("structural problems are configuration errors")
            .iter()
            .map(|e| e.field.clone())
            .collect();
        assert!(fields.contains(&"simulation.days".to_string()));
        assert!(fields.contains(&"users[0].num_users".to_string()));
        assert!(fields.contains(&"users[0].appliances[0].windows[0]".to_string()));
    }

    #[test]
    fn empty_use_case_is_rejected() {
        let uc = UseCase::new(Vec::new(), SimConfig::new(1, Some(1)));
        assert!(uc.initialize().is_err());
    }

    #[test]
    fn missing_seed_is_resolved() {
        let uc = UseCase::new(vec![lamp_user()], SimConfig::new(1, None));
        uc.initialize().expect("missing seed should be drawn");
    }
}
