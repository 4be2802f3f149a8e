use std::collections::HashSet;

use serde::Deserialize;

use crate::appliances::{Appliance, PreparedAppliance};
use crate::error::ConfigError;

/// A named group of identical appliance owners (households, facilities).
///
/// # Examples
///
/// ```
/// use demand_sim::appliances::{Appliance, Window};
/// use demand_sim::sim::user::User;
///
/// let mut facility = User::new("Cold Storage Facility", 1);
/// let lamp = facility.add_appliance(Appliance::new("Lamp", 9.0, 120));
/// lamp.windows = vec![Window::new(420, 540)];
/// assert_eq!(facility.appliances.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub name: String,
    /// Number of identical members behaving independently.
    #[serde(default = "default_num_users")]
    pub num_users: usize,
    #[serde(default)]
    pub appliances: Vec<Appliance>,
}

fn default_num_users() -> usize {
    1
}

impl User {
    pub fn new(name: impl Into<String>, num_users: usize) -> Self {
        Self {
            name: name.into(),
            num_users,
            appliances: Vec::new(),
        }
    }

    pub fn with_appliance(mut self, appliance: Appliance) -> Self {
        self.appliances.push(appliance);
        self
    }

    /// Adds an appliance and returns it for further configuration.
    pub fn add_appliance(&mut self, appliance: Appliance) -> &mut Appliance {
        self.appliances.push(appliance);
        let last = self.appliances.len() - 1;
        &mut self.appliances[last]
    }

    /// Validates the user and all its appliances.
    ///
    /// Returns an empty vector if the declaration is valid.
    pub fn validate(&self, path: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ConfigError::new(format!("{path}.name"), "must not be empty"));
        }
        if self.num_users == 0 {
            errors.push(ConfigError::new(format!("{path}.num_users"), "must be >= 1"));
        }

        let mut seen = HashSet::new();
        for (i, appliance) in self.appliances.iter().enumerate() {
            let app_path = format!("{path}.appliances[{i}]");
            if !seen.insert(appliance.name.as_str()) {
                errors.push(ConfigError::new(
                    format!("{app_path}.name"),
                    format!("duplicate appliance name \"{}\"", appliance.name),
                ));
            }
            errors.extend(appliance.validate(&app_path));
        }

        errors
    }
}

/// A validated user with prepared appliances.
#[derive(Debug, Clone)]
pub struct PreparedUser {
    pub name: String,
    pub num_users: usize,
    pub appliances: Vec<PreparedAppliance>,
}

impl PreparedUser {
    /// Expects a user that passed [`User::validate`].
    pub fn new(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            num_users: user.num_users,
            appliances: user
                .appliances
                .iter()
                .cloned()
                .map(PreparedAppliance::new)
                .collect(),
        }
    }

    /// Number of physical units across all members and appliances.
    pub fn unit_count(&self) -> usize {
        self.num_users
            * self
                .appliances
                .iter()
                .map(|a| a.declaration().number)
                .sum::<usize>()
    }
}
